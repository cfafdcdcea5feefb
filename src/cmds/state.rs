use super::format_state;
use crate::prelude::*;

/// Runs one of LXD's state actions (`start`, `stop`, `restart`, `freeze`,
/// `unfreeze`) and prints the state the container ended up in.
pub fn change_state(env: &mut Environment, name: &str, action: &str) -> Result<()> {
    let container = env
        .lxd
        .get_container(name)
        .with_context(|| format!("Couldn't find container: {}", name))?;

    let container = match action {
        "start" => env.lxd.start_container(&container),
        "stop" => env.lxd.stop_container(&container),
        "restart" => env.lxd.restart_container(&container),
        action => env.lxd.container_action(&container, action),
    }
    .with_context(|| format!("Couldn't {} container: {}", action, name))?;

    writeln!(
        env.stdout,
        "{} is now {}",
        container.name,
        format_state(container.state)
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_out;
    use crate::testing::*;

    fn lxd() -> (LxdDriver, LxdRequestLog) {
        let transport = LxdFakeTransport::default()
            .with(
                LxdMethod::Get,
                "/1.0/containers/mysql",
                200,
                container_payload("mysql", "Running"),
            )
            .with(LxdMethod::Put, "/1.0/containers/mysql/state", 202, success());

        let requests = transport.requests();

        (driver(transport), requests)
    }

    #[test]
    fn start() {
        let mut stdout = Vec::new();
        let (mut lxd, requests) = lxd();

        change_state(&mut Environment::new(&mut stdout, &mut lxd), "mysql", "start").unwrap();

        assert_out!("mysql is now running", stdout);

        pa::assert_eq!(
            Some("start"),
            requests.borrow()[1].json.as_ref().unwrap()["action"].as_str()
        );
    }

    #[test]
    fn given_unknown_action() {
        let mut stdout = Vec::new();
        let (mut lxd, requests) = lxd();

        let actual = change_state(&mut Environment::new(&mut stdout, &mut lxd), "mysql", "pause")
            .unwrap_err();

        pa::assert_str_eq!(
            "Couldn't pause container: mysql\n\nCaused by:\n    Invalid action specified: pause",
            format!("{:?}", actual)
        );

        // Only the initial lookup went through
        pa::assert_eq!(1, requests.borrow().len());
    }
}
