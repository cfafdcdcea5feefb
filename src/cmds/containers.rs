use crate::prelude::*;
use prettytable::{row, Table};

pub fn containers(env: &mut Environment) -> Result<()> {
    let containers = env
        .lxd
        .list_containers()
        .context("Couldn't list containers")?;

    let mut table = Table::new();

    table.set_titles(row!["Name", "State", "Architecture", "Created at"]);

    for container in containers {
        let created_at = container
            .extra
            .get("created_at")
            .and_then(|created_at| created_at.as_str())
            .unwrap_or("-")
            .to_string();

        table.add_row(row![
            container.name,
            format_state(container.state),
            container.architecture,
            created_at
        ]);
    }

    write!(env.stdout, "{}", table)?;

    Ok(())
}

pub fn format_state(state: ContainerState) -> String {
    match state {
        ContainerState::Running => state.as_str().green().to_string(),
        ContainerState::Stopped => state.as_str().yellow().to_string(),
    }
}
