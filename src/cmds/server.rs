use crate::prelude::*;

pub fn trust(env: &mut Environment, certificate: &str, name: &str, password: &str) -> Result<()> {
    env.lxd
        .register_certificate(certificate, name, password)
        .context("Couldn't register certificate")?;

    writeln!(env.stdout, "Registered certificate: {}", name)?;

    Ok(())
}

pub fn version(env: &mut Environment) -> Result<()> {
    let response = env
        .lxd
        .version_info()
        .context("Couldn't fetch server info")?;

    writeln!(env.stdout, "API version: {}", env.lxd.version())?;

    let server_version = response
        .json()
        .ok()
        .and_then(|body| body.pointer("/metadata/environment/server_version"))
        .and_then(|version| version.as_str());

    if let Some(server_version) = server_version {
        writeln!(env.stdout, "Server version: {}", server_version)?;
    }

    Ok(())
}
