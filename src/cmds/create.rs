use crate::prelude::*;

pub fn create(env: &mut Environment, name: &str) -> Result<()> {
    env.lxd
        .deploy_container(name, &ContainerImage::placeholder(), None, None, true)
        .with_context(|| format!("Couldn't create container: {}", name))?;

    writeln!(env.stdout, "Created container: {}", name)?;

    Ok(())
}

pub fn delete(env: &mut Environment, name: &str) -> Result<()> {
    let container = env
        .lxd
        .get_container(name)
        .with_context(|| format!("Couldn't find container: {}", name))?;

    env.lxd
        .destroy_container(&container)
        .with_context(|| format!("Couldn't delete container: {}", name))?;

    writeln!(env.stdout, "Deleted container: {}", name)?;

    Ok(())
}
