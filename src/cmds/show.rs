use super::format_state;
use crate::prelude::*;

pub fn show(env: &mut Environment, name: &str) -> Result<()> {
    let container = env
        .lxd
        .get_container(name)
        .with_context(|| format!("Couldn't find container: {}", name))?;

    writeln!(env.stdout, "{}", container.name.bold())?;
    writeln!(env.stdout, "  state: {}", format_state(container.state))?;
    writeln!(env.stdout, "  architecture: {}", container.architecture)?;

    for (key, value) in &container.extra {
        match value.as_str() {
            Some(value) => writeln!(env.stdout, "  {}: {}", key, value)?,
            None => writeln!(env.stdout, "  {}: {}", key, value)?,
        }
    }

    Ok(())
}
