use crate::prelude::*;
use prettytable::{row, Table};

pub fn images(env: &mut Environment) -> Result<()> {
    let images = env.lxd.list_images().context("Couldn't list images")?;

    let mut table = Table::new();

    table.set_titles(row!["Image"]);

    for image in images {
        table.add_row(row![image.name]);
    }

    write!(env.stdout, "{}", table)?;

    Ok(())
}
