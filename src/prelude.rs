pub use crate::config::*;
pub use crate::environment::*;
pub use crate::lxd::*;
pub use anyhow::{bail, Context, Result};
pub use colored::Colorize;
pub use std::io::Write;

#[cfg(test)]
pub use indoc::indoc;

#[cfg(test)]
pub use pretty_assertions as pa;
