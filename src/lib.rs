//! Drives containers on an LXD daemon through its REST API.

pub mod cmds;
pub mod config;
pub mod environment;
pub mod lxd;

mod prelude;

#[cfg(test)]
mod testing;
