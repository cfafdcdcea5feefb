mod containers;
mod create;
mod images;
mod server;
mod show;
mod state;

pub use self::{containers::*, create::*, images::*, server::*, show::*, state::*};
