mod container;
mod container_cluster;
mod container_image;
mod container_metadata;
mod container_state;
mod image_metadata;
mod serde;
mod state_action;

pub use self::{
    container::*, container_cluster::*, container_image::*, container_metadata::*,
    container_state::*, image_metadata::*, state_action::*,
};
