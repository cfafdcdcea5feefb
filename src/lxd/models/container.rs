use crate::lxd::{ContainerImage, ContainerState, LxdContainerMetadata};
use indexmap::IndexMap;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub architecture: String,
    pub state: ContainerState,
    pub image: ContainerImage,
    pub ip_addresses: Vec<String>,
    pub extra: IndexMap<String, Value>,
}

impl From<LxdContainerMetadata> for Container {
    fn from(meta: LxdContainerMetadata) -> Self {
        let mut extra = IndexMap::new();

        extra.insert("created_at".into(), Value::String(meta.created_at));
        extra.insert("config".into(), Value::Object(meta.config));

        Self {
            id: meta.name.clone(),
            name: meta.name,
            architecture: meta.architecture,
            state: ContainerState::from_lxd_status(&meta.status),
            image: ContainerImage::placeholder(),
            ip_addresses: Default::default(),
            extra,
        }
    }
}
