use super::serde::null_to_default;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LxdContainerMetadata {
    pub name: String,
    pub architecture: String,

    // LXD sends `null` rather than `{}` for containers without any config
    #[serde(default, deserialize_with = "null_to_default")]
    pub config: Map<String, Value>,

    pub created_at: String,
    pub status: String,
}
