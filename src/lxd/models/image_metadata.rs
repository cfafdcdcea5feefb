use super::serde::null_to_default;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LxdImageMetadata {
    pub fingerprint: String,

    #[serde(default, deserialize_with = "null_to_default")]
    pub aliases: Vec<LxdImageAlias>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LxdImageAlias {
    pub name: String,

    #[serde(default)]
    pub description: String,
}
