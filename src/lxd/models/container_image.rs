use indexmap::IndexMap;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct ContainerImage {
    pub id: String,
    pub name: String,
    pub path: Option<String>,
    pub version: Option<String>,
    pub extra: IndexMap<String, Value>,
}

impl ContainerImage {
    /// Image reference attached to containers; LXD's container payload
    /// doesn't say which image the container came from.
    pub fn placeholder() -> Self {
        Self {
            id: "?".into(),
            name: "?".into(),
            path: Some("/".into()),
            version: Some("/".into()),
            extra: Default::default(),
        }
    }

    pub fn from_alias(name: impl Into<String>) -> Self {
        let name = name.into();

        Self {
            id: name.clone(),
            name,
            path: None,
            version: None,
            extra: Default::default(),
        }
    }
}
