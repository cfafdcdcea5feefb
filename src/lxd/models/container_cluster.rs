use indexmap::IndexMap;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct ContainerCluster {
    pub id: String,
    pub name: String,
    pub extra: IndexMap<String, Value>,
}
