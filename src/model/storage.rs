use serde::{Deserialize, Serialize};

/// An object storage container.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    pub id: String,
    pub name: String,
    pub region: String,
    pub container_type: String,
    pub stored_bytes: f64,
    pub stored_objects: f64,
}
