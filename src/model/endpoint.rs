use serde::{Deserialize, Serialize};

/// Public cloud api endpoints a project snapshot is assembled from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Quota,
    Storage,
    Usage,
    Volume,
}

impl Endpoint {
    pub fn path(&self, service_id: &str) -> String {
        match self {
            Endpoint::Quota => format!("/cloud/project/{}/quota", service_id),
            Endpoint::Storage => format!("/cloud/project/{}/storage", service_id),
            Endpoint::Usage => format!("/cloud/project/{}/usage/current", service_id),
            Endpoint::Volume => format!("/cloud/project/{}/volume", service_id),
        }
    }
}
