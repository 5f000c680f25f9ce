use crate::model::{Quota, Storage, Usage, Volume};
use serde::{Deserialize, Serialize};

/// Everything fetched for one project in one scrape. Fields for endpoints
/// that weren't requested stay empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub volumes: Vec<Volume>,
    #[serde(default)]
    pub quotas: Vec<Quota>,
    #[serde(default)]
    pub storages: Vec<Storage>,
    #[serde(default)]
    pub usage: Usage,
}
