use crate::config_client::SetDefaults;
use crate::model::CollectorGroup;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExporterConfig {
    pub services: Vec<ServiceConfig>,
    #[serde(default)]
    pub collectors: Vec<CollectorGroup>,
}

impl SetDefaults for ExporterConfig {
    fn set_defaults(&mut self) {
        if self.collectors.is_empty() {
            self.collectors = CollectorGroup::ALL.to_vec();
        }
    }
}

/// A public cloud project to scrape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}
