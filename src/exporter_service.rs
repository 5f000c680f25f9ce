use std::error::Error;

use crate::collector::OvhCollector;
use crate::config_client::ConfigClient;
use crate::model::CollectorGroup;
use crate::project_client::ProjectClient;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};
use tracing::info;

pub struct ExporterServiceConfig {
    config_client: ConfigClient,
    project_client: Box<dyn ProjectClient>,
}

impl ExporterServiceConfig {
    pub fn new(
        config_client: ConfigClient,
        project_client: Box<dyn ProjectClient>,
    ) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            config_client,
            project_client,
        })
    }
}

/// Answers scrapes. Config is re-read and a fresh catalog built on every call,
/// so concurrent scrapes don't share any state.
pub struct ExporterService {
    config: ExporterServiceConfig,
}

impl ExporterService {
    pub fn new(config: ExporterServiceConfig) -> Self {
        Self { config }
    }

    /// The catalog without samples.
    pub fn describe(&self) -> Result<Vec<MetricFamily>, Box<dyn Error>> {
        Ok(OvhCollector::new(&CollectorGroup::ALL)?.describe())
    }

    /// Collects all configured projects and renders the text exposition.
    pub async fn scrape(&self) -> Result<String, Box<dyn Error>> {
        let config = self.config.config_client.read_exporter_config_from_file()?;

        let collector = OvhCollector::fetch(
            self.config.project_client.as_ref(),
            &config.services,
            &config.collectors,
        )
        .await?;
        let families = collector.try_collect()?;

        let sample_count: usize = families.iter().map(|f| f.get_metric().len()).sum();
        info!("Collected {} samples in {} metric families", sample_count, families.len());

        encode_text(&families)
    }
}

/// Renders families in the text exposition format. Families without samples
/// are left out, as the encoder rejects them.
pub fn encode_text(families: &[MetricFamily]) -> Result<String, Box<dyn Error>> {
    let families: Vec<MetricFamily> = families
        .iter()
        .filter(|f| !f.get_metric().is_empty())
        .cloned()
        .collect();

    let mut buffer = vec![];
    TextEncoder::new().encode(&families, &mut buffer)?;

    Ok(String::from_utf8(buffer)?)
}
