pub mod collector;
pub mod config_client;
pub mod exporter_service;
pub mod metrics;
pub mod model;
pub mod ovh_client;
pub mod project_client;
