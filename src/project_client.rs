use crate::model::{Endpoint, ProjectSnapshot};
use async_trait::async_trait;
use std::error::Error;

/// Source of project snapshots; the collector only talks to the api through
/// this trait.
#[async_trait]
pub trait ProjectClient: Send + Sync {
    /// Fetches the given endpoints for one project. Snapshot fields belonging
    /// to endpoints that weren't asked for are left empty.
    async fn fetch(&self, service_id: &str, endpoints: &[Endpoint]) -> Result<ProjectSnapshot, Box<dyn Error>>;
}
