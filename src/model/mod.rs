mod collector_group;
mod endpoint;
mod exporter_config;
mod project_snapshot;
mod quota;
mod storage;
mod usage;
mod volume;

pub use crate::model::collector_group::{endpoints_for, CollectorGroup};
pub use crate::model::endpoint::Endpoint;
pub use crate::model::exporter_config::{ExporterConfig, ServiceConfig};
pub use crate::model::project_snapshot::ProjectSnapshot;
pub use crate::model::quota::{InstanceQuota, KeyManagerQuota, LoadBalancerQuota, NetworkQuota, Quota, VolumeQuota};
pub use crate::model::storage::Storage;
pub use crate::model::usage::{
  HourlyUsage, InstanceUsageDetail, InstanceUsageGroup, MonthlyInstanceUsageDetail, MonthlyInstanceUsageGroup,
  MonthlyUsage, Quantity, StorageUsage, Usage, UsageCost, VolumeUsageDetail, VolumeUsageGroup,
};
pub use crate::model::volume::Volume;
