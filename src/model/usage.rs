use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Current billing period usage of a project.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub hourly_usage: Option<HourlyUsage>,
    #[serde(default)]
    pub monthly_usage: Option<MonthlyUsage>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HourlyUsage {
    #[serde(default)]
    pub instance: Vec<InstanceUsageGroup>,
    #[serde(default)]
    pub volume: Vec<VolumeUsageGroup>,
    #[serde(default)]
    pub storage: Vec<StorageUsage>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUsage {
    #[serde(default)]
    pub instance: Vec<MonthlyInstanceUsageGroup>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Hourly billed instances sharing a flavor (`reference`) and region.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstanceUsageGroup {
    pub reference: String,
    pub region: String,
    pub details: Vec<InstanceUsageDetail>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstanceUsageDetail {
    pub instance_id: String,
    pub quantity: Quantity,
    pub total_price: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInstanceUsageGroup {
    pub reference: String,
    pub region: String,
    pub details: Vec<MonthlyInstanceUsageDetail>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInstanceUsageDetail {
    pub instance_id: String,
    pub total_price: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VolumeUsageGroup {
    #[serde(rename = "type")]
    pub volume_type: String,
    pub region: String,
    pub details: Vec<VolumeUsageDetail>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VolumeUsageDetail {
    pub volume_id: String,
    pub quantity: Quantity,
    pub total_price: f64,
}

/// Object storage usage for one storage type and region.
///
/// `stored` is only read for entries that have a price, so a free entry
/// without it still decodes. Bandwidth the api reports as `{}` counts as
/// absent.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    #[serde(rename = "type")]
    pub storage_type: String,
    pub region: String,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub stored: Option<UsageCost>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub incoming_bandwidth: Option<UsageCost>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub outgoing_bandwidth: Option<UsageCost>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub incoming_internal_bandwidth: Option<UsageCost>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub outgoing_internal_bandwidth: Option<UsageCost>,
}

impl StorageUsage {
    /// True when the entry was billed; free entries carry no usable figures.
    pub fn is_billed(&self) -> bool {
        matches!(self.total_price, Some(price) if price != 0.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UsageCost {
    pub quantity: Quantity,
    pub total_price: f64,
}

impl UsageCost {
    /// Quantity and price of an optional cost, both zero when absent.
    pub fn or_zero(cost: &Option<UsageCost>) -> (f64, f64) {
        match cost {
            Some(c) => (c.quantity.value, c.total_price),
            None => (0.0, 0.0),
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<UsageCost>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => UsageCost::deserialize(value).map(Some).map_err(serde::de::Error::custom),
    }
}
