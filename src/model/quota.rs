use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Quotas for one region. Each entry carries at most the categories the api
/// has data for. Categories stay raw until a pass asks for them, so an entry
/// that is never visited can't fail the scrape.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    pub region: String,
    #[serde(default)]
    pub instance: Option<Value>,
    #[serde(default)]
    pub volume: Option<Value>,
    #[serde(default)]
    pub network: Option<Value>,
    #[serde(default)]
    pub load_balancer: Option<Value>,
    #[serde(default)]
    pub keymanager: Option<Value>,
}

impl Quota {
    pub fn instance(&self) -> Result<Option<InstanceQuota>, serde_json::Error> {
        decode(&self.instance)
    }

    pub fn volume(&self) -> Result<Option<VolumeQuota>, serde_json::Error> {
        decode(&self.volume)
    }

    pub fn network(&self) -> Result<Option<NetworkQuota>, serde_json::Error> {
        decode(&self.network)
    }

    pub fn load_balancer(&self) -> Result<Option<LoadBalancerQuota>, serde_json::Error> {
        decode(&self.load_balancer)
    }

    pub fn keymanager(&self) -> Result<Option<KeyManagerQuota>, serde_json::Error> {
        decode(&self.keymanager)
    }
}

fn decode<T: DeserializeOwned>(category: &Option<Value>) -> Result<Option<T>, serde_json::Error> {
    category.as_ref().map(|value| T::deserialize(value)).transpose()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstanceQuota {
    pub used_instances: f64,
    pub max_instances: f64,
    pub used_cores: f64,
    pub max_cores: f64,
    #[serde(rename = "usedRAM")]
    pub used_ram: f64,
    pub max_ram: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VolumeQuota {
    pub used_gigabytes: f64,
    pub max_gigabytes: f64,
    pub used_backup_gigabytes: f64,
    pub max_backup_gigabytes: f64,
    pub volume_count: f64,
    pub max_volume_count: f64,
    pub volume_backup_count: f64,
    pub max_volume_backup_count: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NetworkQuota {
    pub used_networks: f64,
    pub max_networks: f64,
    pub used_subnets: f64,
    pub max_subnets: f64,
    #[serde(rename = "usedFloatingIPs")]
    pub used_floating_ips: f64,
    #[serde(rename = "maxFloatingIPs")]
    pub max_floating_ips: f64,
    pub used_gateways: f64,
    pub max_gateways: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerQuota {
    pub used_load_balancers: f64,
    pub max_load_balancers: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct KeyManagerQuota {
    pub used_secrets: f64,
    pub max_secrets: f64,
}
