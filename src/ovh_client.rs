use crate::model::{Endpoint, ProjectSnapshot};
use crate::project_client::ProjectClient;
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use sha1::{Digest, Sha1};
use std::env;
use std::error::Error;
use tracing::{debug, info};

pub struct OvhClientConfig {
    base_url: String,
    application_key: String,
    application_secret: String,
    consumer_key: String,
}

impl OvhClientConfig {
    pub fn new(
        endpoint: &str,
        application_key: String,
        application_secret: String,
        consumer_key: String,
    ) -> Result<Self, Box<dyn Error>> {
        let base_url = resolve_endpoint(endpoint)?;

        debug!(
            "OvhClientConfig::new(endpoint: {}, base_url: {}, application_key: {})",
            endpoint, base_url, application_key
        );

        Ok(Self {
            base_url,
            application_key,
            application_secret,
            consumer_key,
        })
    }

    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        let endpoint = env::var("OVH_ENDPOINT").unwrap_or_else(|_| "ovh-eu".to_string());
        let application_key =
            env::var("OVH_APPLICATION_KEY").map_err(|_| "OVH_APPLICATION_KEY is not set")?;
        let application_secret =
            env::var("OVH_APPLICATION_SECRET").map_err(|_| "OVH_APPLICATION_SECRET is not set")?;
        let consumer_key = env::var("OVH_CONSUMER_KEY").map_err(|_| "OVH_CONSUMER_KEY is not set")?;

        Self::new(&endpoint, application_key, application_secret, consumer_key)
    }
}

/// Maps an endpoint alias to the api base url; urls are passed through.
pub fn resolve_endpoint(endpoint: &str) -> Result<String, Box<dyn Error>> {
    let base_url = match endpoint {
        "ovh-eu" => "https://eu.api.ovh.com/1.0",
        "ovh-ca" => "https://ca.api.ovh.com/1.0",
        "ovh-us" => "https://api.us.ovhcloud.com/1.0",
        "kimsufi-eu" => "https://eu.api.kimsufi.com/1.0",
        "kimsufi-ca" => "https://ca.api.kimsufi.com/1.0",
        "soyoustart-eu" => "https://eu.api.soyoustart.com/1.0",
        "soyoustart-ca" => "https://ca.api.soyoustart.com/1.0",
        url if url.starts_with("http") => url.trim_end_matches('/'),
        other => return Err(Box::<dyn Error>::from(format!("Unknown OVH endpoint {}", other))),
    };

    Ok(base_url.to_string())
}

/// Signature the api expects in the `X-Ovh-Signature` header.
pub fn signature(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: i64,
) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!(
        "{}+{}+{}+{}+{}+{}",
        application_secret, consumer_key, method, url, body, timestamp
    ));

    format!("$1${}", hex::encode(hasher.finalize()))
}

pub struct OvhClient {
    config: OvhClientConfig,
    http_client: reqwest::Client,
    time_delta: i64,
}

impl OvhClient {
    /// Creates the client and aligns request timestamps with the api clock.
    pub async fn new(config: OvhClientConfig) -> Result<Self, Box<dyn Error>> {
        let http_client = reqwest::Client::new();

        let server_time: i64 = http_client
            .get(format!("{}/auth/time", config.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let time_delta = server_time - Utc::now().timestamp();

        info!("Connected to {} with a clock delta of {}s", config.base_url, time_delta);

        Ok(Self {
            config,
            http_client,
            time_delta,
        })
    }

    pub async fn from_env() -> Result<Self, Box<dyn Error>> {
        Self::new(OvhClientConfig::from_env()?).await
    }

    async fn get<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);
        let timestamp = Utc::now().timestamp() + self.time_delta;
        let signature = signature(
            &self.config.application_secret,
            &self.config.consumer_key,
            "GET",
            &url,
            "",
            timestamp,
        );

        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("X-Ovh-Application", &self.config.application_key)
            .header("X-Ovh-Consumer", &self.config.consumer_key)
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Box::<dyn Error>::from(format!(
                "GET {} failed with status {}: {}",
                path, status, body
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ProjectClient for OvhClient {
    async fn fetch(&self, service_id: &str, endpoints: &[Endpoint]) -> Result<ProjectSnapshot, Box<dyn Error>> {
        let mut snapshot = ProjectSnapshot::default();

        for endpoint in endpoints {
            let path = endpoint.path(service_id);

            match endpoint {
                Endpoint::Quota => snapshot.quotas = self.get(&path).await?,
                Endpoint::Storage => snapshot.storages = self.get(&path).await?,
                Endpoint::Usage => snapshot.usage = self.get(&path).await?,
                Endpoint::Volume => snapshot.volumes = self.get(&path).await?,
            }
        }

        Ok(snapshot)
    }
}
