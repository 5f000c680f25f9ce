use crate::metrics::Metrics;
use crate::model::*;
use crate::project_client::ProjectClient;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use std::error::Error;
use tracing::{debug, error, warn};

/// Monthly billed instances are reported as running the whole month.
pub const MONTHLY_INSTANCE_HOURS: f64 = 720.0;

/// Holds the snapshots of one scrape and turns them into metric families.
/// Every collect call starts from an empty catalog, so repeated calls don't
/// accumulate samples.
pub struct OvhCollector {
    descs: Vec<Desc>,
    collectors: Vec<CollectorGroup>,
    snapshots: Vec<(String, ProjectSnapshot)>,
}

impl OvhCollector {
    /// A collector without snapshots; doesn't touch the api.
    pub fn new(collectors: &[CollectorGroup]) -> Result<Self, Box<dyn Error>> {
        // keep the fixed pass order and drop duplicates
        let collectors = CollectorGroup::ALL
            .iter()
            .filter(|g| collectors.contains(*g))
            .copied()
            .collect();

        Ok(Self {
            descs: Metrics::descs()?,
            collectors,
            snapshots: vec![],
        })
    }

    /// Fetches every configured project. A failing fetch fails the whole
    /// scrape.
    pub async fn fetch(
        project_client: &dyn ProjectClient,
        services: &[ServiceConfig],
        collectors: &[CollectorGroup],
    ) -> Result<Self, Box<dyn Error>> {
        let mut collector = Self::new(collectors)?;
        let endpoints = endpoints_for(&collector.collectors);

        for service in services {
            debug!("Fetching {:?} for service {}", endpoints, service.id);
            let snapshot = project_client.fetch(&service.id, &endpoints).await?;

            collector.snapshots.push((service.id.clone(), snapshot));
        }

        Ok(collector)
    }

    /// The full catalog without samples.
    pub fn describe(&self) -> Vec<MetricFamily> {
        Metrics::new().into_families()
    }

    /// The catalog filled with the samples of all fetched projects.
    pub fn try_collect(&self) -> Result<Vec<MetricFamily>, Box<dyn Error>> {
        let mut metrics = Metrics::new();

        for (service_id, snapshot) in &self.snapshots {
            self.collect_snapshot(&mut metrics, service_id, snapshot)?;
        }

        Ok(metrics.into_families())
    }

    fn collect_snapshot(
        &self,
        metrics: &mut Metrics,
        service_id: &str,
        snapshot: &ProjectSnapshot,
    ) -> Result<(), Box<dyn Error>> {
        for group in &self.collectors {
            match group {
                CollectorGroup::Volume => collect_volumes(metrics, service_id, &snapshot.volumes)?,
                CollectorGroup::QuotaInstance => collect_instance_quota(metrics, service_id, &snapshot.quotas)?,
                CollectorGroup::QuotaVolume => collect_volume_quota(metrics, service_id, &snapshot.quotas)?,
                CollectorGroup::QuotaNetwork => collect_network_quota(metrics, service_id, &snapshot.quotas)?,
                CollectorGroup::QuotaLoadBalancer => {
                    collect_load_balancer_quota(metrics, service_id, &snapshot.quotas)?
                }
                CollectorGroup::QuotaKeymanager => collect_keymanager_quota(metrics, service_id, &snapshot.quotas)?,
                CollectorGroup::Storage => collect_storages(metrics, service_id, &snapshot.storages)?,
                CollectorGroup::UsageInstance => collect_instance_usage(metrics, service_id, &snapshot.usage)?,
                CollectorGroup::UsageVolume => collect_volume_usage(metrics, service_id, &snapshot.usage)?,
                CollectorGroup::UsageStorage => collect_storage_usage(metrics, service_id, &snapshot.usage)?,
            }
        }

        Ok(())
    }
}

impl Collector for OvhCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        match self.try_collect() {
            Ok(families) => families,
            Err(e) => {
                error!("Collecting metrics failed: {}", e);
                vec![]
            }
        }
    }
}

fn collect_volumes(metrics: &mut Metrics, service_id: &str, volumes: &[Volume]) -> Result<(), Box<dyn Error>> {
    for volume in volumes {
        let size = match volume.size_gb() {
            Ok(size) => size,
            Err(e) => {
                warn!(
                    "Volume {} of service {} ignored as it has no parseable size: {}",
                    volume.id, service_id, e
                );
                continue;
            }
        };

        metrics.ovh_volume_size_gb.add_metric(
            &[
                service_id,
                volume.id.as_str(),
                volume.name.as_deref().unwrap_or_default(),
                volume.region.as_str(),
                volume.volume_type.as_str(),
            ],
            size as f64,
        )?;
    }

    Ok(())
}

// Quota passes stop at the first entry lacking their category, later entries
// are neither visited nor decoded.

fn collect_instance_quota(metrics: &mut Metrics, service_id: &str, quotas: &[Quota]) -> Result<(), Box<dyn Error>> {
    for quota in quotas {
        let Some(instance) = quota.instance()? else {
            return Ok(());
        };
        let labels = [service_id, quota.region.as_str()];

        metrics.ovh_quota_instance_count.add_metric(&labels, instance.used_instances)?;
        metrics.ovh_quota_instance_max_count.add_metric(&labels, instance.max_instances)?;
        metrics.ovh_quota_cpu_count.add_metric(&labels, instance.used_cores)?;
        metrics.ovh_quota_cpu_max_count.add_metric(&labels, instance.max_cores)?;
        metrics.ovh_quota_ram_gb.add_metric(&labels, instance.used_ram)?;
        metrics.ovh_quota_ram_max_gb.add_metric(&labels, instance.max_ram)?;
    }

    Ok(())
}

fn collect_volume_quota(metrics: &mut Metrics, service_id: &str, quotas: &[Quota]) -> Result<(), Box<dyn Error>> {
    for quota in quotas {
        let Some(volume) = quota.volume()? else {
            return Ok(());
        };
        let labels = [service_id, quota.region.as_str()];

        metrics.ovh_quota_volume_gb.add_metric(&labels, volume.used_gigabytes)?;
        metrics.ovh_quota_volume_max_gb.add_metric(&labels, volume.max_gigabytes)?;
        metrics.ovh_quota_volume_backup_gb.add_metric(&labels, volume.used_backup_gigabytes)?;
        metrics.ovh_quota_volume_backup_max_gb.add_metric(&labels, volume.max_backup_gigabytes)?;
        metrics.ovh_quota_volume_count.add_metric(&labels, volume.volume_count)?;
        metrics.ovh_quota_volume_max_count.add_metric(&labels, volume.max_volume_count)?;
        metrics.ovh_quota_volume_backup_count.add_metric(&labels, volume.volume_backup_count)?;
        metrics.ovh_quota_volume_backup_max_count.add_metric(&labels, volume.max_volume_backup_count)?;
    }

    Ok(())
}

fn collect_network_quota(metrics: &mut Metrics, service_id: &str, quotas: &[Quota]) -> Result<(), Box<dyn Error>> {
    for quota in quotas {
        let Some(network) = quota.network()? else {
            return Ok(());
        };
        let labels = [service_id, quota.region.as_str()];

        metrics.ovh_quota_network_count.add_metric(&labels, network.used_networks)?;
        metrics.ovh_quota_network_max_count.add_metric(&labels, network.max_networks)?;
        metrics.ovh_quota_network_subnet_count.add_metric(&labels, network.used_subnets)?;
        metrics.ovh_quota_network_subnet_max_count.add_metric(&labels, network.max_subnets)?;
        metrics.ovh_quota_network_floating_ip_count.add_metric(&labels, network.used_floating_ips)?;
        metrics.ovh_quota_network_floating_ip_max_count.add_metric(&labels, network.max_floating_ips)?;
        metrics.ovh_quota_network_gateway_count.add_metric(&labels, network.used_gateways)?;
        metrics.ovh_quota_network_gateway_max_count.add_metric(&labels, network.max_gateways)?;
    }

    Ok(())
}

fn collect_load_balancer_quota(
    metrics: &mut Metrics,
    service_id: &str,
    quotas: &[Quota],
) -> Result<(), Box<dyn Error>> {
    for quota in quotas {
        let Some(load_balancer) = quota.load_balancer()? else {
            return Ok(());
        };
        let labels = [service_id, quota.region.as_str()];

        metrics.ovh_quota_load_balancer_count.add_metric(&labels, load_balancer.used_load_balancers)?;
        metrics.ovh_quota_load_balancer_max_count.add_metric(&labels, load_balancer.max_load_balancers)?;
    }

    Ok(())
}

fn collect_keymanager_quota(metrics: &mut Metrics, service_id: &str, quotas: &[Quota]) -> Result<(), Box<dyn Error>> {
    for quota in quotas {
        let Some(keymanager) = quota.keymanager()? else {
            return Ok(());
        };
        let labels = [service_id, quota.region.as_str()];

        metrics.ovh_quota_keymanager_secret_count.add_metric(&labels, keymanager.used_secrets)?;
        metrics.ovh_quota_keymanager_secret_max_count.add_metric(&labels, keymanager.max_secrets)?;
    }

    Ok(())
}

fn collect_storages(metrics: &mut Metrics, service_id: &str, storages: &[Storage]) -> Result<(), Box<dyn Error>> {
    for storage in storages {
        let labels = [
            service_id,
            storage.region.as_str(),
            storage.id.as_str(),
            storage.name.as_str(),
            storage.container_type.as_str(),
        ];

        metrics.ovh_storage_size_bytes.add_metric(&labels, storage.stored_bytes)?;
        metrics.ovh_storage_object_count.add_metric(&labels, storage.stored_objects)?;
    }

    Ok(())
}

fn collect_instance_usage(metrics: &mut Metrics, service_id: &str, usage: &Usage) -> Result<(), Box<dyn Error>> {
    if let Some(hourly) = &usage.hourly_usage {
        for group in &hourly.instance {
            for instance in &group.details {
                let labels = [
                    service_id,
                    group.region.as_str(),
                    instance.instance_id.as_str(),
                    "hourly",
                    group.reference.as_str(),
                ];

                metrics.ovh_usage_instance_hours.add_metric(&labels, instance.quantity.value)?;
                metrics.ovh_usage_instance_price.add_metric(&labels, instance.total_price)?;
            }
        }
    }

    if let Some(monthly) = &usage.monthly_usage {
        for group in &monthly.instance {
            for instance in &group.details {
                let labels = [
                    service_id,
                    group.region.as_str(),
                    instance.instance_id.as_str(),
                    "monthly",
                    group.reference.as_str(),
                ];

                metrics.ovh_usage_instance_hours.add_metric(&labels, MONTHLY_INSTANCE_HOURS)?;
                metrics.ovh_usage_instance_price.add_metric(&labels, instance.total_price)?;
            }
        }
    }

    Ok(())
}

fn collect_volume_usage(metrics: &mut Metrics, service_id: &str, usage: &Usage) -> Result<(), Box<dyn Error>> {
    let Some(hourly) = &usage.hourly_usage else {
        return Ok(());
    };

    for group in &hourly.volume {
        for volume in &group.details {
            let labels = [
                service_id,
                group.region.as_str(),
                volume.volume_id.as_str(),
                group.volume_type.as_str(),
            ];

            metrics.ovh_usage_volume_gb_hours.add_metric(&labels, volume.quantity.value)?;
            metrics.ovh_usage_volume_price.add_metric(&labels, volume.total_price)?;
        }
    }

    Ok(())
}

fn collect_storage_usage(metrics: &mut Metrics, service_id: &str, usage: &Usage) -> Result<(), Box<dyn Error>> {
    let Some(hourly) = &usage.hourly_usage else {
        return Ok(());
    };

    for storage in &hourly.storage {
        if !storage.is_billed() {
            continue;
        }

        let stored = storage.stored.as_ref().ok_or_else(|| {
            format!(
                "storage usage {} in {} of service {} has a price but no stored usage",
                storage.storage_type, storage.region, service_id
            )
        })?;

        let (external_incoming_gb, external_incoming_price) = UsageCost::or_zero(&storage.incoming_bandwidth);
        let (external_outgoing_gb, external_outgoing_price) = UsageCost::or_zero(&storage.outgoing_bandwidth);
        let (internal_incoming_gb, internal_incoming_price) = UsageCost::or_zero(&storage.incoming_internal_bandwidth);
        let (internal_outgoing_gb, internal_outgoing_price) = UsageCost::or_zero(&storage.outgoing_internal_bandwidth);

        let labels = [service_id, storage.region.as_str(), storage.storage_type.as_str()];

        metrics.ovh_usage_storage_gb_hours.add_metric(&labels, stored.quantity.value)?;
        metrics.ovh_usage_storage_price.add_metric(&labels, stored.total_price)?;
        metrics
            .ovh_usage_storage_bandwidth_external_incoming_gb_hours
            .add_metric(&labels, external_incoming_gb)?;
        metrics
            .ovh_usage_storage_bandwidth_external_incoming_price
            .add_metric(&labels, external_incoming_price)?;
        metrics
            .ovh_usage_storage_bandwidth_external_outgoing_gb_hours
            .add_metric(&labels, external_outgoing_gb)?;
        metrics
            .ovh_usage_storage_bandwidth_external_outgoing_price
            .add_metric(&labels, external_outgoing_price)?;
        metrics
            .ovh_usage_storage_bandwidth_internal_incoming_gb_hours
            .add_metric(&labels, internal_incoming_gb)?;
        metrics
            .ovh_usage_storage_bandwidth_internal_incoming_price
            .add_metric(&labels, internal_incoming_price)?;
        metrics
            .ovh_usage_storage_bandwidth_internal_outgoing_gb_hours
            .add_metric(&labels, internal_outgoing_gb)?;
        metrics
            .ovh_usage_storage_bandwidth_internal_outgoing_price
            .add_metric(&labels, internal_outgoing_price)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project_client::tests::{fixture_snapshot, StaticProjectClient};
    use assert2::{check, let_assert};
    use prometheus::proto::Metric;
    use prometheus::Registry;
    use serde_json::json;
    use tracing_test::traced_test;

    fn service(id: &str) -> ServiceConfig {
        ServiceConfig {
            id: id.to_string(),
            description: None,
        }
    }

    fn family<'f>(families: &'f [MetricFamily], name: &str) -> &'f MetricFamily {
        families.iter().find(|f| f.get_name() == name).unwrap()
    }

    fn values(families: &[MetricFamily], name: &str) -> Vec<(Vec<String>, f64)> {
        family(families, name)
            .get_metric()
            .iter()
            .map(|m| {
                let label_values = m.get_label().iter().map(|l| l.get_value().to_string()).collect();
                (label_values, m.get_gauge().get_value())
            })
            .collect()
    }

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_values(metrics: &[Metric]) -> Vec<f64> {
        metrics.iter().map(|m| m.get_gauge().get_value()).collect()
    }

    fn quota(value: serde_json::Value) -> Quota {
        serde_json::from_value(value).unwrap()
    }

    fn instance_quota(region: &str, used_instances: f64) -> Quota {
        quota(json!({
            "region": region,
            "instance": {
                "usedInstances": used_instances,
                "maxInstances": 20,
                "usedCores": 1,
                "maxCores": 64,
                "usedRAM": 2000,
                "maxRam": 256000
            }
        }))
    }

    fn bare_quota(region: &str) -> Quota {
        quota(json!({ "region": region }))
    }

    async fn fetch(client: &StaticProjectClient, services: &[&str], collectors: &[CollectorGroup]) -> OvhCollector {
        let services: Vec<ServiceConfig> = services.iter().map(|id| service(id)).collect();

        OvhCollector::fetch(client, &services, collectors).await.unwrap()
    }

    async fn collect_fixture(collectors: &[CollectorGroup]) -> Vec<MetricFamily> {
        let client = StaticProjectClient::default().with_snapshot("abc123", fixture_snapshot());

        fetch(&client, &["abc123"], collectors).await.try_collect().unwrap()
    }

    #[test]
    fn describe_returns_catalog_without_fetching() {
        let_assert!(Ok(collector) = OvhCollector::new(&CollectorGroup::ALL));

        let families = collector.describe();

        check!(families.len() == 43);
        check!(families.iter().all(|f| f.get_metric().is_empty()));
        check!(collector.desc().len() == 43);
    }

    #[tokio::test]
    #[traced_test]
    async fn collect_skips_volume_with_unparseable_size() {
        let families = collect_fixture(&CollectorGroup::ALL).await;

        check!(
            values(&families, "ovh_volume_size_gb")
                == vec![
                    (labels(&["abc123", "vol-1", "data", "GRA7", "classic"]), 100.0),
                    (labels(&["abc123", "vol-3", "logs", "SBG5", "high-speed"]), 20.0),
                ]
        );
        check!(logs_contain("Volume vol-2 of service abc123 ignored as it has no parseable size"));
        check!(!logs_contain("Volume vol-1"));
    }

    #[tokio::test]
    async fn collect_quota_categories_stop_at_first_entry_without_category() {
        let families = collect_fixture(&CollectorGroup::ALL).await;

        // every entry has an instance quota
        check!(
            values(&families, "ovh_quota_instance_count")
                == vec![
                    (labels(&["abc123", "GRA7"]), 2.0),
                    (labels(&["abc123", "SBG5"]), 1.0),
                    (labels(&["abc123", "BHS5"]), 0.0),
                ]
        );
        check!(values(&families, "ovh_quota_ram_gb")[0].1 == 30000.0);

        // the third entry has no volume quota
        check!(family(&families, "ovh_quota_volume_gb").get_metric().len() == 2);
        check!(family(&families, "ovh_quota_volume_backup_max_count").get_metric().len() == 2);

        // the second entry has no network quota, so the third isn't reached
        check!(values(&families, "ovh_quota_network_floating_ip_count") == vec![(labels(&["abc123", "GRA7"]), 3.0)]);
        check!(family(&families, "ovh_quota_network_gateway_max_count").get_metric().len() == 1);

        check!(values(&families, "ovh_quota_load_balancer_max_count") == vec![(labels(&["abc123", "GRA7"]), 8.0)]);
        check!(values(&families, "ovh_quota_keymanager_secret_count") == vec![(labels(&["abc123", "GRA7"]), 4.0)]);
    }

    #[test]
    fn instance_quota_halts_at_entry_lacking_instance() {
        let mut metrics = Metrics::new();
        let quotas = vec![instance_quota("GRA7", 1.0), bare_quota("SBG5"), instance_quota("BHS5", 3.0)];

        let_assert!(Ok(()) = collect_instance_quota(&mut metrics, "abc123", &quotas));

        let_assert!([metric] = metrics.ovh_quota_instance_count.samples());
        check!(metric.get_label()[1].get_value() == "GRA7");
        check!(metrics.ovh_quota_ram_max_gb.samples().len() == 1);
    }

    #[test]
    fn quota_categories_emit_nothing_when_first_entry_lacks_them() {
        let mut metrics = Metrics::new();
        let quotas = vec![bare_quota("GRA7"), instance_quota("SBG5", 1.0)];

        let_assert!(Ok(()) = collect_instance_quota(&mut metrics, "abc123", &quotas));
        let_assert!(Ok(()) = collect_keymanager_quota(&mut metrics, "abc123", &quotas));

        check!(metrics.ovh_quota_instance_count.samples().is_empty());
        check!(metrics.ovh_quota_keymanager_secret_count.samples().is_empty());
    }

    #[tokio::test]
    async fn incomplete_quota_after_the_early_exit_is_never_decoded() {
        let snapshot: ProjectSnapshot = serde_json::from_value(json!({
            "volumes": [{ "id": "vol-1", "name": "data", "region": "GRA7", "type": "classic", "size": 100 }],
            "quotas": [{ "region": "GRA" }, { "region": "SBG", "instance": { "usedInstances": 1 } }]
        }))
        .unwrap();
        let client = StaticProjectClient::default().with_snapshot("abc123", snapshot);
        let collector = fetch(&client, &["abc123"], &CollectorGroup::ALL).await;

        let_assert!(Ok(families) = collector.try_collect());

        check!(
            values(&families, "ovh_volume_size_gb") == vec![(labels(&["abc123", "vol-1", "data", "GRA7", "classic"]), 100.0)]
        );
        check!(families
            .iter()
            .filter(|f| f.get_name().starts_with("ovh_quota_"))
            .all(|f| f.get_metric().is_empty()));
    }

    #[test]
    fn incomplete_quota_category_that_is_reached_fails() {
        let mut metrics = Metrics::new();
        let quotas = vec![quota(json!({ "region": "GRA7", "loadBalancer": { "usedLoadBalancers": 1 } }))];

        check!(collect_load_balancer_quota(&mut metrics, "abc123", &quotas).is_err());
    }

    #[tokio::test]
    async fn collect_storages_emits_size_and_object_count() {
        let families = collect_fixture(&CollectorGroup::ALL).await;

        check!(
            values(&families, "ovh_storage_size_bytes")
                == vec![
                    (labels(&["abc123", "GRA", "c3RvcmFnZS0x", "backups", "private"]), 1073741824.0),
                    (labels(&["abc123", "SBG", "c3RvcmFnZS0y", "assets", "public"]), 2048.0),
                ]
        );
        check!(values(&families, "ovh_storage_object_count")[0].1 == 42.0);
    }

    #[tokio::test]
    async fn collect_instance_usage_reports_hourly_and_monthly() {
        let families = collect_fixture(&CollectorGroup::ALL).await;

        check!(
            values(&families, "ovh_usage_instance_hours")
                == vec![
                    (labels(&["abc123", "GRA7", "i-1", "hourly", "b2-7"]), 12.0),
                    (labels(&["abc123", "GRA7", "i-2", "hourly", "b2-7"]), 3.0),
                    (labels(&["abc123", "SBG5", "i-3", "monthly", "b2-15"]), 720.0),
                ]
        );
        check!(
            values(&families, "ovh_usage_instance_price")
                == vec![
                    (labels(&["abc123", "GRA7", "i-1", "hourly", "b2-7"]), 1.2),
                    (labels(&["abc123", "GRA7", "i-2", "hourly", "b2-7"]), 0.3),
                    (labels(&["abc123", "SBG5", "i-3", "monthly", "b2-15"]), 30.5),
                ]
        );
    }

    #[test]
    fn monthly_instance_usage_always_reports_720_hours() {
        let mut metrics = Metrics::new();
        let usage = Usage {
            hourly_usage: None,
            monthly_usage: Some(MonthlyUsage {
                instance: vec![MonthlyInstanceUsageGroup {
                    reference: "d2-2".into(),
                    region: "WAW1".into(),
                    details: vec![
                        MonthlyInstanceUsageDetail {
                            instance_id: "i-9".into(),
                            total_price: 0.0,
                        },
                        MonthlyInstanceUsageDetail {
                            instance_id: "i-10".into(),
                            total_price: 99.0,
                        },
                    ],
                }],
            }),
        };

        let_assert!(Ok(()) = collect_instance_usage(&mut metrics, "abc123", &usage));

        check!(sample_values(metrics.ovh_usage_instance_hours.samples()) == vec![MONTHLY_INSTANCE_HOURS; 2]);
        check!(sample_values(metrics.ovh_usage_instance_price.samples()) == vec![0.0, 99.0]);
    }

    #[tokio::test]
    async fn collect_volume_usage_uses_hourly_bucket() {
        let families = collect_fixture(&CollectorGroup::ALL).await;

        check!(
            values(&families, "ovh_usage_volume_gb_hours")
                == vec![(labels(&["abc123", "GRA7", "vol-1", "classic"]), 2400.0)]
        );
        check!(
            values(&families, "ovh_usage_volume_price") == vec![(labels(&["abc123", "GRA7", "vol-1", "classic"]), 0.1)]
        );
    }

    #[tokio::test]
    async fn collect_storage_usage_skips_unbilled_and_zeroes_missing_bandwidth() {
        let families = collect_fixture(&CollectorGroup::ALL).await;
        let gra = labels(&["abc123", "GRA", "pcs"]);

        check!(values(&families, "ovh_usage_storage_gb_hours") == vec![(gra.clone(), 100.0)]);
        check!(values(&families, "ovh_usage_storage_price") == vec![(gra.clone(), 0.2)]);
        check!(values(&families, "ovh_usage_storage_bandwidth_external_outgoing_gb_hours") == vec![(gra.clone(), 5.0)]);
        check!(values(&families, "ovh_usage_storage_bandwidth_external_outgoing_price") == vec![(gra.clone(), 0.3)]);
        check!(values(&families, "ovh_usage_storage_bandwidth_external_incoming_gb_hours") == vec![(gra.clone(), 0.0)]);
        check!(values(&families, "ovh_usage_storage_bandwidth_internal_incoming_price") == vec![(gra.clone(), 0.0)]);
        check!(values(&families, "ovh_usage_storage_bandwidth_internal_outgoing_gb_hours") == vec![(gra, 0.0)]);
    }

    #[test]
    fn storage_usage_without_bandwidth_emits_eight_zero_samples() {
        let mut metrics = Metrics::new();
        let usage = Usage {
            hourly_usage: Some(HourlyUsage {
                instance: vec![],
                volume: vec![],
                storage: vec![StorageUsage {
                    storage_type: "pcs".into(),
                    region: "BHS".into(),
                    total_price: Some(1.5),
                    stored: Some(UsageCost {
                        quantity: Quantity {
                            value: 10.0,
                            unit: None,
                        },
                        total_price: 1.5,
                    }),
                    incoming_bandwidth: None,
                    outgoing_bandwidth: None,
                    incoming_internal_bandwidth: None,
                    outgoing_internal_bandwidth: None,
                }],
            }),
            monthly_usage: None,
        };

        let_assert!(Ok(()) = collect_storage_usage(&mut metrics, "abc123", &usage));

        let bandwidth: Vec<MetricFamily> = metrics
            .into_families()
            .into_iter()
            .filter(|f| f.get_name().starts_with("ovh_usage_storage_bandwidth_"))
            .collect();
        check!(bandwidth.len() == 8);
        for family in &bandwidth {
            check!(sample_values(family.get_metric()) == vec![0.0], "{}", family.get_name());
        }
    }

    #[test]
    fn billed_storage_usage_with_empty_bandwidth_objects_emits_zeros() {
        let mut metrics = Metrics::new();
        let usage: Usage = serde_json::from_value(json!({
            "hourlyUsage": {
                "storage": [{
                    "type": "pcs",
                    "region": "GRA",
                    "totalPrice": 0.5,
                    "stored": { "quantity": { "value": 100 }, "totalPrice": 0.5 },
                    "incomingBandwidth": {},
                    "outgoingInternalBandwidth": {}
                }]
            }
        }))
        .unwrap();

        let_assert!(Ok(()) = collect_storage_usage(&mut metrics, "abc123", &usage));

        check!(sample_values(metrics.ovh_usage_storage_gb_hours.samples()) == vec![100.0]);
        check!(sample_values(metrics.ovh_usage_storage_bandwidth_external_incoming_gb_hours.samples()) == vec![0.0]);
        check!(sample_values(metrics.ovh_usage_storage_bandwidth_internal_outgoing_price.samples()) == vec![0.0]);
    }

    #[test]
    fn storage_usage_with_price_but_no_stored_usage_fails() {
        let mut metrics = Metrics::new();
        let usage: Usage =
            serde_json::from_str(r#"{"hourlyUsage": {"storage": [{"type": "pcs", "region": "GRA", "totalPrice": 2}]}}"#)
                .unwrap();

        check!(collect_storage_usage(&mut metrics, "abc123", &usage).is_err());
    }

    #[tokio::test]
    async fn collect_labels_samples_per_project() {
        let client = StaticProjectClient::default()
            .with_snapshot("first", fixture_snapshot())
            .with_snapshot("second", fixture_snapshot());
        let collector = fetch(&client, &["first", "second"], &CollectorGroup::ALL).await;

        let_assert!(Ok(families) = collector.try_collect());

        let storages = family(&families, "ovh_storage_size_bytes").get_metric();
        check!(storages.len() == 4);
        check!(storages[0].get_label()[0].get_value() == "first");
        check!(storages[2].get_label()[0].get_value() == "second");
    }

    #[tokio::test]
    async fn collect_twice_builds_a_fresh_catalog() {
        let client = StaticProjectClient::default().with_snapshot("abc123", fixture_snapshot());
        let collector = fetch(&client, &["abc123"], &CollectorGroup::ALL).await;

        let_assert!(Ok(_) = collector.try_collect());
        let_assert!(Ok(families) = collector.try_collect());

        check!(family(&families, "ovh_storage_size_bytes").get_metric().len() == 2);
    }

    #[tokio::test]
    async fn fetch_fails_when_any_project_fails() {
        let client = StaticProjectClient::default()
            .with_snapshot("first", fixture_snapshot())
            .with_failure("second", "403 Forbidden");
        let services = vec![service("first"), service("second")];

        let_assert!(Err(e) = OvhCollector::fetch(&client, &services, &CollectorGroup::ALL).await);
        check!(e.to_string() == "403 Forbidden");
        check!(client.requests.lock().unwrap().len() == 2);
    }

    #[tokio::test]
    async fn fetch_only_requests_endpoints_of_enabled_groups() {
        let client = StaticProjectClient::default().with_snapshot("abc123", fixture_snapshot());
        let collector = fetch(
            &client,
            &["abc123"],
            &[CollectorGroup::Storage, CollectorGroup::QuotaKeymanager, CollectorGroup::Storage],
        )
        .await;

        let_assert!(Ok(families) = collector.try_collect());

        let requests = client.requests.lock().unwrap();
        check!(*requests == vec![("abc123".to_string(), vec![Endpoint::Quota, Endpoint::Storage])]);

        check!(family(&families, "ovh_storage_size_bytes").get_metric().len() == 2);
        check!(family(&families, "ovh_quota_keymanager_secret_count").get_metric().len() == 1);
        check!(family(&families, "ovh_volume_size_gb").get_metric().is_empty());
        check!(family(&families, "ovh_usage_instance_hours").get_metric().is_empty());
        check!(family(&families, "ovh_quota_instance_count").get_metric().is_empty());
    }

    #[tokio::test]
    async fn registry_gathers_non_empty_families() {
        let client = StaticProjectClient::default().with_snapshot("abc123", fixture_snapshot());
        let collector = fetch(&client, &["abc123"], &[CollectorGroup::Volume, CollectorGroup::Storage]).await;
        let registry = Registry::new();

        let_assert!(Ok(()) = registry.register(Box::new(collector)));
        let families = registry.gather();

        let names: Vec<&str> = families.iter().map(|f| f.get_name()).collect();
        check!(names == vec!["ovh_storage_object_count", "ovh_storage_size_bytes", "ovh_volume_size_gb"]);
        check!(family(&families, "ovh_volume_size_gb").get_metric().len() == 2);
    }

    #[test]
    #[traced_test]
    fn failing_collect_is_logged_and_yields_nothing() {
        let mut collector = OvhCollector::new(&[CollectorGroup::QuotaInstance]).unwrap();
        let snapshot: ProjectSnapshot =
            serde_json::from_value(json!({ "quotas": [{ "region": "GRA7", "instance": { "usedInstances": 1 } }] }))
                .unwrap();
        collector.snapshots.push(("abc123".to_string(), snapshot));

        check!(Collector::collect(&collector).is_empty());
        check!(logs_contain("Collecting metrics failed"));
    }
}
