use prometheus::core::Desc;
use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType};
use std::collections::HashMap;
use std::error::Error;

const VOLUME_LABELS: [&str; 5] = ["service_id", "volume_id", "name", "region", "type"];
const QUOTA_LABELS: [&str; 2] = ["service_id", "region"];
const STORAGE_LABELS: [&str; 5] = ["service_id", "region", "storage_id", "storage_name", "storage_type"];
const INSTANCE_USAGE_LABELS: [&str; 5] = ["service_id", "region", "instance_id", "type", "flavor"];
const VOLUME_USAGE_LABELS: [&str; 4] = ["service_id", "region", "volume_id", "flavor"];
const STORAGE_USAGE_LABELS: [&str; 3] = ["service_id", "region", "flavor"];

/// A gauge family with a fixed label schema. Unlike a `GaugeVec`, samples
/// with identical label values are kept as separate metrics.
pub struct GaugeFamily {
    family: MetricFamily,
    label_names: &'static [&'static str],
}

impl GaugeFamily {
    pub fn new(name: &str, help: &str, label_names: &'static [&'static str]) -> Self {
        let mut family = MetricFamily::default();
        family.set_name(name.to_string());
        family.set_help(help.to_string());
        family.set_field_type(MetricType::GAUGE);

        Self { family, label_names }
    }

    pub fn name(&self) -> &str {
        self.family.get_name()
    }

    pub fn label_names(&self) -> &[&'static str] {
        self.label_names
    }

    pub fn samples(&self) -> &[Metric] {
        self.family.get_metric()
    }

    /// Adds a sample; label values are given in schema order.
    pub fn add_metric(&mut self, label_values: &[&str], value: f64) -> Result<(), Box<dyn Error>> {
        if label_values.len() != self.label_names.len() {
            return Err(Box::<dyn Error>::from(format!(
                "{} expects {} label values, got {}",
                self.name(),
                self.label_names.len(),
                label_values.len()
            )));
        }

        let mut metric = Metric::default();
        for (label_name, label_value) in self.label_names.iter().zip(label_values) {
            let mut label = LabelPair::default();
            label.set_name(label_name.to_string());
            label.set_value(label_value.to_string());
            metric.mut_label().push(label);
        }

        let mut gauge = Gauge::default();
        gauge.set_value(value);
        metric.set_gauge(gauge);

        self.family.mut_metric().push(metric);

        Ok(())
    }

    pub fn desc(&self) -> Result<Desc, Box<dyn Error>> {
        let desc = Desc::new(
            self.family.get_name().to_string(),
            self.family.get_help().to_string(),
            self.label_names.iter().map(|l| l.to_string()).collect(),
            HashMap::new(),
        )?;

        Ok(desc)
    }

    pub fn into_family(self) -> MetricFamily {
        self.family
    }
}

/// The complete catalog of exported metric families. A new instance is built
/// for every describe or collect call.
pub struct Metrics {
    // volumes
    pub ovh_volume_size_gb: GaugeFamily,

    // instance quota
    pub ovh_quota_instance_count: GaugeFamily,
    pub ovh_quota_instance_max_count: GaugeFamily,
    pub ovh_quota_cpu_count: GaugeFamily,
    pub ovh_quota_cpu_max_count: GaugeFamily,
    pub ovh_quota_ram_gb: GaugeFamily,
    pub ovh_quota_ram_max_gb: GaugeFamily,

    // volume quota
    pub ovh_quota_volume_gb: GaugeFamily,
    pub ovh_quota_volume_max_gb: GaugeFamily,
    pub ovh_quota_volume_count: GaugeFamily,
    pub ovh_quota_volume_max_count: GaugeFamily,
    pub ovh_quota_volume_backup_gb: GaugeFamily,
    pub ovh_quota_volume_backup_max_gb: GaugeFamily,
    pub ovh_quota_volume_backup_count: GaugeFamily,
    pub ovh_quota_volume_backup_max_count: GaugeFamily,

    // network quota
    pub ovh_quota_network_count: GaugeFamily,
    pub ovh_quota_network_max_count: GaugeFamily,
    pub ovh_quota_network_subnet_count: GaugeFamily,
    pub ovh_quota_network_subnet_max_count: GaugeFamily,
    pub ovh_quota_network_floating_ip_count: GaugeFamily,
    pub ovh_quota_network_floating_ip_max_count: GaugeFamily,
    pub ovh_quota_network_gateway_count: GaugeFamily,
    pub ovh_quota_network_gateway_max_count: GaugeFamily,

    // load balancer quota
    pub ovh_quota_load_balancer_count: GaugeFamily,
    pub ovh_quota_load_balancer_max_count: GaugeFamily,

    // key manager quota
    pub ovh_quota_keymanager_secret_count: GaugeFamily,
    pub ovh_quota_keymanager_secret_max_count: GaugeFamily,

    // object storage containers
    pub ovh_storage_object_count: GaugeFamily,
    pub ovh_storage_size_bytes: GaugeFamily,

    // instance usage
    pub ovh_usage_instance_hours: GaugeFamily,
    pub ovh_usage_instance_price: GaugeFamily,

    // volume usage
    pub ovh_usage_volume_gb_hours: GaugeFamily,
    pub ovh_usage_volume_price: GaugeFamily,

    // storage usage
    pub ovh_usage_storage_price: GaugeFamily,
    pub ovh_usage_storage_gb_hours: GaugeFamily,
    pub ovh_usage_storage_bandwidth_internal_outgoing_price: GaugeFamily,
    pub ovh_usage_storage_bandwidth_internal_outgoing_gb_hours: GaugeFamily,
    pub ovh_usage_storage_bandwidth_internal_incoming_price: GaugeFamily,
    pub ovh_usage_storage_bandwidth_internal_incoming_gb_hours: GaugeFamily,
    pub ovh_usage_storage_bandwidth_external_outgoing_price: GaugeFamily,
    pub ovh_usage_storage_bandwidth_external_outgoing_gb_hours: GaugeFamily,
    pub ovh_usage_storage_bandwidth_external_incoming_price: GaugeFamily,
    pub ovh_usage_storage_bandwidth_external_incoming_gb_hours: GaugeFamily,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            ovh_volume_size_gb: GaugeFamily::new("ovh_volume_size_gb", "Volume size in Gb", &VOLUME_LABELS),

            ovh_quota_instance_count: GaugeFamily::new("ovh_quota_instance_count", "Instance count", &QUOTA_LABELS),
            ovh_quota_instance_max_count: GaugeFamily::new(
                "ovh_quota_instance_max_count",
                "Instance max count",
                &QUOTA_LABELS,
            ),
            ovh_quota_cpu_count: GaugeFamily::new("ovh_quota_cpu_count", "CPU count", &QUOTA_LABELS),
            ovh_quota_cpu_max_count: GaugeFamily::new("ovh_quota_cpu_max_count", "CPU max count", &QUOTA_LABELS),
            ovh_quota_ram_gb: GaugeFamily::new("ovh_quota_ram_gb", "RAM count", &QUOTA_LABELS),
            ovh_quota_ram_max_gb: GaugeFamily::new("ovh_quota_ram_max_gb", "RAM max count", &QUOTA_LABELS),

            ovh_quota_volume_gb: GaugeFamily::new("ovh_quota_volume_gb", "Volume gigabytes", &QUOTA_LABELS),
            ovh_quota_volume_max_gb: GaugeFamily::new(
                "ovh_quota_volume_max_gb",
                "Volume max gigabytes",
                &QUOTA_LABELS,
            ),
            ovh_quota_volume_count: GaugeFamily::new("ovh_quota_volume_count", "Volume count", &QUOTA_LABELS),
            ovh_quota_volume_max_count: GaugeFamily::new(
                "ovh_quota_volume_max_count",
                "Volume max count",
                &QUOTA_LABELS,
            ),
            ovh_quota_volume_backup_gb: GaugeFamily::new(
                "ovh_quota_volume_backup_gb",
                "Volume backup gigabytes",
                &QUOTA_LABELS,
            ),
            ovh_quota_volume_backup_max_gb: GaugeFamily::new(
                "ovh_quota_volume_backup_max_gb",
                "Volume backup max gigabytes",
                &QUOTA_LABELS,
            ),
            ovh_quota_volume_backup_count: GaugeFamily::new(
                "ovh_quota_volume_backup_count",
                "Volume backup count",
                &QUOTA_LABELS,
            ),
            ovh_quota_volume_backup_max_count: GaugeFamily::new(
                "ovh_quota_volume_backup_max_count",
                "Volume backup max count",
                &QUOTA_LABELS,
            ),

            ovh_quota_network_count: GaugeFamily::new("ovh_quota_network_count", "Network count", &QUOTA_LABELS),
            ovh_quota_network_max_count: GaugeFamily::new(
                "ovh_quota_network_max_count",
                "Network max count",
                &QUOTA_LABELS,
            ),
            ovh_quota_network_subnet_count: GaugeFamily::new(
                "ovh_quota_network_subnet_count",
                "Network subnet count",
                &QUOTA_LABELS,
            ),
            ovh_quota_network_subnet_max_count: GaugeFamily::new(
                "ovh_quota_network_subnet_max_count",
                "Network subnet max count",
                &QUOTA_LABELS,
            ),
            ovh_quota_network_floating_ip_count: GaugeFamily::new(
                "ovh_quota_network_floating_ip_count",
                "Network floating IP count",
                &QUOTA_LABELS,
            ),
            ovh_quota_network_floating_ip_max_count: GaugeFamily::new(
                "ovh_quota_network_floating_ip_max_count",
                "Network floating IP max count",
                &QUOTA_LABELS,
            ),
            ovh_quota_network_gateway_count: GaugeFamily::new(
                "ovh_quota_network_gateway_count",
                "Network gateway count",
                &QUOTA_LABELS,
            ),
            ovh_quota_network_gateway_max_count: GaugeFamily::new(
                "ovh_quota_network_gateway_max_count",
                "Network gateway max count",
                &QUOTA_LABELS,
            ),

            ovh_quota_load_balancer_count: GaugeFamily::new(
                "ovh_quota_load_balancer_count",
                "Load balancer count",
                &QUOTA_LABELS,
            ),
            ovh_quota_load_balancer_max_count: GaugeFamily::new(
                "ovh_quota_load_balancer_max_count",
                "Load balancer max count",
                &QUOTA_LABELS,
            ),

            ovh_quota_keymanager_secret_count: GaugeFamily::new(
                "ovh_quota_keymanager_secret_count",
                "Key manager count",
                &QUOTA_LABELS,
            ),
            ovh_quota_keymanager_secret_max_count: GaugeFamily::new(
                "ovh_quota_keymanager_secret_max_count",
                "Key manager max count",
                &QUOTA_LABELS,
            ),

            ovh_storage_object_count: GaugeFamily::new(
                "ovh_storage_object_count",
                "Storage object count",
                &STORAGE_LABELS,
            ),
            ovh_storage_size_bytes: GaugeFamily::new(
                "ovh_storage_size_bytes",
                "Storage size in bytes",
                &STORAGE_LABELS,
            ),

            ovh_usage_instance_hours: GaugeFamily::new(
                "ovh_usage_instance_hours",
                "Instance usage in hours",
                &INSTANCE_USAGE_LABELS,
            ),
            ovh_usage_instance_price: GaugeFamily::new(
                "ovh_usage_instance_price",
                "Instance usage price",
                &INSTANCE_USAGE_LABELS,
            ),

            ovh_usage_volume_gb_hours: GaugeFamily::new(
                "ovh_usage_volume_gb_hours",
                "Volume usage in gb x hours",
                &VOLUME_USAGE_LABELS,
            ),
            ovh_usage_volume_price: GaugeFamily::new(
                "ovh_usage_volume_price",
                "Volume usage price",
                &VOLUME_USAGE_LABELS,
            ),

            ovh_usage_storage_price: GaugeFamily::new(
                "ovh_usage_storage_price",
                "Storage usage price",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_gb_hours: GaugeFamily::new(
                "ovh_usage_storage_gb_hours",
                "Storage usage in gb x hours",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_bandwidth_internal_outgoing_price: GaugeFamily::new(
                "ovh_usage_storage_bandwidth_internal_outgoing_price",
                "Storage usage internal outgoing bandwidth price",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_bandwidth_internal_outgoing_gb_hours: GaugeFamily::new(
                "ovh_usage_storage_bandwidth_internal_outgoing_gb_hours",
                "Storage usage internal outgoing bandwidth in gb x hours",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_bandwidth_internal_incoming_price: GaugeFamily::new(
                "ovh_usage_storage_bandwidth_internal_incoming_price",
                "Storage usage internal incoming bandwidth price",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_bandwidth_internal_incoming_gb_hours: GaugeFamily::new(
                "ovh_usage_storage_bandwidth_internal_incoming_gb_hours",
                "Storage usage internal incoming bandwidth in gb x hours",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_bandwidth_external_outgoing_price: GaugeFamily::new(
                "ovh_usage_storage_bandwidth_external_outgoing_price",
                "Storage usage external outgoing bandwidth price",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_bandwidth_external_outgoing_gb_hours: GaugeFamily::new(
                "ovh_usage_storage_bandwidth_external_outgoing_gb_hours",
                "Storage usage external outgoing bandwidth in gb x hours",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_bandwidth_external_incoming_price: GaugeFamily::new(
                "ovh_usage_storage_bandwidth_external_incoming_price",
                "Storage usage external incoming bandwidth price",
                &STORAGE_USAGE_LABELS,
            ),
            ovh_usage_storage_bandwidth_external_incoming_gb_hours: GaugeFamily::new(
                "ovh_usage_storage_bandwidth_external_incoming_gb_hours",
                "Storage usage external incoming bandwidth in gb x hours",
                &STORAGE_USAGE_LABELS,
            ),
        }
    }

    /// Descriptors of the whole catalog, used when registering the collector.
    pub fn descs() -> Result<Vec<Desc>, Box<dyn Error>> {
        Self::new().into_gauges().iter().map(|g| g.desc()).collect()
    }

    pub fn into_families(self) -> Vec<MetricFamily> {
        self.into_gauges().into_iter().map(|g| g.into_family()).collect()
    }

    /// All families in exposition order.
    fn into_gauges(self) -> Vec<GaugeFamily> {
        vec![
            self.ovh_volume_size_gb,
            self.ovh_quota_instance_count,
            self.ovh_quota_instance_max_count,
            self.ovh_quota_cpu_count,
            self.ovh_quota_cpu_max_count,
            self.ovh_quota_ram_gb,
            self.ovh_quota_ram_max_gb,
            self.ovh_quota_volume_gb,
            self.ovh_quota_volume_max_gb,
            self.ovh_quota_volume_count,
            self.ovh_quota_volume_max_count,
            self.ovh_quota_volume_backup_gb,
            self.ovh_quota_volume_backup_max_gb,
            self.ovh_quota_volume_backup_count,
            self.ovh_quota_volume_backup_max_count,
            self.ovh_quota_network_count,
            self.ovh_quota_network_max_count,
            self.ovh_quota_network_subnet_count,
            self.ovh_quota_network_subnet_max_count,
            self.ovh_quota_network_floating_ip_count,
            self.ovh_quota_network_floating_ip_max_count,
            self.ovh_quota_network_gateway_count,
            self.ovh_quota_network_gateway_max_count,
            self.ovh_quota_load_balancer_count,
            self.ovh_quota_load_balancer_max_count,
            self.ovh_quota_keymanager_secret_count,
            self.ovh_quota_keymanager_secret_max_count,
            self.ovh_storage_object_count,
            self.ovh_storage_size_bytes,
            self.ovh_usage_instance_hours,
            self.ovh_usage_instance_price,
            self.ovh_usage_volume_gb_hours,
            self.ovh_usage_volume_price,
            self.ovh_usage_storage_price,
            self.ovh_usage_storage_gb_hours,
            self.ovh_usage_storage_bandwidth_internal_outgoing_price,
            self.ovh_usage_storage_bandwidth_internal_outgoing_gb_hours,
            self.ovh_usage_storage_bandwidth_internal_incoming_price,
            self.ovh_usage_storage_bandwidth_internal_incoming_gb_hours,
            self.ovh_usage_storage_bandwidth_external_outgoing_price,
            self.ovh_usage_storage_bandwidth_external_outgoing_gb_hours,
            self.ovh_usage_storage_bandwidth_external_incoming_price,
            self.ovh_usage_storage_bandwidth_external_incoming_gb_hours,
        ]
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
