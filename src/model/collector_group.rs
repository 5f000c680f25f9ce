use crate::model::Endpoint;
use serde::{Deserialize, Serialize};

/// A set of metrics that's extracted in one pass over a project snapshot.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
pub enum CollectorGroup {
    Volume,
    QuotaInstance,
    QuotaVolume,
    QuotaNetwork,
    QuotaLoadBalancer,
    QuotaKeymanager,
    Storage,
    UsageInstance,
    UsageVolume,
    UsageStorage,
}

impl CollectorGroup {
    pub const ALL: [CollectorGroup; 10] = [
        CollectorGroup::Volume,
        CollectorGroup::QuotaInstance,
        CollectorGroup::QuotaVolume,
        CollectorGroup::QuotaNetwork,
        CollectorGroup::QuotaLoadBalancer,
        CollectorGroup::QuotaKeymanager,
        CollectorGroup::Storage,
        CollectorGroup::UsageInstance,
        CollectorGroup::UsageVolume,
        CollectorGroup::UsageStorage,
    ];

    pub fn endpoints(&self) -> &'static [Endpoint] {
        match self {
            CollectorGroup::Volume => &[Endpoint::Volume],
            CollectorGroup::QuotaInstance
            | CollectorGroup::QuotaVolume
            | CollectorGroup::QuotaNetwork
            | CollectorGroup::QuotaLoadBalancer
            | CollectorGroup::QuotaKeymanager => &[Endpoint::Quota],
            CollectorGroup::Storage => &[Endpoint::Storage],
            CollectorGroup::UsageInstance | CollectorGroup::UsageVolume | CollectorGroup::UsageStorage => {
                &[Endpoint::Usage]
            }
        }
    }
}

/// Endpoints needed by `groups`, each once, in order of first use.
pub fn endpoints_for(groups: &[CollectorGroup]) -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = vec![];
    for endpoint in groups.iter().flat_map(|g| g.endpoints()) {
        if !endpoints.contains(endpoint) {
            endpoints.push(*endpoint);
        }
    }
    endpoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn endpoints_for_all_groups_covers_every_endpoint_once() {
        check!(
            endpoints_for(&CollectorGroup::ALL)
                == vec![Endpoint::Volume, Endpoint::Quota, Endpoint::Storage, Endpoint::Usage]
        );
    }

    #[test]
    fn endpoints_for_quota_groups_only_needs_quota() {
        check!(
            endpoints_for(&[CollectorGroup::QuotaNetwork, CollectorGroup::QuotaKeymanager]) == vec![Endpoint::Quota]
        );
    }

    #[test]
    fn endpoints_for_no_groups_is_empty() {
        check!(endpoints_for(&[]).is_empty());
    }

    #[test]
    fn deserialize_snake_case_names() {
        let groups: Vec<CollectorGroup> =
            serde_yaml::from_str("[quota_load_balancer, quota_keymanager, usage_storage]").unwrap();

        check!(
            groups
                == vec![
                    CollectorGroup::QuotaLoadBalancer,
                    CollectorGroup::QuotaKeymanager,
                    CollectorGroup::UsageStorage
                ]
        );
    }
}
