//! Dashboard views over a cached resource collection.
//!
//! Pure functions; nothing here touches the network.

use std::collections::BTreeMap;

use crate::resource::{Resource, ResourceStatus, ResourceType};

/// Number of resources per status value.
pub fn count_by_status(resources: &[Resource]) -> BTreeMap<ResourceStatus, usize> {
    let mut counts = BTreeMap::new();
    for resource in resources {
        *counts.entry(resource.status.clone()).or_insert(0) += 1;
    }
    counts
}

/// Number of resources per type.
pub fn count_by_type(resources: &[Resource]) -> BTreeMap<ResourceType, usize> {
    let mut counts = BTreeMap::new();
    for resource in resources {
        *counts.entry(resource.resource_type).or_insert(0) += 1;
    }
    counts
}

/// Resources currently under maintenance, in server order.
pub fn under_maintenance(resources: &[Resource]) -> Vec<&Resource> {
    resources
        .iter()
        .filter(|r| r.status.is_under_maintenance())
        .collect()
}

/// Headline counters shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub in_use: usize,
    pub under_maintenance: usize,
}

impl DashboardStats {
    pub fn from_resources(resources: &[Resource]) -> Self {
        resources.iter().fold(
            DashboardStats {
                total: resources.len(),
                ..Default::default()
            },
            |mut stats, r| {
                if r.status.is_active() {
                    stats.active += 1;
                }
                if r.status.is_in_use() {
                    stats.in_use += 1;
                }
                if r.status.is_under_maintenance() {
                    stats.under_maintenance += 1;
                }
                stats
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn resource(id: i64, name: &str, resource_type: ResourceType, status: &str) -> Resource {
        Resource {
            id,
            name: name.to_string(),
            resource_type,
            serial_number: None,
            plate: None,
            location: "HQ".to_string(),
            status: ResourceStatus::new(status),
            acquisition_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            last_maintenance_date: None,
        }
    }

    fn sample() -> Vec<Resource> {
        vec![
            resource(1, "Drill", ResourceType::Tool, "available"),
            resource(2, "Tumbler", ResourceType::Vehicle, "under_maintenance"),
            resource(3, "Camera", ResourceType::SecurityDevice, "ativo"),
            resource(4, "Scanner", ResourceType::Equipment, "em_manutencao"),
            resource(5, "Wrench", ResourceType::Tool, "in_use"),
        ]
    }

    #[test]
    fn test_single_tool_counts_by_type() {
        let resources = vec![resource(1, "Drill", ResourceType::Tool, "available")];
        let counts = count_by_type(&resources);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&ResourceType::Tool), Some(&1));
    }

    #[test]
    fn test_counts_sum_to_collection_length() {
        let resources = sample();
        assert_eq!(count_by_type(&resources).values().sum::<usize>(), resources.len());
        assert_eq!(count_by_status(&resources).values().sum::<usize>(), resources.len());
    }

    #[test]
    fn test_counts_of_empty_collection() {
        assert!(count_by_type(&[]).is_empty());
        assert!(count_by_status(&[]).is_empty());
        assert_eq!(DashboardStats::from_resources(&[]), DashboardStats::default());
    }

    #[test]
    fn test_status_vocabularies_are_counted_separately() {
        let counts = count_by_status(&sample());
        assert_eq!(counts.get(&ResourceStatus::new("under_maintenance")), Some(&1));
        assert_eq!(counts.get(&ResourceStatus::new("em_manutencao")), Some(&1));
    }

    #[test]
    fn test_under_maintenance_keeps_server_order() {
        let resources = sample();
        let names: Vec<&str> = under_maintenance(&resources)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Tumbler", "Scanner"]);
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = DashboardStats::from_resources(&sample());
        assert_eq!(
            stats,
            DashboardStats {
                total: 5,
                active: 1,
                in_use: 1,
                under_maintenance: 2,
            }
        );
    }
}
