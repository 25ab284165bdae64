//! Text rendering for resources, users and dashboard counters.

use std::collections::{BTreeMap, BTreeSet};

use comfy_table::Table;
use invctl_core::permissions::Action;
use invctl_core::users::UserAccount;
use invctl_core::views::DashboardStats;
use invctl_core::{Resource, ResourceStatus, ResourceType};

const EMPTY: &str = "-";

fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(EMPTY)
        .to_string()
}

/// Comma-separated verbs, or a read-only note when there are none.
pub fn actions(actions: &BTreeSet<Action>) -> String {
    if actions.is_empty() {
        return "none (read-only)".to_string();
    }
    actions
        .iter()
        .map(Action::verb)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn resource_table(resources: &[Resource]) -> Table {
    let mut table = Table::new();
    table.set_header([
        "ID",
        "Name",
        "Type",
        "Serial / Plate",
        "Location",
        "Status",
        "Acquired",
        "Last maintenance",
    ]);
    for resource in resources {
        let identifier = resource
            .serial_number
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(resource.plate.as_deref());
        table.add_row([
            resource.id.to_string(),
            resource.name.clone(),
            resource.resource_type.label().to_string(),
            or_dash(identifier),
            resource.location.clone(),
            resource.status.label().to_string(),
            resource.acquisition_date.to_string(),
            resource
                .last_maintenance_date
                .map_or_else(|| EMPTY.to_string(), |d| d.to_string()),
        ]);
    }
    table
}

pub fn stats_table(stats: &DashboardStats) -> Table {
    let mut table = Table::new();
    table.set_header(["Total", "Active", "In use", "Under maintenance"]);
    table.add_row([
        stats.total.to_string(),
        stats.active.to_string(),
        stats.in_use.to_string(),
        stats.under_maintenance.to_string(),
    ]);
    table
}

pub fn type_counts_table(counts: &BTreeMap<ResourceType, usize>) -> Table {
    let mut table = Table::new();
    table.set_header(["Type", "Count"]);
    for (resource_type, count) in counts {
        table.add_row([resource_type.label().to_string(), count.to_string()]);
    }
    table
}

pub fn status_counts_table(counts: &BTreeMap<ResourceStatus, usize>) -> Table {
    let mut table = Table::new();
    table.set_header(["Status", "Count"]);
    for (status, count) in counts {
        table.add_row([status.label().to_string(), count.to_string()]);
    }
    table
}

pub fn maintenance_table(resources: &[&Resource]) -> Table {
    let mut table = Table::new();
    table.set_header(["ID", "Name", "Location", "Last maintenance"]);
    for resource in resources {
        table.add_row([
            resource.id.to_string(),
            resource.name.clone(),
            resource.location.clone(),
            resource
                .last_maintenance_date
                .map_or_else(|| EMPTY.to_string(), |d| d.to_string()),
        ]);
    }
    table
}

pub fn user_table(users: &[UserAccount]) -> Table {
    let mut table = Table::new();
    table.set_header(["ID", "Username", "Name", "Role", "Email"]);
    for user in users {
        table.add_row([
            user.id.to_string(),
            user.username.clone(),
            user.display_name.clone(),
            user.role.label().to_string(),
            or_dash(user.email.as_deref()),
        ]);
    }
    table
}
