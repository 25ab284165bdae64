//! Dashboard: headline counters and breakdowns of the inventory.

use anyhow::{Context, Result};
use invctl_core::Config;
use invctl_core::views::{self, DashboardStats};

use super::{open_client, require_session};
use crate::render;

pub async fn show(config: &Config) -> Result<()> {
    let mut client = open_client(config)?;
    let session = require_session(&mut client)?;
    let resources = client.list_resources().await.context("load resources")?;

    println!("Welcome, {}", session.headline());
    println!();
    println!("{}", render::stats_table(&DashboardStats::from_resources(resources)));
    println!();
    println!("By type");
    println!("{}", render::type_counts_table(&views::count_by_type(resources)));
    println!();
    println!("By status");
    println!(
        "{}",
        render::status_counts_table(&views::count_by_status(resources))
    );
    println!();

    let in_maintenance = views::under_maintenance(resources);
    if in_maintenance.is_empty() {
        println!("No resources under maintenance.");
    } else {
        println!("Under maintenance");
        println!("{}", render::maintenance_table(&in_maintenance));
    }
    Ok(())
}
