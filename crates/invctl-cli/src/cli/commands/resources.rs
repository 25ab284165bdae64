//! Resource command handlers.

use anyhow::{Context, Result};
use invctl_core::permissions::Action;
use invctl_core::{Config, Resource, ResourceDraft, ResourceId};
use tracing::debug;

use super::{confirm, ensure_permitted, open_client, require_session};
use crate::cli::ResourceFields;
use crate::render;

pub async fn list(config: &Config, json: bool) -> Result<()> {
    let mut client = open_client(config)?;
    require_session(&mut client)?;

    let resources = client.list_resources().await.context("list resources")?;
    if json {
        let out = serde_json::to_string_pretty(resources).context("serialize resources")?;
        println!("{out}");
    } else if resources.is_empty() {
        println!("No resources found.");
    } else {
        println!("{}", render::resource_table(resources));
    }
    Ok(())
}

pub async fn create(config: &Config, fields: &ResourceFields) -> Result<()> {
    let mut client = open_client(config)?;
    let session = require_session(&mut client)?;
    ensure_permitted(&session, Action::Create)?;

    let mut draft = ResourceDraft::default();
    apply_fields(&mut draft, fields);

    let resource = client
        .create_resource(&draft)
        .await
        .context("create resource")?;
    println!("Created resource {} ({}).", resource.id, resource.name);
    Ok(())
}

pub async fn update(config: &Config, id: ResourceId, fields: &ResourceFields) -> Result<()> {
    let mut client = open_client(config)?;
    let session = require_session(&mut client)?;
    ensure_permitted(&session, Action::Edit)?;

    // Start from the server's current record so omitted flags are kept.
    client.list_resources().await.context("load resources")?;
    let mut draft = client
        .cached_resource(id)
        .map(Resource::to_draft)
        .with_context(|| format!("Resource {id} not found."))?;
    apply_fields(&mut draft, fields);

    let resource = client
        .update_resource(id, &draft)
        .await
        .with_context(|| format!("update resource {id}"))?;
    println!("Updated resource {} ({}).", resource.id, resource.name);
    Ok(())
}

pub async fn delete(config: &Config, id: ResourceId, yes: bool) -> Result<()> {
    let mut client = open_client(config)?;
    let session = require_session(&mut client)?;
    ensure_permitted(&session, Action::Delete)?;

    if !yes {
        // Only needed to show the name in the prompt.
        client.list_resources().await.context("load resources")?;
    }
    let pending = client.stage_deletion(id);

    if !yes && !confirm(&format!("Delete {}?", pending.describe()))? {
        println!("Cancelled.");
        return Ok(());
    }

    debug!(id = pending.id(), "deletion confirmed");
    let message = client
        .confirm_deletion(pending)
        .await
        .with_context(|| format!("delete resource {id}"))?;
    println!("{message}");
    Ok(())
}

/// Overlays the given flags onto a draft.
fn apply_fields(draft: &mut ResourceDraft, fields: &ResourceFields) {
    let overlay = |target: &mut String, value: Option<&str>| {
        if let Some(value) = value {
            *target = value.to_string();
        }
    };
    overlay(&mut draft.name, fields.name.as_deref());
    overlay(&mut draft.resource_type, fields.resource_type.as_deref());
    overlay(&mut draft.serial_number, fields.serial_number.as_deref());
    overlay(&mut draft.plate, fields.plate.as_deref());
    overlay(&mut draft.location, fields.location.as_deref());
    overlay(&mut draft.status, fields.status.as_deref());
    overlay(&mut draft.acquisition_date, fields.acquisition_date.as_deref());
    overlay(
        &mut draft.last_maintenance_date,
        fields.last_maintenance_date.as_deref(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fields_keeps_omitted_values() {
        let mut draft = ResourceDraft {
            name: "Drill".to_string(),
            location: "Workshop".to_string(),
            plate: "ABC-1234".to_string(),
            ..Default::default()
        };
        let fields = ResourceFields {
            location: Some("Garage".to_string()),
            plate: Some(String::new()),
            ..Default::default()
        };

        apply_fields(&mut draft, &fields);

        assert_eq!(draft.name, "Drill");
        assert_eq!(draft.location, "Garage");
        assert!(draft.plate.is_empty());
    }
}
