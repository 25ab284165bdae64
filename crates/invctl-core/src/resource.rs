//! Inventory resources and the form-input draft used to write them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ClientError, ClientResult};

/// Server-assigned resource identifier.
pub type ResourceId = i64;

/// Wire and input format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    #[serde(alias = "equipamento")]
    Equipment,
    #[serde(alias = "veiculo")]
    Vehicle,
    #[serde(alias = "dispositivo_seguranca")]
    SecurityDevice,
    #[serde(alias = "ferramenta")]
    Tool,
}

impl ResourceType {
    pub fn all() -> &'static [ResourceType] {
        &[
            ResourceType::Equipment,
            ResourceType::Vehicle,
            ResourceType::SecurityDevice,
            ResourceType::Tool,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            ResourceType::Equipment => "equipment",
            ResourceType::Vehicle => "vehicle",
            ResourceType::SecurityDevice => "security_device",
            ResourceType::Tool => "tool",
        }
    }

    /// Identifier the server accepts on create and update.
    pub fn server_id(&self) -> &'static str {
        match self {
            ResourceType::Equipment => "equipamento",
            ResourceType::Vehicle => "veiculo",
            ResourceType::SecurityDevice => "dispositivo_seguranca",
            ResourceType::Tool => "ferramenta",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Equipment => "Equipment",
            ResourceType::Vehicle => "Vehicle",
            ResourceType::SecurityDevice => "Security Device",
            ResourceType::Tool => "Tool",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "equipment" | "equipamento" => Ok(ResourceType::Equipment),
            "vehicle" | "veiculo" => Ok(ResourceType::Vehicle),
            "security_device" | "dispositivo_seguranca" => Ok(ResourceType::SecurityDevice),
            "tool" | "ferramenta" => Ok(ResourceType::Tool),
            other => Err(format!(
                "Invalid resource type: {other}. Expected equipment, vehicle, security_device or tool."
            )),
        }
    }
}

/// Resource status as the server reports it.
///
/// The server validates the vocabulary, and two overlapping sets are in
/// use (`available`/`in_use`/`under_maintenance` and `active`/`inactive`,
/// each also in Portuguese), so the value is kept as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceStatus(String);

impl ResourceStatus {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human label for known values, the raw value otherwise.
    pub fn label(&self) -> &str {
        match self.0.as_str() {
            "available" | "disponivel" => "Available",
            "in_use" | "em_uso" => "In Use",
            "under_maintenance" | "em_manutencao" => "Under Maintenance",
            "active" | "ativo" => "Active",
            "inactive" | "inativo" => "Inactive",
            other => other,
        }
    }

    pub fn is_under_maintenance(&self) -> bool {
        matches!(self.0.as_str(), "under_maintenance" | "em_manutencao")
    }

    pub fn is_in_use(&self) -> bool {
        matches!(self.0.as_str(), "in_use" | "em_uso")
    }

    pub fn is_active(&self) -> bool {
        matches!(self.0.as_str(), "active" | "ativo")
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inventory item as mirrored from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub plate: Option<String>,
    pub location: String,
    pub status: ResourceStatus,
    #[serde(deserialize_with = "de_date")]
    pub acquisition_date: NaiveDate,
    #[serde(default, deserialize_with = "de_optional_date")]
    pub last_maintenance_date: Option<NaiveDate>,
}

impl Resource {
    /// Prefills a draft with this resource's fields, for editing.
    pub fn to_draft(&self) -> ResourceDraft {
        ResourceDraft {
            name: self.name.clone(),
            resource_type: self.resource_type.id().to_string(),
            serial_number: self.serial_number.clone().unwrap_or_default(),
            plate: self.plate.clone().unwrap_or_default(),
            location: self.location.clone(),
            status: self.status.as_str().to_string(),
            acquisition_date: self.acquisition_date.format(DATE_FORMAT).to_string(),
            last_maintenance_date: self
                .last_maintenance_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

/// Raw form input for creating or editing a resource.
///
/// Empty optional fields are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDraft {
    pub name: String,
    pub resource_type: String,
    pub serial_number: String,
    pub plate: String,
    pub location: String,
    pub status: String,
    pub acquisition_date: String,
    pub last_maintenance_date: String,
}

impl ResourceDraft {
    /// Checks required fields and formats, producing the wire payload.
    ///
    /// # Errors
    /// Returns a `Validation` error naming the missing or malformed fields.
    pub fn validate(&self) -> ClientResult<ResourcePayload> {
        let required = [
            ("name", self.name.trim()),
            ("type", self.resource_type.trim()),
            ("location", self.location.trim()),
            ("status", self.status.trim()),
            ("acquisition date", self.acquisition_date.trim()),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ClientError::validation(format!(
                "Please fill in all required fields (name, type, location, status, acquisition date). Missing: {}.",
                missing.join(", ")
            )));
        }

        let resource_type = self
            .resource_type
            .parse::<ResourceType>()
            .map_err(ClientError::validation)?;
        let acquisition_date = parse_date(&self.acquisition_date, "acquisition date")?;
        let last_maintenance_date = match non_empty(&self.last_maintenance_date) {
            Some(raw) => Some(parse_date(&raw, "last maintenance date")?),
            None => None,
        };

        Ok(ResourcePayload {
            name: self.name.trim().to_string(),
            resource_type,
            serial_number: non_empty(&self.serial_number),
            plate: non_empty(&self.plate),
            location: self.location.trim().to_string(),
            status: ResourceStatus::new(self.status.trim()),
            acquisition_date,
            last_maintenance_date,
        })
    }
}

/// Validated create/update body, in the server's type vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourcePayload {
    pub name: String,
    #[serde(rename = "type", serialize_with = "ser_server_type")]
    pub resource_type: ResourceType,
    pub serial_number: Option<String>,
    pub plate: Option<String>,
    pub location: String,
    pub status: ResourceStatus,
    pub acquisition_date: NaiveDate,
    pub last_maintenance_date: Option<NaiveDate>,
}

impl ResourcePayload {
    pub fn into_resource(self, id: ResourceId) -> Resource {
        Resource {
            id,
            name: self.name,
            resource_type: self.resource_type,
            serial_number: self.serial_number,
            plate: self.plate,
            location: self.location,
            status: self.status,
            acquisition_date: self.acquisition_date,
            last_maintenance_date: self.last_maintenance_date,
        }
    }
}

/// Response to a create call. Servers differ in whether they echo the
/// record or only its id.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateResourceResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub resource: Option<Resource>,
    #[serde(default, rename = "resourceId", alias = "resource_id", alias = "id")]
    pub resource_id: Option<ResourceId>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(raw: &str, field: &str) -> ClientResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        ClientError::validation(format!(
            "Invalid format for {field}: {}. Use YYYY-MM-DD.",
            raw.trim()
        ))
    })
}

fn ser_server_type<S>(resource_type: &ResourceType, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(resource_type.server_id())
}

/// Accepts `YYYY-MM-DD` with an optional trailing time part.
fn parse_wire_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part.trim(), DATE_FORMAT)
}

fn de_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_wire_date(&raw).map_err(serde::de::Error::custom)
}

fn de_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_wire_date(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
