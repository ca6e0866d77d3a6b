use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::features::network::NetworkInformation;
use crate::features::system_metrics::{
    CpuInformation, DiskInformation, MemoryInformation, SystemInformation,
};
use crate::shared::error::CollectionError;

/// Client-reported fields copied from the request body, in the order they
/// are checked.
pub const CLIENT_FIELDS: [&str; 9] = [
    "timestamp",
    "browser_language",
    "screen_width",
    "screen_height",
    "timezone",
    "battery_level",
    "ip",
    "latitude",
    "longitude",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Every client field must be present; `null` values are accepted.
    #[default]
    Strict,
    /// Missing client fields are stored as `null`.
    Lenient,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "lenient" => Ok(ValidationMode::Lenient),
            other => Err(format!("expected `strict` or `lenient`, got `{other}`")),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Strict => f.write_str("strict"),
            ValidationMode::Lenient => f.write_str("lenient"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientDetailsError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// The known client fields of one request. Unknown body keys are dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientDetails(Map<String, Value>);

impl ClientDetails {
    pub fn from_payload(payload: Value, mode: ValidationMode) -> Result<Self, ClientDetailsError> {
        let Value::Object(mut body) = payload else {
            return Err(ClientDetailsError::NotAnObject);
        };

        let mut fields = Map::with_capacity(CLIENT_FIELDS.len());
        for field in CLIENT_FIELDS {
            match (body.remove(field), mode) {
                (Some(value), _) => {
                    fields.insert(field.to_string(), value);
                }
                (None, ValidationMode::Strict) => {
                    return Err(ClientDetailsError::MissingField(field));
                }
                (None, ValidationMode::Lenient) => {
                    fields.insert(field.to_string(), Value::Null);
                }
            }
        }

        Ok(Self(fields))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One telemetry group: either the collected data or an error placeholder
/// that takes its place in the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    Failed { error: String },
    Collected(T),
}

impl<T> Section<T> {
    pub fn from_result(result: Result<T, CollectionError>, group: &str) -> Self {
        match result {
            Ok(value) => Section::Collected(value),
            Err(e) => {
                error!("Error fetching {group}: {e}");
                Section::Failed { error: format!("Could not fetch {group}: {e}") }
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Section::Failed { .. })
    }

    pub fn collected(&self) -> Option<&T> {
        match self {
            Section::Collected(value) => Some(value),
            Section::Failed { .. } => None,
        }
    }
}

/// Everything the host contributes to a record.
#[derive(Debug, Clone, Serialize)]
pub struct HostTelemetry {
    pub system_info: Section<SystemInformation>,
    pub cpu_info: Section<CpuInformation>,
    pub memory_info: Section<MemoryInformation>,
    pub disk_info: Section<DiskInformation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_info: Option<Section<Vec<NetworkInformation>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_info: Option<Section<Value>>,
}

impl HostTelemetry {
    pub fn failed_groups(&self) -> usize {
        [
            self.system_info.is_failed(),
            self.cpu_info.is_failed(),
            self.memory_info.is_failed(),
            self.disk_info.is_failed(),
            self.network_info.as_ref().is_some_and(Section::is_failed),
            self.public_ip_info.as_ref().is_some_and(Section::is_failed),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

/// The document persisted for each request. Serializes flat: client fields
/// and telemetry groups share the top level.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    #[serde(flatten)]
    pub client: ClientDetails,
    pub user_agent: Option<String>,
    #[serde(flatten)]
    pub telemetry: HostTelemetry,
    pub session_id: String,
    pub logged_at: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(
        client: ClientDetails,
        user_agent: Option<String>,
        telemetry: HostTelemetry,
    ) -> Self {
        Self {
            client,
            user_agent,
            telemetry,
            session_id: Uuid::new_v4().to_string(),
            logged_at: Utc::now(),
        }
    }
}
