use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use url::Url;

use crate::features::user_details::ValidationMode;
use crate::shared::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    MongoDb {
        uri: String,
        database: String,
        collection: String,
    },
    Elasticsearch {
        url: String,
        index: String,
        username: Option<String>,
        password: Option<String>,
    },
    Memory,
}

impl StoreConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreConfig::MongoDb { .. } => "mongodb",
            StoreConfig::Elasticsearch { .. } => "elasticsearch",
            StoreConfig::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub static_dir: PathBuf,
    pub validation_mode: ValidationMode,
    pub cpu_sample: Duration,
    pub collect_network: bool,
    pub public_ip_lookup: Option<Url>,
    pub public_ip_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store = match var("LOG_STORE").as_deref().unwrap_or("mongodb") {
            "mongodb" => StoreConfig::MongoDb {
                uri: var("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?,
                database: var("MONGODB_DATABASE").unwrap_or_else(|| "user_logs".to_string()),
                collection: var("MONGODB_COLLECTION").unwrap_or_else(|| "logs".to_string()),
            },
            "elasticsearch" => StoreConfig::Elasticsearch {
                url: var("ELASTICSEARCH_URL")
                    .unwrap_or_else(|| "http://localhost:9200".to_string()),
                index: var("ELASTICSEARCH_INDEX").unwrap_or_else(|| "user_logs".to_string()),
                username: var("ELASTICSEARCH_USERNAME"),
                password: var("ELASTICSEARCH_PASSWORD"),
            },
            "memory" => StoreConfig::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "LOG_STORE",
                    message: format!("expected mongodb, elasticsearch or memory, got `{other}`"),
                })
            }
        };

        let public_ip_lookup = var("PUBLIC_IP_LOOKUP_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                    key: "PUBLIC_IP_LOOKUP_URL",
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", 5000)?,
            store,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            validation_mode: parse_or(&var, "VALIDATION_MODE", ValidationMode::Strict)?,
            cpu_sample: Duration::from_millis(parse_or(&var, "CPU_SAMPLE_MS", 1000)?),
            collect_network: parse_flag(&var, "COLLECT_NETWORK_INTERFACES")?,
            public_ip_lookup,
            public_ip_timeout: Duration::from_secs(parse_or(&var, "PUBLIC_IP_TIMEOUT_SECS", 5)?),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_flag<F>(var: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
        None | Some("0" | "false" | "no" | "off") => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some(other) => Err(ConfigError::Invalid {
            key,
            message: format!("expected a boolean, got `{other}`"),
        }),
    }
}
