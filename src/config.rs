use std::net::SocketAddr;

use thiserror::Error;

use crate::db_mongo::connection::ConnectionConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_TEMPLATE_COLLECTION: &str = "project";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_url: String,
    pub mongodb_name: String,
    pub template_collection: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count
    /// as unset.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongodb_url = get("MONGODB_URL").ok_or(ConfigError::Missing("MONGODB_URL"))?;
        let mongodb_name = get("MONGODB_NAME").ok_or(ConfigError::Missing("MONGODB_NAME"))?;

        let template_collection = get("TEMPLATE_COLLECTION")
            .unwrap_or_else(|| DEFAULT_TEMPLATE_COLLECTION.to_string());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        Ok(Self {
            mongodb_url,
            mongodb_name,
            template_collection,
            bind_addr,
        })
    }

    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig::new(&self.mongodb_url, &self.mongodb_name)
    }
}
