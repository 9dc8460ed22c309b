//! Data source configuration
//!
//! A data source is configured as `{ "engine": "<name>", ...engineOptions }`.
//! Every key other than `engine` is handed verbatim to the engine factory.

use crate::entity::Record;
use crate::error::{Result, StorageError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Registry name used when none is given
pub const DEFAULT_DATA_SOURCE: &str = "main";

/// Engine-specific options, forwarded as-is
pub type EngineOptions = Record;

/// Configuration of one data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Engine identifier, resolved against the registered engine factories
    pub engine: String,
    #[serde(flatten)]
    pub options: EngineOptions,
}

impl DataSourceConfig {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            options: EngineOptions::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| StorageError::invalid_configuration(format!("data source: {}", e)))
    }

    pub fn into_parts(self) -> (String, EngineOptions) {
        (self.engine, self.options)
    }
}

/// Named data source configurations, e.g. loaded from a settings file:
///
/// ```json
/// {
///   "main": { "engine": "postgres", "url": "postgres://localhost/app" },
///   "cache": { "engine": "redis", "url": "redis://localhost:6379" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSourcesConfig {
    pub sources: BTreeMap<String, DataSourceConfig>,
}

impl DataSourcesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, name: impl Into<String>, config: DataSourceConfig) -> Self {
        self.sources.insert(name.into(), config);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| StorageError::invalid_configuration(format!("data sources: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn get(&self, name: &str) -> Option<&DataSourceConfig> {
        self.sources.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Parse engine options into an engine's own settings type
pub fn parse_options<O: DeserializeOwned>(options: EngineOptions) -> Result<O> {
    serde_json::from_value(Value::Object(options))
        .map_err(|e| StorageError::invalid_configuration(format!("engine options: {}", e)))
}
