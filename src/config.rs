//! Configuration management for athena-query.
//!
//! Handles loading configuration from a TOML file and environment variables.
//! The resolved configuration is read-only and handed to every query.

use crate::error::{AthenaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Catalog used when neither the request nor the environment names one.
pub const DEFAULT_CATALOG: &str = "AwsDataCatalog";

/// Workgroup used when neither the request nor the environment names one.
pub const DEFAULT_WORKGROUP: &str = "primary";

/// Region used when nothing else is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Athena connection and query defaults.
    #[serde(default)]
    pub athena: AthenaConfig,
}

/// Athena connection settings and per-query defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthenaConfig {
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,

    /// Default data catalog. An empty string means "send no catalog".
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Default database.
    pub database: Option<String>,

    /// Default workgroup.
    #[serde(default = "default_workgroup")]
    pub workgroup: String,

    /// Default S3 location for query output.
    pub output_location: Option<String>,

    /// Stop the remote execution when the wait deadline passes.
    #[serde(default)]
    pub cancel_on_timeout: bool,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_catalog() -> String {
    DEFAULT_CATALOG.to_string()
}

fn default_workgroup() -> String {
    DEFAULT_WORKGROUP.to_string()
}

impl Default for AthenaConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            catalog: default_catalog(),
            database: None,
            workgroup: default_workgroup(),
            output_location: None,
            cancel_on_timeout: false,
        }
    }
}

/// Settings given on the command line. They win over every other source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub region: Option<String>,
    pub cancel_on_timeout: bool,
}

impl AthenaConfig {
    /// Applies variables from a lookup over the current values.
    ///
    /// Reads `AWS_REGION`, `ATHENA_CATALOG`, `ATHENA_DATABASE`,
    /// `ATHENA_WORKGROUP`, `ATHENA_OUTPUT_LOCATION` and
    /// `ATHENA_CANCEL_ON_TIMEOUT`.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(region) = lookup("AWS_REGION") {
            self.region = region;
        }
        if let Some(catalog) = lookup("ATHENA_CATALOG") {
            self.catalog = catalog;
        }
        if let Some(database) = lookup("ATHENA_DATABASE") {
            self.database = Some(database);
        }
        if let Some(workgroup) = lookup("ATHENA_WORKGROUP") {
            self.workgroup = workgroup;
        }
        if let Some(location) = lookup("ATHENA_OUTPUT_LOCATION") {
            self.output_location = Some(location);
        }
        if let Some(flag) = lookup("ATHENA_CANCEL_ON_TIMEOUT") {
            self.cancel_on_timeout = parse_bool(&flag).ok_or_else(|| {
                AthenaError::config(format!(
                    "ATHENA_CANCEL_ON_TIMEOUT must be true or false, got '{flag}'"
                ))
            })?;
        }
        Ok(())
    }

    /// Applies command-line overrides. `cancel_on_timeout` can only be
    /// switched on from the command line.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(region) = &overrides.region {
            self.region = region.clone();
        }
        if overrides.cancel_on_timeout {
            self.cancel_on_timeout = true;
        }
    }

    /// Returns non-fatal problems worth logging at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match self.output_location.as_deref().filter(|l| !l.is_empty()) {
            None => warnings.push(
                "ATHENA_OUTPUT_LOCATION not set. This may be required for some queries."
                    .to_string(),
            ),
            Some(location) => match Url::parse(location) {
                Ok(url) if url.scheme() == "s3" => {}
                _ => warnings.push(format!(
                    "Output location '{location}' doesn't use the s3:// scheme"
                )),
            },
        }

        if self.region.is_empty() {
            warnings.push("AWS region is empty".to_string());
        }

        warnings
    }

    /// Returns a one-line summary for logging.
    pub fn display_string(&self) -> String {
        format!(
            "region={} catalog={} database={} workgroup={}",
            self.region,
            self.catalog,
            self.database.as_deref().unwrap_or("Not set"),
            self.workgroup
        )
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("athena-query")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AthenaError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Builds the Athena settings with precedence: overrides, variables from
    /// `lookup`, the config file at `path`, built-in defaults.
    pub fn resolve<F>(path: &Path, lookup: F, overrides: &Overrides) -> Result<AthenaConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_from_file(path)?.athena;
        config.apply_vars(lookup)?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AthenaError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
