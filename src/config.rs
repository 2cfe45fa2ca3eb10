//! # Configuration Module
//!
//! Runtime settings read from the environment and route definition files
//! consumed by the `routepat` CLI.
//!
//! ## Environment Variables
//!
//! ### `ROUTEPAT_LOG`
//!
//! Log filter used when `RUST_LOG` is not set, e.g. `info` or
//! `routepat=trace`. Default: `info`.
//!
//! ### `ROUTEPAT_LOG_FORMAT`
//!
//! `pretty` (default) or `json`. Logs go to stderr; command output goes to
//! stdout.
//!
//! ### `ROUTEPAT_SLOW_MATCH_US`
//!
//! Matches taking longer than this many microseconds are logged as warnings.
//! Accepts decimal (`1000`) or hexadecimal (`0x3e8`). Default: `1000`.
//!
//! ## Route Files
//!
//! YAML (`.yaml`/`.yml`), TOML (`.toml`) or JSON (anything else):
//!
//! ```yaml
//! routes:
//!   - name: default
//!     template: "{controller=Home}/{action=Index}/{id?}"
//!     constraints:
//!       id: ["int"]
//!   - name: admin
//!     template: "Admin/{controller}/{action}"
//!     defaults:
//!       area: Admin
//!     required_values:
//!       area: Admin
//!       controller: "*any*"
//! ```
//!
//! A required value of `null` is an explicit null and `"*any*"` is
//! [`RequiredValue::Any`].

use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::parser::parse_with;
use crate::pattern::{
    NameMap, PolicyReference, RequiredValue, RequiredValues, RoutePattern, RoutePatternError,
};

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Log format: pretty for terminals, JSON for log collectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Fallback log filter (default: `info`)
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Threshold above which a match is reported as slow (default: 1 ms)
    pub slow_match: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::default(),
            slow_match: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_filter = lookup("ROUTEPAT_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let log_format = lookup("ROUTEPAT_LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();
        let slow_match_us = lookup("ROUTEPAT_SLOW_MATCH_US")
            .and_then(|v| parse_number(&v))
            .unwrap_or(DEFAULT_SLOW_MATCH_US);
        RuntimeConfig {
            log_filter,
            log_format,
            slow_match: Duration::from_micros(slow_match_us),
        }
    }
}

fn parse_number(value: &str) -> Option<u64> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Top level of a route definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFile {
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

/// One route template with its out-of-line settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub template: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, String>,
    /// Constraint texts per parameter, e.g. `id: ["int", "min(1)"]`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub constraints: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub required_values: BTreeMap<String, Option<String>>,
}

impl RouteDefinition {
    /// Label used in logs and reports: the name, else the template.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.template)
    }

    /// Parse the template and merge the out-of-line settings into it.
    ///
    /// # Errors
    ///
    /// Returns the parse or validation error for the template.
    pub fn to_pattern(&self) -> Result<RoutePattern, RoutePatternError> {
        let defaults: NameMap<String> = self
            .defaults
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        let policies: NameMap<Vec<PolicyReference>> = self
            .constraints
            .iter()
            .map(|(k, list)| {
                (
                    k.as_str(),
                    list.iter().map(|c| PolicyReference::text(c.as_str())).collect(),
                )
            })
            .collect();
        let required: RequiredValues = self
            .required_values
            .iter()
            .map(|(k, v)| (k.as_str(), required_value_from(v.as_deref())))
            .collect();
        parse_with(&self.template, defaults, policies, required)
    }
}

/// Map file and command-line text to a [`RequiredValue`].
#[must_use]
pub fn required_value_from(text: Option<&str>) -> RequiredValue {
    match text {
        None => RequiredValue::Null,
        Some(RequiredValue::ANY_TEXT) => RequiredValue::Any,
        Some(value) => RequiredValue::value(value),
    }
}

/// Load a route file, choosing the format by extension.
///
/// # Errors
///
/// Fails when the file cannot be read or does not deserialize.
pub fn load_routes(path: impl AsRef<Path>) -> anyhow::Result<RouteFile> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route file {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let file: RouteFile = match extension.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(file)
}
