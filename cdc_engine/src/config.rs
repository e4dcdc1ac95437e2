use std::fs::File;
use std::io::Read;
use std::path::Path;

use common::err::cdc_error::CdcError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Engine-wide configuration, loaded once at startup and shared by
/// reference with the processor. Mirrors the load-then-hold split this
/// lineage uses for its own `FConfig`/`RepConfig` pair, minus the parts
/// that belong to the external runner (connection host/port, etc).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Logical server name; becomes the partition identity of every
    /// emitted record and the key under which offsets are persisted.
    pub server_name: String,

    /// Path to the append-only DDL history file.
    pub history_path: String,

    /// Whether CREATE/DROP VIEW statements mutate the catalog. Off by
    /// default: views carry no row data of their own.
    #[serde(default)]
    pub include_views: bool,

    /// When set, UPDATE records additionally carry the before-image.
    #[serde(default)]
    pub emit_update_before_image: bool,

    /// Optional allow-list regex applied to `schema.table`; tables that
    /// don't match are dropped by the converter cache before a converter
    /// is ever built for them.
    #[serde(default)]
    pub table_filter: Option<String>,

    /// Whether DDL statements also produce a schema-change record on a
    /// dedicated topic, in addition to mutating the catalog.
    #[serde(default)]
    pub schema_change_topic_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            server_name: String::from("default"),
            history_path: String::from("/tmp/cdc_engine/history.jsonl"),
            include_views: false,
            emit_update_before_image: false,
            table_filter: None,
            schema_change_topic_enabled: false,
        }
    }
}

impl EngineConfig {
    /// Compiles `table_filter`, if present, into a `Regex`. Returns
    /// `ConfigError` rather than panicking on a malformed pattern so the
    /// caller can fail startup cleanly.
    pub fn compiled_table_filter(&self) -> Result<Option<Regex>, CdcError> {
        match &self.table_filter {
            None => Ok(None),
            Some(pattern) => Regex::new(pattern)
                .map(Some)
                .map_err(|e| CdcError::ConfigError(format!("invalid table_filter: {e}"))),
        }
    }
}

/// Reads and parses a TOML config file from disk.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, CdcError> {
    let mut file = File::open(path).map_err(CdcError::from)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(CdcError::from)?;

    toml::from_str(&contents).map_err(|e| CdcError::ConfigError(e.to_string()))
}
