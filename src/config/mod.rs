//! Configuration loading module
//!
//! Handles:
//! - Watch-list configuration (files/dirs/logs path sections, JSON)
//! - Decoy catalog (name/content templates and placement candidates, JSON)
//! - Filler-token list for credential generation (newline-delimited text)
//!
//! Schema errors are fatal to startup; only per-path verification failures
//! are filtered silently later, at watch-list load time.

use crate::models::Valuables;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("config section '{0}' is empty")]
    EmptySection(&'static str),
}

/// Watch-list configuration as it appears on disk
///
/// Paths may contain profile placeholder tokens; they are resolved and
/// verified later by the monitor, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub dirs: Vec<String>,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl WatchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Raw (unresolved, unverified) watch-list candidates
    pub fn candidates(&self) -> Valuables {
        Valuables {
            files: self.files.iter().map(Into::into).collect(),
            dirs: self.dirs.iter().map(Into::into).collect(),
            logs: self.logs.iter().map(Into::into).collect(),
        }
    }
}

/// Decoy catalog: everything the deception manager draws from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoyCatalog {
    /// Plausible decoy file names
    pub names: Vec<String>,
    /// Content templates containing the password placeholder token
    pub contents: Vec<String>,
    /// Candidate destination directories (may contain profile tokens)
    pub places: Vec<String>,
    /// Filler tokens mixed into generated credentials
    #[serde(default)]
    pub fillers: Vec<String>,
}

impl DecoyCatalog {
    /// Load the catalog, pulling filler tokens from a separate
    /// newline-delimited file
    pub fn load(catalog_path: &Path, filler_path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(catalog_path).map_err(|source| ConfigError::Io {
            path: catalog_path.display().to_string(),
            source,
        })?;
        let mut catalog: DecoyCatalog =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: catalog_path.display().to_string(),
                source,
            })?;

        let fillers = fs::read_to_string(filler_path).map_err(|source| ConfigError::Io {
            path: filler_path.display().to_string(),
            source,
        })?;
        catalog.fillers = fillers
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();

        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject catalogs that leave placement with nothing to draw from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.names.is_empty() {
            return Err(ConfigError::EmptySection("names"));
        }
        if self.contents.is_empty() {
            return Err(ConfigError::EmptySection("contents"));
        }
        if self.places.is_empty() {
            return Err(ConfigError::EmptySection("places"));
        }
        if self.fillers.is_empty() {
            return Err(ConfigError::EmptySection("fillers"));
        }
        Ok(())
    }
}
