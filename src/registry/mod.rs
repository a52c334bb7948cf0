//! Engine capability registry
//!
//! Static replacement for runtime plugin discovery: `Monitor` and
//! `Deceiver` are explicit capability interfaces, and a configuration-
//! supplied identifier selects a concrete implementation at startup.
//! Construction failures surface as typed errors instead of caught
//! generic exceptions.

use crate::config::{ConfigError, DecoyCatalog};
use crate::deception::DeceptionManager;
use crate::models::{DriftReport, Valuables};
use crate::monitor::{CheckPolicy, IntegrityMonitor};
use crate::profile::PathResolver;
use std::path::Path;
use thiserror::Error;

/// Integrity-monitoring capability
pub trait Monitor: std::fmt::Debug {
    /// Resolve, verify, and adopt a candidate watch list, establishing
    /// an initial baseline
    fn load(&mut self, candidates: Valuables);
    /// Evaluate drift for every watched object, then rebase
    fn check(&mut self) -> DriftReport;
    /// Current watch list
    fn valuables(&self) -> &Valuables;
    /// Replace the watch list wholesale and rebase
    fn set_valuables(&mut self, new: Valuables);
}

/// Deception capability
pub trait Deceiver: std::fmt::Debug {
    /// Write `count` decoys and register them with the monitor
    fn place(&mut self, monitor: &mut dyn Monitor, count: usize)
        -> anyhow::Result<Vec<std::path::PathBuf>>;
    /// Whether the path belongs to a planted decoy
    fn is_decoy(&self, path: &Path) -> bool;
}

/// Errors raised while building engine implementations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown engine '{0}'")]
    UnknownEngine(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Identifier of the built-in local filesystem engine
pub const LOCAL_ENGINE: &str = "local";

/// Build the monitor implementation selected by `engine`
pub fn build_monitor(
    engine: &str,
    resolver: PathResolver,
    policy: CheckPolicy,
) -> Result<Box<dyn Monitor>, RegistryError> {
    match engine {
        LOCAL_ENGINE => Ok(Box::new(IntegrityMonitor::new(resolver, policy))),
        other => Err(RegistryError::UnknownEngine(other.to_string())),
    }
}

/// Build the deceiver implementation selected by `engine`
pub fn build_deceiver(
    engine: &str,
    catalog: DecoyCatalog,
    resolver: &PathResolver,
) -> Result<Box<dyn Deceiver>, RegistryError> {
    match engine {
        LOCAL_ENGINE => Ok(Box::new(DeceptionManager::new(catalog, resolver)?)),
        other => Err(RegistryError::UnknownEngine(other.to_string())),
    }
}
