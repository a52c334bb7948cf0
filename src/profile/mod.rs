//! Path resolution module
//!
//! Handles:
//! - OS profile detection (user identity and well-known directories)
//! - Placeholder substitution of profile tokens inside configured paths
//! - Verification that a path exists and matches its declared object kind
//!
//! The profile is an explicit struct passed into `PathResolver` at
//! construction rather than ambient process state, so tests can inject
//! synthetic profiles.

use crate::models::ObjectKind;
use std::fs;
use std::path::{Path, PathBuf};

/// User identity and well-known directory locations for the current host
#[derive(Debug, Clone)]
pub struct OsProfile {
    pub username: String,
    pub home: PathBuf,
    /// Roaming application data (`%appdata%`)
    pub roaming: PathBuf,
    /// Local application data (`%local%`)
    pub local: PathBuf,
    /// Shared public directory (`%public%`)
    pub public: PathBuf,
    pub temp: PathBuf,
}

impl OsProfile {
    /// Detect the profile of the current user from the environment
    ///
    /// Missing locations fall back to the home directory so substitution
    /// always produces a concrete path; resolution never implies the
    /// target exists.
    pub fn detect() -> Self {
        let username = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        let roaming = dirs::config_dir().unwrap_or_else(|| home.clone());
        let local = dirs::data_local_dir().unwrap_or_else(|| home.clone());
        let public = dirs::public_dir().unwrap_or_else(|| home.clone());
        let temp = std::env::temp_dir();

        Self {
            username,
            home,
            roaming,
            local,
            public,
            temp,
        }
    }

    /// Token substitution table derived from this profile
    fn replacement_table(&self) -> Vec<(&'static str, String)> {
        vec![
            ("%userprofile%", self.home.display().to_string()),
            ("%appdata%", self.roaming.display().to_string()),
            ("%local%", self.local.display().to_string()),
            ("%public%", self.public.display().to_string()),
            ("%temp%", self.temp.display().to_string()),
            ("%username%", self.username.clone()),
        ]
    }
}

/// Validates paths against their declared kind and substitutes profile
/// tokens in configured path strings. Pure, stateless beyond the profile.
#[derive(Debug, Clone)]
pub struct PathResolver {
    profile: OsProfile,
}

impl PathResolver {
    pub fn new(profile: OsProfile) -> Self {
        Self { profile }
    }

    /// Substitute profile tokens in a configured path string
    ///
    /// Pure text substitution; a path without tokens passes through
    /// unchanged and nothing here checks that the result exists.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let mut resolved = path.to_string();
        for (token, value) in self.profile.replacement_table() {
            if resolved.contains(token) {
                resolved = resolved.replace(token, &value);
            }
        }
        PathBuf::from(resolved)
    }

    /// True iff `path` exists on disk and its type matches `kind`
    ///
    /// Non-existent paths and type mismatches both return false; errors
    /// are never surfaced.
    pub fn verify(&self, path: &Path, kind: ObjectKind) -> bool {
        match fs::metadata(path) {
            Ok(meta) => match kind {
                ObjectKind::File => meta.is_file(),
                ObjectKind::Dir | ObjectKind::LogDir => meta.is_dir(),
            },
            Err(_) => false,
        }
    }
}
