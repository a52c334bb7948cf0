//! Global constants for driftwatch
//!
//! Centralized location for application-wide constants

/// Application identifier used in logging and diagnostics
pub const APP_NAME: &str = "driftwatch";

/// Buffer size for streamed baseline hashing (64 KiB)
pub const HASH_BUFFER_SIZE: usize = 65536;

/// Placeholder token substituted inside decoy content templates
pub const PASSWORD_TOKEN: &str = "%password%";

/// Upper bound (inclusive) for the numeric components of generated credentials
pub const CREDENTIAL_BOUND: u32 = 4096;

/// Default watch-list configuration file
pub const DEFAULT_WATCH_CONFIG: &str = "data/watch.json";

/// Default decoy catalog file
pub const DEFAULT_DECOY_CONFIG: &str = "data/decoys.json";

/// Default filler-token list for credential generation
pub const DEFAULT_FILLER_FILE: &str = "data/fillers.txt";
