//! driftwatch - Host-Based Integrity Monitoring Library
//!
//! Exposes the core data models, the integrity-monitoring engine, and the
//! deception manager for embedding and testing.

pub mod cli;
pub mod config;
pub mod constants;
pub mod deception;
pub mod models;
pub mod monitor;
pub mod output;
pub mod profile;
pub mod registry;
