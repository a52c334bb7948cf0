//! CLI argument parsing and validation module
//!
//! Handles command-line interface using clap, including:
//! - Watch-list and decoy catalog locations
//! - Poll interval and decoy count
//! - Output format selection (human/JSON)
//! - One-shot versus continuous operation

use crate::constants::{APP_NAME, DEFAULT_DECOY_CONFIG, DEFAULT_FILLER_FILE, DEFAULT_WATCH_CONFIG};
use crate::registry::LOCAL_ENGINE;
use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::time::Duration;

/// Parsed runtime configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub watch_config: PathBuf,
    pub decoy_config: PathBuf,
    pub filler_file: PathBuf,
    pub engine: String,
    pub interval: Duration,
    /// Number of decoys to place before the first check pass (0 = none)
    pub decoys: usize,
    /// Perform a single check pass and exit
    pub once: bool,
    pub json_output: bool,
    pub quiet_mode: bool,
    pub dir_atime_heuristic: bool,
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<RunConfig> {
    let matches = build_command().get_matches();
    config_from_matches(&matches)
}

fn build_command() -> Command {
    Command::new(APP_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch files for unauthorized change and plant decoy credentials")
        .long_about(
            "A host-based integrity monitor: baselines a configured set of files, \
             directories, and log directories, reports drift from the baseline on \
             each poll, and optionally seeds decoy files whose access reveals an intruder.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Watch-list configuration file (JSON)")
                .default_value(DEFAULT_WATCH_CONFIG),
        )
        .arg(
            Arg::new("decoy-config")
                .long("decoy-config")
                .value_name("PATH")
                .help("Decoy catalog file (JSON)")
                .default_value(DEFAULT_DECOY_CONFIG),
        )
        .arg(
            Arg::new("fillers")
                .long("fillers")
                .value_name("PATH")
                .help("Filler-token list for credential generation")
                .default_value(DEFAULT_FILLER_FILE),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .value_name("NAME")
                .help("Engine implementation to use")
                .default_value(LOCAL_ENGINE),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_name("SECONDS")
                .help("Poll interval between check passes")
                .default_value("5"),
        )
        .arg(
            Arg::new("decoys")
                .short('d')
                .long("decoys")
                .value_name("COUNT")
                .help("Number of decoy files to place at startup")
                .default_value("0"),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .help("Perform a single check pass and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .help("Output drift events in JSON format")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress startup and per-tick banners")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dir-atime")
                .long("dir-atime")
                .help("Enable the best-effort directory access-time heuristic")
                .action(ArgAction::SetTrue),
        )
}

fn config_from_matches(matches: &clap::ArgMatches) -> Result<RunConfig> {
    let watch_config = PathBuf::from(
        matches
            .get_one::<String>("config")
            .expect("has default")
            .clone(),
    );
    if !watch_config.exists() {
        return Err(anyhow!(
            "watch config does not exist: {}",
            watch_config.display()
        ));
    }

    let interval_raw = matches.get_one::<String>("interval").expect("has default");
    let interval_secs: f64 = interval_raw
        .parse()
        .map_err(|_| anyhow!("invalid interval: {}", interval_raw))?;
    if !(0.1..=3600.0).contains(&interval_secs) {
        return Err(anyhow!(
            "interval must be between 0.1 and 3600 seconds, got {}",
            interval_raw
        ));
    }

    let decoys_raw = matches.get_one::<String>("decoys").expect("has default");
    let decoys: usize = decoys_raw
        .parse()
        .map_err(|_| anyhow!("invalid decoy count: {}", decoys_raw))?;

    let decoy_config = PathBuf::from(
        matches
            .get_one::<String>("decoy-config")
            .expect("has default")
            .clone(),
    );
    let filler_file = PathBuf::from(
        matches
            .get_one::<String>("fillers")
            .expect("has default")
            .clone(),
    );
    // The decoy catalog is only consulted when decoys are requested
    if decoys > 0 && !decoy_config.exists() {
        return Err(anyhow!(
            "decoy catalog does not exist: {}",
            decoy_config.display()
        ));
    }

    Ok(RunConfig {
        watch_config,
        decoy_config,
        filler_file,
        engine: matches
            .get_one::<String>("engine")
            .expect("has default")
            .clone(),
        interval: Duration::from_secs_f64(interval_secs),
        decoys,
        once: matches.get_flag("once"),
        json_output: matches.get_flag("json"),
        quiet_mode: matches.get_flag("quiet"),
        dir_atime_heuristic: matches.get_flag("dir-atime"),
    })
}
