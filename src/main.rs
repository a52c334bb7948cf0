#![forbid(unsafe_code)]

use anyhow::Result;
use log::info;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use driftwatch::config::{DecoyCatalog, WatchConfig};
use driftwatch::monitor::{run_with_interrupt, CheckPolicy};
use driftwatch::profile::{OsProfile, PathResolver};
use driftwatch::{cli, registry};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = cli::parse_args()?;

    // Set up interrupt handling
    let interrupted = Arc::new(AtomicBool::new(false));
    let _ = signal_hook::flag::register(signal_hook::consts::SIGINT, interrupted.clone());
    let _ = signal_hook::flag::register(signal_hook::consts::SIGTERM, interrupted.clone());

    let resolver = PathResolver::new(OsProfile::detect());
    let policy = CheckPolicy {
        poll_interval: config.interval,
        dir_atime_heuristic: config.dir_atime_heuristic,
    };

    let mut monitor = registry::build_monitor(&config.engine, resolver.clone(), policy)?;

    let watch = WatchConfig::load(&config.watch_config)?;
    let candidates = watch.candidates();
    info!(
        "loaded watch config with {} candidate paths",
        candidates.len()
    );
    monitor.load(candidates);
    if monitor.valuables().is_empty() && !config.quiet_mode {
        eprintln!("Warning: no watch candidates survived verification.");
    }

    let deceiver = if config.decoys > 0 {
        let catalog = DecoyCatalog::load(&config.decoy_config, &config.filler_file)?;
        let mut deceiver = registry::build_deceiver(&config.engine, catalog, &resolver)?;
        let placed = deceiver.place(&mut *monitor, config.decoys)?;
        if !config.quiet_mode {
            println!("Placed {} decoys.", placed.len());
        }
        Some(deceiver)
    } else {
        None
    };

    run_with_interrupt(&mut *monitor, deceiver.as_deref(), &config, interrupted)
}
