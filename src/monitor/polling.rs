//! Polling loop driving the integrity monitor
//!
//! One logical tick performs a check pass, cross-references drifted paths
//! against the deceiver, renders events, and sleeps for the remainder of
//! the configured interval. The loop owns no state of its own; the caller
//! may stop it between ticks via the interrupt flag.

use crate::cli::RunConfig;
use crate::models::DriftEvent;
use crate::output;
use crate::registry::{Deceiver, Monitor};
use anyhow::Result;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Run check passes until interrupted (or once, in one-shot mode)
pub fn run_with_interrupt(
    monitor: &mut dyn Monitor,
    deceiver: Option<&dyn Deceiver>,
    config: &RunConfig,
    interrupted: Arc<AtomicBool>,
) -> Result<()> {
    if !config.quiet_mode {
        let valuables = monitor.valuables();
        println!(
            "Watching {} files, {} dirs, {} log dirs (interval: {:.1}s)...",
            valuables.files.len(),
            valuables.dirs.len(),
            valuables.logs.len(),
            config.interval.as_secs_f64()
        );
        if !config.once {
            println!("Press Ctrl+C to stop monitoring.");
        }
        println!();
    }

    while !interrupted.load(Ordering::Relaxed) {
        let cycle_start = Instant::now();

        let report = monitor.check();
        let timestamp = SystemTime::now();

        for (kind, path) in report.iter() {
            let event = DriftEvent {
                timestamp,
                path: path.to_path_buf(),
                kind,
                decoy: deceiver.is_some_and(|d| d.is_decoy(path)),
            };
            output::format_event(&event, config.json_output)?;
        }

        if config.once {
            if !config.quiet_mode && report.is_empty() {
                println!("No drift detected.");
            }
            return Ok(());
        }

        // Sleep out the remainder of the interval so ticks stay on cadence
        let cycle_duration = cycle_start.elapsed();
        if let Some(sleep_duration) = config.interval.checked_sub(cycle_duration) {
            std::thread::sleep(sleep_duration);
        }
    }

    info!("monitoring interrupted");
    if !config.quiet_mode {
        println!("Monitoring stopped.");
    }

    Ok(())
}
