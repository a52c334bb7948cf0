//! Output formatting module
//!
//! Handles:
//! - Human-readable drift event lines with ISO-8601 timestamps
//! - JSON event output (one object per event)
//! - Quiet-mode suppression of per-tick banners

use crate::models::DriftEvent;
use anyhow::Result;
use time::OffsetDateTime;

/// Render one drift event in human-readable form
pub fn format_human(event: &DriftEvent) -> Result<()> {
    let timestamp = OffsetDateTime::from(event.timestamp);
    let timestamp_str = timestamp.format(&time::format_description::well_known::Iso8601::DEFAULT)?;

    if event.decoy {
        println!(
            "[{}] DECOY TRIPPED: {} ({})",
            timestamp_str,
            event.path.display(),
            event.kind.as_str()
        );
    } else {
        println!(
            "[{}] Drift detected: {} ({})",
            timestamp_str,
            event.path.display(),
            event.kind.as_str()
        );
    }

    Ok(())
}

/// Render one drift event as a JSON object on its own line
pub fn format_json(event: &DriftEvent) -> Result<()> {
    let timestamp = OffsetDateTime::from(event.timestamp);
    let timestamp_str = timestamp.format(&time::format_description::well_known::Iso8601::DEFAULT)?;

    let json_output = serde_json::json!({
        "timestamp": timestamp_str,
        "event_type": "drift_detected",
        "object": {
            "path": event.path.display().to_string(),
            "kind": event.kind.as_str(),
            "decoy": event.decoy,
        }
    });

    println!("{}", json_output);
    Ok(())
}

/// Render a drift event in the selected format
pub fn format_event(event: &DriftEvent, json: bool) -> Result<()> {
    if json {
        format_json(event)
    } else {
        format_human(event)
    }
}
