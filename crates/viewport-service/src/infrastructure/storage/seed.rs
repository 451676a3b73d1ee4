//! Publishes the `[[viewports]]` entries of the config file at startup.

use tracing::{info, warn};

use crate::application::publish_viewports::{PublishOutcome, ViewportRegistry};
use crate::infrastructure::storage::config::ViewportEntry;

/// Publishes every seed entry into `registry` and returns how many records
/// changed.
///
/// A bad entry (unknown orientation, rejected geometry) is logged and
/// skipped so the remaining seeds still load.
pub fn publish_seed_viewports(registry: &mut ViewportRegistry, entries: &[ViewportEntry]) -> usize {
    let mut published = 0;
    for entry in entries {
        let snapshot = match entry.to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(unique_id = %entry.unique_id, error = %e, "seed viewport skipped");
                continue;
            }
        };
        match registry.publish_snapshot(&entry.unique_id, snapshot) {
            Ok(PublishOutcome::Updated { epoch }) => {
                info!(unique_id = %entry.unique_id, epoch, "seed viewport published");
                published += 1;
            }
            Ok(PublishOutcome::Unchanged) => {}
            Err(e) => warn!(unique_id = %entry.unique_id, error = %e, "seed viewport rejected"),
        }
    }
    published
}

// ── Tests ─────────────────────────────────────────────────────────────────────
