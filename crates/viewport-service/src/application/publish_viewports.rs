//! PublishViewportsUseCase: the authoritative record of one viewport snapshot
//! per physical device.
//!
//! The display-configuration side calls [`ViewportRegistry::publish_snapshot`]
//! whenever a device's geometry changes.  The registry keeps its own copy,
//! stamps it with a fresh epoch and broadcasts a [`ViewportChange`] to every
//! subscriber.  Subscribers (input routing) hold their own copies, so a later
//! publish never alters what a consumer already received.
//!
//! # Record lifecycle
//!
//! ```text
//!   (unknown) ──publish──►  recorded(epoch N)  ──publish──►  recorded(epoch N+k)
//!                                 │
//!                              withdraw
//!                                 ▼
//!                             (unknown)
//! ```
//!
//! Publishing a snapshot that is content-equal to the stored one is a no-op:
//! no epoch is consumed and nothing is broadcast.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use viewport_core::protocol::EpochCounter;
use viewport_core::{FrameAdjustment, ViewportError, ViewportModel};

/// Errors returned by [`ViewportRegistry`].
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// No snapshot has been published for this device.
    #[error("no viewport published for device '{0}'")]
    UnknownDevice(String),

    /// The snapshot names a different device than the key it was published under.
    #[error("snapshot unique id '{actual}' does not match device '{expected}'")]
    UniqueIdMismatch { expected: String, actual: String },

    /// A snapshot flagged valid broke one of the viewport invariants.
    #[error("snapshot rejected: {0}")]
    Rejected(#[source] ViewportError),
}

/// One device's stored snapshot and the epoch it was published at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportRecord {
    pub unique_id: String,
    pub epoch: u64,
    pub snapshot: ViewportModel,
}

/// Notification sent to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportChange {
    Published {
        unique_id: String,
        epoch: u64,
        snapshot: ViewportModel,
    },
    Withdrawn {
        unique_id: String,
        epoch: u64,
    },
}

impl ViewportChange {
    pub fn unique_id(&self) -> &str {
        match self {
            ViewportChange::Published { unique_id, .. } | ViewportChange::Withdrawn { unique_id, .. } => {
                unique_id
            }
        }
    }

    pub fn epoch(&self) -> u64 {
        match self {
            ViewportChange::Published { epoch, .. } | ViewportChange::Withdrawn { epoch, .. } => *epoch,
        }
    }
}

/// Result of a successful [`ViewportRegistry::publish_snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The record changed and subscribers were notified.
    Updated { epoch: u64 },
    /// The stored snapshot already had this content.
    Unchanged,
}

/// In-memory registry of every device's current viewport.
///
/// The registry is owned behind a `Mutex` by the binary so the publishing
/// side and the lag-resync path can share it.
pub struct ViewportRegistry {
    records: HashMap<String, ViewportRecord>,
    adjustments: HashMap<String, FrameAdjustment>,
    epochs: EpochCounter,
    notifier: broadcast::Sender<ViewportChange>,
}

impl ViewportRegistry {
    /// Creates an empty registry whose broadcast channel buffers up to
    /// `notify_capacity` changes per subscriber (at least one).
    pub fn new(notify_capacity: usize) -> Self {
        let (notifier, _) = broadcast::channel(notify_capacity.max(1));
        Self {
            records: HashMap::new(),
            adjustments: HashMap::new(),
            epochs: EpochCounter::new(),
            notifier,
        }
    }

    /// Registers a fixed physical-frame offset for `unique_id`.
    ///
    /// Every valid snapshot published for that device from now on has its
    /// physical frame moved off the strip (see
    /// [`ViewportModel::with_frame_adjustment`]).  Frames already clear of it
    /// are kept, so a copy obtained from [`Self::get_viewport_for`] can be
    /// modified and re-published without being shifted again.
    /// Already-stored records are left as they are.
    pub fn set_frame_adjustment(&mut self, unique_id: impl Into<String>, adjustment: FrameAdjustment) {
        let unique_id = unique_id.into();
        if adjustment.is_identity() {
            self.adjustments.remove(&unique_id);
        } else {
            debug!(unique_id = %unique_id, ?adjustment, "frame adjustment registered");
            self.adjustments.insert(unique_id, adjustment);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewportChange> {
        self.notifier.subscribe()
    }

    /// Stores `snapshot` as the current viewport of `unique_id`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UniqueIdMismatch`] if the snapshot carries a unique id
    ///   other than `unique_id`.
    /// - [`RegistryError::Rejected`] if a valid snapshot breaks an invariant
    ///   after any configured frame adjustment has been applied.
    pub fn publish_snapshot(
        &mut self,
        unique_id: &str,
        snapshot: ViewportModel,
    ) -> Result<PublishOutcome, RegistryError> {
        if let Some(actual) = snapshot.unique_id() {
            if actual != unique_id {
                return Err(RegistryError::UniqueIdMismatch {
                    expected: unique_id.to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        let adjusted = match self.adjustments.get(unique_id) {
            Some(adjustment) if snapshot.is_valid() => snapshot.with_frame_adjustment(adjustment),
            _ => Ok(snapshot),
        };
        let snapshot = match adjusted.and_then(|s| s.validate().map(|()| s)) {
            Ok(s) => s,
            Err(e) => {
                warn!(unique_id, error = %e, "rejecting viewport snapshot");
                return Err(RegistryError::Rejected(e));
            }
        };

        if let Some(existing) = self.records.get(unique_id) {
            if existing.snapshot == snapshot {
                debug!(unique_id, epoch = existing.epoch, "snapshot unchanged");
                return Ok(PublishOutcome::Unchanged);
            }
        }

        let epoch = self.epochs.next();
        info!(unique_id, epoch, viewport = %snapshot, "viewport published");
        self.records.insert(
            unique_id.to_string(),
            ViewportRecord {
                unique_id: unique_id.to_string(),
                epoch,
                snapshot: snapshot.clone(),
            },
        );
        self.notify(ViewportChange::Published {
            unique_id: unique_id.to_string(),
            epoch,
            snapshot,
        });
        Ok(PublishOutcome::Updated { epoch })
    }

    /// Drops the record for a disconnected device and returns the withdrawal epoch.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownDevice`] if nothing was recorded for `unique_id`.
    pub fn withdraw(&mut self, unique_id: &str) -> Result<u64, RegistryError> {
        if self.records.remove(unique_id).is_none() {
            return Err(RegistryError::UnknownDevice(unique_id.to_string()));
        }
        let epoch = self.epochs.next();
        info!(unique_id, epoch, "viewport withdrawn");
        self.notify(ViewportChange::Withdrawn {
            unique_id: unique_id.to_string(),
            epoch,
        });
        Ok(epoch)
    }

    /// Returns a copy of the current snapshot for `unique_id`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownDevice`] if nothing was ever published for it.
    pub fn get_viewport_for(&self, unique_id: &str) -> Result<ViewportModel, RegistryError> {
        self.records
            .get(unique_id)
            .map(|r| r.snapshot.clone())
            .ok_or_else(|| RegistryError::UnknownDevice(unique_id.to_string()))
    }

    /// Like [`Self::get_viewport_for`] but returns the invalid sentinel for unknown devices.
    pub fn viewport_or_invalid(&self, unique_id: &str) -> ViewportModel {
        self.get_viewport_for(unique_id)
            .unwrap_or_else(|_| ViewportModel::invalid())
    }

    pub fn epoch_of(&self, unique_id: &str) -> Option<u64> {
        self.records.get(unique_id).map(|r| r.epoch)
    }

    /// Copies of every stored record, in no particular order.
    pub fn snapshots(&self) -> Vec<ViewportRecord> {
        self.records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn notify(&self, change: ViewportChange) {
        // send fails only when nobody is subscribed.
        if let Err(broadcast::error::SendError(change)) = self.notifier.send(change) {
            debug!(unique_id = change.unique_id(), "no subscribers for viewport change");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use viewport_core::{Orientation, Rect};

    fn panel(unique_id: &str) -> ViewportModel {
        ViewportModel::builder()
            .logical_display_id(0)
            .orientation(Orientation::Rotation0)
            .logical_frame(Rect::from_size(1080, 1920))
            .physical_frame(Rect::from_size(1080, 1920))
            .device_size(1080, 1920)
            .unique_id(unique_id)
            .build()
    }

    #[test]
    fn test_publish_then_get_returns_copy() {
        // Arrange
        let mut registry = ViewportRegistry::new(8);

        // Act
        let outcome = registry.publish_snapshot("local:0", panel("local:0")).unwrap();

        // Assert
        assert_eq!(outcome, PublishOutcome::Updated { epoch: 1 });
        assert_eq!(registry.get_viewport_for("local:0").unwrap(), panel("local:0"));
        assert_eq!(registry.epoch_of("local:0"), Some(1));
    }

    #[test]
    fn test_get_unknown_device_returns_error() {
        let registry = ViewportRegistry::new(8);
        assert_eq!(
            registry.get_viewport_for("hdmi:9"),
            Err(RegistryError::UnknownDevice("hdmi:9".to_string()))
        );
    }

    #[test]
    fn test_viewport_or_invalid_returns_sentinel_for_unknown_device() {
        let registry = ViewportRegistry::new(8);
        let v = registry.viewport_or_invalid("hdmi:9");
        assert!(!v.is_valid());
        assert_eq!(v, ViewportModel::invalid());
    }

    #[test]
    fn test_publish_replaces_previous_record() {
        let mut registry = ViewportRegistry::new(8);
        registry.publish_snapshot("local:0", panel("local:0")).unwrap();

        let rotated = panel("local:0")
            .to_builder()
            .orientation(Orientation::Rotation90)
            .physical_frame(Rect::from_size(1920, 1080))
            .device_size(1920, 1080)
            .build();
        let outcome = registry.publish_snapshot("local:0", rotated.clone()).unwrap();

        assert_eq!(outcome, PublishOutcome::Updated { epoch: 2 });
        assert_eq!(registry.get_viewport_for("local:0").unwrap(), rotated);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_republishing_equal_snapshot_is_unchanged() {
        let mut registry = ViewportRegistry::new(8);
        let mut rx = registry.subscribe();
        registry.publish_snapshot("local:0", panel("local:0")).unwrap();

        let outcome = registry.publish_snapshot("local:0", panel("local:0")).unwrap();

        assert_eq!(outcome, PublishOutcome::Unchanged);
        assert_eq!(registry.epoch_of("local:0"), Some(1));
        assert!(rx.try_recv().is_ok(), "first publish must notify");
        assert!(rx.try_recv().is_err(), "unchanged publish must not notify");
    }

    #[test]
    fn test_publish_broadcasts_change_to_subscribers() {
        let mut registry = ViewportRegistry::new(8);
        let mut rx = registry.subscribe();

        registry.publish_snapshot("local:0", panel("local:0")).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            ViewportChange::Published {
                unique_id: "local:0".to_string(),
                epoch: 1,
                snapshot: panel("local:0"),
            }
        );
    }

    #[test]
    fn test_publish_without_subscribers_succeeds() {
        let mut registry = ViewportRegistry::new(8);
        assert!(registry.publish_snapshot("local:0", panel("local:0")).is_ok());
    }

    #[test]
    fn test_publish_rejects_mismatched_unique_id() {
        let mut registry = ViewportRegistry::new(8);
        let result = registry.publish_snapshot("local:0", panel("hdmi:1"));
        assert_eq!(
            result,
            Err(RegistryError::UniqueIdMismatch {
                expected: "local:0".to_string(),
                actual: "hdmi:1".to_string(),
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_publish_rejects_valid_snapshot_without_unique_id() {
        let mut registry = ViewportRegistry::new(8);
        let result = registry.publish_snapshot("local:0", panel("x").to_builder().clear_unique_id().build());
        assert_eq!(result, Err(RegistryError::Rejected(ViewportError::MissingUniqueId)));
    }

    #[test]
    fn test_publish_rejects_physical_frame_outside_device() {
        let mut registry = ViewportRegistry::new(8);
        let oversized = panel("local:0")
            .to_builder()
            .physical_frame(Rect::new(0, 0, 1081, 1920))
            .build();
        assert!(matches!(
            registry.publish_snapshot("local:0", oversized),
            Err(RegistryError::Rejected(ViewportError::PhysicalFrameOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_publish_accepts_invalid_snapshot_as_placeholder() {
        let mut registry = ViewportRegistry::new(8);
        let outcome = registry.publish_snapshot("local:0", ViewportModel::invalid()).unwrap();
        assert!(matches!(outcome, PublishOutcome::Updated { .. }));
        assert!(!registry.get_viewport_for("local:0").unwrap().is_valid());
    }

    #[test]
    fn test_frame_adjustment_applies_to_every_snapshot_of_device() {
        // Arrange
        let mut registry = ViewportRegistry::new(8);
        registry.set_frame_adjustment("local:0", FrameAdjustment { offset_x: 0, offset_y: 160 });
        let cropped = panel("local:0")
            .to_builder()
            .physical_frame(Rect::new(0, 0, 1080, 1760))
            .logical_frame(Rect::from_size(1080, 1760))
            .build();

        // Act
        registry.publish_snapshot("local:0", cropped.clone()).unwrap();

        // Assert
        let stored = registry.get_viewport_for("local:0").unwrap();
        assert_eq!(stored.physical_frame(), Rect::new(0, 160, 1080, 1920));
        assert_eq!(stored.logical_frame(), cropped.logical_frame());
    }

    #[test]
    fn test_republishing_modified_copy_of_adjusted_snapshot_does_not_shift_again() {
        // Arrange
        let mut registry = ViewportRegistry::new(8);
        registry.set_frame_adjustment("local:0", FrameAdjustment { offset_x: 0, offset_y: 100 });
        let cropped = panel("local:0")
            .to_builder()
            .physical_frame(Rect::new(0, 0, 1080, 1600))
            .build();
        registry.publish_snapshot("local:0", cropped).unwrap();
        let stored = registry.get_viewport_for("local:0").unwrap();
        assert_eq!(stored.physical_frame(), Rect::new(0, 100, 1080, 1700));

        // Act
        let outcome = registry
            .publish_snapshot("local:0", stored.to_builder().logical_display_id(1).build())
            .unwrap();

        // Assert
        assert_eq!(outcome, PublishOutcome::Updated { epoch: 2 });
        let republished = registry.get_viewport_for("local:0").unwrap();
        assert_eq!(republished.physical_frame(), Rect::new(0, 100, 1080, 1700));
        assert_eq!(republished.logical_display_id(), 1);
    }

    #[test]
    fn test_republishing_stored_adjusted_snapshot_is_unchanged() {
        let mut registry = ViewportRegistry::new(8);
        registry.set_frame_adjustment("local:0", FrameAdjustment { offset_x: 0, offset_y: 100 });
        let cropped = panel("local:0")
            .to_builder()
            .physical_frame(Rect::new(0, 0, 1080, 1600))
            .build();
        registry.publish_snapshot("local:0", cropped.clone()).unwrap();
        let stored = registry.get_viewport_for("local:0").unwrap();

        assert_eq!(registry.publish_snapshot("local:0", stored), Ok(PublishOutcome::Unchanged));
        assert_eq!(registry.publish_snapshot("local:0", cropped), Ok(PublishOutcome::Unchanged));
    }

    #[test]
    fn test_frame_adjustment_overflow_is_rejected() {
        let mut registry = ViewportRegistry::new(8);
        registry.set_frame_adjustment("local:0", FrameAdjustment { offset_x: 0, offset_y: 160 });
        let extreme = panel("local:0")
            .to_builder()
            .physical_frame(Rect::new(0, 0, 1080, i32::MAX))
            .build();
        assert!(matches!(
            registry.publish_snapshot("local:0", extreme),
            Err(RegistryError::Rejected(ViewportError::AdjustmentOverflow { .. }))
        ));
    }

    #[test]
    fn test_publish_rejects_frame_spanning_full_i32_range() {
        let mut registry = ViewportRegistry::new(8);
        let extreme = panel("local:0")
            .to_builder()
            .physical_frame(Rect::new(i32::MIN, 0, i32::MAX, 10))
            .build();
        assert!(matches!(
            registry.publish_snapshot("local:0", extreme),
            Err(RegistryError::Rejected(ViewportError::PhysicalFrameOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_frame_adjustment_does_not_touch_other_devices() {
        let mut registry = ViewportRegistry::new(8);
        registry.set_frame_adjustment("local:0", FrameAdjustment { offset_x: 0, offset_y: 160 });
        registry.publish_snapshot("hdmi:1", panel("hdmi:1")).unwrap();
        assert_eq!(registry.get_viewport_for("hdmi:1").unwrap(), panel("hdmi:1"));
    }

    #[test]
    fn test_frame_adjustment_that_overflows_device_is_rejected() {
        let mut registry = ViewportRegistry::new(8);
        registry.set_frame_adjustment("local:0", FrameAdjustment { offset_x: 0, offset_y: 160 });
        assert!(matches!(
            registry.publish_snapshot("local:0", panel("local:0")),
            Err(RegistryError::Rejected(ViewportError::PhysicalFrameOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_identity_adjustment_clears_registration() {
        let mut registry = ViewportRegistry::new(8);
        registry.set_frame_adjustment("local:0", FrameAdjustment { offset_x: 0, offset_y: 160 });
        registry.set_frame_adjustment("local:0", FrameAdjustment::default());
        registry.publish_snapshot("local:0", panel("local:0")).unwrap();
        assert_eq!(registry.get_viewport_for("local:0").unwrap(), panel("local:0"));
    }

    #[test]
    fn test_withdraw_removes_record_and_notifies() {
        let mut registry = ViewportRegistry::new(8);
        registry.publish_snapshot("local:0", panel("local:0")).unwrap();
        let mut rx = registry.subscribe();

        let epoch = registry.withdraw("local:0").unwrap();

        assert_eq!(epoch, 2);
        assert!(registry.get_viewport_for("local:0").is_err());
        assert_eq!(
            rx.try_recv().unwrap(),
            ViewportChange::Withdrawn { unique_id: "local:0".to_string(), epoch: 2 }
        );
    }

    #[test]
    fn test_withdraw_unknown_device_returns_error() {
        let mut registry = ViewportRegistry::new(8);
        assert_eq!(
            registry.withdraw("nope"),
            Err(RegistryError::UnknownDevice("nope".to_string()))
        );
    }

    #[test]
    fn test_snapshots_lists_every_record() {
        let mut registry = ViewportRegistry::new(8);
        registry.publish_snapshot("local:0", panel("local:0")).unwrap();
        registry.publish_snapshot("hdmi:1", panel("hdmi:1")).unwrap();

        let mut ids: Vec<String> = registry.snapshots().into_iter().map(|r| r.unique_id).collect();
        ids.sort();

        assert_eq!(ids, vec!["hdmi:1".to_string(), "local:0".to_string()]);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut registry = ViewportRegistry::new(0);
        let mut rx = registry.subscribe();
        registry.publish_snapshot("local:0", panel("local:0")).unwrap();
        assert!(rx.try_recv().is_ok());
    }
}
