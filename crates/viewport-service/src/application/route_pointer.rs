//! RoutePointerUseCase: turns raw panel pointer samples into logical display
//! coordinates.
//!
//! The router is the input-routing consumer of [`ViewportChange`]
//! notifications.  It keeps its own copy of every snapshot together with the
//! precomputed [`CoordinateTransform`], so routing a sample never touches the
//! registry.
//!
//! # Architecture
//!
//! The use case depends only on the [`PointerSink`] trait and core domain
//! types.  The sink is injected at construction time, which keeps the router
//! unit-testable with a mock.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};
use viewport_core::protocol::epoch_is_newer;
use viewport_core::{CoordinateTransform, PointF, ViewportError, ViewportModel};

use crate::application::publish_viewports::{ViewportChange, ViewportRecord};

/// Error type for the route-pointer use case.
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("no viewport known for device '{0}'")]
    UnknownDevice(String),
    #[error("viewport for device cannot map pointers: {0}")]
    InvalidViewport(#[source] ViewportError),
    #[error("sink error: {0}")]
    Sink(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
    HoverMove,
}

/// A pointer sample as reported by the panel, in raw (unrotated) pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPointerEvent {
    pub unique_id: String,
    pub pointer_id: u32,
    pub action: PointerAction,
    pub position: PointF,
}

/// A pointer sample after mapping into a logical display's coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalPointerEvent {
    pub logical_display_id: i32,
    pub pointer_id: u32,
    pub action: PointerAction,
    pub position: PointF,
    /// Epoch of the snapshot the sample was mapped with.
    pub epoch: u64,
}

/// Destination for routed pointer events.
///
/// Infrastructure implementations hand events to the window system; tests use
/// the generated `MockPointerSink`.
#[cfg_attr(test, mockall::automock)]
pub trait PointerSink: Send + Sync {
    fn deliver(&self, event: LogicalPointerEvent) -> Result<(), String>;
}

struct Route {
    epoch: u64,
    viewport: ViewportModel,
    transform: Result<CoordinateTransform, ViewportError>,
}

impl Route {
    fn new(epoch: u64, viewport: ViewportModel) -> Self {
        Self {
            epoch,
            transform: CoordinateTransform::new(&viewport),
            viewport,
        }
    }
}

/// Maps pointer samples through per-device viewport snapshots.
pub struct PointerRouter {
    routes: HashMap<String, Route>,
    sink: Arc<dyn PointerSink>,
    clamp_to_logical_frame: bool,
}

impl PointerRouter {
    pub fn new(sink: Arc<dyn PointerSink>, clamp_to_logical_frame: bool) -> Self {
        Self {
            routes: HashMap::new(),
            sink,
            clamp_to_logical_frame,
        }
    }

    /// Applies one registry notification.
    ///
    /// Changes whose epoch is not newer than the one already held for the
    /// device are ignored.  Epochs are compared with [`epoch_is_newer`], so
    /// the first change after the counter wraps to 0 still applies.
    pub fn apply_change(&mut self, change: ViewportChange) {
        if let Some(held) = self.routes.get(change.unique_id()) {
            if !epoch_is_newer(change.epoch(), held.epoch) {
                debug!(
                    unique_id = change.unique_id(),
                    held = held.epoch,
                    incoming = change.epoch(),
                    "ignoring stale viewport change"
                );
                return;
            }
        }

        match change {
            ViewportChange::Published { unique_id, epoch, snapshot } => {
                let route = Route::new(epoch, snapshot);
                if let Err(e) = &route.transform {
                    debug!(unique_id = %unique_id, epoch, error = %e, "viewport installed without a usable transform");
                }
                self.routes.insert(unique_id, route);
            }
            ViewportChange::Withdrawn { unique_id, epoch } => {
                debug!(unique_id = %unique_id, epoch, "viewport route removed");
                self.routes.remove(&unique_id);
            }
        }
    }

    /// Replaces every held route with `records`.
    pub fn resync(&mut self, records: Vec<ViewportRecord>) {
        self.routes = records
            .into_iter()
            .map(|r| (r.unique_id, Route::new(r.epoch, r.snapshot)))
            .collect();
        debug!(routes = self.routes.len(), "pointer routes resynchronised");
    }

    /// Maps `event` into logical coordinates and delivers it to the sink.
    ///
    /// # Errors
    ///
    /// - [`RouteError::UnknownDevice`] when no snapshot is held for the device.
    /// - [`RouteError::InvalidViewport`] when the held snapshot cannot map points.
    /// - [`RouteError::Sink`] when delivery fails.
    pub fn route(&self, event: RawPointerEvent) -> Result<(), RouteError> {
        let route = self
            .routes
            .get(&event.unique_id)
            .ok_or_else(|| RouteError::UnknownDevice(event.unique_id.clone()))?;
        let transform = route
            .transform
            .as_ref()
            .map_err(|e| RouteError::InvalidViewport(e.clone()))?;

        let mut position = transform.physical_to_logical(event.position);
        if self.clamp_to_logical_frame {
            position = route.viewport.logical_frame().clamp_point(position);
        }
        trace!(
            unique_id = %event.unique_id,
            raw = %event.position,
            logical = %position,
            "pointer routed"
        );

        self.sink
            .deliver(LogicalPointerEvent {
                logical_display_id: route.viewport.logical_display_id(),
                pointer_id: event.pointer_id,
                action: event.action,
                position,
                epoch: route.epoch,
            })
            .map_err(|e| {
                warn!(error = %e, "pointer sink rejected event");
                RouteError::Sink(e)
            })
    }

    /// The router's own copy of the snapshot for `unique_id`.
    pub fn viewport_for(&self, unique_id: &str) -> Option<&ViewportModel> {
        self.routes.get(unique_id).map(|r| &r.viewport)
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
