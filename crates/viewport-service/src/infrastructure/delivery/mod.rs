//! Pointer sink that reports every routed event through `tracing`.
//!
//! The headless service has no window system to inject into, so routed
//! events are logged at `info` level on the `viewportd::pointer` target.

use tracing::info;

use crate::application::route_pointer::{LogicalPointerEvent, PointerSink};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPointerSink;

impl PointerSink for TracingPointerSink {
    fn deliver(&self, event: LogicalPointerEvent) -> Result<(), String> {
        info!(
            target: "viewportd::pointer",
            display = event.logical_display_id,
            pointer = event.pointer_id,
            action = ?event.action,
            x = event.position.x,
            y = event.position.y,
            epoch = event.epoch,
            "pointer event"
        );
        Ok(())
    }
}
