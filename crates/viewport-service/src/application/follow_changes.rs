//! Feeds registry notifications into a [`PointerRouter`].
//!
//! # Lag (for beginners)
//!
//! `tokio::sync::broadcast` keeps a fixed-size ring of recent messages.  Each
//! receiver reads at its own pace; when one falls more than the channel
//! capacity behind, the oldest messages are overwritten and the next `recv`
//! returns `RecvError::Lagged(n)` instead of a value.  The missed changes
//! cannot be replayed, so the follower discards its incremental state and
//! resyncs from [`ViewportRegistry::snapshots`], which always reflects the
//! latest record of every device.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::publish_viewports::{ViewportChange, ViewportRegistry};
use crate::application::route_pointer::PointerRouter;

/// Applies every change from `changes` to `router` until the channel closes.
pub async fn follow_changes(
    mut changes: broadcast::Receiver<ViewportChange>,
    registry: Arc<Mutex<ViewportRegistry>>,
    router: Arc<Mutex<PointerRouter>>,
) {
    loop {
        match changes.recv().await {
            Ok(change) => router.lock().await.apply_change(change),
            Err(RecvError::Lagged(missed)) => {
                warn!(missed, "viewport change feed lagged; resyncing routes");
                let records = registry.lock().await.snapshots();
                router.lock().await.resync(records);
            }
            Err(RecvError::Closed) => {
                debug!("viewport change feed closed");
                break;
            }
        }
    }
}
