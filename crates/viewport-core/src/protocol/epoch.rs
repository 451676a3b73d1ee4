//! Thread-safe configuration epoch counter.
//!
//! # What is a configuration epoch? (for beginners)
//!
//! Every time the registry accepts a new snapshot (or withdraws one) it
//! stamps the change with an integer called an *epoch*.  Epochs only move
//! forward, so a consumer can use them to:
//!
//! - **Discard stale notifications** – if the router already holds epoch 7 for
//!   a device and a delayed notification for epoch 5 arrives, it is ignored.
//! - **Resynchronise after a gap** – a subscriber that fell behind reloads the
//!   full record set and keeps the epoch of each record.
//!
//! # Wrap-around
//!
//! The counter is a `u64` and wraps from `u64::MAX` to 0.  A plain `<`
//! comparison would then treat the first post-wrap epoch as older than
//! everything before it.  [`epoch_is_newer`] compares with serial-number
//! arithmetic instead: `a` is newer than `b` when `a - b` (wrapping) lies in
//! the lower half of the `u64` range.  This holds as long as two epochs being
//! compared are less than 2^63 apart.
//!
//! # Thread safety
//!
//! The counter uses `AtomicU64`, so the registry and any other publisher can
//! call [`EpochCounter::next`] from different threads without a lock and
//! never receive the same epoch twice.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing epoch source.
///
/// The first epoch handed out is 1; 0 is left for "never published".
/// The counter wraps past `u64::MAX` back to 0 without panicking.
///
/// # Examples
///
/// ```rust
/// use viewport_core::protocol::EpochCounter;
///
/// let epochs = EpochCounter::new();
/// assert_eq!(epochs.next(), 1);
/// assert_eq!(epochs.next(), 2);
/// ```
#[derive(Debug)]
pub struct EpochCounter {
    inner: AtomicU64,
}

impl EpochCounter {
    pub fn new() -> Self {
        Self {
            inner: AtomicU64::new(0),
        }
    }

    /// Advances the counter and returns the new epoch.
    pub fn next(&self) -> u64 {
        // Relaxed: epochs order snapshots, they do not publish memory.
        self.inner.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Returns the most recently issued epoch without advancing.
    pub fn current(&self) -> u64 {
        self.inner.load(Ordering::Relaxed)
    }
}

impl Default for EpochCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` if `candidate` was issued after `current`, taking
/// wrap-around into account.
///
/// ```rust
/// use viewport_core::protocol::epoch_is_newer;
///
/// assert!(epoch_is_newer(8, 7));
/// assert!(!epoch_is_newer(7, 7));
/// assert!(epoch_is_newer(0, u64::MAX));
/// ```
pub fn epoch_is_newer(candidate: u64, current: u64) -> bool {
    let distance = candidate.wrapping_sub(current);
    distance != 0 && distance < 1 << 63
}
