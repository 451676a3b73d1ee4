//! Application layer use cases.
//!
//! - **`publish_viewports`** – The display-configuration authority's record of
//!   one snapshot per physical device.  Publishing validates, stamps an epoch,
//!   and hands a copy to every subscriber.
//!
//! - **`route_pointer`** – The input-routing consumer.  Keeps its own copies of
//!   the published snapshots and translates raw pointer samples into logical
//!   display coordinates.
//!
//! - **`follow_changes`** – The task body that keeps a router in step with the
//!   registry's change feed, resyncing after lag.
//!
//! None of these modules performs I/O; delivery goes through the [`route_pointer::PointerSink`] trait.

pub mod follow_changes;
pub mod publish_viewports;
pub mod route_pointer;
