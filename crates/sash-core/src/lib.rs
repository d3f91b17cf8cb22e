#![forbid(unsafe_code)]

//! Core primitives for the sash layout engine.
//!
//! This crate carries the pieces that have no opinion about rows,
//! columns, or floats:
//!
//! - [`geometry`] — pixel-space sizes, points, and the
//!   current/previous measurement pair ([`geometry::Dimensions`]).
//! - [`bus`] — the synchronous named-event bus levels use to talk to
//!   siblings and descendants without direct references.
//! - [`tracker`] — on-demand re-measurement with change detection,
//!   fed by a host-supplied [`tracker::Measure`] probe.
//!
//! Everything here is single-threaded and event-driven; no operation
//! blocks and no background work happens between calls.

pub mod bus;
pub mod geometry;
pub mod tracker;

pub use bus::{
    BusPayload, BusSubscription, EventBus, LAYOUT_RESIZE, ListenerId, RESIZE,
    container_resize_event,
};
pub use geometry::{Dimensions, Point, Size, SizeDelta};
pub use tracker::{DimensionTracker, Measure};
