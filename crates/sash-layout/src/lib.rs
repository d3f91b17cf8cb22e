#![forbid(unsafe_code)]

//! Resizable nested panel layout.
//!
//! A layout is a tree of row/column *levels*; each level holds ordered
//! *containers*, draggable *dividers* between adjacent variable
//! containers, and optional free-floating *floats*. The engine is the
//! coordination core only: it decides how a drag or a measured size
//! change redistributes space and who must re-measure, and it carries
//! those decisions over per-level event buses. Rendering, styling, and
//! pointer capture belong to the host, which talks to the engine
//! through [`sash_core::Measure`] probes and raw pointer deltas.
//!
//! # Wiring
//!
//! ```ignore
//! use sash_layout::{Axis, ContainerSpec, LayoutLevel};
//! use std::rc::Rc;
//!
//! let root = LayoutLevel::mount(
//!     Axis::Row,
//!     vec![
//!         ContainerSpec::variable("sidebar", 240.0),
//!         ContainerSpec::variable("editor", "auto".parse()?),
//!     ],
//!     Rc::new(measure_window),
//!     None,
//! )?;
//! let ctx = root.context();
//! // mount containers, dividers, floats, and nested levels with `ctx`;
//! // call root.recheck() whenever the window resizes.
//! ```

pub mod containers;
pub mod context;
pub mod divider;
pub mod float;
pub mod level;

pub use containers::{Container, ContainerId, ContainerSpec, ParseSizeError, SizeDescriptor};
pub use context::LayoutContext;
pub use divider::{Divider, DividerPlan, plan_dividers};
pub use float::{
    DragEffect, DragNoopReason, DragState, EdgeDiff, Float, FloatConfig, FloatConfigError,
    FloatDragMachine, FloatState, ResizeGrip,
};
pub use level::{Axis, LayoutLevel, LevelModelError, ResizeScope, classify};
