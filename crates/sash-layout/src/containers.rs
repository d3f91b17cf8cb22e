#![forbid(unsafe_code)]

//! Container descriptors and the per-level variable/fixed registry.
//!
//! Each layout level classifies its direct children as *fixed* (they
//! keep their size) or *variable* (they absorb and release space during
//! divider drags and main-axis resizes). The variable list is derived
//! state: it is rebuilt wholesale from the current child list whenever
//! the children change, never patched incrementally.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use sash_core::bus::{BusSubscription, LAYOUT_RESIZE, container_resize_event};
use sash_core::geometry::Dimensions;
use sash_core::tracker::{DimensionTracker, Measure};
use serde::{Deserialize, Serialize};

use crate::context::LayoutContext;
use crate::level::Axis;

/// Identity of one container within a layout level.
///
/// Ids must be unique within their level; [`crate::level::LayoutLevel::mount`]
/// rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `resize.<id>` event name targeting this container.
    #[must_use]
    pub fn resize_event(&self) -> String {
        container_resize_event(&self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContainerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A container's declared size: absolute pixels, a percentage of the
/// level's main-axis extent, or automatic (share leftover space).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeDescriptor {
    Pixels(f64),
    Percent(f64),
    #[default]
    Auto,
}

impl SizeDescriptor {
    /// Resolve to a pixel value against the level's main-axis extent.
    ///
    /// `Auto` has no intrinsic pixel value and resolves to `None`.
    #[must_use]
    pub fn resolve(self, extent: f64) -> Option<f64> {
        match self {
            Self::Pixels(px) => Some(px),
            Self::Percent(pct) => Some(extent * pct / 100.0),
            Self::Auto => None,
        }
    }
}

impl From<f64> for SizeDescriptor {
    fn from(px: f64) -> Self {
        Self::Pixels(px)
    }
}

/// Error parsing a size descriptor from its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeError {
    input: String,
}

impl fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid size descriptor {:?} (expected a number, a percentage like \"50%\", or \"auto\")",
            self.input
        )
    }
}

impl std::error::Error for ParseSizeError {}

impl FromStr for SizeDescriptor {
    type Err = ParseSizeError;

    /// Accepts `"420"` (pixels), `"50%"` (percentage), and `"auto"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        if let Some(pct) = trimmed.strip_suffix('%') {
            return pct
                .trim()
                .parse::<f64>()
                .map(Self::Percent)
                .map_err(|_| ParseSizeError { input: s.to_owned() });
        }
        trimmed
            .parse::<f64>()
            .map(Self::Pixels)
            .map_err(|_| ParseSizeError { input: s.to_owned() })
    }
}

/// One child descriptor in a layout level, in render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub id: ContainerId,
    pub is_fixed_size: bool,
    pub size: SizeDescriptor,
}

impl ContainerSpec {
    /// A variable container (eligible for redistribution).
    pub fn variable(id: impl Into<ContainerId>, size: impl Into<SizeDescriptor>) -> Self {
        Self {
            id: id.into(),
            is_fixed_size: false,
            size: size.into(),
        }
    }

    /// A fixed-size container (keeps its size during redistribution).
    pub fn fixed(id: impl Into<ContainerId>, size: impl Into<SizeDescriptor>) -> Self {
        Self {
            id: id.into(),
            is_fixed_size: true,
            size: size.into(),
        }
    }
}

/// Derive the ordered variable-id list from a child list.
///
/// Child order is preserved, fixed children are excluded, and a
/// repeated id contributes only its first occurrence (identity is the
/// id, not the position).
#[must_use]
pub fn variable_ids(children: &[ContainerSpec]) -> Vec<ContainerId> {
    let mut ids: Vec<ContainerId> = Vec::with_capacity(children.len());
    for child in children {
        if child.is_fixed_size {
            continue;
        }
        if !ids.contains(&child.id) {
            ids.push(child.id.clone());
        }
    }
    ids
}

/// First id that appears more than once in the child list, if any.
#[must_use]
pub(crate) fn first_duplicate_id(children: &[ContainerSpec]) -> Option<ContainerId> {
    let mut seen: Vec<&ContainerId> = Vec::with_capacity(children.len());
    for child in children {
        if seen.contains(&&child.id) {
            return Some(child.id.clone());
        }
        seen.push(&child.id);
    }
    None
}

struct ContainerInner {
    id: ContainerId,
    is_fixed_size: bool,
    descriptor: SizeDescriptor,
    /// Resolved main-axis size in pixels, once known. `None` until the
    /// first diff lands on an `Auto` container that has never measured.
    main_size: Option<f64>,
    tracker: DimensionTracker,
    axis: Axis,
}

impl ContainerInner {
    fn apply_main_diff(&mut self, diff: f64) {
        let base = self
            .main_size
            .unwrap_or_else(|| self.axis.main_extent(self.tracker.dimensions().size()));
        self.main_size = Some(base + diff);
    }
}

/// A mounted container: one rectangular region in a layout level.
///
/// Mounting subscribes the container to its level's container bus:
/// `resize.<id>` applies a signed pixel diff along the level's main
/// axis, and (for variable containers) `layout-resize` absorbs an equal
/// share of the level's main-axis delta. Dropping the handle removes
/// both subscriptions.
pub struct Container {
    inner: Rc<RefCell<ContainerInner>>,
    _resize_sub: BusSubscription,
    _share_sub: Option<BusSubscription>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Container")
            .field("id", &inner.id)
            .field("is_fixed_size", &inner.is_fixed_size)
            .field("main_size", &inner.main_size)
            .finish_non_exhaustive()
    }
}

impl Container {
    /// Mount a container into a level.
    ///
    /// `probe` measures the container's own region so embedders can
    /// hand content its current size; see [`Container::dimensions`].
    pub fn mount(ctx: &LayoutContext, spec: ContainerSpec, probe: Rc<dyn Measure>) -> Self {
        let extent = ctx.axis().main_extent(ctx.dimensions().size());
        let inner = Rc::new(RefCell::new(ContainerInner {
            main_size: spec.size.resolve(extent),
            id: spec.id.clone(),
            is_fixed_size: spec.is_fixed_size,
            descriptor: spec.size,
            tracker: DimensionTracker::new(probe),
            axis: ctx.axis(),
        }));

        let resize_sub = {
            let weak = Rc::downgrade(&inner);
            ctx.containers_bus()
                .subscribe_guarded(&spec.id.resize_event(), move |payload| {
                    let Some(diff) = payload.delta() else { return };
                    if let Some(inner) = weak.upgrade() {
                        inner.borrow_mut().apply_main_diff(diff);
                    }
                })
        };

        // Fixed containers never absorb a share of the level delta.
        let share_sub = if spec.is_fixed_size {
            None
        } else {
            let weak = Rc::downgrade(&inner);
            let variable = ctx.variable_handle();
            let id = spec.id;
            Some(
                ctx.containers_bus()
                    .subscribe_guarded(LAYOUT_RESIZE, move |payload| {
                        let Some(delta) = payload.delta() else { return };
                        let Some(inner) = weak.upgrade() else { return };
                        let share = {
                            let variable = variable.borrow();
                            if !variable.contains(&id) {
                                return;
                            }
                            delta / variable.len() as f64
                        };
                        inner.borrow_mut().apply_main_diff(share);
                    }),
            )
        };

        Self {
            inner,
            _resize_sub: resize_sub,
            _share_sub: share_sub,
        }
    }

    /// This container's id.
    #[must_use]
    pub fn id(&self) -> ContainerId {
        self.inner.borrow().id.clone()
    }

    #[must_use]
    pub fn is_fixed_size(&self) -> bool {
        self.inner.borrow().is_fixed_size
    }

    /// The declared size descriptor.
    #[must_use]
    pub fn descriptor(&self) -> SizeDescriptor {
        self.inner.borrow().descriptor
    }

    /// Current main-axis size in pixels, if resolved.
    ///
    /// Starts from the declared descriptor (resolved against the
    /// level's extent at mount) and accumulates every diff received
    /// since. `None` for an `Auto` container that has neither measured
    /// nor received a diff.
    #[must_use]
    pub fn main_size(&self) -> Option<f64> {
        self.inner.borrow().main_size
    }

    /// Current and previous measured size of the container's region.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.inner.borrow().tracker.dimensions()
    }

    /// Re-measure the container's region; `true` if the size changed.
    pub fn recheck(&self) -> bool {
        self.inner.borrow_mut().tracker.recheck()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(entries: &[(&str, bool)]) -> Vec<ContainerSpec> {
        entries
            .iter()
            .map(|(id, fixed)| {
                if *fixed {
                    ContainerSpec::fixed(*id, SizeDescriptor::Auto)
                } else {
                    ContainerSpec::variable(*id, SizeDescriptor::Auto)
                }
            })
            .collect()
    }

    #[test]
    fn variable_ids_preserve_order_and_skip_fixed() {
        let children = specs(&[("a", false), ("b", false), ("c", true), ("d", false)]);
        let ids = variable_ids(&children);
        assert_eq!(ids, vec!["a".into(), "b".into(), "d".into()]);
    }

    #[test]
    fn variable_ids_dedup_by_id() {
        let children = specs(&[("a", false), ("a", false), ("b", false)]);
        assert_eq!(variable_ids(&children).len(), 2);
    }

    #[test]
    fn duplicate_detection() {
        let children = specs(&[("a", false), ("b", true), ("a", false)]);
        assert_eq!(first_duplicate_id(&children), Some("a".into()));
        assert_eq!(first_duplicate_id(&children[..2]), None);
    }

    #[test]
    fn descriptor_parsing() {
        assert_eq!("420".parse(), Ok(SizeDescriptor::Pixels(420.0)));
        assert_eq!("37.5".parse(), Ok(SizeDescriptor::Pixels(37.5)));
        assert_eq!("50%".parse(), Ok(SizeDescriptor::Percent(50.0)));
        assert_eq!("Auto".parse(), Ok(SizeDescriptor::Auto));
        assert!("half".parse::<SizeDescriptor>().is_err());
    }

    #[test]
    fn descriptor_resolution() {
        assert_eq!(SizeDescriptor::Pixels(400.0).resolve(1000.0), Some(400.0));
        assert_eq!(SizeDescriptor::Percent(25.0).resolve(1000.0), Some(250.0));
        assert_eq!(SizeDescriptor::Auto.resolve(1000.0), None);
    }
}
