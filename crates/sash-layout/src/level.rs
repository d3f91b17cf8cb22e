#![forbid(unsafe_code)]

//! The per-level orchestrator.
//!
//! A [`LayoutLevel`] is one row/column node in the nesting hierarchy.
//! It owns two event buses — the *layout bus* its descendant levels
//! listen to, and the *container bus* its own children listen to — plus
//! a [`DimensionTracker`] for its region.
//!
//! On every dimension change the level classifies the delta
//! ([`classify`]) and relays exactly one event:
//!
//! - main-axis delta → `layout-resize(delta)` on the container bus, so
//!   variable siblings redistribute;
//! - cross-axis-only change → `resize` on the layout bus, so
//!   descendants merely re-measure.
//!
//! Non-root levels additionally relay their parent's `resize` into
//! their own recheck; that relay is the only coupling between levels,
//! and an unchanged re-measure publishes nothing, which is what
//! terminates the cascade.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use sash_core::bus::{BusPayload, BusSubscription, EventBus, LAYOUT_RESIZE, RESIZE};
use sash_core::geometry::{Dimensions, Size, SizeDelta};
use sash_core::tracker::{DimensionTracker, Measure};
use serde::{Deserialize, Serialize};

use crate::containers::{ContainerId, ContainerSpec, first_duplicate_id, variable_ids};
use crate::context::LayoutContext;
use crate::divider::{DividerPlan, plan_dividers};

/// Main direction of a layout level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Children side by side; redistribution moves width.
    #[default]
    Row,
    /// Children stacked; redistribution moves height.
    Column,
}

impl Axis {
    /// The main-axis component of a size.
    #[must_use]
    pub fn main_extent(self, size: Size) -> f64 {
        match self {
            Self::Row => size.width,
            Self::Column => size.height,
        }
    }

    /// The main-axis component of a delta.
    #[must_use]
    pub fn main_delta(self, delta: SizeDelta) -> f64 {
        match self {
            Self::Row => delta.width,
            Self::Column => delta.height,
        }
    }
}

/// How one dimension change propagates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ResizeScope {
    /// Previous size was `(0, 0)`: this measurement establishes the
    /// baseline and must not propagate.
    Baseline,
    /// Nothing moved.
    Unchanged,
    /// The main axis changed; siblings must redistribute `delta`.
    MainAxis { delta: f64 },
    /// Only the cross axis changed; descendants re-measure.
    CrossAxis,
}

/// Classify a dimension change for a level with the given axis.
#[must_use]
pub fn classify(dims: &Dimensions, axis: Axis) -> ResizeScope {
    if dims.is_baseline() {
        return ResizeScope::Baseline;
    }
    let diff = dims.diff();
    let main = axis.main_delta(diff);
    if main != 0.0 {
        ResizeScope::MainAxis { delta: main }
    } else if !diff.is_zero() {
        ResizeScope::CrossAxis
    } else {
        ResizeScope::Unchanged
    }
}

/// Rejected level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelModelError {
    /// A level must have at least one child.
    EmptyLevel,
    /// Two children share an id; neighbor lookup would be ambiguous.
    DuplicateContainerId { id: ContainerId },
}

impl fmt::Display for LevelModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLevel => write!(f, "layout level has no children"),
            Self::DuplicateContainerId { id } => {
                write!(f, "duplicate container id {id:?} within one layout level")
            }
        }
    }
}

impl std::error::Error for LevelModelError {}

struct LevelInner {
    axis: Axis,
    tracker: DimensionTracker,
    layout_bus: EventBus,
    containers_bus: EventBus,
    variable: Rc<RefCell<Vec<ContainerId>>>,
    children: Vec<ContainerSpec>,
    is_root: bool,
    /// Keeps the recheck relay on the parent's layout bus alive;
    /// dropping the level unsubscribes it.
    _parent_relay: Option<BusSubscription>,
}

/// One mounted row/column layout level.
///
/// Cloning the handle shares the level; the level unmounts (buses
/// dropped, parent relay unsubscribed) when the last handle drops.
pub struct LayoutLevel {
    inner: Rc<RefCell<LevelInner>>,
}

impl Clone for LayoutLevel {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for LayoutLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("LayoutLevel")
            .field("axis", &inner.axis)
            .field("is_root", &inner.is_root)
            .field("dims", &inner.tracker.dimensions())
            .field("children", &inner.children.len())
            .finish_non_exhaustive()
    }
}

impl LayoutLevel {
    /// Mount a level.
    ///
    /// Every level measures immediately; the mount measurement has a
    /// zero diff and propagates nothing. A level with no `parent`
    /// context is a root: the host must call
    /// [`recheck`](Self::recheck) on it whenever the window or outer
    /// container resizes. A nested level rechecks itself when its
    /// parent publishes `resize`.
    pub fn mount(
        axis: Axis,
        children: Vec<ContainerSpec>,
        probe: Rc<dyn Measure>,
        parent: Option<&LayoutContext>,
    ) -> Result<Self, LevelModelError> {
        validate_children(&children)?;

        let is_root = parent.is_none();
        let inner = Rc::new(RefCell::new(LevelInner {
            axis,
            tracker: DimensionTracker::new(probe),
            layout_bus: EventBus::new(),
            containers_bus: EventBus::new(),
            variable: Rc::new(RefCell::new(variable_ids(&children))),
            children,
            is_root,
            _parent_relay: None,
        }));

        if let Some(parent) = parent {
            let weak = Rc::downgrade(&inner);
            let relay = parent
                .layout_bus()
                .subscribe_guarded(RESIZE, move |_| recheck_weak(&weak));
            inner.borrow_mut()._parent_relay = Some(relay);
        }

        Ok(Self { inner })
    }

    /// Whether this level has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.inner.borrow().is_root
    }

    /// The level's main axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.inner.borrow().axis
    }

    /// Current and previous measured size.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.inner.borrow().tracker.dimensions()
    }

    /// Ids of the level's variable containers, in child order.
    #[must_use]
    pub fn variable_ids(&self) -> Vec<ContainerId> {
        self.inner.borrow().variable.borrow().clone()
    }

    /// Divider placements for the current child list.
    ///
    /// Recomputed from the children on every call; dividers are
    /// relations, not retained state.
    #[must_use]
    pub fn dividers(&self) -> Vec<DividerPlan> {
        plan_dividers(&self.inner.borrow().children)
    }

    /// Replace the level's child list, as on a re-render.
    ///
    /// The variable-id list is rebuilt wholesale from the new children;
    /// nothing is patched incrementally.
    pub fn set_children(&self, children: Vec<ContainerSpec>) -> Result<(), LevelModelError> {
        validate_children(&children)?;
        let mut inner = self.inner.borrow_mut();
        *inner.variable.borrow_mut() = variable_ids(&children);
        inner.children = children;
        Ok(())
    }

    /// Re-measure this level and propagate the change, if any.
    ///
    /// Hosts call this on the root when the window resizes; nested
    /// levels are rechecked automatically through their parent's
    /// `resize` relay. An unchanged measurement publishes nothing.
    pub fn recheck(&self) {
        recheck_inner(&self.inner);
    }

    /// The context descendants of this level must receive.
    #[must_use]
    pub fn context(&self) -> LayoutContext {
        let inner = self.inner.borrow();
        LayoutContext {
            layout_bus: inner.layout_bus.clone(),
            containers_bus: inner.containers_bus.clone(),
            axis: inner.axis,
            dimensions: inner.tracker.dimensions(),
            variable: Rc::clone(&inner.variable),
        }
    }
}

fn validate_children(children: &[ContainerSpec]) -> Result<(), LevelModelError> {
    if children.is_empty() {
        return Err(LevelModelError::EmptyLevel);
    }
    if let Some(id) = first_duplicate_id(children) {
        return Err(LevelModelError::DuplicateContainerId { id });
    }
    Ok(())
}

fn recheck_weak(inner: &Weak<RefCell<LevelInner>>) {
    if let Some(inner) = inner.upgrade() {
        recheck_inner(&inner);
    }
}

/// Re-measure and relay. The level's borrow is released before any
/// publish so listeners may re-enter bus and level APIs freely.
fn recheck_inner(inner: &Rc<RefCell<LevelInner>>) {
    let (scope, layout_bus, containers_bus) = {
        let mut state = inner.borrow_mut();
        if !state.tracker.recheck() {
            return;
        }
        let scope = classify(&state.tracker.dimensions(), state.axis);
        (scope, state.layout_bus.clone(), state.containers_bus.clone())
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(?scope, "level dimension change");

    match scope {
        ResizeScope::MainAxis { delta } => {
            containers_bus.publish(LAYOUT_RESIZE, BusPayload::AxisDelta(delta));
        }
        ResizeScope::CrossAxis => {
            layout_bus.publish(RESIZE, BusPayload::Empty);
        }
        ResizeScope::Baseline | ResizeScope::Unchanged => {}
    }
}
