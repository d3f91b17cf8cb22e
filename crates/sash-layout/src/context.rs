#![forbid(unsafe_code)]

//! Per-level context handed down to descendants.
//!
//! A [`LayoutContext`] is how a level shares its buses, axis, and
//! variable-container list with children and nested levels without
//! exposing any mutable ancestor state. It is a snapshot handle:
//! cheap to clone, safe to hold, and carrying only event-bus handles
//! and read-only views.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sash_core::bus::EventBus;
use sash_core::geometry::Dimensions;

use crate::containers::ContainerId;
use crate::level::Axis;

/// Read-only handle to one layout level, passed to its descendants.
#[derive(Clone)]
pub struct LayoutContext {
    pub(crate) layout_bus: EventBus,
    pub(crate) containers_bus: EventBus,
    pub(crate) axis: Axis,
    pub(crate) dimensions: Dimensions,
    pub(crate) variable: Rc<RefCell<Vec<ContainerId>>>,
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("axis", &self.axis)
            .field("dimensions", &self.dimensions)
            .field("variable", &self.variable.borrow())
            .finish_non_exhaustive()
    }
}

impl LayoutContext {
    /// The level's main axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The level's dimensions as of when this context was created.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The bus descendant levels listen to for `resize`.
    #[must_use]
    pub fn layout_bus(&self) -> &EventBus {
        &self.layout_bus
    }

    /// The bus the level's own containers listen to
    /// (`resize.<id>`, `layout-resize`).
    #[must_use]
    pub fn containers_bus(&self) -> &EventBus {
        &self.containers_bus
    }

    /// Ids of the level's variable containers, in child order.
    ///
    /// This reads the live list the level rebuilds on every child-set
    /// change, so a context taken at mount stays accurate.
    #[must_use]
    pub fn variable_ids(&self) -> Vec<ContainerId> {
        self.variable.borrow().clone()
    }

    /// Whether `id` is currently eligible for redistribution.
    #[must_use]
    pub fn is_variable(&self, id: &ContainerId) -> bool {
        self.variable.borrow().contains(id)
    }

    /// Number of variable containers in the level.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variable.borrow().len()
    }

    /// Shared view of the live variable-id list.
    pub(crate) fn variable_handle(&self) -> Rc<RefCell<Vec<ContainerId>>> {
        Rc::clone(&self.variable)
    }
}
