#![forbid(unsafe_code)]

//! Draggable boundaries between adjacent variable containers.
//!
//! A divider is an ephemeral relation between two neighboring container
//! ids, recomputed from the child list on every render pass rather than
//! stored. Dragging it moves space symmetrically: whatever one side
//! gains, the other loses, so the pair's total extent is conserved.

use std::fmt;

use sash_core::bus::{BusPayload, EventBus};
use serde::{Deserialize, Serialize};

use crate::containers::{ContainerId, ContainerSpec};
use crate::context::LayoutContext;

/// Placement of one divider between two adjacent containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividerPlan {
    pub before: ContainerId,
    pub after: ContainerId,
}

/// Compute divider placements for a child list.
///
/// A divider sits between children `i` and `i + 1` when both are
/// variable: there is never a trailing divider after the final child,
/// and a fixed-size container gets no divider on either side — it could
/// not absorb its half of the symmetric adjustment.
#[must_use]
pub fn plan_dividers(children: &[ContainerSpec]) -> Vec<DividerPlan> {
    children
        .windows(2)
        .filter(|pair| !pair[0].is_fixed_size && !pair[1].is_fixed_size)
        .map(|pair| DividerPlan {
            before: pair[0].id.clone(),
            after: pair[1].id.clone(),
        })
        .collect()
}

/// A mounted divider.
///
/// The rendering layer owns pointer capture; it feeds raw main-axis
/// drag deltas into [`Divider::drag`], which emits the symmetric
/// `resize.<before>` / `resize.<after>` pair on the level's container
/// bus. A neighbor id that matches no mounted container publishes into
/// silence, which is the intended degradation.
pub struct Divider {
    containers_bus: EventBus,
    before_event: String,
    after_event: String,
    plan: DividerPlan,
}

impl fmt::Debug for Divider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Divider")
            .field("before", &self.plan.before)
            .field("after", &self.plan.after)
            .finish_non_exhaustive()
    }
}

impl Divider {
    /// Mount a divider into its level.
    #[must_use]
    pub fn mount(ctx: &LayoutContext, plan: DividerPlan) -> Self {
        Self {
            containers_bus: ctx.containers_bus().clone(),
            before_event: plan.before.resize_event(),
            after_event: plan.after.resize_event(),
            plan,
        }
    }

    /// The container before (left/top of) this divider.
    #[must_use]
    pub fn before(&self) -> &ContainerId {
        &self.plan.before
    }

    /// The container after (right/bottom of) this divider.
    #[must_use]
    pub fn after(&self) -> &ContainerId {
        &self.plan.after
    }

    /// Apply a drag of `delta` pixels along the level's main axis.
    ///
    /// Positive delta grows `before` and shrinks `after` by the same
    /// amount; the cross axis is untouched.
    pub fn drag(&self, delta: f64) {
        self.containers_bus
            .publish(&self.before_event, BusPayload::Diff(delta));
        self.containers_bus
            .publish(&self.after_event, BusPayload::Diff(-delta));
    }
}
