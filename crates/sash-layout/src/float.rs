#![forbid(unsafe_code)]

//! Free-floating panels with drag-move and drag-resize.
//!
//! A float owns its position and size outright; no sibling
//! redistribution applies to it. Two independent gestures mutate it:
//!
//! - **move** — pointer-down on the drag bar captures the
//!   pointer-to-panel offset, each move re-places the panel at
//!   `pointer - offset`;
//! - **resize** — pointer-down on one of eight edge/corner grips, each
//!   move converts the pointer delta into per-edge adjustments.
//!
//! Gesture lifecycle is an explicit state machine
//! ([`FloatDragMachine`]) so hosts can wire pointer capture however
//! they like and still get deterministic transitions, including
//! explicit no-op diagnostics and a [`FloatDragMachine::force_cancel`]
//! safety valve for abandoned drags (lost pointer-up, teardown
//! mid-gesture).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sash_core::bus::{BusPayload, EventBus, RESIZE};
use sash_core::geometry::Point;
use serde::{Deserialize, Serialize};

use crate::context::LayoutContext;

/// Initial configuration for a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatConfig {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub is_open: bool,
    /// Fixed-size floats expose no resize grips (move-only).
    pub is_fixed_size: bool,
    /// Label for the close affordance, exposed to assistive tech by
    /// the rendering layer.
    pub close_label: String,
}

impl FloatConfig {
    /// Config with the given size at origin, closed, resizable.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            width,
            height,
            is_open: false,
            is_fixed_size: false,
            close_label: "Close".to_owned(),
        }
    }

    /// Place the float at the given position.
    #[must_use]
    pub fn at(mut self, top: f64, left: f64) -> Self {
        self.top = top;
        self.left = left;
        self
    }

    /// Start open.
    #[must_use]
    pub fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    /// Make the float move-only.
    #[must_use]
    pub fn fixed_size(mut self) -> Self {
        self.is_fixed_size = true;
        self
    }

    /// Set the close affordance label.
    #[must_use]
    pub fn close_label(mut self, label: impl Into<String>) -> Self {
        self.close_label = label.into();
        self
    }

    fn validate(&self) -> Result<(), FloatConfigError> {
        if self.width < 0.0 {
            return Err(FloatConfigError::NegativeSize {
                dimension: "width",
                value: self.width,
            });
        }
        if self.height < 0.0 {
            return Err(FloatConfigError::NegativeSize {
                dimension: "height",
                value: self.height,
            });
        }
        Ok(())
    }
}

/// Rejected float configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum FloatConfigError {
    NegativeSize { dimension: &'static str, value: f64 },
}

impl fmt::Display for FloatConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeSize { dimension, value } => {
                write!(f, "float {dimension} must be non-negative, got {value}")
            }
        }
    }
}

impl std::error::Error for FloatConfigError {}

/// Position and size of a floating panel. Owned exclusively by the
/// float; mutated only by its own gesture handlers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatState {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub is_open: bool,
}

impl FloatState {
    fn apply_edge_diff(&mut self, diff: EdgeDiff) {
        self.left += diff.left;
        self.top += diff.top;
        self.width -= diff.left + diff.right;
        self.height -= diff.top + diff.bottom;
    }
}

/// One of the eight resize grips on a float's edges and corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeGrip {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeGrip {
    /// All grips, for rendering a resizable float's handle regions.
    pub const ALL: [ResizeGrip; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    const fn west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    const fn east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    const fn north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    const fn south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    /// Convert a pointer delta into this grip's per-edge adjustments.
    ///
    /// Components are shrink amounts: dragging a west-side grip right
    /// by `dx` yields `left: dx` (panel narrows and slides right);
    /// dragging an east-side grip right yields `right: -dx` (panel
    /// widens). Edges the grip does not touch stay zero.
    #[must_use]
    pub fn edge_diff(self, dx: f64, dy: f64) -> EdgeDiff {
        EdgeDiff {
            left: if self.west() { dx } else { 0.0 },
            right: if self.east() { -dx } else { 0.0 },
            top: if self.north() { dy } else { 0.0 },
            bottom: if self.south() { -dy } else { 0.0 },
        }
    }
}

/// Per-edge shrink amounts produced by one resize-drag step.
///
/// Applying: position moves by `(left, top)`, width shrinks by
/// `left + right`, height by `top + bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeDiff {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Lifecycle state of a float gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Moving { offset: Point },
    Resizing { grip: ResizeGrip, last: Point },
}

/// Why a gesture event was safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    DragAlreadyActive,
    FixedSizeFloat,
}

/// Outcome of one gesture lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    MoveStarted { offset: Point },
    /// New panel position; no size change.
    Moved { left: f64, top: f64 },
    ResizeStarted { grip: ResizeGrip },
    /// Per-edge adjustments to apply for this step.
    Resized { diff: EdgeDiff },
    Committed,
    Canceled,
    Noop { reason: DragNoopReason },
}

/// Pure gesture state machine for float move and resize drags.
///
/// Holds no panel state: callers supply the panel origin at move start
/// and apply the emitted effects themselves. [`Float`] wraps this with
/// state application and resize notification.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatDragMachine {
    state: DragState,
}

impl Default for DragState {
    fn default() -> Self {
        Self::Idle
    }
}

impl FloatDragMachine {
    /// A machine in the `Idle` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Pointer-down on the drag bar. `origin` is the panel's current
    /// `(left, top)`; the captured offset is `pointer - origin`.
    pub fn pointer_down_move(&mut self, pointer: Point, origin: Point) -> DragEffect {
        if self.is_active() {
            return DragEffect::Noop {
                reason: DragNoopReason::DragAlreadyActive,
            };
        }
        let offset = Point::new(pointer.x - origin.x, pointer.y - origin.y);
        self.state = DragState::Moving { offset };
        DragEffect::MoveStarted { offset }
    }

    /// Pointer-down on a resize grip.
    pub fn pointer_down_resize(&mut self, grip: ResizeGrip, pointer: Point) -> DragEffect {
        if self.is_active() {
            return DragEffect::Noop {
                reason: DragNoopReason::DragAlreadyActive,
            };
        }
        self.state = DragState::Resizing {
            grip,
            last: pointer,
        };
        DragEffect::ResizeStarted { grip }
    }

    /// Pointer moved during an active gesture.
    pub fn pointer_move(&mut self, pointer: Point) -> DragEffect {
        match self.state {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            DragState::Moving { offset } => DragEffect::Moved {
                left: pointer.x - offset.x,
                top: pointer.y - offset.y,
            },
            DragState::Resizing { grip, last } => {
                let diff = grip.edge_diff(pointer.x - last.x, pointer.y - last.y);
                self.state = DragState::Resizing {
                    grip,
                    last: pointer,
                };
                DragEffect::Resized { diff }
            }
        }
    }

    /// Pointer released; ends the gesture.
    pub fn pointer_up(&mut self) -> DragEffect {
        if !self.is_active() {
            return DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            };
        }
        self.state = DragState::Idle;
        DragEffect::Committed
    }

    /// Unconditionally reset to `Idle`.
    ///
    /// The safety valve for abandoned drags: a lost pointer-up, focus
    /// loss, or teardown mid-gesture. Returns the `Canceled` effect if
    /// a gesture was active, `None` if already idle.
    pub fn force_cancel(&mut self) -> Option<DragEffect> {
        if !self.is_active() {
            return None;
        }
        self.state = DragState::Idle;
        Some(DragEffect::Canceled)
    }
}

struct FloatInner {
    state: FloatState,
    is_fixed_size: bool,
    close_label: String,
    layout_bus: EventBus,
    machine: FloatDragMachine,
}

/// A mounted floating panel.
///
/// The float publishes `resize` on its level's layout bus whenever its
/// content may need to re-measure: after every resize-drag step, and
/// once when it opens (content measured while hidden is corrected).
/// Plain moves never publish.
pub struct Float {
    inner: Rc<RefCell<FloatInner>>,
}

impl fmt::Debug for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Float")
            .field("state", &inner.state)
            .field("is_fixed_size", &inner.is_fixed_size)
            .field("drag", &inner.machine.state())
            .finish_non_exhaustive()
    }
}

impl Float {
    /// Mount a float into its level.
    ///
    /// A float mounted open publishes its one opening `resize`
    /// immediately.
    pub fn mount(ctx: &LayoutContext, config: FloatConfig) -> Result<Self, FloatConfigError> {
        config.validate()?;
        let is_open = config.is_open;
        let inner = Rc::new(RefCell::new(FloatInner {
            state: FloatState {
                top: config.top,
                left: config.left,
                width: config.width,
                height: config.height,
                is_open,
            },
            is_fixed_size: config.is_fixed_size,
            close_label: config.close_label,
            layout_bus: ctx.layout_bus().clone(),
            machine: FloatDragMachine::new(),
        }));

        let float = Self { inner };
        if is_open {
            float.publish_resize();
        }
        Ok(float)
    }

    /// Current position, size, and open flag.
    #[must_use]
    pub fn state(&self) -> FloatState {
        self.inner.borrow().state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.borrow().state.is_open
    }

    #[must_use]
    pub fn is_fixed_size(&self) -> bool {
        self.inner.borrow().is_fixed_size
    }

    /// The close affordance label.
    #[must_use]
    pub fn close_label(&self) -> String {
        self.inner.borrow().close_label.clone()
    }

    /// Resize grips to render: all eight, or none for a fixed-size
    /// (move-only) float.
    #[must_use]
    pub fn grips(&self) -> &'static [ResizeGrip] {
        if self.inner.borrow().is_fixed_size {
            &[]
        } else {
            &ResizeGrip::ALL
        }
    }

    /// Open the float. The false→true transition publishes `resize`
    /// exactly once, whether or not the size changed while hidden;
    /// opening an already-open float does nothing.
    pub fn open(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_open {
                return;
            }
            inner.state.is_open = true;
        }
        self.publish_resize();
    }

    /// Close the float. No event; hidden content is corrected on the
    /// next open.
    pub fn close(&self) {
        self.inner.borrow_mut().state.is_open = false;
    }

    /// Current gesture lifecycle state.
    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.inner.borrow().machine.state()
    }

    /// Pointer-down on the drag bar; captures the pointer-to-panel
    /// offset.
    pub fn begin_move(&self, pointer: Point) -> DragEffect {
        let mut inner = self.inner.borrow_mut();
        let origin = Point::new(inner.state.left, inner.state.top);
        let effect = inner.machine.pointer_down_move(pointer, origin);
        #[cfg(feature = "tracing")]
        tracing::trace!(?effect, "float drag");
        effect
    }

    /// Pointer-down on a resize grip. A fixed-size float refuses with
    /// `Noop { reason: FixedSizeFloat }` and stays idle.
    pub fn begin_resize(&self, grip: ResizeGrip, pointer: Point) -> DragEffect {
        let mut inner = self.inner.borrow_mut();
        if inner.is_fixed_size {
            return DragEffect::Noop {
                reason: DragNoopReason::FixedSizeFloat,
            };
        }
        let effect = inner.machine.pointer_down_resize(grip, pointer);
        #[cfg(feature = "tracing")]
        tracing::trace!(?effect, "float drag");
        effect
    }

    /// Pointer moved during an active gesture. Applies the effect to
    /// the panel; a resize step also publishes `resize` so content
    /// re-measures.
    pub fn pointer_move(&self, pointer: Point) -> DragEffect {
        let (effect, resized) = {
            let mut inner = self.inner.borrow_mut();
            let effect = inner.machine.pointer_move(pointer);
            let resized = match effect {
                DragEffect::Moved { left, top } => {
                    inner.state.left = left;
                    inner.state.top = top;
                    false
                }
                DragEffect::Resized { diff } => {
                    inner.state.apply_edge_diff(diff);
                    true
                }
                _ => false,
            };
            (effect, resized)
        };
        if resized {
            self.publish_resize();
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(?effect, "float drag");
        effect
    }

    /// Pointer released; commits the gesture.
    pub fn pointer_up(&self) -> DragEffect {
        self.inner.borrow_mut().machine.pointer_up()
    }

    /// Abort any active gesture; `true` if one was canceled.
    ///
    /// Hosts that can observe focus loss or pointer-capture loss call
    /// this in place of the pointer-up they will never receive.
    pub fn cancel_drag(&self) -> bool {
        self.inner.borrow_mut().machine.force_cancel().is_some()
    }

    fn publish_resize(&self) {
        let bus = self.inner.borrow().layout_bus.clone();
        bus.publish(RESIZE, BusPayload::Empty);
    }
}
