#![forbid(unsafe_code)]

//! Dimension measurement and change detection.
//!
//! A [`DimensionTracker`] binds one renderable region to a host-supplied
//! [`Measure`] probe. It never polls on its own: the host (or a parent
//! level's `resize` relay) calls [`DimensionTracker::recheck`] and the
//! tracker reports whether the measured size actually changed.

use std::rc::Rc;

use crate::geometry::{Dimensions, Size};

/// Measurement provider supplied by the rendering layer.
///
/// This is the only place real layout geometry enters the engine. The
/// probe must return the region's current size in logical pixels; it is
/// queried on demand and must not block.
pub trait Measure {
    fn measure(&self) -> Size;
}

impl<F: Fn() -> Size> Measure for F {
    fn measure(&self) -> Size {
        self()
    }
}

/// Tracks a region's current and previous measured size.
///
/// # Invariants
///
/// 1. `revision` increments by exactly 1 on each measurement that
///    differs from the current size; equal re-measures change nothing.
/// 2. After any change, `dimensions().last_size()` is the size that was
///    current before it.
pub struct DimensionTracker {
    probe: Rc<dyn Measure>,
    dims: Dimensions,
    revision: u64,
}

impl std::fmt::Debug for DimensionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DimensionTracker")
            .field("dims", &self.dims)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl DimensionTracker {
    /// Create a tracker, measuring immediately.
    ///
    /// The result is stored as both current and previous, so the mount
    /// measurement itself carries a zero diff and triggers nothing. A
    /// region that is not yet renderable measures `(0, 0)`; its first
    /// real size then arrives with a `(0, 0)` previous pair, which
    /// downstream consumers treat as a baseline, not a change.
    #[must_use]
    pub fn new(probe: Rc<dyn Measure>) -> Self {
        let size = probe.measure();
        Self {
            probe,
            dims: Dimensions::measured(size),
            revision: 0,
        }
    }

    /// Re-measure the region.
    ///
    /// If the measured size differs from the stored current size, the
    /// current pair shifts to previous, the new size is stored, the
    /// revision is bumped, and `true` is returned. An unchanged size is
    /// a strict no-op returning `false` — no downstream signal should
    /// be produced for it.
    pub fn recheck(&mut self) -> bool {
        let measured = self.probe.measure();
        if measured == self.dims.size() {
            return false;
        }
        self.dims.advance(measured);
        self.revision += 1;
        true
    }

    /// Current and previous measurements.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Change counter; bumps once per size-changing recheck.
    ///
    /// The Rust analog of "the dimensions object's identity changed":
    /// consumers comparing revisions see exactly one step per change.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct ScriptedProbe {
        size: Cell<Size>,
    }

    impl ScriptedProbe {
        fn new(width: f64, height: f64) -> Rc<Self> {
            Rc::new(Self {
                size: Cell::new(Size::new(width, height)),
            })
        }

        fn set(&self, width: f64, height: f64) {
            self.size.set(Size::new(width, height));
        }
    }

    impl Measure for ScriptedProbe {
        fn measure(&self) -> Size {
            self.size.get()
        }
    }

    #[test]
    fn tracker_measures_on_creation() {
        let probe = ScriptedProbe::new(800.0, 600.0);
        let tracker = DimensionTracker::new(probe);
        assert_eq!(tracker.dimensions().size(), Size::new(800.0, 600.0));
        assert_eq!(tracker.dimensions().last_size(), Size::new(800.0, 600.0));
        assert_eq!(tracker.revision(), 0);
    }

    #[test]
    fn hidden_mount_then_first_size_is_baseline() {
        let probe = ScriptedProbe::new(0.0, 0.0);
        let mut tracker = DimensionTracker::new(Rc::clone(&probe) as Rc<dyn Measure>);
        assert_eq!(tracker.dimensions().size(), Size::ZERO);

        probe.set(300.0, 200.0);
        assert!(tracker.recheck());
        let dims = tracker.dimensions();
        assert_eq!(dims.size(), Size::new(300.0, 200.0));
        assert!(dims.is_baseline());
        assert_eq!(tracker.revision(), 1);
    }

    #[test]
    fn unchanged_recheck_is_noop() {
        let probe = ScriptedProbe::new(300.0, 200.0);
        let mut tracker = DimensionTracker::new(Rc::clone(&probe) as Rc<dyn Measure>);
        assert!(!tracker.recheck());
        assert_eq!(tracker.revision(), 0);
    }

    #[test]
    fn change_shifts_current_to_previous() {
        let probe = ScriptedProbe::new(300.0, 200.0);
        let mut tracker = DimensionTracker::new(Rc::clone(&probe) as Rc<dyn Measure>);

        probe.set(320.0, 200.0);
        assert!(tracker.recheck());
        let dims = tracker.dimensions();
        assert_eq!(dims.last_size(), Size::new(300.0, 200.0));
        assert_eq!(dims.diff().width, 20.0);
        assert_eq!(tracker.revision(), 1);
    }

    #[test]
    fn closure_probe_works() {
        let mut tracker = DimensionTracker::new(Rc::new(|| Size::new(10.0, 10.0)));
        assert_eq!(tracker.dimensions().size(), Size::new(10.0, 10.0));
        assert!(!tracker.recheck());
    }
}
