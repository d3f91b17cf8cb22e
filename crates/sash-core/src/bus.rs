#![forbid(unsafe_code)]

//! Named-event publish/subscribe registry.
//!
//! One [`EventBus`] serves one layout scope. Levels, containers, and
//! floats communicate size changes through string-named events instead
//! of holding references to each other.
//!
//! # Design
//!
//! The bus is a cheap-clone handle over shared interior state
//! (`Rc<RefCell<..>>`); every clone sees the same listener registry.
//! Publishing is synchronous and depth-first: a listener may publish
//! further events, and those are fully processed before control returns
//! to the original publisher.
//!
//! Rust closures have no stable identity, so each listener is
//! registered under a caller-held [`ListenerId`]. Subscribe has set
//! semantics: registering the same `(event, id)` pair twice is a no-op,
//! so a listener fires at most once per publish.
//!
//! # Failure Modes
//!
//! - **Listener panic**: panics are not caught; a panicking listener
//!   aborts the remaining listeners of that publish pass and unwinds to
//!   the publisher.
//! - **Unknown event names**: publishing or unsubscribing against a
//!   name nobody registered is a silent no-op, never an error.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Event name for "descendants should re-measure".
pub const RESIZE: &str = "resize";

/// Event name for "siblings must redistribute along the main axis".
pub const LAYOUT_RESIZE: &str = "layout-resize";

/// Build the per-container resize event name (`resize.<id>`).
#[must_use]
pub fn container_resize_event(id: &str) -> String {
    format!("resize.{id}")
}

/// Payload carried by a publish.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusPayload {
    /// No payload (`resize`).
    #[default]
    Empty,
    /// Signed main-axis delta (`layout-resize`).
    AxisDelta(f64),
    /// Signed size adjustment for one container (`resize.<id>`).
    Diff(f64),
}

impl BusPayload {
    /// The signed delta carried by `AxisDelta` or `Diff`, if any.
    #[must_use]
    pub fn delta(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::AxisDelta(delta) | Self::Diff(delta) => Some(*delta),
        }
    }
}

/// Identity of one registered listener.
///
/// Allocated from [`EventBus::listener_id`]; the same id may be reused
/// across event names by one logical subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

type Callback = Rc<dyn Fn(&BusPayload)>;

struct Entry {
    id: ListenerId,
    callback: Callback,
}

struct BusInner {
    events: FxHashMap<String, Vec<Entry>>,
    next_listener: u64,
}

/// A synchronous, order-preserving event bus keyed by string names.
///
/// # Invariants
///
/// 1. Listeners for one event fire in registration order.
/// 2. A `(event, id)` pair is registered at most once.
/// 3. The listener list is never mutated during a publish pass:
///    callbacks are snapshotted first, so a listener that unsubscribes
///    itself (or others) affects only later publishes.
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

// Manual Clone: shares the same inner registry.
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("events", &inner.events.len())
            .field("next_listener", &inner.next_listener)
            .finish()
    }
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                events: FxHashMap::default(),
                next_listener: 0,
            })),
        }
    }

    /// Allocate a fresh listener identity.
    pub fn listener_id(&self) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener);
        inner.next_listener += 1;
        id
    }

    /// Register `callback` for `event` under `id`.
    ///
    /// Returns `true` if the listener was newly added, `false` if the
    /// `(event, id)` pair was already registered (no-op; the original
    /// callback stays in place).
    pub fn subscribe(
        &self,
        event: &str,
        id: ListenerId,
        callback: impl Fn(&BusPayload) + 'static,
    ) -> bool {
        let mut inner = self.inner.borrow_mut();
        let listeners = inner.events.entry(event.to_owned()).or_default();
        if listeners.iter().any(|entry| entry.id == id) {
            return false;
        }
        listeners.push(Entry {
            id,
            callback: Rc::new(callback),
        });
        #[cfg(feature = "tracing")]
        tracing::trace!(event, listener = id.get(), "listener subscribed");
        true
    }

    /// Register `callback` for `event` under a fresh id, returning an
    /// RAII guard that unsubscribes on drop.
    ///
    /// This is the wiring used for parent-resize relays and transient
    /// drag listeners: the subscription cannot outlive its owner even
    /// on abnormal teardown.
    #[must_use]
    pub fn subscribe_guarded(
        &self,
        event: &str,
        callback: impl Fn(&BusPayload) + 'static,
    ) -> BusSubscription {
        let id = self.listener_id();
        self.subscribe(event, id, callback);
        BusSubscription {
            bus: self.clone(),
            event: event.to_owned(),
            id,
        }
    }

    /// Remove the listener registered for `event` under `id`.
    ///
    /// Returns `true` if a matching entry was removed. Unknown event
    /// names or ids are a no-op.
    pub fn unsubscribe(&self, event: &str, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(listeners) = inner.events.get_mut(event) else {
            return false;
        };
        let Some(index) = listeners.iter().position(|entry| entry.id == id) else {
            return false;
        };
        listeners.remove(index);
        #[cfg(feature = "tracing")]
        tracing::trace!(event, listener = id.get(), "listener unsubscribed");
        true
    }

    /// Invoke every listener currently registered for `event`, in
    /// registration order, passing `payload`.
    ///
    /// Publishing to an event with no listeners is a no-op. Callbacks
    /// are snapshotted before the first invocation, so subscribe and
    /// unsubscribe calls made by listeners take effect from the next
    /// publish onward.
    pub fn publish(&self, event: &str, payload: BusPayload) {
        let callbacks: Vec<Callback> = {
            let inner = self.inner.borrow();
            match inner.events.get(event) {
                Some(listeners) => listeners
                    .iter()
                    .map(|entry| Rc::clone(&entry.callback))
                    .collect(),
                None => return,
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(event, listeners = callbacks.len(), "publish");

        for callback in &callbacks {
            callback(&payload);
        }
    }

    /// Number of listeners currently registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .events
            .get(event)
            .map_or(0, Vec::len)
    }
}

/// RAII guard for one `(event, id)` registration.
///
/// Dropping the guard removes the listener from its bus. The guard
/// keeps a handle to the bus alive, never the other way around, so
/// dropping the owning scope releases the whole registry.
pub struct BusSubscription {
    bus: EventBus,
    event: String,
    id: ListenerId,
}

impl BusSubscription {
    /// The registered listener identity.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The event name this guard is bound to.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl Drop for BusSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.event, self.id);
    }
}

impl std::fmt::Debug for BusSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusSubscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish()
    }
}
