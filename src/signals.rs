use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/*
 * Typed publish/subscribe channels between the editing kernel and its
 * observers. Dispatch is synchronous and single-threaded; handlers run
 * outside the bus borrow so they may subscribe, unsubscribe, or publish
 * to OTHER channels freely. Publishing back into the channel currently
 * dispatching is a handler bug and is rejected.
 */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    ObjectAdded,
    ObjectChanged,
    ObjectRemoved,
    GeometryChanged,
    SceneGraphChanged,
    HistoryChanged,
    ObjectSelected,
    ZoneAdded,
    ZoneRemoved,
    ZoneGeometryChanged,
    AutocalculateChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalPayload {
    None,
    Object(Uuid),
}

impl SignalPayload {
    pub fn object(&self) -> Option<Uuid> {
        match self {
            SignalPayload::Object(uuid) => Some(*uuid),
            SignalPayload::None => None,
        }
    }
}

struct HandlerSlot {
    id: u64,
    handler: Box<dyn FnMut(SignalPayload)>,
}

#[derive(Default)]
struct BusInner {
    channels: FxHashMap<SignalKind, Vec<HandlerSlot>>,
    next_id: u64,
    dispatching: FxHashSet<SignalKind>,
    /// Handler ids dropped while their channel's vec was moved out for
    /// dispatch; filtered when the vec is merged back.
    removed_during_dispatch: Vec<(SignalKind, u64)>,
    suppressed: FxHashMap<SignalKind, u32>,
}

/// Cloneable handle to a shared signal bus.
#[derive(Clone, Default)]
pub struct SignalBus {
    inner: Rc<RefCell<BusInner>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler on one channel. The handler stays registered
    /// for as long as the returned `Subscription` is alive.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe(
        &self,
        kind: SignalKind,
        handler: impl FnMut(SignalPayload) + 'static,
    ) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.channels.entry(kind).or_default().push(HandlerSlot {
            id,
            handler: Box::new(handler),
        });
        Subscription {
            bus: Rc::downgrade(&self.inner),
            kind,
            id,
        }
    }

    /// Deliver `payload` to every handler of `kind`, in subscription
    /// order. Suppressed channels drop the signal silently. Handlers
    /// subscribed during dispatch do not see the current signal.
    pub fn publish(&self, kind: SignalKind, payload: SignalPayload) {
        let mut slots = {
            let mut inner = self.inner.borrow_mut();
            if inner.suppressed.get(&kind).copied().unwrap_or(0) > 0 {
                return;
            }
            if inner.dispatching.contains(&kind) {
                debug_assert!(false, "re-entrant publish on {kind:?}");
                tracing::warn!(?kind, "re-entrant publish dropped");
                return;
            }
            inner.dispatching.insert(kind);
            inner.channels.remove(&kind).unwrap_or_default()
        };

        for slot in &mut slots {
            (slot.handler)(payload);
        }

        let mut inner = self.inner.borrow_mut();
        inner.dispatching.remove(&kind);
        let removed: Vec<u64> = inner
            .removed_during_dispatch
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .collect();
        inner.removed_during_dispatch.retain(|(k, _)| *k != kind);
        slots.retain(|slot| !removed.contains(&slot.id));
        // Handlers registered during dispatch landed in a fresh vec;
        // keep them after the pre-existing ones.
        let added = inner.channels.remove(&kind).unwrap_or_default();
        slots.extend(added);
        if !slots.is_empty() {
            inner.channels.insert(kind, slots);
        }
    }

    /// Suppress a channel for the lifetime of the returned guard. Guards
    /// nest; the channel reopens when the last one drops.
    #[must_use = "the channel is only suppressed while the guard is alive"]
    pub fn suppress(&self, kind: SignalKind) -> SuppressGuard {
        *self
            .inner
            .borrow_mut()
            .suppressed
            .entry(kind)
            .or_default() += 1;
        SuppressGuard {
            bus: Rc::downgrade(&self.inner),
            kind,
        }
    }

    pub fn handler_count(&self, kind: SignalKind) -> usize {
        self.inner
            .borrow()
            .channels
            .get(&kind)
            .map_or(0, |v| v.len())
    }
}

/// RAII registration handle; dropping it removes the handler.
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    kind: SignalKind,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        let mut inner = bus.borrow_mut();
        if let Some(slots) = inner.channels.get_mut(&self.kind) {
            slots.retain(|slot| slot.id != self.id);
        }
        if inner.dispatching.contains(&self.kind) {
            // The handler may be in the vec currently out for dispatch.
            inner.removed_during_dispatch.push((self.kind, self.id));
        }
    }
}

pub struct SuppressGuard {
    bus: Weak<RefCell<BusInner>>,
    kind: SignalKind,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        let mut inner = bus.borrow_mut();
        if let Some(count) = inner.suppressed.get_mut(&self.kind) {
            *count = count.saturating_sub(1);
        }
    }
}
