//! Document-level pointer listeners.
//!
//! The editor forwards every pointer press to the [`PointerHub`] before any
//! widget sees it (capture phase). Components register a listener and keep
//! the returned [`ListenerGuard`]; dropping the guard unregisters the
//! listener, so a torn-down component never leaves a listener behind.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Drag,
    Release,
}

/// A pointer interaction in screen cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub column: u16,
    pub row: u16,
    pub kind: PointerKind,
}

impl PointerEvent {
    pub fn press(column: u16, row: u16) -> Self {
        Self {
            column,
            row,
            kind: PointerKind::Press,
        }
    }
}

type Listener = Box<dyn FnMut(&PointerEvent)>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    dispatching: bool,
    removed_during_dispatch: Vec<u64>,
}

/// Registry of capture-phase pointer listeners
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl std::fmt::Debug for PointerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays installed until the guard is dropped.
    pub fn register(&self, listener: impl FnMut(&PointerEvent) + 'static) -> ListenerGuard {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        tracing::trace!(id, "Pointer listener registered");
        ListenerGuard {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every registered listener, in registration order
    pub fn dispatch(&self, event: &PointerEvent) {
        let mut listeners = {
            let mut inner = self.inner.borrow_mut();
            inner.dispatching = true;
            std::mem::take(&mut inner.listeners)
        };

        // No borrow is held here, so listeners may register or drop guards
        for (_, listener) in listeners.iter_mut() {
            listener(event);
        }

        let mut inner = self.inner.borrow_mut();
        inner.dispatching = false;
        let removed = std::mem::take(&mut inner.removed_during_dispatch);
        listeners.retain(|(id, _)| !removed.contains(id));
        let added = std::mem::take(&mut inner.listeners);
        listeners.extend(added);
        inner.listeners = listeners;
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Unregisters its listener when dropped
#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        let Ok(mut inner) = hub.try_borrow_mut() else {
            return;
        };
        inner.listeners.retain(|(id, _)| *id != self.id);
        if inner.dispatching {
            inner.removed_during_dispatch.push(self.id);
        }
        tracing::trace!(id = self.id, "Pointer listener removed");
    }
}
