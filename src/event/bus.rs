use std::cell::RefCell;

use super::StoreEvent;

/// A handler registered on the event bus.
pub trait StoreEventHandler {
    fn handle_event(&mut self, event: &StoreEvent);
}

// Closures are handlers too; most consumers subscribe with one.
impl<F: FnMut(&StoreEvent)> StoreEventHandler for F {
    fn handle_event(&mut self, event: &StoreEvent) {
        self(event)
    }
}

/// A simple event bus broadcasting store events to registered handlers.
///
/// Single-threaded by design: the store is mutated only from one logical
/// thread of control, so interior mutability via `RefCell` suffices.
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn StoreEventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus with no subscribers
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive all store events
    pub fn subscribe(&self, handler: Box<dyn StoreEventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: &StoreEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(event);
        }
    }
}
