use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::event::{EditorEvent, EventHandler};

type SharedHandler = Rc<RefCell<Box<dyn EventHandler>>>;

/// Token returned by [`EventBus::subscribe`], used to detach the handler again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

/// A simple event bus for broadcasting editor events to registered handlers
///
/// Emission is synchronous and works on a snapshot of the handler list, so a
/// handler may subscribe, unsubscribe or emit on the same bus. Handlers added
/// during an emit first hear the next event; a handler removed during an emit
/// is not called again. An event emitted from inside a handler skips handlers
/// that are still busy with the outer event.
pub struct EventBus {
    handlers: RefCell<Vec<(HandlerId, SharedHandler)>>,
    next_id: Cell<usize>,
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
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(RefCell::new(handler))));
        id
    }

    /// Detach a handler. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_subscribed(&self, id: HandlerId) -> bool {
        self.handlers.borrow().iter().any(|(handler_id, _)| *handler_id == id)
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: EditorEvent) {
        let snapshot = self.handlers.borrow().clone();
        for (id, handler) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut handler) => handler.handle_event(&event),
                Err(_) => log::trace!("Handler {:?} is busy, skipping {:?}", id, event),
            }
        }
    }
}
