mod bus;
mod events;

pub use bus::{EventBus, HandlerId};
pub use events::EditorEvent;

/// A view or other collaborator that wants to hear about document and
/// history changes. Handlers are invoked synchronously, in subscription order.
pub trait EventHandler {
    fn handle_event(&mut self, event: &EditorEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&EditorEvent),
{
    fn handle_event(&mut self, event: &EditorEvent) {
        self(event)
    }
}
