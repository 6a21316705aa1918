mod actions;
mod session;

pub use actions::ActionState;
pub use session::EditorSession;
