mod table_panel;
mod tools_panel;
mod windows;

pub use table_panel::table_panel;
pub use tools_panel::{status_bar, tools_panel};
pub use windows::{info_window, restart_dialog, timeline_window};
