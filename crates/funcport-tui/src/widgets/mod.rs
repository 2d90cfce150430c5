//! Widgets for the Funcport TUI

pub mod dialogs;
pub mod editor_pane;
pub mod file_pane;
pub mod header;
pub mod integrate;
pub mod invocations;
pub mod status_bar;
pub mod test_panel;

pub use dialogs::ConfirmDialog;
pub use editor_pane::EditorPane;
pub use file_pane::FilePane;
pub use header::MainHeader;
pub use integrate::IntegrateView;
pub use invocations::InvocationsView;
pub use status_bar::StatusBar;
pub use test_panel::TestPanel;
