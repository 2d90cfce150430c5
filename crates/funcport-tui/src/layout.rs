//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Header area (title + view tabs + keybindings)
    pub header: Rect,
    /// Main content area (editor, integrate, or invocations view)
    pub body: Rect,
    /// Status bar
    pub status: Rect,
}

/// Split the screen into header, body, and status bar.
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

/// Split the editor body into the file pane and the buffer pane.
pub fn split_editor(area: Rect) -> (Rect, Rect) {
    let chunks =
        Layout::horizontal([Constraint::Length(28), Constraint::Min(20)]).split(area);
    (chunks[0], chunks[1])
}

/// Centered overlay rect for dialogs.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
