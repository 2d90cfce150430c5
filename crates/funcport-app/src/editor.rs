//! Editor view state: file selection, buffer editing, dirty/discard flow.
//!
//! The invariant the dialogs protect: unsaved edits are never dropped
//! silently. Switching files or discarding while dirty must go through a
//! confirmation; the only outcomes are discard-and-proceed or cancel.

use funcport_core::{language_for_file, EditorLanguage, FileContent};
use funcport_api::models::{FunctionInfo, VfsObject};

/// Which pane has keyboard focus inside the editor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorFocus {
    #[default]
    Files,
    Buffer,
}

/// State for the function editor screen.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub selected_file: Option<VfsObject>,
    pub content: FileContent,
    pub language: EditorLanguage,
    pub fetching_content: bool,
    pub saving: bool,
    /// `None` until the first content fetch resolves
    pub content_available: Option<bool>,
    /// File chosen while the buffer was dirty, awaiting confirmation
    pub pending_switch: Option<VfsObject>,
    pub show_discard_dialog: bool,
    pub file_saved_count: u32,
    pub insert_mode: bool,
    /// Char offset of the cursor within `content.latest`
    pub cursor: usize,
    pub focus: EditorFocus,
    /// Highlighted row in the file pane
    pub file_index: usize,
}

impl EditorState {
    pub fn is_dirty(&self) -> bool {
        self.content.is_dirty()
    }

    pub fn is_loading(&self) -> bool {
        self.fetching_content || self.saving
    }

    // ─────────────────────────────────────────────────────────────────────
    // File selection
    // ─────────────────────────────────────────────────────────────────────

    /// Selectable files: directories filtered out, sorted by name.
    pub fn file_options(file_list: &[VfsObject]) -> Vec<VfsObject> {
        let mut options: Vec<VfsObject> = file_list
            .iter()
            .filter(|f| !f.is_directory())
            .cloned()
            .collect();
        options.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        options
    }

    /// Default selection: the file named by `script_href` when it appears in
    /// the list exactly once, else the first option.
    pub fn default_file(options: &[VfsObject], info: &FunctionInfo) -> Option<VfsObject> {
        if let Some(script_name) = info.script_file_name() {
            let matches: Vec<&VfsObject> = options
                .iter()
                .filter(|f| f.name.to_lowercase() == script_name)
                .collect();
            if matches.len() == 1 {
                return Some(matches[0].clone());
            }
        }
        options.first().cloned()
    }

    /// Ask to select `file`. Returns `true` when the switch can proceed
    /// immediately; `false` parks it behind the confirmation dialog.
    pub fn request_switch(&mut self, file: VfsObject) -> bool {
        if self.is_dirty() {
            self.pending_switch = Some(file);
            return false;
        }
        self.begin_fetch(file);
        true
    }

    /// Confirm the parked switch: drops unsaved edits and returns the file
    /// whose content should now be fetched.
    pub fn confirm_switch(&mut self) -> Option<VfsObject> {
        let file = self.pending_switch.take()?;
        self.content.discard();
        self.begin_fetch(file.clone());
        Some(file)
    }

    pub fn cancel_switch(&mut self) {
        self.pending_switch = None;
    }

    /// Mark `file` selected and expect a content fetch.
    pub fn begin_fetch(&mut self, file: VfsObject) {
        self.language = language_for_file(&file.name);
        self.selected_file = Some(file);
        self.fetching_content = true;
        self.insert_mode = false;
        self.cursor = 0;
    }

    /// Apply a resolved content fetch; `None` flags the file unavailable.
    pub fn apply_content(&mut self, content: Option<String>) {
        self.fetching_content = false;
        match content {
            Some(text) => {
                self.content = FileContent::new(text);
                self.content_available = Some(true);
            }
            None => {
                self.content = FileContent::default();
                self.content_available = Some(false);
            }
        }
        self.cursor = 0;
    }

    /// Fetched JSON bodies are pretty-printed before display; everything
    /// else passes through verbatim.
    pub fn normalize_file_text(text: String, mime: &str) -> String {
        if !mime.to_lowercase().contains("json") {
            return text;
        }
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(text),
            Err(_) => text,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Discard flow
    // ─────────────────────────────────────────────────────────────────────

    /// Open the discard dialog (no-op when the buffer is clean).
    pub fn request_discard(&mut self) {
        if self.is_dirty() {
            self.show_discard_dialog = true;
        }
    }

    pub fn confirm_discard(&mut self) {
        self.content.discard();
        self.cursor = self.cursor.min(self.content.latest.chars().count());
        self.show_discard_dialog = false;
    }

    pub fn cancel_discard(&mut self) {
        self.show_discard_dialog = false;
    }

    /// Record a successful save.
    pub fn apply_saved(&mut self) {
        self.saving = false;
        self.content.mark_saved();
        self.file_saved_count += 1;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Buffer editing
    // ─────────────────────────────────────────────────────────────────────

    pub fn insert_char(&mut self, c: char) {
        let offset = byte_offset(&self.content.latest, self.cursor);
        self.content.latest.insert(offset, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let offset = byte_offset(&self.content.latest, self.cursor - 1);
        self.content.latest.remove(offset);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.content.latest.chars().count() {
            return;
        }
        let offset = byte_offset(&self.content.latest, self.cursor);
        self.content.latest.remove(offset);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let len = self.content.latest.chars().count();
        self.cursor = (self.cursor + 1).min(len);
    }

    pub fn move_line_start(&mut self) {
        let (line, _) = self.cursor_position();
        self.cursor = line_start(&self.content.latest, line);
    }

    pub fn move_line_end(&mut self) {
        let (line, _) = self.cursor_position();
        self.cursor = line_start(&self.content.latest, line) + line_len(&self.content.latest, line);
    }

    pub fn move_up(&mut self) {
        let (line, column) = self.cursor_position();
        if line == 0 {
            return;
        }
        let target = line - 1;
        self.cursor =
            line_start(&self.content.latest, target) + column.min(line_len(&self.content.latest, target));
    }

    pub fn move_down(&mut self) {
        let (line, column) = self.cursor_position();
        let lines = self.content.latest.split('\n').count();
        if line + 1 >= lines {
            return;
        }
        let target = line + 1;
        self.cursor =
            line_start(&self.content.latest, target) + column.min(line_len(&self.content.latest, target));
    }

    /// Current (line, column) of the cursor, both zero-based and in chars.
    pub fn cursor_position(&self) -> (usize, usize) {
        let mut line = 0;
        let mut column = 0;
        for (i, c) in self.content.latest.chars().enumerate() {
            if i == self.cursor {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(offset, _)| offset)
        .unwrap_or(s.len())
}

/// Char offset of the start of `line` (zero-based).
fn line_start(s: &str, line: usize) -> usize {
    let mut offset = 0;
    for (i, text) in s.split('\n').enumerate() {
        if i == line {
            return offset;
        }
        offset += text.chars().count() + 1;
    }
    offset
}

/// Length of `line` in chars, excluding the newline.
fn line_len(s: &str, line: usize) -> usize {
    s.split('\n')
        .nth(line)
        .map(|text| text.chars().count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> VfsObject {
        VfsObject {
            name: name.to_string(),
            mime: mime.to_string(),
            href: format!("https://host/vfs/{name}"),
            size: None,
        }
    }

    fn state_with_content(text: &str) -> EditorState {
        EditorState {
            content: FileContent::new(text),
            ..EditorState::default()
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // File options
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn test_file_options_filters_directories_and_sorts() {
        let list = vec![
            file("zeta.js", "text/javascript"),
            file("bin", "inode/directory"),
            file("Alpha.json", "application/json"),
        ];
        let options = EditorState::file_options(&list);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].name, "Alpha.json");
        assert_eq!(options[1].name, "zeta.js");
    }

    #[test]
    fn test_default_file_matches_script_href() {
        let options = vec![file("function.json", "application/json"), file("run.csx", "text/plain")];
        let info = FunctionInfo {
            script_href: Some("https://host/vfs/foo/Run.csx".to_string()),
            ..FunctionInfo::default()
        };
        let selected = EditorState::default_file(&options, &info).unwrap();
        assert_eq!(selected.name, "run.csx");
    }

    #[test]
    fn test_default_file_falls_back_to_first() {
        let options = vec![file("a.json", "application/json"), file("b.js", "text/javascript")];
        let info = FunctionInfo::default();
        let selected = EditorState::default_file(&options, &info).unwrap();
        assert_eq!(selected.name, "a.json");

        assert!(EditorState::default_file(&[], &info).is_none());
    }

    // ─────────────────────────────────────────────────────────────────────
    // Dirty/confirm flow
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn test_switch_when_clean_proceeds() {
        let mut state = state_with_content("text");
        assert!(state.request_switch(file("other.js", "text/javascript")));
        assert_eq!(state.selected_file.as_ref().unwrap().name, "other.js");
        assert!(state.fetching_content);
        assert_eq!(state.language, EditorLanguage::JavaScript);
    }

    #[test]
    fn test_switch_while_dirty_parks_behind_confirmation() {
        let mut state = state_with_content("text");
        state.insert_char('x');
        assert!(state.is_dirty());

        assert!(!state.request_switch(file("other.js", "text/javascript")));
        assert!(state.pending_switch.is_some());
        assert!(state.selected_file.is_none());
    }

    #[test]
    fn test_confirm_switch_discards_and_selects() {
        let mut state = state_with_content("text");
        state.insert_char('x');
        state.request_switch(file("other.js", "text/javascript"));

        let switched = state.confirm_switch().unwrap();
        assert_eq!(switched.name, "other.js");
        assert!(!state.is_dirty());
        assert_eq!(state.selected_file.as_ref().unwrap().name, "other.js");
    }

    #[test]
    fn test_cancel_switch_keeps_edits() {
        let mut state = state_with_content("text");
        state.insert_char('x');
        state.request_switch(file("other.js", "text/javascript"));

        state.cancel_switch();
        assert!(state.pending_switch.is_none());
        assert!(state.is_dirty());
        assert!(state.selected_file.is_none());
    }

    #[test]
    fn test_discard_dialog_flow() {
        let mut state = state_with_content("text");
        state.request_discard();
        assert!(!state.show_discard_dialog, "clean buffer needs no dialog");

        state.insert_char('x');
        state.request_discard();
        assert!(state.show_discard_dialog);

        state.confirm_discard();
        assert!(!state.is_dirty());
        assert!(!state.show_discard_dialog);
    }

    #[test]
    fn test_apply_content_success_and_failure() {
        let mut state = EditorState::default();
        state.begin_fetch(file("run.csx", "text/plain"));
        state.apply_content(Some("body".to_string()));
        assert_eq!(state.content_available, Some(true));
        assert_eq!(state.content.latest, "body");
        assert!(!state.fetching_content);

        state.begin_fetch(file("gone.csx", "text/plain"));
        state.apply_content(None);
        assert_eq!(state.content_available, Some(false));
        assert_eq!(state.content, FileContent::default());
    }

    #[test]
    fn test_apply_saved_counts() {
        let mut state = state_with_content("a");
        state.insert_char('b');
        state.saving = true;
        state.apply_saved();
        assert!(!state.is_dirty());
        assert_eq!(state.file_saved_count, 1);
    }

    #[test]
    fn test_normalize_file_text_pretty_prints_json() {
        let out = EditorState::normalize_file_text(r#"{"a":1}"#.to_string(), "application/json");
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_normalize_file_text_leaves_non_json() {
        let out = EditorState::normalize_file_text(r#"{"a":1}"#.to_string(), "text/plain");
        assert_eq!(out, r#"{"a":1}"#);

        let out = EditorState::normalize_file_text("not json".to_string(), "application/json");
        assert_eq!(out, "not json");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Buffer editing
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn test_insert_and_backspace() {
        let mut state = state_with_content("ab");
        state.move_right();
        state.insert_char('x');
        assert_eq!(state.content.latest, "axb");
        assert_eq!(state.cursor, 2);

        state.backspace();
        assert_eq!(state.content.latest, "ab");
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut state = state_with_content("a");
        state.move_right();
        state.delete();
        assert_eq!(state.content.latest, "a");
    }

    #[test]
    fn test_cursor_line_moves() {
        let mut state = state_with_content("one\ntwo\nthree");
        state.cursor = 0;
        state.move_down();
        assert_eq!(state.cursor_position(), (1, 0));

        state.move_line_end();
        assert_eq!(state.cursor_position(), (1, 3));

        state.move_down();
        // column clamps to the target line length
        assert_eq!(state.cursor_position(), (2, 3));

        state.move_up();
        state.move_up();
        assert_eq!(state.cursor_position(), (0, 3));
        state.move_up();
        assert_eq!(state.cursor_position(), (0, 3));
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = state_with_content("héllo");
        state.move_right();
        state.move_right();
        state.insert_char('X');
        assert_eq!(state.content.latest, "héXllo");
        state.backspace();
        assert_eq!(state.content.latest, "héllo");
    }
}
