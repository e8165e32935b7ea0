//! Auto-growing text input state.

use crate::ui::theme::Symbols;

/// Height of the field when empty, in lines.
pub const INITIAL_HEIGHT: u16 = 1;

/// State for a text input, managing content, cursor position and height.
#[derive(Debug, Clone)]
pub struct TextInputState {
    /// The text content.
    content: String,
    /// Cursor position (byte offset, always on a char boundary).
    cursor: usize,
    /// Rendered height in lines.
    height: u16,
}

impl Default for TextInputState {
    fn default() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            height: INITIAL_HEIGHT,
        }
    }
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position as a byte offset into [`Self::content`].
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current height in lines.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Clear the content and shrink back to the initial height.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.height = INITIAL_HEIGHT;
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        self.content.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        self.content.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if let Some(ch) = self.content[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Wrap the content to `width` columns, with `cursor` spliced in at the
    /// cursor position when given.
    ///
    /// Returns the display lines and the index of the line holding the
    /// cursor (0 when no cursor is spliced in).
    pub fn wrapped_lines(&self, cursor: Option<&str>, width: u16) -> (Vec<String>, usize) {
        let width = usize::from(width.max(1));
        let (before, after) = self.content.split_at(self.cursor);
        let mut text = String::with_capacity(self.content.len() + Symbols::CURSOR.len());
        text.push_str(before);
        text.push_str(cursor.unwrap_or(""));
        text.push_str(after);

        let mut lines = Vec::new();
        let mut cursor_line = 0;
        for logical in text.split('\n') {
            let wrapped = textwrap::wrap(logical, width);
            if wrapped.is_empty() {
                lines.push(String::new());
                continue;
            }
            for wrapped in wrapped {
                if cursor.is_some_and(|c| wrapped.contains(c)) {
                    cursor_line = lines.len();
                }
                lines.push(wrapped.into_owned());
            }
        }
        (lines, cursor_line)
    }

    /// Number of lines the field needs at `width` columns, cursor included.
    pub fn scroll_height(&self, width: u16) -> u16 {
        let (lines, _) = self.wrapped_lines(Some(Symbols::CURSOR), width);
        u16::try_from(lines.len().max(1)).unwrap_or(u16::MAX)
    }

    /// Reset to the initial height, then grow to fit the content.
    pub fn fit_to_content(&mut self, width: u16) {
        self.height = INITIAL_HEIGHT;
        self.height = self.height.max(self.scroll_height(width));
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .chars()
            .next_back()
            .map(|ch| self.cursor - ch.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_state_basic() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");
        assert_eq!(state.cursor(), 2);

        state.backspace();
        assert_eq!(state.content(), "H");

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_text_input_state_cursor_movement() {
        let mut state = TextInputState::new();
        state.insert_str("Hello");

        state.move_left();
        state.move_left();
        assert_eq!(state.cursor(), 3);

        state.insert('X');
        assert_eq!(state.content(), "HelXlo");

        state.move_home();
        assert_eq!(state.cursor(), 0);
        state.delete();
        assert_eq!(state.content(), "elXlo");

        state.move_end();
        assert_eq!(state.cursor(), 5);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = TextInputState::new();
        state.insert_str("héllo");
        state.move_left();
        state.move_left();
        state.move_left();
        state.move_left();
        state.backspace();
        assert_eq!(state.content(), "éllo");
        state.move_right();
        state.insert('!');
        assert_eq!(state.content(), "é!llo");
    }

    #[test]
    fn test_auto_grow_multiline() {
        let mut state = TextInputState::new();
        state.insert_str("first\nsecond\nthird");
        state.fit_to_content(40);

        assert_eq!(state.scroll_height(40), 3);
        assert_eq!(state.height(), 3);
        assert_ne!(state.height(), INITIAL_HEIGHT);
    }

    #[test]
    fn test_auto_grow_wraps_long_lines() {
        let mut state = TextInputState::new();
        state.insert_str("one two three four five six");
        state.fit_to_content(10);
        assert!(state.height() > INITIAL_HEIGHT);
        assert_eq!(state.height(), state.scroll_height(10));
    }

    #[test]
    fn test_shrinks_after_delete() {
        let mut state = TextInputState::new();
        state.insert_str("a\nb");
        state.fit_to_content(20);
        assert_eq!(state.height(), 2);

        state.backspace();
        state.backspace();
        state.fit_to_content(20);
        assert_eq!(state.height(), INITIAL_HEIGHT);
    }

    #[test]
    fn test_height_counts_trailing_cursor() {
        // Nine characters fit nine columns, but not with the cursor after them.
        let mut state = TextInputState::new();
        state.insert_str("xxxx abcd");
        state.fit_to_content(9);
        assert_eq!(state.height(), 2);

        let (lines, cursor_line) = state.wrapped_lines(Some(Symbols::CURSOR), 9);
        assert_eq!(lines, vec!["xxxx", "abcd█"]);
        assert_eq!(cursor_line, 1);
    }

    #[test]
    fn test_wrapped_lines_track_cursor_line() {
        let mut state = TextInputState::new();
        state.insert_str("one\ntwo\nthree");
        state.move_home();
        state.move_right();

        let (lines, cursor_line) = state.wrapped_lines(Some(Symbols::CURSOR), 20);
        assert_eq!(lines, vec!["o█ne", "two", "three"]);
        assert_eq!(cursor_line, 0);

        let (lines, _) = state.wrapped_lines(None, 20);
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_clear_resets_height() {
        let mut state = TextInputState::new();
        state.insert_str("a\nb\nc");
        state.fit_to_content(20);
        state.clear();
        assert_eq!(state.height(), INITIAL_HEIGHT);
    }
}
