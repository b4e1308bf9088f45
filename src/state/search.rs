//! Search input line editing.
//!
//! The text persists after the input loses focus: it is the live search
//! filter, not a one-shot query.

/// Editable search text with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    text: String,
    /// Cursor position in chars, `0..=text.chars().count()`
    cursor: usize,
    active: bool,
}

impl SearchInput {
    /// Empty, unfocused input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position, in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the input currently has keyboard focus.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Focus the input, cursor at the end.
    pub fn activate(&mut self) {
        self.active = true;
        self.cursor = self.text.chars().count();
    }

    /// Drop focus, keeping the text.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Insert `c` at the cursor.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the char before the cursor. Returns whether the text changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    /// Delete the char under the cursor. Returns whether the text changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.chars().count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    /// Move the cursor one char left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one char right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    /// Empty the text and leave focus unchanged.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> SearchInput {
        let mut input = SearchInput::new();
        input.activate();
        text.chars().for_each(|c| input.insert(c));
        input
    }

    #[test]
    fn insert_appends_at_cursor() {
        let input = typed("abc");
        assert_eq!(input.text(), "abc");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn insert_in_middle_handles_multibyte() {
        let mut input = typed("héllo");
        input.move_left();
        input.move_left();
        input.insert('X');
        assert_eq!(input.text(), "hélXlo");
    }

    #[test]
    fn backspace_and_delete_report_changes() {
        let mut input = typed("ab");
        assert!(input.backspace());
        assert_eq!(input.text(), "a");
        assert!(!input.delete(), "cursor at end: nothing to delete");

        input.move_left();
        assert!(!input.backspace(), "cursor at start: nothing to erase");
        assert!(input.delete());
        assert_eq!(input.text(), "");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = typed("é");
        input.move_right();
        assert_eq!(input.cursor(), 1);
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn text_survives_deactivation() {
        let mut input = typed("fruit");
        input.deactivate();
        assert!(!input.is_active());
        assert_eq!(input.text(), "fruit");

        input.activate();
        assert_eq!(input.cursor(), 5);
    }
}
