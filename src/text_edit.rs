//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use bitflags::bitflags;

use crate::Id;

bitflags! {
    #[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
    /// Behavior flags for text-input widgets.
    pub struct InputTextFlags : u32 {
        /// Allow `0123456789.+-*/` only.
        const CHARS_DECIMAL = 1;
        /// Allow `0123456789ABCDEFabcdef` plus `xX`.
        const CHARS_HEXADECIMAL = 1 << 1;
        /// Allow `0123456789.+-*/eE`.
        const CHARS_SCIENTIFIC = 1 << 2;
        /// Upper-case a..z on input.
        const CHARS_UPPERCASE = 1 << 3;
        /// Reject spaces and tabs.
        const CHARS_NO_BLANK = 1 << 4;
        /// Select the whole buffer when the widget gains focus.
        const AUTO_SELECT_ALL = 1 << 5;
        /// Return `true` from the widget when Enter validates the edit.
        const ENTER_RETURNS_TRUE = 1 << 6;
        /// Display only; all edits are rejected.
        const READ_ONLY = 1 << 7;
        /// Render every glyph as `*`.
        const PASSWORD = 1 << 8;
        /// Multi-line editor; Enter inserts a newline.
        const MULTILINE = 1 << 9;
        /// In multi-line mode, Enter inserts a newline and Ctrl+Enter
        /// validates (instead of the opposite).
        const CTRL_ENTER_FOR_NEW_LINE = 1 << 10;
        /// Escape empties the buffer instead of reverting to the focus-time
        /// snapshot.
        const ESCAPE_CLEARS_ALL = 1 << 11;
        /// Start in overwrite mode.
        const ALWAYS_OVERWRITE = 1 << 12;
        /// Insert tab characters instead of leaving the widget.
        const ALLOW_TAB_INPUT = 1 << 13;
        /// Disable the undo/redo ring.
        const NO_UNDO_REDO = 1 << 14;
        /// No special behavior.
        const NONE = 0;
    }
}

// undo ring budgets
const UNDO_STATE_COUNT: usize = 99;
const UNDO_CHAR_COUNT: usize = 999;

/// Edit operations the widget layer translates key presses into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EditKey {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    TextStart,
    TextEnd,
    WordLeft,
    WordRight,
    PageUp,
    PageDown,
    Backspace,
    Delete,
}

struct UndoRecord {
    at: usize,
    inserted: usize,
    deleted: Vec<char>,
}

#[derive(Default)]
struct UndoStack {
    undo: Vec<UndoRecord>,
    redo: Vec<UndoRecord>,
}

impl UndoStack {
    fn push(&mut self, record: UndoRecord) {
        self.redo.clear();
        self.undo.push(record);
        // drop oldest entries past the state/char budgets
        while self.undo.len() > UNDO_STATE_COUNT {
            self.undo.remove(0);
        }
        while self.undo.iter().map(|r| r.deleted.len()).sum::<usize>() > UNDO_CHAR_COUNT && self.undo.len() > 1 {
            self.undo.remove(0);
        }
    }

    fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn is_blank(c: char) -> bool { c == ' ' || c == '\t' || c == '\u{3000}' }

fn is_separator(c: char) -> bool {
    matches!(c, ',' | ';' | '(' | ')' | '{' | '}' | '[' | ']' | '|' | '\n' | '\r' | '.' | '!')
}

/// Filters a character against the flag set, converting full-width forms to
/// half width first. `None` means the character is rejected.
pub(crate) fn filter_character(ch: char, flags: InputTextFlags) -> Option<char> {
    let mut c = ch;

    if (c as u32) < 0x20 {
        let newline_ok = c == '\n' && flags.contains(InputTextFlags::MULTILINE);
        let tab_ok = c == '\t' && flags.contains(InputTextFlags::ALLOW_TAB_INPUT);
        if !newline_ok && !tab_ok {
            return None;
        }
        return Some(c);
    }

    // ascii DEL (backspace on some platforms) and the private-use range some
    // backends emit for special keys
    if c as u32 == 127 || (0xE000..=0xF8FF).contains(&(c as u32)) {
        return None;
    }

    // full-width numerals and punctuation fold to ASCII before filtering
    let cp = c as u32;
    if (0xFF01..=0xFF5E).contains(&cp) {
        c = char::from_u32(cp - 0xFEE0).unwrap_or(c);
    }

    if flags.contains(InputTextFlags::CHARS_DECIMAL) && !matches!(c, '0'..='9' | '.' | '+' | '-' | '*' | '/') {
        return None;
    }
    if flags.contains(InputTextFlags::CHARS_HEXADECIMAL) && !matches!(c, '0'..='9' | 'a'..='f' | 'A'..='F' | 'x' | 'X') {
        return None;
    }
    if flags.contains(InputTextFlags::CHARS_SCIENTIFIC) && !matches!(c, '0'..='9' | '.' | '+' | '-' | '*' | '/' | 'e' | 'E') {
        return None;
    }
    if flags.contains(InputTextFlags::CHARS_UPPERCASE) {
        c = c.to_ascii_uppercase();
    }
    if flags.contains(InputTextFlags::CHARS_NO_BLANK) && is_blank(c) {
        return None;
    }
    Some(c)
}

/// Editing state for the one focused text widget. The buffer is kept both as
/// wide characters (all cursor/selection arithmetic) and as a UTF-8 shadow,
/// plus a snapshot of the text at focus time for Escape reverts.
pub(crate) struct InputTextState {
    pub id: Id,
    pub text_w: Vec<char>,
    // byte length of the wide buffer encoded as UTF-8
    pub len_a: usize,
    pub initial_text: String,
    pub cursor: usize,
    // kept sorted; `select_anchor` remembers the drag origin
    pub select_start: usize,
    pub select_end: usize,
    select_anchor: usize,
    preferred_col: Option<usize>,
    pub insert_mode: bool,
    pub cursor_follow: bool,
    pub cursor_anim: f32,
    pub scroll_x: f32,
    pub selected_all_mouse_lock: bool,
    pub edited: bool,
    pub flags: InputTextFlags,
    pub mac_behaviors: bool,
    pub row_count_per_page: usize,
    undo_stack: UndoStack,
}

impl Default for InputTextState {
    fn default() -> Self {
        Self {
            id: Id::NONE,
            text_w: Vec::new(),
            len_a: 0,
            initial_text: String::new(),
            cursor: 0,
            select_start: 0,
            select_end: 0,
            select_anchor: 0,
            preferred_col: None,
            insert_mode: false,
            cursor_follow: false,
            cursor_anim: 0.0,
            scroll_x: 0.0,
            selected_all_mouse_lock: false,
            edited: false,
            flags: InputTextFlags::NONE,
            mac_behaviors: false,
            row_count_per_page: 1,
            undo_stack: UndoStack::default(),
        }
    }
}

impl InputTextState {
    /// Starts editing `text` under widget `id`, snapshotting for revert.
    pub fn begin(&mut self, id: Id, text: &str, flags: InputTextFlags) {
        self.id = id;
        self.text_w = text.chars().collect();
        self.len_a = text.len();
        self.initial_text.clear();
        self.initial_text.push_str(text);
        self.cursor = self.text_w.len();
        self.select_start = 0;
        self.select_end = 0;
        self.select_anchor = 0;
        self.preferred_col = None;
        self.insert_mode = flags.contains(InputTextFlags::ALWAYS_OVERWRITE);
        self.cursor_follow = true;
        self.cursor_anim = 0.0;
        self.scroll_x = 0.0;
        self.selected_all_mouse_lock = false;
        self.edited = false;
        self.flags = flags;
        self.undo_stack.clear();
    }

    /// The buffer as UTF-8.
    pub fn text(&self) -> String { self.text_w.iter().collect() }

    /// Wide length of the buffer.
    pub fn len_w(&self) -> usize { self.text_w.len() }

    /// Returns `true` when a non-empty selection exists.
    pub fn has_selection(&self) -> bool { self.select_start != self.select_end }

    /// Clears the selection, leaving the cursor where it is.
    pub fn clear_selection(&mut self) {
        self.select_start = self.cursor;
        self.select_end = self.cursor;
        self.select_anchor = self.cursor;
    }

    /// Selects the whole buffer, cursor at the end.
    pub fn select_all(&mut self) {
        self.select_start = 0;
        self.select_end = self.text_w.len();
        self.select_anchor = 0;
        self.cursor = self.text_w.len();
        self.preferred_col = None;
    }

    /// The selected text as UTF-8, empty when nothing is selected.
    pub fn selected_text(&self) -> String { self.text_w[self.select_start..self.select_end].iter().collect() }

    /// Clamps cursor and selection into the buffer.
    pub fn clamp(&mut self) {
        let len = self.text_w.len();
        self.cursor = self.cursor.min(len);
        self.select_start = self.select_start.min(len);
        self.select_end = self.select_end.min(len);
        self.select_anchor = self.select_anchor.min(len);
    }

    // ------------------------------------------------------------------
    // mutations (all undo-recorded)
    // ------------------------------------------------------------------

    fn record(&mut self, record: UndoRecord) {
        if !self.flags.contains(InputTextFlags::NO_UNDO_REDO) {
            self.undo_stack.push(record);
        }
    }

    fn splice(&mut self, at: usize, delete: usize, insert: &[char]) {
        let deleted: Vec<char> = self.text_w[at..at + delete].to_vec();
        self.len_a -= deleted.iter().map(|c| c.len_utf8()).sum::<usize>();
        self.len_a += insert.iter().map(|c| c.len_utf8()).sum::<usize>();
        self.text_w.splice(at..at + delete, insert.iter().copied());
        self.record(UndoRecord { at, inserted: insert.len(), deleted });
        self.edited = true;
    }

    /// Deletes the selection, if any.
    pub fn delete_selection(&mut self) {
        if !self.has_selection() {
            return;
        }
        let (start, end) = (self.select_start, self.select_end);
        self.splice(start, end - start, &[]);
        self.cursor = start;
        self.clear_selection();
        self.preferred_col = None;
    }

    /// Inserts a single filtered character at the cursor, replacing the
    /// selection or, in overwrite mode, the character under the cursor.
    pub fn insert_char(&mut self, ch: char) {
        if self.flags.contains(InputTextFlags::READ_ONLY) {
            return;
        }
        let ch = match filter_character(ch, self.flags) {
            Some(ch) => ch,
            None => return,
        };
        if self.has_selection() {
            self.delete_selection();
        }
        let overwrite = self.insert_mode && self.cursor < self.text_w.len() && ch != '\n';
        let delete = overwrite as usize;
        self.splice(self.cursor, delete, &[ch]);
        self.cursor += 1;
        self.clear_selection();
        self.cursor_follow = true;
        self.preferred_col = None;
    }

    /// Inserts already-filtered text at the cursor (paste path).
    pub fn insert_chars(&mut self, chars: &[char]) {
        if self.flags.contains(InputTextFlags::READ_ONLY) || chars.is_empty() {
            return;
        }
        if self.has_selection() {
            self.delete_selection();
        }
        self.splice(self.cursor, 0, chars);
        self.cursor += chars.len();
        self.clear_selection();
        self.cursor_follow = true;
        self.preferred_col = None;
    }

    /// Replaces the whole buffer, recording a single undo step.
    pub fn replace_all(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        let len = self.text_w.len();
        self.splice(0, len, &chars);
        self.cursor = chars.len();
        self.clear_selection();
        self.preferred_col = None;
    }

    /// Cuts the selection (or the whole buffer when nothing is selected) and
    /// returns the removed text for the clipboard.
    pub fn cut(&mut self) -> String {
        if !self.has_selection() {
            self.select_all();
        }
        let text = self.selected_text();
        if !self.flags.contains(InputTextFlags::READ_ONLY) {
            self.delete_selection();
        }
        self.cursor_follow = true;
        text
    }

    /// Text the clipboard receives on copy: the selection, or the whole
    /// buffer when nothing is selected.
    pub fn copy(&self) -> String {
        if self.has_selection() { self.selected_text() } else { self.text() }
    }

    /// Applies one undo step.
    pub fn undo(&mut self) {
        let Some(record) = self.undo_stack.undo.pop() else {
            return;
        };
        let reinserted = record.deleted.clone();
        let inverse = UndoRecord {
            at: record.at,
            inserted: record.deleted.len(),
            deleted: self.text_w[record.at..record.at + record.inserted].to_vec(),
        };
        self.len_a -= inverse.deleted.iter().map(|c| c.len_utf8()).sum::<usize>();
        self.len_a += reinserted.iter().map(|c| c.len_utf8()).sum::<usize>();
        self.text_w.splice(record.at..record.at + record.inserted, reinserted.iter().copied());
        self.cursor = record.at + reinserted.len();
        self.undo_stack.redo.push(inverse);
        self.clear_selection();
        self.edited = true;
        self.cursor_follow = true;
    }

    /// Applies one redo step.
    pub fn redo(&mut self) {
        let Some(record) = self.undo_stack.redo.pop() else {
            return;
        };
        let reinserted = record.deleted.clone();
        let inverse = UndoRecord {
            at: record.at,
            inserted: record.deleted.len(),
            deleted: self.text_w[record.at..record.at + record.inserted].to_vec(),
        };
        self.len_a -= inverse.deleted.iter().map(|c| c.len_utf8()).sum::<usize>();
        self.len_a += reinserted.iter().map(|c| c.len_utf8()).sum::<usize>();
        self.text_w.splice(record.at..record.at + record.inserted, reinserted.iter().copied());
        self.cursor = record.at + reinserted.len();
        self.undo_stack.undo.push(inverse);
        self.clear_selection();
        self.edited = true;
        self.cursor_follow = true;
    }

    /// Places the cursor from a mouse click, extending the selection when
    /// `shift` is held.
    pub fn click_at(&mut self, pos: usize, shift: bool) {
        let pos = pos.min(self.text_w.len());
        if shift {
            self.drag_to(pos);
        } else {
            self.cursor = pos;
            self.clear_selection();
        }
        self.preferred_col = None;
        self.cursor_anim = 0.0;
    }

    /// Extends the selection toward `pos` (mouse drag).
    pub fn drag_to(&mut self, pos: usize) {
        let pos = pos.min(self.text_w.len());
        if !self.has_selection() {
            self.select_anchor = self.cursor;
        }
        self.cursor = pos;
        self.select_start = self.select_anchor.min(pos);
        self.select_end = self.select_anchor.max(pos);
        self.preferred_col = None;
    }

    /// Selects the word under `pos` (double click). Always uses the mac-style
    /// word end, matching common double-click behavior on every platform.
    pub fn select_word_at(&mut self, pos: usize) {
        let pos = pos.min(self.text_w.len());
        let start = self.move_word_left(pos);
        let end = self.move_word_right_mac(start);
        self.select_start = start;
        self.select_end = end.min(self.text_w.len());
        self.select_anchor = self.select_start;
        self.cursor = self.select_end;
        self.preferred_col = None;
    }

    /// Selects the whole line under `pos` (triple click).
    pub fn select_line_at(&mut self, pos: usize) {
        let pos = pos.min(self.text_w.len());
        self.select_start = self.line_start(pos);
        self.select_end = self.line_end(pos);
        self.select_anchor = self.select_start;
        self.cursor = self.select_end;
        self.preferred_col = None;
    }

    // ------------------------------------------------------------------
    // navigation
    // ------------------------------------------------------------------

    fn line_start(&self, from: usize) -> usize {
        let mut i = from;
        while i > 0 && self.text_w[i - 1] != '\n' {
            i -= 1;
        }
        i
    }

    fn line_end(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.text_w.len() && self.text_w[i] != '\n' {
            i += 1;
        }
        i
    }

    // boundary exists where the blank/separator class changes; the
    // right-going scan additionally stops on transitions into separators
    fn is_word_boundary_from_right(&self, i: usize) -> bool {
        if i == 0 {
            return true;
        }
        let prev = self.text_w[i - 1];
        let curr = self.text_w[i];
        let (prev_white, prev_sep) = (is_blank(prev), is_separator(prev));
        let (curr_white, curr_sep) = (is_blank(curr), is_separator(curr));
        ((prev_white || prev_sep) && !(curr_sep || curr_white)) || (curr_sep && !prev_sep)
    }

    // the left-going scan samples the pair in the other direction
    fn is_word_boundary_from_left(&self, i: usize) -> bool {
        if i == 0 {
            return true;
        }
        let prev = self.text_w[i];
        let curr = self.text_w[i - 1];
        let (prev_white, prev_sep) = (is_blank(prev), is_separator(prev));
        let (curr_white, curr_sep) = (is_blank(curr), is_separator(curr));
        (prev_white && !(curr_sep || curr_white)) || (curr_sep && !prev_sep)
    }

    /// Index of the previous word start.
    pub fn move_word_left(&self, mut i: usize) -> usize {
        while i > 0 {
            i -= 1;
            if self.is_word_boundary_from_right(i) {
                break;
            }
        }
        i
    }

    /// Index of the next word boundary. Windows-style lands on the next word
    /// start; mac-style lands on the current word's end.
    pub fn move_word_right(&self, i: usize) -> usize {
        if self.mac_behaviors { self.move_word_right_mac(i) } else { self.move_word_right_win(i) }
    }

    fn move_word_right_win(&self, mut i: usize) -> usize {
        let len = self.text_w.len();
        while i < len {
            i += 1;
            if i >= len || self.is_word_boundary_from_right(i) {
                break;
            }
        }
        i.min(len)
    }

    fn move_word_right_mac(&self, mut i: usize) -> usize {
        let len = self.text_w.len();
        while i < len {
            i += 1;
            if i >= len || self.is_word_boundary_from_left(i) {
                break;
            }
        }
        i.min(len)
    }

    fn move_vertical(&mut self, rows_down: isize) {
        let col = match self.preferred_col {
            Some(col) => col,
            None => self.cursor - self.line_start(self.cursor),
        };
        self.preferred_col = Some(col);

        let mut cursor = self.cursor;
        if rows_down < 0 {
            for _ in 0..(-rows_down) {
                let start = self.line_start(cursor);
                if start == 0 {
                    cursor = start;
                    break;
                }
                cursor = start - 1; // end of the previous line
            }
        } else {
            for _ in 0..rows_down {
                let end = self.line_end(cursor);
                if end >= self.text_w.len() {
                    cursor = end;
                    break;
                }
                cursor = end + 1; // start of the next line
            }
        }
        let start = self.line_start(cursor);
        let end = self.line_end(start);
        self.cursor = (start + col).min(end);
    }

    /// Applies a navigation or delete key, extending the selection when
    /// `shift` is held.
    pub fn on_key(&mut self, key: EditKey, shift: bool, word: bool) {
        let had_selection = self.has_selection();
        if shift && !had_selection {
            self.select_anchor = self.cursor;
        }

        match key {
            EditKey::Left => {
                if had_selection && !shift {
                    self.cursor = self.select_start;
                } else if word {
                    self.cursor = self.move_word_left(self.cursor);
                } else if self.cursor > 0 {
                    self.cursor -= 1;
                }
                self.preferred_col = None;
            }
            EditKey::Right => {
                if had_selection && !shift {
                    self.cursor = self.select_end;
                } else if word {
                    self.cursor = self.move_word_right(self.cursor);
                } else if self.cursor < self.text_w.len() {
                    self.cursor += 1;
                }
                self.preferred_col = None;
            }
            EditKey::WordLeft => {
                self.cursor = self.move_word_left(self.cursor);
                self.preferred_col = None;
            }
            EditKey::WordRight => {
                self.cursor = self.move_word_right(self.cursor);
                self.preferred_col = None;
            }
            EditKey::Up => self.move_vertical(-1),
            EditKey::Down => self.move_vertical(1),
            EditKey::PageUp => self.move_vertical(-(self.row_count_per_page as isize)),
            EditKey::PageDown => self.move_vertical(self.row_count_per_page as isize),
            EditKey::LineStart => {
                self.cursor = self.line_start(self.cursor);
                self.preferred_col = None;
            }
            EditKey::LineEnd => {
                self.cursor = self.line_end(self.cursor);
                self.preferred_col = None;
            }
            EditKey::TextStart => {
                self.cursor = 0;
                self.preferred_col = None;
            }
            EditKey::TextEnd => {
                self.cursor = self.text_w.len();
                self.preferred_col = None;
            }
            EditKey::Backspace => {
                if self.flags.contains(InputTextFlags::READ_ONLY) {
                    return;
                }
                if word && !had_selection {
                    let start = self.move_word_left(self.cursor);
                    if start < self.cursor {
                        self.splice(start, self.cursor - start, &[]);
                        self.cursor = start;
                    }
                } else if had_selection {
                    self.delete_selection();
                } else if self.cursor > 0 {
                    self.splice(self.cursor - 1, 1, &[]);
                    self.cursor -= 1;
                }
                self.clear_selection();
                self.cursor_follow = true;
                self.preferred_col = None;
                return;
            }
            EditKey::Delete => {
                if self.flags.contains(InputTextFlags::READ_ONLY) {
                    return;
                }
                if word && !had_selection {
                    let end = self.move_word_right(self.cursor);
                    if end > self.cursor {
                        self.splice(self.cursor, end - self.cursor, &[]);
                    }
                } else if had_selection {
                    self.delete_selection();
                } else if self.cursor < self.text_w.len() {
                    self.splice(self.cursor, 1, &[]);
                }
                self.clear_selection();
                self.cursor_follow = true;
                self.preferred_col = None;
                return;
            }
        }

        if shift {
            let (a, b) = (self.select_anchor, self.cursor);
            self.select_start = a.min(b);
            self.select_end = a.max(b);
        } else {
            self.clear_selection();
        }
        self.cursor_follow = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(text: &str) -> InputTextState {
        let mut state = InputTextState::default();
        state.begin(Id::from_str("edit", Id::NONE), text, InputTextFlags::NONE);
        state
    }

    fn check_lengths(state: &InputTextState) {
        let utf8: usize = state.text_w.iter().map(|c| c.len_utf8()).sum();
        assert_eq!(state.len_a, utf8);
        assert!(state.cursor <= state.text_w.len());
        assert!(state.select_start <= state.select_end);
    }

    #[test]
    fn multibyte_insert_advances_one_wide_unit() {
        let mut state = state_with("");
        state.insert_char('€');
        assert_eq!(state.len_a, 3);
        assert_eq!(state.len_w(), 1);
        assert_eq!(state.cursor, 1);
        check_lengths(&state);
    }

    #[test]
    fn backspace_removes_whole_character() {
        let mut state = state_with("a€b");
        state.on_key(EditKey::Backspace, false, false);
        assert_eq!(state.text(), "a€");
        state.on_key(EditKey::Backspace, false, false);
        assert_eq!(state.text(), "a");
        check_lengths(&state);
    }

    #[test]
    fn shift_extends_selection() {
        let mut state = state_with("hello");
        state.cursor = 0;
        state.on_key(EditKey::Right, true, false);
        state.on_key(EditKey::Right, true, false);
        assert_eq!((state.select_start, state.select_end), (0, 2));
        // moving without shift collapses onto the edge
        state.on_key(EditKey::Left, false, false);
        assert!(!state.has_selection());
        assert_eq!(state.cursor, 0);
        check_lengths(&state);
    }

    #[test]
    fn word_navigation_stops_at_boundaries() {
        let mut state = state_with("one two, three");
        state.cursor = 0;
        state.on_key(EditKey::WordRight, false, false);
        assert_eq!(state.cursor, 4); // start of "two"
        state.on_key(EditKey::WordRight, false, false);
        assert_eq!(state.cursor, 7); // the right-going scan stops on the comma
        state.on_key(EditKey::WordRight, false, false);
        assert_eq!(state.cursor, 9); // start of "three"
        state.on_key(EditKey::WordLeft, false, false);
        assert_eq!(state.cursor, 7);
        state.on_key(EditKey::WordLeft, false, false);
        assert_eq!(state.cursor, 4);
        state.on_key(EditKey::WordLeft, false, false);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn mac_word_right_lands_on_word_end() {
        let mut state = state_with("one two");
        state.mac_behaviors = true;
        state.cursor = 0;
        state.on_key(EditKey::WordRight, false, false);
        assert_eq!(state.cursor, 3); // end of "one"
    }

    #[test]
    fn vertical_navigation_keeps_the_column() {
        let mut state = state_with("alpha\nhi\ngamma rays");
        state.cursor = 4; // column 4 of line 0
        state.on_key(EditKey::Down, false, false);
        assert_eq!(state.cursor, 8); // clamped to "hi" end (col 2)
        state.on_key(EditKey::Down, false, false);
        assert_eq!(state.cursor, 9 + 4); // back to column 4 on "gamma rays"
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut state = state_with("abc");
        for ch in "def".chars() {
            state.insert_char(ch);
        }
        assert_eq!(state.text(), "abcdef");
        state.undo();
        state.undo();
        assert_eq!(state.text(), "abcd");
        state.redo();
        assert_eq!(state.text(), "abcde");
        // a fresh edit clears the redo branch
        state.insert_char('!');
        state.redo();
        assert_eq!(state.text(), "abcde!");
        check_lengths(&state);
    }

    #[test]
    fn undo_ring_is_bounded() {
        let mut state = state_with("");
        for _ in 0..(UNDO_STATE_COUNT + 40) {
            state.insert_char('x');
        }
        for _ in 0..(UNDO_STATE_COUNT + 40) {
            state.undo();
        }
        // only the budgeted number of steps could be undone
        assert_eq!(state.len_w(), 40);
    }

    #[test]
    fn cut_without_selection_takes_everything() {
        let mut state = state_with("clipboard");
        let taken = state.cut();
        assert_eq!(taken, "clipboard");
        assert_eq!(state.len_w(), 0);
        check_lengths(&state);
    }

    #[test]
    fn decimal_filter_and_fullwidth_folding() {
        let flags = InputTextFlags::CHARS_DECIMAL;
        assert_eq!(filter_character('7', flags), Some('7'));
        assert_eq!(filter_character('a', flags), None);
        // U+FF17 FULLWIDTH DIGIT SEVEN folds before filtering
        assert_eq!(filter_character('\u{FF17}', flags), Some('7'));
        assert_eq!(filter_character('\u{FF21}', flags), None); // fullwidth 'A'
    }

    #[test]
    fn uppercase_and_no_blank_filters() {
        assert_eq!(filter_character('q', InputTextFlags::CHARS_UPPERCASE), Some('Q'));
        assert_eq!(filter_character(' ', InputTextFlags::CHARS_NO_BLANK), None);
        assert_eq!(filter_character('\u{1}', InputTextFlags::NONE), None);
    }

    #[test]
    fn escape_revert_restores_snapshot() {
        let mut state = state_with("keep me");
        state.insert_char('!');
        assert_eq!(state.text(), "keep me!");
        let snapshot = state.initial_text.clone();
        state.replace_all(&snapshot);
        assert_eq!(state.text(), "keep me");
        // the revert itself is undoable
        state.undo();
        assert_eq!(state.text(), "keep me!");
    }

    #[test]
    fn overwrite_mode_replaces_in_place() {
        let mut state = InputTextState::default();
        state.begin(Id::from_str("edit", Id::NONE), "abc", InputTextFlags::ALWAYS_OVERWRITE);
        state.cursor = 0;
        state.insert_char('X');
        assert_eq!(state.text(), "Xbc");
        assert_eq!(state.cursor, 1);
    }
}
