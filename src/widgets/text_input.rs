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
use rs_math3d::Vec4f;

use crate::context::Context;
use crate::geometry::{vec2f, Rect};
use crate::io::{Key, MouseCursor};
use crate::text_edit::{filter_character, EditKey, InputTextFlags};
use crate::{Id, KeyMods, MouseButton};

impl Context {
    /// A single-line text field. Returns `true` when the buffer changed.
    pub fn input_text(&mut self, label: &str, buffer: &mut String) -> bool {
        self.input_text_ex(label, None, buffer, InputTextFlags::NONE)
    }

    /// A single-line text field showing `hint` while empty.
    pub fn input_text_hint(&mut self, label: &str, hint: &str, buffer: &mut String) -> bool {
        self.input_text_ex(label, Some(hint), buffer, InputTextFlags::NONE)
    }

    /// A float field; the value is re-parsed when Enter validates the edit.
    pub fn input_float(&mut self, label: &str, value: &mut f32) -> bool {
        let mut buffer = format!("{:.3}", *value);
        let flags = InputTextFlags::CHARS_SCIENTIFIC | InputTextFlags::ENTER_RETURNS_TRUE;
        if self.input_text_ex(label, None, &mut buffer, flags) {
            *value = buffer.trim().parse().unwrap_or(*value);
            return true;
        }
        false
    }

    /// An int field; the value is re-parsed when Enter validates the edit.
    pub fn input_int(&mut self, label: &str, value: &mut i32) -> bool {
        let mut buffer = format!("{}", *value);
        let flags = InputTextFlags::CHARS_DECIMAL | InputTextFlags::ENTER_RETURNS_TRUE;
        if self.input_text_ex(label, None, &mut buffer, flags) {
            *value = buffer.trim().parse().unwrap_or(*value);
            return true;
        }
        false
    }

    // pixel advance of a character in the UI font at the style size
    fn char_advance(&self, c: char) -> f32 {
        let atlas = self.atlas();
        let atlas = atlas.inner();
        let font = atlas.font(self.font_id());
        let scale = self.style().font_size / font.config.font_size;
        font.glyph_or_fallback(c as u32).map(|g| g.x_advance * scale).unwrap_or(0.0)
    }

    // pixel width of a wide-char slice
    fn measure_chars(&self, chars: &[char]) -> f32 {
        let atlas = self.atlas();
        let atlas = atlas.inner();
        let font = atlas.font(self.font_id());
        let scale = self.style().font_size / font.config.font_size;
        chars
            .iter()
            .map(|c| font.glyph_or_fallback(*c as u32).map(|g| g.x_advance * scale).unwrap_or(0.0))
            .sum()
    }

    // wide index under a point relative to the text origin
    fn text_index_from_pos(&self, chars: &[char], x: f32, y: f32, multiline: bool) -> usize {
        let line_height = self.style().font_size;
        let target_row = if multiline { ((y / line_height).floor() as i64).max(0) as usize } else { 0 };

        // find the target row's bounds
        let mut row = 0usize;
        let mut row_start = 0usize;
        let mut row_end = chars.len();
        for (i, c) in chars.iter().enumerate() {
            if *c == '\n' {
                if row == target_row {
                    row_end = i;
                    break;
                }
                row += 1;
                row_start = i + 1;
            }
        }
        if row < target_row {
            return chars.len();
        }

        let mut acc = 0.0;
        for i in row_start..row_end {
            let advance = self.char_advance(chars[i]);
            if x < acc + advance * 0.5 {
                return i;
            }
            acc += advance;
        }
        row_end
    }

    /// The full text field: optional hint, multiline, read-only, password,
    /// character filters, selection, clipboard and undo. Returns `true` when
    /// the buffer changed — or, with `ENTER_RETURNS_TRUE`, when Enter
    /// validated the edit.
    pub fn input_text_ex(&mut self, label: &str, hint: Option<&str>, buffer: &mut String, flags: InputTextFlags) -> bool {
        let multiline = flags.contains(InputTextFlags::MULTILINE);
        let read_only = flags.contains(InputTextFlags::READ_ONLY);
        let password = flags.contains(InputTextFlags::PASSWORD);

        let default_height = if multiline { self.get_frame_height() * 4.0 } else { self.get_frame_height() };
        let widget_size = self.calculate_item_size(default_height);
        let start = self.get_cursor_pos();

        if !self.should_render(start, widget_size) {
            self.advance_cursor(widget_size.x, widget_size.y);
            return false;
        }

        let id = self.make_id(label);
        let frame_padding = self.style().frame_padding;
        let font_size = self.style().font_size;

        let frame_start = vec2f((start.x + widget_size.x / 3.0).floor(), start.y);
        let frame_size = vec2f(2.0 * (widget_size.x / 3.0), widget_size.y);
        let bounds = Rect::from_pos_size(frame_start, frame_size);

        let hovered = self.is_item_hoverable(bounds, id);
        if hovered {
            self.io.set_mouse_cursor(MouseCursor::TextInput);
            self.next_hovered_id = id;
        }

        let was_active = self.active_id == id;
        let user_clicked = hovered && self.io.is_mouse_clicked(MouseButton::LEFT);

        // gain focus
        if user_clicked && !was_active {
            self.input_text_state.begin(id, buffer, flags);
            self.input_text_state.mac_behaviors = self.io.config_mac_behaviors;
            if flags.contains(InputTextFlags::AUTO_SELECT_ALL) && !multiline {
                self.input_text_state.select_all();
                self.input_text_state.selected_all_mouse_lock = true;
            }
            self.next_active_id = id;
            self.io.claim_mouse_owner(MouseButton::LEFT, id);
        }
        if was_active {
            self.next_active_id = id;
        }

        let mut clear_active = false;
        let mut validated = false;
        let mut value_changed = false;

        let state_owned = self.input_text_state.id == id;

        if was_active && state_owned {
            let mut state = std::mem::take(&mut self.input_text_state);
            state.flags = flags;
            state.row_count_per_page = ((frame_size.y / font_size) as usize).max(1);
            state.cursor_anim += self.io.delta_time;
            state.clamp();

            // release focus when clicking outside
            if self.io.is_mouse_clicked(MouseButton::LEFT) && !hovered && !user_clicked {
                clear_active = true;
            }

            let mods = self.io.key_mods();
            let shift = mods.contains(KeyMods::SHIFT);
            let ctrl = mods.contains(KeyMods::CTRL);
            let mac = state.mac_behaviors;
            let word_move = if mac { mods.contains(KeyMods::ALT) } else { ctrl };
            let startend = mac && mods.contains(KeyMods::SUPER);

            // mouse selection
            let mouse = self.io.mouse_pos();
            let mouse_x = mouse.x - bounds.min.x - frame_padding.x + state.scroll_x;
            let mouse_y = if multiline { mouse.y - bounds.min.y - frame_padding.y } else { font_size * 0.5 };

            if hovered && self.io.is_mouse_clicked(MouseButton::LEFT) && !state.selected_all_mouse_lock {
                let index = self.text_index_from_pos(&state.text_w, mouse_x, mouse_y, multiline);
                let count = self.io.mouse_clicked_count(MouseButton::LEFT);
                if count >= 2 && !shift {
                    if count % 2 == 0 {
                        state.select_word_at(index);
                    } else {
                        state.select_line_at(index);
                    }
                } else {
                    state.click_at(index, shift);
                }
            } else if self.io.is_mouse_down(MouseButton::LEFT)
                && !state.selected_all_mouse_lock
                && (self.io.mouse_delta().x != 0.0 || self.io.mouse_delta().y != 0.0)
            {
                let index = self.text_index_from_pos(&state.text_w, mouse_x, mouse_y, multiline);
                state.drag_to(index);
                state.cursor_follow = true;
            }
            if state.selected_all_mouse_lock && !self.io.is_mouse_down(MouseButton::LEFT) {
                state.selected_all_mouse_lock = false;
            }

            // typed characters (ctrl chords are not text; AltGr is Ctrl+Alt)
            if self.io.has_input_characters() {
                let ignore = ctrl && !mods.contains(KeyMods::ALT);
                let chars = self.io.take_input_characters();
                if !ignore && !read_only {
                    for c in chars {
                        state.insert_char(c);
                    }
                }
            }

            // shortcuts and navigation
            let is_cut = ctrl && self.io.is_key_pressed(Key::X) && !read_only && !password;
            let is_copy = ctrl && self.io.is_key_pressed(Key::C) && !password;
            let is_paste = ctrl && self.io.is_key_pressed(Key::V) && !read_only;
            let is_undo = ctrl && self.io.is_key_pressed(Key::Z) && !read_only;
            let is_redo = (ctrl && self.io.is_key_pressed(Key::Y) || (mac && shift && ctrl && self.io.is_key_pressed(Key::Z))) && !read_only;
            let is_select_all = ctrl && self.io.is_key_pressed(Key::A);
            let enter_pressed = self.io.is_key_pressed(Key::Enter) || self.io.is_key_pressed(Key::KeypadEnter);

            if self.io.is_key_pressed(Key::LeftArrow) {
                let key = if startend { EditKey::LineStart } else if word_move { EditKey::WordLeft } else { EditKey::Left };
                state.on_key(key, shift, false);
            } else if self.io.is_key_pressed(Key::RightArrow) {
                let key = if startend { EditKey::LineEnd } else if word_move { EditKey::WordRight } else { EditKey::Right };
                state.on_key(key, shift, false);
            } else if self.io.is_key_pressed(Key::UpArrow) && multiline {
                state.on_key(if startend { EditKey::TextStart } else { EditKey::Up }, shift, false);
            } else if self.io.is_key_pressed(Key::DownArrow) && multiline {
                state.on_key(if startend { EditKey::TextEnd } else { EditKey::Down }, shift, false);
            } else if self.io.is_key_pressed(Key::PageUp) && multiline {
                state.on_key(EditKey::PageUp, shift, false);
            } else if self.io.is_key_pressed(Key::PageDown) && multiline {
                state.on_key(EditKey::PageDown, shift, false);
            } else if self.io.is_key_pressed(Key::Home) {
                state.on_key(if ctrl { EditKey::TextStart } else { EditKey::LineStart }, shift, false);
            } else if self.io.is_key_pressed(Key::End) {
                state.on_key(if ctrl { EditKey::TextEnd } else { EditKey::LineEnd }, shift, false);
            } else if self.io.is_key_pressed(Key::Delete) && !read_only && !is_cut {
                state.on_key(EditKey::Delete, shift, word_move);
            } else if self.io.is_key_pressed(Key::Backspace) && !read_only {
                state.on_key(EditKey::Backspace, shift, word_move);
            } else if enter_pressed {
                let ctrl_enter_newline = flags.contains(InputTextFlags::CTRL_ENTER_FOR_NEW_LINE);
                if !multiline || (ctrl_enter_newline && !ctrl) || (!ctrl_enter_newline && ctrl) {
                    validated = true;
                    clear_active = true;
                } else if !read_only {
                    state.insert_char('\n');
                }
            } else if self.io.is_key_pressed(Key::Escape) {
                if flags.contains(InputTextFlags::ESCAPE_CLEARS_ALL) {
                    if state.len_w() > 0 {
                        state.replace_all("");
                    } else {
                        clear_active = true;
                    }
                } else {
                    // restore the focus-time snapshot; the revert is undoable
                    if state.text() != state.initial_text {
                        let snapshot = state.initial_text.clone();
                        state.replace_all(&snapshot);
                    }
                    clear_active = true;
                }
            } else if is_undo {
                state.undo();
            } else if is_redo {
                state.redo();
            } else if is_select_all {
                state.select_all();
                state.cursor_follow = true;
            } else if is_cut {
                let text = state.cut();
                self.io.set_clipboard_text(&text);
            } else if is_copy {
                let text = state.copy();
                self.io.set_clipboard_text(&text);
            } else if is_paste {
                if let Some(clip) = self.io.get_clipboard_text() {
                    let filtered: Vec<char> = clip.chars().filter_map(|c| filter_character(c, flags)).collect();
                    if !filtered.is_empty() {
                        state.insert_chars(&filtered);
                    }
                }
            }

            // write the edit back to the caller's buffer
            if !read_only && state.edited {
                *buffer = state.text();
                value_changed = true;
                state.edited = false;
            }

            self.want_capture_keyboard_next_frame = true;
            self.input_text_state = state;
        }

        if clear_active {
            self.next_active_id = Id::NONE;
        }

        // ------------------------------------------------------------------
        // rendering
        // ------------------------------------------------------------------

        let fill = if was_active {
            self.colors().frame_bg_active
        } else if self.hovered_id == id {
            self.colors().frame_bg_hovered
        } else {
            self.colors().frame_bg
        };
        let fg = self.win().fg_layer;
        self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, fill);

        let inner_origin = vec2f(
            bounds.min.x + frame_padding.x,
            if multiline { bounds.min.y + frame_padding.y } else { self.centered_text_y(bounds.min.y, frame_size.y) },
        );

        let render_from_state = was_active && state_owned && !clear_active;
        let display_text: String = if render_from_state {
            if password {
                "*".repeat(self.input_text_state.len_w())
            } else {
                self.input_text_state.text()
            }
        } else if password {
            "*".repeat(buffer.chars().count())
        } else {
            buffer.clone()
        };

        self.draw_list.push_clip_rect(bounds, true);

        let line_height = font_size;
        if render_from_state {
            let scroll_x = self.input_text_state.scroll_x;
            let display_chars: Vec<char> = display_text.chars().collect();

            // selection highlight, one rect per covered line
            if self.input_text_state.has_selection() {
                let (sel_start, sel_end) = (self.input_text_state.select_start, self.input_text_state.select_end);
                let highlight = Vec4f::new(0.26, 0.59, 0.98, 0.45);
                let mut line_start = 0usize;
                let mut row = 0usize;
                for i in 0..=display_chars.len() {
                    let end_of_line = i == display_chars.len() || display_chars[i] == '\n';
                    if end_of_line {
                        let seg_start = sel_start.clamp(line_start, i);
                        let seg_end = sel_end.clamp(line_start, i);
                        if seg_start < seg_end {
                            let x0 = self.measure_chars(&display_chars[line_start..seg_start]);
                            let x1 = x0 + self.measure_chars(&display_chars[seg_start..seg_end]);
                            let y = inner_origin.y + row as f32 * line_height;
                            self.draw_list.add_rect_filled(
                                fg,
                                vec2f(inner_origin.x + x0 - scroll_x, y),
                                vec2f(inner_origin.x + x1 - scroll_x, y + line_height),
                                highlight,
                            );
                        }
                        row += 1;
                        line_start = i + 1;
                    }
                }
            }

            let font = self.font_id();
            let text_color = self.colors().text;
            self.draw_list.add_text(
                fg,
                font,
                font_size,
                vec2f((inner_origin.x - scroll_x).round(), inner_origin.y.round()),
                text_color,
                &display_text,
                0.0,
            );

            // caret position in the wide buffer
            let cursor = self.input_text_state.cursor;
            let mut line_start = 0usize;
            let mut row = 0usize;
            for (i, c) in display_chars.iter().enumerate().take(cursor) {
                if *c == '\n' {
                    row += 1;
                    line_start = i + 1;
                }
            }
            let cursor_x = self.measure_chars(&display_chars[line_start..cursor]);

            // keep the caret inside the frame
            if self.input_text_state.cursor_follow {
                let visible = frame_size.x - frame_padding.x * 2.0;
                let state = &mut self.input_text_state;
                if cursor_x - state.scroll_x > visible {
                    state.scroll_x = cursor_x - visible;
                }
                if cursor_x < state.scroll_x {
                    state.scroll_x = cursor_x.max(0.0);
                }
                state.cursor_follow = false;
            }

            // caret, blinking on a ~1.2 s cycle
            let anim = self.input_text_state.cursor_anim;
            if anim <= 0.0 || (anim % 1.2) < 0.8 {
                let scroll_x = self.input_text_state.scroll_x;
                let x = inner_origin.x + cursor_x - scroll_x;
                let y = inner_origin.y + row as f32 * line_height;
                let text_color = self.colors().text;
                self.draw_list.add_rect_filled(fg, vec2f(x, y), vec2f(x + 1.0, y + line_height), text_color);
            }
        } else {
            let (shown, color) = match (display_text.is_empty(), hint) {
                (true, Some(hint)) => (hint.to_string(), Vec4f::new(0.6, 0.6, 0.6, 1.0)),
                _ => (display_text, self.colors().text),
            };
            let font = self.font_id();
            self.draw_list.add_text_clipped(
                fg,
                font,
                font_size,
                vec2f(inner_origin.x.round(), inner_origin.y.round()),
                bounds,
                color,
                &shown,
                0.0,
            );
        }

        self.draw_list.pop_clip_rect();

        // label on the left third
        let text_color = self.colors().text;
        let label_y = self.centered_text_y(start.y, widget_size.y);
        self.add_widget_text(fg, vec2f(start.x, label_y), text_color, label);

        self.advance_cursor(widget_size.x, widget_size.y);

        if flags.contains(InputTextFlags::ENTER_RETURNS_TRUE) { validated } else { value_changed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{run_frame, test_context};
    use crate::window::{ConditionFlags, WindowFlags};

    fn drive(ctx: &mut crate::Context, buffer: &mut String, flags: InputTextFlags) -> bool {
        let mut changed = false;
        ctx.new_frame();
        ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
        ctx.set_next_window_size(vec2f(400.0, 300.0), ConditionFlags::ONCE);
        if ctx.begin_window("inputs", None, WindowFlags::NONE) {
            ctx.layout_dynamic(0.0, 1);
            changed = ctx.input_text_ex("field", None, buffer, flags);
            ctx.end_window();
        }
        ctx.render();
        changed
    }

    fn focus_field(ctx: &mut crate::Context, buffer: &mut String, flags: InputTextFlags) {
        // field frame starts at x = floor(105 + 390/3) = 235; row y ~138..159
        drive(ctx, buffer, flags);
        ctx.io.add_mouse_pos_event(vec2f(260.0, 148.0));
        drive(ctx, buffer, flags);
        ctx.io.add_mouse_button_event(MouseButton::LEFT, true);
        drive(ctx, buffer, flags);
        ctx.io.add_mouse_button_event(MouseButton::LEFT, false);
        drive(ctx, buffer, flags);
    }

    #[test]
    fn typed_characters_land_in_the_buffer() {
        let mut ctx = test_context();
        let mut buffer = String::new();
        focus_field(&mut ctx, &mut buffer, InputTextFlags::NONE);

        ctx.io.add_input_character('h');
        ctx.io.add_input_character('i');
        let changed = drive(&mut ctx, &mut buffer, InputTextFlags::NONE);
        assert!(changed);
        assert_eq!(buffer, "hi");
    }

    #[test]
    fn multibyte_input_keeps_both_lengths_in_sync() {
        let mut ctx = test_context();
        let mut buffer = String::new();
        focus_field(&mut ctx, &mut buffer, InputTextFlags::NONE);

        ctx.io.add_input_character('€');
        drive(&mut ctx, &mut buffer, InputTextFlags::NONE);
        assert_eq!(buffer, "€");
        assert_eq!(buffer.len(), 3);
        assert_eq!(ctx.input_text_state.len_w(), 1);
        assert_eq!(ctx.input_text_state.cursor, 1);
    }

    #[test]
    fn escape_reverts_to_the_focus_snapshot() {
        let mut ctx = test_context();
        let mut buffer = String::from("original");
        focus_field(&mut ctx, &mut buffer, InputTextFlags::NONE);

        ctx.io.add_input_character('!');
        drive(&mut ctx, &mut buffer, InputTextFlags::NONE);
        assert_eq!(buffer, "original!");

        ctx.io.add_key_event(Key::Escape, true);
        drive(&mut ctx, &mut buffer, InputTextFlags::NONE);
        assert_eq!(buffer, "original");
    }

    #[test]
    fn enter_returns_true_validates_without_reverting() {
        let mut ctx = test_context();
        let mut buffer = String::from("1.0");
        let flags = InputTextFlags::ENTER_RETURNS_TRUE;
        focus_field(&mut ctx, &mut buffer, flags);

        ctx.io.add_input_character('5');
        drive(&mut ctx, &mut buffer, flags);
        assert_eq!(buffer, "1.05");

        ctx.io.add_key_event(Key::Enter, true);
        let validated = drive(&mut ctx, &mut buffer, flags);
        assert!(validated);
        assert_eq!(buffer, "1.05");
    }

    #[test]
    fn cut_copy_paste_round_trip_through_the_clipboard() {
        let mut ctx = test_context();
        let mut buffer = String::from("clip");
        focus_field(&mut ctx, &mut buffer, InputTextFlags::NONE);

        // select all then cut
        ctx.io.add_key_event(Key::LeftCtrl, true);
        ctx.io.add_key_event(Key::A, true);
        drive(&mut ctx, &mut buffer, InputTextFlags::NONE);
        ctx.io.add_key_event(Key::A, false);
        ctx.io.add_key_event(Key::X, true);
        drive(&mut ctx, &mut buffer, InputTextFlags::NONE);
        assert_eq!(buffer, "");
        assert_eq!(ctx.io.get_clipboard_text().as_deref(), Some("clip"));

        // paste it back
        ctx.io.add_key_event(Key::X, false);
        ctx.io.add_key_event(Key::V, true);
        drive(&mut ctx, &mut buffer, InputTextFlags::NONE);
        assert_eq!(buffer, "clip");
    }
}
