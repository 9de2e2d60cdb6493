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
use std::collections::VecDeque;

use rs_math3d::Vec2f;

use crate::geometry::Rect;
use crate::{Id, KeyMods, MouseButton};

/// Maximum time between two clicks for them to count as a double click.
pub const DOUBLE_CLICK_TIME: f64 = 0.3;

/// Maximum distance in pixels between two clicks for them to count as a
/// double click.
pub const DOUBLE_CLICK_DIST: f32 = 4.0;

/// Cursor shapes the UI may request from the platform layer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MouseCursor {
    /// Default arrow.
    #[default]
    Arrow,
    /// Text caret.
    TextInput,
    /// Four-way move.
    ResizeAll,
    /// Horizontal resize.
    ResizeEw,
    /// Vertical resize.
    ResizeNs,
    /// Diagonal resize, bottom-left / top-right.
    ResizeNesw,
    /// Diagonal resize, top-left / bottom-right.
    ResizeNwse,
    /// Pointing hand.
    Hand,
    /// Action not allowed.
    NotAllowed,
    /// Hide the cursor.
    None,
}

/// Logical keys mapped from platform scancodes.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Space, Enter, KeypadEnter, Escape, Tab, Backspace, Insert, Delete,
    Home, End, PageUp, PageDown,
    LeftArrow, RightArrow, UpArrow, DownArrow,
    LeftCtrl, RightCtrl, LeftShift, RightShift, LeftAlt, RightAlt, LeftSuper, RightSuper,
}

impl Key {
    /// Number of keys in the enum, for bitmap sizing.
    pub const COUNT: usize = Key::RightSuper as usize + 1;
}

/// Platform events queued between frames.
#[derive(Copy, Clone, Debug)]
enum InputEvent {
    MousePos(Vec2f),
    MouseButton(usize, bool),
    MouseWheel(Vec2f),
    Key(Key, bool),
    Character(char),
}

const BUTTON_COUNT: usize = 3;

#[derive(Copy, Clone)]
struct ButtonState {
    down: bool,
    clicked: bool,
    released: bool,
    clicked_count: u32,
    last_click_time: f64,
    last_click_pos: Vec2f,
    owner: Option<Id>,
    drag_start: Vec2f,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self {
            down: false,
            clicked: false,
            released: false,
            clicked_count: 0,
            last_click_time: -1.0e9,
            last_click_pos: Vec2f::new(-f32::MAX, -f32::MAX),
            owner: None,
            drag_start: Vec2f::new(0.0, 0.0),
        }
    }
}

fn button_index(button: MouseButton) -> usize {
    if button.contains(MouseButton::LEFT) {
        0
    } else if button.contains(MouseButton::RIGHT) {
        1
    } else {
        2
    }
}

/// Per-frame input state derived from the platform event queue.
///
/// The platform thread may enqueue events only before
/// [`Io::new_frame`]; everything else happens on the frame thread.
pub struct Io {
    /// Seconds since the previous frame, set by the platform each frame.
    pub delta_time: f32,
    /// Size of the main viewport in pixels, set by the platform.
    pub main_viewport_size: Vec2f,
    /// Use mac-style word navigation and shortcuts.
    pub config_mac_behaviors: bool,
    /// The UI wants the mouse; the platform should not forward clicks to the scene.
    pub want_capture_mouse: bool,
    /// The UI wants the keyboard; the platform should not forward keys to the scene.
    pub want_capture_keyboard: bool,

    time: f64,
    frame_count: u64,
    events: VecDeque<InputEvent>,
    mouse_pos: Vec2f,
    prev_mouse_pos: Vec2f,
    mouse_delta: Vec2f,
    buttons: [ButtonState; BUTTON_COUNT],
    wheel: Vec2f,
    keys_down: [bool; Key::COUNT],
    keys_pressed: [bool; Key::COUNT],
    input_characters: VecDeque<char>,
    next_cursor: MouseCursor,
    clipboard_set: Option<Box<dyn FnMut(&str)>>,
    clipboard_get: Option<Box<dyn FnMut() -> Option<String>>>,
    clipboard_fallback: String,
}

impl Default for Io {
    fn default() -> Self { Self::new() }
}

impl Io {
    /// Creates an input state with nothing pressed and the mouse outside the
    /// window.
    pub fn new() -> Self {
        Self {
            delta_time: 1.0 / 60.0,
            main_viewport_size: Vec2f::new(0.0, 0.0),
            config_mac_behaviors: false,
            want_capture_mouse: false,
            want_capture_keyboard: false,
            time: 0.0,
            frame_count: 0,
            events: VecDeque::new(),
            mouse_pos: Vec2f::new(-f32::MAX, -f32::MAX),
            prev_mouse_pos: Vec2f::new(-f32::MAX, -f32::MAX),
            mouse_delta: Vec2f::new(0.0, 0.0),
            buttons: [ButtonState::default(); BUTTON_COUNT],
            wheel: Vec2f::new(0.0, 0.0),
            keys_down: [false; Key::COUNT],
            keys_pressed: [false; Key::COUNT],
            input_characters: VecDeque::new(),
            next_cursor: MouseCursor::Arrow,
            clipboard_set: None,
            clipboard_get: None,
            clipboard_fallback: String::new(),
        }
    }

    // ------------------------------------------------------------------
    // event queue (platform side)
    // ------------------------------------------------------------------

    /// Queues a mouse move. `(-f32::MAX, -f32::MAX)` means "outside window".
    pub fn add_mouse_pos_event(&mut self, pos: Vec2f) { self.events.push_back(InputEvent::MousePos(pos)); }

    /// Queues a mouse button transition.
    pub fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        self.events.push_back(InputEvent::MouseButton(button_index(button), down));
    }

    /// Queues scroll wheel movement.
    pub fn add_mouse_wheel_event(&mut self, delta: Vec2f) { self.events.push_back(InputEvent::MouseWheel(delta)); }

    /// Queues a key transition.
    pub fn add_key_event(&mut self, key: Key, down: bool) { self.events.push_back(InputEvent::Key(key, down)); }

    /// Queues a text-input character.
    pub fn add_input_character(&mut self, ch: char) { self.events.push_back(InputEvent::Character(ch)); }

    // ------------------------------------------------------------------
    // frame bookkeeping
    // ------------------------------------------------------------------

    /// Derives the frame's input state from the queued events.
    pub fn new_frame(&mut self) {
        self.time += self.delta_time as f64;
        self.frame_count += 1;

        for b in self.buttons.iter_mut() {
            b.clicked = false;
            b.released = false;
        }
        self.keys_pressed = [false; Key::COUNT];

        while let Some(event) = self.events.pop_front() {
            match event {
                InputEvent::MousePos(pos) => self.mouse_pos = pos,
                InputEvent::MouseButton(index, down) => {
                    let pos = self.mouse_pos;
                    let time = self.time;
                    let b = &mut self.buttons[index];
                    if down && !b.down {
                        b.clicked = true;
                        b.drag_start = pos;
                        b.owner = None;
                        let dx = pos.x - b.last_click_pos.x;
                        let dy = pos.y - b.last_click_pos.y;
                        let near = dx * dx + dy * dy <= DOUBLE_CLICK_DIST * DOUBLE_CLICK_DIST;
                        if time - b.last_click_time <= DOUBLE_CLICK_TIME && near {
                            b.clicked_count += 1;
                        } else {
                            b.clicked_count = 1;
                        }
                        b.last_click_time = time;
                        b.last_click_pos = pos;
                    }
                    if !down && b.down {
                        b.released = true;
                    }
                    b.down = down;
                }
                InputEvent::MouseWheel(delta) => {
                    self.wheel.x += delta.x;
                    self.wheel.y += delta.y;
                }
                InputEvent::Key(key, down) => {
                    if down && !self.keys_down[key as usize] {
                        self.keys_pressed[key as usize] = true;
                    }
                    self.keys_down[key as usize] = down;
                }
                InputEvent::Character(ch) => self.input_characters.push_back(ch),
            }
        }

        self.mouse_delta = if self.is_mouse_pos_valid() && self.prev_mouse_pos.x != -f32::MAX {
            Vec2f::new(self.mouse_pos.x - self.prev_mouse_pos.x, self.mouse_pos.y - self.prev_mouse_pos.y)
        } else {
            Vec2f::new(0.0, 0.0)
        };
    }

    /// Retires per-frame state; queued-but-unread characters are dropped.
    pub fn end_frame(&mut self) {
        self.prev_mouse_pos = self.mouse_pos;
        self.input_characters.clear();
    }

    /// Seconds of UI time accumulated so far.
    pub fn time(&self) -> f64 { self.time }

    /// Number of frames started so far.
    pub fn frame_count(&self) -> u64 { self.frame_count }

    // ------------------------------------------------------------------
    // mouse queries
    // ------------------------------------------------------------------

    /// Current mouse position.
    pub fn mouse_pos(&self) -> Vec2f { self.mouse_pos }

    /// Mouse movement since the previous frame.
    pub fn mouse_delta(&self) -> Vec2f { self.mouse_delta }

    /// Returns `true` when the mouse is inside the window.
    pub fn is_mouse_pos_valid(&self) -> bool { self.mouse_pos.x != -f32::MAX && self.mouse_pos.y != -f32::MAX }

    /// Returns `true` while the button is held.
    pub fn is_mouse_down(&self, button: MouseButton) -> bool { self.buttons[button_index(button)].down }

    /// Returns `true` on the frame the button went down.
    pub fn is_mouse_clicked(&self, button: MouseButton) -> bool { self.buttons[button_index(button)].clicked }

    /// Returns `true` on the frame the button was released.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool { self.buttons[button_index(button)].released }

    /// Click count of the most recent click (1 = single, 2 = double, ...).
    pub fn mouse_clicked_count(&self, button: MouseButton) -> u32 { self.buttons[button_index(button)].clicked_count }

    /// Returns `true` if the mouse is inside the rectangle.
    pub fn is_mouse_hovering_rect(&self, rect: Rect) -> bool { self.is_mouse_pos_valid() && rect.contains(self.mouse_pos) }

    /// Claims button ownership for a widget. The first claim of a frame wins;
    /// later claims are ignored and return `false`.
    pub fn claim_mouse_owner(&mut self, button: MouseButton, id: Id) -> bool {
        let b = &mut self.buttons[button_index(button)];
        match b.owner {
            None => {
                b.owner = Some(id);
                true
            }
            Some(owner) => owner == id,
        }
    }

    /// Widget owning the button this frame, if any.
    pub fn mouse_owner(&self, button: MouseButton) -> Option<Id> { self.buttons[button_index(button)].owner }

    /// Returns `true` while the button is held and the cursor has traveled at
    /// least `threshold` pixels from the press position.
    pub fn is_mouse_dragging(&self, button: MouseButton, threshold: f32) -> bool {
        let b = &self.buttons[button_index(button)];
        if !b.down || !self.is_mouse_pos_valid() {
            return false;
        }
        let dx = self.mouse_pos.x - b.drag_start.x;
        let dy = self.mouse_pos.y - b.drag_start.y;
        dx * dx + dy * dy >= threshold * threshold
    }

    /// Movement from the press position, or zero while under the threshold.
    pub fn mouse_drag_delta(&self, button: MouseButton, threshold: f32) -> Vec2f {
        if self.is_mouse_dragging(button, threshold) {
            let b = &self.buttons[button_index(button)];
            Vec2f::new(self.mouse_pos.x - b.drag_start.x, self.mouse_pos.y - b.drag_start.y)
        } else {
            Vec2f::new(0.0, 0.0)
        }
    }

    /// Re-anchors the drag origin at the current mouse position.
    pub fn reset_mouse_drag_delta(&mut self, button: MouseButton) {
        let pos = self.mouse_pos;
        self.buttons[button_index(button)].drag_start = pos;
    }

    /// Accumulated wheel movement; kept until taken.
    pub fn mouse_wheel(&self) -> Vec2f { self.wheel }

    /// Takes and clears the accumulated wheel movement.
    pub fn take_mouse_wheel(&mut self) -> Vec2f {
        let wheel = self.wheel;
        self.wheel = Vec2f::new(0.0, 0.0);
        wheel
    }

    // ------------------------------------------------------------------
    // keyboard & text input
    // ------------------------------------------------------------------

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key: Key) -> bool { self.keys_down[key as usize] }

    /// Returns `true` on the frame the key went down.
    pub fn is_key_pressed(&self, key: Key) -> bool { self.keys_pressed[key as usize] }

    /// Current modifier state, derived from the key bitmap.
    pub fn key_mods(&self) -> KeyMods {
        let mut mods = KeyMods::NONE;
        if self.keys_down[Key::LeftCtrl as usize] || self.keys_down[Key::RightCtrl as usize] {
            mods |= KeyMods::CTRL;
        }
        if self.keys_down[Key::LeftShift as usize] || self.keys_down[Key::RightShift as usize] {
            mods |= KeyMods::SHIFT;
        }
        if self.keys_down[Key::LeftAlt as usize] || self.keys_down[Key::RightAlt as usize] {
            mods |= KeyMods::ALT;
        }
        if self.keys_down[Key::LeftSuper as usize] || self.keys_down[Key::RightSuper as usize] {
            mods |= KeyMods::SUPER;
        }
        mods
    }

    /// Drains the text-input character ring.
    pub fn take_input_characters(&mut self) -> Vec<char> { self.input_characters.drain(..).collect() }

    /// Returns `true` when text input is queued.
    pub fn has_input_characters(&self) -> bool { !self.input_characters.is_empty() }

    // ------------------------------------------------------------------
    // cursor & clipboard
    // ------------------------------------------------------------------

    /// Cursor shape the UI wants the platform to show this frame.
    pub fn mouse_cursor(&self) -> MouseCursor { self.next_cursor }

    /// Requests a cursor shape from the platform.
    pub fn set_mouse_cursor(&mut self, cursor: MouseCursor) { self.next_cursor = cursor; }

    /// Installs platform clipboard callbacks. Without them an internal buffer
    /// keeps cut/copy/paste working inside the process.
    pub fn set_clipboard_handlers(
        &mut self,
        set: Box<dyn FnMut(&str)>,
        get: Box<dyn FnMut() -> Option<String>>,
    ) {
        self.clipboard_set = Some(set);
        self.clipboard_get = Some(get);
    }

    /// Writes text to the clipboard.
    pub fn set_clipboard_text(&mut self, text: &str) {
        match &mut self.clipboard_set {
            Some(set) => set(text),
            None => {
                self.clipboard_fallback.clear();
                self.clipboard_fallback.push_str(text);
            }
        }
    }

    /// Reads text from the clipboard.
    pub fn get_clipboard_text(&mut self) -> Option<String> {
        match &mut self.clipboard_get {
            Some(get) => get(),
            None => Some(self.clipboard_fallback.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vec2f;

    fn stepped(io: &mut Io) {
        io.new_frame();
        io.end_frame();
    }

    #[test]
    fn click_is_a_transition() {
        let mut io = Io::new();
        io.add_mouse_pos_event(vec2f(10.0, 10.0));
        io.add_mouse_button_event(MouseButton::LEFT, true);
        io.new_frame();
        assert!(io.is_mouse_clicked(MouseButton::LEFT));
        assert!(io.is_mouse_down(MouseButton::LEFT));
        io.end_frame();

        io.new_frame();
        assert!(!io.is_mouse_clicked(MouseButton::LEFT));
        assert!(io.is_mouse_down(MouseButton::LEFT));
        io.end_frame();

        io.add_mouse_button_event(MouseButton::LEFT, false);
        io.new_frame();
        assert!(io.is_mouse_released(MouseButton::LEFT));
        assert!(!io.is_mouse_down(MouseButton::LEFT));
    }

    #[test]
    fn double_click_needs_time_and_distance() {
        let mut io = Io::new();
        io.delta_time = 0.1;
        io.add_mouse_pos_event(vec2f(10.0, 10.0));
        io.add_mouse_button_event(MouseButton::LEFT, true);
        io.new_frame();
        assert_eq!(io.mouse_clicked_count(MouseButton::LEFT), 1);
        io.end_frame();

        io.add_mouse_button_event(MouseButton::LEFT, false);
        stepped(&mut io);

        io.add_mouse_button_event(MouseButton::LEFT, true);
        io.new_frame();
        assert_eq!(io.mouse_clicked_count(MouseButton::LEFT), 2);
        io.end_frame();

        // a third click too far away restarts the count
        io.add_mouse_button_event(MouseButton::LEFT, false);
        stepped(&mut io);
        io.add_mouse_pos_event(vec2f(100.0, 10.0));
        io.add_mouse_button_event(MouseButton::LEFT, true);
        io.new_frame();
        assert_eq!(io.mouse_clicked_count(MouseButton::LEFT), 1);
    }

    #[test]
    fn drag_respects_threshold() {
        let mut io = Io::new();
        io.add_mouse_pos_event(vec2f(10.0, 10.0));
        io.add_mouse_button_event(MouseButton::LEFT, true);
        io.new_frame();
        io.end_frame();

        io.add_mouse_pos_event(vec2f(10.9, 10.0));
        io.new_frame();
        assert!(!io.is_mouse_dragging(MouseButton::LEFT, 1.0));
        let delta = io.mouse_drag_delta(MouseButton::LEFT, 1.0);
        assert_eq!((delta.x, delta.y), (0.0, 0.0));
        io.end_frame();

        io.add_mouse_pos_event(vec2f(11.5, 10.0));
        io.new_frame();
        assert!(io.is_mouse_dragging(MouseButton::LEFT, 1.0));
        assert!((io.mouse_drag_delta(MouseButton::LEFT, 1.0).x - 1.5).abs() < 1.0e-5);
    }

    #[test]
    fn first_owner_claim_wins() {
        let mut io = Io::new();
        io.add_mouse_button_event(MouseButton::LEFT, true);
        io.new_frame();
        let a = Id::from_str("a", Id::NONE);
        let b = Id::from_str("b", Id::NONE);
        assert!(io.claim_mouse_owner(MouseButton::LEFT, a));
        assert!(!io.claim_mouse_owner(MouseButton::LEFT, b));
        assert!(io.claim_mouse_owner(MouseButton::LEFT, a));
        assert_eq!(io.mouse_owner(MouseButton::LEFT), Some(a));
    }

    #[test]
    fn wheel_accumulates_until_taken() {
        let mut io = Io::new();
        io.add_mouse_wheel_event(vec2f(0.0, 1.0));
        io.add_mouse_wheel_event(vec2f(0.0, 2.0));
        io.new_frame();
        io.end_frame();
        io.new_frame();
        assert_eq!(io.mouse_wheel().y, 3.0);
        assert_eq!(io.take_mouse_wheel().y, 3.0);
        assert_eq!(io.mouse_wheel().y, 0.0);
    }

    #[test]
    fn clipboard_falls_back_to_internal_buffer() {
        let mut io = Io::new();
        io.set_clipboard_text("hello");
        assert_eq!(io.get_clipboard_text().as_deref(), Some("hello"));
    }
}
