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
use crate::context::Context;
use crate::geometry::{vec2f, Rect};
use crate::MouseButton;

impl Context {
    /// A slider for a float value, formatted as `%.3f`.
    pub fn slider_float(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        self.slider_float_f(label, value, min, max, 3)
    }

    /// A slider for a float value with an explicit number of decimals.
    pub fn slider_float_f(&mut self, label: &str, value: &mut f32, min: f32, max: f32, decimals: usize) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let original = *value;

        if self.should_render(start, widget_size) {
            *value = value.clamp(min, max);
            let id = self.make_id(label);
            let slider_size = self.style().slider_size;

            // left third is the label, the rest is the track
            let frame_start = vec2f((start.x + widget_size.x / 3.0).floor(), start.y);
            let frame_size = vec2f(2.0 * (widget_size.x / 3.0), widget_size.y);
            let bounds = Rect::from_pos_size(frame_start, frame_size);

            let range = max - min;
            let conversion = range / (frame_size.x - slider_size);
            let grab_pos = vec2f(frame_start.x + (*value - min) / conversion, frame_start.y);
            let grab = Rect::from_pos_size(grab_pos, vec2f(slider_size, widget_size.y));

            let _ = self.button_behavior(grab, id);

            let fill = if self.active_id == id {
                self.colors().frame_bg_active
            } else if self.hovered_id == id {
                self.colors().frame_bg_hovered
            } else {
                self.colors().frame_bg
            };
            let fg = self.win().fg_layer;
            self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, fill);
            let grab_color = self.colors().button;
            self.draw_list.add_rect_filled(fg, grab.min, grab.max, grab_color);

            let text_color = self.colors().text;
            let text_y = self.centered_text_y(start.y, widget_size.y);
            self.add_widget_text(fg, vec2f(start.x, text_y), text_color, label);
            let formatted = format!("{:.*}", decimals, *value);
            let text_size = self.text_size(&formatted);
            let value_x = frame_start.x + frame_size.x / 2.0 - text_size.x / 2.0;
            self.add_widget_text(fg, vec2f(value_x, text_y), text_color, &formatted);

            if self.active_id == id && self.io.is_mouse_dragging(MouseButton::LEFT, 1.0) {
                *value += self.io.mouse_drag_delta(MouseButton::LEFT, 1.0).x * conversion;
                *value = value.clamp(min, max);
                // out-of-box drags pin the value to the extremes
                let mouse = self.io.mouse_pos();
                if mouse.x < bounds.min.x {
                    *value = min;
                }
                if mouse.x > bounds.max.x {
                    *value = max;
                }
                self.io.reset_mouse_drag_delta(MouseButton::LEFT);
            }
        }
        self.advance_cursor(widget_size.x, widget_size.y);
        original != *value
    }

    /// A stepped slider for an int value.
    pub fn slider_int(&mut self, label: &str, value: &mut i32, min: i32, max: i32) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let original = *value;

        if self.should_render(start, widget_size) {
            *value = (*value).clamp(min, max);
            let id = self.make_id(label);
            let blocks = (max - min + 1).max(1);
            let block = *value - min;

            let frame_start = vec2f((start.x + widget_size.x / 3.0).floor(), start.y);
            let frame_size = vec2f(2.0 * (widget_size.x / 3.0), widget_size.y);
            let bounds = Rect::from_pos_size(frame_start, frame_size);
            let block_length = frame_size.x / blocks as f32;

            let grab_pos = vec2f(frame_start.x + block as f32 * block_length, frame_start.y);
            let grab = Rect::from_pos_size(grab_pos, vec2f(block_length, widget_size.y));

            let _ = self.button_behavior(grab, id);

            let fill = if self.active_id == id {
                self.colors().frame_bg_active
            } else if self.hovered_id == id {
                self.colors().frame_bg_hovered
            } else {
                self.colors().frame_bg
            };
            let fg = self.win().fg_layer;
            self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, fill);
            let grab_color = self.colors().button;
            self.draw_list.add_rect_filled(fg, grab.min, grab.max, grab_color);

            let text_color = self.colors().text;
            let text_y = self.centered_text_y(start.y, widget_size.y);
            self.add_widget_text(fg, vec2f(start.x, text_y), text_color, label);
            let formatted = format!("{}", *value);
            let text_size = self.text_size(&formatted);
            let value_x = frame_start.x + frame_size.x / 2.0 - text_size.x / 2.0;
            self.add_widget_text(fg, vec2f(value_x, text_y), text_color, &formatted);

            if self.active_id == id && self.io.is_mouse_dragging(MouseButton::LEFT, 1.0) {
                let mouse = self.io.mouse_pos();
                if mouse.x > grab.max.x {
                    *value += 1;
                }
                if mouse.x < grab.min.x {
                    *value -= 1;
                }
                *value = (*value).clamp(min, max);
            }
        }
        self.advance_cursor(widget_size.x, widget_size.y);
        original != *value
    }

    /// Drags a float by relative mouse movement at `speed` units per pixel.
    pub fn drag_float(&mut self, label: &str, value: &mut f32, speed: f32, min: f32, max: f32) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let original = *value;

        if self.should_render(start, widget_size) {
            *value = value.clamp(min, max);
            let id = self.make_id(label);

            let frame_start = vec2f((start.x + widget_size.x / 3.0).floor(), start.y);
            let frame_size = vec2f(2.0 * (widget_size.x / 3.0), widget_size.y);
            let bounds = Rect::from_pos_size(frame_start, frame_size);

            let _ = self.button_behavior(bounds, id);

            let fill = if self.active_id == id {
                self.colors().frame_bg_active
            } else if self.hovered_id == id {
                self.colors().frame_bg_hovered
            } else {
                self.colors().frame_bg
            };
            let fg = self.win().fg_layer;
            self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, fill);

            let text_color = self.colors().text;
            let text_y = self.centered_text_y(start.y, widget_size.y);
            self.add_widget_text(fg, vec2f(start.x, text_y), text_color, label);
            let formatted = format!("{:.3}", *value);
            let text_size = self.text_size(&formatted);
            let value_x = frame_start.x + frame_size.x / 2.0 - text_size.x / 2.0;
            self.add_widget_text(fg, vec2f(value_x, text_y), text_color, &formatted);

            if self.active_id == id && self.io.is_mouse_dragging(MouseButton::LEFT, 1.0) {
                *value += self.io.mouse_drag_delta(MouseButton::LEFT, 1.0).x * speed;
                *value = value.clamp(min, max);
                self.io.reset_mouse_drag_delta(MouseButton::LEFT);
            }
        }
        self.advance_cursor(widget_size.x, widget_size.y);
        original != *value
    }
}

#[cfg(test)]
mod tests {
    use crate::context::test_support::{run_frame, test_context};
    use crate::geometry::vec2f;
    use crate::window::{ConditionFlags, WindowFlags};
    use crate::MouseButton;

    #[test]
    fn slider_clamps_and_reports_changes() {
        let mut ctx = test_context();
        let mut value = 5.0f32;
        let mut changed = false;
        let mut build = |ctx: &mut crate::Context, value: &mut f32, changed: &mut bool| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
            ctx.set_next_window_size(vec2f(400.0, 300.0), ConditionFlags::ONCE);
            if ctx.begin_window("sliders", None, WindowFlags::NONE) {
                ctx.layout_dynamic(0.0, 1);
                *changed = ctx.slider_float("speed", value, 0.0, 1.0);
                ctx.end_window();
            }
        };

        // out-of-range values clamp on first visit
        run_frame(&mut ctx, |ctx| build(ctx, &mut value, &mut changed));
        assert_eq!(value, 1.0);
        assert!(changed);

        run_frame(&mut ctx, |ctx| build(ctx, &mut value, &mut changed));
        assert!(!changed);
    }

    #[test]
    fn drag_outside_track_pins_to_extremes() {
        let mut ctx = test_context();
        let mut value = 0.5f32;
        let mut build = |ctx: &mut crate::Context, value: &mut f32| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
            ctx.set_next_window_size(vec2f(400.0, 300.0), ConditionFlags::ONCE);
            if ctx.begin_window("sliders", None, WindowFlags::NONE) {
                ctx.layout_dynamic(0.0, 1);
                let _ = ctx.slider_float("speed", value, 0.0, 1.0);
                ctx.end_window();
            }
        };

        run_frame(&mut ctx, |ctx| build(ctx, &mut value));

        // the grab sits mid-track; widget row y ~= 138..159
        // frame starts at x = floor(105 + 390/3) = 235, width 260
        let grab_x = 235.0 + 0.5 * (260.0 - 12.0) + 6.0;
        ctx.io.add_mouse_pos_event(vec2f(grab_x, 148.0));
        run_frame(&mut ctx, |ctx| build(ctx, &mut value));
        ctx.io.add_mouse_button_event(MouseButton::LEFT, true);
        run_frame(&mut ctx, |ctx| build(ctx, &mut value));

        // drag far past the right edge of the track
        ctx.io.add_mouse_pos_event(vec2f(900.0, 148.0));
        run_frame(&mut ctx, |ctx| build(ctx, &mut value));
        assert_eq!(value, 1.0);
    }
}
