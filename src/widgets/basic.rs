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
use rs_math3d::{Vec2f, Vec4f};

use crate::context::Context;
use crate::draw::TextureId;
use crate::geometry::{vec2f, Rect};
use crate::Id;

impl Context {
    fn interaction_fill(&self, id: Id, idle: Vec4f, hovered: Vec4f, active: Vec4f) -> Vec4f {
        if self.active_id == id {
            active
        } else if self.hovered_id == id {
            hovered
        } else {
            idle
        }
    }

    /// A labeled push button. Returns `true` on the frame it is released.
    pub fn button(&mut self, label: &str) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let mut pressed = false;
        if self.should_render(start, widget_size) {
            let id = self.make_id(label);
            let bounds = Rect::from_pos_size(start, widget_size);
            let (p, _hovered, _held) = self.button_behavior(bounds, id);
            pressed = p;

            let fill = self.interaction_fill(id, self.colors().button, self.colors().button_hovered, self.colors().button_active);
            let fg = self.win().fg_layer;
            self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, fill);

            let text_size = self.text_size(label);
            let mut text_pos = vec2f(start.x, self.centered_text_y(start.y, widget_size.y));
            if bounds.width() < text_size.x {
                // clipping: start at the widget's left edge
                text_pos.x += self.style().frame_padding.x;
            } else {
                text_pos.x = start.x + widget_size.x / 2.0 - text_size.x / 2.0;
            }
            let font = self.font_id();
            let font_size = self.style().font_size;
            let text_color = self.colors().text;
            let shown = crate::find_rendered_text_end(label);
            self.draw_list.add_text_clipped(
                fg,
                font,
                font_size,
                vec2f(text_pos.x.round(), text_pos.y.round()),
                bounds,
                text_color,
                shown,
                0.0,
            );
        }
        self.advance_cursor(widget_size.x, widget_size.y);
        pressed
    }

    /// A hit region with no visuals. Returns `true` on release.
    pub fn invisible_button(&mut self, label: &str, size: Vec2f) -> bool {
        let start = self.get_cursor_pos();
        let mut pressed = false;
        if self.should_render(start, size) {
            let id = self.make_id(label);
            let bounds = Rect::from_pos_size(start, size);
            let (p, _, _) = self.button_behavior(bounds, id);
            pressed = p;
        }
        self.advance_cursor(size.x, size.y);
        pressed
    }

    /// A full-width selectable row; toggles `value` when pressed.
    pub fn selectable(&mut self, label: &str, value: &mut bool) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let mut pressed = false;
        if self.should_render(start, widget_size) {
            let id = self.make_id(label);
            let bounds = Rect::from_pos_size(start, widget_size);
            let (p, _, _) = self.button_behavior(bounds, id);
            pressed = p;
            if pressed {
                *value = !*value;
            }

            let fg = self.win().fg_layer;
            if self.active_id == id {
                let color = self.colors().header_active;
                self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, color);
            } else if self.hovered_id == id {
                let color = self.colors().header_hovered;
                self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, color);
            }
            if *value {
                let color = self.colors().header;
                self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, color);
            }

            let text_color = self.colors().text;
            let text_pos = vec2f(start.x + self.style().frame_padding.x, self.centered_text_y(start.y, widget_size.y));
            self.add_widget_text(fg, text_pos, text_color, label);
        }
        self.advance_cursor(widget_size.x, widget_size.y);
        pressed
    }

    /// A checkbox bound to `value`. Returns `true` when toggled this frame.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let mut pressed = false;
        if self.should_render(start, widget_size) {
            let id = self.make_id(label);
            // only the square box is the hit region
            let bounds = Rect::from_pos_size(start, vec2f(widget_size.y, widget_size.y));
            let (p, _, _) = self.button_behavior(bounds, id);
            pressed = p;
            if pressed {
                *value = !*value;
            }

            let fill = self.interaction_fill(id, self.colors().frame_bg, self.colors().frame_bg_hovered, self.colors().frame_bg_active);
            let fg = self.win().fg_layer;
            self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, fill);
            if *value {
                let color = self.colors().checkmark;
                self.draw_list.add_line(fg, bounds.min, bounds.max, color, 2.0);
            }

            let text_color = self.colors().text;
            let text_pos = vec2f(
                start.x + widget_size.y + self.style().inner_spacing.x,
                self.centered_text_y(start.y, widget_size.y),
            );
            self.add_widget_text(fg, text_pos, text_color, label);
        }
        self.advance_cursor(widget_size.x, widget_size.y);
        pressed
    }

    /// A radio button that stores `button_value` into `value` when pressed.
    pub fn radio_button(&mut self, label: &str, value: &mut i32, button_value: i32) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let mut pressed = false;
        if self.should_render(start, widget_size) {
            let id = self.make_id(label);
            let text_size = self.text_size(label);
            let inner_spacing = self.style().inner_spacing.x;
            let frame_padding = self.style().frame_padding.x;

            let bounds = Rect::from_pos_size(
                vec2f(start.x + frame_padding, start.y),
                vec2f(text_size.x + frame_padding + inner_spacing + widget_size.y, widget_size.y),
            );
            let (p, _, _) = self.button_behavior(bounds, id);
            pressed = p;
            if pressed {
                *value = button_value;
            }

            let center = vec2f(start.x + widget_size.y / 2.0, start.y + widget_size.y / 2.0);
            let outer = self.style().font_size / 1.5;
            let inner = self.style().font_size / 2.5;
            let fill = self.interaction_fill(id, self.colors().frame_bg, self.colors().frame_bg_hovered, self.colors().frame_bg_active);
            let fg = self.win().fg_layer;
            self.draw_list.add_circle_filled(fg, center, outer, fill, 12);
            if *value == button_value {
                let color = self.colors().checkmark;
                self.draw_list.add_circle_filled(fg, center, inner, color, 12);
            }

            let text_color = self.colors().text;
            let text_pos = vec2f(
                start.x + widget_size.y + inner_spacing + frame_padding,
                self.centered_text_y(start.y, widget_size.y),
            );
            self.add_widget_text(fg, text_pos, text_color, label);
        }
        self.advance_cursor(widget_size.x, widget_size.y);
        pressed
    }

    /// A progress bar filled to `fraction` (0..1). Passing a zero/negative
    /// size component falls back to the layout cell. Without an overlay the
    /// percentage is printed.
    pub fn progress_bar(&mut self, fraction: f32, size: Vec2f, overlay: Option<&str>) {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let mut size = size;
        if size.y == 0.0 {
            size.y = widget_size.y;
        }
        if size.x < 0.0 {
            size.x = widget_size.x;
        }

        if self.should_render(start, size) {
            let fg = self.win().fg_layer;
            let bg = self.colors().frame_bg;
            let bar = self.colors().progress_bar;
            self.draw_list.add_rect_filled(fg, start, vec2f(start.x + size.x, start.y + size.y), bg);
            self.draw_list
                .add_rect_filled(fg, start, vec2f(start.x + size.x * fraction.clamp(0.0, 1.0), start.y + size.y), bar);

            let label = match overlay {
                Some(text) => text.to_string(),
                None => format!("{:.1}%", 100.0 * fraction),
            };
            let text_size = self.text_size(&label);
            let pad = self.style().inner_spacing.x + self.style().frame_padding.x;
            let mut text_x = start.x + pad + size.x * fraction.clamp(0.0, 1.0);
            if text_x + text_size.x > start.x + size.x {
                text_x = start.x + size.x - text_size.x - self.style().inner_spacing.x;
            }
            let text_color = self.colors().text;
            let text_y = self.centered_text_y(start.y, size.y);
            self.add_widget_text(fg, vec2f(text_x, text_y), text_color, &label);

            let bounds = Rect::from_pos_size(start, widget_size);
            self.prev_item_hovered = self.io.is_mouse_hovering_rect(bounds) && self.hovered_window == self.current_window;
        }
        self.advance_cursor(widget_size.x, widget_size.y);
    }

    /// Shows a texture at the cursor.
    pub fn image(&mut self, texture: TextureId, size: Vec2f) {
        self.image_ex(
            texture,
            size,
            vec2f(0.0, 0.0),
            vec2f(1.0, 1.0),
            Vec4f::new(1.0, 1.0, 1.0, 1.0),
            Vec4f::new(0.0, 0.0, 0.0, 0.0),
        );
    }

    /// Shows a texture with explicit uvs, tint and an optional border (drawn
    /// when the border alpha is non-zero).
    pub fn image_ex(&mut self, texture: TextureId, size: Vec2f, uv0: Vec2f, uv1: Vec2f, tint: Vec4f, border: Vec4f) {
        let start = self.get_cursor_pos();
        let end = vec2f(start.x + size.x, start.y + size.y);
        if self.should_render(start, size) {
            let fg = self.win().fg_layer;
            self.draw_list.add_image_ex(fg, texture, start, end, uv0, uv1, tint);
            if border.w > 0.0 {
                self.draw_list.add_rect(fg, start, end, border, 1.0);
            }
        }
        self.advance_cursor(size.x, size.y);
    }

    /// Consumes layout space without drawing anything.
    pub fn dummy(&mut self, size: Vec2f) { self.advance_cursor(size.x, size.y); }
}

#[cfg(test)]
mod tests {
    use crate::context::test_support::{run_frame, test_context};
    use crate::geometry::vec2f;
    use crate::window::{ConditionFlags, WindowFlags};
    use crate::MouseButton;

    // drives one button through hover, press and release
    #[test]
    fn button_press_cycle() {
        let mut ctx = test_context();
        let mut presses = 0;
        let mut build = |ctx: &mut crate::Context, presses: &mut i32| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
            ctx.set_next_window_size(vec2f(300.0, 300.0), ConditionFlags::ONCE);
            if ctx.begin_window("buttons", None, WindowFlags::NONE) {
                ctx.layout_dynamic(0.0, 1);
                if ctx.button("Press##1") {
                    *presses += 1;
                }
                ctx.end_window();
            }
        };

        run_frame(&mut ctx, |ctx| build(ctx, &mut presses));

        // the first widget row starts under the title bar
        ctx.io.add_mouse_pos_event(vec2f(150.0, 145.0));
        run_frame(&mut ctx, |ctx| build(ctx, &mut presses));
        assert_eq!(presses, 0);

        ctx.io.add_mouse_button_event(MouseButton::LEFT, true);
        run_frame(&mut ctx, |ctx| build(ctx, &mut presses));
        assert_eq!(presses, 0);

        ctx.io.add_mouse_button_event(MouseButton::LEFT, false);
        run_frame(&mut ctx, |ctx| build(ctx, &mut presses));
        assert_eq!(presses, 1);
    }

    #[test]
    fn checkbox_toggles_on_release() {
        let mut ctx = test_context();
        let mut checked = false;
        let mut build = |ctx: &mut crate::Context, checked: &mut bool| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
            ctx.set_next_window_size(vec2f(300.0, 300.0), ConditionFlags::ONCE);
            if ctx.begin_window("checks", None, WindowFlags::NONE) {
                ctx.layout_dynamic(0.0, 1);
                ctx.checkbox("enable", checked);
                ctx.end_window();
            }
        };

        run_frame(&mut ctx, |ctx| build(ctx, &mut checked));
        ctx.io.add_mouse_pos_event(vec2f(112.0, 145.0)); // inside the square
        run_frame(&mut ctx, |ctx| build(ctx, &mut checked));
        ctx.io.add_mouse_button_event(MouseButton::LEFT, true);
        run_frame(&mut ctx, |ctx| build(ctx, &mut checked));
        assert!(!checked);
        ctx.io.add_mouse_button_event(MouseButton::LEFT, false);
        run_frame(&mut ctx, |ctx| build(ctx, &mut checked));
        assert!(checked);
    }

    #[test]
    fn offscreen_widgets_still_advance_the_cursor() {
        let mut ctx = test_context();
        run_frame(&mut ctx, |ctx| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
            ctx.set_next_window_size(vec2f(300.0, 200.0), ConditionFlags::ONCE);
            if ctx.begin_window("scrolled", None, WindowFlags::NONE) {
                ctx.layout_dynamic(0.0, 1);
                let before = ctx.get_cursor_pos().y;
                for _ in 0..50 {
                    let _ = ctx.button("row");
                }
                let after = ctx.get_cursor_pos().y;
                assert!(after - before > 200.0, "cursor should pass the window bottom");
                ctx.end_window();
            }
        });
        let win = ctx.window_state("scrolled");
        assert!(win.content_size.y > 200.0);
    }
}
