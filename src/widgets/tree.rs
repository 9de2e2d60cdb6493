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

impl Context {
    // the open/closed arrow to the left of headers and tree nodes
    fn draw_expand_arrow(&mut self, start: rs_math3d::Vec2f, row_height: f32, open: bool) {
        let fg = self.win().fg_layer;
        let center = vec2f(start.x + 12.0, start.y + row_height / 2.0);
        let white = Vec4f::new(1.0, 1.0, 1.0, 1.0);
        if open {
            let point = vec2f(center.x, center.y + 4.0);
            let right = vec2f(center.x + 4.0, center.y - 4.0);
            let left = vec2f(center.x - 4.0, center.y - 4.0);
            self.draw_list.add_triangle_filled(fg, point, right, left, white);
        } else {
            let point = vec2f(center.x + 4.0, center.y);
            let right = vec2f(center.x - 4.0, center.y - 4.0);
            let left = vec2f(center.x - 4.0, center.y + 4.0);
            self.draw_list.add_triangle_filled(fg, point, right, left, white);
        }
    }

    /// A full-width header that folds its content. Open state persists in the
    /// window storage. When this returns `true`, build the content and close
    /// with [`Context::end_collapsing_header`].
    #[must_use]
    pub fn collapsing_header(&mut self, label: &str) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let id = self.make_id(label);
        let mut open = self.win_mut().storage.get_bool(id.raw(), false);

        if self.should_render(start, widget_size) {
            let bounds = Rect::from_pos_size(start, widget_size);
            let (pressed, _, _) = self.button_behavior(bounds, id);
            if pressed {
                open = self.win_mut().storage.toggle_bool(id.raw(), false);
            }

            let fill = if self.active_id == id {
                self.colors().header_active
            } else if self.hovered_id == id {
                self.colors().header_hovered
            } else {
                self.colors().header
            };
            let fg = self.win().fg_layer;
            self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, fill);
            self.draw_expand_arrow(start, widget_size.y, open);

            let text_color = self.colors().text;
            let text_pos = vec2f(start.x + widget_size.y * 1.5, self.centered_text_y(start.y, widget_size.y));
            self.add_widget_text(fg, text_pos, text_color, label);
        }

        if open {
            let row = self.win().temp.current_row.clone();
            self.win_mut().row_stack.push(row);
        }
        self.advance_cursor(widget_size.x, widget_size.y);
        open
    }

    /// Closes an open [`Context::collapsing_header`].
    pub fn end_collapsing_header(&mut self) {
        let row = self.win_mut().row_stack.pop().expect("end_collapsing_header without an open header");
        self.win_mut().temp.current_row = row;
    }

    /// A tree node; children are indented and id-scoped while open. When this
    /// returns `true`, build the children and close with
    /// [`Context::tree_pop`].
    #[must_use]
    pub fn tree_node(&mut self, label: &str) -> bool {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        let id = self.make_id(label);
        let mut open = self.win_mut().storage.get_bool(id.raw(), false);

        if self.should_render(start, widget_size) {
            let bounds = Rect::from_pos_size(start, widget_size);
            let (pressed, _, _) = self.button_behavior(bounds, id);
            if pressed {
                open = self.win_mut().storage.toggle_bool(id.raw(), false);
            }

            let fg = self.win().fg_layer;
            if self.active_id == id {
                let color = self.colors().header_active;
                self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, color);
            } else if self.hovered_id == id {
                let color = self.colors().header_hovered;
                self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, color);
            }
            self.draw_expand_arrow(start, widget_size.y, open);

            let text_color = self.colors().text;
            let text_pos = vec2f(start.x + widget_size.y * 1.5, self.centered_text_y(start.y, widget_size.y));
            self.add_widget_text(fg, text_pos, text_color, label);
        }
        self.advance_cursor(widget_size.x, widget_size.y);

        if open {
            let row = self.win().temp.current_row.clone();
            let win = self.win_mut();
            win.temp.tree_depth += 1;
            win.row_stack.push(row);
            self.id_stack.push(id);
        }
        open
    }

    /// Closes an open [`Context::tree_node`].
    pub fn tree_pop(&mut self) {
        let win = self.win_mut();
        debug_assert!(win.temp.tree_depth > 0, "tree_pop without an open tree_node");
        win.temp.tree_depth -= 1;
        let row = win.row_stack.pop().expect("tree_pop without an open tree_node");
        win.temp.current_row = row;
        self.pop_id();
    }
}

#[cfg(test)]
mod tests {
    use crate::context::test_support::{run_frame, test_context};
    use crate::geometry::vec2f;
    use crate::window::{ConditionFlags, WindowFlags};
    use crate::MouseButton;

    #[test]
    fn header_open_state_persists_in_storage() {
        let mut ctx = test_context();
        let mut inner_seen = false;
        let mut build = |ctx: &mut crate::Context, inner_seen: &mut bool| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
            ctx.set_next_window_size(vec2f(300.0, 300.0), ConditionFlags::ONCE);
            if ctx.begin_window("headers", None, WindowFlags::NONE) {
                ctx.layout_dynamic(0.0, 1);
                if ctx.collapsing_header("details") {
                    *inner_seen = true;
                    ctx.text("inner");
                    ctx.end_collapsing_header();
                }
                ctx.end_window();
            }
        };

        run_frame(&mut ctx, |ctx| build(ctx, &mut inner_seen));
        assert!(!inner_seen);

        // click the header row
        ctx.io.add_mouse_pos_event(vec2f(150.0, 145.0));
        run_frame(&mut ctx, |ctx| build(ctx, &mut inner_seen));
        ctx.io.add_mouse_button_event(MouseButton::LEFT, true);
        run_frame(&mut ctx, |ctx| build(ctx, &mut inner_seen));
        ctx.io.add_mouse_button_event(MouseButton::LEFT, false);
        run_frame(&mut ctx, |ctx| build(ctx, &mut inner_seen));
        assert!(inner_seen);

        // stays open on later frames without input
        inner_seen = false;
        run_frame(&mut ctx, |ctx| build(ctx, &mut inner_seen));
        assert!(inner_seen);
    }

    #[test]
    fn tree_nodes_scope_ids_and_indent() {
        let mut ctx = test_context();
        run_frame(&mut ctx, |ctx| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
            if ctx.begin_window("trees", None, WindowFlags::NONE) {
                ctx.layout_dynamic(0.0, 1);
                // force the node open through storage so nesting is observable
                let id = ctx.make_id("root");
                ctx.win_mut().storage.set_bool(id.raw(), true);
                if ctx.tree_node("root") {
                    assert_eq!(ctx.win().temp.tree_depth, 1);
                    // the same label hashes differently inside the node
                    assert_ne!(ctx.make_id("root"), id);
                    ctx.text("leaf");
                    ctx.tree_pop();
                }
                assert_eq!(ctx.win().temp.tree_depth, 0);
                ctx.end_window();
            }
        });
    }
}
