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
use rs_math3d::Vec2f;

use crate::context::Context;
use crate::geometry::{vec2f, Rect};
use crate::Id;

/// Persistent state for one tab bar, found again by id each frame.
pub(crate) struct TabBar {
    pub id: Id,
    pub start_pos: Vec2f,
    pub cursor_pos: Vec2f,
    pub current_index: u32,
    pub value: Id,
    pub next_value: Id,
}

impl Context {
    /// Begins a tab bar. Pair with [`Context::end_tab_bar`].
    pub fn begin_tab_bar(&mut self, label: &str) -> bool {
        let frame_height = self.get_frame_height();
        let start = self.get_cursor_pos();
        let widget_size = self.calculate_item_size(frame_height);

        let row = self.win().temp.current_row.clone();
        self.win_mut().row_stack.push(row);
        self.layout_dynamic(0.0, 1);

        let id = self.make_id(label);
        self.id_stack.push(id);

        // find or create the persistent tab bar entry
        let index = match self.tab_bars.iter().position(|bar| bar.id == id) {
            Some(index) => index,
            None => {
                self.tab_bars.push(TabBar {
                    id,
                    start_pos: start,
                    cursor_pos: start,
                    current_index: 0,
                    value: Id::NONE,
                    next_value: Id::NONE,
                });
                self.tab_bars.len() - 1
            }
        };
        {
            let bar = &mut self.tab_bars[index];
            bar.start_pos = start;
            bar.cursor_pos = start;
            bar.current_index = 0;
        }
        self.current_tab_bar = Some(index);

        // underline across the bar width
        let bar_start = self.tab_bars[index].start_pos;
        let fg = self.win().fg_layer;
        let color = self.colors().button_active;
        self.draw_list.add_line(
            fg,
            vec2f(bar_start.x, bar_start.y + frame_height),
            vec2f(bar_start.x + widget_size.x, bar_start.y + frame_height),
            color,
            1.0,
        );

        self.advance_cursor(widget_size.x, frame_height);
        true
    }

    /// Ends a tab bar, committing the next selected tab.
    pub fn end_tab_bar(&mut self) {
        let index = self.current_tab_bar.expect("end_tab_bar without begin_tab_bar");
        let bar = &mut self.tab_bars[index];
        // a bar with zero tabs keeps its previous selection
        if bar.current_index > 0 && !bar.next_value.is_none() {
            bar.value = bar.next_value;
        }
        self.pop_id();
        let row = self.win_mut().row_stack.pop().expect("tab bar row stack");
        self.win_mut().temp.current_row = row;
        self.current_tab_bar = None;
    }

    /// Begins a tab. Returns `true` when this tab is the selected one; the
    /// caller then builds the tab content and closes with
    /// [`Context::end_tab`]. Unselected tabs are closed automatically.
    pub fn begin_tab(&mut self, label: &str) -> bool {
        let frame_height = self.get_frame_height();
        let row = self.win().temp.current_row.clone();
        self.win_mut().row_stack.push(row);
        self.layout_dynamic(0.0, 1);

        let id = self.make_id(label);
        self.id_stack.push(id);

        let bar_index = self.current_tab_bar.expect("begin_tab outside a tab bar");
        if self.tab_bars[bar_index].value.is_none() {
            self.tab_bars[bar_index].value = id;
        }

        let start = self.tab_bars[bar_index].cursor_pos;
        let text_size = self.text_size(label);
        let frame_padding = self.style().frame_padding.x;
        let final_size = vec2f(text_size.x + 2.0 * frame_padding, frame_height);
        let bounds = Rect::from_pos_size(start, final_size);

        let (_pressed, _, _) = self.button_behavior(bounds, id);
        if self.active_id == id {
            self.tab_bars[bar_index].next_value = id;
        }

        let selected = self.tab_bars[bar_index].value == id;
        let fill = if self.active_id == id || selected {
            self.colors().button_active
        } else if self.hovered_id == id {
            self.colors().button_hovered
        } else {
            self.colors().button
        };
        let fg = self.win().fg_layer;
        self.draw_list.add_rect_filled(fg, bounds.min, bounds.max, fill);

        let text_color = self.colors().text;
        let text_pos = vec2f(
            start.x + final_size.x / 2.0 - text_size.x / 2.0,
            self.centered_text_y(start.y, frame_height),
        );
        self.add_widget_text(fg, text_pos, text_color, label);

        {
            let inner_spacing = self.style().inner_spacing.x;
            let bar = &mut self.tab_bars[bar_index];
            bar.cursor_pos.x += inner_spacing + final_size.x;
            bar.current_index += 1;
        }

        if !selected {
            self.end_tab();
        }
        selected
    }

    /// Ends the selected tab.
    pub fn end_tab(&mut self) {
        self.pop_id();
        let row = self.win_mut().row_stack.pop().expect("tab row stack");
        self.win_mut().temp.current_row = row;
    }
}

#[cfg(test)]
mod tests {
    use crate::context::test_support::{run_frame, test_context};
    use crate::geometry::vec2f;
    use crate::window::{ConditionFlags, WindowFlags};

    #[test]
    fn first_tab_is_selected_by_default() {
        let mut ctx = test_context();
        let mut selected = Vec::new();
        run_frame(&mut ctx, |ctx| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), ConditionFlags::ONCE);
            ctx.set_next_window_size(vec2f(400.0, 300.0), ConditionFlags::ONCE);
            if ctx.begin_window("tabbed", None, WindowFlags::NONE) {
                ctx.layout_dynamic(0.0, 1);
                if ctx.begin_tab_bar("bar") {
                    for name in ["first", "second", "third"] {
                        if ctx.begin_tab(name) {
                            selected.push(name);
                            ctx.text(name);
                            ctx.end_tab();
                        }
                    }
                    ctx.end_tab_bar();
                }
                ctx.end_window();
            }
        });
        assert_eq!(selected, vec!["first"]);
    }
}
