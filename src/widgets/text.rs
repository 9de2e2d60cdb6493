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
use crate::geometry::vec2f;

impl Context {
    /// Shows a line of text in the default text color.
    pub fn text(&mut self, text: &str) {
        let color = self.colors().text;
        self.color_text(color, text);
    }

    /// Shows a line of text in an explicit color.
    pub fn color_text(&mut self, color: Vec4f, text: &str) {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        if self.should_render(start, widget_size) {
            let fg = self.win().fg_layer;
            let y = self.centered_text_y(start.y, widget_size.y);
            self.add_widget_text(fg, vec2f(start.x, y), color, text);
        }
        self.advance_cursor(widget_size.x, widget_size.y);
    }

    /// Shows `label` on the left third of the cell and `value` on the rest.
    pub fn labeled_text(&mut self, label: &str, value: &str) {
        let widget_size = self.calculate_item_size(self.get_frame_height());
        let start = self.get_cursor_pos();
        if self.should_render(start, widget_size) {
            let fg = self.win().fg_layer;
            let text_color = self.colors().text;
            let y = self.centered_text_y(start.y, widget_size.y);
            let value_x = (start.x + widget_size.x / 3.0).floor();
            self.add_widget_text(fg, vec2f(start.x, y), text_color, label);
            self.add_widget_text(fg, vec2f(value_x, y), text_color, value);
        }
        self.advance_cursor(widget_size.x, widget_size.y);
    }

    /// Draws a thin horizontal rule across the cell.
    pub fn separator(&mut self) {
        let height = self.style().item_spacing.y * 2.0;
        let widget_size = self.calculate_item_size(height);
        let start = self.get_cursor_pos();
        if self.should_render(start, widget_size) {
            let fg = self.win().fg_layer;
            let color = self.colors().checkmark;
            self.draw_list
                .add_line(fg, start, Vec2f::new(start.x + widget_size.x, start.y), color, 1.0);
        }
        self.advance_cursor(widget_size.x, widget_size.y);
    }
}
