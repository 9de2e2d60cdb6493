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
mod basic;
mod slider;
mod tabs;
mod text;
mod text_input;
mod tree;

pub(crate) use tabs::TabBar;

use rs_math3d::Vec2f;

use crate::context::Context;
use crate::draw::LayerId;
use crate::find_rendered_text_end;

impl Context {
    // measured size of a label with its ## suffix trimmed
    pub(crate) fn text_size(&self, text: &str) -> Vec2f {
        self.draw_list
            .calculate_text_size(self.font_id(), self.style().font_size, find_rendered_text_end(text), 0.0)
    }

    // draws a label (## suffix trimmed) at a pixel-snapped position
    pub(crate) fn add_widget_text(&mut self, layer: LayerId, pos: Vec2f, color: rs_math3d::Vec4f, text: &str) {
        let font = self.font_id();
        let font_size = self.style().font_size;
        let shown = find_rendered_text_end(text);
        if shown.is_empty() {
            return;
        }
        self.draw_list
            .add_text(layer, font, font_size, Vec2f::new(pos.x.round(), pos.y.round()), color, shown, 0.0);
    }

    // vertical centering for a single text line inside a cell
    pub(crate) fn centered_text_y(&self, start_y: f32, cell_height: f32) -> f32 {
        start_y + (cell_height - self.style().font_size) / 2.0
    }
}
