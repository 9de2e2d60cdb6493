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

/// Virtualizes long uniform lists: only the visible slice (plus one item of
/// slack on each side) is actually built, while the cursor is advanced as if
/// every item had been, so scroll extents stay correct.
///
/// Driven as a loop; each pass builds the items in
/// `display_start..display_end`:
///
/// ```ignore
/// let mut clipper = Clipper::new(1_000_000);
/// while clipper.step(ctx) {
///     for i in clipper.display_start()..clipper.display_end() {
///         ctx.text(&format!("row {}", i));
///     }
/// }
/// ```
pub struct Clipper {
    item_count: u32,
    display_start: u32,
    display_end: u32,
    item_height: f32,
    start_pos_y: f32,
}

impl Clipper {
    /// Creates a clipper over `item_count` uniform-height items.
    pub fn new(item_count: u32) -> Self {
        Self {
            item_count,
            display_start: 0,
            display_end: 0,
            item_height: 0.0,
            start_pos_y: 0.0,
        }
    }

    /// First item to build this pass.
    pub fn display_start(&self) -> u32 { self.display_start }

    /// One past the last item to build this pass.
    pub fn display_end(&self) -> u32 { self.display_end }

    /// Steps the clipper. The first pass renders item 0 alone to measure the
    /// item height; the second pass covers the visible range; the final call
    /// advances the cursor past the unrendered tail and returns `false`.
    pub fn step(&mut self, ctx: &mut Context) -> bool {
        if self.item_count == 0 {
            return false;
        }

        if self.display_start == 0 && self.display_end == 0 {
            // pass 1: measure a single item
            self.display_start = 0;
            self.display_end = 1;
            self.item_height = 0.0;
            self.start_pos_y = ctx.get_cursor_pos().y;
            return true;
        }

        if self.item_height == 0.0 {
            // pass 2: derive the visible range from the measured height
            self.item_height = ctx.get_cursor_pos().y - self.start_pos_y;
            debug_assert!(self.item_height > 0.0, "clipper items must advance the cursor");

            let window_pos_y = ctx.get_window_pos().y;
            if self.start_pos_y < window_pos_y {
                self.display_start = ((window_pos_y - self.start_pos_y) / self.item_height) as u32;
            }
            self.display_end = self.display_start + (ctx.get_window_size().y / self.item_height) as u32 + 1;
            self.display_end = self.display_end.min(self.item_count) + 1;
            if self.display_start > 0 {
                self.display_start -= 1;
            }
            if self.display_end > self.item_count {
                self.display_end = self.item_count;
            }

            if self.display_start > 0 {
                let columns = ctx.current_row_columns().max(1);
                for _ in 0..columns {
                    ctx.advance_cursor(0.0, self.display_start as f32 * self.item_height);
                }
            }
            self.display_start += 1;
            return true;
        }

        // final pass: account for the items below the visible range
        if self.display_end < self.item_count {
            let columns = ctx.current_row_columns().max(1);
            for _ in 0..columns {
                ctx.advance_cursor(0.0, (self.item_count - self.display_end) as f32 * self.item_height);
            }
        }

        self.display_start = 0;
        self.display_end = 0;
        self.item_height = 0.0;
        self.start_pos_y = 0.0;
        self.item_count = 0;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{run_frame, test_context};
    use crate::geometry::vec2f;
    use crate::window::{ConditionFlags, WindowFlags};

    const ITEM_COUNT: u32 = 1_000_000;

    fn list_frame(ctx: &mut Context, scroll_to: Option<f32>) -> (u32, u32, u32, f32) {
        let mut built = 0u32;
        let mut display = (0u32, 0u32);
        let mut advanced = 0.0f32;
        run_frame(ctx, |ctx| {
            ctx.set_next_window_pos(vec2f(50.0, 50.0), ConditionFlags::ONCE);
            ctx.set_next_window_size(vec2f(300.0, 400.0), ConditionFlags::ALWAYS);
            if ctx.begin_window("big list", None, WindowFlags::NONE) {
                if let Some(y) = scroll_to {
                    ctx.set_window_scroll(vec2f(0.0, y));
                }
                ctx.layout_dynamic(15.0, 1);
                let top = ctx.get_cursor_pos().y;
                let mut clipper = Clipper::new(ITEM_COUNT);
                while clipper.step(ctx) {
                    for _ in clipper.display_start()..clipper.display_end() {
                        ctx.text("item");
                        built += 1;
                    }
                    if clipper.display_end() != 0 {
                        display = (clipper.display_start(), clipper.display_end());
                    }
                }
                advanced = ctx.get_cursor_pos().y - top;
                ctx.end_window();
            }
        });
        (built, display.0, display.1, advanced)
    }

    #[test]
    fn a_million_items_cost_one_viewport_of_widgets() {
        let mut ctx = test_context();
        // rows are 15px plus 4px item spacing
        let item_height = 19.0f32;

        // frame 1 measures content; frame 2 applies the scroll; frame 3 is
        // the steady state we inspect
        list_frame(&mut ctx, None);
        list_frame(&mut ctx, Some(10_000.0));
        let (built, display_start, display_end, advanced) = list_frame(&mut ctx, None);

        assert!(display_end <= ITEM_COUNT);
        assert!(display_start < display_end);

        // the visible slice starts near scroll / item_height
        let expected_start = (10_000.0 / item_height) as u32;
        assert!(
            display_start + 3 >= expected_start && display_start <= expected_start + 3,
            "display_start {} vs expected {}",
            display_start,
            expected_start
        );

        // draw cost is one viewport of rows, independent of the item count
        let viewport_rows = (400.0 / item_height) as u32;
        assert!(built <= viewport_rows + 6, "built {} rows", built);

        // the cursor advanced as if every item had been built
        let expected = ITEM_COUNT as f32 * item_height;
        assert!(
            (advanced - expected).abs() <= expected * 1.0e-5,
            "advanced {} vs expected {}",
            advanced,
            expected
        );

        // scroll extents match the virtual content
        let win = ctx.window_state("big list");
        assert!(win.scroll_max.y > expected * 0.9);
    }

    #[test]
    fn empty_clipper_never_steps() {
        let mut ctx = test_context();
        run_frame(&mut ctx, |ctx| {
            ctx.set_next_window_pos(vec2f(50.0, 50.0), ConditionFlags::ONCE);
            if ctx.begin_window("empty", None, WindowFlags::NONE) {
                let mut clipper = Clipper::new(0);
                assert!(!clipper.step(ctx));
                ctx.end_window();
            }
        });
    }
}
