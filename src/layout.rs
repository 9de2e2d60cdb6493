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

/// Whether a layout row interprets widths as window-relative ratios or pixels.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutRowType {
    /// No interpretation (template rows carry it per entry).
    #[default]
    None,
    /// Widths are ratios of the available width.
    Dynamic,
    /// Widths are pixels.
    Static,
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LayoutSystem {
    #[default]
    None,
    Dynamic,
    Static,
    RowXxx,
    Array,
    Template,
    Space,
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TemplateEntryType {
    #[default]
    Dynamic,
    Variable,
    Static,
}

#[derive(Default, Copy, Clone, Debug)]
pub(crate) struct LayoutRowEntry {
    pub ty: TemplateEntryType,
    pub width: f32,
}

#[derive(Default, Copy, Clone, Debug)]
pub(crate) struct LayoutSortLevel {
    pub width: f32,
    pub start_index: u32,
    pub count: u32,
}

/// Shared per-row record all six layout systems write through.
#[derive(Default, Clone)]
pub(crate) struct LayoutRow {
    pub row_type: LayoutRowType,
    pub system: LayoutSystem,
    pub height: f32,
    pub specified_height: f32,
    pub width: f32,
    pub max_width: f32,
    pub max_height: f32,
    pub horizontal_offset: f32,
    pub vertical_offset: f32,
    pub row_start_x: f32,
    pub columns: u32,
    pub current_column: u32,
    pub sizes_or_ratios: Vec<f32>,
    pub static_entry_count: u32,
    pub dynamic_entry_count: u32,
    pub variable_entry_count: u32,
    pub entry_start_index: u32,
}

// Redistributes the leftover width of a template row.
//
// Variable entries are sorted large-to-small (stable, so equal minimum widths
// keep their push order) and grouped into levels of equal width; dynamic
// entries form a trailing zero-width level. The extra width raises the lowest
// level until it matches the next one, merging as it goes; whatever remains is
// shared equally by the final merged level.
pub(crate) fn distribute_template_widths(
    entries: &mut [LayoutRowEntry],
    index_sort: &mut Vec<u32>,
    sort_levels: &mut Vec<LayoutSortLevel>,
    row: &LayoutRow,
    min_width: f32,
    width_available: f32,
) {
    // not enough room: dynamic entries get nothing
    if min_width >= width_available {
        for entry in entries.iter_mut() {
            if entry.ty == TemplateEntryType::Dynamic {
                entry.width = 0.0;
            }
        }
        return;
    }

    if row.dynamic_entry_count + row.variable_entry_count == 0 {
        return;
    }

    // stable sort, large to small
    let variable_count = row.variable_entry_count as usize;
    if variable_count > 1 {
        let mut swapped = true;
        while swapped {
            swapped = false;
            for i in 0..variable_count - 1 {
                let ii = index_sort[i] as usize;
                let jj = index_sort[i + 1] as usize;
                if entries[ii].width < entries[jj].width {
                    index_sort.swap(i, i + 1);
                    swapped = true;
                }
            }
        }
    }

    // dynamic entries appended last so they arrive pre-sorted (width 0)
    if row.dynamic_entry_count > 0 {
        for (i, entry) in entries.iter().enumerate() {
            if entry.ty == TemplateEntryType::Dynamic {
                index_sort.push(i as u32);
            }
        }
    }

    // group equal widths into levels
    let mut current_width = f32::MIN;
    for i in 0..variable_count {
        let entry = &entries[index_sort[i] as usize];
        if entry.width == current_width {
            sort_levels.last_mut().expect("level exists for the running width").count += 1;
        } else {
            sort_levels.push(LayoutSortLevel { width: entry.width, start_index: i as u32, count: 1 });
            current_width = entry.width;
        }
    }
    if row.dynamic_entry_count > 0 {
        sort_levels.push(LayoutSortLevel {
            width: 0.0,
            start_index: row.variable_entry_count,
            count: row.dynamic_entry_count,
        });
    }

    let mut extra_width = width_available - min_width;

    if sort_levels.len() == 1 {
        let level = sort_levels.pop().expect("single level");
        let share = extra_width / level.count as f32;
        for i in level.start_index..level.start_index + level.count {
            entries[index_sort[i as usize] as usize].width += share;
        }
        return;
    }

    while extra_width > 0.0 {
        let level = match sort_levels.pop() {
            Some(level) => level,
            None => break,
        };

        let Some(next) = sort_levels.last_mut() else {
            // final level: share the remainder equally
            let share = extra_width / level.count as f32;
            for i in level.start_index..level.start_index + level.count {
                entries[index_sort[i as usize] as usize].width += share;
            }
            break;
        };

        let delta = next.width - level.width;
        let total_owed = delta * level.count as f32;

        if total_owed < extra_width {
            for i in level.start_index..level.start_index + level.count {
                entries[index_sort[i as usize] as usize].width += delta;
            }
            next.count += level.count;
            extra_width -= total_owed;
        } else {
            let share = extra_width / level.count as f32;
            for i in level.start_index..level.start_index + level.count {
                entries[index_sort[i as usize] as usize].width += share;
            }
            extra_width = 0.0;
        }
    }
}

impl Context {
    /// Width left for widgets after padding, spacing, the scrollbar and tree
    /// indentation.
    pub(crate) fn layout_width_available(&self, columns: u32) -> f32 {
        let win = self.win();
        let style = self.style();
        let spacing = style.item_spacing.x * (columns.max(1) - 1) as f32;
        let indent = win.temp.tree_depth as f32 * style.indent_size;
        let scrollbar = if win.scrollbar_y { style.scrollbar_size + 2.0 } else { 0.0 };
        win.size.x - style.window_horizontal_padding * 2.0 - spacing - scrollbar - indent
    }

    /// Starts a row of `columns` equal-width widgets.
    pub fn layout_dynamic(&mut self, height: f32, columns: u32) {
        let row = LayoutRow {
            height,
            specified_height: height,
            row_type: LayoutRowType::Dynamic,
            system: LayoutSystem::Dynamic,
            columns,
            width: 1.0 / columns.max(1) as f32,
            ..LayoutRow::default()
        };
        self.win_mut().temp.current_row = row;
    }

    /// Starts a row of `columns` widgets, each `width` pixels wide.
    pub fn layout_static(&mut self, height: f32, width: f32, columns: u32) {
        let row = LayoutRow {
            height,
            specified_height: height,
            row_type: LayoutRowType::Static,
            system: LayoutSystem::Static,
            columns,
            width,
            ..LayoutRow::default()
        };
        self.win_mut().temp.current_row = row;
    }

    /// Starts a row whose widget widths are pushed one by one with
    /// [`Context::layout_row_push`]. The row does not wrap; submitting more
    /// than `columns` widgets is a programming error.
    pub fn layout_row_begin(&mut self, row_type: LayoutRowType, height: f32, columns: u32) {
        let row = LayoutRow {
            height,
            specified_height: height,
            row_type,
            system: LayoutSystem::RowXxx,
            columns,
            ..LayoutRow::default()
        };
        self.win_mut().temp.current_row = row;
    }

    /// Sets the width (ratio or pixels, per the row type) of the next widget.
    pub fn layout_row_push(&mut self, width: f32) {
        let row = &mut self.win_mut().temp.current_row;
        assert!(row.system == LayoutSystem::RowXxx, "layout_row_push outside layout_row_begin");
        row.width = width;
    }

    /// Ends a push-style row and advances to the next row position.
    pub fn layout_row_end(&mut self) {
        let win = self.win_mut();
        assert!(win.temp.current_row.system == LayoutSystem::RowXxx, "layout_row_end outside layout_row_begin");
        let spacing_y = {
            let row = &win.temp.current_row;
            win.temp.cursor_max_pos.x = (win.temp.row_pos.x + row.max_width).max(win.temp.cursor_max_pos.x);
            win.temp.cursor_max_pos.y = (win.temp.row_pos.y + row.max_height).max(win.temp.cursor_max_pos.y);
            row.max_height
        };
        win.temp.row_pos.y += spacing_y;
        let item_spacing_y = self.style().item_spacing.y;
        let win = self.win_mut();
        win.temp.row_pos.y += item_spacing_y;
        win.temp.current_row = LayoutRow::default();
    }

    /// Starts a row from an array of widths (pixels) or ratios, one per
    /// column. Wraps automatically after `columns` widgets.
    pub fn layout_row(&mut self, row_type: LayoutRowType, height: f32, columns: u32, sizes_or_ratios: &[f32]) {
        let row = LayoutRow {
            height,
            specified_height: height,
            row_type,
            system: LayoutSystem::Array,
            columns,
            sizes_or_ratios: sizes_or_ratios.to_vec(),
            ..LayoutRow::default()
        };
        self.win_mut().temp.current_row = row;
    }

    /// Starts a template row; push entries, then call
    /// [`Context::layout_template_end`] to compute the final widths.
    pub fn layout_template_begin(&mut self, height: f32) {
        let entry_start = self.win().row_template_entries.len() as u32;
        let row = LayoutRow {
            height,
            specified_height: height,
            row_type: LayoutRowType::None,
            system: LayoutSystem::Template,
            columns: 0,
            entry_start_index: entry_start,
            ..LayoutRow::default()
        };
        self.win_mut().temp.current_row = row;
    }

    /// Adds a column that shares whatever width is left.
    pub fn layout_template_push_dynamic(&mut self) {
        let win = self.win_mut();
        debug_assert!(win.temp.current_row.system == LayoutSystem::Template);
        win.temp.current_row.dynamic_entry_count += 1;
        win.row_template_entries.push(LayoutRowEntry { ty: TemplateEntryType::Dynamic, width: 0.0 });
        win.temp.current_row.columns += 1;
    }

    /// Adds a column at least `width` pixels wide that may grow.
    pub fn layout_template_push_variable(&mut self, width: f32) {
        let win = self.win_mut();
        debug_assert!(win.temp.current_row.system == LayoutSystem::Template);
        win.temp.current_row.variable_entry_count += 1;
        win.temp.current_row.width += width;
        win.temp_layout_index_sort.push(win.temp.current_row.columns);
        win.row_template_entries.push(LayoutRowEntry { ty: TemplateEntryType::Variable, width });
        win.temp.current_row.columns += 1;
        win.temp.temp_min_width += width;
    }

    /// Adds a column of exactly `width` pixels.
    pub fn layout_template_push_static(&mut self, width: f32) {
        let win = self.win_mut();
        debug_assert!(win.temp.current_row.system == LayoutSystem::Template);
        win.temp.current_row.static_entry_count += 1;
        win.temp.current_row.width += width;
        win.row_template_entries.push(LayoutRowEntry { ty: TemplateEntryType::Static, width });
        win.temp.current_row.columns += 1;
        win.temp.temp_static_width += width;
        win.temp.temp_min_width += width;
    }

    /// Finishes a template row, redistributing the leftover width. Equal
    /// minimum widths keep their push order; the tiebreak is stable across
    /// frames.
    pub fn layout_template_end(&mut self) {
        let columns = {
            let win = self.win();
            let row = &win.temp.current_row;
            debug_assert!(row.system == LayoutSystem::Template, "layout_template_end outside a template row");
            debug_assert_eq!(
                row.static_entry_count + row.variable_entry_count + row.dynamic_entry_count,
                row.columns
            );
            debug_assert!(win.temp.temp_static_width <= win.temp.temp_min_width);
            row.columns
        };
        let width_available = self.layout_width_available(columns);
        let item_spacing_y = self.style().item_spacing.y;

        let win = self.win_mut();
        let row = win.temp.current_row.clone();
        win.temp.cursor_max_pos.x = (win.temp.row_pos.x + row.max_width).max(win.temp.cursor_max_pos.x);
        win.temp.cursor_max_pos.y = (win.temp.row_pos.y + row.max_height).max(win.temp.cursor_max_pos.y);
        win.temp.row_pos.y += row.max_height + item_spacing_y;

        let start = row.entry_start_index as usize;
        let end = start + row.columns as usize;
        let min_width = win.temp.temp_min_width;
        let mut index_sort = std::mem::take(&mut win.temp_layout_index_sort);
        let mut sort_levels = std::mem::take(&mut win.temp_layout_sort);
        distribute_template_widths(
            &mut win.row_template_entries[start..end],
            &mut index_sort,
            &mut sort_levels,
            &row,
            min_width,
            width_available,
        );

        index_sort.clear();
        sort_levels.clear();
        win.temp_layout_index_sort = index_sort;
        win.temp_layout_sort = sort_levels;
        win.temp.temp_min_width = 0.0;
        win.temp.temp_static_width = 0.0;
    }

    /// Starts a free-form placement region `height` tall holding
    /// `widget_count` widgets placed with [`Context::layout_space_push`].
    pub fn layout_space_begin(&mut self, row_type: LayoutRowType, height: f32, widget_count: u32) {
        let row = LayoutRow {
            height,
            specified_height: if row_type == LayoutRowType::Dynamic { height } else { 1.0 },
            row_type,
            system: LayoutSystem::Space,
            columns: widget_count,
            ..LayoutRow::default()
        };
        self.win_mut().temp.current_row = row;
    }

    /// Places the next widget at `(x, y)` with size `(width, height)`; in a
    /// dynamic space these are fractions, in a static space pixels.
    pub fn layout_space_push(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let window_width = self.win().size.x;
        let row = &mut self.win_mut().temp.current_row;
        assert!(row.system == LayoutSystem::Space, "layout_space_push outside layout_space_begin");
        row.horizontal_offset = if row.row_type == LayoutRowType::Dynamic { x * window_width } else { x };
        row.vertical_offset = y * row.specified_height;
        row.width = width;
        row.height = height * row.specified_height;
    }

    /// Ends a free-form placement region.
    pub fn layout_space_end(&mut self) {
        let item_spacing_y = self.style().item_spacing.y;
        let win = self.win_mut();
        assert!(win.temp.current_row.system == LayoutSystem::Space, "layout_space_end outside layout_space_begin");
        let row = &win.temp.current_row;
        win.temp.cursor_max_pos.x = (win.temp.row_pos.x + row.max_width).max(win.temp.cursor_max_pos.x);
        win.temp.cursor_max_pos.y = (win.temp.row_pos.y + row.max_height).max(win.temp.cursor_max_pos.y);
        win.temp.row_pos.y += row.max_height + item_spacing_y;
        win.temp.current_row = LayoutRow::default();
    }

    /// Current widget cursor position.
    pub fn get_cursor_pos(&self) -> Vec2f {
        let win = self.win();
        Vec2f::new(
            win.temp.row_pos.x + win.temp.current_row.horizontal_offset,
            win.temp.row_pos.y + win.temp.current_row.vertical_offset,
        )
    }

    /// Default widget height: one line of text plus frame padding.
    pub fn get_frame_height(&self) -> f32 { self.style().font_size + self.style().frame_padding.y * 2.0 }

    /// Computes the current widget's size from the active layout row.
    pub(crate) fn calculate_item_size(&mut self, default_height: f32) -> Vec2f {
        let row_system;
        let row_height;
        {
            let row = &self.win().temp.current_row;
            row_system = row.system;
            row_height = if row.height == 0.0 { default_height } else { row.height };
        }

        if row_system == LayoutSystem::Template {
            let win = self.win();
            let row = &win.temp.current_row;
            let entry = &win.row_template_entries[(row.entry_start_index + row.current_column) as usize];
            return Vec2f::new(entry.width, row_height);
        }

        let columns = self.win().temp.current_row.columns;
        let width_available = self.layout_width_available(columns);

        let win = self.win_mut();
        let row = &mut win.temp.current_row;
        if !row.sizes_or_ratios.is_empty() {
            row.width = row.sizes_or_ratios[(row.current_column as usize).min(row.sizes_or_ratios.len() - 1)];
        }
        let mut width = row.width;
        if row.row_type == LayoutRowType::Dynamic {
            width *= width_available;
        }
        Vec2f::new(width, row_height)
    }

    /// Advances past a widget of the given size, wrapping to the next row
    /// when the column count is exhausted.
    pub(crate) fn advance_cursor(&mut self, width: f32, height: f32) {
        let item_spacing = self.style().item_spacing;
        let win = self.win_mut();
        let row = &mut win.temp.current_row;

        row.current_column += 1;
        row.max_width = (row.horizontal_offset + width).max(row.max_width);
        row.max_height = (row.vertical_offset + height).max(row.max_height);

        // not yet at the end of the row
        if row.current_column < row.columns {
            row.horizontal_offset += width + item_spacing.x;
        }

        // automatic wrap
        if row.current_column == row.columns && row.system != LayoutSystem::RowXxx {
            win.temp.row_pos.y += row.max_height + item_spacing.y;

            win.temp.cursor_max_pos.x = (win.temp.row_pos.x + row.max_width).max(win.temp.cursor_max_pos.x);
            win.temp.cursor_max_pos.y = win.temp.row_pos.y.max(win.temp.cursor_max_pos.y);

            row.current_column = 0;
            row.max_width = 0.0;
            row.max_height = 0.0;
            row.horizontal_offset = row.row_start_x + win.temp.extra_indent;
            row.vertical_offset = 0.0;
        }

        // row-xxx rows never wrap; overflowing one is a caller bug
        assert!(
            row.current_column <= row.columns || row.system != LayoutSystem::RowXxx,
            "layout_row overflow: more widgets than declared columns"
        );
    }

    /// Indents subsequent widgets. Zero means one style indent step.
    pub fn indent(&mut self, amount: f32) {
        let step = if amount == 0.0 { self.style().indent_size } else { amount };
        let win = self.win_mut();
        win.temp.current_row.horizontal_offset += step;
        win.temp.extra_indent += step;
    }

    /// Undoes a matching [`Context::indent`].
    pub fn unindent(&mut self, amount: f32) {
        let step = if amount == 0.0 { self.style().indent_size } else { amount };
        let win = self.win_mut();
        win.temp.current_row.horizontal_offset -= step;
        win.temp.extra_indent -= step;
    }

    /// Inserts an empty row of double item spacing.
    pub fn vertical_spacing(&mut self) {
        let spacing = self.style().item_spacing.y * 2.0;
        self.win_mut().temp.row_pos.y += spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_template(pushes: &[(TemplateEntryType, f32)], width_available: f32) -> Vec<f32> {
        let mut entries = Vec::new();
        let mut index_sort = Vec::new();
        let mut sort_levels = Vec::new();
        let mut row = LayoutRow { system: LayoutSystem::Template, ..LayoutRow::default() };
        let mut min_width = 0.0;
        for (ty, width) in pushes {
            match ty {
                TemplateEntryType::Dynamic => row.dynamic_entry_count += 1,
                TemplateEntryType::Variable => {
                    row.variable_entry_count += 1;
                    index_sort.push(row.columns);
                    min_width += width;
                }
                TemplateEntryType::Static => {
                    row.static_entry_count += 1;
                    min_width += width;
                }
            }
            entries.push(LayoutRowEntry { ty: *ty, width: *width });
            row.columns += 1;
        }
        distribute_template_widths(&mut entries, &mut index_sort, &mut sort_levels, &row, min_width, width_available);
        entries.iter().map(|e| e.width).collect()
    }

    use TemplateEntryType::{Dynamic, Static, Variable};

    #[test]
    fn widths_sum_to_available() {
        let widths = run_template(&[(Static, 50.0), (Variable, 100.0), (Variable, 30.0), (Dynamic, 0.0)], 400.0);
        let total: f32 = widths.iter().sum();
        assert!((total - 400.0).abs() < 0.01, "total {} != available", total);
        // static entries never change
        assert_eq!(widths[0], 50.0);
        // every non-static entry ends at or above its minimum
        assert!(widths[1] >= 100.0 && widths[2] >= 30.0 && widths[3] >= 0.0);
    }

    #[test]
    fn overflow_zeroes_dynamic_entries() {
        let widths = run_template(&[(Variable, 300.0), (Dynamic, 0.0), (Static, 200.0)], 400.0);
        assert_eq!(widths[1], 0.0);
        assert_eq!(widths[0], 300.0);
        assert_eq!(widths[2], 200.0);
    }

    #[test]
    fn lower_levels_are_raised_to_the_next_level() {
        // variable minimums 100 and 40; 20 extra only partially closes the gap
        let widths = run_template(&[(Variable, 100.0), (Variable, 40.0)], 160.0);
        assert_eq!(widths[0], 100.0);
        assert!((widths[1] - 60.0).abs() < 0.01);

        // plenty of extra: both reach the same width
        let widths = run_template(&[(Variable, 100.0), (Variable, 40.0)], 300.0);
        assert!((widths[0] - widths[1]).abs() < 0.01);
        assert!((widths[0] + widths[1] - 300.0).abs() < 0.01);
    }

    #[test]
    fn equal_minimums_share_equally_in_push_order() {
        let widths = run_template(&[(Variable, 50.0), (Variable, 50.0), (Variable, 50.0)], 300.0);
        for w in &widths {
            assert!((w - 100.0).abs() < 0.01);
        }
    }

    #[test]
    fn dynamics_split_what_variables_leave() {
        let widths = run_template(&[(Dynamic, 0.0), (Dynamic, 0.0)], 200.0);
        assert!((widths[0] - 100.0).abs() < 0.01);
        assert!((widths[1] - 100.0).abs() < 0.01);
    }

    #[test]
    fn exact_fit_leaves_minimums() {
        let widths = run_template(&[(Variable, 120.0), (Static, 80.0)], 200.0);
        assert_eq!(widths, vec![120.0, 80.0]);
    }
}
