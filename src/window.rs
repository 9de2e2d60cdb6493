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
use bitflags::bitflags;
use rs_math3d::Vec2f;

use crate::draw::LayerId;
use crate::geometry::Rect;
use crate::layout::{LayoutRow, LayoutRowEntry, LayoutSortLevel};
use crate::storage::Storage;
use crate::Id;

bitflags! {
    #[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
    /// Options controlling window behavior and chrome.
    pub struct WindowFlags : u32 {
        /// Hide the title bar.
        const NO_TITLE_BAR = 1;
        /// Disallow resizing from borders and the grip.
        const NO_RESIZE = 1 << 1;
        /// Hide the collapse button.
        const NO_COLLAPSE = 1 << 2;
        /// Disallow moving by dragging the title bar.
        const NO_MOVE = 1 << 3;
        /// Fit the window to its content every frame.
        const AUTO_SIZE = 1 << 4;
        /// The window is embedded in a parent window.
        const CHILD_WINDOW = 1 << 5;
        /// The window is the shared tooltip.
        const TOOLTIP = 1 << 6;
        /// No options.
        const NONE = 0;
    }

    #[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
    /// When a `set_next_window_*` parameter is honored.
    pub struct ConditionFlags : u32 {
        /// Apply every frame.
        const ALWAYS = 1;
        /// Apply once per window lifetime.
        const ONCE = 1 << 1;
        /// Apply only if the window has no stored state yet.
        const FIRST_USE_EVER = 1 << 2;
        /// Apply when the window transitions from hidden to shown.
        const APPEARING = 1 << 3;
        /// Never apply.
        const NONE = 0;
    }
}

/// Per-frame window scratch state, reset at `begin_window`.
#[derive(Default)]
pub(crate) struct TempWindowData {
    pub cursor_start_pos: Vec2f,
    pub cursor_max_pos: Vec2f,
    pub row_pos: Vec2f,
    pub current_row: LayoutRow,
    pub tree_depth: u32,
    pub extra_indent: f32,
    pub temp_min_width: f32,
    pub temp_static_width: f32,
}

/// A window: id, geometry, scroll state, chrome flags, per-widget storage and
/// the two draw layers its widgets write into. Created on the first
/// `begin_window` with a given name and persisted until context teardown.
pub(crate) struct UiWindow {
    pub id: Id,
    pub name: String,
    pub pos: Vec2f,
    pub size: Vec2f,
    // size before collapsing / autosizing, restored on expand
    pub full_size: Vec2f,
    pub min_size: Vec2f,
    pub max_size: Vec2f,
    pub content_size: Vec2f,
    pub scroll: Vec2f,
    pub scroll_max: Vec2f,
    pub inner_rect: Rect,
    pub outer_rect: Rect,
    pub outer_rect_clipped: Rect,
    pub inner_clip_rect: Rect,
    pub collapsed: bool,
    pub scrollbar_x: bool,
    pub scrollbar_y: bool,
    pub appearing: bool,
    pub visible: bool,
    // seen this frame
    pub active: bool,
    pub flags: WindowFlags,
    pub focus_order: usize,
    pub hide_frames: u8,
    pub bg_layer: LayerId,
    pub fg_layer: LayerId,
    // arena indices; self index when this is a root window
    pub parent_window: usize,
    pub root_window: usize,
    pub child_windows: Vec<usize>,
    pub storage: Storage,
    pub pos_allowable: ConditionFlags,
    pub size_allowable: ConditionFlags,
    pub collapse_allowable: ConditionFlags,
    pub temp: TempWindowData,
    pub row_stack: Vec<LayoutRow>,
    pub row_template_entries: Vec<LayoutRowEntry>,
    pub temp_layout_index_sort: Vec<u32>,
    pub temp_layout_sort: Vec<LayoutSortLevel>,
}

impl UiWindow {
    pub fn new(id: Id, name: &str, index: usize) -> Self {
        Self {
            id,
            name: name.to_string(),
            pos: Vec2f::new(200.0, 200.0),
            size: Vec2f::new(500.0, 500.0),
            full_size: Vec2f::new(500.0, 500.0),
            min_size: Vec2f::new(200.0, 200.0),
            max_size: Vec2f::new(10000.0, 10000.0),
            content_size: Vec2f::new(0.0, 0.0),
            scroll: Vec2f::new(0.0, 0.0),
            scroll_max: Vec2f::new(0.0, 0.0),
            inner_rect: Rect::default(),
            outer_rect: Rect::default(),
            outer_rect_clipped: Rect::default(),
            inner_clip_rect: Rect::default(),
            collapsed: false,
            scrollbar_x: false,
            scrollbar_y: false,
            appearing: true,
            visible: false,
            active: false,
            flags: WindowFlags::NONE,
            focus_order: 0,
            hide_frames: 0,
            bg_layer: LayerId(0),
            fg_layer: LayerId(0),
            parent_window: index,
            root_window: index,
            child_windows: Vec::new(),
            storage: Storage::new(),
            pos_allowable: ConditionFlags::ALWAYS | ConditionFlags::ONCE | ConditionFlags::FIRST_USE_EVER | ConditionFlags::APPEARING,
            size_allowable: ConditionFlags::ALWAYS | ConditionFlags::ONCE | ConditionFlags::FIRST_USE_EVER | ConditionFlags::APPEARING,
            collapse_allowable: ConditionFlags::ALWAYS | ConditionFlags::ONCE | ConditionFlags::FIRST_USE_EVER | ConditionFlags::APPEARING,
            temp: TempWindowData::default(),
            row_stack: Vec::new(),
            row_template_entries: Vec::new(),
            temp_layout_index_sort: Vec::new(),
            temp_layout_sort: Vec::new(),
        }
    }

    /// Resets per-frame scratch data.
    pub fn reset_temp(&mut self) {
        self.temp = TempWindowData::default();
        self.child_windows.clear();
        self.row_stack.clear();
        self.row_template_entries.clear();
        self.temp_layout_index_sort.clear();
        self.temp_layout_sort.clear();
    }

    pub fn clamp_size(&mut self) {
        self.size.x = self.size.x.clamp(self.min_size.x, self.max_size.x);
        self.size.y = self.size.y.clamp(self.min_size.y, self.max_size.y);
    }

    pub fn clamp_scroll(&mut self) {
        self.scroll.x = self.scroll.x.clamp(0.0, self.scroll_max.x);
        self.scroll.y = self.scroll.y.clamp(0.0, self.scroll_max.y);
    }
}

/// Parameters cached by `set_next_window_*`, consumed by the next
/// `begin_window`.
#[derive(Default)]
pub(crate) struct NextWindowData {
    pub pos: Option<(Vec2f, ConditionFlags)>,
    pub size: Option<(Vec2f, ConditionFlags)>,
    pub collapsed: Option<(bool, ConditionFlags)>,
}

impl NextWindowData {
    pub fn reset(&mut self) {
        self.pos = None;
        self.size = None;
        self.collapsed = None;
    }
}
