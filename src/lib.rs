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
#![deny(missing_docs)]
//! `emberui` is an immediate-mode GUI toolkit. The application re-declares its
//! entire UI every frame; the toolkit persists only the state needed to stitch
//! frames together (widget ids, scroll offsets, collapse bits, text-edit
//! state) and emits layered 2D geometry that a graphics backend consumes as
//! plain vertex/index/command buffers.
//!
//! The crate also carries the small support pieces an engine scaffold needs:
//! a best-fit freelist allocator for GPU resource managers, API/data
//! registries, and the app-module contract used across a hot-reload boundary.

mod app;
mod clipper;
mod context;
mod draw;
mod font;
mod freelist;
mod geometry;
mod io;
mod layout;
mod registry;
mod storage;
mod text_edit;
mod widgets;
mod window;

pub use app::*;
pub use clipper::Clipper;
pub use context::Context;
pub use draw::*;
pub use font::*;
pub use freelist::*;
pub use geometry::*;
pub use io::*;
pub use layout::LayoutRowType;
pub use registry::*;
// selective: rs_math3d also ships a generic `Rect`, ours is the min/max one
pub use rs_math3d::{color4b, Color4b, Vec2f, Vec3f, Vec4f};
pub use storage::*;
pub use text_edit::InputTextFlags;
pub use window::{ConditionFlags, WindowFlags};

use bitflags::*;

#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
/// Stable 32-bit widget identifier produced by seeded FNV-1a hashing.
pub struct Id(u32);

const FNV_OFFSET_BASIS: u32 = 2166136261;
const FNV_PRIME: u32 = 16777619;

impl Id {
    /// Id value meaning "no widget".
    pub const NONE: Id = Id(0);

    /// Creates an id from a raw numeric value.
    pub fn from_raw(value: u32) -> Self { Self(value) }

    /// Hashes a string label with the given seed (usually the top of the id stack).
    pub fn from_str(label: &str, seed: Id) -> Self {
        let mut hash = if seed.0 == 0 { FNV_OFFSET_BASIS } else { seed.0 };
        for byte in label.as_bytes() {
            hash = (hash ^ *byte as u32).wrapping_mul(FNV_PRIME);
        }
        Self(hash)
    }

    /// Returns the raw numeric value wrapped by this id.
    pub fn raw(self) -> u32 { self.0 }

    /// Returns `true` if this id refers to no widget.
    pub fn is_none(self) -> bool { self.0 == 0 }

    /// Derives a sibling id by offsetting the raw hash. Window borders and
    /// scrollbars use this for their implicit ids.
    pub(crate) fn offset(self, n: u32) -> Self { Self(self.0.wrapping_add(n)) }
}

/// Returns the visible portion of a label, trimming everything from the first
/// `##` onward (the suffix only disambiguates the hash).
pub fn find_rendered_text_end(label: &str) -> &str {
    match label.find("##") {
        Some(pos) => &label[..pos],
        None => label,
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Mouse buttons tracked by the input state.
    pub struct MouseButton : u32 {
        /// Left mouse button.
        const LEFT = 1;
        /// Right mouse button.
        const RIGHT = 2;
        /// Middle mouse button.
        const MIDDLE = 4;
        /// No buttons.
        const NONE = 0;
    }

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Modifier key state.
    pub struct KeyMods : u32 {
        /// Control.
        const CTRL = 1;
        /// Shift.
        const SHIFT = 2;
        /// Alt.
        const ALT = 4;
        /// Super / OS key.
        const SUPER = 8;
        /// No modifiers.
        const NONE = 0;
    }
}

/// Visual constants shared by every widget.
#[derive(Clone)]
pub struct Style {
    /// Vertical padding applied above and below the title text.
    pub title_padding: f32,
    /// Font pixel size used for all text.
    pub font_size: f32,
    /// Horizontal indent applied per tree level.
    pub indent_size: f32,
    /// Horizontal window content padding.
    pub window_horizontal_padding: f32,
    /// Vertical window content padding.
    pub window_vertical_padding: f32,
    /// Thickness of scrollbars.
    pub scrollbar_size: f32,
    /// Width of slider grabs.
    pub slider_size: f32,
    /// Spacing between layout cells.
    pub item_spacing: Vec2f,
    /// Spacing between the parts of a compound widget.
    pub inner_spacing: Vec2f,
    /// Padding between a frame edge and its content.
    pub frame_padding: Vec2f,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            title_padding: 10.0,
            font_size: 13.0,
            indent_size: 15.0,
            window_horizontal_padding: 5.0,
            window_vertical_padding: 5.0,
            scrollbar_size: 10.0,
            slider_size: 12.0,
            item_spacing: Vec2f::new(8.0, 4.0),
            inner_spacing: Vec2f::new(4.0, 4.0),
            frame_padding: Vec2f::new(4.0, 4.0),
        }
    }
}

/// Color palette shared by every widget, RGBA in the 0..1 range.
#[derive(Clone)]
pub struct ColorScheme {
    /// Title bar of the active window.
    pub title_active: Vec4f,
    /// Title bar of inactive windows.
    pub title_bg: Vec4f,
    /// Title bar of collapsed windows.
    pub title_bg_collapsed: Vec4f,
    /// Window background.
    pub window_bg: Vec4f,
    /// Window border.
    pub window_border: Vec4f,
    /// Child window background.
    pub child_bg: Vec4f,
    /// Button at rest.
    pub button: Vec4f,
    /// Button under the cursor.
    pub button_hovered: Vec4f,
    /// Button held down.
    pub button_active: Vec4f,
    /// Default text.
    pub text: Vec4f,
    /// Progress bar fill.
    pub progress_bar: Vec4f,
    /// Checkmarks and radio dots.
    pub checkmark: Vec4f,
    /// Widget frame background.
    pub frame_bg: Vec4f,
    /// Widget frame background under the cursor.
    pub frame_bg_hovered: Vec4f,
    /// Widget frame background while active.
    pub frame_bg_active: Vec4f,
    /// Headers and selectables.
    pub header: Vec4f,
    /// Headers under the cursor.
    pub header_hovered: Vec4f,
    /// Headers while active.
    pub header_active: Vec4f,
    /// Scrollbar track.
    pub scrollbar_bg: Vec4f,
    /// Scrollbar handle at rest.
    pub scrollbar_handle: Vec4f,
    /// Scrollbar handle under the cursor.
    pub scrollbar_hovered: Vec4f,
    /// Scrollbar handle while dragged.
    pub scrollbar_active: Vec4f,
}

impl ColorScheme {
    /// The built-in dark theme.
    pub fn dark() -> Self {
        Self {
            title_active: Vec4f::new(0.33, 0.02, 0.10, 1.00),
            title_bg: Vec4f::new(0.04, 0.04, 0.04, 1.00),
            title_bg_collapsed: Vec4f::new(0.04, 0.04, 0.04, 1.00),
            window_bg: Vec4f::new(0.10, 0.10, 0.10, 0.78),
            window_border: Vec4f::new(0.33, 0.02, 0.10, 1.00),
            child_bg: Vec4f::new(0.10, 0.10, 0.10, 0.78),
            button: Vec4f::new(0.51, 0.02, 0.10, 1.00),
            button_hovered: Vec4f::new(0.61, 0.02, 0.10, 1.00),
            button_active: Vec4f::new(0.87, 0.02, 0.10, 1.00),
            text: Vec4f::new(1.00, 1.00, 1.00, 1.00),
            progress_bar: Vec4f::new(0.90, 0.70, 0.00, 1.00),
            checkmark: Vec4f::new(0.87, 0.02, 0.10, 1.00),
            frame_bg: Vec4f::new(0.23, 0.02, 0.10, 1.00),
            frame_bg_hovered: Vec4f::new(0.26, 0.59, 0.98, 0.40),
            frame_bg_active: Vec4f::new(0.26, 0.59, 0.98, 0.67),
            header: Vec4f::new(0.51, 0.02, 0.10, 1.00),
            header_hovered: Vec4f::new(0.26, 0.59, 0.98, 0.80),
            header_active: Vec4f::new(0.26, 0.59, 0.98, 1.00),
            scrollbar_bg: Vec4f::new(0.05, 0.05, 0.05, 0.85),
            scrollbar_handle: Vec4f::new(0.51, 0.02, 0.10, 1.00),
            scrollbar_hovered: Vec4f::new(0.61, 0.02, 0.10, 1.00),
            scrollbar_active: Vec4f::new(0.87, 0.02, 0.10, 1.00),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self { Self::dark() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_hash_is_seeded() {
        let root = Id::from_str("window", Id::NONE);
        let a = Id::from_str("button", root);
        let b = Id::from_str("button", Id::from_str("other", Id::NONE));
        assert_ne!(a, b);
        assert_eq!(a, Id::from_str("button", root));
    }

    #[test]
    fn label_suffix_is_trimmed() {
        assert_eq!(find_rendered_text_end("Save##toolbar"), "Save");
        assert_eq!(find_rendered_text_end("Save"), "Save");
        assert_ne!(Id::from_str("Save##toolbar", Id::NONE), Id::from_str("Save", Id::NONE));
    }
}
