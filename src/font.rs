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
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};
use rs_math3d::Vec2f;
use thiserror::Error;

use crate::draw::TextureId;

/// Hard ceiling on the atlas texture height.
const MAX_ATLAS_HEIGHT: i32 = 32 * 1024;

// Fixed-width shelf packer for the atlas build. Glyphs baked at one size are
// near-uniform in height, so rows waste little; a rect lands on the first
// shelf of compatible height with room left, or opens a new shelf below.
struct ShelfPacker {
    width: i32,
    max_height: i32,
    next_y: i32,
    shelves: Vec<Shelf>,
}

struct Shelf {
    y: i32,
    height: i32,
    cursor_x: i32,
}

impl ShelfPacker {
    fn new(width: i32, max_height: i32) -> Self {
        Self {
            width: width.max(0),
            max_height: max_height.max(0),
            next_y: 0,
            shelves: Vec::new(),
        }
    }

    // a rect may reuse a shelf when it fills at least half its height,
    // keeping small glyphs from burning a tall row
    fn shelf_fits(shelf: &Shelf, width: i32, height: i32, atlas_width: i32) -> bool {
        height <= shelf.height && height * 2 >= shelf.height && shelf.cursor_x + width <= atlas_width
    }

    /// Packs a rectangle, returning its position. `None` when it cannot fit
    /// under the height ceiling; smaller rectangles may still fit afterwards.
    fn pack(&mut self, width: i32, height: i32) -> Option<(i32, i32)> {
        if width <= 0 || height <= 0 || width > self.width {
            return None;
        }

        for shelf in self.shelves.iter_mut() {
            if Self::shelf_fits(shelf, width, height, self.width) {
                let pos = (shelf.cursor_x, shelf.y);
                shelf.cursor_x += width;
                return Some(pos);
            }
        }

        // open a new shelf below the last one
        if self.next_y + height > self.max_height {
            return None;
        }
        let y = self.next_y;
        self.next_y += height;
        self.shelves.push(Shelf { y, height, cursor_x: width });
        Some((0, y))
    }
}

/// Side length of the reserved white rectangle used by untextured primitives.
const WHITE_RECT_SIZE: usize = 8;

/// Errors produced while baking the font atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The packed glyphs exceed the maximum atlas height.
    #[error("font atlas exceeds the maximum texture height")]
    Overflow,
    /// The TTF data could not be parsed.
    #[error("bad font data: {0}")]
    BadFont(String),
}

/// Handle referencing a font stored in the atlas.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct FontId(pub(crate) usize);

/// Contiguous range of codepoints baked for a font.
#[derive(Copy, Clone, Debug)]
pub struct FontRange {
    /// First codepoint of the range.
    pub first_codepoint: u32,
    /// Number of codepoints in the range.
    pub char_count: u32,
}

impl FontRange {
    /// Creates a range covering `char_count` codepoints from `first_codepoint`.
    pub fn new(first_codepoint: u32, char_count: u32) -> Self { Self { first_codepoint, char_count } }

    /// Printable ASCII.
    pub fn latin() -> Self { Self::new(0x20, 0x5F) }
}

/// Configuration for baking one font into the atlas.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Pixel size glyphs are rasterized at.
    pub font_size: f32,
    /// Codepoint ranges to bake.
    pub ranges: Vec<FontRange>,
    /// Bake glyphs as signed-distance fields instead of coverage bitmaps.
    pub sdf: bool,
    /// SDF value placed exactly on the glyph edge.
    pub on_edge_value: u8,
    /// SDF padding in pixels around each glyph.
    pub sdf_padding: u32,
    /// Horizontal oversampling factor for bitmap glyphs.
    pub h_oversample: u32,
    /// Vertical oversampling factor for bitmap glyphs.
    pub v_oversample: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_size: 13.0,
            ranges: vec![FontRange::latin()],
            sdf: false,
            on_edge_value: 180,
            sdf_padding: 4,
            h_oversample: 1,
            v_oversample: 1,
        }
    }
}

/// Metrics and atlas coordinates for one baked glyph, in pixels relative to
/// the top of the line.
#[derive(Default, Copy, Clone, Debug)]
pub struct FontGlyph {
    /// Left edge of the quad.
    pub x0: f32,
    /// Top edge of the quad.
    pub y0: f32,
    /// Right edge of the quad.
    pub x1: f32,
    /// Bottom edge of the quad.
    pub y1: f32,
    /// Left atlas texture coordinate.
    pub u0: f32,
    /// Top atlas texture coordinate.
    pub v0: f32,
    /// Right atlas texture coordinate.
    pub u1: f32,
    /// Bottom atlas texture coordinate.
    pub v1: f32,
    /// Horizontal pen advance after this glyph.
    pub x_advance: f32,
    /// Left side bearing, added to the pen on a line's first glyph.
    pub left_bearing: f32,
}

/// A font baked into the atlas: config, glyph table and vertical metrics.
pub struct Font {
    /// Configuration the font was baked with.
    pub config: FontConfig,
    /// Distance from the top of the line to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line (negative).
    pub descent: f32,
    /// Distance between two baselines.
    pub line_spacing: f32,
    glyphs: Vec<FontGlyph>,
    codepoints: HashMap<u32, u32>,
}

impl Font {
    /// Returns the glyph for `codepoint`, if it was baked.
    pub fn glyph(&self, codepoint: u32) -> Option<&FontGlyph> {
        self.codepoints.get(&codepoint).map(|i| &self.glyphs[*i as usize])
    }

    /// Returns the glyph for `codepoint`, falling back to the replacement
    /// glyph and finally to any baked glyph.
    pub fn glyph_or_fallback(&self, codepoint: u32) -> Option<&FontGlyph> {
        self.glyph(codepoint)
            .or_else(|| self.glyph(0xFFFD))
            .or_else(|| self.glyph('_' as u32))
            .or_else(|| self.glyphs.first())
    }

    /// Number of baked glyphs.
    pub fn glyph_count(&self) -> usize { self.glyphs.len() }
}

// raster output kept between add_font and build
struct RasterGlyph {
    codepoint: u32,
    width: usize,
    height: usize,
    xmin: f32,
    ymin: f32,
    advance: f32,
    left_bearing: f32,
    oversample: u32,
    bitmap: Vec<u8>,
    packed_x: i32,
    packed_y: i32,
}

struct FontPrep {
    glyphs: Vec<RasterGlyph>,
}

/// A rectangle of caller-supplied grayscale pixels blitted into the atlas.
pub struct CustomRect {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Horizontal position inside the atlas, valid after `build`.
    pub x: usize,
    /// Vertical position inside the atlas, valid after `build`.
    pub y: usize,
    bytes: Vec<u8>,
}

/// Packed 2D atlas of fonts and custom rectangles, kept as both a grayscale
/// and an RGBA image. One 8×8 white rectangle is always reserved; its center
/// uv is the sentinel used by all untextured draws.
pub struct FontAtlas {
    fonts: Vec<Font>,
    prep: Vec<FontPrep>,
    custom_rects: Vec<CustomRect>,
    white_rect: usize,
    width: i32,
    height: i32,
    pixels_alpha8: Vec<u8>,
    pixels_rgba32: Vec<u8>,
    white_uv: Vec2f,
    texture: TextureId,
    glyph_padding: i32,
    built: bool,
}

impl Default for FontAtlas {
    fn default() -> Self { Self::new() }
}

impl FontAtlas {
    /// Creates an empty atlas. Index 0 of the custom rectangles is always the
    /// reserved white rect used by untextured primitives.
    pub fn new() -> Self {
        let white = CustomRect {
            width: WHITE_RECT_SIZE,
            height: WHITE_RECT_SIZE,
            x: 0,
            y: 0,
            bytes: vec![255u8; WHITE_RECT_SIZE * WHITE_RECT_SIZE],
        };
        Self {
            fonts: Vec::new(),
            prep: Vec::new(),
            custom_rects: vec![white],
            white_rect: 0,
            width: 0,
            height: 0,
            pixels_alpha8: Vec::new(),
            pixels_rgba32: Vec::new(),
            white_uv: Vec2f::new(0.0, 0.0),
            texture: TextureId::default(),
            glyph_padding: 1,
            built: false,
        }
    }

    /// Parses TTF bytes and rasterizes the configured ranges. The glyphs only
    /// land in the texture once [`FontAtlas::build`] runs.
    pub fn add_font_from_memory(&mut self, config: FontConfig, data: &[u8]) -> Result<FontId, AtlasError> {
        let settings = fontdue::FontSettings { scale: config.font_size, ..Default::default() };
        let font = fontdue::Font::from_bytes(data, settings).map_err(|e| AtlasError::BadFont(e.to_string()))?;

        let line = font.horizontal_line_metrics(config.font_size);
        let (ascent, descent, line_spacing) = match line {
            Some(m) => (m.ascent.floor(), m.descent.floor(), m.new_line_size),
            None => (config.font_size, 0.0, config.font_size),
        };

        let oversample = if config.sdf { 1 } else { config.h_oversample.max(config.v_oversample).max(1) };
        let raster_size = config.font_size * oversample as f32;

        let mut prep = FontPrep { glyphs: Vec::new() };
        for range in &config.ranges {
            for i in 0..range.char_count {
                let codepoint = range.first_codepoint + i;
                let ch = match char::from_u32(codepoint) {
                    Some(ch) => ch,
                    None => continue,
                };
                let raster = if config.sdf {
                    Self::rasterize_sdf(&font, ch, &config)
                } else {
                    let (metrics, bitmap) = font.rasterize(ch, raster_size);
                    RasterGlyph {
                        codepoint,
                        width: metrics.width,
                        height: metrics.height,
                        xmin: metrics.xmin as f32 / oversample as f32,
                        ymin: metrics.ymin as f32 / oversample as f32,
                        advance: metrics.advance_width / oversample as f32,
                        left_bearing: metrics.xmin as f32 / oversample as f32,
                        oversample,
                        bitmap,
                        packed_x: 0,
                        packed_y: 0,
                    }
                };
                prep.glyphs.push(raster);
            }
        }

        let id = FontId(self.fonts.len());
        self.fonts.push(Font {
            config,
            ascent,
            descent,
            line_spacing,
            glyphs: Vec::new(),
            codepoints: HashMap::new(),
        });
        self.prep.push(prep);
        self.built = false;
        Ok(id)
    }

    /// Adds a built-in fallback font: procedurally generated box glyphs with
    /// fixed metrics. Keeps text layout and rendering functional when no TTF
    /// is shipped (headless hosts, tests).
    pub fn add_default_font(&mut self, font_size: f32) -> FontId {
        let config = FontConfig { font_size, ..Default::default() };
        let (ascent, descent) = (font_size * 0.8, -(font_size * 0.2));
        let line_spacing = font_size * 1.2;

        let glyph_w = (font_size * 0.5).max(2.0) as usize;
        let glyph_h = (font_size * 0.7).max(2.0) as usize;
        let mut prep = FontPrep { glyphs: Vec::new() };
        for range in &config.ranges {
            for i in 0..range.char_count {
                let codepoint = range.first_codepoint + i;
                let blank = codepoint == ' ' as u32;
                let (w, h) = if blank { (0, 0) } else { (glyph_w, glyph_h) };
                let mut bitmap = vec![0u8; w * h];
                // hollow box so glyphs stay distinguishable from solid fills
                for y in 0..h {
                    for x in 0..w {
                        if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                            bitmap[y * w + x] = 255;
                        }
                    }
                }
                prep.glyphs.push(RasterGlyph {
                    codepoint,
                    width: w,
                    height: h,
                    xmin: 0.0,
                    ymin: 0.0,
                    advance: glyph_w as f32 + 1.0,
                    left_bearing: 0.0,
                    oversample: 1,
                    bitmap,
                    packed_x: 0,
                    packed_y: 0,
                });
            }
        }

        let id = FontId(self.fonts.len());
        self.fonts.push(Font {
            config,
            ascent,
            descent,
            line_spacing,
            glyphs: Vec::new(),
            codepoints: HashMap::new(),
        });
        self.prep.push(prep);
        self.built = false;
        id
    }

    fn rasterize_sdf(font: &fontdue::Font, ch: char, config: &FontConfig) -> RasterGlyph {
        let (metrics, coverage) = font.rasterize(ch, config.font_size);
        let pad = config.sdf_padding as usize;
        let dist_scale = config.on_edge_value as f32 / config.sdf_padding.max(1) as f32;
        let (bitmap, width, height) =
            distance_field(&coverage, metrics.width, metrics.height, pad, config.on_edge_value, dist_scale);
        RasterGlyph {
            codepoint: ch as u32,
            width,
            height,
            xmin: metrics.xmin as f32 - pad as f32,
            ymin: metrics.ymin as f32 - pad as f32,
            advance: metrics.advance_width,
            left_bearing: metrics.xmin as f32,
            oversample: 1,
            bitmap,
            packed_x: 0,
            packed_y: 0,
        }
    }

    /// Reserves a caller-filled grayscale rectangle; position is assigned by
    /// [`FontAtlas::build`]. Returns the rect index.
    pub fn add_custom_rect(&mut self, width: usize, height: usize, bytes: Vec<u8>) -> usize {
        debug_assert_eq!(bytes.len(), width * height);
        self.custom_rects.push(CustomRect { width, height, x: 0, y: 0, bytes });
        self.built = false;
        self.custom_rects.len() - 1
    }

    /// Packs and rasterizes everything added so far into the atlas image.
    pub fn build(&mut self) -> Result<(), AtlasError> {
        // total area drives the width heuristic
        let mut total_area: i64 = 0;
        for prep in &self.prep {
            for g in &prep.glyphs {
                total_area += (g.width + self.glyph_padding as usize) as i64 * (g.height + self.glyph_padding as usize) as i64;
            }
        }
        for r in &self.custom_rects {
            total_area += (r.width * r.height) as i64;
        }

        let area_sqrt = (total_area as f32).sqrt() + 1.0;
        self.width = if area_sqrt >= 4096.0 * 0.7 {
            4096
        } else if area_sqrt >= 2048.0 * 0.7 {
            2048
        } else if area_sqrt >= 1024.0 * 0.7 {
            1024
        } else {
            512
        };

        let mut packer = ShelfPacker::new(self.width, MAX_ATLAS_HEIGHT);
        let pad = self.glyph_padding;
        let mut max_bottom = 0;

        for prep in &mut self.prep {
            for g in &mut prep.glyphs {
                if g.width == 0 || g.height == 0 {
                    continue;
                }
                let (x, y) = packer.pack(g.width as i32 + pad, g.height as i32 + pad).ok_or(AtlasError::Overflow)?;
                g.packed_x = x;
                g.packed_y = y;
                max_bottom = max_bottom.max(y + g.height as i32 + pad);
            }
        }
        for r in &mut self.custom_rects {
            let (x, y) = packer.pack(r.width as i32 + pad, r.height as i32 + pad).ok_or(AtlasError::Overflow)?;
            r.x = x as usize;
            r.y = y as usize;
            max_bottom = max_bottom.max(y + r.height as i32 + pad);
        }

        self.height = max_bottom;
        if self.height > MAX_ATLAS_HEIGHT {
            return Err(AtlasError::Overflow);
        }

        // blit everything into the grayscale image
        let (w, h) = (self.width as usize, self.height as usize);
        self.pixels_alpha8 = vec![0u8; w * h];
        for prep in &self.prep {
            for g in &prep.glyphs {
                blit(&mut self.pixels_alpha8, w, g.packed_x as usize, g.packed_y as usize, &g.bitmap, g.width, g.height);
            }
        }
        for r in &self.custom_rects {
            blit(&mut self.pixels_alpha8, w, r.x, r.y, &r.bytes, r.width, r.height);
        }

        // resolve glyph records
        let (aw, ah) = (self.width as f32, self.height as f32);
        for (font, prep) in self.fonts.iter_mut().zip(self.prep.iter()) {
            font.glyphs.clear();
            font.codepoints.clear();
            let ascent = font.ascent;
            for g in &prep.glyphs {
                let os = g.oversample as f32;
                let gw = g.width as f32 / os;
                let gh = g.height as f32 / os;
                let glyph = FontGlyph {
                    x0: g.xmin,
                    y0: ascent - (g.ymin + gh),
                    x1: g.xmin + gw,
                    y1: ascent - g.ymin,
                    u0: g.packed_x as f32 / aw,
                    v0: g.packed_y as f32 / ah,
                    u1: (g.packed_x as f32 + g.width as f32) / aw,
                    v1: (g.packed_y as f32 + g.height as f32) / ah,
                    x_advance: g.advance,
                    left_bearing: g.left_bearing,
                };
                font.glyphs.push(glyph);
                font.codepoints.insert(g.codepoint, font.glyphs.len() as u32 - 1);
            }
            if font.glyphs.is_empty() {
                warn!("font baked with no glyphs");
            }
        }

        // the white rect center uv is the sentinel for untextured draws
        let wr = &self.custom_rects[self.white_rect];
        self.white_uv = Vec2f::new((wr.x + wr.width / 2) as f32 / aw, (wr.y + wr.height / 2) as f32 / ah);

        // duplicate gray into RGB with alpha = gray
        self.pixels_rgba32 = vec![0u8; w * h * 4];
        for (i, a) in self.pixels_alpha8.iter().enumerate() {
            self.pixels_rgba32[i * 4] = 255;
            self.pixels_rgba32[i * 4 + 1] = 255;
            self.pixels_rgba32[i * 4 + 2] = 255;
            self.pixels_rgba32[i * 4 + 3] = *a;
        }

        self.built = true;
        debug!("font atlas built: {}x{}, {} font(s)", self.width, self.height, self.fonts.len());
        Ok(())
    }

    /// Returns the font for `id`.
    pub fn font(&self, id: FontId) -> &Font { &self.fonts[id.0] }

    /// Atlas texture width in pixels.
    pub fn width(&self) -> i32 { self.width }

    /// Atlas texture height in pixels.
    pub fn height(&self) -> i32 { self.height }

    /// Grayscale atlas image, valid after `build`.
    pub fn pixels_alpha8(&self) -> &[u8] { &self.pixels_alpha8 }

    /// RGBA atlas image uploaded by the graphics backend, valid after `build`.
    pub fn pixels_rgba32(&self) -> &[u8] { &self.pixels_rgba32 }

    /// Center uv of the reserved white rectangle.
    pub fn white_uv(&self) -> Vec2f { self.white_uv }

    /// Custom rectangle by index, with its packed position.
    pub fn custom_rect(&self, index: usize) -> &CustomRect { &self.custom_rects[index] }

    /// Returns `true` once `build` has produced the atlas images.
    pub fn is_built(&self) -> bool { self.built }

    /// Texture the backend uploaded the atlas into.
    pub fn texture(&self) -> TextureId { self.texture }

    /// Records the texture the backend uploaded the atlas into.
    pub fn set_texture(&mut self, texture: TextureId) { self.texture = texture; }
}

/// Shared handle exposing read/write access to the atlas.
#[derive(Clone)]
pub struct FontAtlasHandle(Rc<RefCell<FontAtlas>>);

impl FontAtlasHandle {
    /// Wraps an atlas so the context and its draw lists can share it.
    pub fn new(atlas: FontAtlas) -> Self { Self(Rc::new(RefCell::new(atlas))) }

    /// Returns an immutable borrow of the atlas.
    pub fn inner(&self) -> Ref<'_, FontAtlas> { self.0.borrow() }

    /// Returns a mutable borrow of the atlas.
    pub fn inner_mut(&self) -> RefMut<'_, FontAtlas> { self.0.borrow_mut() }
}

fn blit(dst: &mut [u8], dst_width: usize, x: usize, y: usize, src: &[u8], w: usize, h: usize) {
    for row in 0..h {
        let d = (y + row) * dst_width + x;
        let s = row * w;
        dst[d..d + w].copy_from_slice(&src[s..s + w]);
    }
}

// Signed distance field from a coverage bitmap, padded by `pad` on each side.
// Two-pass 3-4 chamfer transform; positive distances inside the shape.
fn distance_field(coverage: &[u8], w: usize, h: usize, pad: usize, on_edge: u8, dist_scale: f32) -> (Vec<u8>, usize, usize) {
    let ow = w + pad * 2;
    let oh = h + pad * 2;
    if ow == pad * 2 || oh == pad * 2 {
        return (vec![0u8; ow * oh], ow, oh);
    }

    let inside = |x: usize, y: usize| -> bool {
        if x < pad || y < pad || x >= pad + w || y >= pad + h {
            return false;
        }
        coverage[(y - pad) * w + (x - pad)] >= 128
    };

    const FAR: f32 = 1.0e6;
    const ORTHO: f32 = 1.0;
    const DIAG: f32 = 1.4;

    // distance to the nearest pixel of the opposite class
    let mut dist = vec![FAR; ow * oh];
    for y in 0..oh {
        for x in 0..ow {
            let me = inside(x, y);
            let boundary = [(1i64, 0i64), (-1, 0), (0, 1), (0, -1)].iter().any(|(dx, dy)| {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= ow as i64 || ny >= oh as i64 {
                    me
                } else {
                    inside(nx as usize, ny as usize) != me
                }
            });
            if boundary {
                dist[y * ow + x] = 0.5;
            }
        }
    }

    // forward pass
    for y in 0..oh {
        for x in 0..ow {
            let mut d = dist[y * ow + x];
            if x > 0 {
                d = d.min(dist[y * ow + x - 1] + ORTHO);
            }
            if y > 0 {
                d = d.min(dist[(y - 1) * ow + x] + ORTHO);
                if x > 0 {
                    d = d.min(dist[(y - 1) * ow + x - 1] + DIAG);
                }
                if x + 1 < ow {
                    d = d.min(dist[(y - 1) * ow + x + 1] + DIAG);
                }
            }
            dist[y * ow + x] = d;
        }
    }
    // backward pass
    for y in (0..oh).rev() {
        for x in (0..ow).rev() {
            let mut d = dist[y * ow + x];
            if x + 1 < ow {
                d = d.min(dist[y * ow + x + 1] + ORTHO);
            }
            if y + 1 < oh {
                d = d.min(dist[(y + 1) * ow + x] + ORTHO);
                if x > 0 {
                    d = d.min(dist[(y + 1) * ow + x - 1] + DIAG);
                }
                if x + 1 < ow {
                    d = d.min(dist[(y + 1) * ow + x + 1] + DIAG);
                }
            }
            dist[y * ow + x] = d;
        }
    }

    let mut out = vec![0u8; ow * oh];
    for y in 0..oh {
        for x in 0..ow {
            let signed = if inside(x, y) { dist[y * ow + x] } else { -dist[y * ow + x] };
            let v = on_edge as f32 + signed * dist_scale;
            out[y * ow + x] = v.clamp(0.0, 255.0) as u8;
        }
    }
    (out, ow, oh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_ttf_is_rejected() {
        let mut atlas = FontAtlas::new();
        let err = atlas.add_font_from_memory(FontConfig::default(), &[0u8; 16]);
        assert!(matches!(err, Err(AtlasError::BadFont(_))));
    }

    #[test]
    fn build_without_fonts_reserves_white_rect() {
        let mut atlas = FontAtlas::new();
        atlas.build().expect("build");
        assert_eq!(atlas.width(), 512);
        assert!(atlas.height() > 0);
        let uv = atlas.white_uv();
        assert!(uv.x > 0.0 && uv.x < 1.0);
        assert!(uv.y > 0.0 && uv.y < 1.0);
        // the sentinel pixel is solid white
        let px = ((uv.y * atlas.height() as f32) as usize) * atlas.width() as usize + (uv.x * atlas.width() as f32) as usize;
        assert_eq!(atlas.pixels_alpha8()[px], 255);
        assert_eq!(atlas.pixels_rgba32()[px * 4 + 3], 255);
    }

    #[test]
    fn custom_rects_land_inside_the_atlas() {
        let mut atlas = FontAtlas::new();
        let a = atlas.add_custom_rect(16, 16, vec![17u8; 256]);
        let b = atlas.add_custom_rect(32, 8, vec![34u8; 256]);
        atlas.build().expect("build");
        let (ra, rb) = (atlas.custom_rect(a), atlas.custom_rect(b));
        assert!(ra.x + ra.width <= atlas.width() as usize);
        assert!(rb.y + rb.height <= atlas.height() as usize);
        assert_eq!(atlas.pixels_alpha8()[ra.y * atlas.width() as usize + ra.x], 17);
        assert_eq!(atlas.pixels_alpha8()[rb.y * atlas.width() as usize + rb.x], 34);
    }

    #[test]
    fn shelf_packer_places_without_overlap() {
        let mut packer = ShelfPacker::new(64, 64);
        let mut rects = Vec::new();
        // two glyph heights, interleaved like a two-font bake
        for i in 0..12 {
            let (w, h) = if i % 2 == 0 { (14, 16) } else { (10, 9) };
            let (x, y) = packer.pack(w, h).expect("fits");
            rects.push((x, y, w, h));
        }
        for (i, a) in rects.iter().enumerate() {
            assert!(a.0 + a.2 <= 64 && a.1 + a.3 <= 64);
            for b in rects.iter().skip(i + 1) {
                let disjoint = a.0 + a.2 <= b.0 || b.0 + b.2 <= a.0 || a.1 + a.3 <= b.1 || b.1 + b.3 <= a.1;
                assert!(disjoint, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn shelf_packer_shares_rows_of_similar_height() {
        let mut packer = ShelfPacker::new(100, 1000);
        let (_, y0) = packer.pack(30, 10).unwrap();
        let (_, y1) = packer.pack(30, 9).unwrap();
        assert_eq!(y0, y1); // same shelf
        let (_, y2) = packer.pack(30, 4).unwrap();
        assert_ne!(y0, y2); // too short to share the 10px shelf
    }

    #[test]
    fn shelf_packer_rejects_past_the_ceiling() {
        let mut packer = ShelfPacker::new(32, 32);
        assert!(packer.pack(40, 8).is_none());
        assert!(packer.pack(32, 32).is_some());
        assert!(packer.pack(1, 1).is_none());
    }

    #[test]
    fn distance_field_is_signed_across_the_edge() {
        // 4x4 solid square
        let cov = vec![255u8; 16];
        let (sdf, w, h) = distance_field(&cov, 4, 4, 3, 128, 128.0 / 3.0);
        assert_eq!((w, h), (10, 10));
        // center is far inside -> above on_edge; corner is far outside -> below
        assert!(sdf[5 * w + 5] > 128);
        assert!(sdf[0] < 128);
    }
}
