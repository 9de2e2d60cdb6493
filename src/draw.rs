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

use crate::font::{FontAtlasHandle, FontId};
use crate::geometry::Rect;

/// Handle referencing a backend-owned texture.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Handle referencing a layer owned by a [`DrawList`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayerId(pub(crate) u32);

/// Packed vertex consumed by the graphics backend.
#[repr(C)]
#[derive(Default, Copy, Clone, Debug)]
pub struct DrawVertex {
    /// Screen position in pixels.
    pub pos: [f32; 2],
    /// Atlas/texture coordinates.
    pub uv: [f32; 2],
    /// Packed RGBA color, one byte per channel.
    pub color: u32,
}

/// Packs an RGBA color in the 0..1 range into the vertex byte format.
pub fn pack_color(c: Vec4f) -> u32 {
    let r = (c.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (c.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (c.z.clamp(0.0, 1.0) * 255.0) as u32;
    let a = (c.w.clamp(0.0, 1.0) * 255.0) as u32;
    r | (g << 8) | (b << 16) | (a << 24)
}

/// One range of indices sharing a texture, clip rectangle and shader path.
#[derive(Copy, Clone, Debug)]
pub struct DrawCommand {
    /// First vertex in the draw list's vertex buffer.
    pub vertex_offset: u32,
    /// First index in the owning layer's index buffer.
    pub index_offset: u32,
    /// Number of indices covered by the command.
    pub element_count: u32,
    /// Texture sampled by the command.
    pub texture: TextureId,
    /// Scissor rectangle in effect when the command was opened.
    pub clip_rect: Rect,
    /// The command's glyphs were baked as signed-distance fields.
    pub sdf: bool,
}

/// Write-only geometry channel inside a draw list. Vertices land in the owning
/// list's shared vertex buffer; indices and commands stay per layer.
pub struct DrawLayer {
    name: String,
    commands: Vec<DrawCommand>,
    indices: Vec<u32>,
    path: Vec<Vec2f>,
    vertex_count: u32,
    last_command: Option<usize>,
}

impl DrawLayer {
    fn new() -> Self {
        Self {
            name: String::new(),
            commands: Vec::new(),
            indices: Vec::new(),
            path: Vec::new(),
            vertex_count: 0,
            last_command: None,
        }
    }

    fn reset(&mut self) {
        self.name.clear();
        self.commands.clear();
        self.indices.clear();
        self.path.clear();
        self.vertex_count = 0;
        self.last_command = None;
    }

    /// Commands recorded into the layer this frame.
    pub fn commands(&self) -> &[DrawCommand] { &self.commands }

    /// Index buffer recorded into the layer this frame.
    pub fn indices(&self) -> &[u32] { &self.indices }

    /// Name the layer was requested with.
    pub fn name(&self) -> &str { &self.name }

    /// Number of vertices the layer wrote into the shared vertex buffer.
    pub fn vertex_count(&self) -> u32 { self.vertex_count }
}

/// Layered 2D geometry buffer. Layers are requested per frame (reused from a
/// free pool), written by widgets, submitted in application order, and handed
/// to the graphics backend as `(vertex buffer, per-layer index buffer,
/// per-command state)` triples.
pub struct DrawList {
    vertices: Vec<DrawVertex>,
    layers: Vec<DrawLayer>,
    layer_pool: Vec<LayerId>,
    submitted: Vec<LayerId>,
    clip_stack: Vec<Rect>,
    index_buffer_byte_size: usize,
    atlas: FontAtlasHandle,
}

impl DrawList {
    /// Creates a draw list sharing the given font atlas.
    pub fn new(atlas: FontAtlasHandle) -> Self {
        Self {
            vertices: Vec::new(),
            layers: Vec::new(),
            layer_pool: Vec::new(),
            submitted: Vec::new(),
            clip_stack: Vec::new(),
            index_buffer_byte_size: 0,
            atlas,
        }
    }

    /// Hands out a layer, reusing one from the free pool when available.
    pub fn request_layer(&mut self, name: &str) -> LayerId {
        let id = match self.layer_pool.pop() {
            Some(id) => id,
            None => {
                self.layers.push(DrawLayer::new());
                LayerId(self.layers.len() as u32 - 1)
            }
        };
        let layer = &mut self.layers[id.0 as usize];
        layer.name.clear();
        layer.name.push_str(name);
        id
    }

    /// Returns an unsubmitted layer to the free pool.
    pub fn return_layer(&mut self, id: LayerId) {
        self.layers[id.0 as usize].reset();
        self.layer_pool.push(id);
    }

    /// Queues a layer for rendering. Submission order is front-to-back.
    pub fn submit_layer(&mut self, id: LayerId) {
        self.index_buffer_byte_size += self.layers[id.0 as usize].indices.len() * std::mem::size_of::<u32>();
        self.submitted.push(id);
    }

    /// Clears submitted layers back into the free pool and resets the shared
    /// vertex buffer for a new frame.
    pub fn new_frame(&mut self) {
        assert!(self.clip_stack.is_empty(), "unbalanced clip rect stack");
        self.vertices.clear();
        self.index_buffer_byte_size = 0;
        let submitted = std::mem::take(&mut self.submitted);
        for id in submitted {
            self.layers[id.0 as usize].reset();
            self.layer_pool.push(id);
        }
    }

    /// Shared vertex buffer for the frame.
    pub fn vertices(&self) -> &[DrawVertex] { &self.vertices }

    /// Layers in submission order.
    pub fn submitted_layers(&self) -> &[LayerId] { &self.submitted }

    /// Borrows a layer.
    pub fn layer(&self, id: LayerId) -> &DrawLayer { &self.layers[id.0 as usize] }

    /// Total byte size of all submitted index buffers.
    pub fn index_buffer_byte_size(&self) -> usize { self.index_buffer_byte_size }

    /// Atlas shared with this draw list.
    pub fn atlas(&self) -> FontAtlasHandle { self.atlas.clone() }

    /// Pushes a clip rectangle, optionally intersecting it with the current one.
    pub fn push_clip_rect(&mut self, rect: Rect, intersect_with_current: bool) {
        let rect = if intersect_with_current { rect.clip(&self.current_clip_rect()) } else { rect };
        self.clip_stack.push(rect);
    }

    /// Pops the top clip rectangle. Popping an empty stack is a programming error.
    pub fn pop_clip_rect(&mut self) {
        assert!(!self.clip_stack.is_empty(), "unbalanced clip rect stack");
        self.clip_stack.pop();
    }

    /// Returns the active clip rectangle.
    pub fn current_clip_rect(&self) -> Rect { self.clip_stack.last().copied().unwrap_or(Rect::UNCLIPPED) }

    /// Depth of the clip stack.
    pub fn clip_stack_len(&self) -> usize { self.clip_stack.len() }

    // ------------------------------------------------------------------
    // primitives
    // ------------------------------------------------------------------

    fn prepare_command(&mut self, layer: LayerId, texture: TextureId, sdf: bool) {
        let clip = self.current_clip_rect();
        let vertex_offset = self.vertices.len() as u32;
        let layer = &mut self.layers[layer.0 as usize];

        if let Some(last) = layer.last_command {
            let cmd = &layer.commands[last];
            if cmd.texture == texture && cmd.sdf == sdf && cmd.clip_rect == clip {
                return;
            }
        }

        layer.commands.push(DrawCommand {
            vertex_offset,
            index_offset: layer.indices.len() as u32,
            element_count: 0,
            texture,
            clip_rect: clip,
            sdf,
        });
        layer.last_command = Some(layer.commands.len() - 1);
    }

    fn grow_command(&mut self, layer: LayerId, index_count: u32, vertex_count: u32) {
        let layer = &mut self.layers[layer.0 as usize];
        let last = layer.last_command.expect("grow without an open command");
        layer.commands[last].element_count += index_count;
        layer.vertex_count += vertex_count;
    }

    fn add_vertex(&mut self, pos: Vec2f, color: u32, uv: Vec2f) {
        self.vertices.push(DrawVertex { pos: [pos.x, pos.y], uv: [uv.x, uv.y], color });
    }

    fn add_triangle_indices(&mut self, layer: LayerId, vertex_start: u32, i0: u32, i1: u32, i2: u32) {
        let layer = &mut self.layers[layer.0 as usize];
        layer.indices.push(vertex_start + i0);
        layer.indices.push(vertex_start + i1);
        layer.indices.push(vertex_start + i2);
    }

    fn white_settings(&self) -> (TextureId, Vec2f) {
        let atlas = self.atlas.inner();
        (atlas.texture(), atlas.white_uv())
    }

    /// Adds a line segment of the given thickness.
    pub fn add_line(&mut self, layer: LayerId, p0: Vec2f, p1: Vec2f, color: Vec4f, thickness: f32) {
        // route through the layer's reusable path buffer
        let mut path = std::mem::take(&mut self.layers[layer.0 as usize].path);
        path.clear();
        path.push(p0);
        path.push(p1);
        self.add_lines(layer, &path, color, thickness);
        self.layers[layer.0 as usize].path = path;
    }

    /// Adds a polyline; each consecutive pair of points becomes a segment.
    pub fn add_lines(&mut self, layer: LayerId, points: &[Vec2f], color: Vec4f, thickness: f32) {
        if points.len() < 2 {
            return;
        }
        let (texture, white_uv) = self.white_settings();
        self.prepare_command(layer, texture, false);
        let count = points.len() - 1;
        self.grow_command(layer, 6 * count as u32, 4 * count as u32);
        let color = pack_color(color);

        for i in 0..count {
            let mut dx = points[i + 1].x - points[i].x;
            let mut dy = points[i + 1].y - points[i].y;
            let len2 = dx * dx + dy * dy;
            if len2 > 0.0 {
                let inv = 1.0 / len2.sqrt();
                dx *= inv;
                dy *= inv;
            }
            let half = thickness * 0.5;
            let normal = Vec2f::new(dy * half, -dx * half);

            let corners = [
                Vec2f::new(points[i].x - normal.x, points[i].y - normal.y),
                Vec2f::new(points[i + 1].x - normal.x, points[i + 1].y - normal.y),
                Vec2f::new(points[i + 1].x + normal.x, points[i + 1].y + normal.y),
                Vec2f::new(points[i].x + normal.x, points[i].y + normal.y),
            ];

            let vertex_start = self.vertices.len() as u32;
            for corner in corners {
                self.add_vertex(corner, color, white_uv);
            }
            self.add_triangle_indices(layer, vertex_start, 0, 1, 2);
            self.add_triangle_indices(layer, vertex_start, 0, 2, 3);
        }
    }

    /// Adds a filled triangle.
    pub fn add_triangle_filled(&mut self, layer: LayerId, p0: Vec2f, p1: Vec2f, p2: Vec2f, color: Vec4f) {
        let (texture, white_uv) = self.white_settings();
        self.prepare_command(layer, texture, false);
        self.grow_command(layer, 3, 3);
        let color = pack_color(color);

        let vertex_start = self.vertices.len() as u32;
        self.add_vertex(p0, color, white_uv);
        self.add_vertex(p1, color, white_uv);
        self.add_vertex(p2, color, white_uv);
        self.add_triangle_indices(layer, vertex_start, 0, 1, 2);
    }

    /// Adds a triangle outline.
    pub fn add_triangle(&mut self, layer: LayerId, p0: Vec2f, p1: Vec2f, p2: Vec2f, color: Vec4f, thickness: f32) {
        self.add_lines(layer, &[p0, p1, p2, p0], color, thickness);
    }

    /// Adds a filled axis-aligned rectangle.
    pub fn add_rect_filled(&mut self, layer: LayerId, min: Vec2f, max: Vec2f, color: Vec4f) {
        let (texture, white_uv) = self.white_settings();
        self.prepare_command(layer, texture, false);
        self.grow_command(layer, 6, 4);
        let color = pack_color(color);

        let bottom_left = Vec2f::new(min.x, max.y);
        let top_right = Vec2f::new(max.x, min.y);

        let vertex_start = self.vertices.len() as u32;
        self.add_vertex(min, color, white_uv);
        self.add_vertex(bottom_left, color, white_uv);
        self.add_vertex(max, color, white_uv);
        self.add_vertex(top_right, color, white_uv);
        self.add_triangle_indices(layer, vertex_start, 0, 1, 2);
        self.add_triangle_indices(layer, vertex_start, 0, 2, 3);
    }

    /// Adds a rectangle outline.
    pub fn add_rect(&mut self, layer: LayerId, min: Vec2f, max: Vec2f, color: Vec4f, thickness: f32) {
        let tr = Vec2f::new(max.x, min.y);
        let bl = Vec2f::new(min.x, max.y);
        self.add_lines(layer, &[min, tr, max, bl, min], color, thickness);
    }

    /// Adds a filled circle approximated with `segments` triangles.
    pub fn add_circle_filled(&mut self, layer: LayerId, center: Vec2f, radius: f32, color: Vec4f, segments: u32) {
        let segments = segments.max(3);
        let (texture, white_uv) = self.white_settings();
        self.prepare_command(layer, texture, false);
        self.grow_command(layer, segments * 3, segments + 1);
        let color = pack_color(color);

        let vertex_start = self.vertices.len() as u32;
        self.add_vertex(center, color, white_uv);
        for i in 0..segments {
            let theta = i as f32 * std::f32::consts::TAU / segments as f32;
            self.add_vertex(Vec2f::new(center.x + theta.cos() * radius, center.y + theta.sin() * radius), color, white_uv);
        }
        for i in 0..segments {
            let next = (i + 1) % segments;
            self.add_triangle_indices(layer, vertex_start, 0, 1 + i, 1 + next);
        }
    }

    /// Adds a circle outline approximated with `segments` lines.
    pub fn add_circle(&mut self, layer: LayerId, center: Vec2f, radius: f32, color: Vec4f, segments: u32, thickness: f32) {
        let segments = segments.max(3);
        let mut points = Vec::with_capacity(segments as usize + 1);
        for i in 0..=segments {
            let theta = i as f32 * std::f32::consts::TAU / segments as f32;
            points.push(Vec2f::new(center.x + theta.cos() * radius, center.y + theta.sin() * radius));
        }
        self.add_lines(layer, &points, color, thickness);
    }

    /// Adds a textured quad covering `min..max` with the full texture.
    pub fn add_image(&mut self, layer: LayerId, texture: TextureId, min: Vec2f, max: Vec2f, color: Vec4f) {
        self.add_image_ex(layer, texture, min, max, Vec2f::new(0.0, 0.0), Vec2f::new(1.0, 1.0), color);
    }

    /// Adds a textured quad with explicit texture coordinates.
    pub fn add_image_ex(
        &mut self,
        layer: LayerId,
        texture: TextureId,
        min: Vec2f,
        max: Vec2f,
        uv0: Vec2f,
        uv1: Vec2f,
        color: Vec4f,
    ) {
        self.prepare_command(layer, texture, false);
        self.grow_command(layer, 6, 4);
        let color = pack_color(color);

        let vertex_start = self.vertices.len() as u32;
        self.add_vertex(min, color, uv0);
        self.add_vertex(Vec2f::new(min.x, max.y), color, Vec2f::new(uv0.x, uv1.y));
        self.add_vertex(max, color, uv1);
        self.add_vertex(Vec2f::new(max.x, min.y), color, Vec2f::new(uv1.x, uv0.y));
        self.add_triangle_indices(layer, vertex_start, 0, 1, 2);
        self.add_triangle_indices(layer, vertex_start, 0, 2, 3);
    }

    /// Adds a UTF-8 string at `pos` (top of the first line). A positive `wrap`
    /// breaks lines when a glyph's right edge would pass `pos.x + wrap`.
    pub fn add_text(&mut self, layer: LayerId, font: FontId, size: f32, pos: Vec2f, color: Vec4f, text: &str, wrap: f32) {
        self.add_text_clipped(layer, font, size, pos, Rect::UNCLIPPED, color, text, wrap);
    }

    /// Adds a UTF-8 string, culling glyph quads outside `clip`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_text_clipped(
        &mut self,
        layer: LayerId,
        font: FontId,
        size: f32,
        pos: Vec2f,
        clip: Rect,
        color: Vec4f,
        text: &str,
        wrap: f32,
    ) {
        let atlas = self.atlas.clone();
        let atlas = atlas.inner();
        let fnt = atlas.font(font);
        let texture = atlas.texture();
        let sdf = fnt.config.sdf;
        let scale = if size > 0.0 { size / fnt.config.font_size } else { 1.0 };
        let line_spacing = scale * fnt.line_spacing;
        let color = pack_color(color);

        let origin = pos;
        let mut pen = pos;
        let mut first_character = true;
        let mut bytes = text.as_bytes();

        while !bytes.is_empty() {
            let (codepoint, consumed) = text_char_from_utf8(bytes);
            bytes = &bytes[consumed..];
            if consumed == 0 {
                break;
            }

            if codepoint == '\n' as u32 {
                pen.x = origin.x;
                pen.y += line_spacing;
                first_character = true;
                continue;
            }
            if codepoint == '\r' as u32 {
                continue;
            }

            let glyph = match fnt.glyph_or_fallback(codepoint) {
                Some(glyph) => *glyph,
                None => continue,
            };

            if first_character {
                if glyph.left_bearing > 0.0 {
                    pen.x += glyph.left_bearing * scale;
                }
                first_character = false;
            }

            let mut x0 = pen.x + glyph.x0 * scale;
            let mut x1 = pen.x + glyph.x1 * scale;
            let mut y0 = pen.y + glyph.y0 * scale;
            let mut y1 = pen.y + glyph.y1 * scale;

            if wrap > 0.0 && x1 > origin.x + wrap {
                pen.x = origin.x;
                pen.y += line_spacing;
                x0 = pen.x + glyph.x0 * scale;
                x1 = pen.x + glyph.x1 * scale;
                y0 += line_spacing;
                y1 += line_spacing;
            }

            pen.x += glyph.x_advance * scale;

            if codepoint == ' ' as u32 {
                continue;
            }
            let quad = Rect { min: Vec2f::new(x0, y0), max: Vec2f::new(x1, y1) };
            if !quad.overlaps(&clip) {
                continue;
            }

            self.prepare_command(layer, texture, sdf);
            self.grow_command(layer, 6, 4);
            let vertex_start = self.vertices.len() as u32;
            self.add_vertex(Vec2f::new(x0, y0), color, Vec2f::new(glyph.u0, glyph.v0));
            self.add_vertex(Vec2f::new(x1, y0), color, Vec2f::new(glyph.u1, glyph.v0));
            self.add_vertex(Vec2f::new(x1, y1), color, Vec2f::new(glyph.u1, glyph.v1));
            self.add_vertex(Vec2f::new(x0, y1), color, Vec2f::new(glyph.u0, glyph.v1));
            self.add_triangle_indices(layer, vertex_start, 1, 0, 2);
            self.add_triangle_indices(layer, vertex_start, 2, 0, 3);
        }
    }

    /// Measures the pixel size a string would occupy.
    pub fn calculate_text_size(&self, font: FontId, size: f32, text: &str, wrap: f32) -> Vec2f {
        let bb = self.calculate_text_bb(font, size, Vec2f::new(0.0, 0.0), text, wrap);
        Vec2f::new(bb.max.x, bb.max.y)
    }

    /// Computes the bounding box a string would occupy when drawn at `pos`.
    pub fn calculate_text_bb(&self, font: FontId, size: f32, pos: Vec2f, text: &str, wrap: f32) -> Rect {
        let atlas = self.atlas.inner();
        let fnt = atlas.font(font);
        let scale = if size > 0.0 { size / fnt.config.font_size } else { 1.0 };
        let line_spacing = scale * fnt.line_spacing;

        let origin = pos;
        let mut pen = pos;
        let mut result = Rect { min: pos, max: pos };
        let mut first_character = true;
        let mut bytes = text.as_bytes();

        while !bytes.is_empty() {
            let (codepoint, consumed) = text_char_from_utf8(bytes);
            bytes = &bytes[consumed..];
            if consumed == 0 {
                break;
            }

            if codepoint == '\n' as u32 {
                pen.x = origin.x;
                pen.y += line_spacing;
                first_character = true;
                continue;
            }
            if codepoint == '\r' as u32 {
                continue;
            }

            let glyph = match fnt.glyph_or_fallback(codepoint) {
                Some(glyph) => *glyph,
                None => continue,
            };

            if first_character {
                if glyph.left_bearing > 0.0 {
                    pen.x += glyph.left_bearing * scale;
                }
                first_character = false;
            }

            let mut x1 = pen.x + glyph.x1 * scale;
            let mut y1 = pen.y + glyph.y1 * scale;
            if wrap > 0.0 && x1 > origin.x + wrap {
                pen.x = origin.x;
                pen.y += line_spacing;
                x1 = pen.x + glyph.x1 * scale;
                y1 += line_spacing;
            }
            pen.x += glyph.x_advance * scale;

            result.max.x = result.max.x.max(x1.max(pen.x));
            result.max.y = result.max.y.max(y1);
        }
        result
    }
}

// UTF-8 to 32-bit codepoint, one character at a time. Malformed input yields
// U+FFFD and consumes the minimum salvageable byte count.
pub(crate) fn text_char_from_utf8(bytes: &[u8]) -> (u32, usize) {
    const LEN: [u8; 32] = [
        1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 3, 3, 4, 0,
    ];
    const MASKS: [u32; 5] = [0x00, 0x7F, 0x1F, 0x0F, 0x07];
    const MINS: [u32; 5] = [0x400000, 0, 0x80, 0x800, 0x10000];
    const SHIFT_C: [u32; 5] = [0, 18, 12, 6, 0];
    const SHIFT_E: [u32; 5] = [0, 6, 4, 2, 0];

    if bytes.is_empty() {
        return (0, 0);
    }

    let len = LEN[(bytes[0] >> 3) as usize] as usize;
    let wanted = len + (len == 0) as usize;

    let mut s = [0u8; 4];
    for i in 0..wanted.min(bytes.len()) {
        s[i] = bytes[i];
    }

    let mut cp = (s[0] as u32 & MASKS[len]) << 18;
    cp |= (s[1] as u32 & 0x3F) << 12;
    cp |= (s[2] as u32 & 0x3F) << 6;
    cp |= s[3] as u32 & 0x3F;
    cp >>= SHIFT_C[len];

    // accumulate error conditions
    let mut e = ((cp < MINS[len]) as u32) << 6; // non-canonical encoding
    e |= (((cp >> 11) == 0x1B) as u32) << 7; // surrogate half
    e |= ((cp > 0x10FFFF) as u32) << 8; // out of range
    e |= (s[1] as u32 & 0xC0) >> 2;
    e |= (s[2] as u32 & 0xC0) >> 4;
    e |= s[3] as u32 >> 6;
    e ^= 0x2A; // top two bits of each tail byte correct?
    e >>= SHIFT_E[len];

    if e != 0 {
        // consume at most the bytes that could have belonged to the sequence
        let nonzero = s.iter().take(wanted).filter(|b| **b != 0).count();
        (0xFFFD, wanted.min(nonzero.max(1)).min(bytes.len()))
    } else {
        (cp, wanted.min(bytes.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontAtlas;
    use crate::geometry::vec2f;

    fn make_list() -> DrawList {
        let mut atlas = FontAtlas::new();
        atlas.build().expect("build");
        atlas.set_texture(TextureId(7));
        DrawList::new(FontAtlasHandle::new(atlas))
    }

    const WHITE: Vec4f = Vec4f { x: 1.0, y: 1.0, z: 1.0, w: 1.0 };

    #[test]
    fn commands_merge_when_state_matches() {
        let mut list = make_list();
        let layer = list.request_layer("test");
        list.add_rect_filled(layer, vec2f(0.0, 0.0), vec2f(10.0, 10.0), WHITE);
        list.add_rect_filled(layer, vec2f(20.0, 0.0), vec2f(30.0, 10.0), WHITE);
        assert_eq!(list.layer(layer).commands().len(), 1);
        assert_eq!(list.layer(layer).commands()[0].element_count, 12);
        assert_eq!(list.layer(layer).vertex_count(), 8);
    }

    #[test]
    fn clip_change_opens_a_new_command() {
        let mut list = make_list();
        let layer = list.request_layer("test");
        list.add_rect_filled(layer, vec2f(0.0, 0.0), vec2f(10.0, 10.0), WHITE);
        list.push_clip_rect(Rect::from_pos_size(vec2f(0.0, 0.0), vec2f(5.0, 5.0)), false);
        list.add_rect_filled(layer, vec2f(0.0, 0.0), vec2f(10.0, 10.0), WHITE);
        list.pop_clip_rect();

        let commands = list.layer(layer).commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].clip_rect, Rect::from_pos_size(vec2f(0.0, 0.0), vec2f(5.0, 5.0)));
        // each command records the clip rect in effect when it was opened
        assert_eq!(commands[0].clip_rect, Rect::UNCLIPPED);
    }

    #[test]
    fn texture_change_opens_a_new_command() {
        let mut list = make_list();
        let layer = list.request_layer("test");
        list.add_rect_filled(layer, vec2f(0.0, 0.0), vec2f(10.0, 10.0), WHITE);
        list.add_image(layer, TextureId(99), vec2f(0.0, 0.0), vec2f(8.0, 8.0), WHITE);
        let commands = list.layer(layer).commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].texture, TextureId(99));
    }

    #[test]
    fn indices_reference_existing_vertices() {
        let mut list = make_list();
        let layer = list.request_layer("test");
        list.add_triangle_filled(layer, vec2f(0.0, 0.0), vec2f(10.0, 0.0), vec2f(5.0, 10.0), WHITE);
        list.add_line(layer, vec2f(0.0, 0.0), vec2f(10.0, 10.0), WHITE, 2.0);
        for index in list.layer(layer).indices() {
            assert!((*index as usize) < list.vertices().len());
        }
    }

    #[test]
    fn submitted_layers_recycle_on_new_frame() {
        let mut list = make_list();
        let layer = list.request_layer("window");
        list.add_rect_filled(layer, vec2f(0.0, 0.0), vec2f(10.0, 10.0), WHITE);
        list.submit_layer(layer);
        assert_eq!(list.submitted_layers().len(), 1);
        list.new_frame();
        assert!(list.submitted_layers().is_empty());
        assert!(list.vertices().is_empty());
        let recycled = list.request_layer("window2");
        assert_eq!(recycled, layer);
        assert!(list.layer(recycled).commands().is_empty());
    }

    #[test]
    fn utf8_decoder_handles_the_euro_sign() {
        let (cp, len) = text_char_from_utf8("€".as_bytes());
        assert_eq!(cp, 0x20AC);
        assert_eq!(len, 3);
    }

    #[test]
    fn utf8_decoder_replaces_malformed_input() {
        // lone continuation byte
        let (cp, len) = text_char_from_utf8(&[0x80, b'a']);
        assert_eq!(cp, 0xFFFD);
        assert_eq!(len, 1);
        // truncated 3-byte sequence
        let (cp, len) = text_char_from_utf8(&[0xE2, 0x82]);
        assert_eq!(cp, 0xFFFD);
        assert!(len >= 1 && len <= 2);
    }

    #[test]
    fn ascii_decodes_one_byte_at_a_time() {
        let (cp, len) = text_char_from_utf8(b"ab");
        assert_eq!((cp, len), ('a' as u32, 1));
    }
}
