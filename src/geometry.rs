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

/// Axis-aligned rectangle stored as two corners.
#[derive(Default, Copy, Clone, Debug)]
pub struct Rect {
    /// Top-left corner.
    pub min: Vec2f,
    /// Bottom-right corner.
    pub max: Vec2f,
}

impl PartialEq for Rect {
    fn eq(&self, other: &Self) -> bool {
        self.min.x == other.min.x && self.min.y == other.min.y && self.max.x == other.max.x && self.max.y == other.max.y
    }
}

/// Convenience constructor for [`Vec2f`].
pub fn vec2f(x: f32, y: f32) -> Vec2f { Vec2f::new(x, y) }

impl Rect {
    /// Rectangle covering everything; the bottom of every clip stack.
    pub const UNCLIPPED: Rect = Rect {
        min: Vec2f { x: -f32::MAX, y: -f32::MAX },
        max: Vec2f { x: f32::MAX, y: f32::MAX },
    };

    /// Creates a rectangle from its two corners.
    pub fn new(min: Vec2f, max: Vec2f) -> Self { Self { min, max } }

    /// Creates a rectangle from a top-left position and a size.
    pub fn from_pos_size(pos: Vec2f, size: Vec2f) -> Self {
        Self { min: pos, max: Vec2f::new(pos.x + size.x, pos.y + size.y) }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 { self.max.x - self.min.x }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 { self.max.y - self.min.y }

    /// Size of the rectangle.
    pub fn size(&self) -> Vec2f { Vec2f::new(self.width(), self.height()) }

    /// Center point.
    pub fn center(&self) -> Vec2f {
        Vec2f::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }

    /// Grows (or shrinks, for negative `n`) the rectangle uniformly.
    pub fn expand(&self, n: f32) -> Self {
        Self {
            min: Vec2f::new(self.min.x - n, self.min.y - n),
            max: Vec2f::new(self.max.x + n, self.max.y + n),
        }
    }

    /// Grows the rectangle by a per-axis amount.
    pub fn expand_vec2(&self, n: Vec2f) -> Self {
        Self {
            min: Vec2f::new(self.min.x - n.x, self.min.y - n.y),
            max: Vec2f::new(self.max.x + n.x, self.max.y + n.y),
        }
    }

    /// Clamps both corners into `other`. The result may be inverted when the
    /// rectangles do not overlap; callers check with [`Rect::is_inverted`].
    pub fn clip(&self, other: &Rect) -> Self {
        Self {
            min: Vec2f::new(
                self.min.x.clamp(other.min.x, other.max.x),
                self.min.y.clamp(other.min.y, other.max.y),
            ),
            max: Vec2f::new(
                self.max.x.clamp(other.min.x, other.max.x),
                self.max.y.clamp(other.min.y, other.max.y),
            ),
        }
    }

    /// Returns `true` if the two rectangles overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x && self.min.y < other.max.y && self.max.y > other.min.y
    }

    /// Returns `true` if either axis is inverted (empty intersection).
    pub fn is_inverted(&self) -> bool { self.min.x > self.max.x || self.min.y > self.max.y }

    /// Returns `true` if `p` lies inside the rectangle.
    pub fn contains(&self, p: Vec2f) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns `true` if `other` lies fully inside the rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x && other.min.y >= self.min.y && other.max.x <= self.max.x && other.max.y <= self.max.y
    }

    /// Top-left corner.
    pub fn top_left(&self) -> Vec2f { self.min }

    /// Top-right corner.
    pub fn top_right(&self) -> Vec2f { Vec2f::new(self.max.x, self.min.y) }

    /// Bottom-left corner.
    pub fn bottom_left(&self) -> Vec2f { Vec2f::new(self.min.x, self.max.y) }

    /// Bottom-right corner.
    pub fn bottom_right(&self) -> Vec2f { self.max }
}

/// Returns `true` if `point` lies inside the circle at `center`.
pub fn circle_contains_point(center: Vec2f, radius: f32, point: Vec2f) -> bool {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// Returns `true` if `point` lies inside the triangle `p0 p1 p2`.
pub fn triangle_contains_point(p0: Vec2f, p1: Vec2f, p2: Vec2f, point: Vec2f) -> bool {
    let b1 = ((point.x - p1.x) * (p0.y - p1.y) - (point.y - p1.y) * (p0.x - p1.x)) < 0.0;
    let b2 = ((point.x - p2.x) * (p1.y - p2.y) - (point.y - p2.y) * (p1.x - p2.x)) < 0.0;
    let b3 = ((point.x - p0.x) * (p2.y - p0.y) - (point.y - p0.y) * (p2.x - p0.x)) < 0.0;
    b1 == b2 && b2 == b3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_clamps_into_other() {
        let a = Rect::from_pos_size(vec2f(0.0, 0.0), vec2f(100.0, 100.0));
        let b = Rect::from_pos_size(vec2f(50.0, 50.0), vec2f(100.0, 100.0));
        let c = a.clip(&b);
        assert_eq!(c, Rect::from_pos_size(vec2f(50.0, 50.0), vec2f(50.0, 50.0)));
        assert!(!c.is_inverted());
    }

    #[test]
    fn disjoint_clip_is_inverted() {
        let a = Rect::from_pos_size(vec2f(0.0, 0.0), vec2f(10.0, 10.0));
        let b = Rect::from_pos_size(vec2f(50.0, 50.0), vec2f(10.0, 10.0));
        assert!(!a.overlaps(&b));
        // clamping collapses to b's near edge, not an inversion, but the
        // intersection is empty either way
        let c = a.clip(&b);
        assert_eq!(c.width(), 0.0);
    }

    #[test]
    fn contains_is_inclusive() {
        let r = Rect::from_pos_size(vec2f(0.0, 0.0), vec2f(10.0, 10.0));
        assert!(r.contains(vec2f(0.0, 0.0)));
        assert!(r.contains(vec2f(10.0, 10.0)));
        assert!(!r.contains(vec2f(10.1, 10.0)));
    }
}
