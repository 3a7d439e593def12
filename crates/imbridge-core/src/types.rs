//! Common types used throughout imbridge

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// 8-bit per channel RGBA color, as consumed by the host's 2D renderer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Create a color from RGBA byte values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a little-endian RGBA word: R in bits 0-7, G in 8-15,
    /// B in 16-23, A in 24-31
    #[inline]
    pub const fn from_packed(col: u32) -> Self {
        Self {
            r: (col & 0xFF) as u8,
            g: ((col >> 8) & 0xFF) as u8,
            b: ((col >> 16) & 0xFF) as u8,
            a: ((col >> 24) & 0xFF) as u8,
        }
    }

    /// Pack into the GUI library's vertex color layout
    #[inline]
    pub const fn to_packed(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16) | ((self.a as u32) << 24)
    }
}

/// Axis-aligned rectangle in framebuffer pixels, origin + extent
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from two corners; callers guarantee `max > min`
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// Clip rectangle as emitted by the GUI library: `(x1, y1, x2, y2)` in
/// display coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ClipRect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            min: Vec2::new(x1, y1),
            max: Vec2::new(x2, y2),
        }
    }

    /// Project into framebuffer space.
    ///
    /// Returns `None` for degenerate results (zero or negative extent on
    /// either axis); such commands have nothing visible and are dropped.
    pub fn to_framebuffer(&self, display_pos: Vec2, framebuffer_scale: Vec2) -> Option<Rect> {
        let min = (self.min - display_pos) * framebuffer_scale;
        let max = (self.max - display_pos) * framebuffer_scale;
        if max.x <= min.x || max.y <= min.y {
            return None;
        }
        Some(Rect::from_min_max(min, max))
    }
}
