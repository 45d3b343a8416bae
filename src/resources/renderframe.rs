//! Frame-scoped render batch.
//!
//! The simulation never talks to a graphics API. It appends textured quads and
//! image draws to a [`RenderFrame`], switches the atlas page and sets the clear
//! color; the shell drains the batch once per frame with [`RenderFrame::take`]
//! and hands it to whatever backend it runs.

use serde::{Deserialize, Serialize};

use crate::components::mapposition::Vec4;
use crate::components::sprite::ImageId;

/// One textured vertex: NDC position plus atlas texel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub s: u16,
    pub t: u16,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32, s: u16, t: u16) -> Self {
        Vertex { x, y, z, s, t }
    }
}

/// Four vertices drawn as a strip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderQuad {
    pub vertices: [Vertex; 4],
}

impl RenderQuad {
    pub const fn new(vertices: [Vertex; 4]) -> Self {
        RenderQuad { vertices }
    }

    /// Axis-aligned quad from NDC corners and a texel rectangle.
    pub const fn rect(
        (x0, y0): (f32, f32),
        (x1, y1): (f32, f32),
        z: f32,
        (s0, t0): (u16, u16),
        (s1, t1): (u16, u16),
    ) -> Self {
        RenderQuad::new([
            Vertex::new(x0, y0, z, s0, t0),
            Vertex::new(x1, y0, z, s1, t0),
            Vertex::new(x0, y1, z, s0, t1),
            Vertex::new(x1, y1, z, s1, t1),
        ])
    }

    /// Quad translated by `d` (x, y and z lanes).
    pub fn offset(mut self, d: Vec4) -> Self {
        for v in &mut self.vertices {
            v.x += d.x;
            v.y += d.y;
            v.z += d.z;
        }
        self
    }
}

/// A single atlas image drawn at an NDC position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDraw {
    pub pos: Vec4,
    pub scale: Vec4,
    pub image: ImageId,
}

/// Everything the simulation asked to draw during one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub quads: Vec<RenderQuad>,
    pub images: Vec<ImageDraw>,
    pub clear_color: [f32; 3],
    page: u8,
    page_changes: u32,
}

impl Default for RenderFrame {
    fn default() -> Self {
        RenderFrame {
            quads: Vec::new(),
            images: Vec::new(),
            clear_color: [0.0, 0.0, 0.0],
            page: 0,
            page_changes: 0,
        }
    }
}

impl RenderFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_quads(&mut self, quads: &[RenderQuad]) {
        self.quads.extend_from_slice(quads);
    }

    pub fn draw_image(&mut self, pos: Vec4, scale: Vec4, image: ImageId) {
        self.images.push(ImageDraw { pos, scale, image });
    }

    /// Select the atlas page. Returns `false` when the page is already active.
    pub fn set_active_page(&mut self, page: u8) -> bool {
        if self.page == page && self.page_changes > 0 {
            return false;
        }
        self.page = page;
        self.page_changes += 1;
        true
    }

    pub fn active_page(&self) -> u8 {
        self.page
    }

    /// Number of effective page switches since startup.
    pub fn page_changes(&self) -> u32 {
        self.page_changes
    }

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32) {
        self.clear_color = [r, g, b];
    }

    /// Hand the accumulated draw lists to the shell and start a fresh batch.
    /// Page and clear color persist across frames.
    pub fn take(&mut self) -> RenderFrame {
        RenderFrame {
            quads: std::mem::take(&mut self.quads),
            images: std::mem::take(&mut self.images),
            clear_color: self.clear_color,
            page: self.page,
            page_changes: self.page_changes,
        }
    }
}
