//! Draw list tessellation
//!
//! Converts recorded draw commands into one vertex stream plus a list of
//! batches. Consecutive quads sharing a texture are drawn with one call.

use std::ops::Range;

use glam::Vec2;

use super::vertex::{Vertex, quad};
use crate::assets::Sprite;
use crate::scene::draw::{DrawCmd, DrawList, stroke_edges};
use crate::scene::{font, palette};

/// Which texture a batch samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// 1x1 white: solid fills and text
    White,
    Sprite(Sprite),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureSlot,
    pub vertices: Range<u32>,
}

#[derive(Debug, Default)]
pub struct Tessellation {
    pub vertices: Vec<Vertex>,
    pub batches: Vec<Batch>,
}

impl Tessellation {
    fn push_quad(&mut self, texture: TextureSlot, verts: [Vertex; 6]) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&verts);
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(batch) if batch.texture == texture && batch.vertices.end == start => {
                batch.vertices.end = end;
            }
            _ => self.batches.push(Batch {
                texture,
                vertices: start..end,
            }),
        }
    }
}

/// Tessellate in logical coordinates
pub fn tessellate(list: &DrawList) -> Tessellation {
    let mut out = Tessellation::default();
    for cmd in list.commands() {
        match cmd {
            DrawCmd::Fill { rect, color } => {
                out.push_quad(TextureSlot::White, quad(*rect, *color));
            }
            DrawCmd::Stroke { rect, width, color } => {
                for edge in stroke_edges(*rect, *width) {
                    out.push_quad(TextureSlot::White, quad(edge, *color));
                }
            }
            DrawCmd::Image { sprite, rect } => {
                out.push_quad(TextureSlot::Sprite(*sprite), quad(*rect, palette::WHITE));
            }
            DrawCmd::Text {
                text,
                pos,
                size,
                align,
                color,
            } => {
                for rect in font::layout(text, pos.x, pos.y, *size, *align) {
                    out.push_quad(TextureSlot::White, quad(rect, *color));
                }
            }
        }
    }
    out
}

/// Maps the logical playfield into clip space, letterboxed to keep its aspect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Logical size (e.g. 1600x800)
    pub logical: Vec2,
    /// Render target size in physical pixels
    pub target: Vec2,
}

impl Projection {
    pub fn new(logical: Vec2, target: Vec2) -> Self {
        Self { logical, target }
    }

    /// Fraction of the clip-space extent used on each axis (1.0 = full)
    fn fill(&self) -> Vec2 {
        let logical_aspect = self.logical.x / self.logical.y;
        let target_aspect = self.target.x / self.target.y.max(1.0);
        if target_aspect > logical_aspect {
            // Bars left and right
            Vec2::new(logical_aspect / target_aspect, 1.0)
        } else {
            Vec2::new(1.0, target_aspect / logical_aspect)
        }
    }

    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let fill = self.fill();
        let unit = p / self.logical;
        Vec2::new(
            (unit.x * 2.0 - 1.0) * fill.x,
            (1.0 - unit.y * 2.0) * fill.y,
        )
    }

    pub fn apply(&self, vertices: &mut [Vertex]) {
        for v in vertices {
            let ndc = self.to_ndc(Vec2::from(v.position));
            v.position = ndc.to_array();
        }
    }
}
