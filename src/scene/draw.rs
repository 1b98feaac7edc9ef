//! Drawing surface abstraction and a recording implementation

use glam::Vec2;

use crate::assets::Sprite;
use crate::sim::Rect;

/// Linear RGBA in 0..1 (values are the sRGB-encoded palette, drawn as-is)
pub type Color = [f32; 4];

/// Opaque color from 0xRRGGBB
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        1.0,
    ]
}

pub mod palette {
    use super::{Color, rgb};

    pub const SKY: Color = rgb(0x5C94FC);
    pub const GROUND: Color = rgb(0xC84C0C);
    pub const BRICK_DARK: Color = rgb(0x9C3810);
    pub const BRICK_HIGHLIGHT: Color = rgb(0xE06428);
    pub const PIPE_GREEN: Color = rgb(0x00A800);
    pub const BLOCK_ORANGE: Color = rgb(0xF89028);
    pub const WHITE: Color = rgb(0xFFFFFF);
    pub const BLACK: Color = rgb(0x000000);
    /// Game-over dim
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.7];
    /// Debug hitboxes
    pub const HITBOX: Color = rgb(0xFF0000);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Minimal 2D drawing API the scene is written against
pub trait DrawSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Outline centered on the rect edges, `width` thick
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color);
    fn draw_image(&mut self, sprite: Sprite, rect: Rect);
    /// `pos.x` is the anchor given by `align`; `pos.y` is the baseline
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Fill {
        rect: Rect,
        color: Color,
    },
    Stroke {
        rect: Rect,
        width: f32,
        color: Color,
    },
    Image {
        sprite: Sprite,
        rect: Rect,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        align: TextAlign,
        color: Color,
    },
}

/// Recorded frame, consumed by a render backend
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text of every `Text` command, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        self.commands.push(DrawCmd::Stroke { rect, width, color });
    }

    fn draw_image(&mut self, sprite: Sprite, rect: Rect) {
        self.commands.push(DrawCmd::Image { sprite, rect });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            size,
            align,
            color,
        });
    }
}

/// Four filled bands making up a stroked outline: top, bottom, left, right
pub fn stroke_edges(rect: Rect, width: f32) -> [Rect; 4] {
    let half = width / 2.0;
    let outer = Rect::new(rect.x - half, rect.y - half, rect.w + width, rect.h + width);
    let inner_h = (rect.h - width).max(0.0);
    [
        Rect::new(outer.x, outer.y, outer.w, width),
        Rect::new(outer.x, outer.bottom() - width, outer.w, width),
        Rect::new(outer.x, outer.y + width, width, inner_h),
        Rect::new(outer.right() - width, outer.y + width, width, inner_h),
    ]
}
