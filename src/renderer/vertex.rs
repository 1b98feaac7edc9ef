//! Vertex type for textured, tinted quads

use bytemuck::{Pod, Zeroable};

use crate::scene::Color;
use crate::sim::Rect;

/// 2D vertex with texture coordinate and tint
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Two triangles covering `rect`, texture mapped 0..1
pub fn quad(rect: Rect, color: Color) -> [Vertex; 6] {
    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let tl = Vertex::new(l, t, 0.0, 0.0, color);
    let tr = Vertex::new(r, t, 1.0, 0.0, color);
    let bl = Vertex::new(l, b, 0.0, 1.0, color);
    let br = Vertex::new(r, b, 1.0, 1.0, color);
    [tl, bl, tr, tr, bl, br]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn test_quad_corners() {
        let q = quad(Rect::new(10.0, 20.0, 30.0, 40.0), [1.0; 4]);
        assert_eq!(q[0].position, [10.0, 20.0]);
        assert_eq!(q[5].position, [40.0, 60.0]);
        assert_eq!(q[5].uv, [1.0, 1.0]);
    }
}
