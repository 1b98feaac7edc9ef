//! WebGPU rendering module
//!
//! Draws a recorded `DrawList` as textured, tinted quads. Solid fills and
//! text sample a 1x1 white texture so everything goes through one pipeline.

pub mod batch;
pub mod pipeline;
pub mod texture;
pub mod vertex;

pub use batch::{Batch, Projection, TextureSlot, Tessellation, tessellate};
pub use pipeline::RenderState;
pub use vertex::Vertex;
