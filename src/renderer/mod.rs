//! Rendering module
//!
//! `frame` turns the scene into draw commands without touching the GPU.
//! `pipeline` replays them with wgpu.

pub mod frame;
pub mod pipeline;
pub mod shader;
pub mod shapes;
pub mod vertex;

pub use frame::{DrawCommand, FrameSink, MeshId, draw_commands, render};
pub use pipeline::GpuRenderer;
pub use shader::{ShaderProgram, ShaderSources};
pub use shapes::MeshSet;
