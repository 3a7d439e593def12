//! imbridge renderer
//!
//! The render half of the bridge: a slot-based registry owning GPU textures,
//! the adapter that follows the GUI library's texture lifecycle, and the
//! submission of finalized draw lists through a host 2D renderer.
//!
//! ## Backends
//! - [`backend::CommandRecorder`] records calls; headless and test use
//! - [`backend::WgpuBackend`] renders with wgpu into any texture view

pub mod backend;
pub mod draw;
pub mod lifecycle;
pub mod registry;
pub mod renderer;
pub mod staging;

pub use backend::{
    CommandRecorder, GpuTexture, Render2D, RenderCommand, TextureBackend, TextureDesc,
    TextureUpload, TriangleMesh, WgpuBackend, WgpuTarget, WgpuTexture,
};
pub use draw::{DrawRenderer, DrawStats};
pub use lifecycle::{DestroyOutcome, TextureLifecycle, TextureStats};
pub use registry::TextureRegistry;
pub use renderer::{GuiRenderer, RenderStats};
pub use staging::{grown_capacity, StagingBuffers};

pub use wgpu;
