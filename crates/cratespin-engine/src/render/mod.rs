//! GPU rendering for the demo scene.
//!
//! The quad renderer owns its pipeline, geometry, texture, and transform
//! uniform. All resources are created up front at setup so configuration
//! errors fail before the first frame instead of corrupting it.

mod ctx;
mod quad;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::QuadRenderer;
pub use texture::QuadTexture;
