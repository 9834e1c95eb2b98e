//! Image assets.
//!
//! Decoding happens on the CPU via the `image` crate; the render layer only
//! ever sees tightly-packed RGBA8 buffers.

mod image;

pub use image::ImageData;
