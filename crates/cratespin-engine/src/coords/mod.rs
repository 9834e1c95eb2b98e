//! Plain 2D math shared by the transform and render layers.
//!
//! Convention:
//! - scene geometry lives in normalized device-style units, +Y up
//! - points transform as column vectors: `p' = M * (x, y, 1)`

mod mat3;
mod vec2;

pub use mat3::Mat3;
pub use vec2::Vec2;
