//! Cratespin engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the demo binary: device
//! context, window runtime, frame lifecycle, and the quad render path.

pub mod device;
pub mod window;
pub mod core;
pub mod render;
pub mod time;

pub mod assets;
pub mod coords;
pub mod logging;
