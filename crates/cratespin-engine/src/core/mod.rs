//! Core engine-facing contracts.
//!
//! Defines the stable interface between the runtime (platform loop) and the
//! application layer: the `App` trait, the per-frame context, and the frame
//! lifecycle state machine.

mod app;
mod ctx;
mod lifecycle;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use lifecycle::{Outcome, Phase};
