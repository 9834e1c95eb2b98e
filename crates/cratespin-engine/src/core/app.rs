use anyhow::Result;
use winit::event::WindowEvent;

use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the demo layer.
pub trait App {
    /// Called once after the window and GPU context exist, before the first
    /// frame. Resource creation belongs here; an error aborts startup.
    fn on_init(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// Called for window events the runtime does not consume itself.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame. Returning an error terminates the
    /// loop with a failure outcome; [`AppControl::Exit`] requests a clean
    /// shutdown.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;
}
