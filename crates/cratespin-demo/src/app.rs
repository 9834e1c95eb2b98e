use anyhow::Result;

use cratespin_engine::assets::ImageData;
use cratespin_engine::coords::Mat3;
use cratespin_engine::core::{App, AppControl, FrameCtx};
use cratespin_engine::render::{QuadRenderer, RenderCtx};

use crate::spin::Spin;

/// Background color behind the quad.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.188,
    g: 0.22,
    b: 0.255,
    a: 1.0,
};

/// Frames between frame-rate log lines.
const FRAME_LOG_INTERVAL: u64 = 600;

/// The rotating-quad application: one textured quad, one angle.
pub struct SpinApp {
    texture_path: &'static str,
    renderer: Option<QuadRenderer>,
    spin: Spin,
}

impl SpinApp {
    pub fn new(texture_path: &'static str) -> Self {
        Self {
            texture_path,
            renderer: None,
            spin: Spin::new(),
        }
    }
}

impl App for SpinApp {
    fn on_init(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        // Decode failure is recoverable: render a visible placeholder rather
        // than binding nothing.
        let image = match ImageData::from_path(self.texture_path) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("{err:#}; using placeholder texture");
                ImageData::placeholder()
            }
        };

        self.renderer = Some(QuadRenderer::new(ctx, &image)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(renderer) = self.renderer.as_ref() else {
            return Ok(AppControl::Continue);
        };

        let angle = self.spin.advance();

        if ctx.time.frame_index > 0 && ctx.time.frame_index % FRAME_LOG_INTERVAL == 0 {
            log::debug!(
                "frame {} ({:.1} fps)",
                ctx.time.frame_index,
                1.0 / ctx.time.dt
            );
        }

        ctx.render(CLEAR_COLOR, |rctx, target| {
            renderer.set_transform(rctx, Mat3::rotation(angle));
            renderer.draw(target);
        })?;

        Ok(AppControl::Continue)
    }
}
