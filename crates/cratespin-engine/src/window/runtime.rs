use anyhow::{bail, Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, Outcome, Phase};
use crate::device::{Gpu, GpuInit};
use crate::render::RenderCtx;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cratespin".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
///
/// Owns the winit event loop, the window, and the GPU context, and drives the
/// application through the Initializing → Running → Terminated lifecycle.
pub struct Runtime;

impl Runtime {
    /// Runs `app` to completion.
    ///
    /// `Ok(())` means the loop terminated on a quit request. Setup failures
    /// and unrecoverable frame errors come back as `Err`, after teardown.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        // Drop the window entry before reporting: GPU context first (it
        // borrows the window), then the window itself.
        state.entry = None;

        match state.phase.outcome() {
            Some(Outcome::Success) => Ok(()),
            Some(Outcome::Failure) => bail!("frame loop terminated after an unrecoverable error"),
            None => bail!("event loop exited before the lifecycle completed"),
        }
    }
}

// Window plus the GPU context borrowing it. Field order matters: ouroboros
// drops the context before the window it renders to.
#[self_referencing]
struct WindowEntry {
    clock: FrameClock,
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct RuntimeState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    phase: Phase,
    quit_requested: bool,
}

impl<A> RuntimeState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            phase: Phase::Initializing,
            quit_requested: false,
        }
    }

    /// Creates the window and GPU context, then hands the app its one chance
    /// to build resources. Any failure here is fatal.
    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()?;

        entry.with_gpu(|gpu| {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
            self.app.on_init(&ctx)
        })?;

        self.entry = Some(entry);
        Ok(())
    }

    /// Runs one frame through the app. The returned directive is already
    /// folded into `phase`/`quit_requested`.
    fn drive_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let app = &mut self.app;
        let mut frame_result = Ok(AppControl::Continue);

        entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                time,
            };
            frame_result = app.on_frame(&mut ctx);
        });

        match frame_result {
            Ok(AppControl::Continue) => {}
            Ok(AppControl::Exit) => self.quit_requested = true,
            Err(err) => {
                log::error!("frame failed: {err:#}");
                self.phase.terminate(Outcome::Failure);
                event_loop.exit();
            }
        }
    }
}

impl<A> ApplicationHandler for RuntimeState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.setup(event_loop) {
            Ok(()) => {
                self.phase.begin_running();
                log::info!("startup complete; entering frame loop");
                if let Some(entry) = &self.entry {
                    entry.with_window(|w| w.request_redraw());
                }
            }
            Err(err) => {
                log::error!("startup failed: {err:#}");
                self.phase.terminate(Outcome::Failure);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.phase.is_running() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw drives the animation.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.quit_requested = true;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.quit_requested = true;
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                // The quit flag is applied here, between frames — never
                // mid-draw.
                if self.quit_requested && self.phase.is_running() {
                    self.phase.terminate(Outcome::Success);
                    log::info!("quit requested; shutting down");
                    event_loop.exit();
                    return;
                }
                if !self.phase.is_running() {
                    return;
                }

                self.drive_frame(event_loop);
            }

            _ => {}
        }
    }
}
