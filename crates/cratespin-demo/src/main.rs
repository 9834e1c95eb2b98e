mod app;
mod spin;

use std::process::ExitCode;

use cratespin_engine::device::GpuInit;
use cratespin_engine::logging::{init_logging, LoggingConfig};
use cratespin_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use app::SpinApp;

/// Bundled texture decoded at startup, relative to the working directory.
const TEXTURE_PATH: &str = "assets/crate.bmp";

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Rotating Crate".to_string(),
        initial_size: LogicalSize::new(352.0, 430.0),
        resizable: true,
    };

    match Runtime::run(config, GpuInit::default(), SpinApp::new(TEXTURE_PATH)) {
        Ok(()) => {
            log::info!("exited cleanly");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
