mod app;
mod cli;
mod settings;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use xfce_rs_colorpick::X11Display;

use crate::settings::Settings;

/// Diagnostics only exist in builds with the `diagnostics` feature, where
/// `RUST_LOG` can tune them (default `warn`).
fn log_filter() -> EnvFilter {
    if cfg!(feature = "diagnostics") {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::new("off")
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let args = cli::parse(std::env::args_os());
    let settings = Settings::load();

    let status = app::execute(
        &args,
        &settings,
        || X11Display::connect(None),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    );
    ExitCode::from(status)
}
