use std::io::Write;

use tracing::debug;
use xfce_rs_colorpick::{pick_color, DisplayServer, GrabError};

use crate::cli::Args;
use crate::settings::Settings;

pub const VERSION_LINE: &str = "grabc v1.0: [-vhd#npc]";

/// Run one pick and report it. Returns the process exit status.
///
/// `connect` is only called when a color is actually wanted.
pub fn execute<D, F>(
    args: &Args,
    settings: &Settings,
    connect: F,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8
where
    D: DisplayServer,
    F: FnOnce() -> Result<D, GrabError>,
{
    if args.version {
        return emit(out, &format!("{}\n", VERSION_LINE));
    }

    match pick_color(connect, &settings.style(args)) {
        Ok(color) => emit(out, &color),
        Err(e) => {
            debug!("{}: {}", e, e.reason());
            let _ = writeln!(err, "{}", e);
            e.exit_status()
        }
    }
}

fn emit(out: &mut impl Write, text: &str) -> u8 {
    match out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        Ok(()) => 0,
        Err(e) => {
            debug!("Writing output failed: {}", e);
            1
        }
    }
}
