//! Pick the color of a screen pixel with the mouse.
//!
//! The flow is capture → resolve → sample: grab the pointer until the user
//! clicks, descend to the deepest window under the click, then read one
//! pixel from it and look it up in the default colormap.

use tracing::info;

pub mod capture;
pub mod color;
pub mod display;
pub mod error;
pub mod resolver;
pub mod sampler;
pub mod x11;

#[cfg(test)]
mod testing;

pub use capture::capture_click;
pub use color::{ColorStyle, OutputFormat, Rgb16};
pub use display::{DisplayServer, Target};
pub use error::{Disposition, ErrorFilter, GrabError};
pub use resolver::resolve_target;
pub use sampler::sample_color;
pub use x11::X11Display;

/// Wait for a click and return the color under it.
pub fn grab_color<D: DisplayServer>(display: &D) -> Result<Rgb16, GrabError> {
    let target = capture_click(display)?;
    info!("Sampling window {:#x} at {},{}", target.window, target.x, target.y);
    sample_color(display, &target)
}

/// Open the display with `connect`, pick a color and render it in `style`.
pub fn pick_color<D, F>(connect: F, style: &ColorStyle) -> Result<String, GrabError>
where
    D: DisplayServer,
    F: FnOnce() -> Result<D, GrabError>,
{
    let display = connect()?;
    let color = grab_color(&display)?;
    Ok(style.render(color))
}
