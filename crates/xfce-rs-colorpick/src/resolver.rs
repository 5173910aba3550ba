use tracing::debug;
use x11rb::protocol::xproto::Window;

use crate::display::{DisplayServer, Target};

/// Find the deepest window under a point.
///
/// A button press on the root only names the top-level child under the
/// pointer. Starting from `candidate`, keep asking the server which child
/// of the current window holds the point until none does.
///
/// Returns `None` when `top` or `candidate` is absent.
pub fn resolve_target<D: DisplayServer>(
    display: &D,
    top: Window,
    candidate: Option<Window>,
    x: i16,
    y: i16,
) -> Option<Target> {
    if top == x11rb::NONE {
        return None;
    }
    let mut candidate = candidate.filter(|w| *w != x11rb::NONE)?;

    // Invariant: `reference` is the deepest window known to hold the point
    // and (x, y) are relative to it.
    let mut reference = top;
    let (mut x, mut y) = (x, y);

    loop {
        let Some(step) = display.translate_coordinates(reference, candidate, x, y) else {
            debug!("Translation into {:#x} failed, keeping {:#x}", candidate, reference);
            return Some(Target { window: reference, x, y });
        };

        match step.child {
            Some(child) if child != x11rb::NONE => {
                reference = candidate;
                candidate = child;
                x = step.x;
                y = step.y;
            }
            _ => {
                return Some(Target { window: candidate, x: step.x, y: step.y });
            }
        }
    }
}
