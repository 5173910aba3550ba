use tracing::{debug, info, warn};
use x11rb::protocol::xproto::Cursor;

use crate::display::{DisplayServer, Target};
use crate::error::{log_and_ignore, log_warn, GrabError};
use crate::resolver::resolve_target;

/// Cursor shown while the pointer is grabbed.
pub const PICK_CURSOR: &str = "crosshair";
/// Used when the theme and cursor font lack `PICK_CURSOR`.
pub const FALLBACK_CURSOR: &str = "tcross";

/// Frees the cursor when dropped.
pub struct CursorGuard<'a, D: DisplayServer> {
    display: &'a D,
    cursor: Cursor,
}

impl<'a, D: DisplayServer> CursorGuard<'a, D> {
    pub fn create(display: &'a D) -> Option<Self> {
        let cursor = display.create_cursor(PICK_CURSOR).or_else(|| {
            debug!("No {} cursor, trying {}", PICK_CURSOR, FALLBACK_CURSOR);
            display.create_cursor(FALLBACK_CURSOR)
        })?;
        Some(Self { display, cursor })
    }

    pub fn id(&self) -> Cursor {
        self.cursor
    }
}

impl<D: DisplayServer> Drop for CursorGuard<'_, D> {
    fn drop(&mut self) {
        log_and_ignore(self.display.free_cursor(self.cursor), "free_cursor");
    }
}

/// An active pointer grab; ungrabs when dropped.
pub struct PointerGrab<'a, D: DisplayServer> {
    display: &'a D,
}

impl<'a, D: DisplayServer> PointerGrab<'a, D> {
    pub fn acquire(display: &'a D, cursor: &CursorGuard<'_, D>) -> Result<Self, GrabError> {
        if !display.grab_pointer(cursor.id()) {
            return Err(GrabError::PointerGrab);
        }
        Ok(Self { display })
    }
}

impl<D: DisplayServer> Drop for PointerGrab<'_, D> {
    fn drop(&mut self) {
        log_and_ignore(self.display.ungrab_pointer(), "ungrab_pointer");
    }
}

/// Grab the pointer, wait for a click and return the deepest window under it.
///
/// The grab is released before returning and the cursor is freed after it,
/// on every path. A refused grab is reported as `GrabError::PointerGrab`
/// and nothing is waited for.
pub fn capture_click<D: DisplayServer>(display: &D) -> Result<Target, GrabError> {
    let cursor = CursorGuard::create(display)
        .ok_or_else(|| GrabError::no_color("could not create a pick cursor"))?;
    let root = display.root_window();

    let grab = PointerGrab::acquire(display, &cursor)?;
    log_warn(display.allow_events(), "allow_events");

    info!("Waiting for a click");
    let press = display
        .wait_for_button_press()
        .ok_or_else(|| GrabError::no_color("connection lost while waiting for a click"))?;
    debug!("Button press at {},{} over {:?}", press.x, press.y, press.child);

    let target = resolve_target(display, root, press.child, press.x, press.y).unwrap_or_else(|| {
        warn!("failed getting target win, targeting root");
        Target { window: root, x: press.x, y: press.y }
    });

    drop(grab);
    Ok(target)
}
