//! The window-system operations the picker needs, as one seam.
//!
//! `X11Display` is the production implementation. Every call reports failure
//! as an absent result; protocol errors have already been through the
//! connection's `ErrorFilter` by the time the caller sees `None`.

use x11rb::protocol::xproto::{Colormap, Cursor, Window};

use crate::color::Rgb16;

/// A button press delivered to the root window during the grab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPress {
    /// Window the event was delivered to
    pub event: Window,
    /// Child of `event` under the pointer, if any
    pub child: Option<Window>,
    /// Pointer position relative to `event`
    pub x: i16,
    pub y: i16,
}

/// Reply to a coordinate translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    /// Child of the destination window containing the point, if any
    pub child: Option<Window>,
    pub x: i16,
    pub y: i16,
}

/// A window and a position relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub window: Window,
    pub x: i16,
    pub y: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LsbFirst,
    MsbFirst,
}

/// Raw Z-pixmap bytes of a 1x1 image, plus what is needed to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSnapshot {
    pub data: Vec<u8>,
    pub depth: u8,
    pub bits_per_pixel: u8,
    pub byte_order: ByteOrder,
    pub bit_order: ByteOrder,
}

pub trait DisplayServer {
    fn root_window(&self) -> Window;

    fn default_colormap(&self) -> Colormap;

    /// Bits of a pixel the default colormap understands, when it decodes
    /// pixels by red/green/blue masks. Other bits (alpha from a depth-32
    /// window) must be cleared before `query_color`.
    fn pixel_mask(&self) -> Option<u32>;

    /// Create a cursor by theme or core cursor font name.
    fn create_cursor(&self, name: &str) -> Option<Cursor>;

    fn free_cursor(&self, cursor: Cursor) -> bool;

    /// Synchronous, button-press-only grab of the pointer on the root window.
    /// Returns whether the server granted it.
    fn grab_pointer(&self, cursor: Cursor) -> bool;

    fn ungrab_pointer(&self) -> bool;

    /// Release the events held by a synchronous grab.
    fn allow_events(&self) -> bool;

    /// Block until a button press arrives on the root window.
    fn wait_for_button_press(&self) -> Option<ButtonPress>;

    fn translate_coordinates(
        &self,
        src: Window,
        dst: Window,
        x: i16,
        y: i16,
    ) -> Option<Translation>;

    /// Fetch a 1x1 image of `window` at (`x`, `y`), all planes.
    fn get_image(&self, window: Window, x: i16, y: i16) -> Option<PixelSnapshot>;

    fn query_color(&self, colormap: Colormap, pixel: u32) -> Option<Rgb16>;
}
