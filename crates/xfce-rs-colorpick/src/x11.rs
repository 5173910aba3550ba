use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::cookie::VoidCookie;
use x11rb::cursor::Handle;
use x11rb::errors::{ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::xproto::{
    Allow, Colormap, ConnectionExt, Cursor, EventMask, GrabMode, GrabStatus, ImageFormat,
    ImageOrder, Screen, VisualClass, Window,
};
use x11rb::protocol::Event;
use x11rb::resource_manager::new_from_default;
use x11rb::rust_connection::RustConnection;

use crate::color::Rgb16;
use crate::display::{ButtonPress, ByteOrder, DisplayServer, PixelSnapshot, Translation};
use crate::error::{ErrorFilter, GrabError};

/// `DisplayServer` backed by an X11 connection.
pub struct X11Display {
    conn: RustConnection,
    screen_num: usize,
    root: Window,
    colormap: Colormap,
    pixel_mask: Option<u32>,
    filter: ErrorFilter,
}

impl X11Display {
    /// Connect to `display_name`, or `$DISPLAY` when `None`.
    pub fn connect(display_name: Option<&str>) -> Result<Self, GrabError> {
        Self::with_filter(display_name, ErrorFilter::new())
    }

    pub fn with_filter(
        display_name: Option<&str>,
        filter: ErrorFilter,
    ) -> Result<Self, GrabError> {
        let (conn, screen_num) = x11rb::connect(display_name)
            .map_err(|e| GrabError::Display { reason: e.to_string() })?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let colormap = screen.default_colormap;
        let pixel_mask = root_visual_mask(screen);

        info!("Connected to X11 screen {}, root {:#x}", screen_num, root);
        debug!("Default visual pixel mask: {:x?}", pixel_mask);
        Ok(Self { conn, screen_num, root, colormap, pixel_mask, filter })
    }

    /// Unwrap a reply, routing protocol errors through the filter.
    fn reply<T>(&self, request: &str, result: Result<T, ReplyError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(ReplyError::X11Error(e)) => {
                self.filter.handle(&e);
                None
            }
            Err(e) => {
                warn!("{} failed: {}", request, e);
                None
            }
        }
    }

    fn checked(
        &self,
        request: &str,
        cookie: Result<VoidCookie<'_, RustConnection>, ConnectionError>,
    ) -> bool {
        let result = cookie.map_err(ReplyError::from).and_then(|c| c.check());
        self.reply(request, result).is_some()
    }

    fn load_cursor(&self, name: &str) -> Result<Cursor, ReplyOrIdError> {
        let db = new_from_default(&self.conn)?;
        let handle = Handle::new(&self.conn, self.screen_num, &db)?.reply()?;
        handle.load_cursor(&self.conn, name)
    }

    fn pixmap_bits_per_pixel(&self, depth: u8) -> Option<u8> {
        self.conn
            .setup()
            .pixmap_formats
            .iter()
            .find(|f| f.depth == depth)
            .map(|f| f.bits_per_pixel)
    }
}

/// Red, green and blue bits of the default visual, for visuals whose
/// colormap decodes pixels by mask.
fn root_visual_mask(screen: &Screen) -> Option<u32> {
    let visual = screen
        .allowed_depths
        .iter()
        .flat_map(|d| d.visuals.iter())
        .find(|v| v.visual_id == screen.root_visual)?;

    if visual.class == VisualClass::TRUE_COLOR || visual.class == VisualClass::DIRECT_COLOR {
        Some(visual.red_mask | visual.green_mask | visual.blue_mask)
    } else {
        None
    }
}

fn byte_order(order: ImageOrder) -> ByteOrder {
    if order == ImageOrder::MSB_FIRST {
        ByteOrder::MsbFirst
    } else {
        ByteOrder::LsbFirst
    }
}

fn window_or_none(window: Window) -> Option<Window> {
    (window != x11rb::NONE).then_some(window)
}

impl DisplayServer for X11Display {
    fn root_window(&self) -> Window {
        self.root
    }

    fn default_colormap(&self) -> Colormap {
        self.colormap
    }

    fn pixel_mask(&self) -> Option<u32> {
        self.pixel_mask
    }

    fn create_cursor(&self, name: &str) -> Option<Cursor> {
        match self.load_cursor(name) {
            Ok(cursor) if cursor != x11rb::NONE => Some(cursor),
            Ok(_) => {
                debug!("Cursor {} not available", name);
                None
            }
            Err(ReplyOrIdError::X11Error(e)) => {
                self.filter.handle(&e);
                None
            }
            Err(e) => {
                warn!("Loading cursor {} failed: {}", name, e);
                None
            }
        }
    }

    fn free_cursor(&self, cursor: Cursor) -> bool {
        self.checked("FreeCursor", self.conn.free_cursor(cursor))
    }

    fn grab_pointer(&self, cursor: Cursor) -> bool {
        let result = self
            .conn
            .grab_pointer(
                false,
                self.root,
                EventMask::BUTTON_PRESS,
                GrabMode::SYNC,
                GrabMode::ASYNC,
                self.root,
                cursor,
                x11rb::CURRENT_TIME,
            )
            .map_err(ReplyError::from)
            .and_then(|c| c.reply());

        match self.reply("GrabPointer", result) {
            Some(reply) if reply.status == GrabStatus::SUCCESS => true,
            Some(reply) => {
                debug!("Pointer grab refused: {:?}", reply.status);
                false
            }
            None => false,
        }
    }

    fn ungrab_pointer(&self) -> bool {
        let ok = self.checked("UngrabPointer", self.conn.ungrab_pointer(x11rb::CURRENT_TIME));
        ok && self.conn.flush().is_ok()
    }

    fn allow_events(&self) -> bool {
        let cookie = self.conn.allow_events(Allow::SYNC_POINTER, x11rb::CURRENT_TIME);
        let ok = self.checked("AllowEvents", cookie);
        ok && self.conn.flush().is_ok()
    }

    fn wait_for_button_press(&self) -> Option<ButtonPress> {
        loop {
            match self.conn.wait_for_event() {
                Ok(Event::ButtonPress(e)) if e.event == self.root => {
                    return Some(ButtonPress {
                        event: e.event,
                        child: window_or_none(e.child),
                        x: e.event_x,
                        y: e.event_y,
                    });
                }
                Ok(Event::Error(e)) => {
                    self.filter.handle(&e);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Lost X11 connection while waiting for a click: {}", e);
                    return None;
                }
            }
        }
    }

    fn translate_coordinates(
        &self,
        src: Window,
        dst: Window,
        x: i16,
        y: i16,
    ) -> Option<Translation> {
        let result = self
            .conn
            .translate_coordinates(src, dst, x, y)
            .map_err(ReplyError::from)
            .and_then(|c| c.reply());
        let reply = self.reply("TranslateCoordinates", result)?;

        if !reply.same_screen {
            debug!("{:#x} and {:#x} are on different screens", src, dst);
            return None;
        }
        Some(Translation {
            child: window_or_none(reply.child),
            x: reply.dst_x,
            y: reply.dst_y,
        })
    }

    fn get_image(&self, window: Window, x: i16, y: i16) -> Option<PixelSnapshot> {
        let result = self
            .conn
            .get_image(ImageFormat::Z_PIXMAP, window, x, y, 1, 1, !0)
            .map_err(ReplyError::from)
            .and_then(|c| c.reply());
        let reply = self.reply("GetImage", result)?;

        let Some(bits_per_pixel) = self.pixmap_bits_per_pixel(reply.depth) else {
            warn!("No pixmap format for depth {}", reply.depth);
            return None;
        };
        let setup = self.conn.setup();
        Some(PixelSnapshot {
            data: reply.data,
            depth: reply.depth,
            bits_per_pixel,
            byte_order: byte_order(setup.image_byte_order),
            bit_order: byte_order(setup.bitmap_format_bit_order),
        })
    }

    fn query_color(&self, colormap: Colormap, pixel: u32) -> Option<Rgb16> {
        let result = self
            .conn
            .query_colors(colormap, &[pixel])
            .map_err(ReplyError::from)
            .and_then(|c| c.reply());
        let reply = self.reply("QueryColors", result)?;

        reply.colors.first().map(|c| Rgb16::new(c.red, c.green, c.blue))
    }
}
