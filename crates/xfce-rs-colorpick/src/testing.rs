use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use x11rb::protocol::xproto::{Colormap, Cursor, Window};

use crate::color::Rgb16;
use crate::display::{ButtonPress, ByteOrder, DisplayServer, PixelSnapshot, Translation};

pub const ROOT: Window = 1;
pub const COLORMAP: Colormap = 0x20;

struct Node {
    /// Absolute position on screen
    x: i16,
    y: i16,
    width: i16,
    height: i16,
    /// Stacking order, bottom first
    children: Vec<Window>,
    pixel: u32,
    depth: u8,
}

impl Node {
    fn new(x: i16, y: i16, width: i16, height: i16, pixel: u32) -> Self {
        Self { x, y, width, height, children: Vec::new(), pixel, depth: 24 }
    }
}

/// In-memory window tree standing in for an X server.
pub struct FakeDisplay {
    nodes: HashMap<Window, Node>,
    /// Windows a translation into fails, as if destroyed mid-walk
    broken: HashSet<Window>,
    palette: HashMap<u32, Rgb16>,
    /// Like a TrueColor visual: pixels with other bits set are rejected
    pixel_mask: Option<u32>,
    cursors: Vec<&'static str>,
    pub grant_grab: bool,
    pub press: Option<ButtonPress>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeDisplay {
    /// A 1920x1080 root with pixel 0 mapped to black.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT, Node::new(0, 0, 1920, 1080, 0));
        let mut palette = HashMap::new();
        palette.insert(0, Rgb16::default());
        Self {
            nodes,
            broken: HashSet::new(),
            palette,
            pixel_mask: Some(0x00ff_ffff),
            cursors: vec!["crosshair", "tcross"],
            grant_grab: true,
            press: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Add `window` under `parent` at (`x`, `y`) relative to the parent,
    /// on top of its siblings.
    #[allow(clippy::too_many_arguments)]
    pub fn add_window(
        &mut self,
        parent: Window,
        window: Window,
        x: i16,
        y: i16,
        width: i16,
        height: i16,
        pixel: u32,
    ) {
        let (px, py) = {
            let p = self.nodes.get_mut(&parent).expect("parent exists");
            p.children.push(window);
            (p.x, p.y)
        };
        self.nodes.insert(window, Node::new(px + x, py + y, width, height, pixel));
    }

    pub fn set_depth(&mut self, window: Window, depth: u8) {
        if let Some(node) = self.nodes.get_mut(&window) {
            node.depth = depth;
        }
    }

    pub fn set_pixel_mask(&mut self, mask: Option<u32>) {
        self.pixel_mask = mask;
    }

    pub fn set_color(&mut self, pixel: u32, color: Rgb16) {
        self.palette.insert(pixel, color);
    }

    pub fn break_window(&mut self, window: Window) {
        self.broken.insert(window);
    }

    pub fn only_cursors(&mut self, names: &[&'static str]) {
        self.cursors = names.to_vec();
    }

    /// Press at root coordinates, reporting the top-level child like the server does.
    pub fn click_at(&mut self, x: i16, y: i16) {
        let child = self.child_at(ROOT, x, y);
        self.press = Some(ButtonPress { event: ROOT, child, x, y });
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c == name)
    }

    fn record(&self, name: &str) {
        self.calls.borrow_mut().push(name.to_string());
    }

    fn child_at(&self, window: Window, x: i16, y: i16) -> Option<Window> {
        let node = self.nodes.get(&window)?;
        let (abs_x, abs_y) = (node.x + x, node.y + y);
        node.children.iter().rev().copied().find(|c| {
            let n = &self.nodes[c];
            abs_x >= n.x && abs_y >= n.y && abs_x < n.x + n.width && abs_y < n.y + n.height
        })
    }
}

impl DisplayServer for FakeDisplay {
    fn root_window(&self) -> Window {
        ROOT
    }

    fn default_colormap(&self) -> Colormap {
        COLORMAP
    }

    fn pixel_mask(&self) -> Option<u32> {
        self.pixel_mask
    }

    fn create_cursor(&self, name: &str) -> Option<Cursor> {
        self.record(&format!("create_cursor:{}", name));
        self.cursors.iter().position(|c| *c == name).map(|i| 0x100 + i as Cursor)
    }

    fn free_cursor(&self, _cursor: Cursor) -> bool {
        self.record("free_cursor");
        true
    }

    fn grab_pointer(&self, _cursor: Cursor) -> bool {
        self.record("grab_pointer");
        self.grant_grab
    }

    fn ungrab_pointer(&self) -> bool {
        self.record("ungrab_pointer");
        true
    }

    fn allow_events(&self) -> bool {
        self.record("allow_events");
        true
    }

    fn wait_for_button_press(&self) -> Option<ButtonPress> {
        self.record("wait_for_button_press");
        self.press
    }

    fn translate_coordinates(
        &self,
        src: Window,
        dst: Window,
        x: i16,
        y: i16,
    ) -> Option<Translation> {
        self.record("translate_coordinates");
        if self.broken.contains(&dst) || self.broken.contains(&src) {
            return None;
        }
        let s = self.nodes.get(&src)?;
        let d = self.nodes.get(&dst)?;
        let (dx, dy) = (s.x + x - d.x, s.y + y - d.y);
        Some(Translation { child: self.child_at(dst, dx, dy), x: dx, y: dy })
    }

    fn get_image(&self, window: Window, x: i16, y: i16) -> Option<PixelSnapshot> {
        self.record("get_image");
        let node = self.nodes.get(&window)?;
        let inside = x >= 0 && y >= 0 && x < node.width && y < node.height;
        if self.broken.contains(&window) || !inside {
            return None;
        }
        Some(PixelSnapshot {
            data: node.pixel.to_le_bytes().to_vec(),
            depth: node.depth,
            bits_per_pixel: 32,
            byte_order: ByteOrder::LsbFirst,
            bit_order: ByteOrder::LsbFirst,
        })
    }

    fn query_color(&self, colormap: Colormap, pixel: u32) -> Option<Rgb16> {
        self.record("query_color");
        if colormap != COLORMAP {
            return None;
        }
        if self.pixel_mask.is_some_and(|mask| pixel & !mask != 0) {
            return None;
        }
        self.palette.get(&pixel).copied()
    }
}
