use tracing::debug;

use crate::color::Rgb16;
use crate::display::{ByteOrder, DisplayServer, PixelSnapshot, Target};
use crate::error::GrabError;

impl PixelSnapshot {
    /// The raw value of the first pixel, masked to the image depth.
    pub fn pixel(&self) -> Option<u32> {
        let first = *self.data.first()?;
        let raw = match self.bits_per_pixel {
            1 => u32::from(match self.bit_order {
                ByteOrder::LsbFirst => first & 0x01,
                ByteOrder::MsbFirst => first >> 7,
            }),
            4 => u32::from(match self.byte_order {
                ByteOrder::LsbFirst => first & 0x0f,
                ByteOrder::MsbFirst => first >> 4,
            }),
            8 | 16 | 24 | 32 => {
                let bytes = self.data.get(..usize::from(self.bits_per_pixel / 8))?;
                let fold = |acc: u32, b: &u8| (acc << 8) | u32::from(*b);
                match self.byte_order {
                    ByteOrder::LsbFirst => bytes.iter().rev().fold(0, fold),
                    ByteOrder::MsbFirst => bytes.iter().fold(0, fold),
                }
            }
            _ => return None,
        };

        if self.depth < 32 && self.depth != self.bits_per_pixel {
            Some(raw & ((1u32 << self.depth) - 1))
        } else {
            Some(raw)
        }
    }
}

/// Read the pixel at `target` and look it up in the default colormap.
///
/// Bits the default colormap does not decode, such as the alpha byte of a
/// depth-32 window, are cleared before the lookup.
pub fn sample_color<D: DisplayServer>(display: &D, target: &Target) -> Result<Rgb16, GrabError> {
    let raw = {
        let snapshot = display.get_image(target.window, target.x, target.y).ok_or_else(|| {
            GrabError::no_color(format!(
                "no image of {:#x} at {},{}",
                target.window, target.x, target.y
            ))
        })?;
        snapshot.pixel().ok_or_else(|| {
            let bpp = snapshot.bits_per_pixel;
            GrabError::no_color(format!("unsupported pixel format ({} bpp)", bpp))
        })?
    };
    let pixel = display.pixel_mask().map_or(raw, |mask| raw & mask);
    debug!("Raw pixel {:#x} (lookup {:#x}) from window {:#x}", raw, pixel, target.window);

    display
        .query_color(display.default_colormap(), pixel)
        .ok_or_else(|| GrabError::no_color(format!("pixel {:#x} not in colormap", pixel)))
}
