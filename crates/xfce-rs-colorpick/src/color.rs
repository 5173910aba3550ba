use serde::Deserialize;

/// A colormap entry, 16 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb16 {
    pub fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// Drop the low byte of each channel.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        ((self.red >> 8) as u8, (self.green >> 8) as u8, (self.blue >> 8) as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Hex,
    Decimal,
}

/// How a picked color is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorStyle {
    pub format: OutputFormat,
    /// Prefix hex output with '#'. Ignored for decimal.
    pub prefix: bool,
}

impl ColorStyle {
    pub fn render(&self, color: Rgb16) -> String {
        let (r, g, b) = color.to_rgb8();
        match self.format {
            OutputFormat::Hex if self.prefix => format!("#{:02x}{:02x}{:02x}", r, g, b),
            OutputFormat::Hex => format!("{:02x}{:02x}{:02x}", r, g, b),
            OutputFormat::Decimal => format!("{},{},{}", r, g, b),
        }
    }
}
