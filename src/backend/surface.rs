//! Drawing surface capability.
//!
//! The engine never talks to a graphics API directly. Entities draw through a
//! [`Surface`], which a window host implements on top of its backend (raylib,
//! or the in-memory [`RecordingSurface`](super::headless::RecordingSurface)).

use crate::error::EngineError;
use crate::geometry::{Rect, Vector};

/// RGBA colour with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, EngineError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || EngineError::InvalidColor(s.to_string());
        if !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize, width: usize| -> Result<u8, EngineError> {
            let digits = &hex[i..i + width];
            let value = u8::from_str_radix(digits, 16).map_err(|_| invalid())?;
            // Short form repeats the nibble: "f" -> 0xff.
            Ok(if width == 1 { value * 17 } else { value })
        };

        match hex.len() {
            3 => Ok(Color::rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            6 => Ok(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            8 => Ok(Color::rgba(
                channel(0, 2)?,
                channel(2, 2)?,
                channel(4, 2)?,
                channel(6, 2)?,
            )),
            _ => Err(invalid()),
        }
    }
}

/// How the ends of a stroked line are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    pub color: Color,
    pub cap: LineCap,
}

/// A font file and a pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub path: String,
    pub size: f64,
}

impl FontSpec {
    pub fn new(path: impl Into<String>, size: f64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Measured extent of a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    /// Ascent plus descent.
    pub height: f64,
}

/// Decoded image pixels, tightly packed RGBA8, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(EngineError::InvalidImage(format!(
                "{width}x{height} image needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Image of the given size filled with one colour.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let pixels = [color.r, color.g, color.b, color.a]
            .repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Color::rgba(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }
}

/// Opaque id of an image uploaded to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

/// Drawing primitives the engine and its entities need.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Paint the whole surface with one colour.
    fn clear(&mut self, color: Color) {
        let r = Rect::from_size(self.width(), self.height());
        self.fill_rect(r, color);
    }

    /// Upload decoded pixels and get a handle usable with [`Surface::draw_image`].
    fn load_image(&mut self, image: &ImageData) -> Result<ImageHandle, EngineError>;

    fn draw_image(&mut self, image: ImageHandle, dest: Rect);

    fn stroke_line(&mut self, from: Vector, to: Vector, style: &LineStyle);

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> TextMetrics;

    /// Draw `text` with its baseline starting at `baseline`.
    fn fill_text(&mut self, text: &str, baseline: Vector, font: &FontSpec, color: Color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex_forms() {
        assert_eq!(Color::from_hex("#000").unwrap(), Color::BLACK);
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
        assert_eq!(
            Color::from_hex("#00FF00").unwrap(),
            Color::rgb(0, 255, 0)
        );
        assert_eq!(
            Color::from_hex("11223344").unwrap(),
            Color::rgba(0x11, 0x22, 0x33, 0x44)
        );
    }

    #[test]
    fn test_color_from_hex_rejects_garbage() {
        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_image_data_size_checked() {
        assert!(ImageData::new(2, 2, vec![0; 16]).is_ok());
        assert!(ImageData::new(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_image_pixels() {
        let mut img = ImageData::filled(3, 2, Color::BLACK);
        img.set_pixel(2, 1, Color::WHITE);
        assert_eq!(img.pixel(2, 1), Some(Color::WHITE));
        assert_eq!(img.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(img.pixel(3, 0), None);
    }
}
