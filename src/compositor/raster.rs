//! Rasterization
//!
//! Turns a render tree into one RGB image at a fixed magnification.

use super::geometry::Rect;
use super::tree::{Color, NodeKind, RenderNode, Visibility};
use super::ExportError;

/// Largest image, in pixels, an export may allocate.
pub const MAX_RASTER_PIXELS: u64 = 40_000_000;

/// Canvas color behind all content.
pub const CANVAS_BACKGROUND: Color = Color::rgb(0x1e, 0x29, 0x3b);

// == Raster ==
/// A packed 8-bit RGB image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Allocates a `width` x `height` image filled with `background`.
    pub fn filled(width: u32, height: u32, background: Color) -> Result<Self, ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::Raster(
                "content has no visible area".to_string(),
            ));
        }
        let pixels = u64::from(width) * u64::from(height);
        if pixels > MAX_RASTER_PIXELS {
            return Err(ExportError::TooLarge {
                pixels,
                limit: MAX_RASTER_PIXELS,
            });
        }

        let mut data = Vec::with_capacity(pixels as usize * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&[background.r, background.g, background.b]);
        }
        Ok(Self {
            width,
            height,
            pixels: data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some(Color::rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Paints a rectangle given in pixels, clipped to the image.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + width).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((y + height).ceil().max(0.0) as u32).min(self.height);

        for row in y0..y1 {
            let start = (row as usize * self.width as usize + x0 as usize) * 3;
            for col in 0..x1.saturating_sub(x0) as usize {
                let i = start + col * 3;
                self.pixels[i] = color.r;
                self.pixels[i + 1] = color.g;
                self.pixels[i + 2] = color.b;
            }
        }
    }
}

// == Rasterizer ==
/// Paints a render tree. Called on the blocking pool.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, root: &RenderNode, magnification: f64) -> Result<Raster, ExportError>;
}

/// Paints block backgrounds and draws text as solid bars.
///
/// Glyph shapes are not drawn; the selectable text layer carries the words.
#[derive(Debug, Clone, Default)]
pub struct SoftwareRasterizer;

impl SoftwareRasterizer {
    fn paint(&self, raster: &mut Raster, node: &RenderNode, origin: Rect, magnification: f64) {
        if matches!(node.kind, NodeKind::Script | NodeKind::Style)
            || node.visibility == Visibility::None
        {
            return;
        }

        let x = (node.rect.x - origin.x) * magnification;
        let y = (node.rect.y - origin.y) * magnification;
        let width = node.rect.width * magnification;
        let height = node.rect.height * magnification;

        if node.visibility == Visibility::Visible {
            match &node.kind {
                NodeKind::Block {
                    background: Some(color),
                } => raster.fill_rect(x, y, width, height, *color),
                NodeKind::Text {
                    content,
                    font_size,
                    color,
                } if *font_size > 0.0 && !content.trim().is_empty() => {
                    // x-height bar centered in the line box
                    let bar = (font_size * 0.5 * magnification).min(height);
                    raster.fill_rect(x, y + (height - bar) / 2.0, width, bar, *color);
                }
                _ => {}
            }
        }

        for child in &node.children {
            self.paint(raster, child, origin, magnification);
        }
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(&self, root: &RenderNode, magnification: f64) -> Result<Raster, ExportError> {
        let width = (root.rect.width * magnification).ceil();
        let height = (root.rect.height * magnification).ceil();
        if !(width.is_finite() && height.is_finite()) || width < 1.0 || height < 1.0 {
            return Err(ExportError::Raster(
                "content has no visible area".to_string(),
            ));
        }
        if width * height > MAX_RASTER_PIXELS as f64 {
            return Err(ExportError::TooLarge {
                pixels: (width * height) as u64,
                limit: MAX_RASTER_PIXELS,
            });
        }

        let mut raster = Raster::filled(width as u32, height as u32, CANVAS_BACKGROUND)?;
        self.paint(&mut raster, root, root.rect, magnification);
        Ok(raster)
    }
}
