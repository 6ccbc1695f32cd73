//! Page Geometry
//!
//! Rectangles, page sizes and the mapping from source pixels to page
//! coordinates. Every coordinate here is top-down: `y` grows toward the
//! bottom of the page.

// == Rect ==
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the box covers no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

// == Page Geometry ==
/// A fixed page size with equal margins on every side, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageGeometry {
    /// A4 portrait with a 40pt margin.
    pub const A4: PageGeometry = PageGeometry {
        width: 595.28,
        height: 841.89,
        margin: 40.0,
    };

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    /// Lowest on-page Y a text baseline may occupy.
    pub fn text_limit(&self) -> f64 {
        self.height - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Number of content pages needed for an image `image_height` tall.
///
/// Always at least one.
pub fn page_count(image_height: f64, content_height: f64) -> usize {
    if image_height <= 0.0 || content_height <= 0.0 {
        return 1;
    }
    ((image_height / content_height).ceil() as usize).max(1)
}

// == Page Mapping ==
/// Position of a source element after pagination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Zero-based content page index
    pub page: usize,
    /// Top-down Y on that page, margin included
    pub y: f64,
}

/// Maps source-pixel offsets onto paginated page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMapping {
    pub scale: f64,
    pub margin: f64,
    pub content_height: f64,
}

impl PageMapping {
    /// Fits `source_width` pixels into the page's content width.
    pub fn new(geometry: &PageGeometry, source_width: f64) -> Self {
        let scale = if source_width > 0.0 {
            geometry.content_width() / source_width
        } else {
            0.0
        };
        Self {
            scale,
            margin: geometry.margin,
            content_height: geometry.content_height(),
        }
    }

    /// Places an element whose top sits `offset_top` source pixels below
    /// the root's top.
    pub fn place(&self, offset_top: f64) -> Placement {
        let scaled_top = offset_top * self.scale;
        let page = (scaled_top / self.content_height).floor();
        Placement {
            page: if page > 0.0 { page as usize } else { 0 },
            y: scaled_top.rem_euclid(self.content_height) + self.margin,
        }
    }

    /// Places a text run: its baseline is approximated as top + height.
    pub fn place_text(&self, offset_top: f64, height: f64) -> Placement {
        let mut placement = self.place(offset_top);
        placement.y += height * self.scale;
        placement
    }

    /// On-page X for a source offset from the root's left edge.
    pub fn x(&self, offset_left: f64) -> f64 {
        self.margin + offset_left * self.scale
    }

    pub fn length(&self, source: f64) -> f64 {
        source * self.scale
    }
}
