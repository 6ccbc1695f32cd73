//! Paginated Document
//!
//! Lays one tall raster across fixed-size pages and maps the tree's text and
//! links onto the same pages.

use super::geometry::{page_count, PageGeometry, PageMapping, Rect};
use super::raster::Raster;
use super::tree::RenderNode;
use super::ExportError;

/// CSS pixels to PDF points.
pub const PX_TO_PT: f64 = 0.75;

// == Document Model ==
#[derive(Debug, Clone, PartialEq)]
pub struct CoverPage {
    pub title: String,
    pub subtitle: String,
}

impl CoverPage {
    pub fn for_trip(destination: &str, days: usize) -> Self {
        Self {
            title: format!("Your Trip to {}", destination),
            subtitle: format!("{} Day Adventure", days),
        }
    }
}

/// Invisible, selectable text placed at its on-page baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    /// Top-down baseline
    pub y: f64,
    /// Points
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkOverlay {
    pub url: String,
    /// Top-down box on the page
    pub rect: Rect,
}

/// One slice of the content image plus the overlays that land on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentPage {
    /// Top-down Y of the image's top edge; negative past the first page
    pub image_y: f64,
    pub text: Vec<TextRun>,
    pub links: Vec<LinkOverlay>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub geometry: PageGeometry,
    pub cover: CoverPage,
    pub image: Raster,
    /// Image size on the page, in points
    pub image_width: f64,
    pub image_height: f64,
    pub pages: Vec<ContentPage>,
}

impl Document {
    /// Cover plus content pages.
    pub fn page_count(&self) -> usize {
        1 + self.pages.len()
    }
}

// == Composition ==
/// Slices `image` across pages and maps `root`'s text and links onto them.
///
/// `image` must be `root` rasterized at any magnification; only its aspect
/// ratio matters.
pub fn compose(
    root: &RenderNode,
    image: Raster,
    geometry: PageGeometry,
    cover: CoverPage,
) -> Result<Document, ExportError> {
    if root.rect.width <= 0.0 || image.width() == 0 {
        return Err(ExportError::Raster(
            "content has no visible area".to_string(),
        ));
    }

    let content_width = geometry.content_width();
    let content_height = geometry.content_height();
    let image_height = f64::from(image.height()) * content_width / f64::from(image.width());
    let count = page_count(image_height, content_height);

    let mut pages: Vec<ContentPage> = (0..count)
        .map(|i| ContentPage {
            image_y: geometry.margin - i as f64 * content_height,
            ..ContentPage::default()
        })
        .collect();

    let mapping = PageMapping::new(&geometry, root.rect.width);
    let origin = root.rect;

    for link in root.web_links() {
        let placed = mapping.place(link.rect.y - origin.y);
        let Some(page) = pages.get_mut(placed.page) else {
            continue;
        };
        page.links.push(LinkOverlay {
            url: link.href.to_string(),
            rect: Rect::new(
                mapping.x(link.rect.x - origin.x),
                placed.y,
                mapping.length(link.rect.width),
                mapping.length(link.rect.height),
            ),
        });
    }

    let text_limit = geometry.text_limit();
    for span in root.visible_text() {
        let placed = mapping.place_text(span.rect.y - origin.y, span.rect.height);
        if placed.y > text_limit {
            continue;
        }
        let Some(page) = pages.get_mut(placed.page) else {
            continue;
        };
        page.text.push(TextRun {
            text: span.text.to_string(),
            x: mapping.x(span.rect.x - origin.x),
            y: placed.y,
            font_size: span.font_size * PX_TO_PT,
        });
    }

    Ok(Document {
        geometry,
        cover,
        image,
        image_width: content_width,
        image_height,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::raster::CANVAS_BACKGROUND;
    use crate::compositor::tree::{Color, Visibility};

    const WHITE: Color = Color::rgb(255, 255, 255);

    fn geometry() -> PageGeometry {
        PageGeometry {
            width: 560.0,
            height: 780.0,
            margin: 40.0,
        }
    }

    fn cover() -> CoverPage {
        CoverPage::for_trip("Peru", 3)
    }

    /// A raster with the same aspect ratio as a `width` x `height` source.
    fn raster_for(width: f64, height: f64) -> Raster {
        Raster::filled(width as u32, height as u32, CANVAS_BACKGROUND).unwrap()
    }

    #[test]
    fn test_page_count_follows_image_height() {
        // source 600 px wide -> scale 0.8, P = 700pt = 875 source px
        for (source_height, expected) in [(437.5, 1), (875.0, 1), (876.25, 2), (2625.0, 3)] {
            let root = RenderNode::block(Rect::new(0.0, 0.0, 600.0, source_height), None);
            let image = raster_for(600.0 * 2.0, source_height * 2.0);
            let doc = compose(&root, image, geometry(), cover()).unwrap();
            assert_eq!(doc.pages.len(), expected, "height {}", source_height);
            assert_eq!(doc.page_count(), expected + 1);
        }
    }

    #[test]
    fn test_pages_offset_by_content_height() {
        let root = RenderNode::block(Rect::new(0.0, 0.0, 600.0, 2625.0), None);
        let doc = compose(&root, raster_for(600.0, 2625.0), geometry(), cover()).unwrap();

        let offsets: Vec<f64> = doc.pages.iter().map(|p| p.image_y).collect();
        assert_eq!(offsets, vec![40.0, -660.0, -1360.0]);
        assert!((doc.image_height - 2100.0).abs() < 1e-9);
        assert!((doc.image_width - 480.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_run_mapped_to_third_page() {
        let root = RenderNode::block(Rect::new(50.0, 100.0, 600.0, 2625.0), None).with_child(
            RenderNode::text(Rect::new(150.0, 2100.0, 200.0, 20.0), " Lima ", 16.0, WHITE),
        );
        let doc = compose(&root, raster_for(600.0, 2625.0), geometry(), cover()).unwrap();

        assert!(doc.pages[0].text.is_empty());
        assert!(doc.pages[1].text.is_empty());
        let run = &doc.pages[2].text[0];
        assert_eq!(run.text, "Lima");
        assert!((run.y - 256.0).abs() < 1e-9);
        assert!((run.x - 120.0).abs() < 1e-9);
        assert!((run.font_size - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_below_bottom_margin_dropped() {
        // scaled top 690 + height 16 puts the baseline at 746 > 740
        let root = RenderNode::block(Rect::new(0.0, 0.0, 600.0, 875.0), None).with_child(
            RenderNode::text(Rect::new(0.0, 862.5, 100.0, 20.0), "cut", 16.0, WHITE),
        );
        let doc = compose(&root, raster_for(600.0, 875.0), geometry(), cover()).unwrap();
        assert!(doc.pages[0].text.is_empty());
    }

    #[test]
    fn test_content_past_last_page_dropped() {
        // Child overflows the root, so its page index exceeds the page count
        let root = RenderNode::block(Rect::new(0.0, 0.0, 600.0, 875.0), None)
            .with_child(RenderNode::text(
                Rect::new(0.0, 1000.0, 100.0, 20.0),
                "overflow",
                16.0,
                WHITE,
            ))
            .with_child(RenderNode::link(
                Rect::new(0.0, 1000.0, 100.0, 20.0),
                "https://example.com",
            ));
        let doc = compose(&root, raster_for(600.0, 875.0), geometry(), cover()).unwrap();

        assert_eq!(doc.pages.len(), 1);
        assert!(doc.pages[0].text.is_empty());
        assert!(doc.pages[0].links.is_empty());
    }

    #[test]
    fn test_links_and_hidden_nodes() {
        let root = RenderNode::block(Rect::new(0.0, 0.0, 600.0, 875.0), None)
            .with_child(RenderNode::link(
                Rect::new(100.0, 100.0, 50.0, 10.0),
                "https://www.peru.travel",
            ))
            .with_child(RenderNode::link(
                Rect::new(0.0, 100.0, 50.0, 10.0),
                "mailto:info@peru.travel",
            ))
            .with_child(RenderNode::link(Rect::new(0.0, 100.0, 50.0, 10.0), "/about"))
            .with_child(
                RenderNode::text(Rect::new(0.0, 0.0, 100.0, 20.0), "secret", 16.0, WHITE)
                    .with_visibility(Visibility::Hidden),
            );
        let doc = compose(&root, raster_for(600.0, 875.0), geometry(), cover()).unwrap();

        let page = &doc.pages[0];
        assert!(page.text.is_empty());
        assert_eq!(page.links.len(), 1);
        let link = &page.links[0];
        assert_eq!(link.url, "https://www.peru.travel");
        assert!((link.rect.x - 120.0).abs() < 1e-9);
        assert!((link.rect.y - 120.0).abs() < 1e-9);
        assert!((link.rect.width - 40.0).abs() < 1e-9);
        assert!((link.rect.height - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_cover_text() {
        let cover = CoverPage::for_trip("Japan", 7);
        assert_eq!(cover.title, "Your Trip to Japan");
        assert_eq!(cover.subtitle, "7 Day Adventure");
    }
}
