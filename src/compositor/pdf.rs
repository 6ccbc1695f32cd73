//! PDF Writer
//!
//! Serializes a composed [`Document`] with lopdf. Model coordinates are
//! top-down; they are flipped into PDF user space here and nowhere else.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, ObjectId, Stream};

use super::document::{ContentPage, CoverPage, Document};
use super::geometry::PageGeometry;
use super::tree::Color;
use super::ExportError;

const COVER_FILL: Color = Color::rgb(0x0f, 0x17, 0x2a);
const COVER_TITLE: Color = Color::rgb(0xe2, 0xe8, 0xf0);
const COVER_SUBTITLE: Color = Color::rgb(0x94, 0xa3, 0xb8);
const TITLE_SIZE: f32 = 32.0;
const SUBTITLE_SIZE: f32 = 18.0;

/// Average Helvetica advance width, in ems, used to center cover text.
const AVG_ADVANCE: f32 = 0.52;
const AVG_ADVANCE_BOLD: f32 = 0.56;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const IMAGE: &str = "Im1";

/// Renders `document` as PDF bytes: a cover page then one page per slice.
pub fn render(document: &Document) -> Result<Vec<u8>, ExportError> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let image = &document.image;
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.width()),
            "Height" => i64::from(image.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        image.pixels().to_vec(),
    ));

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
        "XObject" => dictionary! {
            IMAGE => image_id,
        },
    });

    let geometry = document.geometry;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        (geometry.width as f32).into(),
        (geometry.height as f32).into(),
    ];

    let mut kids: Vec<Object> = Vec::with_capacity(document.page_count());

    // == Cover ==
    let cover = cover_content(&document.cover, &geometry);
    let cover_id = add_page(&mut doc, pages_id, cover, Vec::new())?;
    kids.push(cover_id.into());

    // == Content Pages ==
    for page in &document.pages {
        let content = page_content(page, document);
        let annots: Vec<Object> = page
            .links
            .iter()
            .map(|link| {
                let x1 = link.rect.x as f32;
                let x2 = link.rect.right() as f32;
                let top = flip(&geometry, link.rect.y);
                let bottom = flip(&geometry, link.rect.bottom());
                doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => vec![x1.into(), bottom.into(), x2.into(), top.into()],
                    "Border" => vec![0.into(), 0.into(), 0.into()],
                    "A" => dictionary! {
                        "S" => "URI",
                        "URI" => Object::string_literal(link.url.as_str()),
                    },
                })
                .into()
            })
            .collect();
        let page_id = add_page(&mut doc, pages_id, content, annots)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn add_page(
    doc: &mut lopdf::Document,
    pages_id: ObjectId,
    content: Content,
    annots: Vec<Object>,
) -> Result<ObjectId, ExportError> {
    let encoded = content
        .encode()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let mut page = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    };
    if !annots.is_empty() {
        page.set("Annots", annots);
    }
    Ok(doc.add_object(page))
}

/// Converts a top-down Y to PDF's bottom-up space.
fn flip(geometry: &PageGeometry, y: f64) -> f32 {
    (geometry.height - y) as f32
}

fn set_fill(ops: &mut Vec<Operation>, color: Color) {
    let [r, g, b] = color.unit();
    ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
}

fn centered_text(
    ops: &mut Vec<Operation>,
    geometry: &PageGeometry,
    text: &str,
    font: &str,
    size: f32,
    advance: f32,
    baseline: f64,
) {
    let width = text.chars().count() as f32 * size * advance;
    let x = (geometry.width as f32 - width) / 2.0;
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new(
        "Td",
        vec![x.max(0.0).into(), flip(geometry, baseline).into()],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(win_ansi(text))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn cover_content(cover: &CoverPage, geometry: &PageGeometry) -> Content {
    let mut ops = Vec::new();
    set_fill(&mut ops, COVER_FILL);
    ops.push(Operation::new(
        "re",
        vec![
            0.into(),
            0.into(),
            (geometry.width as f32).into(),
            (geometry.height as f32).into(),
        ],
    ));
    ops.push(Operation::new("f", vec![]));

    let middle = geometry.height / 2.0;
    set_fill(&mut ops, COVER_TITLE);
    centered_text(
        &mut ops,
        geometry,
        &cover.title,
        FONT_BOLD,
        TITLE_SIZE,
        AVG_ADVANCE_BOLD,
        middle - 20.0,
    );
    set_fill(&mut ops, COVER_SUBTITLE);
    centered_text(
        &mut ops,
        geometry,
        &cover.subtitle,
        FONT_REGULAR,
        SUBTITLE_SIZE,
        AVG_ADVANCE,
        middle + 10.0,
    );
    Content { operations: ops }
}

fn page_content(page: &ContentPage, document: &Document) -> Content {
    let geometry = &document.geometry;
    let margin = geometry.margin as f32;
    let mut ops = Vec::new();

    // Image slice, clipped to the content area
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "re",
        vec![
            margin.into(),
            margin.into(),
            (geometry.content_width() as f32).into(),
            (geometry.content_height() as f32).into(),
        ],
    ));
    ops.push(Operation::new("W", vec![]));
    ops.push(Operation::new("n", vec![]));
    let image_bottom = flip(geometry, page.image_y + document.image_height);
    ops.push(Operation::new(
        "cm",
        vec![
            (document.image_width as f32).into(),
            0.into(),
            0.into(),
            (document.image_height as f32).into(),
            margin.into(),
            image_bottom.into(),
        ],
    ));
    ops.push(Operation::new("Do", vec![IMAGE.into()]));
    ops.push(Operation::new("Q", vec![]));

    // Invisible text layer
    if !page.text.is_empty() {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tr", vec![3.into()]));
        for run in &page.text {
            ops.push(Operation::new(
                "Tf",
                vec![FONT_REGULAR.into(), (run.font_size as f32).into()],
            ));
            ops.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    (run.x as f32).into(),
                    flip(geometry, run.y).into(),
                ],
            ));
            ops.push(Operation::new(
                "Tj",
                vec![Object::string_literal(win_ansi(&run.text))],
            ));
        }
        ops.push(Operation::new("ET", vec![]));
    }

    Content { operations: ops }
}

/// Encodes text for the standard fonts; characters outside Latin-1 become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
