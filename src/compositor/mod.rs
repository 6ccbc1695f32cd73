//! Document Compositor
//!
//! Exports a render tree as a paginated PDF: a cover page, then one tall
//! raster sliced across fixed-size pages with an invisible text layer and
//! clickable link regions on top.

mod document;
mod geometry;
mod layout;
mod pdf;
mod raster;
mod tree;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

pub use document::{compose, ContentPage, CoverPage, Document, LinkOverlay, TextRun, PX_TO_PT};
pub use geometry::{page_count, PageGeometry, PageMapping, Placement, Rect};
pub use layout::{layout_plan, wrap, LAYOUT_WIDTH};
pub use pdf::render;
pub use raster::{Raster, Rasterizer, SoftwareRasterizer, CANVAS_BACKGROUND, MAX_RASTER_PIXELS};
pub use tree::{is_web_url, Color, LinkSpan, NodeKind, RenderNode, TextSpan, Visibility};

use crate::planner::{DestinationSuggestion, TravelPlan};

/// Rasterization scale relative to source pixels.
pub const MAGNIFICATION: f64 = 2.0;

// == Export Error ==
#[derive(Error, Debug)]
pub enum ExportError {
    /// Another export holds the compositor
    #[error("An export is already in progress")]
    Busy,

    #[error("Rasterization failed: {0}")]
    Raster(String),

    #[error("Content too large to export: {pixels} pixels (limit {limit})")]
    TooLarge { pixels: u64, limit: u64 },

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Clears the busy flag when dropped, whatever the export outcome.
///
/// Owned so it can travel with the render work onto the blocking pool.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// == Document Compositor ==
/// Serializes exports and runs the rendering work off the async runtime.
pub struct DocumentCompositor {
    rasterizer: Arc<dyn Rasterizer>,
    geometry: PageGeometry,
    busy: Arc<AtomicBool>,
}

impl DocumentCompositor {
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self::with_geometry(rasterizer, PageGeometry::A4)
    }

    pub fn with_geometry(rasterizer: Arc<dyn Rasterizer>, geometry: PageGeometry) -> Self {
        Self {
            rasterizer,
            geometry,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Renders `root` behind `cover` and returns the PDF bytes.
    ///
    /// Fails with [`ExportError::Busy`] while another export runs. The
    /// compositor stays busy until the render finishes, even if the caller
    /// stops waiting for it.
    pub async fn export(&self, root: RenderNode, cover: CoverPage) -> Result<Vec<u8>, ExportError> {
        let guard = BusyGuard::acquire(&self.busy).ok_or(ExportError::Busy)?;

        let rasterizer = self.rasterizer.clone();
        let geometry = self.geometry;
        let result = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let image = rasterizer.rasterize(&root, MAGNIFICATION)?;
            let document = compose(&root, image, geometry, cover)?;
            let bytes = render(&document)?;
            Ok::<_, ExportError>((bytes, document.page_count()))
        })
        .await
        .map_err(|e| ExportError::Raster(format!("render task failed: {}", e)))
        .and_then(|inner| inner);

        match result {
            Ok((bytes, pages)) => {
                info!("Exported {} pages ({} bytes)", pages, bytes.len());
                Ok(bytes)
            }
            Err(e) => {
                error!("Export failed: {}", e);
                Err(e)
            }
        }
    }

    /// Lays out and exports a travel plan.
    pub async fn export_plan(
        &self,
        plan: &TravelPlan,
        destination: &DestinationSuggestion,
    ) -> Result<Vec<u8>, ExportError> {
        let root = layout_plan(plan, destination);
        let cover = CoverPage::for_trip(&destination.name, plan.day_count());
        self.export(root, cover).await
    }
}

/// Download name for an exported plan.
pub fn export_file_name(destination: &str) -> String {
    format!("trip-to-{}.pdf", destination)
}
