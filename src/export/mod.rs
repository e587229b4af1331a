//! Printable export of the weekly grid.

mod page;
mod pdf;
mod surface;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use self::page::{PageExporter, PageGeometry};
use self::pdf::PdfSurface;
use crate::render::{RenderFrame, Renderer};
use crate::schedule::dated_file_name;

/// Render the page to PDF bytes.
pub fn render_pdf(frame: &RenderFrame<'_>, generated_at: NaiveDateTime) -> Result<Vec<u8>> {
    let geometry = PageGeometry::default();
    let mut surface = PdfSurface::new(geometry.page_width, geometry.page_height);
    PageExporter::new(&mut surface, geometry, generated_at).render(frame);
    surface.finish("Weekly Availability Schedule")
}

/// Write `availability-schedule-YYYY-MM-DD.pdf` inside `dir`.
///
/// The whole document is built in memory first, so a failed render never
/// leaves a partial file behind.
pub fn export_pdf(frame: &RenderFrame<'_>, dir: &Path, generated_at: NaiveDateTime) -> Result<PathBuf> {
    let bytes = render_pdf(frame, generated_at).context("Failed to render PDF")?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let file_path = dir.join(dated_file_name("availability-schedule", generated_at.date(), "pdf"));
    fs::write(&file_path, bytes)
        .with_context(|| format!("Failed to write {}", file_path.display()))?;

    info!("exported PDF to {}", file_path.display());
    Ok(file_path)
}
