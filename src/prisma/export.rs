//! Export service: counts → layout → raster → `prisma_diagram.png`.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::counts::ReviewCounts;
use super::{PrismaError, layout, render};

pub const DIAGRAM_FILE_NAME: &str = "prisma_diagram.png";

/// Render `counts` and write the PNG into `destination_dir`.
///
/// The directory is created if missing. The image is fully encoded in memory
/// and then moved over the final path with a single rename, so readers never
/// observe a partial file. An existing diagram is overwritten.
///
/// # Errors
///
/// Returns [`PrismaError::Render`] if rasterization fails and
/// [`PrismaError::Io`] if the directory or file cannot be written.
pub fn export(counts: &ReviewCounts, destination_dir: &Path) -> Result<PathBuf, PrismaError> {
    let png = encode_diagram(counts)?;
    write_diagram(destination_dir, &png)
}

/// Lay out, rasterize and PNG-encode `counts` without touching the filesystem.
///
/// # Errors
///
/// Returns [`PrismaError::Render`] if rasterization or encoding fails.
pub fn encode_diagram(counts: &ReviewCounts) -> Result<Vec<u8>, PrismaError> {
    let spec = layout::layout(counts);
    let image = render::render(&spec)?;
    let png = image.encode_png()?;
    tracing::debug!(width = image.width(), height = image.height(), bytes = png.len(), "PRISMA diagram encoded");
    Ok(png)
}

/// Write already-encoded PNG bytes to `destination_dir/prisma_diagram.png`.
///
/// # Errors
///
/// Returns [`PrismaError::Io`] if the directory or file cannot be written.
pub fn write_diagram(destination_dir: &Path, png: &[u8]) -> Result<PathBuf, PrismaError> {
    std::fs::create_dir_all(destination_dir).map_err(|source| PrismaError::io(destination_dir, source))?;

    let target = destination_dir.join(DIAGRAM_FILE_NAME);
    write_atomic(&target, png)?;

    tracing::info!(path = %target.display(), bytes = png.len(), "PRISMA diagram written");
    Ok(target)
}

fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), PrismaError> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".prisma_diagram")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| PrismaError::io(dir, source))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|source| PrismaError::io(tmp.path(), source))?;
    tmp.persist(target)
        .map_err(|e| PrismaError::io(target, e.error))?;
    Ok(())
}
