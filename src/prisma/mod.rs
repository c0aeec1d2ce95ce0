//! PRISMA flow diagram generator.
//!
//! Validated review counts are laid out as boxes, arrows and stage labels on
//! a fixed grid, rendered to an in-memory raster and exported as
//! `prisma_diagram.png`.

pub mod counts;
pub mod export;
pub mod layout;
pub mod render;

use std::path::{Path, PathBuf};

pub use counts::{InvalidCounts, ReviewCounts};
pub use export::{DIAGRAM_FILE_NAME, encode_diagram, export, write_diagram};
pub use layout::{DiagramSpec, layout};
pub use render::{RasterImage, render, render_svg, render_with_fonts};

/// Errors produced while generating a diagram. All are terminal for the call.
#[derive(Debug, thiserror::Error)]
pub enum PrismaError {
    #[error(transparent)]
    InvalidCounts(#[from] InvalidCounts),

    #[error("render failed: {0}")]
    Render(String),

    #[error("write to {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrismaError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

impl crate::error::ErrorCode for PrismaError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCounts(_) => "E_INVALID_COUNTS",
            Self::Render(_) => "E_RENDER",
            Self::Io { .. } => "E_IO",
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
