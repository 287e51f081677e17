//! Serializing rendered images to PNG and saving them.

use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageFormat, RgbImage};
use tracing::info;

use crate::error::Result;
use crate::render::RenderedImage;

/// Encoded image bytes and the name they should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Writes the artifact into `directory`, creating it if needed, and
    /// returns the full path.
    pub fn save_to(&self, directory: impl AsRef<Path>) -> Result<PathBuf> {
        let directory = directory.as_ref();
        if !directory.exists() {
            fs::create_dir_all(directory)?;
        }
        let path = directory.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "saved QR image");
        Ok(path)
    }
}

/// Encodes `image` as PNG.
///
/// # Errors
///
/// [`QrError::ExportFailure`](crate::QrError::ExportFailure) if the codec fails.
pub fn export_png(image: &RenderedImage, file_name: impl Into<String>) -> Result<ExportArtifact> {
    let mut bytes = Vec::new();
    write_png(image.image(), &mut Cursor::new(&mut bytes))?;
    Ok(ExportArtifact {
        file_name: file_name.into(),
        bytes,
    })
}

fn write_png<W: Write + Seek>(image: &RgbImage, out: &mut W) -> Result<()> {
    image.write_to(out, ImageFormat::Png)?;
    Ok(())
}

/// An export bound to the image that was current when it was requested.
///
/// Later generations do not affect a job that has already been handed out.
#[derive(Debug, Clone)]
pub struct ExportJob {
    image: Arc<RenderedImage>,
    file_name: String,
}

impl ExportJob {
    pub fn new(image: Arc<RenderedImage>, file_name: impl Into<String>) -> Self {
        Self {
            image,
            file_name: file_name.into(),
        }
    }

    pub fn image(&self) -> &RenderedImage {
        &self.image
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn run(&self) -> Result<ExportArtifact> {
        export_png(&self.image, self.file_name.as_str())
    }
}
