//! # Image Resize Module
//!
//! Questo modulo gestisce il ridimensionamento **in-process** dei PNG prima
//! della compressione, usando la crate `image`.
//!
//! ## Caratteristiche
//! - **Percentuale uniforme**: Entrambe le dimensioni scalate a `floor(d * pct / 100)`
//! - **Filtro Lanczos3**: Miglior qualità per il downscaling fotografico
//! - **Scrittura atomica**: Encode su file temporaneo nella stessa directory,
//!   poi rename sopra l'originale
//! - **Dimensione minima**: Mai sotto 1 pixel, anche con percentuali estreme
//!
//! ## Gestione errori
//! Un PNG corrotto o troncato fallisce in decodifica: l'errore è confinato al
//! singolo file (`OptimizeError::Image`), l'originale resta intatto e il
//! batch prosegue con gli altri file.

use crate::error::OptimizeError;
use image::imageops::FilterType;
use image::{GenericImageView, ImageOutputFormat};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// In-process resize stage, applied before any external tool runs
pub struct ResizeStage {
    percent: u8,
}

impl ResizeStage {
    /// # Arguments
    /// - `percent`: Target size as a percentage of the original (1-100)
    pub fn new(percent: u8) -> Self {
        Self { percent }
    }

    /// Resize the file in place, returning the new dimensions.
    ///
    /// Decoding and re-encoding are CPU-bound, so the work runs on the
    /// blocking thread pool instead of stalling the async workers.
    pub async fn apply(&self, file: &Path) -> Result<(u32, u32), OptimizeError> {
        let percent = self.percent;
        let path = file.to_path_buf();

        let (width, height) = tokio::task::spawn_blocking(move || resize_in_place(&path, percent))
            .await
            .map_err(|e| OptimizeError::Internal(format!("resize task aborted: {}", e)))??;

        debug!("📏 Resized {} to {}x{} ({}%)", file.display(), width, height, percent);
        Ok((width, height))
    }
}

fn resize_in_place(path: &Path, percent: u8) -> Result<(u32, u32), OptimizeError> {
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    let new_width = scaled_dimension(width, percent);
    let new_height = scaled_dimension(height, percent);

    let resized = img.resize_exact(new_width, new_height, FilterType::Lanczos3);

    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let parent: &Path = parent.unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".teeny-")
        .suffix(".png")
        .tempfile_in(parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        resized.write_to(&mut writer, ImageOutputFormat::Png)?;
        writer.flush()?;
    }
    // Same-directory rename, so a crash mid-encode never clobbers the input
    tmp.persist(path).map_err(|e| OptimizeError::Io(e.error))?;

    Ok((new_width, new_height))
}

/// Scale one dimension, truncating like integer division but never below 1px
fn scaled_dimension(value: u32, percent: u8) -> u32 {
    ((value as u64 * percent as u64) / 100).max(1) as u32
}

/// Read the dimensions of a PNG without keeping the pixels around.
pub fn png_dimensions(path: &Path) -> Result<(u32, u32), OptimizeError> {
    let img = image::open(path)?;
    Ok(img.dimensions())
}
