//! # Lossy Quantization Module
//!
//! Questo modulo gestisce la compressione lossy con **pngquant**.
//!
//! ## Responsabilità:
//! - Costruisce la command line pngquant (`--quality=<min>-100 --force`)
//! - Scrive l'output su un file affiancato (`nome_pngquant.png`)
//! - Promuove l'output sull'originale solo se il file esiste davvero
//!
//! ## Regola di successo:
//! pngquant usa exit code non-zero anche per condizioni che qui trattiamo
//! come fallimenti recuperabili (es. qualità minima non raggiungibile).
//! Il criterio è quindi l'esistenza del file di output: se manca, lo stage
//! fallisce per quel file con lo stderr catturato come diagnostica, e
//! l'originale resta invariato.

use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::tools::{side_path, CommandRunner};
use crate::utils::to_string_vec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Lossy palette quantization via the external pngquant binary
pub struct QuantizeStage {
    quality: u8,
    tool: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl QuantizeStage {
    /// # Arguments
    /// - `quality`: Minimum acceptable quality (1-100); the range passed to
    ///   pngquant is always `<quality>-100`
    /// - `tool`: Path or command name of the pngquant executable
    pub fn new(quality: u8, tool: PathBuf, runner: Arc<dyn CommandRunner>) -> Self {
        Self { quality, tool, runner }
    }

    /// Quantize the file in place.
    ///
    /// On success the original has been atomically replaced by the
    /// quantized version. On failure the original is untouched.
    pub async fn apply(&self, file: &Path) -> Result<(), OptimizeError> {
        let side = side_path(file, "pngquant");
        if side.exists() {
            // Leftover from an interrupted run, never trust it
            let _ = tokio::fs::remove_file(&side).await;
        }

        let quality_arg = format!("--quality={}-100", self.quality);
        let side_arg = side.to_string_lossy();
        let input_arg = file.to_string_lossy();
        let args = to_string_vec([
            quality_arg.as_str(),
            "--force",
            "--output",
            side_arg.as_ref(),
            input_arg.as_ref(),
        ]);

        let outcome = self.runner.run(&self.tool, &args).await?;

        if side.exists() {
            FileManager::replace_file(file, &side).await?;
            debug!("🎨 pngquant compressed {} (quality {}-100)", file.display(), self.quality);
            Ok(())
        } else {
            Err(OptimizeError::MissingOutput {
                tool: "pngquant".to_string(),
                diagnostic: outcome.stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::RecordingRunner;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_quantize_builds_expected_argv() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("icon.png");
        std::fs::write(&png, b"original-bytes").unwrap();

        let runner = Arc::new(RecordingRunner::copying());
        let stage = QuantizeStage::new(70, PathBuf::from("pngquant"), runner.clone());
        stage.apply(&png).await.unwrap();

        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("pngquant"));
        assert_eq!(calls[0].args[0], "--quality=70-100");
        assert_eq!(calls[0].args[1], "--force");
        assert_eq!(calls[0].args[2], "--output");
        assert!(calls[0].args[3].ends_with("icon_pngquant.png"));
        assert!(calls[0].args[4].ends_with("icon.png"));
    }

    #[tokio::test]
    async fn test_quantize_promotes_side_file() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("icon.png");
        std::fs::write(&png, b"original-bytes").unwrap();

        let stage = QuantizeStage::new(60, PathBuf::from("pngquant"), Arc::new(RecordingRunner::copying()));
        stage.apply(&png).await.unwrap();

        // The copying fake wrote the side file, which then replaced the original
        assert!(png.exists());
        assert!(!side_path(&png, "pngquant").exists());
    }

    #[tokio::test]
    async fn test_quantize_missing_output_keeps_original() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("icon.png");
        std::fs::write(&png, b"original-bytes").unwrap();

        let stage = QuantizeStage::new(
            95,
            PathBuf::from("pngquant"),
            Arc::new(RecordingRunner::failing("  error: quality too low  ")),
        );
        let err = stage.apply(&png).await.unwrap_err();

        match err {
            OptimizeError::MissingOutput { tool, diagnostic } => {
                assert_eq!(tool, "pngquant");
                assert_eq!(diagnostic, "error: quality too low");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(std::fs::read(&png).unwrap(), b"original-bytes");
    }

    #[tokio::test]
    async fn test_quantize_clears_stale_side_file() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("icon.png");
        let stale = side_path(&png, "pngquant");
        std::fs::write(&png, b"original-bytes").unwrap();
        std::fs::write(&stale, b"stale leftovers").unwrap();

        let stage = QuantizeStage::new(
            50,
            PathBuf::from("pngquant"),
            Arc::new(RecordingRunner::failing("boom")),
        );
        let err = stage.apply(&png).await.unwrap_err();

        // The stale side file must not be mistaken for fresh tool output
        assert!(matches!(err, OptimizeError::MissingOutput { .. }));
        assert_eq!(std::fs::read(&png).unwrap(), b"original-bytes");
    }
}
