//! # Lossless Re-optimization Module
//!
//! Questo modulo gestisce la ricompressione lossless finale con **zopflipng**.
//!
//! ## Responsabilità:
//! - Costruisce la command line zopflipng (`--iterations=<n> <input> <output>`)
//! - Scrive l'output su un file affiancato (`nome_optimized.png`)
//! - Promuove l'output sull'originale solo se il file esiste davvero
//!
//! Lo stage è sempre l'ultimo della pipeline e gira su ogni file, anche
//! quando resize e quantizzazione sono disattivati o falliti: zopflipng è
//! lossless, quindi ripassare un file già compresso è sempre sicuro.

use crate::args;
use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::tools::{side_path, CommandRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Lossless deflate re-optimization via the external zopflipng binary
pub struct ZopfliStage {
    iterations: u32,
    tool: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl ZopfliStage {
    /// # Arguments
    /// - `iterations`: zopflipng iteration count; more iterations squeeze
    ///   out a few extra bytes at a steep CPU cost
    /// - `tool`: Path or command name of the zopflipng executable
    pub fn new(iterations: u32, tool: PathBuf, runner: Arc<dyn CommandRunner>) -> Self {
        Self { iterations, tool, runner }
    }

    /// Re-optimize the file in place.
    ///
    /// Success is judged by the output file existing, mirroring the
    /// quantization stage; on failure the original is untouched.
    pub async fn apply(&self, file: &Path) -> Result<(), OptimizeError> {
        let side = side_path(file, "optimized");
        if side.exists() {
            let _ = tokio::fs::remove_file(&side).await;
        }

        let input_arg = file.to_string_lossy();
        let side_arg = side.to_string_lossy();
        let args = args![
            format!("--iterations={}", self.iterations),
            input_arg,
            side_arg,
        ];

        let outcome = self.runner.run(&self.tool, &args).await?;

        if side.exists() {
            FileManager::replace_file(file, &side).await?;
            debug!("✅ zopflipng optimized {} ({} iterations)", file.display(), self.iterations);
            Ok(())
        } else {
            Err(OptimizeError::MissingOutput {
                tool: "zopflipng".to_string(),
                diagnostic: outcome.stderr.trim().to_string(),
            })
        }
    }
}
