//! # File Pipeline Module
//!
//! Worker per l'ottimizzazione di singoli file PNG.
//! Separato dall'orchestratore principale per maggiore modularità.
//!
//! La catena per ogni file è sempre, nell'ordine:
//! 1. resize in-process (solo con `--size`)
//! 2. quantizzazione lossy con pngquant (solo con `--quality`)
//! 3. ricompressione lossless con zopflipng (sempre, sempre ultima)
//!
//! Ogni stage fallisce in isolamento: il fallimento viene registrato nel
//! report e gli stage successivi girano comunque sul file così com'è.

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::FileManager,
    quantize::QuantizeStage,
    resize::ResizeStage,
    tools::CommandRunner,
    zopfli::ZopfliStage,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;

/// Which stage of the chain a report entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Resize,
    Quantize,
    Reoptimize,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Resize => "resize",
            StageKind::Quantize => "quantize",
            StageKind::Reoptimize => "reoptimize",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of one stage on one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub kind: StageKind,
    /// None on success, otherwise the rendered error
    pub error: Option<String>,
}

impl StageReport {
    pub fn ok(kind: StageKind) -> Self {
        Self { kind, error: None }
    }

    pub fn failed(kind: StageKind, error: &OptimizeError) -> Self {
        Self { kind, error: Some(error.to_string()) }
    }
}

/// Outcome of the whole chain on one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub bytes_before: u64,
    pub bytes_after: u64,
    pub stages: Vec<StageReport>,
}

impl FileReport {
    /// True when every stage that ran completed cleanly
    pub fn succeeded(&self) -> bool {
        self.stages.iter().all(|s| s.error.is_none())
    }

    pub fn failed_stages(&self) -> usize {
        self.stages.iter().filter(|s| s.error.is_some()).count()
    }

    pub fn bytes_saved(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }

    pub fn reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.bytes_before, self.bytes_after)
    }
}

/// Worker che applica la catena completa a un singolo file
pub struct FilePipeline {
    resize: Option<ResizeStage>,
    quantize: Option<QuantizeStage>,
    zopfli: ZopfliStage,
}

impl FilePipeline {
    /// Assemble the chain for the given configuration. Stages that are not
    /// configured simply do not exist in the pipeline.
    pub fn new(config: &Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            resize: config.size_percent.map(ResizeStage::new),
            quantize: config.quality.map(|quality| {
                QuantizeStage::new(quality, config.tools.pngquant.clone(), Arc::clone(&runner))
            }),
            zopfli: ZopfliStage::new(
                config.iterations,
                config.tools.zopflipng.clone(),
                runner,
            ),
        }
    }

    /// Processa un singolo file, senza mai propagare errori di stage
    pub async fn process(&self, file: &Path) -> FileReport {
        // debug!("Starting pipeline for: {}", file.display());
        let bytes_before = FileManager::file_size(file).await.unwrap_or(0);
        let mut stages = Vec::new();

        if let Some(resize) = &self.resize {
            stages.push(match resize.apply(file).await {
                Ok(_) => StageReport::ok(StageKind::Resize),
                Err(e) => {
                    error!("📏 resize failed for {}: {}", file.display(), e);
                    StageReport::failed(StageKind::Resize, &e)
                }
            });
        }

        if let Some(quantize) = &self.quantize {
            stages.push(match quantize.apply(file).await {
                Ok(()) => StageReport::ok(StageKind::Quantize),
                Err(e) => {
                    error!("🎨 pngquant failed for {}: {}", file.display(), e);
                    StageReport::failed(StageKind::Quantize, &e)
                }
            });
        }

        // zopflipng runs unconditionally, even on files earlier stages gave up on
        stages.push(match self.zopfli.apply(file).await {
            Ok(()) => StageReport::ok(StageKind::Reoptimize),
            Err(e) => {
                error!("❌ zopflipng failed for {}: {}", file.display(), e);
                StageReport::failed(StageKind::Reoptimize, &e)
            }
        });

        let bytes_after = FileManager::file_size(file).await.unwrap_or(bytes_before);
        // debug!("Pipeline done for {}: {} -> {} bytes", file.display(), bytes_before, bytes_after);

        FileReport {
            path: file.to_path_buf(),
            bytes_before,
            bytes_after,
            stages,
        }
    }
}
