//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per i chiamanti
//! programmatici (script, pipeline CI, editor integrations).
//!
//! ## Responsabilità:
//! - Emette un messaggio JSON per riga su stdout (attivato con `--json`)
//! - Riusa le strutture di report della pipeline senza duplicarle
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch con configurazione effettiva
//! - `file_complete`: Fine elaborazione di un file, stage per stage
//! - `complete`: Fine batch con statistiche finali
//! - `error`: Errore fatale prima dell'avvio dei worker

use crate::config::Config;
use crate::pipeline::{FileReport, StageReport};
use crate::progress::BatchStats;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del batch
    #[serde(rename = "start")]
    Start {
        input: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    /// Fine elaborazione di un file specifico
    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        bytes_before: u64,
        bytes_after: u64,
        reduction_percent: f64,
        stages: Vec<StageReport>,
    },

    /// Batch completato
    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_clean: usize,
        files_with_failures: usize,
        stage_failures: usize,
        total_bytes_before: u64,
        total_bytes_after: u64,
        reduction_percent: f64,
        duration_seconds: f64,
    },

    /// Errore fatale
    #[serde(rename = "error")]
    Error { message: String },
}

/// Configurazione come appare nei messaggi JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub size_percent: Option<u8>,
    pub quality: Option<u8>,
    pub iterations: u32,
    pub recursive: bool,
    pub workers: usize,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di inizio
    pub fn start(input: PathBuf, total_files: usize, config: JsonConfig) -> Self {
        Self::Start { input, total_files, config }
    }

    /// Crea un messaggio di completamento file
    pub fn file_complete(report: &FileReport) -> Self {
        Self::FileComplete {
            path: report.path.clone(),
            bytes_before: report.bytes_before,
            bytes_after: report.bytes_after,
            reduction_percent: report.reduction_percent(),
            stages: report.stages.clone(),
        }
    }

    /// Crea un messaggio di completamento batch
    pub fn complete(stats: &BatchStats, duration_seconds: f64) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_clean: stats.files_clean,
            files_with_failures: stats.files_with_failures,
            stage_failures: stats.stage_failures,
            total_bytes_before: stats.total_bytes_before,
            total_bytes_after: stats.total_bytes_after,
            reduction_percent: stats.overall_reduction_percent(),
            duration_seconds,
        }
    }

    /// Crea un messaggio di errore
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}

/// Converti la Config effettiva in JsonConfig
impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            size_percent: config.size_percent,
            quality: config.quality,
            iterations: config.iterations,
            recursive: config.recursive,
            workers: config.workers,
        }
    }
}
