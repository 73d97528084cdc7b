//! # Progress Tracking Module
//!
//! Tracker thread-safe condiviso tra i worker del batch.
//! Gestisce sia output JSON che progress bar tradizionale.

use crate::{
    json_output::JsonMessage,
    pipeline::FileReport,
    progress::{BatchStats, ProgressManager},
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tracker unificato: statistiche cumulative + feedback visuale
#[derive(Clone)]
pub struct ProgressTracker {
    pub total_files: usize,
    json_output: bool,
    stats: Arc<Mutex<BatchStats>>,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    /// Crea un nuovo tracker
    pub fn new(total_files: usize, json_output: bool) -> Self {
        let progress_manager = if json_output {
            // In JSON mode stdout carries events, the bar would only add noise
            ProgressManager::hidden()
        } else {
            ProgressManager::new(total_files as u64)
        };

        Self {
            total_files,
            json_output,
            stats: Arc::new(Mutex::new(BatchStats::new())),
            progress_manager,
        }
    }

    /// Registra il report di un file, aggiornando stats, bar ed eventi JSON
    pub async fn record(&self, report: &FileReport) {
        {
            let mut stats = self.stats.lock().await;
            stats.add_report(report);
        }

        if self.json_output {
            JsonMessage::file_complete(report).emit();
        }

        let name = report
            .path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let message = if report.succeeded() {
            format!("[OK] {}: {:.1}% saved", name, report.reduction_percent())
        } else {
            format!("[WARN] {}: {} stage(s) failed", name, report.failed_stages())
        };
        self.progress_manager.update(&message);
    }

    /// Copia delle statistiche correnti
    pub async fn snapshot(&self) -> BatchStats {
        self.stats.lock().await.clone()
    }

    /// Finalizza progress bar
    pub fn finish(&self, summary: &str) {
        self.progress_manager.finish(summary);
    }
}
