//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche del batch.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche cumulative (file processati, byte risparmiati)
//! - Calcolo percentuali di riduzione aggregate
//! - Riepilogo finale del batch
//!
//! ## Componenti principali:
//! - `ProgressManager`: Gestisce la progress bar principale
//! - `BatchStats`: Traccia statistiche cumulative a partire dai `FileReport`
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file elaborati
//! - **files_clean**: File con tutti gli stage completati
//! - **files_with_failures**: File con almeno uno stage fallito
//! - **stage_failures**: Numero totale di stage falliti
//! - **total_bytes_before/after**: Byte complessivi prima e dopo
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:02:15] [========================================] 150/150 (100%) [OK] photo.png: 45.2% saved
//! ```

use crate::pipeline::FileReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for the optimization batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Create a manager that draws nothing, for JSON output mode
    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden() }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for batch results
#[derive(Debug, Default, Clone)]
pub struct BatchStats {
    pub files_processed: usize,
    pub files_clean: usize,
    pub files_with_failures: usize,
    pub stage_failures: usize,
    pub total_bytes_before: u64,
    pub total_bytes_after: u64,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_report(&mut self, report: &FileReport) {
        self.files_processed += 1;
        if report.succeeded() {
            self.files_clean += 1;
        } else {
            self.files_with_failures += 1;
            self.stage_failures += report.failed_stages();
        }
        self.total_bytes_before += report.bytes_before;
        self.total_bytes_after += report.bytes_after;
    }

    pub fn total_bytes_saved(&self) -> u64 {
        self.total_bytes_before.saturating_sub(self.total_bytes_after)
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_bytes_before > 0 {
            (self.total_bytes_saved() as f64 / self.total_bytes_before as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Clean: {} | With failures: {} | Total saved: {} ({:.2}%)",
            self.files_processed,
            self.files_clean,
            self.files_with_failures,
            crate::file_manager::FileManager::format_size(self.total_bytes_saved()),
            self.overall_reduction_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{StageKind, StageReport};
    use std::path::PathBuf;

    fn report(bytes_before: u64, bytes_after: u64, failed: usize) -> FileReport {
        let mut stages = vec![StageReport::ok(StageKind::Reoptimize)];
        for _ in 0..failed {
            stages.push(StageReport {
                kind: StageKind::Quantize,
                error: Some("pngquant produced no output file: boom".to_string()),
            });
        }
        FileReport { path: PathBuf::from("x.png"), bytes_before, bytes_after, stages }
    }

    #[test]
    fn test_stats_accumulate_reports() {
        let mut stats = BatchStats::new();
        stats.add_report(&report(1000, 600, 0));
        stats.add_report(&report(500, 500, 1));

        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_clean, 1);
        assert_eq!(stats.files_with_failures, 1);
        assert_eq!(stats.stage_failures, 1);
        assert_eq!(stats.total_bytes_saved(), 400);
    }

    #[test]
    fn test_overall_reduction_percent() {
        let mut stats = BatchStats::new();
        stats.add_report(&report(1000, 750, 0));
        stats.add_report(&report(1000, 750, 0));
        assert_eq!(stats.overall_reduction_percent(), 25.0);
    }

    #[test]
    fn test_empty_stats_do_not_divide_by_zero() {
        let stats = BatchStats::new();
        assert_eq!(stats.overall_reduction_percent(), 0.0);
        assert_eq!(stats.total_bytes_saved(), 0);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut stats = BatchStats::new();
        stats.add_report(&report(2048, 1024, 0));
        let summary = stats.format_summary();
        assert!(summary.contains("Processed: 1 files"));
        assert!(summary.contains("1.00 KB"));
    }
}
