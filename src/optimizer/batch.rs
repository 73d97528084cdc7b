//! # Batch Optimizer Main Orchestrator
//!
//! Orchestratore principale: discovery, coda di lavoro esplicita e un set
//! fisso di worker che la consumano fino a svuotarla.
//!
//! ## Ciclo di vita:
//! - `Idle`: istanza creata, nessun lavoro sottomesso
//! - `Running`: coda popolata, worker attivi
//! - `Done`: tutti i worker hanno terminato e le statistiche sono definitive
//!
//! Gli errori di discovery (percorso invalido, nessun PNG trovato) falliscono
//! prima di creare i worker, quindi lo stato resta `Idle`. I fallimenti di
//! stage sui singoli file non toccano mai l'esito del batch.

use crate::{
    config::Config,
    error::OptimizeError,
    file_manager::FileManager,
    json_output::{JsonConfig, JsonMessage},
    optimizer::progress_tracker::ProgressTracker,
    pipeline::FilePipeline,
    progress::BatchStats,
    tools::{CommandRunner, ProcessRunner},
};
use anyhow::Result;
use futures::future::join_all;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Stato osservabile del dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// Creato, nessun lavoro sottomesso
    Idle,
    /// Worker attivi sulla coda
    Running,
    /// Tutti i worker hanno terminato
    Done,
}

/// Orchestratore principale del batch
pub struct BatchOptimizer {
    config: Config,
    runner: Arc<dyn CommandRunner>,
    state: DispatcherState,
}

impl BatchOptimizer {
    /// Crea una nuova istanza con il process runner reale
    pub fn new(config: Config) -> Result<Self> {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    /// Crea una nuova istanza con un runner esplicito
    pub fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            runner,
            state: DispatcherState::Idle,
        })
    }

    /// Stato corrente del dispatcher
    pub fn state(&self) -> DispatcherState {
        self.state
    }

    /// Esegue il batch completo su un file o una directory
    pub async fn run(&mut self, input: &Path) -> Result<BatchStats> {
        let start_time = std::time::Instant::now();

        let files = match FileManager::discover(input, self.config.recursive) {
            Ok(files) => files,
            Err(e) => {
                self.emit_error(&e);
                return Err(e.into());
            }
        };

        if files.is_empty() {
            let e = OptimizeError::NoFiles(input.to_path_buf());
            self.emit_error(&e);
            return Err(e.into());
        }

        self.emit_start_message(input, &files);
        self.log_configuration(&files);

        let tracker = ProgressTracker::new(files.len(), self.config.json_output);
        let queue = Arc::new(Mutex::new(VecDeque::from(files)));

        self.state = DispatcherState::Running;

        let mut workers = Vec::with_capacity(self.config.workers);
        for worker_id in 0..self.config.workers {
            let queue = Arc::clone(&queue);
            let tracker = tracker.clone();
            let pipeline = FilePipeline::new(&self.config, Arc::clone(&self.runner));

            workers.push(tokio::spawn(async move {
                let mut processed = 0usize;
                loop {
                    // Guard drops at the semicolon, the lock is never held
                    // while a file is being processed
                    let next = queue.lock().await.pop_front();
                    let file = match next {
                        Some(file) => file,
                        None => break,
                    };
                    // debug!("Worker {} picked {}", worker_id, file.display());
                    let report = pipeline.process(&file).await;
                    tracker.record(&report).await;
                    processed += 1;
                }
                (worker_id, processed)
            }));
        }

        for joined in join_all(workers).await {
            match joined {
                Ok((worker_id, processed)) => {
                    debug!("Worker {} processed {} files", worker_id, processed);
                }
                Err(e) => error!("Worker task failed: {}", e),
            }
        }

        self.state = DispatcherState::Done;

        let stats = tracker.snapshot().await;
        tracker.finish(&stats.format_summary());
        self.print_final_stats(&stats, start_time.elapsed().as_secs_f64());

        Ok(stats)
    }

    fn emit_error(&self, error: &OptimizeError) {
        if self.config.json_output {
            JsonMessage::error(error.to_string()).emit();
        }
    }

    /// Invia messaggio di inizio
    fn emit_start_message(&self, input: &Path, files: &[PathBuf]) {
        if self.config.json_output {
            JsonMessage::start(
                input.to_path_buf(),
                files.len(),
                JsonConfig::from(&self.config),
            )
            .emit();
        } else {
            info!("Starting PNG optimization in: {}", input.display());
        }
    }

    /// Logga configurazione (solo se non JSON mode)
    fn log_configuration(&self, files: &[PathBuf]) {
        if self.config.json_output {
            return;
        }

        match self.config.size_percent {
            Some(percent) => info!("Resize: {}% of original dimensions (Lanczos3)", percent),
            None => info!("Resize: disabled"),
        }
        match self.config.quality {
            Some(quality) => info!("Quantize: pngquant --quality={}-100", quality),
            None => info!("Quantize: disabled"),
        }
        info!("Re-optimize: zopflipng with {} iterations", self.config.iterations);
        info!("Workers: {}", self.config.workers);
        info!("Found {} PNG files to process", files.len());
    }

    /// Stampa statistiche finali
    fn print_final_stats(&self, stats: &BatchStats, duration: f64) {
        if self.config.json_output {
            JsonMessage::complete(stats, duration).emit();
        } else {
            info!("=== Optimization Complete ===");
            info!("Files processed: {}", stats.files_processed);
            info!("Files clean: {}", stats.files_clean);
            info!("Files with stage failures: {}", stats.files_with_failures);
            info!("Bytes saved: {}", FileManager::format_size(stats.total_bytes_saved()));
            info!("Average reduction: {:.2}%", stats.overall_reduction_percent());
            info!("Duration: {:.2}s", duration);
        }
    }
}
