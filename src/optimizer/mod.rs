//! # Optimizer Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `batch`: Orchestratore principale (coda esplicita + worker set)
//! - `progress_tracker`: Gestione progress unificata

pub mod batch;
pub mod progress_tracker;

pub use batch::{BatchOptimizer, DispatcherState};
pub use progress_tracker::ProgressTracker;
