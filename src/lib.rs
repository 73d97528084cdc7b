//! # Teenypng Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione, tool paths e validazione parametri
//! - `error`: Tipi di errore custom per diverse operazioni
//! - `file_manager`: Operazioni sui file e discovery dei PNG
//! - `tools`: Invocazione processi esterni dietro il trait `CommandRunner`
//! - `resize`: Stage di ridimensionamento in-process (Lanczos3)
//! - `quantize`: Stage lossy con pngquant
//! - `zopfli`: Stage lossless finale con zopflipng
//! - `pipeline`: Catena completa per singolo file e relativi report
//! - `optimizer`: Orchestratore del batch (coda + worker set)
//! - `progress`: Progress tracking e statistiche
//! - `json_output`: Eventi JSON per chiamanti programmatici
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use teenypng::{BatchOptimizer, Config};
//! use std::path::Path;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::default();
//! let mut optimizer = BatchOptimizer::new(config)?;
//! optimizer.run(Path::new("photos")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod optimizer;
pub mod pipeline;
pub mod progress;
pub mod quantize;
pub mod resize;
pub mod tools;
pub mod utils;
pub mod zopfli;

pub use config::{Config, ToolPaths};
pub use error::OptimizeError;
pub use optimizer::{BatchOptimizer, DispatcherState};
pub use pipeline::{FilePipeline, FileReport};
