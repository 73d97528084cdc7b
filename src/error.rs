//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//! - Supporta error chaining per mantenere il contesto degli errori
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `Image`: Errori di decodifica/codifica PNG durante il resize in-process
//! - `ToolLaunch`: Il processo esterno (pngquant, zopflipng) non è partito
//! - `MissingOutput`: Il tool è stato eseguito ma non ha prodotto il file atteso
//! - `InvalidInput`: Il percorso passato non è un PNG né una directory
//! - `NoFiles`: La scansione non ha trovato nessun PNG da processare
//! - `Internal`: Errori interni (task abortiti, lock avvelenati)
//!
//! ## Classificazione:
//! - Fatali per il batch: `InvalidInput`, `NoFiles` (exit code non-zero)
//! - Recuperabili per singolo file: `Io`, `Image`, `ToolLaunch`, `MissingOutput`
//!   (il file viene segnalato e il batch continua)

/// Custom error types for PNG optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} produced no output file: {diagnostic}")]
    MissingOutput { tool: String, diagnostic: String },

    #[error("Invalid input path: {0}")]
    InvalidInput(String),

    #[error("No PNG files found under {}", .0.display())]
    NoFiles(std::path::PathBuf),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OptimizeError {
    /// Whether the batch should keep going after this error.
    ///
    /// Per-file stage errors are recoverable: the file is reported and the
    /// remaining files are still processed. Path and discovery errors abort
    /// the whole run before any worker starts.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidInput(_) | Self::NoFiles(_))
    }
}
