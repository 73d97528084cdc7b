//! # Teenypng - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Estrazione degli argomenti propri dopo il separatore `--`
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Lettura dei percorsi tool da `PNGQUANT` / `ZOPFLIPNG`
//! - Creazione della configurazione e avvio dell'optimizer
//!
//! ## Flusso di esecuzione:
//! 1. Cerca il separatore `--` nella command line; senza separatore esce
//!    subito con errore (gli argomenti prima appartengono al processo host)
//! 2. Parsa gli argomenti propri (input, size, quality, iterations, etc.)
//! 3. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 4. Risolve i tool esterni dall'ambiente, con warning se mancanti
//! 5. Istanzia BatchOptimizer e avvia il batch
//!
//! ## Esempio di utilizzo:
//! ```bash
//! host-process --flags -- photos/ --size 50 --quality 70 --recursive
//! ```
//!
//! I fallimenti sui singoli file vengono riportati ma non cambiano l'exit
//! code: solo separatore mancante, argomenti invalidi, percorso invalido o
//! nessun PNG trovato producono un exit non-zero.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use teenypng::config::{self, ToolPaths};
use teenypng::utils::split_host_args;
use teenypng::{BatchOptimizer, Config};

#[derive(Parser)]
#[command(name = "teenypng")]
#[command(about = "Batch PNG optimizer chaining resize, pngquant and zopflipng")]
struct Args {
    /// PNG file or directory containing PNG files
    input_path: PathBuf,

    /// zopflipng iterations (higher = slower, smaller output)
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// Minimum pngquant quality (1-100); lossy quantization is skipped when omitted
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Resize to this percentage of the original dimensions (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    size: Option<u8>,

    /// Recurse into subdirectories when the input is a directory
    #[arg(long)]
    recursive: bool,

    /// Number of parallel workers
    #[arg(long, default_value_t = config::default_workers())]
    workers: usize,

    /// Emit machine-readable JSON events on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything before `--` belongs to the host process that launched us
    let own_args = match split_host_args(std::env::args().skip(1)) {
        Some(own_args) => own_args,
        None => {
            return Err(anyhow::anyhow!(
                "no `--` found to separate host arguments from teenypng arguments"
            ));
        }
    };

    let args = Args::parse_from(std::iter::once("teenypng".to_string()).chain(own_args));

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let tools = ToolPaths::from_env();
    tools.warn_if_missing();

    let config = Config {
        size_percent: args.size,
        quality: args.quality,
        iterations: args.iterations,
        recursive: args.recursive,
        workers: args.workers,
        json_output: args.json,
        tools,
    };

    let mut optimizer = BatchOptimizer::new(config)?;
    optimizer.run(&args.input_path).await?;

    if !args.json {
        info!("🎉 PNG processing complete!");
    }

    Ok(())
}
