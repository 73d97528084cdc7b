//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di ottimizzazione
//! - Definisce `ToolPaths` per i percorsi dei tool esterni (pngquant, zopflipng)
//! - Fornisce validazione robusta dei parametri di input
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `size_percent`: Percentuale di resize (1-100, None = nessun resize)
//! - `quality`: Qualità minima pngquant (1-100, None = nessuna quantizzazione)
//! - `iterations`: Iterazioni zopflipng (default: 15, più alte = più lento/migliore)
//! - `recursive`: Scansione ricorsiva delle sottodirectory (default: false)
//! - `workers`: Numero di worker paralleli (default: max(1, cpu - 4))
//! - `json_output`: Emette eventi JSON su stdout per uso programmatico
//!
//! ## Tool esterni:
//! I percorsi di pngquant e zopflipng vengono letti UNA volta dalle variabili
//! d'ambiente `PNGQUANT` e `ZOPFLIPNG` all'avvio e poi passati esplicitamente:
//! nessun'altra parte del programma legge l'ambiente, così i test possono
//! costruire una `Config` senza mutare l'environment del processo.
//!
//! ## Esempio:
//! ```rust
//! use teenypng::config::Config;
//!
//! let config = Config {
//!     quality: Some(70),
//!     iterations: 20,
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default zopflipng iteration count, matching the tool's own default sweet
/// spot between compression and runtime.
pub const DEFAULT_ITERATIONS: u32 = 15;

/// Environment variable naming the pngquant executable.
pub const PNGQUANT_ENV: &str = "PNGQUANT";

/// Environment variable naming the zopflipng executable.
pub const ZOPFLIPNG_ENV: &str = "ZOPFLIPNG";

/// Configuration for PNG optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Resize percentage (1-100), None = keep original dimensions
    pub size_percent: Option<u8>,
    /// Minimum pngquant quality (1-100), None = skip lossy quantization
    pub quality: Option<u8>,
    /// zopflipng iteration count (higher = slower, smaller output)
    pub iterations: u32,
    /// Recurse into subdirectories when the input is a directory
    pub recursive: bool,
    /// Number of parallel workers
    pub workers: usize,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
    /// Resolved external tool paths
    pub tools: ToolPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size_percent: None,
            quality: None,
            iterations: DEFAULT_ITERATIONS,
            recursive: false,
            workers: default_workers(),
            json_output: false,
            tools: ToolPaths::default(),
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if let Some(percent) = self.size_percent {
            if percent == 0 || percent > 100 {
                return Err(anyhow::anyhow!("Resize percentage must be between 1 and 100"));
            }
        }

        if let Some(quality) = self.quality {
            if quality == 0 || quality > 100 {
                return Err(anyhow::anyhow!("Quality must be between 1 and 100"));
            }
        }

        if self.iterations == 0 {
            return Err(anyhow::anyhow!("Iterations must be greater than 0"));
        }

        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        Ok(())
    }
}

/// Default worker count: one per CPU minus a few cores left for the host
/// process and the external tools themselves, never less than one.
pub fn default_workers() -> usize {
    num_cpus::get().saturating_sub(4).max(1)
}

/// Paths to the external compression tools.
///
/// Values are plain command names by default, so an unset environment still
/// works whenever the tools are on `PATH`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPaths {
    /// pngquant executable (lossy palette quantization)
    pub pngquant: PathBuf,
    /// zopflipng executable (lossless deflate re-optimization)
    pub zopflipng: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pngquant: PathBuf::from("pngquant"),
            zopflipng: PathBuf::from("zopflipng"),
        }
    }
}

impl ToolPaths {
    /// Read tool locations from `PNGQUANT` and `ZOPFLIPNG`.
    ///
    /// This is the only place the environment is consulted; the result is
    /// carried inside [`Config`] from here on.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pngquant: env::var_os(PNGQUANT_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.pngquant),
            zopflipng: env::var_os(ZOPFLIPNG_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.zopflipng),
        }
    }

    /// Warn about tools that do not resolve to an executable.
    ///
    /// Missing tools are not fatal here: the affected stage fails per file
    /// with a diagnostic, and stages that never run never need their tool.
    pub fn warn_if_missing(&self) {
        for (name, path) in [("pngquant", &self.pngquant), ("zopflipng", &self.zopflipng)] {
            if !Self::resolves(path) {
                warn!(
                    "⚠️  {} not found at '{}' (set the {} environment variable); its stage will fail per file",
                    name,
                    path.display(),
                    name.to_uppercase()
                );
            }
        }
    }

    fn resolves(path: &Path) -> bool {
        if path.components().count() > 1 {
            return path.exists();
        }
        find_in_path(path).is_some()
    }
}

/// Search the `PATH` directories for a bare command name.
pub fn find_in_path(tool: &Path) -> Option<PathBuf> {
    let name = if cfg!(target_os = "windows") {
        format!("{}.exe", tool.to_string_lossy())
    } else {
        tool.to_string_lossy().into_owned()
    };

    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .map(|dir| dir.join(&name))
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.size_percent, None);
        assert_eq!(config.quality, None);
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
        assert!(!config.recursive);
        assert!(config.workers >= 1);
        assert!(!config.json_output);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.size_percent = Some(0);
        assert!(config.validate().is_err());

        config.size_percent = Some(100);
        config.quality = Some(101);
        assert!(config.validate().is_err());

        config.quality = Some(70);
        config.iterations = 0;
        assert!(config.validate().is_err());

        config.iterations = 15;
        config.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_workers_never_zero() {
        assert!(default_workers() >= 1);
    }

    #[test]
    fn test_tool_paths_default_are_bare_names() {
        let tools = ToolPaths::default();
        assert_eq!(tools.pngquant, PathBuf::from("pngquant"));
        assert_eq!(tools.zopflipng, PathBuf::from("zopflipng"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_in_path_locates_shell() {
        assert!(find_in_path(Path::new("sh")).is_some());
    }

    #[test]
    fn test_find_in_path_rejects_nonsense() {
        assert!(find_in_path(Path::new("definitely-not-a-real-tool-9f2c")).is_none());
    }
}
