//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file e la discovery dei PNG.
//!
//! ## Responsabilità:
//! - Discovery di file PNG (file singolo, directory piatta, scansione ricorsiva)
//! - Riconoscimento estensione case-insensitive (`.png`, `.PNG`, `.Png`)
//! - Sostituzione atomica dell'originale con la versione ottimizzata
//! - Utilità per calcoli dimensioni e percentuali
//! - Formattazione human-readable delle dimensioni
//!
//! ## Casi di input:
//! - **File**: accettato solo se l'estensione è PNG, altrimenti errore
//! - **Directory**: scansione del solo primo livello, oppure ricorsiva
//! - **Altro**: percorso inesistente o speciale, errore `InvalidInput`
//!
//! ## Sicurezza operazioni:
//! - `replace_file()` usa `rename` tra file nella stessa directory, quindi
//!   la sostituzione è atomica: mai un originale parzialmente scritto
//! - I file candidati vengono sempre scritti accanto all'originale
//!
//! ## Esempio:
//! ```rust,no_run
//! use teenypng::file_manager::FileManager;
//! use std::path::Path;
//!
//! let files = FileManager::discover(Path::new("photos"), true).unwrap();
//! for file in files {
//!     println!("{}", file.display());
//! }
//! ```

use crate::error::OptimizeError;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Manages file operations and PNG discovery
pub struct FileManager;

impl FileManager {
    /// Collect the PNG files to process for a given input path.
    ///
    /// # Arguments
    /// - `input`: A PNG file or a directory containing PNG files
    /// - `recursive`: Whether directory scans descend into subdirectories
    ///
    /// # Returns
    /// The matching files, possibly empty for a directory holding no PNGs.
    /// Non-PNG files and unreadable directory entries are silently skipped.
    pub fn discover(input: &Path, recursive: bool) -> Result<Vec<PathBuf>, OptimizeError> {
        if input.is_file() {
            if Self::is_png(input) {
                return Ok(vec![input.to_path_buf()]);
            }
            return Err(OptimizeError::InvalidInput(format!(
                "{} is not a PNG file",
                input.display()
            )));
        }

        if input.is_dir() {
            let walker = if recursive {
                WalkDir::new(input).min_depth(1)
            } else {
                WalkDir::new(input).min_depth(1).max_depth(1)
            };

            let mut files = Vec::new();
            for entry in walker
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if Self::is_png(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
            return Ok(files);
        }

        Err(OptimizeError::InvalidInput(format!(
            "{} is neither a PNG file nor a directory",
            input.display()
        )))
    }

    /// Check whether a path has a PNG extension, ignoring case
    pub fn is_png(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false)
    }

    /// Get the size of a file in bytes
    pub async fn file_size(path: &Path) -> Result<u64, OptimizeError> {
        let metadata = fs::metadata(path).await?;
        Ok(metadata.len())
    }

    /// Replace a file with its optimized candidate.
    ///
    /// The candidate must live in the same directory as the original so the
    /// rename is atomic. On failure the original is untouched and the
    /// candidate is left behind for inspection.
    pub async fn replace_file(original: &Path, candidate: &Path) -> Result<(), OptimizeError> {
        fs::rename(candidate, original).await?;
        Ok(())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std_fs::write(path, b"not really a png").unwrap();
    }

    #[test]
    fn test_is_png_ignores_case() {
        assert!(FileManager::is_png(Path::new("a.png")));
        assert!(FileManager::is_png(Path::new("b.PNG")));
        assert!(FileManager::is_png(Path::new("c.Png")));
        assert!(!FileManager::is_png(Path::new("d.jpg")));
        assert!(!FileManager::is_png(Path::new("noext")));
    }

    #[test]
    fn test_discover_single_file() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("photo.PNG");
        touch(&png);

        let files = FileManager::discover(&png, false).unwrap();
        assert_eq!(files, vec![png]);
    }

    #[test]
    fn test_discover_single_file_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("photo.jpg");
        touch(&jpg);

        let err = FileManager::discover(&jpg, false).unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidInput(_)));
    }

    #[test]
    fn test_discover_flat_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("c.jpg"));
        std_fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested").join("deep.png"));

        let files = FileManager::discover(dir.path(), false).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| FileManager::is_png(f)));
    }

    #[test]
    fn test_discover_recursive_descends() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.png"));
        std_fs::create_dir_all(dir.path().join("x").join("y")).unwrap();
        touch(&dir.path().join("x").join("b.png"));
        touch(&dir.path().join("x").join("y").join("c.png"));
        touch(&dir.path().join("x").join("y").join("skip.webp"));

        let files = FileManager::discover(dir.path(), true).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_discover_empty_directory_is_ok() {
        let dir = TempDir::new().unwrap();
        let files = FileManager::discover(dir.path(), true).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_missing_path() {
        let err = FileManager::discover(Path::new("/nonexistent/path/here"), false).unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_replace_file_swaps_content() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("image.png");
        let candidate = dir.path().join("image_optimized.png");
        std_fs::write(&original, b"big original").unwrap();
        std_fs::write(&candidate, b"tiny").unwrap();

        FileManager::replace_file(&original, &candidate).await.unwrap();

        assert_eq!(std_fs::read(&original).unwrap(), b"tiny");
        assert!(!candidate.exists());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(1024), "1.00 KB");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(1048576), "1.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(1000, 750), 25.0);
        assert_eq!(FileManager::calculate_reduction(1000, 1000), 0.0);
        assert_eq!(FileManager::calculate_reduction(0, 100), 0.0);
    }
}
