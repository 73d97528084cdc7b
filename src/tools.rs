//! # External Tool Invocation Module
//!
//! This module is the only place that spawns external processes. Both
//! compression stages go through the [`CommandRunner`] trait, so tests can
//! substitute a recording fake and exercise the full pipeline without
//! pngquant or zopflipng installed.
//!
//! Success of a tool run is judged by the caller checking for the expected
//! output file, not by the exit status alone: pngquant in particular uses
//! non-zero exits for conditions we treat as per-file failures, and some
//! builds differ in their status conventions. The captured stderr is kept
//! for diagnostics either way.

use crate::error::OptimizeError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Result of one external tool run
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Whether the process exited with status zero
    pub success: bool,
    /// Captured stderr, for diagnostics when the expected output is missing
    pub stderr: String,
}

/// Abstraction over spawning an external process and waiting for it.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, waiting for completion and capturing stderr.
    ///
    /// Returns `ToolLaunch` when the process cannot be spawned at all
    /// (missing executable, permission denied).
    async fn run(&self, program: &Path, args: &[String]) -> Result<ToolOutput, OptimizeError>;
}

/// The real runner, backed by `tokio::process`.
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<ToolOutput, OptimizeError> {
        debug!("🔧 Running {} {}", program.display(), args.join(" "));
        let started = Instant::now();

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| OptimizeError::ToolLaunch {
                tool: program.display().to_string(),
                source: e,
            })?;

        debug!(
            "🔧 {} finished in {:.2}s (status {})",
            program.display(),
            started.elapsed().as_secs_f64(),
            output.status
        );

        Ok(ToolOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Build the side path a tool writes next to its input: `photo.png` with tag
/// `pngquant` becomes `photo_pngquant.png` in the same directory.
pub fn side_path(input: &Path, tag: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}_{}.png", stem, tag))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_path_keeps_directory() {
        let side = side_path(Path::new("/photos/cat.png"), "pngquant");
        assert_eq!(side, PathBuf::from("/photos/cat_pngquant.png"));
    }

    #[test]
    fn test_side_path_tags_before_extension() {
        let side = side_path(Path::new("shot.PNG"), "optimized");
        assert_eq!(side, PathBuf::from("shot_optimized.png"));
    }

    #[tokio::test]
    async fn test_process_runner_reports_launch_failure() {
        let runner = ProcessRunner;
        let err = runner
            .run(Path::new("/nonexistent/tool-xyz"), &["--version".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, OptimizeError::ToolLaunch { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_runner_captures_status() {
        let runner = ProcessRunner;
        let output = runner
            .run(Path::new("sh"), &["-c".to_string(), "exit 3".to_string()])
            .await
            .unwrap();
        assert!(!output.success);
    }
}
