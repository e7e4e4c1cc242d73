//! Rebuild-on-change for the app behind the placeholder pages.
//!
//! # Responsibilities
//! - Decide whether the build output is stale (`needs_rebuild`)
//! - Run the configured build command when it is
//! - Serialize rebuilds so concurrent requests share one build
//!
//! # Design Decisions
//! - The output directory's mtime is the build time
//! - A missing output directory always needs a build
//! - A missing source directory never makes a build stale

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::config::BuildConfig;
use crate::observability::metrics;

/// Errors from the freshness check or the build itself.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no build command configured")]
    NoCommand,

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

impl BuildError {
    /// Diagnostic output worth showing the user, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            BuildError::Failed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// What `Builder::ensure_fresh` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Fresh,
    Rebuilt,
}

/// Return true when `output_dir` is missing or older than any source file.
pub fn needs_rebuild(output_dir: &Path, source_dir: &Path, extensions: &[String]) -> io::Result<bool> {
    let build_time = match fs::metadata(output_dir) {
        Ok(meta) => meta.modified()?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };

    match has_newer_source(source_dir, build_time, extensions) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        other => other,
    }
}

fn has_newer_source(dir: &Path, build_time: SystemTime, extensions: &[String]) -> io::Result<bool> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            if has_newer_source(&path, build_time, extensions)? {
                return Ok(true);
            }
        } else if is_source(&path, extensions) && entry.metadata()?.modified()? > build_time {
            tracing::debug!(path = %path.display(), "Source newer than build");
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_source(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e == ext))
        .unwrap_or(false)
}

/// Runs the build command whenever sources are fresher than the output.
#[derive(Debug)]
pub struct Builder {
    config: BuildConfig,
    lock: Mutex<()>,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    fn command_line(&self) -> String {
        self.config.command.join(" ")
    }

    /// Rebuild if needed. Concurrent callers wait for the running build.
    pub async fn ensure_fresh(&self) -> Result<BuildOutcome, BuildError> {
        let _guard = self.lock.lock().await;

        let output_dir = PathBuf::from(&self.config.output_dir);
        let source_dir = PathBuf::from(&self.config.source_dir);
        let extensions = self.config.extensions.clone();
        let scan_dir = source_dir.clone();
        let stale = tokio::task::spawn_blocking(move || needs_rebuild(&output_dir, &scan_dir, &extensions))
            .await
            .map_err(|e| BuildError::Scan {
                path: source_dir.clone(),
                source: io::Error::other(e),
            })?
            .map_err(|source| BuildError::Scan {
                path: source_dir,
                source,
            })?;

        if !stale {
            metrics::record_build("fresh");
            return Ok(BuildOutcome::Fresh);
        }

        match self.run_build().await {
            Ok(()) => {
                metrics::record_build("rebuilt");
                Ok(BuildOutcome::Rebuilt)
            }
            Err(e) => {
                metrics::record_build("failed");
                Err(e)
            }
        }
    }

    async fn run_build(&self) -> Result<(), BuildError> {
        let (program, args) = self
            .config
            .command
            .split_first()
            .ok_or(BuildError::NoCommand)?;
        let command = self.command_line();

        tracing::info!(command = %command, "Building app");
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| BuildError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            tracing::info!(command = %command, "Build finished");
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::error!(command = %command, status = %output.status, "Build failed");
            Err(BuildError::Failed {
                command,
                status: output.status,
                stderr,
            })
        }
    }
}
