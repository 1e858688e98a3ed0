//! CI host output channel
//!
//! Surfaces `upload_status`, `appgallery_console_url` and `errorMessage`
//! to the invoking workflow. On GitHub Actions the outputs go to the file
//! named by `GITHUB_OUTPUT`; elsewhere they are only echoed to the console.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

/// Writer for workflow outputs
pub struct CiOutput {
    path: Option<PathBuf>,
}

impl CiOutput {
    /// Resolve the output file from the process environment
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    /// Writer bound to an explicit output file
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Append one `key=value` output line
    ///
    /// The GitHub output file format is line-oriented, so newlines in the
    /// value are collapsed to spaces.
    pub fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.replace(['\r', '\n'], " ");
        debug!(key, %value, "workflow output");

        if let Some(ref path) = self.path {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{}={}", key, value)?;
        }

        Ok(())
    }
}
