//! The diagnostic checkpoint log
//!
//! A plain text file, truncated at startup, that receives one timestamped line
//! per checkpoint. It is independent of the regular logger so that it keeps
//! working regardless of the configured level

use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fmt,
    fs::File,
    io::{LineWriter, Write},
    path::{Path, PathBuf},
};

/// Checkpoint file kept open for the lifetime of the window manager
#[derive(Debug)]
pub(crate) struct DiagnosticLog {
    /// Line-buffered handle, `None` when checkpoints are discarded
    file: Option<LineWriter<File>>,
    /// Where the file lives
    path: Option<PathBuf>,
}

impl DiagnosticLog {
    /// Open the log at `path`, truncating anything already there
    pub(crate) fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("opening diagnostic log: {}", path.display());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory for '{}'", path.display())
            })?;
        }

        let file = File::create(path)
            .with_context(|| format!("failed to open diagnostic log '{}'", path.display()))?;

        Ok(Self {
            file: Some(LineWriter::new(file)),
            path: Some(path.to_path_buf()),
        })
    }

    /// A log that throws every checkpoint away
    #[cfg(test)]
    pub(crate) const fn disabled() -> Self {
        Self { file: None, path: None }
    }

    /// Append a checkpoint line
    ///
    /// Write failures are logged and otherwise ignored
    pub(crate) fn checkpoint<T: fmt::Display>(&mut self, msg: T) {
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "[{}] {}", Local::now().format("%H:%M:%S%.3f"), msg) {
                log::warn!("failed to write to the diagnostic log: {}", e);
            }
        }
    }
}

impl Drop for DiagnosticLog {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush() {
                log::warn!("failed to flush the diagnostic log: {}", e);
            }
        }
        if let Some(path) = &self.path {
            log::debug!("closed diagnostic log: {}", path.display());
        }
    }
}
