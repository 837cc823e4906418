//! # JSONL Event Log
//!
//! The durable backend: one UTF-8 text file, one canonical-JSON record per
//! `\n`-terminated line. The file is only ever appended to, never
//! rewritten, never truncated.
//!
//! ## Durability Protocol
//!
//! - Construction creates the parent directory if missing and takes an
//!   exclusive `flock` on the file, so exactly one store instance owns it.
//! - Each append opens the file append-only, performs a single write of
//!   the whole batch, flushes to device, and closes the handle on every
//!   path (scoped acquisition, guaranteed release).
//! - Recovery reads line by line; blank or torn lines are skipped by the
//!   caller rebuilding its index.

use crate::domain::errors::EventLogError;
use crate::ports::outbound::EventLogBackend;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Append-only JSONL file backend.
#[derive(Debug)]
pub struct JsonlEventLog {
    path: PathBuf,
    // Held for the lifetime of the instance; the lock releases on drop.
    _lock: File,
}

impl JsonlEventLog {
    /// Open (creating if necessary) the log file at `path` and take
    /// exclusive ownership of it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EventLogError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let lock = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;
        lock.try_lock_exclusive()
            .map_err(|_| EventLogError::Locked {
                path: path.display().to_string(),
            })?;
        tracing::debug!("[at-01] event log opened at {}", path.display());
        Ok(Self { path, _lock: lock })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLogBackend for JsonlEventLog {
    fn append_batch(&self, lines: &[String]) -> Result<(), EventLogError> {
        let mut batch = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            batch.push_str(line);
            batch.push('\n');
        }
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(batch.as_bytes())?;
        file.sync_data()?;
        Ok(())
    }

    fn load_lines(&self) -> Result<Vec<String>, EventLogError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            lines.push(line);
        }
        Ok(lines)
    }
}
