//! Append-only event log
//!
//! One writer per file. `append` is the only mutating operation; nothing
//! here truncates, seeks or rewrites.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use crate::error::EventLogError;
use crate::events::{ArenaEvent, LoggedEvent};

/// JSON-lines event sink, flushed after every event
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    writer: BufWriter<File>,
    appended: usize,
}

impl EventLog {
    /// Open `path` for appending, creating it and its parent directories
    /// if missing. Existing lines are kept.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EventLogError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::debug!("Opened event log at {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            appended: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Events appended through this handle
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Stamp `event` with the current UTC time and append it as one line
    pub fn append(&mut self, event: ArenaEvent) -> Result<LoggedEvent, EventLogError> {
        let logged = LoggedEvent::new(event, Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));
        let line = logged.to_line()?;

        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.appended += 1;

        Ok(logged)
    }
}
