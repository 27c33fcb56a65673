//! JSON-lines audit log on local disk.
//!
//! One entry per line. Each append is a single `write_all` of a complete,
//! newline-terminated record on a file opened in append mode, taken under a
//! process-wide lock, so concurrent turns cannot interleave or overwrite each
//! other's records.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pulseguide_core::{AuditError, AuditLog, AuditLogEntry, AuditSink};
use tracing::{debug, info, warn};

use crate::StoreError;

/// File-backed, append-only audit log.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlAuditLog {
    /// Use `path` as the log file. The file and its parent directory are
    /// created on first append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_line(&self, entry: &AuditLogEntry) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        if !ends_with_newline(&mut file)? {
            warn!(path = %self.path.display(), "audit log ends mid-record; starting a new line");
            line.insert(0, '\n');
        }
        file.write_all(line.as_bytes())?;
        debug!(path = %self.path.display(), "appended audit entry");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<AuditLogEntry>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditLogEntry>(&line) {
                Ok(entry) => entries.push(entry),
                // Torn record from an interrupted write.
                Err(e) => warn!(line = n + 1, error = %e, "skipping unreadable audit record"),
            }
        }
        Ok(entries)
    }

    fn truncate(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!(path = %self.path.display(), "audit log cleared");
        Ok(())
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> Result<bool, StoreError> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl AuditSink for JsonlAuditLog {
    fn append(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        Ok(self.append_line(entry)?)
    }
}

impl AuditLog for JsonlAuditLog {
    fn entries(&self) -> Result<Vec<AuditLogEntry>, AuditError> {
        Ok(self.read_all()?)
    }

    fn clear(&self) -> Result<(), AuditError> {
        Ok(self.truncate()?)
    }
}

/// Write `entries` to `path` as JSON lines, replacing any existing file.
pub fn write_jsonl(path: &Path, entries: &[AuditLogEntry]) -> Result<(), StoreError> {
    let mut out = BufWriter::new(File::create(path)?);
    for entry in entries {
        serde_json::to_writer(&mut out, entry)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
