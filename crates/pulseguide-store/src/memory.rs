//! Process-local audit log.

use std::sync::Mutex;

use pulseguide_core::{AuditError, AuditLog, AuditLogEntry, AuditSink};

use crate::StoreError;

/// Audit log held in memory; lost on exit. Used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditLogEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.push(entry.clone());
        Ok(())
    }
}

impl AuditLog for MemoryAuditLog {
    fn entries(&self) -> Result<Vec<AuditLogEntry>, AuditError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.clone())
    }

    fn clear(&self) -> Result<(), AuditError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)?.clear();
        Ok(())
    }
}
