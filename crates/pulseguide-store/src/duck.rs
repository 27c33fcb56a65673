//! DuckDB-backed audit log for deployments that want SQL over the trail.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::{Connection, params};
use pulseguide_core::{AuditError, AuditLog, AuditLogEntry, AuditSink, RiskTier};
use tracing::info;

use crate::StoreError;

const SCHEMA_SQL: &str = "
    CREATE SEQUENCE IF NOT EXISTS audit_log_seq;
    CREATE TABLE IF NOT EXISTS audit_log (
        seq        BIGINT DEFAULT nextval('audit_log_seq'),
        timestamp  VARCHAR NOT NULL,
        query      VARCHAR NOT NULL,
        response   VARCHAR NOT NULL,
        risk_score INTEGER NOT NULL,
        triggers   VARCHAR NOT NULL,
        source     VARCHAR,
        escalated  BOOLEAN NOT NULL
    );
";

/// Audit log stored in an `audit_log` table.
///
/// Supports in-memory (ephemeral) and file-backed modes, like the JSONL log.
/// Every append is one INSERT under the connection lock.
pub struct DuckAuditLog {
    conn: Mutex<Connection>,
}

impl DuckAuditLog {
    /// Open an in-memory database.
    pub fn open() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open or create a persistent database at `path`.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let store = Self::init(Connection::open(path)?)?;
        info!(path = %path.display(), "opened duckdb audit log");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn insert(&self, entry: &AuditLogEntry) -> Result<(), StoreError> {
        let triggers = serde_json::to_string(&entry.triggers)?;
        let timestamp = entry.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO audit_log (timestamp, query, response, risk_score, triggers, source, escalated)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                timestamp,
                entry.query_text,
                entry.reply_preview,
                i32::from(entry.tier.level()),
                triggers,
                entry.source,
                entry.escalated,
            ],
        )?;
        Ok(())
    }

    fn select_all(&self) -> Result<Vec<AuditLogEntry>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let mut stmt = conn.prepare(
            "SELECT timestamp, query, response, risk_score, triggers, source, escalated
             FROM audit_log ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i32>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, bool>(6)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (timestamp, query, response, score, triggers, source, escalated) = row?;
            let tier = u8::try_from(score)
                .ok()
                .and_then(|level| RiskTier::try_from(level).ok())
                .ok_or(StoreError::RiskScore(score))?;
            entries.push(AuditLogEntry {
                timestamp: DateTime::parse_from_rfc3339(&timestamp)?.with_timezone(&Utc),
                query_text: query,
                reply_preview: response,
                tier,
                triggers: serde_json::from_str(&triggers)?,
                source,
                escalated,
            });
        }
        Ok(entries)
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute_batch("DELETE FROM audit_log")?;
        info!("audit log cleared");
        Ok(())
    }
}

impl AuditSink for DuckAuditLog {
    fn append(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        Ok(self.insert(entry)?)
    }
}

impl AuditLog for DuckAuditLog {
    fn entries(&self) -> Result<Vec<AuditLogEntry>, AuditError> {
        Ok(self.select_all()?)
    }

    fn clear(&self) -> Result<(), AuditError> {
        Ok(self.delete_all()?)
    }
}
