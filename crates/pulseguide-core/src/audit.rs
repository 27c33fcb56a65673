//! Audit trail of classified exchanges.
//!
//! Every enhanced assistant turn produces exactly one [`AuditLogEntry`]. The
//! log is append-only; entries are never deduplicated or pruned, and are
//! removed only by an explicit [`AuditLog::clear`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::risk::{RiskAssessment, RiskTier};

/// Replies are stored truncated to this many characters.
pub const REPLY_PREVIEW_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit storage unavailable: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("audit record malformed: {0}")]
    Malformed(String),
}

/// One audited exchange.
///
/// JSON field names follow the client-side log format (`response`,
/// `riskScore`) so existing compliance exports keep parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "query")]
    pub query_text: String,
    /// Reply truncated to [`REPLY_PREVIEW_CHARS`] characters plus `...`.
    #[serde(rename = "response")]
    pub reply_preview: String,
    #[serde(rename = "riskScore")]
    pub tier: RiskTier,
    pub triggers: Vec<String>,
    /// Comma-joined cited document ids, absent when nothing was cited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub escalated: bool,
}

impl AuditLogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        query: &str,
        reply: &str,
        risk: &RiskAssessment,
        cited_ids: &[&str],
    ) -> Self {
        let source = if cited_ids.is_empty() {
            None
        } else {
            Some(cited_ids.join(", "))
        };
        Self {
            timestamp,
            query_text: query.to_string(),
            reply_preview: truncate_reply(reply),
            tier: risk.tier(),
            triggers: risk.triggers().to_vec(),
            source,
            escalated: risk.escalate(),
        }
    }
}

/// Truncate on a character boundary, appending `...` only when text was cut.
pub fn truncate_reply(reply: &str) -> String {
    match reply.char_indices().nth(REPLY_PREVIEW_CHARS) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &reply[..byte_idx]),
        None => reply.to_string(),
    }
}

/// Append-only destination for audit entries.
///
/// Implementations must serialize concurrent appends so no entry is lost.
pub trait AuditSink: Send + Sync {
    fn append(&self, entry: &AuditLogEntry) -> Result<(), AuditError>;
}

/// An audit sink that can also be read back and administratively cleared.
pub trait AuditLog: AuditSink {
    /// All entries in append order.
    fn entries(&self) -> Result<Vec<AuditLogEntry>, AuditError>;

    fn clear(&self) -> Result<(), AuditError>;

    fn len(&self) -> Result<usize, AuditError> {
        Ok(self.entries()?.len())
    }

    fn is_empty(&self) -> Result<bool, AuditError> {
        Ok(self.len()? == 0)
    }
}
