pub mod audit;
pub mod corpus;
pub mod document;
pub mod risk;
pub mod schema;

pub use audit::{AuditError, AuditLog, AuditLogEntry, AuditSink, truncate_reply};
pub use corpus::{CORPUS_GENERATION, seeded_documents};
pub use document::{BenefitCategory, HealthPlan, PolicyDocument};
pub use risk::{RiskAssessment, RiskTier};
pub use schema::audit_table;
