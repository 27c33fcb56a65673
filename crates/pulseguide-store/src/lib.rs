//! Audit storage: in-memory, JSON-lines file, and DuckDB backends, plus Arrow
//! conversion for compliance export.

mod batch;
mod error;
mod jsonl;
mod memory;

pub use batch::entries_to_batch;
pub use error::StoreError;
pub use jsonl::{JsonlAuditLog, write_jsonl};
pub use memory::MemoryAuditLog;

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckAuditLog;

#[cfg(feature = "parquet")]
pub use batch::{read_parquet, write_parquet};
