/// Arrow schema definitions for the compliance audit trail.
pub mod audit_table {
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use std::sync::Arc;

    /// Schema for exported audit log entries, one row per enhanced turn.
    pub fn audit_log_schema() -> Schema {
        Schema::new(vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            Field::new("query", DataType::Utf8, false),
            Field::new("response", DataType::Utf8, false),
            Field::new("risk_score", DataType::UInt8, false),
            Field::new(
                "triggers",
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                false,
            ),
            Field::new("source", DataType::Utf8, true),
            Field::new("escalated", DataType::Boolean, false),
        ])
    }
}
