//! Arrow conversion of audit entries for columnar compliance export.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, ListBuilder, StringArray, StringBuilder, TimestampMicrosecondArray,
    UInt8Array,
};
use arrow::record_batch::RecordBatch;
use pulseguide_core::{AuditLogEntry, audit_table};

use crate::StoreError;

/// Build one RecordBatch following [`audit_table::audit_log_schema`].
pub fn entries_to_batch(entries: &[AuditLogEntry]) -> Result<RecordBatch, StoreError> {
    let schema = Arc::new(audit_table::audit_log_schema());

    let timestamps = TimestampMicrosecondArray::from(
        entries
            .iter()
            .map(|e| e.timestamp.timestamp_micros())
            .collect::<Vec<_>>(),
    )
    .with_timezone("UTC");
    let queries = StringArray::from_iter_values(entries.iter().map(|e| e.query_text.as_str()));
    let responses = StringArray::from_iter_values(entries.iter().map(|e| e.reply_preview.as_str()));
    let scores = UInt8Array::from_iter_values(entries.iter().map(|e| e.tier.level()));

    let mut triggers = ListBuilder::new(StringBuilder::new());
    for entry in entries {
        for t in &entry.triggers {
            triggers.values().append_value(t);
        }
        triggers.append(true);
    }

    let sources: StringArray = entries.iter().map(|e| e.source.as_deref()).collect();
    let escalated: BooleanArray = entries.iter().map(|e| Some(e.escalated)).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(timestamps),
        Arc::new(queries),
        Arc::new(responses),
        Arc::new(scores),
        Arc::new(triggers.finish()),
        Arc::new(sources),
        Arc::new(escalated),
    ];
    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Write audit entries to a Parquet file, replacing any existing file.
#[cfg(feature = "parquet")]
pub fn write_parquet(path: &std::path::Path, entries: &[AuditLogEntry]) -> Result<usize, StoreError> {
    use parquet::arrow::ArrowWriter;

    let batch = entries_to_batch(entries)?;
    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    tracing::info!(path = %path.display(), rows = batch.num_rows(), "exported audit log to parquet");
    Ok(batch.num_rows())
}

/// Read a Parquet file into Arrow RecordBatches.
#[cfg(feature = "parquet")]
pub fn read_parquet(path: &std::path::Path) -> Result<Vec<RecordBatch>, StoreError> {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches: Result<Vec<RecordBatch>, _> = reader.collect();
    Ok(batches?)
}
