//! Batch driver: run many messages through the extractor and into a sink,
//! skipping messages that fail instead of stopping the run.

use anyhow::Result;
use serde::Serialize;
use spendmail_core::{KeyedTransaction, StoreOutcome, Transaction, TransactionSink};
use tracing::{info, warn};

use crate::error::IngestError;
use crate::extractor::MailExtractor;

#[derive(Debug, Clone, Serialize)]
pub struct MessageFailure {
    pub message_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub parsed: usize,
    pub stored: usize,
    pub duplicates: usize,
    pub failures: Vec<MessageFailure>,
}

impl BatchReport {
    /// Account for one message. Parse failures are recorded; sink errors propagate.
    pub fn record<S>(
        &mut self,
        sink: &mut S,
        message_id: String,
        result: std::result::Result<Transaction, IngestError>,
    ) -> Result<()>
    where
        S: TransactionSink + ?Sized,
    {
        match result {
            Ok(transaction) => {
                self.parsed += 1;
                let keyed = KeyedTransaction::new(message_id, transaction);
                match sink.store(&keyed)? {
                    StoreOutcome::Inserted => self.stored += 1,
                    StoreOutcome::Duplicate => self.duplicates += 1,
                }
            }
            Err(e) => {
                warn!(message_id = %message_id, error = %e, "skipping message");
                self.failures.push(MessageFailure {
                    message_id,
                    error: e.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Process `(message_id, payload)` pairs in order.
pub fn ingest_batch<S, I>(extractor: &MailExtractor, sink: &mut S, messages: I) -> Result<BatchReport>
where
    S: TransactionSink + ?Sized,
    I: IntoIterator<Item = (String, String)>,
{
    let mut report = BatchReport::default();
    for (message_id, payload) in messages {
        let result = extractor.parse_message(&payload);
        report.record(sink, message_id, result)?;
    }
    sink.flush()?;

    info!(
        parsed = report.parsed,
        stored = report.stored,
        duplicates = report.duplicates,
        failed = report.failed(),
        "batch complete"
    );
    Ok(report)
}
