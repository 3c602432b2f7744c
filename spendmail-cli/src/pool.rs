//! Bounded worker pool for parsing. Results come back in input order.

use anyhow::{Context, Result};
use spendmail_core::Transaction;
use spendmail_ingest::{IngestError, MailExtractor};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub type Parsed = (String, std::result::Result<Transaction, IngestError>);

pub async fn parse_all(
    extractor: Arc<MailExtractor>,
    messages: Vec<(String, String)>,
    workers: usize,
) -> Result<Vec<Parsed>> {
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles = Vec::with_capacity(messages.len());

    for (id, payload) in messages {
        let permit = Arc::clone(&permits)
            .acquire_owned()
            .await
            .context("worker pool closed")?;
        let extractor = Arc::clone(&extractor);
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let result = extractor.parse_message(&payload);
            (id, result)
        }));
    }

    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        out.push(handle.await.context("parse worker panicked")?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendmail_ingest::ParseOptions;

    #[tokio::test]
    async fn test_preserves_order_and_failures() {
        let extractor = Arc::new(MailExtractor::new(ParseOptions::default()).unwrap());
        let messages: Vec<_> = (0..10)
            .map(|i| {
                // "Subject: hi\r\n\r\nhello"
                let payload = if i % 3 == 0 { "!!!" } else { "U3ViamVjdDogaGkNCg0KaGVsbG8=" };
                (format!("m{i}"), payload.to_string())
            })
            .collect();

        let results = parse_all(extractor, messages, 3).await.unwrap();
        assert_eq!(results.len(), 10);
        for (i, (id, result)) in results.iter().enumerate() {
            assert_eq!(id, &format!("m{i}"));
            assert_eq!(result.is_err(), i % 3 == 0);
        }
    }
}
