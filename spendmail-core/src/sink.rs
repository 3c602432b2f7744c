//! Persistence boundary: where assembled transactions are handed off.
//!
//! Sinks own uniqueness. Every implementation is idempotent on
//! `message_id`, so replaying a mailbox export never duplicates rows.

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::transaction::{KeyedTransaction, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Inserted,
    /// A record with the same message id was already stored; nothing written.
    Duplicate,
}

/// Receives one call per successfully assembled transaction.
pub trait TransactionSink {
    fn store(&mut self, record: &KeyedTransaction) -> Result<StoreOutcome>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps everything in memory. Used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<KeyedTransaction>,
    seen: HashSet<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[KeyedTransaction] {
        &self.records
    }
}

impl TransactionSink for MemorySink {
    fn store(&mut self, record: &KeyedTransaction) -> Result<StoreOutcome> {
        if !self.seen.insert(record.message_id.clone()) {
            return Ok(StoreOutcome::Duplicate);
        }
        self.records.push(record.clone());
        Ok(StoreOutcome::Inserted)
    }
}

/// One row of the expenses CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExpenseRow {
    email_id: String,
    receiver_info: String,
    transaction_time: String,
    sender_information: String,
    amount: f64,
    transaction_type: String,
}

impl From<&KeyedTransaction> for ExpenseRow {
    fn from(k: &KeyedTransaction) -> Self {
        let t = &k.transaction;
        Self {
            email_id: k.message_id.clone(),
            receiver_info: t.merchant.clone(),
            transaction_time: t.occurred_at.to_rfc3339(),
            sender_information: t.account_ref.clone(),
            amount: t.amount,
            transaction_type: t.transaction_type.as_str().to_string(),
        }
    }
}

impl TryFrom<ExpenseRow> for KeyedTransaction {
    type Error = anyhow::Error;

    fn try_from(row: ExpenseRow) -> Result<Self> {
        let occurred_at = DateTime::parse_from_rfc3339(&row.transaction_time)
            .with_context(|| format!("bad transaction_time for {}", row.email_id))?;
        Ok(KeyedTransaction {
            message_id: row.email_id,
            transaction: Transaction {
                merchant: row.receiver_info,
                occurred_at,
                amount: row.amount,
                account_ref: row.sender_information,
                transaction_type: TransactionType::from_label(&row.transaction_type),
            },
        })
    }
}

/// Appends to an `expenses` CSV file (`email_id` is the unique key).
pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    seen: HashSet<String>,
}

impl CsvSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let existing = if path.exists() { read_csv(&path)? } else { Vec::new() };
        let seen: HashSet<String> = existing.into_iter().map(|k| k.message_id).collect();
        let is_empty = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        let writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);

        debug!(path = %path.display(), known = seen.len(), "opened csv sink");
        Ok(Self { path, writer, seen })
    }
}

impl TransactionSink for CsvSink {
    fn store(&mut self, record: &KeyedTransaction) -> Result<StoreOutcome> {
        if self.seen.contains(&record.message_id) {
            return Ok(StoreOutcome::Duplicate);
        }
        self.writer
            .serialize(ExpenseRow::from(record))
            .with_context(|| format!("write {}", self.path.display()))?;
        self.writer.flush()?;
        self.seen.insert(record.message_id.clone());
        Ok(StoreOutcome::Inserted)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Read every row previously written by [`CsvSink`].
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<KeyedTransaction>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;

    let mut out = Vec::new();
    for result in rdr.deserialize::<ExpenseRow>() {
        let row = result.with_context(|| format!("reading {}", path.display()))?;
        out.push(KeyedTransaction::try_from(row)?);
    }
    Ok(out)
}

#[derive(Deserialize)]
struct StoredId {
    message_id: String,
}

/// Appends one JSON object per line.
pub struct JsonlSink {
    path: PathBuf,
    writer: BufWriter<File>,
    seen: HashSet<String>,
}

impl JsonlSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut seen = HashSet::new();
        if path.exists() {
            let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            for line in BufReader::new(file).lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let stored: StoredId = serde_json::from_str(&line)
                    .with_context(|| format!("parse {}", path.display()))?;
                seen.insert(stored.message_id);
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            seen,
        })
    }
}

impl TransactionSink for JsonlSink {
    fn store(&mut self, record: &KeyedTransaction) -> Result<StoreOutcome> {
        if self.seen.contains(&record.message_id) {
            return Ok(StoreOutcome::Duplicate);
        }
        let line = serde_json::to_string(record)?;
        writeln!(self.writer, "{line}").with_context(|| format!("write {}", self.path.display()))?;
        self.writer.flush()?;
        self.seen.insert(record.message_id.clone());
        Ok(StoreOutcome::Inserted)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
