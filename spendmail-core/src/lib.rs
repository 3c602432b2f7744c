//! spendmail-core: transaction types, sinks and spend summaries

pub mod sink;
pub mod summary;
pub mod transaction;

pub use sink::{CsvSink, JsonlSink, MemorySink, StoreOutcome, TransactionSink, read_csv};
pub use summary::{SpendGroup, summarize};
pub use transaction::{KeyedTransaction, ProviderKind, Transaction, TransactionType, zero_time};
