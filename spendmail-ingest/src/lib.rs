//! spendmail-ingest: turns bank and card alert emails into transactions.
//!
//! Pipeline: [`decode`] -> [`providers`] (classify + extract) ->
//! [`transaction_type`] / [`amount`] / [`timestamp`] -> [`extractor::assemble`].

pub mod amount;
pub mod batch;
pub mod decode;
pub mod error;
pub mod extractor;
pub mod providers;
pub mod timestamp;
pub mod transaction_type;

pub use batch::{BatchReport, MessageFailure, ingest_batch};
pub use error::IngestError;
pub use extractor::{MailExtractor, ParseOptions, parse_message};
pub use providers::{FieldSet, ProviderHandler, ProviderRegistry, TemplateProvider};
pub use timestamp::TimestampPolicy;
