//! The extraction pipeline: decode, classify, extract, assemble.
//!
//! A [`MailExtractor`] holds only compiled patterns and options, so a single
//! instance can be shared by any number of worker threads.

use chrono::{DateTime, FixedOffset};
use spendmail_core::{KeyedTransaction, ProviderKind, Transaction, TransactionType};
use tracing::debug;

use crate::amount::normalize_amount;
use crate::decode::BodyDecoder;
use crate::error::Result;
use crate::providers::{ProviderHandler, ProviderRegistry};
use crate::timestamp::{TimestampPolicy, resolve_mail_time};
use crate::transaction_type::resolve_transaction_type;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub timestamp_policy: TimestampPolicy,
}

pub struct MailExtractor {
    decoder: BodyDecoder,
    registry: ProviderRegistry,
    options: ParseOptions,
}

impl MailExtractor {
    /// Extractor with the built-in provider registry.
    pub fn new(options: ParseOptions) -> Result<Self> {
        Self::with_registry(ProviderRegistry::builtin()?, options)
    }

    pub fn with_registry(registry: ProviderRegistry, options: ParseOptions) -> Result<Self> {
        Ok(Self {
            decoder: BodyDecoder::new()?,
            registry,
            options,
        })
    }

    /// Which provider a raw payload would be routed to.
    pub fn classify(&self, encoded: &str) -> Result<ProviderKind> {
        let decoded = self.decoder.decode(encoded)?;
        Ok(self.registry.classify(&decoded.raw).kind())
    }

    /// Turn one base64url-encoded email into a transaction.
    ///
    /// Errors only for failures fatal to this message: bad encoding, bad MIME,
    /// or (under the strict policy) a bad `Date` header.
    pub fn parse_message(&self, encoded: &str) -> Result<Transaction> {
        let decoded = self.decoder.decode(encoded)?;
        let handler: &dyn ProviderHandler = self.registry.classify(&decoded.raw);

        if handler.is_fallback() {
            debug!("no provider signature found");
            return Ok(Transaction::empty());
        }

        let occurred_at = resolve_mail_time(&decoded.date_header, self.options.timestamp_policy)?;
        let fields = handler.extract(&decoded.text);
        let amount = normalize_amount(&fields.raw_amount, &decoded.text);
        let transaction_type = resolve_transaction_type(&decoded.text);

        debug!(provider = %handler.kind(), %transaction_type, amount, "extracted transaction");
        Ok(assemble(
            fields.merchant,
            occurred_at,
            amount,
            fields.account_ref,
            transaction_type,
        ))
    }

    /// Same as [`MailExtractor::parse_message`], tagged with the caller's id.
    pub fn parse_keyed(&self, message_id: &str, encoded: &str) -> Result<KeyedTransaction> {
        let transaction = self.parse_message(encoded)?;
        Ok(KeyedTransaction::new(message_id, transaction))
    }
}

pub fn assemble(
    merchant: String,
    occurred_at: DateTime<FixedOffset>,
    amount: f64,
    account_ref: String,
    transaction_type: TransactionType,
) -> Transaction {
    Transaction {
        merchant,
        occurred_at,
        amount,
        account_ref,
        transaction_type,
    }
}

/// One-shot parse with default options.
pub fn parse_message(encoded: &str) -> Result<Transaction> {
    MailExtractor::new(ParseOptions::default())?.parse_message(encoded)
}
