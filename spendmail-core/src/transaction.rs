//! Transaction record types produced by the extraction engine

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single card/bank movement extracted from a notification email.
///
/// Every field is always populated: unmatched text fields are empty strings,
/// an unparseable amount is `0.0` and an unparseable timestamp is the zero time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Payee / merchant description
    pub merchant: String,
    /// Parsed from the message `Date` header
    pub occurred_at: DateTime<FixedOffset>,
    /// Positive = money received, negative = money spent
    pub amount: f64,
    /// Trailing digits of the card or account number
    pub account_ref: String,
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// The record emitted for messages nobody recognises.
    pub fn empty() -> Self {
        Self {
            merchant: String::new(),
            occurred_at: zero_time(),
            amount: 0.0,
            account_ref: String::new(),
            transaction_type: TransactionType::Undefined,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}

/// Zero-value timestamp used when a date is missing or unparseable.
pub fn zero_time() -> DateTime<FixedOffset> {
    DateTime::<FixedOffset>::default()
}

/// A transaction paired with the caller-supplied message identifier.
///
/// The identifier is what sinks deduplicate on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedTransaction {
    pub message_id: String,
    #[serde(flatten)]
    pub transaction: Transaction,
}

impl KeyedTransaction {
    pub fn new(message_id: impl Into<String>, transaction: Transaction) -> Self {
        Self {
            message_id: message_id.into(),
            transaction,
        }
    }
}

/// Coarse category derived from keywords in the body text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionType {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "ICICI Credit Card")]
    IciciCreditCard,
    #[serde(rename = "SBI UPI/ Debit Card")]
    SbiUpiDebitCard,
    #[serde(rename = "undefined")]
    Undefined,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CreditCard => "Credit Card",
            TransactionType::Upi => "UPI",
            TransactionType::IciciCreditCard => "ICICI Credit Card",
            TransactionType::SbiUpiDebitCard => "SBI UPI/ Debit Card",
            TransactionType::Undefined => "undefined",
        }
    }

    /// Inverse of [`TransactionType::as_str`]; anything else is `Undefined`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Credit Card" => TransactionType::CreditCard,
            "UPI" => TransactionType::Upi,
            "ICICI Credit Card" => TransactionType::IciciCreditCard,
            "SBI UPI/ Debit Card" => TransactionType::SbiUpiDebitCard,
            _ => TransactionType::Undefined,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bank or card issuer whose email template a message matches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    #[serde(rename = "scapia")]
    ScapiaCard,
    #[serde(rename = "axis")]
    AxisBank,
    #[serde(rename = "hdfc")]
    HdfcBank,
    #[serde(rename = "icici")]
    IciciBank,
    #[serde(rename = "sbi")]
    SbiBank,
    #[serde(rename = "unknown")]
    Unknown,
}

impl ProviderKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::ScapiaCard => "Scapia",
            ProviderKind::AxisBank => "Axis Bank",
            ProviderKind::HdfcBank => "HDFC Bank",
            ProviderKind::IciciBank => "ICICI Bank",
            ProviderKind::SbiBank => "SBI",
            ProviderKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_fully_populated() {
        let t = Transaction::empty();
        assert_eq!(t.merchant, "");
        assert_eq!(t.account_ref, "");
        assert_eq!(t.amount, 0.0);
        assert_eq!(t.occurred_at, zero_time());
        assert_eq!(t.transaction_type, TransactionType::Undefined);
        assert!(!t.is_expense());
        assert!(!t.is_income());
    }

    #[test]
    fn test_transaction_type_labels() {
        for tt in [
            TransactionType::CreditCard,
            TransactionType::Upi,
            TransactionType::IciciCreditCard,
            TransactionType::SbiUpiDebitCard,
            TransactionType::Undefined,
        ] {
            assert_eq!(TransactionType::from_label(tt.as_str()), tt);
            let json = serde_json::to_string(&tt).unwrap();
            assert_eq!(json, format!("\"{}\"", tt.as_str()));
        }
        assert_eq!(TransactionType::from_label("Debit"), TransactionType::Undefined);
    }

    #[test]
    fn test_keyed_serializes_flat() {
        let keyed = KeyedTransaction::new("msg-1", Transaction::empty());
        let value = serde_json::to_value(&keyed).unwrap();
        assert_eq!(value["message_id"], "msg-1");
        assert_eq!(value["transaction_type"], "undefined");
        assert_eq!(value["amount"], 0.0);
    }
}
