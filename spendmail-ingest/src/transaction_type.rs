//! Transaction-type resolution from body keywords.
//!
//! Deliberately separate from provider classification: this table labels
//! the kind of payment, the registry picks the template. They may disagree.

use spendmail_core::TransactionType;

/// Keyword rules in priority order; first hit wins.
const RULES: &[(&[&str], TransactionType)] = &[
    (&["Scapia", "HDFC Bank Credit Card"], TransactionType::CreditCard),
    (&["BLOCKUPI"], TransactionType::Upi),
    (&["ICICI Bank Credit Card"], TransactionType::IciciCreditCard),
    (&["SBI"], TransactionType::SbiUpiDebitCard),
];

pub fn resolve_transaction_type(text: &str) -> TransactionType {
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, tt)| *tt)
        .unwrap_or(TransactionType::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        assert_eq!(resolve_transaction_type("Scapia card"), TransactionType::CreditCard);
        assert_eq!(
            resolve_transaction_type("your HDFC Bank Credit Card ending 1"),
            TransactionType::CreditCard
        );
        assert_eq!(resolve_transaction_type("SMS BLOCKUPI to"), TransactionType::Upi);
        assert_eq!(
            resolve_transaction_type("Your ICICI Bank Credit Card XX1"),
            TransactionType::IciciCreditCard
        );
        assert_eq!(resolve_transaction_type("-SBI"), TransactionType::SbiUpiDebitCard);
        assert_eq!(resolve_transaction_type("Kotak"), TransactionType::Undefined);
    }

    #[test]
    fn test_credit_card_beats_upi_and_sbi() {
        let text = "Scapia alert. SMS BLOCKUPI. SBI";
        assert_eq!(resolve_transaction_type(text), TransactionType::CreditCard);
        assert_eq!(resolve_transaction_type("BLOCKUPI from SBI"), TransactionType::Upi);
    }

    #[test]
    fn test_hdfc_without_credit_card_phrase_is_not_credit_card() {
        // An HDFC debit-card alert: the template is HDFC but the label is not.
        assert_eq!(
            resolve_transaction_type("HDFC Bank Debit Card ending 1"),
            TransactionType::Undefined
        );
    }
}
