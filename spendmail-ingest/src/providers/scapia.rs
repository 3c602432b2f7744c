//! Scapia credit card alerts
//!
//! Expected body text:
//!   Your Scapia Federal Credit Card ending in 4321 has been debited
//!   Merchant Big Bazaar
//!   Amount ₹1,500.00
//!
//! Mails sent without a charset come out of MIME decoding with the rupee sign
//! read as Windows-1252 (`â‚¹`), so both spellings are accepted.

use spendmail_core::ProviderKind;

use super::TemplateProvider;
use crate::error::Result;

pub const SIGNATURE: &str = "Scapia";

const MERCHANT: &str = r"Merchant\s*(.+?)(?:\n|Not you)";
const CARD: &str = r"Credit Card ending in (\d+) has";
const AMOUNT: &str = r"Amount\s*(?:₹|â‚¹)\s*([\d,]+\.?\d*)";

pub fn provider() -> Result<TemplateProvider> {
    TemplateProvider::new(ProviderKind::ScapiaCard, SIGNATURE, MERCHANT, CARD, AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderHandler;

    #[test]
    fn test_extracts_scapia_fields() {
        let body = "Hi,\nYour Scapia Federal Credit Card ending in 4321 has been debited\n\
                    Merchant Big Bazaar\nAmount ₹1,500.00\nDate 15 Mar 2024\n";
        let fields = provider().unwrap().extract(body);
        assert_eq!(fields.merchant, "Big Bazaar");
        assert_eq!(fields.account_ref, "4321");
        assert_eq!(fields.raw_amount, "1,500.00");
    }

    #[test]
    fn test_amount_with_misdecoded_rupee_sign() {
        let body = "Credit Card ending in 4321 has been debited\nMerchant Big Bazaar\nAmount â‚¹1,500.00\n";
        let fields = provider().unwrap().extract(body);
        assert_eq!(fields.raw_amount, "1,500.00");
        assert_eq!(fields.merchant, "Big Bazaar");
    }

    #[test]
    fn test_merchant_stops_at_not_you() {
        let body = "Merchant ZOMATO LTD Not you? Call us";
        assert_eq!(provider().unwrap().extract(body).merchant, "ZOMATO LTD");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let fields = provider().unwrap().extract("Scapia rewards statement");
        assert_eq!(fields.merchant, "");
        assert_eq!(fields.account_ref, "");
        assert_eq!(fields.raw_amount, "");
    }
}
