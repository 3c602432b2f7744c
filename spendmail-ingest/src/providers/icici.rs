//! ICICI Bank credit card alerts
//!
//! Expected body text:
//!   Your ICICI Bank Credit Card XX9876 has been used for a transaction of
//!   INR 3,499.00 on Mar 15, 2024 at 10:30:00. Info: FLIPKART INTERNET.

use spendmail_core::ProviderKind;

use super::TemplateProvider;
use crate::error::Result;

pub const SIGNATURE: &str = "ICICI";

const MERCHANT: &str = r"Info:\s*(.+?)\.\s";
const CARD: &str = r"Your\sICICI\sBank\sCredit\sCard\s+(.*?)\shas";
const AMOUNT: &str = r"transaction\sof\sINR\s+([\d,]+\.?\d*)\son";

pub fn provider() -> Result<TemplateProvider> {
    TemplateProvider::new(ProviderKind::IciciBank, SIGNATURE, MERCHANT, CARD, AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderHandler;

    #[test]
    fn test_extracts_icici_fields() {
        let body = "Dear Customer,\n\nYour ICICI Bank Credit Card XX9876 has been used for a transaction of \
                    INR 3,499.00 on Mar 15, 2024 at 10:30:00. Info: FLIPKART INTERNET. \
                    The Available Credit Limit on your card is INR 46,501.00.";
        let fields = provider().unwrap().extract(body);
        assert_eq!(fields.merchant, "FLIPKART INTERNET");
        assert_eq!(fields.account_ref, "XX9876");
        assert_eq!(fields.raw_amount, "3,499.00");
    }

    #[test]
    fn test_merchant_needs_sentence_terminator() {
        let fields = provider().unwrap().extract("Info: NO TERMINATOR");
        assert_eq!(fields.merchant, "");
    }
}
