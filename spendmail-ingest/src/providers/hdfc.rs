//! HDFC Bank credit card alerts
//!
//! Expected body text:
//!   Rs.1,250.00 is debited from your HDFC Bank Credit Card ending 5678
//!   towards AMAZON PAY INDIA on 15 Mar, 2024 at 10:30:00.

use spendmail_core::ProviderKind;

use super::TemplateProvider;
use crate::error::Result;

pub const SIGNATURE: &str = "HDFC";

const MERCHANT: &str = r"towards\s+(.+?)\s+on\s+\d";
const CARD: &str = r"HDFC\sBank\sCredit\sCard\sending\s(.*)\stowards";
const AMOUNT: &str = r"Rs.\s*([\d,]+\.?\d*) is";

pub fn provider() -> Result<TemplateProvider> {
    TemplateProvider::new(ProviderKind::HdfcBank, SIGNATURE, MERCHANT, CARD, AMOUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderHandler;

    #[test]
    fn test_extracts_hdfc_fields() {
        let body = "Dear Customer, Rs.1,250.00 is debited from your HDFC Bank Credit Card ending 5678 \
                    towards AMAZON PAY INDIA on 15 Mar, 2024 at 10:30:00.";
        let fields = provider().unwrap().extract(body);
        assert_eq!(fields.merchant, "AMAZON PAY INDIA");
        assert_eq!(fields.account_ref, "5678");
        assert_eq!(fields.raw_amount, "1,250.00");
    }

    #[test]
    fn test_amount_without_dot_after_rs() {
        // The dot after "Rs" is a wildcard in the template.
        let body = "Rs 99 is debited";
        assert_eq!(provider().unwrap().extract(body).raw_amount, "99");
    }
}
