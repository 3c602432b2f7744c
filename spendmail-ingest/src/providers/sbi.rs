//! SBI account debit alerts
//!
//! Expected body text:
//!   Dear Customer, Your A/C XXXXX1234 has a debit by transfer of Rs 750.00
//!   on 15Mar24. Avl Bal Rs 10,000.00.-SBI

use spendmail_core::ProviderKind;

use super::TemplateProvider;
use crate::error::Result;

pub const SIGNATURE: &str = "SBI";

const MERCHANT: &str = r"debit\sby\s(.*?)\sof";
const ACCOUNT: &str = r"Your\sA/C\s(.*?)\shas";
const AMOUNT: &str = r"Rs\s(.*?)\son";

pub fn provider() -> Result<TemplateProvider> {
    TemplateProvider::new(ProviderKind::SbiBank, SIGNATURE, MERCHANT, ACCOUNT, AMOUNT)
}
