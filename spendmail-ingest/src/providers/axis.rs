//! Axis Bank account debit alerts
//!
//! Expected body text:
//!   Amount Debited: INR 2,000.00
//!   Account Number: XX1234
//!   Transaction Info: UPI/P2M/407512345678/SWIGGY

use spendmail_core::ProviderKind;

use super::TemplateProvider;
use crate::error::Result;

pub const SIGNATURE: &str = "Axis";

const MERCHANT: &str = r"Transaction Info:\s*(.*)\s*";
const ACCOUNT: &str = r"Account Number:\s*(.*)\s";
const AMOUNT: &str = r"Amount Debited:\s*INR\s*([\d,]+\.?\d*)";

pub fn provider() -> Result<TemplateProvider> {
    TemplateProvider::new(ProviderKind::AxisBank, SIGNATURE, MERCHANT, ACCOUNT, AMOUNT)
}
