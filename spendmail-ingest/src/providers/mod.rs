//! Provider registry: signature-based classification plus per-issuer
//! field extraction templates.
//!
//! Handlers are consulted in registration order and the first match wins,
//! so a forwarded mail mentioning two banks always resolves the same way.
//! Anything unmatched falls through to [`UnknownProvider`].

use regex::Regex;
use spendmail_core::ProviderKind;
use tracing::debug;

use crate::error::{IngestError, Result};

pub mod axis;
pub mod hdfc;
pub mod icici;
pub mod sbi;
pub mod scapia;

/// Raw text pulled out of a body by a provider template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub merchant: String,
    pub account_ref: String,
    /// Amount as captured, thousands separators still present
    pub raw_amount: String,
}

pub trait ProviderHandler: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Does the full decoded payload carry this provider's signature?
    fn matches(&self, content: &str) -> bool;

    fn extract(&self, text: &str) -> FieldSet;

    /// True only for the catch-all handler; the pipeline skips parsing for it.
    fn is_fallback(&self) -> bool {
        false
    }
}

/// Merchant / account / amount patterns, one capture group each.
#[derive(Debug, Clone)]
pub struct PatternSet {
    merchant: Regex,
    account: Regex,
    amount: Regex,
}

impl PatternSet {
    pub fn compile(
        merchant: &str,
        account: &str,
        amount: &str,
    ) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            merchant: Regex::new(merchant)?,
            account: Regex::new(account)?,
            amount: Regex::new(amount)?,
        })
    }
}

/// A provider described entirely by a signature substring and a pattern set.
#[derive(Debug, Clone)]
pub struct TemplateProvider {
    kind: ProviderKind,
    signature: &'static str,
    patterns: PatternSet,
}

impl TemplateProvider {
    pub fn new(
        kind: ProviderKind,
        signature: &'static str,
        merchant: &str,
        account: &str,
        amount: &str,
    ) -> Result<Self> {
        let patterns = PatternSet::compile(merchant, account, amount).map_err(|source| {
            IngestError::Pattern {
                provider: kind.label(),
                source,
            }
        })?;
        Ok(Self {
            kind,
            signature,
            patterns,
        })
    }
}

impl ProviderHandler for TemplateProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn matches(&self, content: &str) -> bool {
        content.contains(self.signature)
    }

    fn extract(&self, text: &str) -> FieldSet {
        let fields = FieldSet {
            merchant: capture(&self.patterns.merchant, text),
            account_ref: capture(&self.patterns.account, text),
            raw_amount: capture(&self.patterns.amount, text),
        };
        if fields.merchant.is_empty() || fields.account_ref.is_empty() || fields.raw_amount.is_empty() {
            debug!(
                provider = %self.kind,
                merchant = !fields.merchant.is_empty(),
                account = !fields.account_ref.is_empty(),
                amount = !fields.raw_amount.is_empty(),
                "template matched partially"
            );
        }
        fields
    }
}

/// Null object for unrecognised senders: extracts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownProvider;

impl ProviderHandler for UnknownProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Unknown
    }

    fn matches(&self, _content: &str) -> bool {
        true
    }

    fn extract(&self, _text: &str) -> FieldSet {
        FieldSet::default()
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

/// First capture group, trimmed; empty when the pattern does not match.
pub fn capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Ordered set of handlers. Earlier registrations take priority.
pub struct ProviderRegistry {
    handlers: Vec<Box<dyn ProviderHandler>>,
    fallback: UnknownProvider,
}

impl ProviderRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
            fallback: UnknownProvider,
        }
    }

    /// Scapia, Axis, HDFC, ICICI, SBI, in that priority order.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::empty();
        registry.register(Box::new(scapia::provider()?));
        registry.register(Box::new(axis::provider()?));
        registry.register(Box::new(hdfc::provider()?));
        registry.register(Box::new(icici::provider()?));
        registry.register(Box::new(sbi::provider()?));
        Ok(registry)
    }

    /// Append a handler with lower priority than everything already registered.
    pub fn register(&mut self, handler: Box<dyn ProviderHandler>) {
        self.handlers.push(handler);
    }

    pub fn classify(&self, content: &str) -> &dyn ProviderHandler {
        self.handlers
            .iter()
            .find(|h| h.matches(content))
            .map(|h| &**h)
            .unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_priority_order() {
        let registry = ProviderRegistry::builtin().unwrap();
        let cases = [
            ("Scapia Axis HDFC ICICI SBI", ProviderKind::ScapiaCard),
            ("Axis HDFC ICICI SBI", ProviderKind::AxisBank),
            ("HDFC ICICI SBI", ProviderKind::HdfcBank),
            ("ICICI SBI", ProviderKind::IciciBank),
            ("SBI", ProviderKind::SbiBank),
        ];
        for (content, kind) in cases {
            assert_eq!(registry.classify(content).kind(), kind, "{content}");
        }
    }

    #[test]
    fn test_first_signature_wins() {
        let registry = ProviderRegistry::builtin().unwrap();
        // Forwarded HDFC alert that also mentions Axis.
        let content = "Fwd: HDFC alert\nAlso sent to my Axis account";
        assert_eq!(registry.classify(content).kind(), ProviderKind::AxisBank);
        assert_eq!(registry.classify("ICICI and SBI").kind(), ProviderKind::IciciBank);
        assert_eq!(registry.classify("only SBI").kind(), ProviderKind::SbiBank);
    }

    #[test]
    fn test_unknown_fallback_extracts_nothing() {
        let registry = ProviderRegistry::builtin().unwrap();
        let handler = registry.classify("Your Kotak statement is ready");
        assert_eq!(handler.kind(), ProviderKind::Unknown);
        assert!(handler.is_fallback());
        assert_eq!(handler.extract("Merchant X\nAmount ₹1.00"), FieldSet::default());
    }

    #[test]
    fn test_registered_handler_is_lowest_priority() {
        let mut registry = ProviderRegistry::builtin().unwrap();
        registry.register(Box::new(
            TemplateProvider::new(
                ProviderKind::Unknown,
                "Kotak",
                r"at (.+?)\.",
                r"card (\d+)",
                r"INR ([\d,.]+)",
            )
            .unwrap(),
        ));
        let handler = registry.classify("Kotak card 1111 spent INR 5.00 at CAFE.");
        assert!(!handler.is_fallback());
        assert_eq!(handler.extract("Kotak card 1111 spent INR 5.00 at CAFE.").merchant, "CAFE");
        // Built-ins still win when both signatures are present.
        assert_eq!(registry.classify("Kotak / SBI").kind(), ProviderKind::SbiBank);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = TemplateProvider::new(ProviderKind::AxisBank, "Axis", "(", "a", "b").unwrap_err();
        assert!(matches!(err, IngestError::Pattern { provider: "Axis Bank", .. }));
    }

    #[test]
    fn test_capture_trims() {
        let re = Regex::new(r"Info:(.*)").unwrap();
        assert_eq!(capture(&re, "Info:   SWIGGY  \r"), "SWIGGY");
        assert_eq!(capture(&re, "nothing here"), "");
    }
}
