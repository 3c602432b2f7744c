//! Amount normalization: strip separators, parse, apply direction.

use tracing::warn;

const INFLOW_KEYWORDS: [&str; 2] = ["credited", "received"];

/// Remove thousands separators (both western and lakh grouping).
pub fn clean_amount(raw: &str) -> String {
    raw.trim().replace(',', "")
}

/// Money in when the body says so; everything else is treated as spend.
pub fn is_inflow(body: &str) -> bool {
    INFLOW_KEYWORDS.iter().any(|k| body.contains(k))
}

/// Parse a captured amount and sign it from the body text.
///
/// Unparseable input yields `0.0` and a warning, never an error.
pub fn normalize_amount(raw: &str, body: &str) -> f64 {
    let cleaned = clean_amount(raw);
    let value = match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        Ok(_) => {
            warn!(raw, "amount is not a finite number, defaulting to 0");
            return 0.0;
        }
        Err(e) => {
            warn!(raw, error = %e, "unable to parse amount, defaulting to 0");
            return 0.0;
        }
    };

    if is_inflow(body) { value } else { -value }
}
