//! `Date` header parsing.

use chrono::{DateTime, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};
use spendmail_core::zero_time;
use tracing::warn;

use crate::error::{IngestError, Result};

/// `Mon, 2 Jan 2006 15:04:05 -0700`
pub const DATE_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// [`DATE_LAYOUT`] after the `Mon, ` prefix.
const DATE_BODY_LAYOUT: &str = "%d %b %Y %H:%M:%S %z";

/// What to do when the `Date` header does not fit [`DATE_LAYOUT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Fail the message.
    #[default]
    Strict,
    /// Fall back to the zero time and keep going.
    Lenient,
}

/// Parse a header in [`DATE_LAYOUT`]. The weekday name must be well formed
/// but is not checked against the date; senders get it wrong.
pub fn parse_mail_time(header: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = header.trim();
    let parsed = match split_weekday(trimmed) {
        Some(rest) => DateTime::parse_from_str(rest, DATE_BODY_LAYOUT),
        None => DateTime::parse_from_str(trimmed, DATE_LAYOUT),
    };
    parsed.map_err(|source| IngestError::Timestamp {
        header: header.to_string(),
        source,
    })
}

/// `"Thu, 15 Mar ..."` -> `"15 Mar ..."` when the prefix is a three-letter day name.
fn split_weekday(header: &str) -> Option<&str> {
    let (day, rest) = header.split_once(',')?;
    if day.len() != 3 || day.parse::<Weekday>().is_err() {
        return None;
    }
    rest.strip_prefix(' ')
}

pub fn resolve_mail_time(header: &str, policy: TimestampPolicy) -> Result<DateTime<FixedOffset>> {
    match (parse_mail_time(header), policy) {
        (Ok(t), _) => Ok(t),
        (Err(e), TimestampPolicy::Strict) => Err(e),
        (Err(e), TimestampPolicy::Lenient) => {
            warn!(error = %e, "using zero time for unparseable Date header");
            Ok(zero_time())
        }
    }
}
