//! Body decoder: base64url payload -> MIME envelope -> best plain-text body.
//!
//! Plain text wins whenever a `text/plain` part exists anywhere in the
//! multipart tree; HTML is only used (and flattened to text) when there is
//! no plain part at all.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use mailparse::{MailHeaderMap, ParsedMail, parse_mail};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// URL-safe alphabet, padding optional (mailbox exports drop it inconsistently).
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Multipart containers the walker descends into.
const CONTAINERS: [&str; 3] = ["multipart/alternative", "multipart/mixed", "multipart/related"];

/// Text derived from one raw message. Never mutated after decoding.
#[derive(Debug, Clone)]
pub struct DecodedBody {
    /// Best available plain-text body
    pub text: String,
    /// Raw `Date` header value, empty when absent
    pub date_header: String,
    /// Entire decoded payload (headers included), lossily converted to UTF-8
    pub raw: String,
}

pub struct BodyDecoder {
    drop_re: Regex,
    break_re: Regex,
    tag_re: Regex,
}

impl BodyDecoder {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| IngestError::Pattern {
                provider: "html",
                source,
            })
        };
        Ok(Self {
            drop_re: compile(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>")?,
            break_re: compile(r"(?i)<br\s*/?>|</(?:p|div|tr|li|table|h[1-6])\s*>")?,
            tag_re: compile(r"(?s)<[^>]+>")?,
        })
    }

    /// Decode a base64url payload into its text body and `Date` header.
    pub fn decode(&self, encoded: &str) -> Result<DecodedBody> {
        // Wrapped exports (76 columns, CRLF) are accepted; any other stray byte is not.
        let unwrapped: Vec<u8> = encoded
            .bytes()
            .filter(|b| *b != b'\r' && *b != b'\n')
            .collect();
        let data = URL_SAFE_LENIENT.decode(&unwrapped)?;
        let mail = parse_mail(&data)?;

        let date_header = mail.headers.get_first_value("Date").unwrap_or_default();
        let text = self.best_body(&mail)?;
        debug!(bytes = data.len(), text_len = text.len(), "decoded message");

        Ok(DecodedBody {
            text,
            date_header,
            raw: String::from_utf8_lossy(&data).into_owned(),
        })
    }

    fn best_body(&self, mail: &ParsedMail<'_>) -> Result<String> {
        // Single-part message: the envelope carries the body directly.
        if mail.subparts.is_empty() {
            let body = mail.get_body().map_err(IngestError::BodyExtraction)?;
            if mail.ctype.mimetype.eq_ignore_ascii_case("text/html") {
                return Ok(self.html_to_text(&body));
            }
            return Ok(body);
        }

        if let Some(plain) = find_part(mail, "text/plain") {
            return Ok(plain);
        }
        match find_part(mail, "text/html") {
            Some(html) => Ok(self.html_to_text(&html)),
            None => {
                warn!(mimetype = %mail.ctype.mimetype, "no text part found in multipart message");
                Ok(String::new())
            }
        }
    }

    /// Flatten an HTML body into newline-separated text lines.
    pub fn html_to_text(&self, html: &str) -> String {
        let text = self.drop_re.replace_all(html, "");
        let text = self.break_re.replace_all(&text, "\n");
        let text = self.tag_re.replace_all(&text, "");
        let text = text
            .replace("&nbsp;", " ")
            .replace("&#8377;", "₹")
            .replace("&#x20B9;", "₹")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Depth-first search for the first non-empty part of the wanted type.
fn find_part(mail: &ParsedMail<'_>, wanted: &str) -> Option<String> {
    for part in &mail.subparts {
        let mime = part.ctype.mimetype.to_ascii_lowercase();
        if mime == wanted {
            match part.get_body() {
                Ok(body) if !body.is_empty() => return Some(body),
                Ok(_) => {}
                Err(e) => warn!(mimetype = %mime, error = %e, "skipping undecodable part"),
            }
        } else if CONTAINERS.contains(&mime.as_str()) {
            if let Some(body) = find_part(part, wanted) {
                return Some(body);
            }
        }
    }
    None
}
