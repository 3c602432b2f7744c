//! Mailbox export reader.
//!
//! One message per line, either a Gmail `format=raw` object
//! (`{"id": "...", "raw": "<base64url>"}`) or a bare base64url payload.
//! Bare payloads get `<file-stem>:<line>` as their id.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawMessageLine {
    id: String,
    raw: String,
}

/// `(message_id, payload)` pairs in file order.
pub fn read_messages(path: &Path) -> Result<Vec<(String, String)>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());

    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('{') {
            let msg: RawMessageLine = serde_json::from_str(line)
                .with_context(|| format!("{}:{}: bad message object", path.display(), i + 1))?;
            out.push((msg.id, msg.raw));
        } else {
            out.push((format!("{}:{}", stem, i + 1), line.to_string()));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_json_and_bare_lines() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("inbox.txt");
        fs::write(
            &p,
            "# exported 2024-03-15\n{\"id\":\"18e3f\",\"raw\":\"SGVsbG8\"}\n\n  V29ybGQ=  \n",
        )
        .unwrap();

        let msgs = read_messages(&p).unwrap();
        assert_eq!(
            msgs,
            vec![
                ("18e3f".to_string(), "SGVsbG8".to_string()),
                ("inbox:4".to_string(), "V29ybGQ=".to_string()),
            ]
        );
    }

    #[test]
    fn test_bad_json_line_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("inbox.jsonl");
        fs::write(&p, "{\"id\": 1}\n").unwrap();
        let err = read_messages(&p).unwrap_err();
        assert!(format!("{err:#}").contains("inbox.jsonl:1"));
    }
}
