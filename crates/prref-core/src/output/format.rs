//! Output rendering: escaping, JSON, and human-readable text

use crate::types::ResolvedRefSet;
use std::fmt::Write as _;

/// Escape a value for GitHub Actions workflow command data
///
/// Encodes `%`, `\r`, `\n` so a value cannot start a new command line.
pub fn safe_output_escape(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value (`title=...`)
pub fn escape_property(s: &str) -> String {
    safe_output_escape(s).replace(':', "%3A").replace(',', "%2C")
}

/// `{output_key: reference}` as compact JSON, registry order
pub fn format_json(set: &ResolvedRefSet) -> String {
    serde_json::to_string(set).unwrap_or_else(|_| "{}".to_string())
}

/// Aligned summary table, one line per target
pub fn format_text(set: &ResolvedRefSet) -> String {
    let width = set.iter().map(|r| r.target.len()).max().unwrap_or(0);
    let mut buf = String::with_capacity(set.len() * (width + 32));
    for r in set {
        let _ = writeln!(
            buf,
            "  {:<width$}  {}  ({})",
            r.target,
            r.reference,
            r.origin.as_str(),
            width = width
        );
    }
    buf
}
