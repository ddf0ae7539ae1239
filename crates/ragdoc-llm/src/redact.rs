//! Masking of credentials in text that may reach logs or callers.

pub const REDACTED: &str = "[redacted]";

/// Token prefixes used by Hugging Face and OpenAI-style API keys.
const SECRET_PREFIXES: [&str; 2] = ["hf_", "sk-"];

/// Shorter runs after a prefix are ordinary words (`sk-1`), not keys.
const MIN_SECRET_LEN: usize = 4;

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Replace every token that looks like an API key with [`REDACTED`].
///
/// A key starts with a known prefix at a word boundary (start of text or
/// after a non-alphanumeric character, so `'hf_x…'` and `Bearer:sk-…` match
/// but `task-based` does not) and runs until the first character that cannot
/// be part of a key.
pub fn redact_secrets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        let at_boundary = text[..i].chars().next_back().map_or(true, |c| !c.is_alphanumeric());
        if at_boundary {
            if let Some(prefix) = SECRET_PREFIXES.iter().find(|p| rest.starts_with(**p)) {
                let tail = &rest[prefix.len()..];
                let len = tail.find(|c: char| !is_secret_char(c)).unwrap_or(tail.len());
                if len >= MIN_SECRET_LEN {
                    out.push_str(REDACTED);
                    i += prefix.len() + len;
                    continue;
                }
            }
        }
        let Some(c) = rest.chars().next() else { break };
        out.push(c);
        i += c.len_utf8();
    }
    out
}

/// Replace each occurrence of `secret` (when non-blank), then any key-shaped token.
pub fn redact_known(text: &str, secret: Option<&str>) -> String {
    let replaced = match secret.map(str::trim).filter(|s| !s.is_empty()) {
        Some(secret) => text.replace(secret, REDACTED),
        None => text.to_string(),
    };
    redact_secrets(&replaced)
}
