//! Term normalization shared by chunk indexing and query vectorization.
//!
//! Both sides of retrieval must go through [`tokenize`]; a second tokenizer
//! would silently produce vectors over different terms.

/// A normalized token.
pub type Term = String;

/// Tokens shorter than this (in characters) are discarded.
pub const MIN_TERM_LEN: usize = 3;

/// Lower-case Vietnamese letters with diacritics that count as term characters.
pub const ACCENTED_LETTERS: &str = "àáảãạăằắẳẵặâầấẩẫậèéẻẽẹêềếểễệìíỉĩịòóỏõọôồốổỗộơờớởỡợùúủũụưừứửữựỳýỷỹỵđ";

/// Returns true for characters kept inside a term (after lower-casing).
pub fn is_term_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ACCENTED_LETTERS.contains(c)
}

/// Lower-case `text`, blank out non-term characters, split on whitespace and
/// drop tokens shorter than [`MIN_TERM_LEN`].
pub fn tokenize(text: &str) -> Vec<Term> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_term_char(c) { c } else { ' ' })
        .collect();
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TERM_LEN)
        .map(str::to_string)
        .collect()
}
