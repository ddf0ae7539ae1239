/// Separator placed between retrieved passages in the user prompt.
pub const PASSAGE_SEPARATOR: &str = "\n\n---\n\n";

pub fn build_user_prompt(query: &str, passages: &[String]) -> String {
    format!(
        "DOCUMENT EXCERPTS:\n{}\n\nQUESTION: {}\n\nAnswer the question using the excerpts above.",
        passages.join(PASSAGE_SEPARATOR),
        query
    )
}
