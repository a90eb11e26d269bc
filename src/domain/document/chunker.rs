/// Split text into chunks of at most `max_chars` characters.
///
/// Splits on a plain character budget: chunks may end mid-word. Concatenating the
/// result gives back `text`. Blank input yields no chunks.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
