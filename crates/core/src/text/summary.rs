pub const DEFAULT_SUMMARY_LENGTH: usize = 200;
const ELLIPSIS: &str = "...";

/// Extractive summary: the first and last sentences, clipped to `max_length`
/// characters. Texts with two sentences or fewer are only clipped.
pub fn summarize(text: &str, max_length: usize) -> String {
    let sentences: Vec<&str> =
        text.split('.').map(str::trim).filter(|sentence| !sentence.is_empty()).collect();

    if sentences.len() <= 2 {
        return take_chars(text.trim(), max_length);
    }

    let first = sentences[0];
    let last = sentences[sentences.len() - 1];
    let summary = format!("{first}. {last}.");

    if summary.chars().count() > max_length {
        if max_length <= ELLIPSIS.len() {
            return take_chars(&summary, max_length);
        }
        let keep = max_length - ELLIPSIS.len();
        return format!("{}{ELLIPSIS}", take_chars(&summary, keep));
    }
    summary
}

fn take_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}
