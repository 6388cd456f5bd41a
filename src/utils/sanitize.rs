// Sanitization utilities

/// Remove all markup from `html`, keeping the text content.
/// `<script>` and `<style>` bodies are dropped entirely.
pub fn strip_tags(html: &str) -> String {
    let cleaned = ammonia::Builder::empty().clean(html).to_string();

    // ammonia serializes escaped text; undo it so the template escapes exactly once.
    // html5ever escapes only `&`, `<`, `>` and U+00A0 in text nodes, so these are the
    // only entities that can appear. `&amp;` goes last to keep `&amp;lt;` as `&lt;`.
    cleaned
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Truncate text to at most `max_chars` characters, ending with "..." when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept.trim_end())
    }
}

/// Plain-text preview of an entry's HTML content
pub fn snippet(html: &str, max_chars: usize) -> String {
    let text = strip_tags(html);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max_chars)
}
