use regex::Regex;
use std::sync::LazyLock;

// Fragment (`#`) and root-relative (`/`) values never match; relative links are not resolved.
// A value cannot span lines, so an unterminated attribute yields nothing.
static HREF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href=["']([^#/"'\r\n][^"'\r\n]*)["']"#).expect("href pattern is valid")
});

/// Lazily yield the quoted value of every `href="..."` / `href='...'` attribute that does not
/// start with `#` or `/`. Values are returned verbatim; callers parse them further.
pub fn extract_links(body: &str) -> impl Iterator<Item = &str> {
    HREF_PATTERN
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}
