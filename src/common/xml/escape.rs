use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

const SPECIAL_CHARS: [&str; 5] = ["&", "<", ">", "\"", "'"];
const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

// Built once, shared by every relationship / content-type / core-properties writer
static ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(SPECIAL_CHARS)
        .expect("static escape patterns are valid")
});

static UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(ENTITIES)
        .expect("static entity patterns are valid")
});

/// Escape the five XML special characters for use in attribute values and text.
///
/// ```
/// use aasx::common::xml::escape_xml;
/// assert_eq!(
///     escape_xml("/aasx/files/a&b.pdf"),
///     "/aasx/files/a&amp;b.pdf"
/// );
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    ESCAPER.replace_all(s, &ENTITIES)
}

/// Replace the five predefined XML entities with their characters.
///
/// Unknown or incomplete entities are left untouched.
#[inline]
pub fn unescape_xml(s: &str) -> String {
    UNESCAPER.replace_all(s, &SPECIAL_CHARS)
}
