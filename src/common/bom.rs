//! Byte Order Mark (BOM) handling for text payloads read from package parts.
//!
//! JSON parts written by other tools frequently start with a UTF-8 BOM, which
//! JSON parsers reject. Only UTF-8 payloads are accepted, so only the UTF-8
//! mark is stripped; other marks are reported so callers can fail clearly.

/// Supported BOM encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl BomKind {
    /// Returns the byte representation of the BOM.
    #[inline]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            BomKind::Utf8 => &UTF8_BOM,
            BomKind::Utf16Le => &UTF16_LE_BOM,
            BomKind::Utf16Be => &UTF16_BE_BOM,
            BomKind::Utf32Le => &UTF32_LE_BOM,
            BomKind::Utf32Be => &UTF32_BE_BOM,
        }
    }
}

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
/// UTF-32 little-endian BOM bytes.
pub const UTF32_LE_BOM: [u8; 4] = [0xFF, 0xFE, 0x00, 0x00];
/// UTF-32 big-endian BOM bytes.
pub const UTF32_BE_BOM: [u8; 4] = [0x00, 0x00, 0xFE, 0xFF];

/// Detect the BOM at the start of `data`, if any.
///
/// UTF-32 marks are checked before UTF-16 since the UTF-32 LE mark starts
/// with the UTF-16 LE mark.
pub fn detect_bom(data: &[u8]) -> Option<BomKind> {
    [
        BomKind::Utf32Be,
        BomKind::Utf32Le,
        BomKind::Utf8,
        BomKind::Utf16Be,
        BomKind::Utf16Le,
    ]
    .into_iter()
    .find(|kind| data.starts_with(kind.as_bytes()))
}

/// Strip a leading UTF-8 BOM from `data`.
///
/// Data without a BOM, or with a non-UTF-8 BOM, is returned unchanged.
#[inline]
pub fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&UTF8_BOM[..]).unwrap_or(data)
}
