//! Byte Order Mark (BOM) handling for manifest bytes.
//!
//! Most authoring tools write `imsmanifest.xml` as UTF-8, some with a BOM and a
//! few as UTF-16. The XML reader works on UTF-8, so manifests are normalized
//! here before parsing.

use std::borrow::Cow;

/// Supported BOM encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl BomKind {
    /// Returns the byte representation of the BOM.
    #[inline]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            BomKind::Utf8 => &UTF8_BOM,
            BomKind::Utf16Le => &UTF16_LE_BOM,
            BomKind::Utf16Be => &UTF16_BE_BOM,
        }
    }

    /// Returns the length in bytes of the BOM.
    #[inline]
    #[allow(clippy::len_without_is_empty)] // No need to check for empty BOMs
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }
}

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Detects a BOM at the start of `bytes`.
pub fn detect_bom(bytes: &[u8]) -> Option<BomKind> {
    if bytes.starts_with(&UTF8_BOM) {
        Some(BomKind::Utf8)
    } else if bytes.starts_with(&UTF16_LE_BOM) {
        Some(BomKind::Utf16Le)
    } else if bytes.starts_with(&UTF16_BE_BOM) {
        Some(BomKind::Utf16Be)
    } else {
        None
    }
}

/// Returns UTF-8 bytes for the XML reader, without any BOM.
///
/// UTF-8 input is borrowed; UTF-16 input is transcoded.
pub fn to_utf8_xml(bytes: &[u8]) -> Cow<'_, [u8]> {
    match detect_bom(bytes) {
        Some(BomKind::Utf8) => Cow::Borrowed(&bytes[UTF8_BOM.len()..]),
        Some(kind @ (BomKind::Utf16Le | BomKind::Utf16Be)) => {
            Cow::Owned(decode_utf16(bytes, kind).into_owned().into_bytes())
        },
        None => Cow::Borrowed(bytes),
    }
}

/// Decodes manifest bytes to text for display.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; a UTF-8 BOM is
/// kept so the text matches the stored bytes.
pub fn decode_text(bytes: &[u8]) -> String {
    match detect_bom(bytes) {
        Some(kind @ (BomKind::Utf16Le | BomKind::Utf16Be)) => decode_utf16(bytes, kind).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], kind: BomKind) -> Cow<'_, str> {
    let encoding = if kind == BomKind::Utf16Le {
        encoding_rs::UTF_16LE
    } else {
        encoding_rs::UTF_16BE
    };
    let (text, _had_errors) = encoding.decode_without_bom_handling(&bytes[kind.len()..]);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_bom() {
        assert_eq!(detect_bom(b"\xEF\xBB\xBF<a/>"), Some(BomKind::Utf8));
        assert_eq!(detect_bom(b"\xFF\xFE<\x00"), Some(BomKind::Utf16Le));
        assert_eq!(detect_bom(b"\xFE\xFF\x00<"), Some(BomKind::Utf16Be));
        assert_eq!(detect_bom(b"<a/>"), None);
        assert_eq!(detect_bom(b""), None);
    }

    #[test]
    fn test_utf8_bom_is_stripped_for_parsing() {
        let xml = to_utf8_xml(b"\xEF\xBB\xBF<manifest/>");
        assert_eq!(xml.as_ref(), b"<manifest/>");
        assert!(matches!(xml, Cow::Borrowed(_)));
    }

    #[test]
    fn test_utf16_is_transcoded() {
        let mut bytes = UTF16_LE_BOM.to_vec();
        for unit in "<m/>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(to_utf8_xml(&bytes).as_ref(), b"<m/>");
        assert_eq!(decode_text(&bytes), "<m/>");
    }

    #[test]
    fn test_decode_text_is_lossy() {
        assert_eq!(decode_text(b"ok\xFFok"), "ok\u{FFFD}ok");
    }
}
