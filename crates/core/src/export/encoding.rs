//! Windows-1251, the byte encoding the tax authority imports.
//!
//! Every character that survives [`is_representable`] maps to exactly one
//! byte, so a field's width in characters is its width in bytes.

use encoding_rs::WINDOWS_1251;

/// Returns true if `c` has a single-byte Windows-1251 code.
#[must_use]
pub fn is_representable(c: char) -> bool {
    if c.is_ascii() {
        return true;
    }
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = WINDOWS_1251.encode(c.encode_utf8(&mut buf));
    !had_errors && bytes.len() == 1
}

/// Encodes sanitized text. Returns `None` if any character is unmappable.
#[must_use]
pub fn encode(text: &str) -> Option<Vec<u8>> {
    let (bytes, _, had_errors) = WINDOWS_1251.encode(text);
    (!had_errors).then(|| bytes.into_owned())
}

/// Decodes Windows-1251 bytes.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1251.decode_without_bom_handling(bytes);
    text.into_owned()
}
