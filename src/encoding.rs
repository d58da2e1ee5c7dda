//! Input transcoding using chardetng and `encoding_rs`.

use chardetng::EncodingDetector;
use simdutf8::basic::from_utf8;
use std::borrow::Cow;

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (Byte Order Mark).
///
/// The UTF-8 BOM is the byte sequence: EF BB BF
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

/// Remove a leading UTF-8 BOM, keeping borrowed data borrowed.
pub fn strip_bom(data: Cow<'_, [u8]>) -> Cow<'_, [u8]> {
    if !has_utf8_bom(&data) {
        return data;
    }
    match data {
        Cow::Borrowed(bytes) => Cow::Borrowed(&bytes[3..]),
        Cow::Owned(mut bytes) => {
            bytes.drain(..3);
            Cow::Owned(bytes)
        }
    }
}

/// Detect the encoding of data and transcode to UTF-8 if necessary.
///
/// UTF-16 input is recognized by its BOM. Other non-UTF-8 input is handed to
/// chardetng, which covers the common legacy code pages:
/// - Windows-1251 (Cyrillic)
/// - Windows-1250 (Central European)
/// - ISO-8859 variants
/// - GB2312/GBK (Chinese)
///
/// Data that is already valid UTF-8 is returned borrowed.
pub fn detect_and_transcode(data: &[u8]) -> Cow<'_, [u8]> {
    // chardetng doesn't handle UTF-16 BOMs well
    if data.starts_with(&[0xFF, 0xFE]) {
        return decode_with(encoding_rs::UTF_16LE, data);
    }
    if data.starts_with(&[0xFE, 0xFF]) {
        return decode_with(encoding_rs::UTF_16BE, data);
    }

    if is_utf8(data) {
        return Cow::Borrowed(data);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);

    // Mostly UTF-8 with a few invalid bytes; let the tokenizer report them
    if encoding == encoding_rs::UTF_8 {
        return Cow::Borrowed(data);
    }

    tracing::debug!(encoding = encoding.name(), "transcoding input to UTF-8");
    decode_with(encoding, data)
}

/// Owned variant of [`detect_and_transcode`] that reuses the buffer when no
/// transcoding is needed.
pub fn transcode_vec(data: Vec<u8>) -> Vec<u8> {
    let transcoded = match detect_and_transcode(&data) {
        Cow::Owned(bytes) => Some(bytes),
        Cow::Borrowed(_) => None,
    };
    transcoded.unwrap_or(data)
}

fn decode_with(encoding: &'static encoding_rs::Encoding, data: &[u8]) -> Cow<'static, [u8]> {
    let (decoded, _, _) = encoding.decode(data);
    Cow::Owned(decoded.into_owned().into_bytes())
}
