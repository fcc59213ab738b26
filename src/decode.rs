//! Input decoding.
//!
//! Novels in the wild are often GBK or GB18030 rather than UTF-8.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Decode raw input bytes into text.
///
/// With `label` (a WHATWG encoding label such as `gbk`) that encoding is
/// used. Otherwise valid UTF-8 is taken as is, with any BOM removed, and
/// anything else is decoded with the encoding `chardetng` guesses.
pub fn decode_text<'a>(bytes: &'a [u8], label: Option<&str>) -> Result<Cow<'a, str>> {
    if let Some(label) = label {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        return Ok(decode_with(encoding, bytes));
    }

    let (text, malformed) = UTF_8.decode_with_bom_removal(bytes);
    if !malformed {
        return Ok(text);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    debug!(encoding = encoding.name(), "detected input encoding");

    Ok(decode_with(encoding, bytes))
}

fn decode_with<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Cow<'a, str> {
    let (text, used, malformed) = encoding.decode(bytes);
    if malformed {
        warn!(
            encoding = used.name(),
            "input contains malformed byte sequences, replaced with U+FFFD"
        );
    }
    text
}
