// Bytes to text for delimited files: BOM, detector guess, fallback chain, lossy.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info, warn};
use serde::Serialize;

use crate::options::LoadOptions;

/// Which step of the chain produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePath {
    Bom,
    Detected,
    Fallback,
    Lossy,
}

impl DecodePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bom => "bom",
            Self::Detected => "detected",
            Self::Fallback => "fallback",
            Self::Lossy => "lossy",
        }
    }
}

impl fmt::Display for DecodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static str,
    pub path: DecodePath,
}

/// Decode a whole file. Never fails: the last step substitutes U+FFFD.
pub fn decode(bytes: &[u8], options: &LoadOptions) -> Decoded {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        if let Some(text) = strict(encoding, &bytes[bom_len..]) {
            return decoded(text, encoding, DecodePath::Bom);
        }
        debug!("{} BOM present but body does not decode", encoding.name());
    }

    if let Some(encoding) = detect(bytes, options) {
        if let Some(text) = strict(encoding, bytes) {
            return decoded(text, encoding, DecodePath::Detected);
        }
        debug!("detected {} failed on the full file", encoding.name());
    }

    for label in &options.fallback_encodings {
        let Some(encoding) = Encoding::for_label(label.trim().as_bytes()) else {
            warn!("unknown fallback encoding '{label}', skipping");
            continue;
        };
        if let Some(text) = strict(encoding, bytes) {
            return decoded(text, encoding, DecodePath::Fallback);
        }
        debug!("fallback {} failed", encoding.name());
    }

    warn!("no encoding decoded the file cleanly; undecodable bytes replaced with U+FFFD");
    decoded(String::from_utf8_lossy(bytes).into_owned(), UTF_8, DecodePath::Lossy)
}

/// Detector guess over the leading sample, if confident enough.
fn detect(bytes: &[u8], options: &LoadOptions) -> Option<&'static Encoding> {
    let sample = &bytes[..bytes.len().min(options.sample_bytes)];
    let (charset, confidence, _language) = chardet::detect(sample);
    if confidence <= options.confidence_threshold {
        debug!("detector guessed '{charset}' at {confidence:.2}, below threshold");
        return None;
    }

    // An ASCII sample only covers the prefix; UTF-8 still rejects later bad bytes.
    if charset.eq_ignore_ascii_case("ascii") {
        return Some(UTF_8);
    }

    let label = chardet::charset2encoding(&charset);
    let encoding =
        Encoding::for_label(label.as_bytes()).or_else(|| Encoding::for_label(charset.as_bytes()));
    if encoding.is_none() {
        debug!("detector label '{charset}' has no decoder");
    }
    encoding
}

fn strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

fn decoded(text: String, encoding: &'static Encoding, path: DecodePath) -> Decoded {
    info!("decoded as {} via {path}", encoding.name());
    Decoded {
        text,
        encoding: encoding.name(),
        path,
    }
}
