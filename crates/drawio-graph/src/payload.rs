// crates/drawio-graph/src/payload.rs
//
// Compressed `<diagram>` bodies.
//
// draw.io stores a diagram as `base64(deflate_raw(encodeURIComponent(xml)))`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::io::{Read, Write};
use tracing::debug;

use crate::parse::ParseResult;

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Decode a diagram payload into the `<mxGraphModel>` XML it carries.
///
/// Whitespace inside the payload (line wrapping, indentation) is ignored.
pub fn decode_diagram_payload(payload: &str) -> ParseResult<String> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = STANDARD.decode(compact)?;
    let mut decoder = DeflateDecoder::new(&decoded[..]);
    let mut inflated = Vec::new();
    decoder.read_to_end(&mut inflated)?;
    debug!(
        compressed = decoded.len(),
        inflated = inflated.len(),
        "inflated diagram payload"
    );
    let inflated_str = std::str::from_utf8(&inflated)?;
    let decoded = percent_decode_str(inflated_str).decode_utf8()?;
    Ok(decoded.into_owned())
}

/// Encode `<mxGraphModel>` XML as a diagram payload.
pub fn encode_diagram_payload(xml: &str) -> std::io::Result<String> {
    let escaped = utf8_percent_encode(xml, URI_COMPONENT).to_string();
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(escaped.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}
