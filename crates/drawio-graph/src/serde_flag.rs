// crates/drawio-graph/src/serde_flag.rs
//
// Boolean attributes as draw.io writes them: `"1"` when set, absent otherwise.
//
// Used through `#[serde(with = "serde_flag")]` together with
// `skip_serializing_if = "serde_flag::is_unset"`, and by the XML reader
// through `read_flag`. Both paths read unknown spellings as false.

use serde::{Deserialize, Deserializer, Serializer};
use tracing::trace;

pub const SET: &str = "1";

/// Interpret a flag attribute. Unknown spellings yield `None`.
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim() {
        "1" | "true" | "TRUE" | "True" => Some(true),
        "0" | "false" | "FALSE" | "False" | "" => Some(false),
        _ => None,
    }
}

/// Like [`parse_flag`], but an unknown spelling reads as false.
pub fn read_flag(text: &str) -> bool {
    parse_flag(text).unwrap_or_else(|| {
        trace!(value = text, "unknown flag spelling, reading as false");
        false
    })
}

pub fn is_unset(v: &bool) -> bool {
    !*v
}

pub fn serialize<S>(v: &bool, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(if *v { SET } else { "0" })
}

pub fn deserialize<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(d)? {
        Raw::Bool(v) => Ok(v),
        Raw::Int(v) => Ok(v != 0),
        Raw::Text(text) => Ok(read_flag(&text)),
    }
}
