// crates/drawio-graph/src/config.rs
//
// Writer settings, loadable from JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid write options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output settings for the XML writer.
///
/// All fields default, so a partial JSON object such as
/// `{"xmlDeclaration": true}` is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriteOptions {
    /// Pretty-print with this indentation. `None` writes a single line.
    pub indent: Option<Indent>,

    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first.
    pub xml_declaration: bool,

    /// Store each diagram of an mxfile as a compressed payload instead of an
    /// inline `<mxGraphModel>`.
    pub compress_diagrams: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Indent {
    /// Must be ASCII.
    pub character: char,
    pub size: usize,
}

impl Default for Indent {
    fn default() -> Self {
        Self {
            character: ' ',
            size: 2,
        }
    }
}

impl WriteOptions {
    pub fn pretty() -> Self {
        Self {
            indent: Some(Indent::default()),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
