pub mod config;
pub mod model;
pub mod parse;
pub mod payload;
pub mod serde_flag;
pub mod style;
pub mod validate;
pub mod write;
pub use config::{ConfigError, Indent, WriteOptions};
pub use model::{Cell, Diagram, Geometry, GraphModel, MxFile};
pub use parse::{ParseError, ParseResult, parse_graph_model, parse_mxfile};
pub use payload::{decode_diagram_payload, encode_diagram_payload};
pub use style::Style;
pub use validate::{Issue, validate};
pub use write::{WriteError, WriteResult, mxfile_to_xml, mxfile_to_xml_with, to_xml, to_xml_with};
