// crates/drawio-graph/src/write.rs
//
// quick-xml writer for mxGraphModel documents and .drawio envelopes.
// Optional attributes that are unset or empty are left out entirely;
// `id`, `dx`, `dy` and geometry `as` are always written.

use crate::config::WriteOptions;
use crate::model::*;
use crate::payload::encode_diagram_payload;
use crate::serde_flag;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("utf8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("indent character must be ASCII, got {0:?}")]
    InvalidIndent(char),
}

pub type WriteResult<T> = Result<T, WriteError>;

/// Serialize `graph` as a single-line `<mxGraphModel>` document.
pub fn to_xml(graph: &GraphModel) -> WriteResult<String> {
    to_xml_with(graph, &WriteOptions::default())
}

pub fn to_xml_with(graph: &GraphModel, options: &WriteOptions) -> WriteResult<String> {
    let mut writer = new_writer(options)?;
    write_declaration(&mut writer, options)?;
    write_graph_model(&mut writer, graph)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

pub fn mxfile_to_xml(file: &MxFile) -> WriteResult<String> {
    mxfile_to_xml_with(file, &WriteOptions::default())
}

/// Serialize a `.drawio` envelope.
///
/// With `compress_diagrams` each graph is stored as an encoded payload.
/// A diagram that only has an `encoded_payload` is written back unchanged.
pub fn mxfile_to_xml_with(file: &MxFile, options: &WriteOptions) -> WriteResult<String> {
    let mut writer = new_writer(options)?;
    write_declaration(&mut writer, options)?;

    let mut start = BytesStart::new("mxfile");
    push_opt(&mut start, "host", file.host.as_deref());
    push_opt(&mut start, "version", file.version.as_deref());
    push_opt(&mut start, "type", file.file_type.as_deref());
    writer.write_event(Event::Start(start))?;

    for diagram in &file.diagrams {
        let mut start = BytesStart::new("diagram");
        push_opt(&mut start, "id", diagram.id.as_deref());
        push_opt(&mut start, "name", diagram.name.as_deref());

        let payload = match (&diagram.graph_model, options.compress_diagrams) {
            (Some(graph), true) => Some(encode_diagram_payload(&to_xml(graph)?)?),
            (Some(_), false) => None,
            (None, _) => diagram.encoded_payload.clone(),
        };

        match (&diagram.graph_model, payload) {
            (_, Some(payload)) => {
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(&payload)))?;
                writer.write_event(Event::End(BytesEnd::new("diagram")))?;
            }
            (Some(graph), None) => {
                writer.write_event(Event::Start(start))?;
                write_graph_model(&mut writer, graph)?;
                writer.write_event(Event::End(BytesEnd::new("diagram")))?;
            }
            (None, None) => writer.write_event(Event::Empty(start))?,
        }
    }

    writer.write_event(Event::End(BytesEnd::new("mxfile")))?;
    debug!(diagrams = file.diagrams.len(), "wrote mxfile");
    Ok(String::from_utf8(writer.into_inner())?)
}

fn new_writer(options: &WriteOptions) -> WriteResult<Writer<Vec<u8>>> {
    match options.indent {
        Some(indent) => {
            let ch = u8::try_from(indent.character)
                .ok()
                .filter(u8::is_ascii)
                .ok_or(WriteError::InvalidIndent(indent.character))?;
            Ok(Writer::new_with_indent(Vec::new(), ch, indent.size))
        }
        None => Ok(Writer::new(Vec::new())),
    }
}

fn write_declaration<W: Write>(writer: &mut Writer<W>, options: &WriteOptions) -> WriteResult<()> {
    if options.xml_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    Ok(())
}

fn write_graph_model<W: Write>(writer: &mut Writer<W>, graph: &GraphModel) -> WriteResult<()> {
    let dx = graph.dx.to_string();
    let dy = graph.dy.to_string();

    let mut start = BytesStart::new("mxGraphModel");
    push_attr(&mut start, "dx", &dx);
    push_attr(&mut start, "dy", &dy);
    push_opt(&mut start, "arrows", graph.arrows.as_deref());
    writer.write_event(Event::Start(start))?;

    if graph.root.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("root")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("root")))?;
        for cell in &graph.root {
            write_cell(writer, cell)?;
        }
        writer.write_event(Event::End(BytesEnd::new("root")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("mxGraphModel")))?;
    debug!(cells = graph.root.len(), "wrote mxGraphModel");
    Ok(())
}

fn write_cell<W: Write>(writer: &mut Writer<W>, cell: &Cell) -> WriteResult<()> {
    let style = cell.style.encode();

    let mut start = BytesStart::new("mxCell");
    push_attr(&mut start, "id", &cell.id);
    push_opt(&mut start, "value", cell.value.as_deref());
    push_opt(&mut start, "style", Some(style.as_str()));
    push_opt(&mut start, "parent", cell.parent.as_deref());
    push_flag(&mut start, "vertex", cell.vertex);
    push_flag(&mut start, "edge", cell.edge);
    push_opt(&mut start, "source", cell.source.as_deref());
    push_opt(&mut start, "target", cell.target.as_deref());

    match &cell.geometry {
        Some(geometry) => {
            writer.write_event(Event::Start(start))?;
            write_geometry(writer, geometry)?;
            writer.write_event(Event::End(BytesEnd::new("mxCell")))?;
        }
        None => writer.write_event(Event::Empty(start))?,
    }
    Ok(())
}

fn write_geometry<W: Write>(writer: &mut Writer<W>, geometry: &Geometry) -> WriteResult<()> {
    let x = geometry.x.to_string();
    let y = geometry.y.to_string();

    let mut start = BytesStart::new("mxGeometry");
    push_opt(&mut start, "x", (geometry.x != 0).then_some(x.as_str()));
    push_opt(&mut start, "y", (geometry.y != 0).then_some(y.as_str()));
    push_opt(&mut start, "width", geometry.width.as_deref());
    push_opt(&mut start, "height", geometry.height.as_deref());
    push_flag(&mut start, "relative", geometry.relative);
    push_attr(&mut start, "as", &geometry.as_attr);
    writer.write_event(Event::Empty(start))?;
    Ok(())
}

fn push_opt(start: &mut BytesStart<'_>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        push_attr(start, key, value);
    }
}

fn push_flag(start: &mut BytesStart<'_>, key: &str, set: bool) {
    if set {
        push_attr(start, key, serde_flag::SET);
    }
}

/// Push an attribute with line breaks and tabs written as character
/// references. Conforming readers normalize literal ones to spaces.
fn push_attr(start: &mut BytesStart<'_>, key: &str, value: &str) {
    let escaped = escape_attr_value(value);
    start.push_attribute((key.as_bytes(), escaped.as_bytes()));
}

fn escape_attr_value(value: &str) -> String {
    escape(value)
        .replace('\n', "&#xA;")
        .replace('\r', "&#xD;")
        .replace('\t', "&#x9;")
}
