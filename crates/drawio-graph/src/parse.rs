// crates/drawio-graph/src/parse.rs
//
// quick-xml reader for mxGraphModel documents and .drawio envelopes.
// - Parses a bare <mxGraphModel> document
// - Parses <mxfile> with one or more <diagram>
// - Captures non-whitespace <diagram> text as encoded_payload and decodes it
// - Reads cells wrapped in <UserObject>/<object> as ordinary cells
//
// Whitespace-only text nodes are ignored; text is never trimmed globally
// since the encoded <diagram> payload lives in text nodes.

use crate::model::*;
use crate::payload::decode_diagram_payload;
use crate::serde_flag::read_flag;
use crate::style::Style;
use quick_xml::Reader;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::collections::BTreeMap;
use std::str;
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("utf8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("missing required attribute: {0}")]
    MissingAttr(&'static str),

    #[error("invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unexpected structure: {0}")]
    Structure(String),

    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("deflate decode error: {0}")]
    Deflate(#[from] std::io::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a document whose root element is `<mxGraphModel>`.
pub fn parse_graph_model(xml: &str) -> ParseResult<GraphModel> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut state = GraphState::default();

    loop {
        let finished = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => state.open(&e, false)?,
            Event::Empty(e) => state.open(&e, true)?,
            Event::End(e) => state.close(&local_name_end(&e)?)?,
            Event::Eof => break,
            _ => None,
        };
        if let Some(graph) = finished {
            debug!(cells = graph.root.len(), "parsed mxGraphModel");
            return Ok(graph);
        }
        buf.clear();
    }

    Err(ParseError::Structure(
        "no <mxGraphModel> root element found".into(),
    ))
}

/// Parse a `.drawio` file:
/// `<mxfile>...<diagram>...</diagram>...</mxfile>`.
///
/// A `<diagram>` either contains an `<mxGraphModel>` directly or carries it
/// as compressed text. The text is kept in `Diagram.encoded_payload` and
/// decoded into `Diagram.graph_model`.
pub fn parse_mxfile(xml: &str) -> ParseResult<MxFile> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut mxfile: Option<MxFile> = None;
    let mut current_diagram: Option<Diagram> = None;
    let mut state = GraphState::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match local_name_start(&e)?.as_str() {
                "mxfile" => mxfile = Some(parse_mxfile_attrs(&e)?),
                "diagram" => current_diagram = Some(parse_diagram_attrs(&e)?),
                _ => {
                    if let Some(graph) = state.open(&e, false)? {
                        attach_graph(current_diagram.as_mut(), graph)?;
                    }
                }
            },

            Event::Empty(e) => match local_name_start(&e)?.as_str() {
                "mxfile" => mxfile = Some(parse_mxfile_attrs(&e)?),
                "diagram" => {
                    let d = parse_diagram_attrs(&e)?;
                    let file = mxfile.as_mut().ok_or_else(|| {
                        ParseError::Structure("diagram outside mxfile".into())
                    })?;
                    file.diagrams.push(d);
                }
                _ => {
                    if let Some(graph) = state.open(&e, true)? {
                        attach_graph(current_diagram.as_mut(), graph)?;
                    }
                }
            },

            Event::Text(t) => {
                let txt = t.decode()?.into_owned();
                push_payload_text(current_diagram.as_mut(), &state, txt);
            }

            Event::CData(c) => {
                let txt = c.decode()?.into_owned();
                push_payload_text(current_diagram.as_mut(), &state, txt);
            }

            Event::End(e) => {
                let name = local_name_end(&e)?;
                match name.as_str() {
                    "diagram" => {
                        let d = current_diagram.take().ok_or_else(|| {
                            ParseError::Structure("closing diagram but none open".into())
                        })?;
                        let d = decode_diagram_if_needed(d)?;
                        let file = mxfile.as_mut().ok_or_else(|| {
                            ParseError::Structure("diagram outside mxfile".into())
                        })?;
                        file.diagrams.push(d);
                    }
                    "mxfile" => {}
                    _ => {
                        if let Some(graph) = state.close(&name)? {
                            attach_graph(current_diagram.as_mut(), graph)?;
                        }
                    }
                }
            }

            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    let file =
        mxfile.ok_or_else(|| ParseError::Structure("no <mxfile> root element found".into()))?;
    debug!(diagrams = file.diagrams.len(), "parsed mxfile");
    Ok(file)
}

fn parse_mxfile_attrs(e: &BytesStart<'_>) -> ParseResult<MxFile> {
    let attrs = attrs_to_map(e)?;
    Ok(MxFile {
        host: non_empty(attrs.get("host")),
        version: non_empty(attrs.get("version")),
        file_type: non_empty(attrs.get("type")),
        diagrams: Vec::new(),
    })
}

fn parse_diagram_attrs(e: &BytesStart<'_>) -> ParseResult<Diagram> {
    let attrs = attrs_to_map(e)?;
    Ok(Diagram {
        id: non_empty(attrs.get("id")),
        name: non_empty(attrs.get("name")),
        encoded_payload: None,
        graph_model: None,
    })
}

fn attach_graph(diagram: Option<&mut Diagram>, graph: GraphModel) -> ParseResult<()> {
    let d = diagram
        .ok_or_else(|| ParseError::Structure("mxGraphModel outside diagram".into()))?;
    d.graph_model = Some(graph);
    Ok(())
}

fn push_payload_text(diagram: Option<&mut Diagram>, state: &GraphState, txt: String) {
    // Indentation between elements
    if txt.trim().is_empty() {
        return;
    }
    let Some(d) = diagram else { return };
    if state.is_open() || d.graph_model.is_some() {
        return;
    }
    match d.encoded_payload.as_mut() {
        Some(existing) => existing.push_str(&txt),
        None => d.encoded_payload = Some(txt),
    }
}

fn decode_diagram_if_needed(mut diagram: Diagram) -> ParseResult<Diagram> {
    if diagram.graph_model.is_none()
        && let Some(payload) = diagram.encoded_payload.as_deref()
    {
        let decoded = decode_diagram_payload(payload)?;
        diagram.graph_model = Some(parse_graph_model(&decoded)?);
    }
    Ok(diagram)
}

/// Builds one `GraphModel` from the element events between `<mxGraphModel>`
/// and `</mxGraphModel>`.
#[derive(Debug, Default)]
struct GraphState {
    graph: Option<GraphModel>,
    current_cell_idx: Option<usize>,
    geometry_depth: usize,
    user_object_depth: usize,
    current_user_object: Option<UserObjectContext>,
}

#[derive(Debug, Clone)]
struct UserObjectContext {
    id: Option<String>,
    label: Option<String>,
}

impl GraphState {
    fn is_open(&self) -> bool {
        self.graph.is_some()
    }

    /// Handle a start or self-closing tag. Returns the finished graph when a
    /// self-closing `<mxGraphModel/>` completes it.
    fn open(&mut self, e: &BytesStart<'_>, self_closing: bool) -> ParseResult<Option<GraphModel>> {
        let name = local_name_start(e)?;

        if self.geometry_depth > 0 {
            trace!(element = %name, "ignoring mxGeometry child");
            if !self_closing {
                self.geometry_depth += 1;
            }
            return Ok(None);
        }

        if is_user_object(&name) {
            if self_closing {
                debug!("ignoring empty user object without mxCell");
                return Ok(None);
            }
            self.user_object_depth = self.user_object_depth.saturating_add(1);
            if self.user_object_depth == 1 {
                let attrs = attrs_to_map(e)?;
                self.current_user_object = Some(UserObjectContext {
                    id: non_empty(attrs.get("id")),
                    label: non_empty(attrs.get("label")),
                });
            }
            return Ok(None);
        }

        match name.as_str() {
            "mxGraphModel" => {
                if self.graph.is_some() {
                    return Err(ParseError::Structure(
                        "nested mxGraphModel found".into(),
                    ));
                }
                let graph = parse_graph_model_attrs(e)?;
                if self_closing {
                    return Ok(Some(graph));
                }
                self.graph = Some(graph);
            }
            "root" => {}
            "mxCell" => {
                let ctx = self.current_user_object.as_ref();
                let cell = parse_mxcell(
                    e,
                    ctx.and_then(|c| c.id.as_deref()),
                    ctx.and_then(|c| c.label.as_deref()),
                )?;
                let graph = self
                    .graph
                    .as_mut()
                    .ok_or_else(|| ParseError::Structure("mxCell outside mxGraphModel".into()))?;
                graph.root.push(cell);
                if !self_closing {
                    self.current_cell_idx = Some(graph.root.len() - 1);
                }
            }
            "mxGeometry" => {
                let graph = self.graph.as_mut().ok_or_else(|| {
                    ParseError::Structure("mxGeometry outside mxGraphModel".into())
                })?;
                let idx = self.current_cell_idx.ok_or_else(|| {
                    ParseError::Structure("mxGeometry found but no current mxCell".into())
                })?;
                graph.root[idx].geometry = Some(parse_mxgeometry(e)?);
                if !self_closing {
                    self.geometry_depth = 1;
                }
            }
            other => trace!(element = other, "ignoring unknown element"),
        }

        Ok(None)
    }

    /// Handle an end tag. Returns the finished graph on `</mxGraphModel>`.
    fn close(&mut self, name: &str) -> ParseResult<Option<GraphModel>> {
        if self.geometry_depth > 0 {
            self.geometry_depth -= 1;
            return Ok(None);
        }

        if is_user_object(name) {
            self.user_object_depth = self.user_object_depth.saturating_sub(1);
            if self.user_object_depth == 0 {
                self.current_user_object = None;
            }
            return Ok(None);
        }

        match name {
            "mxGraphModel" => {
                let graph = self.graph.take().ok_or_else(|| {
                    ParseError::Structure("closing mxGraphModel but none open".into())
                })?;
                self.current_cell_idx = None;
                Ok(Some(graph))
            }
            "mxCell" => {
                self.current_cell_idx = None;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

fn parse_graph_model_attrs(e: &BytesStart<'_>) -> ParseResult<GraphModel> {
    let attrs = attrs_to_map(e)?;
    log_unknown_attrs("mxGraphModel", &attrs, is_known_graphmodel_attr);
    Ok(GraphModel {
        dx: parse_i64_opt(attrs.get("dx"), "dx")?.unwrap_or_default(),
        dy: parse_i64_opt(attrs.get("dy"), "dy")?.unwrap_or_default(),
        arrows: non_empty(attrs.get("arrows")),
        root: Vec::new(),
    })
}

fn parse_mxcell(
    e: &BytesStart<'_>,
    fallback_id: Option<&str>,
    fallback_value: Option<&str>,
) -> ParseResult<Cell> {
    let attrs = attrs_to_map(e)?;
    log_unknown_attrs("mxCell", &attrs, is_known_cell_attr);

    // An empty id is kept; only a missing one falls back.
    let id = attrs
        .get("id")
        .cloned()
        .or_else(|| fallback_id.map(str::to_string))
        .ok_or(ParseError::MissingAttr("mxCell@id"))?;

    Ok(Cell {
        id,
        value: non_empty(attrs.get("value")).or_else(|| fallback_value.map(str::to_string)),
        style: attrs
            .get("style")
            .map(|text| Style::decode(text))
            .unwrap_or_default(),
        parent: non_empty(attrs.get("parent")),
        vertex: parse_bool(attrs.get("vertex")),
        edge: parse_bool(attrs.get("edge")),
        source: non_empty(attrs.get("source")),
        target: non_empty(attrs.get("target")),
        geometry: None,
    })
}

fn parse_mxgeometry(e: &BytesStart<'_>) -> ParseResult<Geometry> {
    let attrs = attrs_to_map(e)?;
    log_unknown_attrs("mxGeometry", &attrs, is_known_geometry_attr);

    Ok(Geometry {
        x: parse_i64_opt(attrs.get("x"), "x")?.unwrap_or_default(),
        y: parse_i64_opt(attrs.get("y"), "y")?.unwrap_or_default(),
        width: non_empty(attrs.get("width")),
        height: non_empty(attrs.get("height")),
        relative: parse_bool(attrs.get("relative")),
        as_attr: attrs.get("as").cloned().unwrap_or_default(),
    })
}

fn attrs_to_map(e: &BytesStart<'_>) -> ParseResult<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for a in e.attributes() {
        let a = a?;
        let key = str::from_utf8(a.key.as_ref())?.to_string();
        let val = a.unescape_value()?.to_string();
        out.insert(key, val);
    }
    Ok(out)
}

fn log_unknown_attrs(
    element: &str,
    attrs: &BTreeMap<String, String>,
    is_known: impl Fn(&str) -> bool,
) {
    for key in attrs.keys().filter(|k| !is_known(k.as_str())) {
        trace!(element, attribute = %key, "ignoring unknown attribute");
    }
}

fn local_name_start(e: &BytesStart<'_>) -> ParseResult<String> {
    Ok(str::from_utf8(e.name().as_ref())?.to_string())
}

fn local_name_end(e: &BytesEnd<'_>) -> ParseResult<String> {
    Ok(str::from_utf8(e.name().as_ref())?.to_string())
}

fn is_user_object(name: &str) -> bool {
    name.eq_ignore_ascii_case("userObject") || name == "object"
}

fn non_empty(v: Option<&String>) -> Option<String> {
    v.filter(|s| !s.is_empty()).cloned()
}

fn parse_bool(v: Option<&String>) -> bool {
    v.is_some_and(|s| read_flag(s))
}

fn parse_i64_opt(v: Option<&String>, field: &'static str) -> ParseResult<Option<i64>> {
    let Some(s) = v else { return Ok(None) };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = trimmed.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: s.clone(),
    })?;
    Ok(Some(parsed))
}

fn is_known_graphmodel_attr(k: &str) -> bool {
    matches!(k, "dx" | "dy" | "arrows")
}

fn is_known_cell_attr(k: &str) -> bool {
    matches!(
        k,
        "id" | "parent" | "source" | "target" | "value" | "style" | "vertex" | "edge"
    )
}

fn is_known_geometry_attr(k: &str) -> bool {
    matches!(k, "x" | "y" | "width" | "height" | "relative" | "as")
}
