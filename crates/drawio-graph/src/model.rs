// crates/drawio-graph/src/model.rs
//
// Document model for mxGraph diagrams and the builders that populate it.

use serde::{Deserialize, Serialize};

use crate::parse::{ParseResult, parse_graph_model};
use crate::serde_flag;
use crate::style::Style;
use crate::write::{WriteResult, to_xml};

pub const ROOT_CELL_ID: &str = "root";
pub const GEOMETRY_AS: &str = "geometry";

pub const DEFAULT_DX: i64 = 640;
pub const DEFAULT_DY: i64 = 480;
pub const DEFAULT_SHAPE_X: i64 = 10;
pub const DEFAULT_SHAPE_Y: i64 = 10;

/// A `.drawio` file: one or more diagrams, each normally holding a graph model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MxFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,

    #[serde(default)]
    pub diagrams: Vec<Diagram>,
}

impl MxFile {
    /// A file with a single diagram holding `graph`.
    pub fn single(id: impl Into<String>, graph: GraphModel) -> Self {
        Self {
            diagrams: vec![Diagram::new(id, graph)],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Raw text inside `<diagram>...</diagram>` when the file stored the
    /// graph compressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_payload: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_model: Option<GraphModel>,
}

impl Diagram {
    pub fn new(id: impl Into<String>, graph: GraphModel) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
            encoded_payload: None,
            graph_model: Some(graph),
        }
    }
}

/// Wrapper around the cells of a diagram.
///
/// The first cell is the root cell. Cells whose parent is the root cell are
/// layers; every other cell should have a layer (or another cell) as parent.
/// None of this is enforced here, see [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphModel {
    pub dx: i64,
    pub dy: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrows: Option<String>,

    #[serde(default)]
    pub root: Vec<Cell>,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self {
            dx: DEFAULT_DX,
            dy: DEFAULT_DY,
            arrows: None,
            root: Vec::new(),
        }
    }
}

impl GraphModel {
    /// A graph holding the root cell and a single layer `layer_id`.
    pub fn new(layer_id: impl Into<String>) -> Self {
        let mut graph = Self::default();
        graph.root.push(Cell::new(ROOT_CELL_ID, None::<String>));
        graph.add_layer(layer_id);
        graph
    }

    /// Append `cell` to the cell list. Returns `self` for chaining.
    pub fn add(&mut self, cell: Cell) -> &mut Self {
        self.root.push(cell);
        self
    }

    /// Append a layer whose parent is the root cell.
    pub fn add_layer(&mut self, layer_id: impl Into<String>) -> &mut Self {
        let root_id = self
            .root_cell()
            .map_or_else(|| ROOT_CELL_ID.to_string(), |root| root.id.clone());
        self.add(Cell::new(layer_id, Some(root_id)))
    }

    /// The first cell without a parent.
    pub fn root_cell(&self) -> Option<&Cell> {
        self.root.iter().find(|cell| cell.parent.is_none())
    }

    /// Cells whose parent is the root cell.
    pub fn layers(&self) -> impl Iterator<Item = &Cell> {
        let root = self.root_cell();
        self.root
            .iter()
            .filter(move |cell| root.is_some_and(|root| cell.is_layer_of(root)))
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.root.iter().find(|cell| cell.id == id)
    }

    pub fn cell_mut(&mut self, id: &str) -> Option<&mut Cell> {
        self.root.iter_mut().find(|cell| cell.id == id)
    }

    pub fn to_xml(&self) -> WriteResult<String> {
        to_xml(self)
    }

    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        parse_graph_model(xml)
    }
}

/// A layer, vertex (`vertex`), or edge (`edge`) of the graph.
///
/// `parent`, `source` and `target` name other cells by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "serde_flag::is_unset",
        with = "serde_flag"
    )]
    pub vertex: bool,

    #[serde(
        default,
        skip_serializing_if = "serde_flag::is_unset",
        with = "serde_flag"
    )]
    pub edge: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl Cell {
    pub fn new(id: impl Into<String>, parent: Option<impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            parent: parent.map(Into::into),
            ..Self::default()
        }
    }

    /// A vertex under `parent` with a default geometry at (10, 10).
    pub fn shape(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            vertex: true,
            geometry: Some(Geometry::placeholder()),
            ..Self::new(id, Some(parent))
        }
    }

    /// A vertex rendering the image at `url`.
    pub fn image(id: impl Into<String>, parent: impl Into<String>, url: impl Into<String>) -> Self {
        let mut cell = Self::shape(id, parent);
        cell.style = Style::from([
            ("shape", "image".to_string()),
            ("imageAspect", "0".to_string()),
            ("image", url.into()),
        ]);
        cell
    }

    /// An image vertex placed at (`x`, `y`).
    pub fn image_at(
        id: impl Into<String>,
        parent: impl Into<String>,
        url: impl Into<String>,
        x: i64,
        y: i64,
    ) -> Self {
        let mut cell = Self::image(id, parent, url);
        let geometry = cell.geometry.get_or_insert_with(Geometry::placeholder);
        geometry.x = x;
        geometry.y = y;
        cell
    }

    /// An edge from `source` to `target` with a relative geometry.
    pub fn edge(
        id: impl Into<String>,
        parent: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            edge: true,
            source: Some(source.into()),
            target: Some(target.into()),
            geometry: Some(Geometry::relative()),
            ..Self::new(id, Some(parent))
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_layer_of(&self, root: &Cell) -> bool {
        self.parent.as_deref() == Some(root.id.as_str())
    }
}

/// Position and size of a vertex, or the `relative` marker of an edge.
///
/// `width` and `height` are kept as text since the format allows
/// fractional values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub x: i64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub y: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "serde_flag::is_unset",
        with = "serde_flag"
    )]
    pub relative: bool,

    #[serde(rename = "as")]
    pub as_attr: String,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: None,
            height: None,
            relative: false,
            as_attr: GEOMETRY_AS.to_string(),
        }
    }
}

impl Geometry {
    /// Starting geometry of a new shape, at (10, 10).
    pub fn placeholder() -> Self {
        Self {
            x: DEFAULT_SHAPE_X,
            y: DEFAULT_SHAPE_Y,
            ..Self::default()
        }
    }

    /// Edge geometry: no position, `relative="1"`.
    pub fn relative() -> Self {
        Self {
            relative: true,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self.height = Some(height.into());
        self
    }
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}
