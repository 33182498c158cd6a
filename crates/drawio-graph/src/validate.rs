// crates/drawio-graph/src/validate.rs
//
// Reference checks over a GraphModel.
//
// Parsing and writing never validate. Run `validate` when a document must
// be consistent before it reaches a renderer.

use std::collections::HashSet;

use crate::model::GraphModel;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    #[error("duplicate cell id {0:?}")]
    DuplicateId(String),

    #[error("cell {cell:?} has unknown parent {parent:?}")]
    UnknownParent { cell: String, parent: String },

    #[error("edge {cell:?} has unknown source {source_id:?}")]
    UnknownSource { cell: String, source_id: String },

    #[error("edge {cell:?} has unknown target {target:?}")]
    UnknownTarget { cell: String, target: String },

    #[error("cell {0:?} is flagged both vertex and edge")]
    VertexAndEdge(String),

    #[error("edge {0:?} has no source or no target")]
    DetachedEdge(String),
}

/// Report every issue found, in document order. Empty means consistent.
pub fn validate(graph: &GraphModel) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut ids = HashSet::new();
    for cell in &graph.root {
        if !ids.insert(cell.id.as_str()) {
            issues.push(Issue::DuplicateId(cell.id.clone()));
        }
    }

    for cell in &graph.root {
        if let Some(parent) = &cell.parent
            && !ids.contains(parent.as_str())
        {
            issues.push(Issue::UnknownParent {
                cell: cell.id.clone(),
                parent: parent.clone(),
            });
        }
        if let Some(source) = &cell.source
            && !ids.contains(source.as_str())
        {
            issues.push(Issue::UnknownSource {
                cell: cell.id.clone(),
                source_id: source.clone(),
            });
        }
        if let Some(target) = &cell.target
            && !ids.contains(target.as_str())
        {
            issues.push(Issue::UnknownTarget {
                cell: cell.id.clone(),
                target: target.clone(),
            });
        }
        if cell.vertex && cell.edge {
            issues.push(Issue::VertexAndEdge(cell.id.clone()));
        }
        if cell.edge && (cell.source.is_none() || cell.target.is_none()) {
            issues.push(Issue::DetachedEdge(cell.id.clone()));
        }
    }

    issues
}
