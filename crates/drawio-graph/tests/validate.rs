use drawio_graph::{Cell, GraphModel, Issue, validate};
use pretty_assertions::assert_eq;

#[test]
fn built_graph_is_consistent() {
    let mut g = GraphModel::new("1");
    g.add(Cell::shape("a", "1"))
        .add(Cell::image("b", "1", "https://example.com/b.png"))
        .add(Cell::edge("e", "1", "a", "b"));
    assert_eq!(validate(&g), Vec::<Issue>::new());
}

#[test]
fn reports_unresolved_references() {
    let mut g = GraphModel::new("1");
    g.add(Cell::shape("a", "missing-layer"))
        .add(Cell::edge("e", "1", "a", "ghost"));
    assert_eq!(
        validate(&g),
        vec![
            Issue::UnknownParent {
                cell: "a".into(),
                parent: "missing-layer".into(),
            },
            Issue::UnknownTarget {
                cell: "e".into(),
                target: "ghost".into(),
            },
        ]
    );
}

#[test]
fn reports_structural_oddities() {
    let mut g = GraphModel::new("1");
    let mut both = Cell::shape("a", "1");
    both.edge = true;
    let mut floating = Cell::edge("e", "1", "a", "a");
    floating.source = None;
    g.add(both).add(floating).add(Cell::shape("a", "1"));

    assert_eq!(
        validate(&g),
        vec![
            Issue::DuplicateId("a".into()),
            Issue::VertexAndEdge("a".into()),
            Issue::DetachedEdge("a".into()),
            Issue::DetachedEdge("e".into()),
        ]
    );
}

#[test]
fn issues_describe_themselves() {
    let issue = Issue::UnknownSource {
        cell: "e".into(),
        source_id: "x".into(),
    };
    assert_eq!(issue.to_string(), r#"edge "e" has unknown source "x""#);
}
