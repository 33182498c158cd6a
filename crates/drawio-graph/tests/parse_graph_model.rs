use drawio_graph::{ParseError, parse_graph_model};
use pretty_assertions::assert_eq;

const EXPORTED: &str = r#"<mxGraphModel dx="1426" dy="794" grid="1" gridSize="10" arrows="1">
  <root>
    <mxCell id="0" />
    <mxCell id="1" parent="0" />
    <mxCell id="a" value="Start" style="ellipse;whiteSpace=wrap;html=1;" vertex="1" parent="1">
      <mxGeometry x="40" y="60" width="120" height="80.5" as="geometry" />
    </mxCell>
    <UserObject label="Tagged" tags="x" id="b">
      <mxCell style="rounded=1;" parent="1" vertex="1">
        <mxGeometry x="240" y="60" width="120" height="80" as="geometry" />
      </mxCell>
    </UserObject>
    <mxCell id="e" style="edgeStyle=orthogonalEdgeStyle;" edge="1" parent="1" source="a" target="b">
      <mxGeometry relative="1" as="geometry">
        <mxPoint x="10" y="10" as="sourcePoint" />
        <Array as="points">
          <mxPoint x="200" y="100" />
        </Array>
      </mxGeometry>
    </mxCell>
  </root>
</mxGraphModel>"#;

#[test]
fn reads_draw_io_export() {
    let g = parse_graph_model(EXPORTED).expect("parse");

    assert_eq!((g.dx, g.dy), (1426, 794));
    assert_eq!(g.arrows.as_deref(), Some("1"));
    let ids: Vec<&str> = g.root.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["0", "1", "a", "b", "e"]);

    let a = g.cell("a").unwrap();
    assert!(a.vertex);
    assert!(!a.edge);
    assert_eq!(a.value.as_deref(), Some("Start"));
    assert_eq!(a.style.get("ellipse"), Some(""));
    assert_eq!(a.style.get("whiteSpace"), Some("wrap"));
    assert_eq!(a.style.len(), 3);
    let geometry = a.geometry.as_ref().unwrap();
    assert_eq!((geometry.x, geometry.y), (40, 60));
    assert_eq!(geometry.height.as_deref(), Some("80.5"));
    assert_eq!(geometry.as_attr, "geometry");
}

#[test]
fn user_object_supplies_id_and_label() {
    let g = parse_graph_model(EXPORTED).unwrap();
    let b = g.cell("b").unwrap();
    assert_eq!(b.value.as_deref(), Some("Tagged"));
    assert_eq!(b.parent.as_deref(), Some("1"));
    assert_eq!(b.geometry.as_ref().map(|geo| geo.x), Some(240));
}

#[test]
fn edge_geometry_children_are_skipped() {
    let g = parse_graph_model(EXPORTED).unwrap();
    let e = g.cell("e").unwrap();
    assert!(e.edge);
    assert_eq!(e.source.as_deref(), Some("a"));
    assert_eq!(e.target.as_deref(), Some("b"));
    let geometry = e.geometry.as_ref().unwrap();
    assert!(geometry.relative);
    assert_eq!((geometry.x, geometry.y), (0, 0));
}

#[test]
fn layers_hang_off_the_root_cell() {
    let g = parse_graph_model(EXPORTED).unwrap();
    assert_eq!(g.root_cell().map(|c| c.id.as_str()), Some("0"));
    let layers: Vec<&str> = g.layers().map(|c| c.id.as_str()).collect();
    assert_eq!(layers, vec!["1"]);
}

#[test]
fn empty_attributes_read_as_absent() {
    let g = parse_graph_model(
        r#"<mxGraphModel dx="1" dy="2"><root><mxCell id="x" value="" style="" parent="" vertex="" /></root></mxGraphModel>"#,
    )
    .unwrap();
    let x = &g.root[0];
    assert_eq!(x.value, None);
    assert!(x.style.is_empty());
    assert_eq!(x.parent, None);
    assert!(!x.vertex);
}

#[test]
fn missing_root_means_no_cells() {
    let g = parse_graph_model(r#"<mxGraphModel dx="5" dy="6"/>"#).unwrap();
    assert_eq!((g.dx, g.dy), (5, 6));
    assert!(g.root.is_empty());
}

#[test]
fn bad_number_is_reported() {
    let err = parse_graph_model(
        r#"<mxGraphModel dx="1" dy="1"><root><mxCell id="a"><mxGeometry x="1.5" as="geometry"/></mxCell></root></mxGraphModel>"#,
    )
    .unwrap_err();
    assert!(
        matches!(err, ParseError::InvalidNumber { field: "x", .. }),
        "{err}"
    );
}

#[test]
fn cell_without_id_is_rejected() {
    let err = parse_graph_model(r#"<mxGraphModel dx="1" dy="1"><root><mxCell /></root></mxGraphModel>"#)
        .unwrap_err();
    assert!(matches!(err, ParseError::MissingAttr("mxCell@id")), "{err}");
}

#[test]
fn document_without_graph_model_is_rejected() {
    let err = parse_graph_model("<mxfile/>").unwrap_err();
    assert!(matches!(err, ParseError::Structure(_)), "{err}");
}

#[test]
fn malformed_xml_is_reported() {
    let err = parse_graph_model(r#"<mxGraphModel dx="1" dy="1"><root></mxGraphModel>"#).unwrap_err();
    assert!(matches!(err, ParseError::Xml(_)), "{err}");
}

#[test]
fn flag_spellings_are_read_leniently() {
    let g = parse_graph_model(
        r#"<mxGraphModel dx="1" dy="1"><root>
            <mxCell id="t" vertex="true" edge="0"/>
            <mxCell id="u" vertex="yes" edge="TRUE"/>
        </root></mxGraphModel>"#,
    )
    .unwrap();
    let t = &g.root[0];
    assert!(t.vertex);
    assert!(!t.edge);
    let u = &g.root[1];
    assert!(!u.vertex);
    assert!(u.edge);
}

#[test]
fn empty_id_is_kept_rather_than_rejected() {
    let g = parse_graph_model(
        r#"<mxGraphModel dx="1" dy="1"><root><mxCell id="" parent="1"/></root></mxGraphModel>"#,
    )
    .unwrap();
    assert_eq!(g.root[0].id, "");
    assert_eq!(g.root[0].parent.as_deref(), Some("1"));
}
