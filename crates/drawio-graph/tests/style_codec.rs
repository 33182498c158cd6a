use drawio_graph::Style;
use pretty_assertions::assert_eq;

fn style(entries: &[(&str, &str)]) -> Style {
    entries.iter().copied().collect()
}

#[test]
fn empty_style_encodes_to_empty_string() {
    assert_eq!(Style::new().encode(), "");
}

#[test]
fn every_declaration_is_terminated() {
    let s = style(&[("rounded", "1"), ("html", "1")]);
    assert_eq!(s.encode(), "html=1;rounded=1;");
}

#[test]
fn flags_are_written_without_equals() {
    let s = style(&[("ellipse", ""), ("fillColor", "#dae8fc")]);
    assert_eq!(s.encode(), "ellipse;fillColor=#dae8fc;");
}

#[test]
fn decode_of_empty_text_has_no_entries() {
    // The empty declaration is skipped rather than stored under an empty key.
    assert!(Style::decode("").is_empty());
    assert!(Style::decode(";;").is_empty());
}

#[test]
fn decode_bare_flag() {
    assert_eq!(Style::decode("flag"), style(&[("flag", "")]));
}

#[test]
fn trailing_separator_adds_nothing() {
    assert_eq!(Style::decode("a=1;b=2;"), style(&[("a", "1"), ("b", "2")]));
}

#[test]
fn splits_at_first_equals_only() {
    let s = Style::decode("image=data:image/png,a=b;shape=image");
    assert_eq!(s.get("image"), Some("data:image/png,a=b"));
    assert_eq!(s.get("shape"), Some("image"));
}

#[test]
fn repeated_key_keeps_last_value() {
    assert_eq!(Style::decode("a=1;a=2;").get("a"), Some("2"));
}

#[test]
fn empty_key_with_value_is_kept() {
    assert_eq!(Style::decode("=x;").get(""), Some("x"));
}

#[test]
fn decode_inverts_encode() {
    let samples = [
        style(&[]),
        style(&[("text", "")]),
        style(&[
            ("shape", "image"),
            ("imageAspect", "0"),
            ("image", "https://example.com/gopher.svg"),
        ]),
        style(&[
            ("edgeStyle", "orthogonalEdgeStyle"),
            ("rounded", "0"),
            ("orthogonalLoop", "1"),
            ("jettySize", "auto"),
            ("html", "1"),
            ("dashed", ""),
        ]),
    ];
    for original in samples {
        assert_eq!(Style::decode(&original.encode()), original);
    }
}

#[test]
fn delimiters_inside_values_do_not_survive() {
    let original = style(&[("label", "a;b")]);
    let decoded = Style::decode(&original.encode());
    assert_ne!(decoded, original);
    assert_eq!(decoded.get("label"), Some("a"));
    assert!(decoded.contains_key("b"));
}

#[test]
fn map_operations() {
    let mut s = Style::new();
    assert_eq!(s.insert("fillColor", "none"), None);
    assert_eq!(s.insert("fillColor", "#fff"), Some("none".to_string()));
    s.insert_flag("dashed");
    assert_eq!(s.len(), 2);
    assert_eq!(s.get("dashed"), Some(""));
    assert_eq!(s.remove("fillColor"), Some("#fff".to_string()));
    assert!(!s.contains_key("fillColor"));

    let pairs: Vec<(&str, &str)> = s.iter().collect();
    assert_eq!(pairs, vec![("dashed", "")]);
}

#[test]
fn display_and_from_str_use_the_codec() {
    let parsed: Style = "strokeWidth=2;dashed;".parse().unwrap();
    assert_eq!(parsed.to_string(), "dashed;strokeWidth=2;");
}

#[test]
fn serde_uses_the_encoded_form() {
    let s = style(&[("shape", "image"), ("imageAspect", "0")]);
    let json = serde_json::to_string(&s).unwrap();
    assert_eq!(json, r#""imageAspect=0;shape=image;""#);
    let back: Style = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}
