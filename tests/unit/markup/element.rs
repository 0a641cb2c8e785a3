use super::*;

#[test]
fn set_attr_replaces_in_place() {
    let mut el = Element::new("action")
        .with_attr("name", "knit")
        .with_attr("count", "1");
    el.set_attr("name", "purl");
    assert_eq!(
        el.attrs,
        vec![
            ("name".to_owned(), "purl".to_owned()),
            ("count".to_owned(), "1".to_owned())
        ]
    );
    assert_eq!(el.attr("count"), Some("1"));
    assert_eq!(el.attr("total"), None);
}

#[test]
fn prefix_helpers() {
    let el = Element::new("opaf:row").with_child(Element::new("opaf:action"));
    assert!(el.is("row"));
    assert!(!Element::new("row").is("row"));
    assert_eq!(el.local_name(), "row");
    let plain = el.unprefixed();
    assert_eq!(plain.name, "row");
    assert_eq!(plain.elements().next().map(|e| e.name.as_str()), Some("action"));
}

#[test]
fn text_joins_direct_text_only() {
    let el = Element::new("title")
        .with_child("Hat")
        .with_child(Element::new("b").with_child("ignored"))
        .with_child(" pattern");
    assert_eq!(el.text(), "Hat pattern");
}
