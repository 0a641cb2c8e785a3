use super::*;

#[test]
fn accepts_vocabulary_and_skips_text_tags() {
    let meta = Element::new("opaf:metadata")
        .with_child(Element::new("opaf:title").with_child(Element::new("anything")))
        .with_child(
            Element::new("opaf:yarn").with_child(Element::new("opaf:color").with_attr("name", "MC")),
        );
    check_metadata(&meta).unwrap();
}

#[test]
fn rejects_unknown_nested_tags() {
    let meta = Element::new("opaf:metadata")
        .with_child(Element::new("opaf:gauge").with_child(Element::new("opaf:swatch")));
    let err = check_metadata(&meta).unwrap_err();
    assert!(err.to_string().contains("'opaf:swatch' not recognized"));
}
