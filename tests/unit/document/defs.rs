use super::*;

#[test]
fn params_parse_defaults_and_required_names() {
    let p = Params::parse("count=1  color=none\tside");
    assert_eq!(p.names().collect::<Vec<_>>(), ["count", "color", "side"]);
    let d = p.defaults();
    assert_eq!(d.get("count"), Some(&Value::Int(1)));
    assert_eq!(d.get("color"), Some(&Value::from("none")));
    assert_eq!(d.get("side"), Some(&Value::from("")));
    assert_eq!(p.to_attr(), "count=1 color=none side");
    assert_eq!(Params::parse("").names().count(), 0);
}

#[test]
fn config_membership() {
    let open = ConfigDef {
        name: "size".to_owned(),
        value: "1".to_owned(),
        required: false,
        allowed_values: Vec::new(),
        description: None,
    };
    assert!(open.allows("anything"));
    let closed = ConfigDef {
        allowed_values: vec!["S".to_owned(), "M".to_owned()],
        ..open
    };
    assert!(closed.allows("M"));
    assert!(!closed.allows("XL"));
}
