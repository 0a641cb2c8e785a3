use std::path::Path;

use super::*;
use crate::document::PatternDocument;
use crate::foundation::error::OpafError;
use crate::foundation::value::Value;
use crate::markup::read_document;
use crate::parser::Parser;

fn doc(body: &str) -> PatternDocument {
    let src = format!(r#"<pattern xmlns:opaf="urn:opaf" name="Test">{body}</pattern>"#);
    Parser::default().parse_str(&src, Path::new(".")).unwrap()
}

fn node(xml: &str) -> Element {
    let src = format!(r#"<pattern xmlns:opaf="urn:opaf">{xml}</pattern>"#);
    read_document(&src).unwrap().root.elements().next().unwrap().clone()
}

#[test]
fn row_counts_its_stitches() {
    let d = doc("");
    let mut globals = Scope::new();
    let out = Expander::new(&d)
        .expand_row(
            &node(
                r#"<opaf:row type="round" side="${'RS'}" name="ignored">
                     <opaf:action name="knit" count="3"/>
                     <opaf:block name="rib" repeat="4"/>
                     <opaf:text data="pm"/>
                   </opaf:row>"#,
            ),
            &Scope::new(),
            &mut globals,
        )
        .unwrap();

    assert_eq!(out.len(), 1);
    let row = &out[0];
    assert_eq!(row.name, "row");
    assert_eq!(row.attr("type"), Some("round"));
    assert_eq!(row.attr("side"), Some("RS"));
    assert_eq!(row.attr("name"), None);
    assert_eq!(row.attr("count"), Some("11"));
    assert_eq!(row.elements().count(), 3);
    assert_eq!(globals.get(PREV_ROW_COUNT), Some(&Value::Int(11)));
    assert_eq!(globals.get(PREV_ROW_OFFSET), Some(&Value::Int(0)));
}

#[test]
fn offset_adjusts_count_and_is_not_copied() {
    let d = doc("");
    let mut globals = Scope::new();
    let out = Expander::new(&d)
        .expand_row(
            &node(
                r#"<opaf:row type="row" offset="-2">
                     <opaf:action name="knit" count="10"/>
                     <opaf:action name="bind_off" count="2"/>
                   </opaf:row>"#,
            ),
            &Scope::new(),
            &mut globals,
        )
        .unwrap();
    assert_eq!(out[0].attr("count"), Some("8"));
    assert_eq!(out[0].attr("offset"), None);
    assert_eq!(globals.get(PREV_ROW_OFFSET), Some(&Value::Int(-2)));
}

#[test]
fn type_is_required() {
    let d = doc("");
    let err = Expander::new(&d)
        .expand_row(
            &node(r#"<opaf:row><opaf:action name="knit"/></opaf:row>"#),
            &Scope::new(),
            &mut Scope::new(),
        )
        .unwrap_err();
    assert!(matches!(err, OpafError::Parameter(_)));
}

#[test]
fn next_row_sees_previous_count_inside_blocks() {
    let d = doc(r#"
      <opaf:define_block name="decrease_rounds">
        <opaf:row type="round">
          <opaf:action name="knit" count="${opaf_prev_row_count - 2}"/>
        </opaf:row>
      </opaf:define_block>"#);
    let ex = Expander::new(&d);
    let mut globals = Scope::new();
    globals.set(PREV_ROW_COUNT, 20i64);

    let out = ex
        .expand_block(
            &node(r#"<opaf:block name="decrease_rounds" repeat="3"/>"#),
            &Scope::new(),
            &mut globals,
        )
        .unwrap();
    let counts: Vec<_> = out.iter().filter_map(|r| r.attr("count")).collect();
    assert_eq!(counts, ["18", "16", "14"]);
    assert_eq!(globals.get(PREV_ROW_COUNT), Some(&Value::Int(14)));
}

#[test]
fn offset_overflow_is_an_error() {
    let d = doc("");
    let err = Expander::new(&d)
        .expand_row(
            &node(
                r#"<opaf:row type="round" offset="9223372036854775807">
                     <opaf:action name="knit" count="2"/>
                   </opaf:row>"#,
            ),
            &Scope::new(),
            &mut Scope::new(),
        )
        .unwrap_err();
    assert!(matches!(err, OpafError::Stitch(_)), "{err}");
    assert!(err.to_string().contains("stitch count overflow"));
}
