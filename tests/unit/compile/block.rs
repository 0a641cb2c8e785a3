use std::path::Path;

use super::*;
use crate::document::PatternDocument;
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

fn knit(count: &str) -> Element {
    Element::new("action")
        .with_attr("name", "knit")
        .with_attr("count", count)
        .with_attr("total", count)
        .with_attr("colour", "none")
}

fn expand(d: &PatternDocument, xml: &str) -> OpafResult<Vec<Element>> {
    Expander::new(d).expand_block(&node(xml), &Scope::new(), &mut Scope::new())
}

const KNITS: &str = r#"
  <opaf:define_block name="knits" params="n">
    <opaf:action name="knit" count="${n}"/>
  </opaf:define_block>"#;

#[test]
fn identical_iterations_collapse_into_one_repeat() {
    let d = doc(KNITS);
    let out = expand(&d, r#"<opaf:block name="knits" n="4" repeat="3"/>"#).unwrap();
    assert_eq!(
        out,
        vec![
            Element::new("repeat")
                .with_attr("count", "3")
                .with_child(knit("4"))
        ]
    );
}

#[test]
fn default_repeat_is_one_and_zero_is_empty() {
    let d = doc(KNITS);
    assert_eq!(
        expand(&d, r#"<opaf:block name="knits" n="2"/>"#).unwrap(),
        vec![knit("2")]
    );
    assert!(
        expand(&d, r#"<opaf:block name="knits" n="2" repeat="0"/>"#)
            .unwrap()
            .is_empty()
    );
    let err = expand(&d, r#"<opaf:block name="knits" n="2" repeat="-1"/>"#).unwrap_err();
    assert!(matches!(err, OpafError::Parameter(_)));
}

#[test]
fn missing_block_parameter_names_the_block() {
    let d = doc(KNITS);
    let err = expand(&d, r#"<opaf:block name="knits"/>"#).unwrap_err();
    assert!(err.to_string().contains("parameter 'n' is not defined for block 'knits'"));
}

#[test]
fn iteration_counter_breaks_runs() {
    let d = doc(r#"
      <opaf:define_block name="grow">
        <opaf:action name="knit" count="${MIN(repeat, repeat_total - 2)}"/>
      </opaf:define_block>"#);
    let out = expand(&d, r#"<opaf:block name="grow" repeat="4"/>"#).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], knit("1"));
    assert_eq!(out[1].name, "repeat");
    assert_eq!(out[1].attr("count"), Some("3"));
    assert_eq!(out[1].elements().next(), Some(&knit("2")));
}

#[test]
fn inner_condition_keeps_siblings() {
    let d = doc("");
    let out = expand(&d, r#"<opaf:block name="seed" row="2"/>"#).unwrap();
    let names: Vec<_> = out.iter().filter_map(|e| e.attr("name")).collect();
    assert_eq!(names, ["purl", "knit"]);

    let out = expand(&d, r#"<opaf:block name="seed" row="3"/>"#).unwrap();
    let names: Vec<_> = out.iter().filter_map(|e| e.attr("name")).collect();
    assert_eq!(names, ["knit", "purl"]);
}

#[test]
fn rib_alternates_knits_and_purls() {
    let d = doc("");
    let out = expand(&d, r#"<opaf:block name="rib" knits="2" purls="2" repeat="10"/>"#).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].attr("count"), Some("10"));
    let body: Vec<_> = out[0].elements().filter_map(|e| e.attr("name")).collect();
    assert_eq!(body, ["knit", "purl"]);
}

#[test]
fn nested_blocks_see_outer_parameters() {
    let d = doc(&format!(
        r#"{KNITS}
      <opaf:define_block name="outer" params="m">
        <opaf:block name="knits" n="${{m * 2}}" repeat="2"/>
      </opaf:define_block>"#
    ));
    let out = expand(&d, r#"<opaf:block name="outer" m="3" repeat="2"/>"#).unwrap();
    assert_eq!(
        out,
        vec![
            Element::new("repeat").with_attr("count", "2").with_child(
                Element::new("repeat")
                    .with_attr("count", "2")
                    .with_child(knit("6"))
            )
        ]
    );
}

#[test]
fn global_values_win_over_block_attributes() {
    let d = doc(KNITS);
    let mut globals = Scope::new();
    globals.set("n", 2i64);
    let out = Expander::new(&d)
        .expand_block(
            &node(r#"<opaf:block name="knits" n="5"/>"#),
            &Scope::new(),
            &mut globals,
        )
        .unwrap();
    assert_eq!(out, vec![knit("2")]);
}
