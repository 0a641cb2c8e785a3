use std::path::Path;

use super::*;
use crate::compile::stitches::stitch_count;
use crate::document::PatternDocument;
use crate::markup::read_document;
use crate::parser::Parser;

const CHARTS: &str = r#"
  <opaf:define_color name="MC" value="blue"/>
  <opaf:define_color name="CC" value="white"/>
  <opaf:define_action name="cable" params="count=1 color=none">
    <action name="cable" count="${count}" total="${count * 4}" colour="${color}"/>
  </opaf:define_action>
  <opaf:define_chart name="stripe">
    <opaf:row type="row">
      <opaf:action name="knit" count="4" color="MC"/>
      <opaf:action name="purl" count="2" color="CC"/>
    </opaf:row>
  </opaf:define_chart>
  <opaf:define_chart name="cables">
    <opaf:row type="row"><opaf:action name="cable" count="2"/></opaf:row>
    <opaf:row type="row"><opaf:action name="knit" count="8" color="CC"/></opaf:row>
  </opaf:define_chart>"#;

fn doc(body: &str) -> PatternDocument {
    let src = format!(r#"<pattern xmlns:opaf="urn:opaf" name="Test">{body}</pattern>"#);
    Parser::default().parse_str(&src, Path::new(".")).unwrap()
}

fn node(xml: &str) -> Element {
    let src = format!(r#"<pattern xmlns:opaf="urn:opaf">{xml}</pattern>"#);
    read_document(&src).unwrap().root.elements().next().unwrap().clone()
}

fn prepared(d: &PatternDocument) -> (Expander<'_>, Vec<Element>) {
    let mut ex = Expander::new(d);
    let mut globals = Scope::new();
    let mut nodes = Vec::new();
    for def in &d.charts {
        let (chart, rows) = ex.prepare_chart(def, &mut globals).unwrap();
        ex.charts.insert(def.name.clone(), rows);
        nodes.push(chart);
    }
    (ex, nodes)
}

fn reference(ex: &Expander<'_>, xml: &str) -> OpafResult<Vec<Element>> {
    ex.expand_chart(&node(xml), &Scope::new(), &mut Scope::new())
}

fn st(name: &str, count: i64, total: i64, colour: &str, chart: &str) -> Element {
    Element::new("action")
        .with_attr("name", name)
        .with_attr("count", count.to_string())
        .with_attr("total", total.to_string())
        .with_attr("colour", colour)
        .with_attr("chart", chart)
}

fn knit(count: i64) -> Element {
    st("knit", count, count, "MC", "stripe:1")
}

fn purl(count: i64) -> Element {
    st("purl", count, count, "CC", "stripe:1")
}

#[test]
fn charts_are_emitted_with_counted_rows() {
    let d = doc(CHARTS);
    let (_, nodes) = prepared(&d);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].attr("name"), Some("stripe"));
    let rows: Vec<_> = nodes[1].elements().filter_map(|r| r.attr("count")).collect();
    assert_eq!(rows, ["8", "8"]);
}

#[test]
fn default_count_is_one_full_row() {
    let d = doc(CHARTS);
    let (ex, _) = prepared(&d);
    let out = reference(&ex, r#"<opaf:chart name="stripe" row="1"/>"#).unwrap();
    assert_eq!(out, vec![knit(4), purl(2)]);
}

#[test]
fn whole_passes_become_a_repeat() {
    let d = doc(CHARTS);
    let (ex, _) = prepared(&d);
    for k in 2..=5 {
        let out = reference(
            &ex,
            &format!(r#"<opaf:chart name="stripe" row="1" count="{}"/>"#, k * 6),
        )
        .unwrap();
        assert_eq!(
            out,
            vec![
                Element::new("repeat")
                    .with_attr("count", k.to_string())
                    .with_children([knit(4), purl(2)])
            ]
        );
        assert_eq!(stitch_count(&out).unwrap(), k * 6);
    }
}

#[test]
fn offset_boundaries_wrap() {
    let d = doc(CHARTS);
    let (ex, _) = prepared(&d);
    let full = vec![knit(4), purl(2)];
    for offset in ["0", "6", "12", "-6"] {
        let out = reference(
            &ex,
            &format!(r#"<opaf:chart name="stripe" row="1" offset="{offset}"/>"#),
        )
        .unwrap();
        assert_eq!(out, full, "offset {offset}");
    }

    let out = reference(&ex, r#"<opaf:chart name="stripe" row="1" offset="-2"/>"#).unwrap();
    assert_eq!(out, vec![purl(2), knit(4)]);
    let out = reference(&ex, r#"<opaf:chart name="stripe" row="1" offset="4"/>"#).unwrap();
    assert_eq!(out, vec![purl(2), knit(4)]);
}

#[test]
fn partial_actions_are_refactored() {
    let d = doc(CHARTS);
    let (ex, _) = prepared(&d);
    let out = reference(&ex, r#"<opaf:chart name="stripe" row="1" offset="1" count="3"/>"#)
        .unwrap();
    assert_eq!(out, vec![knit(3)]);

    let out = reference(&ex, r#"<opaf:chart name="stripe" row="1" count="5"/>"#).unwrap();
    assert_eq!(out, vec![knit(4), purl(1)]);

    let out = reference(&ex, r#"<opaf:chart name="stripe" row="1" count="8"/>"#).unwrap();
    assert_eq!(out, vec![knit(4), purl(2), knit(2)]);

    let out = reference(&ex, r#"<opaf:chart name="stripe" row="1" offset="5" count="14"/>"#)
        .unwrap();
    assert_eq!(
        out,
        vec![
            purl(1),
            Element::new("repeat")
                .with_attr("count", "2")
                .with_children([knit(4), purl(2)]),
            knit(1),
        ]
    );
    assert_eq!(stitch_count(&out).unwrap(), 14);
}

#[test]
fn splits_must_respect_action_width() {
    let d = doc(CHARTS);
    let (ex, _) = prepared(&d);
    let cable = |count: i64| st("cable", count, count * 4, "none", "cables:1");

    let out = reference(&ex, r#"<opaf:chart name="cables" row="1" count="4"/>"#).unwrap();
    assert_eq!(out, vec![cable(1)]);
    let out = reference(&ex, r#"<opaf:chart name="cables" row="1" offset="4" count="12"/>"#)
        .unwrap();
    assert_eq!(out, vec![cable(1), cable(2)]);

    for bad in [r#"count="6""#, r#"count="3""#, r#"offset="2" count="4""#] {
        let err = reference(&ex, &format!(r#"<opaf:chart name="cables" row="1" {bad}/>"#))
            .unwrap_err();
        assert!(matches!(err, OpafError::Stitch(_)), "{bad}: {err}");
        assert!(err.to_string().contains("cannot return desired stitch count"));
    }
}

#[test]
fn rows_are_one_based_and_wrap() {
    let d = doc(CHARTS);
    let (ex, _) = prepared(&d);
    let out = reference(&ex, r#"<opaf:chart name="cables" row="4"/>"#).unwrap();
    assert_eq!(out, vec![st("knit", 8, 8, "CC", "cables:2")]);
    let out = reference(&ex, r#"<opaf:chart name="stripe" row="3"/>"#).unwrap();
    assert_eq!(out, vec![knit(4), purl(2)]);

    for bad in [r#"row="0""#, r#"row="-1""#, ""] {
        let err = reference(&ex, &format!(r#"<opaf:chart name="stripe" {bad}/>"#)).unwrap_err();
        assert!(matches!(err, OpafError::Stitch(_)), "{bad}: {err}");
    }
    let err = reference(&ex, r#"<opaf:chart name="plaid" row="1"/>"#).unwrap_err();
    assert!(matches!(err, OpafError::Reference(_)));
}

#[test]
fn colors_resolve_from_chart_stitches() {
    let d = doc(CHARTS);
    let (ex, _) = prepared(&d);
    let color = |r: &str| ex.resolve_color(r).unwrap().to_string();
    assert_eq!(color("chart:stripe:1:0"), "MC");
    assert_eq!(color("chart:stripe:1:3"), "MC");
    assert_eq!(color("chart:stripe:1:4"), "CC");
    assert_eq!(color("chart:stripe:1:-1"), "CC");
    assert_eq!(color("chart:stripe:1:6"), "MC");
    assert_eq!(color("chart:stripe:2:5"), "CC");
    assert_eq!(color("chart:cables:2:0"), "CC");
    assert!(ex.resolve_color("chart:stripe:0:0").is_err());

    let out = ex
        .expand_action(
            &node(r#"<opaf:action name="knit" color="chart:stripe:1:${2 * 2}"/>"#),
            &Scope::new(),
            &mut Scope::new(),
        )
        .unwrap();
    assert_eq!(out[0].attr("colour"), Some("CC"));
}

#[test]
fn rows_need_exactly_one_action_per_reference() {
    let d = doc(r#"
      <opaf:define_action name="pair" params="count=1">
        <action name="knit" count="1" total="1"/>
        <action name="purl" count="1" total="1"/>
      </opaf:define_action>
      <opaf:define_chart name="bad">
        <opaf:row type="row"><opaf:action name="pair"/></opaf:row>
      </opaf:define_chart>"#);
    let mut globals = Scope::new();
    let err = Expander::new(&d)
        .prepare_chart(&d.charts[0], &mut globals)
        .unwrap_err();
    assert!(err.to_string().contains("exactly one action"));

    let d = doc(r#"
      <opaf:define_chart name="empty">
        <opaf:row type="row"><opaf:action name="knit" condition="false"/></opaf:row>
      </opaf:define_chart>"#);
    let err = Expander::new(&d)
        .prepare_chart(&d.charts[0], &mut globals)
        .unwrap_err();
    assert!(err.to_string().contains("no actions found"));
}

#[test]
fn zero_width_actions_stay_with_their_pass() {
    let d = doc(r#"
      <opaf:define_chart name="edge">
        <opaf:row type="row">
          <opaf:action name="knit" count="3"/>
          <opaf:action name="bind_off" count="1"/>
        </opaf:row>
      </opaf:define_chart>"#);
    let (ex, _) = prepared(&d);
    let knit = |n: i64| st("knit", n, n, "none", "edge:1");
    let bind_off = st("bind_off", 1, 0, "none", "edge:1");

    let out = reference(&ex, r#"<opaf:chart name="edge" row="1" offset="1"/>"#).unwrap();
    assert_eq!(out, vec![knit(2), bind_off, knit(1)]);
}

#[test]
fn row_total_overflow_is_an_error() {
    let d = doc(r#"
      <opaf:define_chart name="huge">
        <opaf:row type="row">
          <opaf:action name="knit" count="9223372036854775807"/>
          <opaf:action name="knit" count="1"/>
        </opaf:row>
      </opaf:define_chart>"#);
    let err = Expander::new(&d)
        .prepare_chart(&d.charts[0], &mut Scope::new())
        .unwrap_err();
    assert!(matches!(err, OpafError::Stitch(_)), "{err}");
    assert!(err.to_string().contains("stitch count overflow"));
}
