use super::*;

fn scope() -> Scope {
    let mut s = Scope::new();
    s.set("size", 2i64);
    s.set("name", "Back");
    s.set("flag", true);
    s
}

#[test]
fn interpolates_every_span() {
    let out = evaluate("${size * 10} sts for ${name}", &scope()).unwrap();
    assert_eq!(out, "20 sts for Back");
}

#[test]
fn text_without_spans_passes_through() {
    assert_eq!(evaluate("plain", &scope()).unwrap(), "plain");
    assert_eq!(evaluate("$ {x}", &scope()).unwrap(), "$ {x}");
}

#[test]
fn errors_name_the_failing_expression() {
    let err = evaluate("${nope + 1}", &scope()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("expression error:"), "{msg}");
    assert!(msg.contains("<nope + 1>"), "{msg}");
    assert!(msg.contains("name 'nope' is not defined"), "{msg}");
}

#[test]
fn single_span_keeps_value_type() {
    assert_eq!(evaluate_value("${flag}", &scope()).unwrap(), Value::Bool(true));
    assert_eq!(evaluate_value("${size / 4}", &scope()).unwrap(), Value::Float(0.5));
    assert_eq!(evaluate_value("1${size}", &scope()).unwrap(), Value::Int(12));
    assert_eq!(evaluate_value("MC", &scope()).unwrap(), Value::from("MC"));
}

#[test]
fn conditions_require_boolean_text() {
    assert!(evaluate_condition("${EQ(size, 2)}", &scope()).unwrap());
    assert!(!evaluate_condition("${EQ(1, 2)}", &scope()).unwrap());
    assert!(evaluate_condition("True", &scope()).unwrap());
    assert!(evaluate_condition("", &scope()).unwrap());
    let err = evaluate_condition("${size}", &scope()).unwrap_err();
    assert!(matches!(err, OpafError::Expression(_)));
}
