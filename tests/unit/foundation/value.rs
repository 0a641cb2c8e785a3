use super::*;

#[test]
fn coerce_prefers_int_then_float_then_string() {
    assert_eq!(Value::coerce("12"), Value::Int(12));
    assert_eq!(Value::coerce("-3"), Value::Int(-3));
    assert_eq!(Value::coerce("2.5"), Value::Float(2.5));
    assert_eq!(Value::coerce("MC"), Value::Str("MC".to_owned()));
    assert_eq!(Value::coerce(""), Value::Str(String::new()));
}

#[test]
fn integral_floats_display_without_fraction() {
    assert_eq!(Value::Float(3.0).to_string(), "3");
    assert_eq!(Value::Float(3.5).to_string(), "3.5");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(
        Value::List(vec![Value::Int(1), Value::from("a")]).to_string(),
        "[1, a]"
    );
}

#[test]
fn as_i64_accepts_integral_floats_only() {
    assert_eq!(Value::Float(4.0).as_i64(), Some(4));
    assert_eq!(Value::Float(4.5).as_i64(), None);
    assert_eq!(Value::from("7").as_i64(), Some(7));
    assert_eq!(Value::from("seven").as_i64(), None);
}

#[test]
fn later_layers_win() {
    let mut a = Scope::new();
    a.set("n", 1i64);
    a.set("color", "MC");
    let mut b = Scope::new();
    b.set("n", 2i64);

    let mut merged = a.clone();
    merged.overlay(&b);
    assert_eq!(merged.get("n"), Some(&Value::Int(2)));
    assert_eq!(merged.get("color"), Some(&Value::from("MC")));
    assert_eq!(merged.get("missing"), None);
}
