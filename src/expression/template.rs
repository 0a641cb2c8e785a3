use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::expression::eval::eval_expr;
use crate::expression::parser::parse_expr;
use crate::foundation::error::{OpafError, OpafResult};
use crate::foundation::value::{Scope, Value};

static SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\{(.*?)\}").expect("span pattern is valid"));

/// Evaluate a single expression body (the text between `${` and `}`).
pub fn evaluate_expr(src: &str, scope: &Scope) -> OpafResult<Value> {
    parse_expr(src)
        .and_then(|expr| eval_expr(&expr, scope))
        .map_err(|e| OpafError::expression(format!("failed to evaluate <{src}>: {e}")))
}

/// Replace every `${...}` span in `template` with the display form of its
/// value. Text outside spans is copied unchanged.
pub fn evaluate(template: &str, scope: &Scope) -> OpafResult<String> {
    if !template.contains("${") {
        return Ok(template.to_owned());
    }
    let mut failure = None;
    let out = SPAN.replace_all(template, |caps: &Captures<'_>| {
        if failure.is_some() {
            return String::new();
        }
        match evaluate_expr(&caps[1], scope) {
            Ok(v) => v.to_string(),
            Err(e) => {
                failure = Some(e);
                String::new()
            }
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(out.into_owned()),
    }
}

/// Like [`evaluate`], but typed: a template that is exactly one span yields
/// the expression's value as-is; anything else is interpolated and coerced.
pub fn evaluate_value(template: &str, scope: &Scope) -> OpafResult<Value> {
    let trimmed = template.trim();
    if let Some(caps) = SPAN.captures(trimmed)
        && let Some(whole) = caps.get(0)
        && whole.start() == 0
        && whole.end() == trimmed.len()
    {
        return evaluate_expr(&caps[1], scope);
    }
    Ok(Value::coerce(&evaluate(template, scope)?))
}

/// Evaluate a guard. An empty condition holds; otherwise the interpolated
/// text must read `true` or `false` (any case).
pub fn evaluate_condition(condition: &str, scope: &Scope) -> OpafResult<bool> {
    if condition.trim().is_empty() {
        return Ok(true);
    }
    let result = evaluate(condition, scope)?;
    match result.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(OpafError::expression(format!(
            "condition {condition} did not evaluate to 'true' or 'false' (got '{result}')"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/template.rs"]
mod tests;
