use std::cmp::Ordering;

use crate::expression::error::ExprError;
use crate::foundation::value::Value;

/// The fixed function table visible to pattern expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Round,
    Mround,
    Floor,
    Ceil,
    Lt,
    Gt,
    Eq,
    Neq,
    And,
    Or,
    Not,
    Abs,
    Choose,
    IsEmpty,
    Odd,
    Even,
    Multiple,
    Min,
    Max,
    Bool,
}

impl Builtin {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ROUND" => Self::Round,
            "MROUND" => Self::Mround,
            "FLOOR" => Self::Floor,
            "CEIL" => Self::Ceil,
            "LT" => Self::Lt,
            "GT" => Self::Gt,
            "EQ" => Self::Eq,
            "NEQ" => Self::Neq,
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "ABS" => Self::Abs,
            "CHOOSE" => Self::Choose,
            "ISEMPTY" => Self::IsEmpty,
            "ODD" => Self::Odd,
            "EVEN" => Self::Even,
            "MULTIPLE" => Self::Multiple,
            "MIN" => Self::Min,
            "MAX" => Self::Max,
            "BOOL" => Self::Bool,
            _ => return None,
        })
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Round => "ROUND",
            Self::Mround => "MROUND",
            Self::Floor => "FLOOR",
            Self::Ceil => "CEIL",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Abs => "ABS",
            Self::Choose => "CHOOSE",
            Self::IsEmpty => "ISEMPTY",
            Self::Odd => "ODD",
            Self::Even => "EVEN",
            Self::Multiple => "MULTIPLE",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Bool => "BOOL",
        }
    }

    /// Inclusive argument-count range; `None` upper bound means variadic.
    fn arity(self) -> (usize, Option<usize>) {
        match self {
            Self::Round | Self::Floor | Self::Ceil => (1, Some(2)),
            Self::Mround | Self::Lt | Self::Gt | Self::Eq | Self::Neq | Self::Multiple => {
                (2, Some(2))
            }
            Self::Not | Self::Abs | Self::IsEmpty | Self::Odd | Self::Even | Self::Bool => {
                (1, Some(1))
            }
            Self::And | Self::Or | Self::Min | Self::Max => (1, None),
            Self::Choose => (2, None),
        }
    }

    pub(crate) fn apply(self, args: &[Value]) -> Result<Value, ExprError> {
        let (min, max) = self.arity();
        if args.len() < min || max.is_some_and(|m| args.len() > m) {
            return Err(ExprError::eval(format!(
                "{}() takes {} argument(s), got {}",
                self.name(),
                match max {
                    Some(m) if m == min => min.to_string(),
                    Some(m) => format!("{min} to {m}"),
                    None => format!("at least {min}"),
                },
                args.len()
            )));
        }

        match self {
            Self::Round => round(&args[0], args.get(1)),
            Self::Mround => snap(self, &args[0], Some(&args[1]), f64::round),
            Self::Floor => snap(self, &args[0], args.get(1), f64::floor),
            Self::Ceil => snap(self, &args[0], args.get(1), f64::ceil),
            Self::Lt => Ok(Value::Bool(order(self, &args[0], &args[1])? == Ordering::Less)),
            Self::Gt => Ok(Value::Bool(
                order(self, &args[0], &args[1])? == Ordering::Greater,
            )),
            Self::Eq => Ok(Value::Bool(matches_any(&args[0], &args[1]))),
            Self::Neq => Ok(Value::Bool(!matches_any(&args[0], &args[1]))),
            Self::And => Ok(Value::Bool(args.iter().all(Value::is_truthy))),
            Self::Or => Ok(Value::Bool(args.iter().any(Value::is_truthy))),
            Self::Not => Ok(Value::Bool(!args[0].is_truthy())),
            Self::Abs => abs(&args[0]),
            Self::Choose => choose(&args[0], &args[1..]),
            Self::IsEmpty => Ok(Value::Bool(args[0].is_empty())),
            Self::Odd => Ok(Value::Bool(int_arg(self, &args[0])?.rem_euclid(2) == 1)),
            Self::Even => Ok(Value::Bool(int_arg(self, &args[0])?.rem_euclid(2) == 0)),
            Self::Multiple => multiple(&args[0], &args[1]),
            Self::Min => extremum(self, args, Ordering::Less),
            Self::Max => extremum(self, args, Ordering::Greater),
            Self::Bool => Ok(Value::Bool(to_bool(&args[0]))),
        }
    }
}

fn num_arg(func: Builtin, v: &Value) -> Result<f64, ExprError> {
    v.as_f64().ok_or_else(|| {
        ExprError::eval(format!(
            "{}() expects a number, got {} '{v}'",
            func.name(),
            v.type_name()
        ))
    })
}

fn int_arg(func: Builtin, v: &Value) -> Result<i64, ExprError> {
    v.as_i64().ok_or_else(|| {
        ExprError::eval(format!(
            "{}() expects an integer, got {} '{v}'",
            func.name(),
            v.type_name()
        ))
    })
}

fn is_int(v: &Value) -> bool {
    matches!(v, Value::Int(_))
}

fn float_to_int(x: f64) -> Result<Value, ExprError> {
    if !x.is_finite() || x.abs() >= 9.2e18 {
        return Err(ExprError::eval(format!("{x} cannot be converted to an integer")));
    }
    Ok(Value::Int(x as i64))
}

// Banker's rounding; an integer result unless `digits` is given.
fn round(x: &Value, digits: Option<&Value>) -> Result<Value, ExprError> {
    let f = num_arg(Builtin::Round, x)?;
    match digits {
        None => {
            if let Value::Int(i) = x {
                return Ok(Value::Int(*i));
            }
            float_to_int(f.round_ties_even())
        }
        Some(d) => {
            let d = int_arg(Builtin::Round, d)?;
            if let Value::Int(i) = x
                && d >= 0
            {
                return Ok(Value::Int(*i));
            }
            let scale = 10f64.powi(d.clamp(-300, 300) as i32);
            Ok(Value::Float((f * scale).round_ties_even() / scale))
        }
    }
}

// Snap `x` to a multiple of `multiple` (default 1) with `op`.
fn snap(
    func: Builtin,
    x: &Value,
    multiple: Option<&Value>,
    op: fn(f64) -> f64,
) -> Result<Value, ExprError> {
    let f = num_arg(func, x)?;
    let (m, int_multiple) = match multiple {
        Some(m) => (num_arg(func, m)?, m.as_i64().is_some()),
        None => (1.0, true),
    };
    if m == 0.0 {
        return Ok(Value::Int(0));
    }
    let snapped = op(f / m) * m;
    if int_multiple {
        float_to_int(snapped)
    } else {
        Ok(Value::Float(snapped))
    }
}

/// Ordering used by `LT`, `GT`, `MIN` and `MAX`: numeric when both sides are
/// numbers, lexicographic when both are strings.
pub(crate) fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::List(_), _) | (_, Value::List(_)) => None,
        (Value::Str(_), _) | (_, Value::Str(_)) => None,
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn order(func: Builtin, a: &Value, b: &Value) -> Result<Ordering, ExprError> {
    compare(a, b).ok_or_else(|| {
        ExprError::eval(format!(
            "{}() cannot compare {} '{a}' with {} '{b}'",
            func.name(),
            a.type_name(),
            b.type_name()
        ))
    })
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    a.to_string().to_lowercase() == b.to_string().to_lowercase()
}

fn matches_any(val: &Value, candidates: &Value) -> bool {
    match candidates {
        Value::List(items) => items.iter().any(|c| loose_eq(val, c)),
        other => loose_eq(val, other),
    }
}

fn abs(v: &Value) -> Result<Value, ExprError> {
    match v {
        Value::Int(i) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| ExprError::eval("integer overflow in ABS()")),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => Ok(Value::Float(num_arg(Builtin::Abs, other)?.abs())),
    }
}

fn choose(index: &Value, rest: &[Value]) -> Result<Value, ExprError> {
    let i = int_arg(Builtin::Choose, index)?;
    let options: &[Value] = match rest {
        [Value::List(items)] => items,
        _ => rest,
    };
    if i < 1 || i as u64 > options.len() as u64 {
        return Err(ExprError::eval(format!(
            "CHOOSE() index {i} is out of range 1..={}",
            options.len()
        )));
    }
    Ok(options[(i - 1) as usize].clone())
}

fn multiple(val: &Value, of: &Value) -> Result<Value, ExprError> {
    if is_int(val) && is_int(of) {
        let (a, b) = (
            int_arg(Builtin::Multiple, val)?,
            int_arg(Builtin::Multiple, of)?,
        );
        if b == 0 {
            return Ok(Value::Bool(a == 0));
        }
        return Ok(Value::Bool(a.rem_euclid(b) == 0));
    }
    let (a, b) = (
        num_arg(Builtin::Multiple, val)?,
        num_arg(Builtin::Multiple, of)?,
    );
    if b == 0.0 {
        return Ok(Value::Bool(a == 0.0));
    }
    Ok(Value::Bool((a % b) == 0.0))
}

fn flatten<'a>(args: &'a [Value], out: &mut Vec<&'a Value>) {
    for a in args {
        match a {
            Value::List(items) => flatten(items, out),
            other => out.push(other),
        }
    }
}

fn extremum(func: Builtin, args: &[Value], keep: Ordering) -> Result<Value, ExprError> {
    let mut flat = Vec::new();
    flatten(args, &mut flat);
    let mut best: Option<&Value> = None;
    for v in flat {
        best = match best {
            None => Some(v),
            Some(b) => {
                if order(func, v, b)? == keep {
                    Some(v)
                } else {
                    Some(b)
                }
            }
        };
    }
    best.cloned()
        .ok_or_else(|| ExprError::eval(format!("{}() of an empty list", func.name())))
}

fn to_bool(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Str(s) => {
            let t = s.trim().to_lowercase();
            matches!(t.as_str(), "yes" | "true" | "1")
                || t.parse::<f64>().is_ok_and(|f| f == 1.0)
        }
        Value::List(_) => false,
        other => other.as_f64().is_some_and(|f| f == 1.0),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/builtins.rs"]
mod tests;
