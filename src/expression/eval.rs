use std::cmp::Ordering;

use crate::expression::ast::{BinaryOp, Expr, Lit, UnaryOp};
use crate::expression::builtins::compare;
use crate::expression::error::ExprError;
use crate::foundation::value::{Scope, Value};

/// Evaluate a parsed expression against `scope`. Names resolve only through
/// the scope; functions were bound to the built-in table while parsing.
pub(crate) fn eval_expr(expr: &Expr, scope: &Scope) -> Result<Value, ExprError> {
    match expr {
        Expr::Lit(lit) => Ok(match lit {
            Lit::Int(i) => Value::Int(*i),
            Lit::Float(f) => Value::Float(*f),
            Lit::Bool(b) => Value::Bool(*b),
            Lit::Str(s) => Value::Str(s.clone()),
        }),
        Expr::Name(name) => scope
            .get(name)
            .cloned()
            .ok_or_else(|| ExprError::eval(format!("name '{name}' is not defined"))),
        Expr::List(items) => Ok(Value::List(
            items
                .iter()
                .map(|e| eval_expr(e, scope))
                .collect::<Result<_, _>>()?,
        )),
        Expr::Unary { op, expr } => {
            let v = eval_expr(expr, scope)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!v.is_truthy())),
                UnaryOp::Neg => match v {
                    Value::Int(i) => i
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| ExprError::eval("integer overflow")),
                    Value::Bool(b) => Ok(Value::Int(-i64::from(b))),
                    Value::Float(f) => Ok(Value::Float(-f)),
                    other => Err(ExprError::eval(format!(
                        "bad operand type for unary -: '{}'",
                        other.type_name()
                    ))),
                },
            }
        }
        Expr::Binary { op, left, right } => match op {
            BinaryOp::And => {
                let l = eval_expr(left, scope)?;
                if !l.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(eval_expr(right, scope)?.is_truthy()))
            }
            BinaryOp::Or => {
                let l = eval_expr(left, scope)?;
                if l.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(eval_expr(right, scope)?.is_truthy()))
            }
            _ => {
                let l = eval_expr(left, scope)?;
                let r = eval_expr(right, scope)?;
                binary(*op, &l, &r)
            }
        },
        Expr::Call { func, args } => {
            let args = args
                .iter()
                .map(|e| eval_expr(e, scope))
                .collect::<Result<Vec<_>, _>>()?;
            func.apply(&args)
        }
    }
}

/// Operand pair after numeric promotion.
enum Num {
    Int(i64, i64),
    Float(f64, f64),
}

fn int_like(v: &Value) -> Option<i64> {
    match v {
        Value::Int(i) => Some(*i),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn float_like(v: &Value) -> Option<f64> {
    match v {
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => v.as_f64(),
        _ => None,
    }
}

fn promote(op: BinaryOp, l: &Value, r: &Value) -> Result<Num, ExprError> {
    if let (Some(a), Some(b)) = (int_like(l), int_like(r)) {
        return Ok(Num::Int(a, b));
    }
    if let (Some(a), Some(b)) = (float_like(l), float_like(r)) {
        return Ok(Num::Float(a, b));
    }
    Err(ExprError::eval(format!(
        "unsupported operand types for {}: '{}' and '{}'",
        symbol(op),
        l.type_name(),
        r.type_name()
    )))
}

fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::FloorDiv => "//",
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "==",
        BinaryOp::Ne => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::Le => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::Ge => ">=",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
    }
}

fn overflow() -> ExprError {
    ExprError::eval("integer overflow")
}

fn zero_division() -> ExprError {
    ExprError::eval("division by zero")
}

fn binary(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, ExprError> {
    match op {
        BinaryOp::Add => {
            if let (Value::Str(a), Value::Str(b)) = (l, r) {
                return Ok(Value::Str(format!("{a}{b}")));
            }
            match promote(op, l, r)? {
                Num::Int(a, b) => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
                Num::Float(a, b) => Ok(Value::Float(a + b)),
            }
        }
        BinaryOp::Sub => match promote(op, l, r)? {
            Num::Int(a, b) => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
            Num::Float(a, b) => Ok(Value::Float(a - b)),
        },
        BinaryOp::Mul => match promote(op, l, r)? {
            Num::Int(a, b) => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
            Num::Float(a, b) => Ok(Value::Float(a * b)),
        },
        BinaryOp::Div => {
            let (a, b) = match promote(op, l, r)? {
                Num::Int(a, b) => (a as f64, b as f64),
                Num::Float(a, b) => (a, b),
            };
            if b == 0.0 {
                return Err(zero_division());
            }
            Ok(Value::Float(a / b))
        }
        BinaryOp::FloorDiv => match promote(op, l, r)? {
            Num::Int(_, 0) => Err(zero_division()),
            Num::Int(a, b) => {
                let q = a.checked_div(b).ok_or_else(overflow)?;
                if a % b != 0 && ((a < 0) != (b < 0)) {
                    Ok(Value::Int(q - 1))
                } else {
                    Ok(Value::Int(q))
                }
            }
            Num::Float(_, b) if b == 0.0 => Err(zero_division()),
            Num::Float(a, b) => Ok(Value::Float((a / b).floor())),
        },
        // Result takes the sign of the divisor.
        BinaryOp::Mod => match promote(op, l, r)? {
            Num::Int(_, 0) => Err(zero_division()),
            Num::Int(a, b) => {
                let m = a.checked_rem(b).ok_or_else(overflow)?;
                if m != 0 && ((m < 0) != (b < 0)) {
                    Ok(Value::Int(m + b))
                } else {
                    Ok(Value::Int(m))
                }
            }
            Num::Float(_, b) if b == 0.0 => Err(zero_division()),
            Num::Float(a, b) => {
                let m = a % b;
                if m != 0.0 && ((m < 0.0) != (b < 0.0)) {
                    Ok(Value::Float(m + b))
                } else {
                    Ok(Value::Float(m))
                }
            }
        },
        BinaryOp::Eq => Ok(Value::Bool(equal(l, r))),
        BinaryOp::Ne => Ok(Value::Bool(!equal(l, r))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ord = compare(l, r).ok_or_else(|| {
                ExprError::eval(format!(
                    "'{}' not supported between '{}' and '{}'",
                    symbol(op),
                    l.type_name(),
                    r.type_name()
                ))
            })?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ord == Ordering::Less,
                BinaryOp::Le => ord != Ordering::Greater,
                BinaryOp::Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            }))
        }
        BinaryOp::And => Ok(Value::Bool(l.is_truthy() && r.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(l.is_truthy() || r.is_truthy())),
    }
}

fn equal(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equal(x, y))
        }
        _ => match (float_like(l), float_like(r)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
