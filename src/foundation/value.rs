use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Tagged scalar bound to a name in a [`Scope`].
///
/// Attribute text is always coerced with [`Value::coerce`]: integer first,
/// then float, otherwise the string is kept as-is.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Whole number.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Boolean produced by comparisons and logical built-ins.
    Bool(bool),
    /// Anything that did not parse as a number.
    Str(String),
    /// List literal, only produced inside expressions.
    List(Vec<Value>),
}

impl Value {
    /// Coerce attribute text into the narrowest value: integer, float, string.
    pub fn coerce(text: &str) -> Self {
        let t = text.trim();
        if let Ok(i) = t.parse::<i64>() {
            return Self::Int(i);
        }
        if !t.is_empty()
            && let Ok(f) = t.parse::<f64>()
        {
            return Self::Float(f);
        }
        Self::Str(text.to_owned())
    }

    /// Integer view: integers, integral floats, and numeric strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Self::Str(s) => match Self::coerce(s) {
                Self::Str(_) => None,
                v => v.as_i64(),
            },
            Self::Bool(_) | Self::Float(_) | Self::List(_) => None,
        }
    }

    /// Numeric view used by arithmetic; booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            Self::Str(s) => match Self::coerce(s) {
                Self::Str(_) => None,
                v => v.as_f64(),
            },
            Self::List(_) => None,
        }
    }

    /// Truthiness: zero, empty strings and empty lists are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Bool(b) => *b,
            Self::Str(s) => !s.is_empty(),
            Self::List(v) => !v.is_empty(),
        }
    }

    /// `true` for the empty string and the empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::List(v) => v.is_empty(),
            Self::Int(_) | Self::Float(_) | Self::Bool(_) => false,
        }
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

/// Ordered name table that expressions are evaluated against.
///
/// Layering (defaults, globals, attributes) goes through [`Scope::overlay`] so
/// that every call site resolves precedence the same way: later layers win.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Scope {
    vars: BTreeMap<String, Value>,
}

impl Scope {
    /// Empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a bound name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Bind (or rebind) a name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Copy every binding of `other` into `self`, replacing existing names.
    pub fn overlay(&mut self, other: &Scope) {
        for (k, v) in &other.vars {
            self.vars.insert(k.clone(), v.clone());
        }
    }
}

impl FromIterator<(String, Value)> for Scope {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/value.rs"]
mod tests;
