//! Embedded `${...}` expressions.
//!
//! Expressions are lexed and parsed into a small AST whose function calls are
//! bound to a fixed built-in table at parse time, then evaluated against an
//! explicit [`Scope`](crate::foundation::value::Scope). Nothing else is
//! reachable from pattern text.

mod ast;
mod builtins;
mod error;
mod eval;
mod lexer;
mod parser;
mod template;

pub use template::{evaluate, evaluate_condition, evaluate_expr, evaluate_value};
