use std::collections::BTreeMap;

use crate::compile::chart::ChartRow;
use crate::document::{Params, PatternDocument};
use crate::expression::{evaluate, evaluate_condition, evaluate_value};
use crate::foundation::error::{OpafError, OpafResult};
use crate::foundation::value::{Scope, Value};
use crate::markup::Element;
use crate::parser::defs::required_attr;

/// Attributes of a reference that never become parameters.
pub const PROTECTED_ATTRS: &[&str] = &["xmlns:opaf", "condition", "name", "repeat"];

/// Stitch count of the most recently emitted row.
pub const PREV_ROW_COUNT: &str = "opaf_prev_row_count";
/// Explicit `offset` of the most recently emitted row.
pub const PREV_ROW_OFFSET: &str = "opaf_prev_row_offset";

/// Recursive expansion of structural nodes into output nodes.
///
/// Every method returns a freshly built node list. The running global scope
/// is passed in explicitly; `scope` is the caller's scope that a node's own
/// attributes are evaluated against.
pub(crate) struct Expander<'a> {
    pub(crate) doc: &'a PatternDocument,
    pub(crate) charts: BTreeMap<String, Vec<ChartRow>>,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(doc: &'a PatternDocument) -> Self {
        Self {
            doc,
            charts: BTreeMap::new(),
        }
    }

    /// Expand one structural node, or nothing when its condition is false.
    pub(crate) fn expand_node(
        &self,
        node: &Element,
        scope: &Scope,
        globals: &mut Scope,
    ) -> OpafResult<Vec<Element>> {
        if !node_condition(node, scope)? {
            return Ok(Vec::new());
        }
        if !node.is_opaf() {
            return Err(unknown(node));
        }
        match node.local_name() {
            "action" => self.expand_action(node, scope, globals),
            "block" => self.expand_block(node, scope, globals),
            "chart" => self.expand_chart(node, scope, globals),
            "row" => self.expand_row(node, scope, globals),
            "image" => self.expand_image(node).map(|el| vec![el]),
            "text" => expand_text(node, scope).map(|el| vec![el]),
            _ => Err(unknown(node)),
        }
    }

    pub(crate) fn expand_all<'n>(
        &self,
        nodes: impl IntoIterator<Item = &'n Element>,
        scope: &Scope,
        globals: &mut Scope,
    ) -> OpafResult<Vec<Element>> {
        let mut out = Vec::new();
        for node in nodes {
            out.extend(self.expand_node(node, scope, globals)?);
        }
        Ok(out)
    }

    fn expand_image(&self, node: &Element) -> OpafResult<Element> {
        let name = required_attr(node, "name")?;
        self.doc.image(name)?;
        Ok(Element::new("image")
            .with_attr("name", name)
            .with_opt_attr("tag", node.attr("tag"))
            .with_opt_attr("caption", node.attr("caption")))
    }
}

fn expand_text(node: &Element, scope: &Scope) -> OpafResult<Element> {
    let text = Element::new("text");
    Ok(match node.attr("data") {
        Some(data) => text.with_attr("data", evaluate(data, scope)?),
        None => text,
    })
}

fn unknown(node: &Element) -> OpafError {
    OpafError::structure(format!("node with name '{}' not recognized", node.name))
}

/// `true` unless the node carries a `condition` that evaluates false.
pub(crate) fn node_condition(node: &Element, scope: &Scope) -> OpafResult<bool> {
    match node.attr("condition") {
        Some(cond) => evaluate_condition(cond, scope),
        None => Ok(true),
    }
}

/// Optional integer attribute evaluated against `scope`.
pub(crate) fn int_attr(node: &Element, key: &str, scope: &Scope) -> OpafResult<Option<i64>> {
    let Some(raw) = node.attr(key) else {
        return Ok(None);
    };
    let value = evaluate_value(raw, scope)?;
    match value.as_i64() {
        Some(n) => Ok(Some(n)),
        None => Err(OpafError::parameter(format!(
            "attribute '{key}' of '{}' must be an integer, got '{value}'",
            node.attr("name").unwrap_or(&node.name)
        ))),
    }
}

/// Kind of definition a reference points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RefKind {
    /// Reference attributes override globals.
    Action,
    /// Globals override reference attributes.
    Block,
}

impl RefKind {
    fn label(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Block => "block",
        }
    }
}

/// Parameter scope of an action or block reference.
///
/// Declared defaults come first. The reference's own attributes, evaluated
/// in the caller's scope, and the global scope are layered on top: for an
/// action the attributes win, for a block the globals do. Every declared
/// parameter must be non-empty before block globals are applied.
pub(crate) fn param_scope(
    kind: RefKind,
    name: &str,
    params: &Params,
    node: &Element,
    scope: &Scope,
    globals: &Scope,
) -> OpafResult<Scope> {
    let mut out = params.defaults();
    if kind == RefKind::Action {
        out.overlay(globals);
    }
    for (key, raw) in &node.attrs {
        if PROTECTED_ATTRS.contains(&key.as_str()) {
            continue;
        }
        out.set(key.as_str(), evaluate_value(raw, scope)?);
    }
    for param in params.names() {
        if out.get(param).is_none_or(Value::is_empty) {
            return Err(OpafError::parameter(format!(
                "parameter '{param}' is not defined for {} '{name}'",
                kind.label()
            )));
        }
    }
    if kind == RefKind::Block {
        out.overlay(globals);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/expand.rs"]
mod tests;
