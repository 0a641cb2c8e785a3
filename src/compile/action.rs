use crate::compile::expand::{Expander, RefKind, param_scope};
use crate::document::color::NO_COLOR;
use crate::expression::{evaluate, evaluate_condition};
use crate::foundation::error::{OpafError, OpafResult};
use crate::foundation::value::{Scope, Value};
use crate::markup::Element;
use crate::parser::defs::required_attr;

/// Parameter holding an action's colour.
pub const COLOR_PARAM: &str = "color";

impl Expander<'_> {
    /// Instantiate the templates of the referenced action.
    ///
    /// A template's own `condition` is evaluated against the parameter scope
    /// and drops only that template; the attribute is not emitted.
    pub(crate) fn expand_action(
        &self,
        node: &Element,
        scope: &Scope,
        globals: &mut Scope,
    ) -> OpafResult<Vec<Element>> {
        let name = required_attr(node, "name")?;
        let def = self.doc.action(name)?;
        let mut params = param_scope(RefKind::Action, name, &def.params, node, scope, globals)?;

        if let Some(color) = params.get(COLOR_PARAM) {
            let resolved = self.resolve_color(&color.to_string())?;
            params.set(COLOR_PARAM, resolved);
        }

        let mut out = Vec::with_capacity(def.elements.len());
        for template in &def.elements {
            if let Some(cond) = template.attr("condition")
                && !evaluate_condition(cond, &params)?
            {
                continue;
            }
            let mut el = Element::new(template.name.clone());
            for (key, raw) in &template.attrs {
                if key != "condition" {
                    el.set_attr(key.as_str(), evaluate(raw, &params)?);
                }
            }
            el.children = template.children.clone();
            out.push(el);
        }
        Ok(out)
    }

    /// Check a colour parameter and return the colour name to emit.
    ///
    /// Plain names must be declared (or be `none`); `chart:<chart>:<row>:<stitch>`
    /// is replaced by the colour of that stitch in the expanded chart.
    pub(crate) fn resolve_color(&self, color: &str) -> OpafResult<Value> {
        let parts: Vec<&str> = color.split(':').collect();
        match parts.as_slice() {
            [plain] => {
                if *plain != NO_COLOR {
                    self.doc.color(plain)?;
                }
                Ok(Value::from(*plain))
            }
            ["chart", chart, row, stitch] => {
                let row = parse_index(row, color)?;
                let stitch = parse_index(stitch, color)?;
                Ok(Value::Str(self.chart_color(chart, row, stitch)?))
            }
            _ => Err(OpafError::parameter(format!(
                "chart color definition is invalid: '{color}'"
            ))),
        }
    }
}

fn parse_index(raw: &str, color: &str) -> OpafResult<i64> {
    raw.trim().parse().map_err(|_| {
        OpafError::parameter(format!(
            "chart color definition is invalid: '{color}' ('{raw}' is not an integer)"
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/action.rs"]
mod tests;
