use crate::compile::expand::{Expander, PREV_ROW_COUNT, PREV_ROW_OFFSET, PROTECTED_ATTRS, int_attr};
use crate::compile::stitches::stitch_count;
use crate::expression::evaluate;
use crate::foundation::error::{OpafError, OpafResult};
use crate::foundation::value::Scope;
use crate::markup::Element;
use crate::parser::defs::required_attr;

impl Expander<'_> {
    /// Expand an `opaf:row` and its children.
    ///
    /// The row sees the previous row's count and offset even when it sits
    /// inside a block whose scope was captured earlier.
    pub(crate) fn expand_row(
        &self,
        node: &Element,
        scope: &Scope,
        globals: &mut Scope,
    ) -> OpafResult<Vec<Element>> {
        let mut row_scope = scope.clone();
        for key in [PREV_ROW_COUNT, PREV_ROW_OFFSET] {
            if let Some(v) = globals.get(key) {
                row_scope.set(key, v.clone());
            }
        }
        let children = self.expand_all(node.elements(), &row_scope, globals)?;
        Ok(vec![self.finish_row(node, children, &row_scope, globals)?])
    }

    /// Build the output `row` around already expanded children.
    ///
    /// Attributes are evaluated and copied except `offset`, which is added
    /// to the computed stitch count instead. The count and offset are
    /// published to the global scope for the next row.
    pub(crate) fn finish_row(
        &self,
        node: &Element,
        children: Vec<Element>,
        scope: &Scope,
        globals: &mut Scope,
    ) -> OpafResult<Element> {
        required_attr(node, "type")?;
        let mut row = Element::new("row");
        for (key, raw) in &node.attrs {
            if key == "offset" || PROTECTED_ATTRS.contains(&key.as_str()) {
                continue;
            }
            row.set_attr(key.as_str(), evaluate(raw, scope)?);
        }

        let offset = int_attr(node, "offset", scope)?.unwrap_or(0);
        let count = stitch_count(&children)?
            .checked_add(offset)
            .ok_or_else(|| OpafError::stitch("stitch count overflow"))?;
        row.set_attr("count", count.to_string());
        globals.set(PREV_ROW_COUNT, count);
        globals.set(PREV_ROW_OFFSET, offset);

        Ok(row.with_children(children))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/row.rs"]
mod tests;
