use crate::compile::collapse::collapse;
use crate::compile::expand::{Expander, RefKind, int_attr, param_scope};
use crate::foundation::error::{OpafError, OpafResult};
use crate::foundation::value::Scope;
use crate::markup::Element;
use crate::parser::defs::required_attr;

impl Expander<'_> {
    /// Expand the body of the referenced block `repeat` times.
    ///
    /// Each iteration sees `repeat` (1-based) and `repeat_total`; adjacent
    /// identical iterations are collapsed into `repeat` nodes.
    pub(crate) fn expand_block(
        &self,
        node: &Element,
        scope: &Scope,
        globals: &mut Scope,
    ) -> OpafResult<Vec<Element>> {
        let name = required_attr(node, "name")?;
        let def = self.doc.block(name)?;

        let repeat = int_attr(node, "repeat", scope)?.unwrap_or(1);
        if repeat < 0 {
            return Err(OpafError::parameter(format!(
                "block '{name}' received a negative repeat ({repeat})"
            )));
        }
        let params = param_scope(RefKind::Block, name, &def.params, node, scope, globals)?;

        let mut iterations = Vec::new();
        for i in 1..=repeat {
            let mut iteration = params.clone();
            iteration.set("repeat", i);
            iteration.set("repeat_total", repeat);
            iterations.push(self.expand_all(&def.elements, &iteration, globals)?);
        }
        Ok(collapse(iterations))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/block.rs"]
mod tests;
