//! Compilation of a packaged pattern into a flat instruction document.
//!
//! Phases run in a fixed order, each feeding the global scope used by the
//! next: configs, values, colours, chart pre-expansion, components. The
//! document is only read; every compile owns its scope and output tree, so
//! one document can be compiled repeatedly with different inputs.

mod action;
mod block;
mod chart;
mod collapse;
mod expand;
mod row;
mod stitches;

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::document::PatternDocument;
use crate::document::color::to_hex;
use crate::expression::{evaluate_condition, evaluate_value};
use crate::foundation::error::{OpafError, OpafResult};
use crate::foundation::value::{Scope, Value};
use crate::markup::{Element, write_document};

pub use action::COLOR_PARAM;
pub use collapse::{FragmentFingerprint, collapse, fingerprint};
pub use expand::{PREV_ROW_COUNT, PREV_ROW_OFFSET, PROTECTED_ATTRS};
pub use stitches::stitch_count;

use expand::Expander;

/// Caller-supplied overrides for one compile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileInput {
    /// Config name to replacement value.
    pub values: BTreeMap<String, String>,
    /// Colour name to replacement colour (hex or named).
    pub colors: BTreeMap<String, String>,
}

impl CompileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_color(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.colors.insert(name.into(), value.into());
        self
    }
}

/// Compiles one packaged [`PatternDocument`].
#[derive(Clone, Copy, Debug)]
pub struct Compiler<'a> {
    doc: &'a PatternDocument,
}

impl<'a> Compiler<'a> {
    pub fn new(doc: &'a PatternDocument) -> Self {
        Self { doc }
    }

    /// Produce the `project` output tree.
    #[tracing::instrument(skip_all, fields(pattern = %self.doc.name))]
    pub fn compile(&self, input: &CompileInput) -> OpafResult<Element> {
        let doc = self.doc;
        if !doc.is_packaged() {
            return Err(OpafError::structure(format!(
                "pattern '{}' has not been packaged; compilation aborted",
                doc.name
            )));
        }

        let mut root = Element::new("project")
            .with_attr("name", &doc.name)
            .with_attr("unique_id", uuid::Uuid::new_v4().to_string());
        for image in &doc.images {
            root.push(
                Element::new("image")
                    .with_attr("name", &image.name)
                    .with_attr("data", STANDARD.encode(&image.data)),
            );
        }
        root.push(self.pattern_node());

        let mut globals = Scope::new();
        root = root.with_children(self.configs(input, &mut globals)?);
        self.values(&mut globals)?;
        root = root.with_children(self.colors(input)?);

        let mut expander = Expander::new(doc);
        for def in &doc.charts {
            if let Some(cond) = &def.condition
                && !evaluate_condition(cond, &globals)?
            {
                tracing::debug!(chart = %def.name, "chart skipped by condition");
                continue;
            }
            let (chart, rows) = expander.prepare_chart(def, &mut globals)?;
            expander.charts.insert(def.name.clone(), rows);
            root.push(chart);
        }

        for component in &doc.components {
            if let Some(cond) = &component.condition
                && !evaluate_condition(cond, &globals)?
            {
                tracing::debug!(component = %component.name, "component skipped by condition");
                continue;
            }
            tracing::debug!(component = %component.name, "expanding component");
            let scope = globals.clone();
            let children = expander.expand_all(&component.elements, &scope, &mut globals)?;
            let mut el = Element::new("component")
                .with_attr("name", &component.name)
                .with_attr("unique_id", &component.uid)
                .with_children(children);
            stitches::assign_row_ids(&mut el.children, 0);
            root.push(el);
        }
        Ok(root)
    }

    /// Compile and serialize.
    pub fn to_xml_string(&self, input: &CompileInput) -> OpafResult<String> {
        Ok(write_document(&self.compile(input)?))
    }

    fn pattern_node(&self) -> Element {
        let doc = self.doc;
        let pattern = Element::new("pattern")
            .with_opt_attr("unique_id", doc.unique_id.as_deref())
            .with_attr("name", &doc.name)
            .with_opt_attr("version", doc.version.as_deref());
        match &doc.metadata {
            Some(metadata) => pattern.with_child(
                Element::new("metadata")
                    .with_children(metadata.elements.iter().map(Element::unprefixed)),
            ),
            None => pattern,
        }
    }

    /// Bind every config, preferring the caller's value, and emit one
    /// `config` node per definition.
    fn configs(&self, input: &CompileInput, globals: &mut Scope) -> OpafResult<Vec<Element>> {
        for name in input.values.keys() {
            if self.doc.config(name).is_err() {
                tracing::warn!(config = %name, "ignoring value for unknown config");
            }
        }

        let mut out = Vec::with_capacity(self.doc.configs.len());
        for def in &self.doc.configs {
            let value = match input.values.get(&def.name) {
                Some(custom) => {
                    if !def.allows(custom) {
                        return Err(OpafError::parameter(format!(
                            "'{custom}' is not a valid value for '{}' (allowed: {})",
                            def.name,
                            def.allowed_values.join(", ")
                        )));
                    }
                    Value::coerce(custom)
                }
                None => {
                    if def.required {
                        tracing::warn!(config = %def.name, "required config left at its default");
                    }
                    evaluate_value(&def.value, globals)?
                }
            };
            let shown = input.values.get(&def.name).unwrap_or(&def.value);
            out.push(
                Element::new("config")
                    .with_attr("name", &def.name)
                    .with_attr("value", shown),
            );
            globals.set(def.name.as_str(), value);
        }
        Ok(out)
    }

    fn values(&self, globals: &mut Scope) -> OpafResult<()> {
        for def in &self.doc.values {
            if let Some(cond) = &def.condition
                && !evaluate_condition(cond, globals)?
            {
                continue;
            }
            let value = evaluate_value(&def.value, globals)?;
            globals.set(def.name.as_str(), value);
        }
        Ok(())
    }

    fn colors(&self, input: &CompileInput) -> OpafResult<Vec<Element>> {
        for name in input.colors.keys() {
            if self.doc.color(name).is_err() {
                tracing::warn!(color = %name, "ignoring unknown color");
            }
        }

        let mut out = Vec::with_capacity(self.doc.colors.len());
        for def in &self.doc.colors {
            let value = match input.colors.get(&def.name) {
                Some(custom) => to_hex(custom)
                    .map_err(|e| OpafError::parameter(format!("color '{}': {e}", def.name)))?,
                None => def.value.clone(),
            };
            out.push(
                Element::new("color")
                    .with_attr("name", &def.name)
                    .with_attr("value", value),
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/mod.rs"]
mod tests;
