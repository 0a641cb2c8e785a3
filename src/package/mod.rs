//! Packaged form of a parsed pattern.
//!
//! A package is a single self-contained `pattern` document: includes are
//! resolved, the standard library is inlined and images travel as base64.
//! Re-parsing a package yields the same definitions and never loads the
//! standard library a second time.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::document::{
    ActionDef, BlockDef, ChartDef, ColorDef, ComponentDef, ConfigDef, ImageDef, PatternDocument,
    ValueDef,
};
use crate::foundation::error::{OpafError, OpafResult};
use crate::markup::{Element, OPAF_PREFIX, write_document};

/// Version of the pattern language written into every package.
pub const SPEC_VERSION: &str = "1.5";

/// Version assumed for patterns that do not declare one.
pub const DEFAULT_VERSION: &str = "1.0";

/// Tool stamp stored in `pkg_version`.
pub fn pkg_version() -> String {
    format!("opaf-rs_{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Packager;

impl Packager {
    /// Build the packaged tree for `doc`.
    ///
    /// A missing `unique_id` is generated and a missing version defaults to
    /// [`DEFAULT_VERSION`]. Already packaged documents are refused.
    #[tracing::instrument(skip_all, fields(pattern = %doc.name))]
    pub fn package(&self, doc: &PatternDocument) -> OpafResult<Element> {
        if let Some(pkg) = &doc.pkg_version {
            return Err(OpafError::structure(format!(
                "pattern '{}' is already packaged ({pkg})",
                doc.name
            )));
        }

        let unique_id = doc
            .unique_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut root = Element::new("pattern")
            .with_attr("xmlns:opaf", &doc.namespace)
            .with_attr("spec_version", SPEC_VERSION)
            .with_attr("pkg_version", pkg_version())
            .with_attr("name", &doc.name)
            .with_attr("unique_id", unique_id)
            .with_attr(
                "version",
                doc.version.as_deref().unwrap_or(DEFAULT_VERSION),
            );

        if let Some(metadata) = &doc.metadata {
            root.push(opaf("metadata").with_children(metadata.elements.iter().cloned()));
        }
        root = root
            .with_children(doc.colors.iter().map(color))
            .with_children(doc.actions.iter().map(action))
            .with_children(doc.configs.iter().map(config))
            .with_children(doc.values.iter().map(value))
            .with_children(doc.charts.iter().map(chart))
            .with_children(doc.blocks.iter().map(block))
            .with_children(doc.components.iter().map(component))
            .with_children(doc.images.iter().map(image));

        tracing::debug!(
            actions = doc.actions.len(),
            components = doc.components.len(),
            "pattern packaged"
        );
        Ok(root)
    }

    /// Package `doc` and serialize the result.
    pub fn to_xml_string(&self, doc: &PatternDocument) -> OpafResult<String> {
        Ok(write_document(&self.package(doc)?))
    }
}

fn opaf(local: &str) -> Element {
    Element::new(format!("{OPAF_PREFIX}{local}"))
}

fn color(def: &ColorDef) -> Element {
    opaf("define_color")
        .with_attr("name", &def.name)
        .with_attr("value", &def.value)
}

fn action(def: &ActionDef) -> Element {
    opaf("define_action")
        .with_attr("name", &def.name)
        .with_attr("custom", def.custom.to_string())
        .with_attr("params", def.params.to_attr())
        .with_children(def.elements.iter().cloned())
}

fn config(def: &ConfigDef) -> Element {
    let allowed = (!def.allowed_values.is_empty()).then(|| def.allowed_values.join(","));
    opaf("define_config")
        .with_attr("name", &def.name)
        .with_attr("value", &def.value)
        .with_attr("required", def.required.to_string())
        .with_opt_attr("allowed_values", allowed.as_deref())
        .with_opt_attr("description", def.description.as_deref())
}

fn value(def: &ValueDef) -> Element {
    opaf("define_value")
        .with_attr("unique_id", &def.uid)
        .with_attr("name", &def.name)
        .with_attr("value", &def.value)
        .with_opt_attr("condition", def.condition.as_deref())
}

fn chart(def: &ChartDef) -> Element {
    opaf("define_chart")
        .with_attr("name", &def.name)
        .with_opt_attr("condition", def.condition.as_deref())
        .with_children(def.rows.iter().cloned())
}

fn block(def: &BlockDef) -> Element {
    opaf("define_block")
        .with_attr("name", &def.name)
        .with_attr("params", def.params.to_attr())
        .with_children(def.elements.iter().cloned())
}

fn component(def: &ComponentDef) -> Element {
    opaf("component")
        .with_attr("name", &def.name)
        .with_attr("unique_id", &def.uid)
        .with_opt_attr("condition", def.condition.as_deref())
        .with_children(def.elements.iter().cloned())
}

fn image(def: &ImageDef) -> Element {
    opaf("define_image")
        .with_attr("name", &def.name)
        .with_attr("data", STANDARD.encode(&def.data))
}

#[cfg(test)]
#[path = "../../tests/unit/package/mod.rs"]
mod tests;
