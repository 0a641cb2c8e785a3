use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::document::color::to_hex;
use crate::document::metadata::check_metadata;
use crate::document::{
    ActionDef, BlockDef, ChartDef, ColorDef, ComponentDef, ConfigDef, ImageCodec, ImageDef,
    Metadata, Params, ValueDef,
};
use crate::foundation::error::{OpafError, OpafResult};
use crate::markup::Element;
use crate::parser::include::resolve_uri;

/// Node kinds allowed inside block and component bodies.
pub const STRUCTURAL_NODES: &[&str] = &["action", "block", "chart", "row", "image", "text"];

pub(crate) fn required_attr<'a>(el: &'a Element, key: &str) -> OpafResult<&'a str> {
    match el.attr(key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(OpafError::parameter(format!(
            "'{}' is missing required attribute '{key}'",
            el.name
        ))),
    }
}

fn optional_attr(el: &Element, key: &str) -> Option<String> {
    el.attr(key).map(str::to_owned)
}

fn uid_or_new(el: &Element) -> String {
    el.attr("unique_id")
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Validate a structural body recursively and return its element children.
pub(crate) fn structural_children(el: &Element, allowed: &[&str]) -> OpafResult<Vec<Element>> {
    check_structure(el, allowed)?;
    Ok(el.elements().cloned().collect())
}

fn check_structure(el: &Element, allowed: &[&str]) -> OpafResult<()> {
    for child in el.elements() {
        if !child.is_opaf() {
            return Err(OpafError::structure(format!(
                "node with name '{}' not recognized",
                child.name
            )));
        }
        if !allowed.contains(&child.local_name()) {
            return Err(OpafError::structure(format!(
                "node with name '{}' is not allowed in '{}'",
                child.name, el.name
            )));
        }
        check_structure(child, allowed)?;
    }
    Ok(())
}

pub(crate) fn config(el: &Element) -> OpafResult<ConfigDef> {
    Ok(ConfigDef {
        name: required_attr(el, "name")?.to_owned(),
        value: el.attr("value").unwrap_or_default().to_owned(),
        required: el
            .attr("required")
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        allowed_values: el
            .attr("allowed_values")
            .map(|list| {
                list.split(',')
                    .map(|v| v.trim().to_owned())
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        description: optional_attr(el, "description"),
    })
}

pub(crate) fn value(el: &Element) -> OpafResult<ValueDef> {
    Ok(ValueDef {
        uid: uid_or_new(el),
        name: required_attr(el, "name")?.to_owned(),
        value: el.attr("value").unwrap_or_default().to_owned(),
        condition: optional_attr(el, "condition"),
    })
}

pub(crate) fn color(el: &Element) -> OpafResult<ColorDef> {
    let name = required_attr(el, "name")?;
    let value = to_hex(required_attr(el, "value")?)
        .map_err(|e| OpafError::parameter(format!("color '{name}': {e}")))?;
    Ok(ColorDef {
        name: name.to_owned(),
        value,
    })
}

pub(crate) fn image(
    el: &Element,
    dir: &Path,
    codec: &dyn ImageCodec,
    default_max_dim: u32,
) -> OpafResult<ImageDef> {
    let name = required_attr(el, "name")?.to_owned();
    let max_dim = match el.attr("size") {
        Some(s) => s.trim().parse().map_err(|_| {
            OpafError::parameter(format!("image '{name}' has an invalid size '{s}'"))
        })?,
        None => default_max_dim,
    };

    let data = if let Some(uri) = el.attr("uri") {
        let path = resolve_uri(uri, dir)?;
        codec.encode(&path, max_dim)?
    } else if let Some(data) = el.attr("data") {
        STANDARD
            .decode(data.trim())
            .map_err(|e| OpafError::parameter(format!("image '{name}' has invalid data: {e}")))?
    } else {
        return Err(OpafError::parameter(format!(
            "image '{name}' needs either a 'uri' or a 'data' attribute"
        )));
    };
    Ok(ImageDef { name, data })
}

pub(crate) fn action(el: &Element) -> OpafResult<ActionDef> {
    let name = required_attr(el, "name")?.to_owned();
    let mut elements = Vec::new();
    for child in el.elements() {
        if child.name != "action" {
            return Err(OpafError::structure(format!(
                "node with name '{}' is not allowed in action '{name}'",
                child.name
            )));
        }
        elements.push(child.clone());
    }
    Ok(ActionDef {
        custom: el
            .attr("custom")
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        params: Params::parse(el.attr("params").unwrap_or_default()),
        name,
        elements,
    })
}

pub(crate) fn block(el: &Element) -> OpafResult<BlockDef> {
    Ok(BlockDef {
        name: required_attr(el, "name")?.to_owned(),
        params: Params::parse(el.attr("params").unwrap_or_default()),
        elements: structural_children(el, STRUCTURAL_NODES)?,
    })
}

pub(crate) fn chart(el: &Element) -> OpafResult<ChartDef> {
    let name = required_attr(el, "name")?.to_owned();
    if name.contains(':') {
        return Err(OpafError::structure(format!(
            "chart name '{name}' contains invalid character ':'"
        )));
    }
    let mut rows = Vec::new();
    for row in el.elements() {
        if !row.is("row") {
            return Err(OpafError::structure(format!(
                "node with name '{}' is not allowed in chart '{name}'",
                row.name
            )));
        }
        structural_children(row, &["action"])?;
        rows.push(row.clone());
    }
    if rows.is_empty() {
        return Err(OpafError::structure(format!("chart '{name}' has no rows")));
    }
    Ok(ChartDef {
        name,
        rows,
        condition: optional_attr(el, "condition"),
    })
}

pub(crate) fn component(el: &Element) -> OpafResult<ComponentDef> {
    Ok(ComponentDef {
        name: required_attr(el, "name")?.to_owned(),
        uid: uid_or_new(el),
        elements: structural_children(el, STRUCTURAL_NODES)?,
        condition: optional_attr(el, "condition"),
    })
}

pub(crate) fn metadata(el: &Element) -> OpafResult<Metadata> {
    check_metadata(el)?;
    Ok(Metadata {
        elements: el.elements().cloned().collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/parser/defs.rs"]
mod tests;
