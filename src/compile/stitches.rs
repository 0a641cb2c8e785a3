//! Stitch accounting over emitted output nodes.

use crate::foundation::error::{OpafError, OpafResult};
use crate::markup::{Element, Node};

/// Number of stitches `nodes` produce.
///
/// An `action` contributes its `total`, a `repeat` contributes `count` times
/// the count of its body, and every other node contributes nothing.
pub fn stitch_count<'a>(nodes: impl IntoIterator<Item = &'a Element>) -> OpafResult<i64> {
    nodes.into_iter().try_fold(0i64, |acc, node| {
        let n = match node.name.as_str() {
            "action" => int_attr(node, "total")?,
            "repeat" => int_attr(node, "count")?
                .checked_mul(stitch_count(node.elements())?)
                .ok_or_else(|| overflow(node))?,
            _ => 0,
        };
        acc.checked_add(n).ok_or_else(|| overflow(node))
    })
}

fn int_attr(node: &Element, key: &str) -> OpafResult<i64> {
    match node.attr(key) {
        None => Ok(0),
        Some(raw) => raw.trim().parse().map_err(|_| {
            OpafError::stitch(format!(
                "'{}' has a non-integer {key} '{raw}'",
                node.attr("name").unwrap_or(&node.name)
            ))
        }),
    }
}

fn overflow(node: &Element) -> OpafError {
    OpafError::stitch(format!("stitch count overflow at '{}'", node.name))
}

/// Number every `row` element depth-first, starting after `last`.
/// Returns the last id handed out.
pub fn assign_row_ids(nodes: &mut [Node], mut last: u64) -> u64 {
    for node in nodes {
        if let Node::Element(el) = node {
            if el.name == "row" {
                last += 1;
                el.set_attr("id", last.to_string());
            }
            last = assign_row_ids(&mut el.children, last);
        }
    }
    last
}

/// Tag every `action` in `nodes` (recursively) with `chart="<name>:<row>"`.
pub fn tag_chart(nodes: &mut [Element], chart: &str, row: usize) {
    let tag = format!("{chart}:{row}");
    for node in nodes {
        tag_element(node, &tag);
    }
}

fn tag_element(el: &mut Element, tag: &str) {
    if el.name == "action" {
        el.set_attr("chart", tag);
    }
    for child in &mut el.children {
        if let Node::Element(e) = child {
            tag_element(e, tag);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/stitches.rs"]
mod tests;
