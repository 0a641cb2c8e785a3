use crate::foundation::error::OpafResult;
use crate::markup::element::{Element, Node, OPAF_PREFIX};

/// Parsed source text: the root element plus the URI bound to the `opaf`
/// prefix on the root, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: Element,
    pub opaf_namespace: Option<String>,
}

/// Parse XML text into an owned [`Element`] tree.
///
/// Comments, processing instructions and whitespace-only text are dropped.
pub fn read_document(text: &str) -> OpafResult<XmlDocument> {
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();
    let ns = root.lookup_namespace_uri(Some("opaf")).map(str::to_owned);
    Ok(XmlDocument {
        root: convert(root, ns.as_deref()),
        opaf_namespace: ns,
    })
}

fn qualify(local: &str, node_ns: Option<&str>, opaf_ns: Option<&str>) -> String {
    match (node_ns, opaf_ns) {
        (Some(a), Some(b)) if a == b => format!("{OPAF_PREFIX}{local}"),
        _ => local.to_owned(),
    }
}

fn convert(node: roxmltree::Node<'_, '_>, opaf_ns: Option<&str>) -> Element {
    let tag = node.tag_name();
    let mut el = Element::new(qualify(tag.name(), tag.namespace(), opaf_ns));
    for a in node.attributes() {
        el.attrs
            .push((qualify(a.name(), a.namespace(), opaf_ns), a.value().to_owned()));
    }
    for child in node.children() {
        if child.is_element() {
            el.children.push(Node::Element(convert(child, opaf_ns)));
        } else if child.is_text()
            && let Some(t) = child.text()
            && !t.trim().is_empty()
        {
            el.children.push(Node::Text(t.to_owned()));
        }
    }
    el
}

#[cfg(test)]
#[path = "../../tests/unit/markup/reader.rs"]
mod tests;
