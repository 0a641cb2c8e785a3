/// Child of an [`Element`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Non-whitespace character data.
    Text(String),
}

/// Owned XML element.
///
/// Elements in the OPAF namespace carry the `opaf:` prefix in `name`; all
/// other elements keep their local name. Attribute order is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Prefix marking elements of the OPAF vocabulary.
pub const OPAF_PREFIX: &str = "opaf:";

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name without the `opaf:` prefix.
    pub fn local_name(&self) -> &str {
        self.name.strip_prefix(OPAF_PREFIX).unwrap_or(&self.name)
    }

    /// `true` for elements of the OPAF vocabulary.
    pub fn is_opaf(&self) -> bool {
        self.name.starts_with(OPAF_PREFIX)
    }

    /// `true` when this is `opaf:<local>`.
    pub fn is(&self, local: &str) -> bool {
        self.is_opaf() && self.local_name() == local
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, replacing an existing value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set `key` only when `value` is present.
    pub fn with_opt_attr(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with_attr(key, v),
            None => self,
        }
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Copy of this subtree with the `opaf:` prefix removed everywhere.
    pub fn unprefixed(&self) -> Element {
        Element {
            name: self.local_name().to_owned(),
            attrs: self.attrs.clone(),
            children: self
                .children
                .iter()
                .map(|n| match n {
                    Node::Element(e) => Node::Element(e.unprefixed()),
                    Node::Text(t) => Node::Text(t.clone()),
                })
                .collect(),
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

impl From<String> for Node {
    fn from(t: String) -> Self {
        Self::Text(t)
    }
}

impl From<&str> for Node {
    fn from(t: &str) -> Self {
        Self::Text(t.to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markup/element.rs"]
mod tests;
