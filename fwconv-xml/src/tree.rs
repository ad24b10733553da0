use std::collections::BTreeMap;

use serde::Serialize;

/// An owned XML element: tag, attributes, child elements and optional text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XmlNode {
    /// Element tag name.
    pub tag: String,
    /// Attributes keyed by name (written in key order).
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Text content, stored unescaped.
    pub text: Option<String>,
}

impl XmlNode {
    /// Create an element with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Builder: set an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element.
    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Return the first child with `tag`, inserting an empty one at the end if missing.
    pub fn ensure_child(&mut self, tag: &str) -> &mut XmlNode {
        let idx = match self.children.iter().position(|c| c.tag == tag) {
            Some(idx) => idx,
            None => {
                self.children.push(XmlNode::new(tag));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// True when the element has neither children nor text.
    pub fn is_leaf_empty(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }

    /// Attribute value by key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|child| child.tag == tag)
            .collect()
    }

    /// First child with `tag` whose attribute `key` equals `value`.
    pub fn child_with_attr(&self, tag: &str, key: &str, value: &str) -> Option<&XmlNode> {
        self.children
            .iter()
            .find(|child| child.tag == tag && child.attr(key) == Some(value))
    }

    /// Walk a nested child path and return the terminal node.
    pub fn get_path(&self, path: &[&str]) -> Option<&XmlNode> {
        let mut current = self;
        for segment in path {
            current = current.get_child(segment)?;
        }
        Some(current)
    }

    /// Walk a nested child path and return terminal node text if found.
    pub fn get_text<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        self.get_path(path)?.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::XmlNode;

    #[test]
    fn builder_and_path_lookup() {
        let root = XmlNode::new("config").with_child(
            XmlNode::new("system").with_child(XmlNode::new("hostname").with_text("fw1")),
        );
        assert_eq!(root.get_text(&["system", "hostname"]), Some("fw1"));
        assert!(root.get_path(&["system", "timezone"]).is_none());
    }

    #[test]
    fn ensure_child_reuses_existing_element() {
        let mut root = XmlNode::new("network");
        root.ensure_child("interface").push(XmlNode::new("ethernet"));
        root.ensure_child("interface").push(XmlNode::new("loopback"));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children.len(), 2);
    }

    #[test]
    fn child_with_attr_matches_entry_name() {
        let root = XmlNode::new("address")
            .with_child(XmlNode::new("entry").with_attr("name", "web"))
            .with_child(XmlNode::new("entry").with_attr("name", "db"));
        assert!(root.child_with_attr("entry", "name", "db").is_some());
        assert!(root.child_with_attr("entry", "name", "mail").is_none());
    }
}
