//! The tagged text payload type.

use serde::{Deserialize, Serialize};

/// Text content at any depth: a leaf segment's string, or a node holding
/// the next level down. The wire form is a bare string or a nested array
/// of strings, depending on how deep the addressed ref sits in the work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextNode {
    Leaf(String),
    Node(Vec<TextNode>),
}

impl Default for TextNode {
    fn default() -> Self {
        TextNode::Leaf(String::new())
    }
}

impl TextNode {
    /// Nesting depth: 0 for a leaf, 1 for a flat section, and so on.
    /// An empty node still counts its own level.
    pub fn depth(&self) -> usize {
        match self {
            TextNode::Leaf(_) => 0,
            TextNode::Node(children) => 1 + children.iter().map(TextNode::depth).max().unwrap_or(0),
        }
    }

    /// Number of direct children; 0 for a leaf.
    pub fn len(&self) -> usize {
        match self {
            TextNode::Leaf(_) => 0,
            TextNode::Node(children) => children.len(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TextNode::Leaf(_))
    }

    /// True when there is no actual content anywhere under this node.
    pub fn is_empty(&self) -> bool {
        match self {
            TextNode::Leaf(text) => text.trim().is_empty(),
            TextNode::Node(children) => children.iter().all(TextNode::is_empty),
        }
    }

    /// Direct child by zero-based position.
    pub fn child(&self, i: usize) -> Option<&TextNode> {
        match self {
            TextNode::Leaf(_) => None,
            TextNode::Node(children) => children.get(i),
        }
    }

    /// Child by position, with a missing or out-of-range child degrading
    /// to an empty leaf. Parallel language payloads are frequently ragged
    /// (the translation stops before the original does).
    pub fn child_or_empty(&self, i: usize) -> TextNode {
        self.child(i).cloned().unwrap_or_default()
    }

    /// All leaf strings under this node, in reading order.
    pub fn flatten(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TextNode::Leaf(text) => out.push(text),
            TextNode::Node(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl From<&str> for TextNode {
    fn from(s: &str) -> Self {
        TextNode::Leaf(s.to_string())
    }
}

impl<T: Into<TextNode>> From<Vec<T>> for TextNode {
    fn from(items: Vec<T>) -> Self {
        TextNode::Node(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> TextNode {
        TextNode::from(vec!["In the beginning", "", "And God said"])
    }

    #[test]
    fn wire_form_round_trip() {
        let leaf: TextNode = serde_json::from_str(r#""a verse""#).unwrap();
        assert_eq!(leaf, TextNode::Leaf("a verse".into()));

        let nested: TextNode = serde_json::from_str(r#"[["a", "b"], ["c"]]"#).unwrap();
        assert_eq!(nested.depth(), 2);
        assert_eq!(serde_json::to_string(&nested).unwrap(), r#"[["a","b"],["c"]]"#);
    }

    #[test]
    fn depth_and_len() {
        assert_eq!(section().depth(), 1);
        assert_eq!(section().len(), 3);
        assert_eq!(TextNode::default().depth(), 0);
    }

    #[test]
    fn emptiness_sees_through_nesting() {
        assert!(TextNode::default().is_empty());
        assert!(TextNode::from(vec!["", "  "]).is_empty());
        assert!(!section().is_empty());
        assert!(section().child(1).unwrap().is_empty());
    }

    #[test]
    fn ragged_children_degrade_to_empty() {
        assert_eq!(section().child_or_empty(7), TextNode::default());
        assert_eq!(section().child_or_empty(0), TextNode::Leaf("In the beginning".into()));
    }

    #[test]
    fn flatten_is_reading_order() {
        let nested = TextNode::from(vec![TextNode::from(vec!["a", "b"]), TextNode::from("c")]);
        assert_eq!(nested.flatten(), vec!["a", "b", "c"]);
    }
}
