//! Structured document tree
//!
//! The JSON shape follows the usual rich-text editor convention:
//! `{"type": "doc", "content": [{"type": "paragraph", "content": [...]}]}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One node of the exported document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<DocumentNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<MarkNode>>,
}

/// An inline mark attached to a text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkNode {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
}

impl DocumentNode {
    pub fn new(node_type: &str) -> Self {
        Self {
            node_type: node_type.to_string(),
            attrs: None,
            content: None,
            text: None,
            marks: None,
        }
    }

    pub fn text_node(text: &str, marks: Vec<MarkNode>) -> Self {
        let mut node = Self::new("text");
        node.text = Some(text.to_string());
        if !marks.is_empty() {
            node.marks = Some(marks);
        }
        node
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// Set children; an empty list leaves `content` out entirely
    pub fn with_content(mut self, children: Vec<DocumentNode>) -> Self {
        self.content = if children.is_empty() {
            None
        } else {
            Some(children)
        };
        self
    }

    pub fn children(&self) -> &[DocumentNode] {
        self.content.as_deref().unwrap_or(&[])
    }

    /// Concatenated text of every descendant text node
    pub fn plain_text(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in self.children() {
            out.push_str(&child.plain_text());
        }
        out
    }
}

impl MarkNode {
    pub fn new(mark_type: &str) -> Self {
        Self {
            mark_type: mark_type.to_string(),
            attrs: None,
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_omitted() {
        let node = DocumentNode::new("paragraph").with_content(vec![]);
        let json = serde_json::to_string(&node).expect("serialize");
        assert_eq!(json, r#"{"type":"paragraph"}"#);
    }

    #[test]
    fn test_text_node_with_marks() {
        let node = DocumentNode::text_node(
            "hi",
            vec![MarkNode::new("textStyle").with_attr("color", "#EF4444")],
        );
        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(value["text"], "hi");
        assert_eq!(value["marks"][0]["type"], "textStyle");
        assert_eq!(value["marks"][0]["attrs"]["color"], "#EF4444");
    }

    #[test]
    fn test_plain_text_walks_children() {
        let doc = DocumentNode::new("doc").with_content(vec![
            DocumentNode::new("paragraph")
                .with_content(vec![DocumentNode::text_node("a", vec![])]),
            DocumentNode::new("paragraph")
                .with_content(vec![DocumentNode::text_node("b", vec![])]),
        ]);
        assert_eq!(doc.plain_text(), "ab");
    }
}
