//! Structured API responses.
//!
//! Filer APIs answer with a tree of named elements. Leaves carry text
//! content; inner nodes carry children. Lookups by name return the first
//! matching child, mirroring how the vendor SDK exposes results.

use serde::{Deserialize, Serialize};

/// One element of an API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTree {
    /// Element name
    pub name: String,
    /// Text content, for leaf elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Child elements, in response order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResponseTree>,
}

impl ResponseTree {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf element with text content.
    pub fn leaf(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
            children: Vec::new(),
        }
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: ResponseTree) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style leaf append.
    pub fn with_leaf(self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.with_child(Self::leaf(name, content))
    }

    /// Append a child element.
    pub fn push(&mut self, child: ResponseTree) {
        self.children.push(child);
    }

    /// First child with the given name.
    pub fn child(&self, key: &str) -> Option<&ResponseTree> {
        self.children.iter().find(|c| c.name == key)
    }

    /// All children, in response order.
    pub fn children(&self) -> &[ResponseTree] {
        &self.children
    }

    /// Text content of the named child, or `""` when absent.
    pub fn child_string(&self, key: &str) -> &str {
        self.child(key)
            .and_then(|c| c.content.as_deref())
            .unwrap_or("")
    }

    /// Text content of this element, or `""`.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResponseTree {
        ResponseTree::new("results").with_child(
            ResponseTree::new("qtrees")
                .with_child(
                    ResponseTree::new("qtree-info")
                        .with_leaf("qtree", "")
                        .with_leaf("volume", "vol1"),
                )
                .with_child(
                    ResponseTree::new("qtree-info")
                        .with_leaf("qtree", "q1")
                        .with_leaf("volume", "vol1"),
                ),
        )
    }

    #[test]
    fn test_child_lookup() {
        let tree = sample();
        let qtrees = tree.child("qtrees").unwrap();
        assert_eq!(qtrees.children().len(), 2);
        assert!(tree.child("volumes").is_none());
    }

    #[test]
    fn test_child_string_defaults_to_empty() {
        let tree = sample();
        let first = &tree.child("qtrees").unwrap().children()[0];
        assert_eq!(first.child_string("qtree"), "");
        assert_eq!(first.child_string("volume"), "vol1");
        assert_eq!(first.child_string("oplocks"), "");
    }

    #[test]
    fn test_json_shape() {
        let leaf = ResponseTree::leaf("volume", "vol1");
        let json = serde_json::to_string(&leaf).unwrap();
        assert_eq!(json, r#"{"name":"volume","content":"vol1"}"#);
    }
}
