//! Configuration tree
//!
//! Nodes live in an arena owned by [`ConfigTree`] and are addressed by
//! [`NodeId`]. Children are kept as id lists in source order and the parent
//! link is an optional id, so the tree has no reference cycles.
//!
//! [`ConfigNode`] is a borrowed view of one node and carries the accessors.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use thiserror::Error;

/// Index of a node inside its [`ConfigTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in creation order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Errors from building a tree by hand
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("parent {0:?} is not a node of this tree")]
    UnknownParent(NodeId),

    #[error("node name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    name: Option<String>,
    content: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    line: Option<usize>,
}

/// An httpd configuration tree
///
/// Equality compares shape: names, contents, line numbers and child order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTree {
    nodes: Vec<NodeData>,
    cursor: NodeId,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTree {
    /// Create a tree holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                name: None,
                content: None,
                parent: None,
                children: Vec::new(),
                line: None,
            }],
            cursor: NodeId::ROOT,
        }
    }

    /// Create a node and append it to `parent`'s children
    pub fn create_child(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        parent: NodeId,
    ) -> Result<NodeId, NodeError> {
        self.insert(name.into(), content.into(), parent, None)
    }

    pub(crate) fn insert(
        &mut self,
        name: String,
        content: String,
        parent: NodeId,
        line: Option<usize>,
    ) -> Result<NodeId, NodeError> {
        if name.is_empty() {
            return Err(NodeError::EmptyName);
        }
        if parent.0 >= self.nodes.len() {
            return Err(NodeError::UnknownParent(parent));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            name: Some(name),
            content: Some(content),
            parent: Some(parent),
            children: Vec::new(),
            line,
        });
        self.nodes[parent.0].children.push(id);

        Ok(id)
    }

    pub(crate) fn parent_id(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    pub(crate) fn set_cursor(&mut self, cursor: NodeId) {
        self.cursor = cursor;
    }

    /// The root node
    pub fn root(&self) -> ConfigNode<'_> {
        ConfigNode { tree: self, id: NodeId::ROOT }
    }

    /// Look up a node by id
    pub fn get(&self, id: NodeId) -> Option<ConfigNode<'_>> {
        (id.0 < self.nodes.len()).then_some(ConfigNode { tree: self, id })
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Every non-root node in depth-first source order
    pub fn descendants(&self) -> Descendants<'_> {
        self.root().descendants()
    }

    /// The innermost section left open when the input ended
    ///
    /// `None` when every section was closed.
    pub fn unclosed_section(&self) -> Option<ConfigNode<'_>> {
        if self.cursor == NodeId::ROOT {
            None
        } else {
            self.get(self.cursor)
        }
    }
}

/// A borrowed view of one node in a [`ConfigTree`]
#[derive(Clone, Copy)]
pub struct ConfigNode<'a> {
    tree: &'a ConfigTree,
    id: NodeId,
}

impl<'a> ConfigNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Directive or section name; `None` for the root
    pub fn name(&self) -> Option<&'a str> {
        self.data().name.as_deref()
    }

    /// Directive value or section parameter; `None` for the root
    pub fn content(&self) -> Option<&'a str> {
        self.data().content.as_deref()
    }

    pub fn parent(&self) -> Option<ConfigNode<'a>> {
        self.data().parent.map(|id| ConfigNode { tree: self.tree, id })
    }

    /// Children in source order
    pub fn children(&self) -> Children<'a> {
        Children {
            tree: self.tree,
            ids: self.data().children.iter(),
        }
    }

    pub fn child_ids(&self) -> &'a [NodeId] {
        &self.data().children
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    /// 1-based source line this node was parsed from
    pub fn line(&self) -> Option<usize> {
        self.data().line
    }

    /// Number of parent links between this node and the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.data().parent;
        while let Some(id) = current {
            depth += 1;
            current = self.tree.nodes[id.0].parent;
        }
        depth
    }

    /// Children named `name`, compared ASCII case-insensitively
    pub fn find<'q>(self, name: &'q str) -> impl Iterator<Item = ConfigNode<'a>> + use<'a, 'q> {
        self.children()
            .filter(move |child| child.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// All nodes below this one, depth-first in source order
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            tree: self.tree,
            stack: self.data().children.iter().rev().copied().collect(),
        }
    }
}

impl fmt::Display for ConfigNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigNode {{name={}, content={}, childNodeCount={}}}",
            self.name().unwrap_or("null"),
            self.content().unwrap_or("null"),
            self.child_count()
        )
    }
}

impl fmt::Debug for ConfigNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigNode")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("content", &self.content())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a ConfigTree,
    ids: std::slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = ConfigNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| ConfigNode { tree: self.tree, id })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&id| ConfigNode { tree: self.tree, id })
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Depth-first pre-order walk
pub struct Descendants<'a> {
    tree: &'a ConfigTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = ConfigNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[id.0].children.iter().rev().copied());
        Some(ConfigNode { tree: self.tree, id })
    }
}

impl Serialize for ConfigNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct ChildList<'a>(ConfigNode<'a>);

        impl Serialize for ChildList<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_seq(self.0.children())
            }
        }

        let mut state = serializer.serialize_struct("ConfigNode", 4)?;
        state.serialize_field("name", &self.name())?;
        state.serialize_field("content", &self.content())?;
        state.serialize_field("line", &self.line())?;
        state.serialize_field("children", &ChildList(*self))?;
        state.end()
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_has_no_name_content_or_parent() {
        let tree = ConfigTree::new();
        let root = tree.root();
        assert_eq!(root.name(), None);
        assert_eq!(root.content(), None);
        assert!(root.parent().is_none());
        assert!(root.is_root());
        assert_eq!(root.line(), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_create_child() {
        let mut tree = ConfigTree::new();
        let child = tree.create_child("name", "content", NodeId::ROOT).unwrap();

        let node = tree.get(child).unwrap();
        assert_eq!(node.name(), Some("name"));
        assert_eq!(node.content(), Some("content"));
        assert_eq!(node.parent().unwrap().id(), NodeId::ROOT);
        assert!(!node.is_root());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_child_with_empty_content() {
        let mut tree = ConfigTree::new();
        let child = tree.create_child("IfModule", "", NodeId::ROOT).unwrap();
        assert_eq!(tree.get(child).unwrap().content(), Some(""));
    }

    #[test]
    fn test_create_child_with_empty_name_fails() {
        let mut tree = ConfigTree::new();
        let err = tree.create_child("", "content", NodeId::ROOT).unwrap_err();
        assert_eq!(err, NodeError::EmptyName);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_create_child_with_unknown_parent_fails() {
        let mut other = ConfigTree::new();
        let a = other.create_child("a", "1", NodeId::ROOT).unwrap();
        let b = other.create_child("b", "2", a).unwrap();

        let mut tree = ConfigTree::new();
        let err = tree.create_child("name", "content", b).unwrap_err();
        assert_eq!(err, NodeError::UnknownParent(b));
        assert_eq!(tree.root().child_count(), 0);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut tree = ConfigTree::new();
        for name in ["first", "second", "third"] {
            tree.create_child(name, "x", NodeId::ROOT).unwrap();
        }

        let names: Vec<_> = tree.root().children().filter_map(|c| c.name()).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(tree.root().children().len(), 3);
        assert_eq!(tree.root().child_ids().len(), 3);
    }

    #[test]
    fn test_to_string_root() {
        let mut tree = ConfigTree::new();
        tree.create_child("child1", "content1", NodeId::ROOT).unwrap();
        tree.create_child("child2", "content2", NodeId::ROOT).unwrap();
        tree.create_child("child3", "content3", NodeId::ROOT).unwrap();

        assert_eq!(
            tree.root().to_string(),
            "ConfigNode {name=null, content=null, childNodeCount=3}"
        );
    }

    #[test]
    fn test_to_string_child() {
        let mut tree = ConfigTree::new();
        let child = tree.create_child("child1", "content1", NodeId::ROOT).unwrap();
        tree.create_child("child2", "content2", child).unwrap();
        tree.create_child("child3", "content3", child).unwrap();

        assert_eq!(
            tree.get(child).unwrap().to_string(),
            "ConfigNode {name=child1, content=content1, childNodeCount=2}"
        );
    }

    #[test]
    fn test_depth_and_descendants() {
        let mut tree = ConfigTree::new();
        let vhost = tree.create_child("VirtualHost", "*", NodeId::ROOT).unwrap();
        let dir = tree.create_child("Directory", "/www", vhost).unwrap();
        tree.create_child("Order", "Deny,Allow", dir).unwrap();
        tree.create_child("ServerName", "example.com", vhost).unwrap();
        tree.create_child("Listen", "80", NodeId::ROOT).unwrap();

        let walk: Vec<_> = tree
            .descendants()
            .map(|n| (n.name().unwrap(), n.depth()))
            .collect();
        assert_eq!(
            walk,
            [
                ("VirtualHost", 1),
                ("Directory", 2),
                ("Order", 3),
                ("ServerName", 2),
                ("Listen", 1),
            ]
        );
        assert_eq!(tree.root().depth(), 0);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let mut tree = ConfigTree::new();
        tree.create_child("ServerName", "a.example.com", NodeId::ROOT).unwrap();
        tree.create_child("DocumentRoot", "/www", NodeId::ROOT).unwrap();
        tree.create_child("servername", "b.example.com", NodeId::ROOT).unwrap();

        let found: Vec<_> = tree.root().find("SERVERNAME").filter_map(|n| n.content()).collect();
        assert_eq!(found, ["a.example.com", "b.example.com"]);
    }

    #[test]
    fn test_find_with_short_lived_query() {
        let mut tree = ConfigTree::new();
        tree.create_child("Listen", "80", NodeId::ROOT).unwrap();
        tree.create_child("Listen", "443", NodeId::ROOT).unwrap();

        let root = tree.root();
        let ports: Vec<&str> = {
            let query = format!("{}EN", "LIST");
            root.find(&query).filter_map(|n| n.content()).collect()
        };
        assert_eq!(ports, ["80", "443"]);
    }

    #[test]
    fn test_serialize_json() {
        let mut tree = ConfigTree::new();
        let vhost = tree.create_child("VirtualHost", "*", NodeId::ROOT).unwrap();
        tree.create_child("ServerName", "example.com", vhost).unwrap();

        let value = serde_json::to_value(&tree).unwrap();
        assert!(value["name"].is_null());
        assert_eq!(value["children"][0]["name"], "VirtualHost");
        assert_eq!(value["children"][0]["children"][0]["content"], "example.com");
        assert_eq!(
            value["children"][0]["children"][0]["children"]
                .as_array()
                .unwrap()
                .len(),
            0
        );
    }

    #[test]
    fn test_new_tree_has_no_unclosed_section() {
        let tree = ConfigTree::new();
        assert!(tree.unclosed_section().is_none());
    }
}
