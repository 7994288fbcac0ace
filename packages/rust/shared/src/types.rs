//! Core domain types: the document tree and the posting dictionary.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Index of a node inside a [`DocumentTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document root; always the first node of the arena.
    pub const ROOT: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// Kind of a content block. Declaration order is the canonical sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    PlainText,
    CodeBlock,
    Table,
}

/// One unit of content inside a node.
///
/// Plain text holds a single trimmed line. Code blocks and tables hold their
/// raw source lines, line terminators included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub content: String,
}

impl Block {
    /// A plain-text block holding `line` with surrounding whitespace removed.
    pub fn plain_text(line: &str) -> Self {
        Self {
            kind: BlockKind::PlainText,
            content: line.trim().to_string(),
        }
    }

    /// A code block opened by its fence line.
    pub fn code_block(fence_line: &str) -> Self {
        Self {
            kind: BlockKind::CodeBlock,
            content: fence_line.to_string(),
        }
    }

    /// A table opened by its first row.
    pub fn table(row: &str) -> Self {
        Self {
            kind: BlockKind::Table,
            content: row.to_string(),
        }
    }

    /// Append a raw line (with its terminator) to a code block or table.
    pub fn push_raw(&mut self, raw_line: &str) {
        self.content.push_str(raw_line);
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One document section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Full heading line, markers included (e.g. `## Naming`).
    pub heading: String,
    /// Number of leading `#` markers; 0 only for a root without a heading.
    pub level: usize,
    /// Content blocks in document order.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Enclosing section, `None` for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    /// Nested sections in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(heading: String, level: usize, parent: Option<NodeId>) -> Self {
        Self {
            heading,
            level,
            blocks: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        for block in &self.blocks {
            writeln!(f, "{block}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LocationTag
// ---------------------------------------------------------------------------

/// A (node, block) pair identifying where a keyword occurs.
///
/// The derived ordering is document order. The canonical ordering used for
/// posting lists depends on node and block contents and is provided by
/// [`DocumentTree::compare_locations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationTag {
    pub node: NodeId,
    pub block: usize,
}

impl LocationTag {
    pub fn new(node: NodeId, block: usize) -> Self {
        Self { node, block }
    }
}

/// Canonical sort and dedup key of a location: heading, block kind, block content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalKey<'a> {
    pub heading: &'a str,
    pub kind: BlockKind,
    pub content: &'a str,
}

// ---------------------------------------------------------------------------
// DocumentTree
// ---------------------------------------------------------------------------

/// Arena-backed section tree. The arena owns every node; links are [`NodeId`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
    nodes: Vec<Node>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// A tree holding only an untitled root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(String::new(), 0, None)],
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn block(&self, location: LocationTag) -> Option<&Block> {
        self.node(location.node)
            .and_then(|n| n.blocks.get(location.block))
    }

    pub fn block_mut(&mut self, location: LocationTag) -> Option<&mut Block> {
        self.nodes
            .get_mut(location.node.0)
            .and_then(|n| n.blocks.get_mut(location.block))
    }

    /// Iterate nodes in creation (document) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Iterate every block location in document order.
    pub fn locations(&self) -> impl Iterator<Item = LocationTag> + '_ {
        self.iter().flat_map(|(id, node)| {
            (0..node.blocks.len()).map(move |block| LocationTag::new(id, block))
        })
    }

    /// Give the root its heading (used for the first heading of a document).
    pub fn set_root_heading(&mut self, heading: impl Into<String>, level: usize) {
        let root = &mut self.nodes[NodeId::ROOT.0];
        root.heading = heading.into();
        root.level = level;
    }

    /// Create a node and attach it as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn add_child(&mut self, parent: NodeId, heading: impl Into<String>, level: usize) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "unknown parent node {parent}");
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(heading.into(), level, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append a block to `node` and return its location.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a node of this tree.
    pub fn push_block(&mut self, node: NodeId, block: Block) -> LocationTag {
        let blocks = &mut self.nodes[node.0].blocks;
        blocks.push(block);
        LocationTag::new(node, blocks.len() - 1)
    }

    /// Canonical key of a location, or `None` when it does not exist.
    pub fn canonical_key(&self, location: LocationTag) -> Option<CanonicalKey<'_>> {
        let node = self.node(location.node)?;
        let block = node.blocks.get(location.block)?;
        Some(CanonicalKey {
            heading: &node.heading,
            kind: block.kind,
            content: &block.content,
        })
    }

    /// Canonical order: heading text, then block kind, then block content.
    ///
    /// Locations missing from the tree sort after every valid location.
    pub fn compare_locations(&self, a: LocationTag, b: LocationTag) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        match (self.canonical_key(a), self.canonical_key(b)) {
            (Some(ka), Some(kb)) => ka.cmp(&kb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(&b),
        }
    }

    /// Display text of a location: heading line, newline, block content.
    pub fn describe(&self, location: LocationTag) -> String {
        match (self.node(location.node), self.block(location)) {
            (Some(node), Some(block)) => format!("{}\n{}", node.heading, block),
            _ => String::new(),
        }
    }

    /// Depth of a node below the root (root = 0).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            depth += 1;
            cursor = self.parent(p);
        }
        depth
    }

    /// Nodes of the subtree at `id` in depth-first pre-order.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Check the arena links: every child points back to its parent, every
    /// non-root node is listed exactly once by its parent, and no node is
    /// its own ancestor.
    pub fn check_links(&self) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no root node".into());
        }
        if self.root().parent.is_some() {
            return Err("root node has a parent".into());
        }

        let mut seen = vec![false; self.nodes.len()];
        seen[NodeId::ROOT.0] = true;
        for (id, node) in self.iter() {
            for &child in &node.children {
                let Some(child_node) = self.node(child) else {
                    return Err(format!("node {id} lists missing child {child}"));
                };
                if child_node.parent != Some(id) {
                    return Err(format!("child {child} does not point back to {id}"));
                }
                if std::mem::replace(&mut seen[child.0], true) {
                    return Err(format!("node {child} is attached more than once"));
                }
            }
        }
        if let Some(orphan) = seen.iter().position(|s| !s) {
            return Err(format!("node #{orphan} is not attached to the tree"));
        }
        // Every node is listed once, so a detached cycle is the only way to
        // fall short of the full arena here.
        if self.preorder(NodeId::ROOT).len() != self.nodes.len() {
            return Err("tree contains a cycle detached from the root".into());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

/// Frozen posting dictionary: key → locations in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    postings: BTreeMap<String, Vec<LocationTag>>,
}

impl Dictionary {
    pub fn get(&self, key: &str) -> Option<&[LocationTag]> {
        self.postings.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.postings.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LocationTag])> {
        self.postings
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Total number of postings across all keys.
    pub fn posting_count(&self) -> usize {
        self.postings.values().map(Vec::len).sum()
    }
}

impl From<BTreeMap<String, Vec<LocationTag>>> for Dictionary {
    fn from(postings: BTreeMap<String, Vec<LocationTag>>) -> Self {
        Self { postings }
    }
}

// ---------------------------------------------------------------------------
// SearchIndex
// ---------------------------------------------------------------------------

/// A built index: the document tree paired with its posting dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub tree: DocumentTree,
    pub dictionary: Dictionary,
}

impl SearchIndex {
    /// Check that the tree is well linked and every posting resolves to a block
    /// in canonical order.
    pub fn check(&self) -> std::result::Result<(), String> {
        self.tree.check_links()?;
        for (key, locations) in self.dictionary.iter() {
            if locations.is_empty() {
                return Err(format!("key {key:?} has an empty posting list"));
            }
            if let Some(bad) = locations.iter().find(|l| self.tree.block(**l).is_none()) {
                return Err(format!(
                    "key {key:?} references missing block {} of node {}",
                    bad.block, bad.node
                ));
            }
            let ordered = locations
                .windows(2)
                .all(|w| self.tree.compare_locations(w[0], w[1]) == Ordering::Less);
            if !ordered {
                return Err(format!("postings of key {key:?} are not in canonical order"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> DocumentTree {
        let mut tree = DocumentTree::new();
        tree.set_root_heading("# Guide", 1);
        let naming = tree.add_child(NodeId::ROOT, "## Naming", 2);
        let errors = tree.add_child(NodeId::ROOT, "## Errors", 2);
        tree.push_block(naming, Block::plain_text("  Use camel case.  "));
        tree.push_block(errors, Block::plain_text("Never swallow exceptions."));
        tree.push_block(errors, Block::code_block("```java\n"));
        tree
    }

    #[test]
    fn plain_text_is_trimmed() {
        let tree = sample_tree();
        let block = tree.block(LocationTag::new(NodeId(1), 0)).unwrap();
        assert_eq!(block.content, "Use camel case.");
        assert_eq!(block.kind, BlockKind::PlainText);
    }

    #[test]
    fn canonical_order_uses_heading_then_kind_then_content() {
        let tree = sample_tree();
        let naming = LocationTag::new(NodeId(1), 0);
        let errors_text = LocationTag::new(NodeId(2), 0);
        let errors_code = LocationTag::new(NodeId(2), 1);

        // "## Errors" < "## Naming" even though Naming comes first in the document.
        assert_eq!(tree.compare_locations(errors_text, naming), Ordering::Less);
        // Plain text sorts before code blocks under the same heading.
        assert_eq!(tree.compare_locations(errors_text, errors_code), Ordering::Less);
        assert_eq!(tree.compare_locations(naming, naming), Ordering::Equal);
    }

    #[test]
    fn describe_joins_heading_and_block() {
        let tree = sample_tree();
        assert_eq!(
            tree.describe(LocationTag::new(NodeId(2), 0)),
            "## Errors\nNever swallow exceptions."
        );
        assert_eq!(tree.describe(LocationTag::new(NodeId(9), 0)), "");
    }

    #[test]
    fn preorder_and_depth() {
        let mut tree = sample_tree();
        let deep = tree.add_child(NodeId(1), "### Constants", 3);
        assert_eq!(
            tree.preorder(NodeId::ROOT),
            vec![NodeId(0), NodeId(1), deep, NodeId(2)]
        );
        assert_eq!(tree.depth(deep), 2);
        assert_eq!(tree.depth(NodeId::ROOT), 0);
    }

    #[test]
    fn check_links_detects_broken_parent() {
        let tree = sample_tree();
        assert!(tree.check_links().is_ok());

        let json = serde_json::to_string(&tree).unwrap();
        let broken = json.replacen("\"parent\":0", "\"parent\":2", 1);
        let broken: DocumentTree = serde_json::from_str(&broken).unwrap();
        assert!(broken.check_links().is_err());
    }

    #[test]
    fn index_check_rejects_dangling_postings() {
        let tree = sample_tree();
        let mut postings = BTreeMap::new();
        postings.insert("case".to_string(), vec![LocationTag::new(NodeId(1), 0)]);
        let index = SearchIndex {
            tree: tree.clone(),
            dictionary: Dictionary::from(postings.clone()),
        };
        assert!(index.check().is_ok());

        postings.insert("ghost".to_string(), vec![LocationTag::new(NodeId(1), 7)]);
        let index = SearchIndex {
            tree,
            dictionary: Dictionary::from(postings),
        };
        assert!(index.check().unwrap_err().contains("ghost"));
    }

    #[test]
    fn node_display_lists_blocks() {
        let tree = sample_tree();
        let node = tree.node(NodeId(1)).unwrap();
        assert_eq!(node.to_string(), "## Naming\nUse camel case.\n");
    }
}
