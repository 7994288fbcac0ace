//! Markdown section-tree builder.
//!
//! Streams raw lines of a Markdown document and builds a [`DocumentTree`] of
//! heading-delimited sections holding typed content blocks. Only headings,
//! fenced code blocks, pipe tables and plain lines are recognized; every
//! other construct degrades to plain text, so building never fails.

mod line;

use tracing::{debug, instrument};

use mdlex_shared::{Block, DocumentTree, LocationTag, NodeId};

use crate::line::{CLOSING_FENCE, LineKind, classify, strip_terminator};

pub use crate::line::heading_level;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Block currently accepting more lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenBlock {
    None,
    Code(LocationTag),
    Table(LocationTag),
}

/// Incremental tree builder fed one raw line at a time.
///
/// Every plain-text block is reported back from [`push_line`](Self::push_line)
/// as soon as it is created, so callers can index it while the rest of the
/// document is still streaming in.
#[derive(Debug)]
pub struct DocumentBuilder {
    tree: DocumentTree,
    current: NodeId,
    open: OpenBlock,
    seen_heading: bool,
    line_count: usize,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            tree: DocumentTree::new(),
            current: NodeId::ROOT,
            open: OpenBlock::None,
            seen_heading: false,
            line_count: 0,
        }
    }

    /// The tree built so far.
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Consume one raw line, terminator included.
    ///
    /// Returns the location of the plain-text block this line created, if any.
    pub fn push_line(&mut self, raw: &str) -> Option<LocationTag> {
        self.line_count += 1;
        let line = strip_terminator(raw);

        // Inside a code block every line is content, blank or not.
        if let OpenBlock::Code(location) = self.open {
            self.append_raw(location, raw);
            if line == CLOSING_FENCE {
                self.open = OpenBlock::None;
            }
            return None;
        }

        match classify(line) {
            LineKind::Blank => None,
            LineKind::Heading { level } => {
                self.start_section(line, level);
                None
            }
            LineKind::FenceOpen => {
                let location = self.tree.push_block(self.current, Block::code_block(raw));
                self.open = OpenBlock::Code(location);
                None
            }
            LineKind::TableRow => {
                match self.open {
                    OpenBlock::Table(location) => self.append_raw(location, raw),
                    _ => {
                        let location = self.tree.push_block(self.current, Block::table(raw));
                        self.open = OpenBlock::Table(location);
                    }
                }
                None
            }
            LineKind::Text => {
                self.open = OpenBlock::None;
                Some(self.tree.push_block(self.current, Block::plain_text(line)))
            }
        }
    }

    /// Finish the build and hand over the tree.
    pub fn finish(self) -> DocumentTree {
        debug!(
            lines = self.line_count,
            nodes = self.tree.len(),
            blocks = self.tree.locations().count(),
            unterminated_code = matches!(self.open, OpenBlock::Code(_)),
            "document tree built"
        );
        self.tree
    }

    fn append_raw(&mut self, location: LocationTag, raw: &str) {
        if let Some(block) = self.tree.block_mut(location) {
            block.push_raw(raw);
        }
    }

    /// Attach a heading line to the tree and make it the current section.
    fn start_section(&mut self, heading: &str, level: usize) {
        self.open = OpenBlock::None;

        if !self.seen_heading {
            self.seen_heading = true;
            self.tree.set_root_heading(heading, level);
            self.current = NodeId::ROOT;
            return;
        }

        let current_level = self.tree.node(self.current).map_or(0, |n| n.level);
        let parent = if level > current_level {
            self.current
        } else {
            // Walk up one ancestor per level of difference, then attach next
            // to the node reached. Headings at the root's own level hang off
            // the root, which doubles as the document container.
            let mut anchor = self.current;
            for _ in 0..(current_level - level) {
                match self.tree.parent(anchor) {
                    Some(p) => anchor = p,
                    None => break,
                }
            }
            self.tree.parent(anchor).unwrap_or(NodeId::ROOT)
        };

        self.current = self.tree.add_child(parent, heading, level);
    }
}

// ---------------------------------------------------------------------------
// Convenience entry points
// ---------------------------------------------------------------------------

/// Split text into raw lines, keeping each line's terminator.
pub fn raw_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
}

/// Build the section tree of a whole document.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse_document(text: &str) -> DocumentTree {
    let mut builder = DocumentBuilder::new();
    for raw in raw_lines(text) {
        builder.push_line(raw);
    }
    builder.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mdlex_shared::BlockKind;

    fn node(tree: &DocumentTree, id: usize) -> &mdlex_shared::Node {
        tree.node(NodeId(id)).expect("node exists")
    }

    #[test]
    fn first_heading_becomes_root() {
        let tree = parse_document("# Root\n## Child\nThe quick fox jumps.\n# Sibling\n");

        assert_eq!(tree.root().heading, "# Root");
        assert_eq!(tree.root().level, 1);
        assert_eq!(tree.len(), 3);

        let child = node(&tree, 1);
        assert_eq!(child.heading, "## Child");
        assert_eq!(child.level, 2);
        assert_eq!(child.parent, Some(NodeId::ROOT));
        assert_eq!(child.blocks, vec![Block::plain_text("The quick fox jumps.")]);

        let sibling = node(&tree, 2);
        assert_eq!(sibling.heading, "# Sibling");
        assert_eq!(sibling.level, 1);
        assert_eq!(sibling.parent, Some(NodeId::ROOT));
        assert_eq!(tree.root().children, vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn deeper_headings_nest_and_shallower_walk_up() {
        let doc = "# Guide\n## Naming\n### Classes\n### Methods\n## Formatting\n#### Braces\n";
        let tree = parse_document(doc);

        assert_eq!(node(&tree, 1).parent, Some(NodeId(0))); // Naming
        assert_eq!(node(&tree, 2).parent, Some(NodeId(1))); // Classes
        assert_eq!(node(&tree, 3).parent, Some(NodeId(1))); // Methods
        assert_eq!(node(&tree, 4).parent, Some(NodeId(0))); // Formatting
        assert_eq!(node(&tree, 5).parent, Some(NodeId(4))); // Braces
        assert!(tree.check_links().is_ok());
    }

    #[test]
    fn skipped_level_attaches_below_nearest_walked_ancestor() {
        let tree = parse_document("# A\n### B\n## C\n");
        // One step up from B reaches A (the root), so C hangs off the root.
        assert_eq!(node(&tree, 2).heading, "## C");
        assert_eq!(node(&tree, 2).parent, Some(NodeId::ROOT));
    }

    #[test]
    fn heading_level_matches_markers_for_every_heading() {
        let doc = "# a\n## b\n### c\n## d\n#### e\n# f\n";
        let tree = parse_document(doc);
        for (_, n) in tree.iter() {
            assert_eq!(n.level, heading_level(&n.heading));
        }
    }

    #[test]
    fn content_before_first_heading_belongs_to_root() {
        let tree = parse_document("Preamble line.\n# Title\nBody.\n");
        assert_eq!(tree.root().heading, "# Title");
        assert_eq!(tree.root().blocks.len(), 2);
        assert_eq!(tree.root().blocks[0].content, "Preamble line.");
    }

    #[test]
    fn code_block_keeps_fences_and_blank_lines() {
        let doc = "# Code\n```java\nint x = 1;\n\n# not a heading\n```\nAfter.\n";
        let tree = parse_document(doc);
        let blocks = &tree.root().blocks;

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::CodeBlock);
        assert_eq!(
            blocks[0].content,
            "```java\nint x = 1;\n\n# not a heading\n```\n"
        );
        assert_eq!(blocks[1], Block::plain_text("After."));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn unterminated_code_block_swallows_rest_of_document() {
        let tree = parse_document("# T\n```sh\necho hi\n## Still code\n");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().blocks[0].content, "```sh\necho hi\n## Still code\n");
    }

    #[test]
    fn consecutive_table_rows_form_one_block() {
        let tree = parse_document("# T\n|a|b|\n|1|2|\n");
        assert_eq!(tree.root().blocks, vec![Block {
            kind: BlockKind::Table,
            content: "|a|b|\n|1|2|\n".into(),
        }]);
    }

    #[test]
    fn blank_lines_do_not_split_tables() {
        let tree = parse_document("# T\n|a|b|\n\n|1|2|\n");
        assert_eq!(tree.root().blocks.len(), 1);
        assert_eq!(tree.root().blocks[0].content, "|a|b|\n|1|2|\n");
    }

    #[test]
    fn text_line_ends_table() {
        let tree = parse_document("# T\n|a|b|\nbetween\n|1|2|\n");
        let kinds: Vec<_> = tree.root().blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Table, BlockKind::PlainText, BlockKind::Table]
        );
    }

    #[test]
    fn heading_closes_open_table() {
        let tree = parse_document("# T\n|a|b|\n## U\n|1|2|\n");
        assert_eq!(tree.root().blocks.len(), 1);
        assert_eq!(node(&tree, 1).blocks.len(), 1);
    }

    #[test]
    fn crlf_terminators_are_preserved_in_raw_blocks() {
        let tree = parse_document("# T\r\n|a|b|\r\n|1|2|\r\ntext  \r\n");
        assert_eq!(tree.root().heading, "# T");
        assert_eq!(tree.root().blocks[0].content, "|a|b|\r\n|1|2|\r\n");
        assert_eq!(tree.root().blocks[1].content, "text");
    }

    #[test]
    fn bare_fence_outside_code_is_plain_text() {
        let tree = parse_document("# T\n```\ncode?\n```\n");
        let kinds: Vec<_> = tree.root().blocks.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BlockKind::PlainText; 3]);
    }

    #[test]
    fn push_line_reports_only_plain_text() {
        let mut builder = DocumentBuilder::new();
        assert_eq!(builder.push_line("# T\n"), None);
        assert_eq!(builder.push_line("\n"), None);
        assert_eq!(builder.push_line("|a|\n"), None);
        assert_eq!(
            builder.push_line("Some prose.\n"),
            Some(LocationTag::new(NodeId::ROOT, 1))
        );
        assert_eq!(builder.push_line("```rust\n"), None);
        assert_eq!(builder.push_line("let a = 1;\n"), None);
    }

    #[test]
    fn every_block_belongs_to_exactly_one_node() {
        let doc = "# A\nx\n## B\ny\n|1|\n### C\n```c\nz\n```\n## D\nw\n";
        let tree = parse_document(doc);
        let total: usize = tree.iter().map(|(_, n)| n.blocks.len()).sum();
        assert_eq!(total, tree.locations().count());
        assert_eq!(total, 5);
    }

    #[test]
    fn empty_document_yields_untitled_root() {
        let tree = parse_document("");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().heading, "");
        assert_eq!(tree.root().level, 0);
    }
}
