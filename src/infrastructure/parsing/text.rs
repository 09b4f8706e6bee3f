//! Text-node level helpers for anchor-based extraction
//!
//! The portal's detail pages have no stable element structure; fields are
//! located by finding a literal label in the document text and reading what
//! follows. [`DocumentNodes`] captures every node in document order once and
//! supports the anchor-then-next lookups built on top of it.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};

/// Strip newlines, collapse interior whitespace runs to a single space and
/// trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `Some(value)` when the normalized text is non-empty.
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// Document-order snapshot of every node in a parsed page.
pub struct DocumentNodes<'a> {
    nodes: Vec<NodeRef<'a, Node>>,
}

impl<'a> DocumentNodes<'a> {
    pub fn new(html: &'a Html) -> Self {
        Self {
            nodes: html.tree.root().descendants().collect(),
        }
    }

    fn raw_text_at(&self, index: usize) -> Option<&'a str> {
        self.nodes[index].value().as_text().map(|t| &*t.text)
    }

    /// Position of the first text node whose raw content satisfies `pred`.
    pub fn find_text(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        (0..self.nodes.len()).find(|&i| self.raw_text_at(i).is_some_and(&pred))
    }

    /// Position of the first text node whose normalized content equals
    /// `label`.
    pub fn find_label(&self, label: &str) -> Option<usize> {
        self.find_text(|t| normalize(t) == label)
    }

    /// Normalized full text of the first element strictly after `index` in
    /// document order. This is how labelled values are read: the label is a
    /// text node and its value lives in the element that follows (a bold tag,
    /// a table cell), possibly with further markup nested inside.
    pub fn following_element_text(&self, index: usize) -> Option<String> {
        self.nodes[index + 1..]
            .iter()
            .find_map(|node| ElementRef::wrap(*node))
            .map(|el| cell_text(&el))
            .and_then(non_empty)
    }

    /// Non-empty normalized text nodes strictly after `index`, in document
    /// order.
    pub fn texts_after(&self, index: usize) -> impl Iterator<Item = String> + '_ {
        self.nodes[index + 1..]
            .iter()
            .filter_map(|node| node.value().as_text())
            .map(|t| normalize(&t.text))
            .filter(|s| !s.is_empty())
    }

    /// First `td` element strictly after `index` in document order. Header
    /// (`th`) cells never match, mirroring how the portal's applicant table
    /// is read.
    pub fn following_cell(&self, index: usize) -> Option<ElementRef<'a>> {
        self.nodes[index + 1..]
            .iter()
            .find_map(|node| ElementRef::wrap(*node).filter(|el| el.value().name() == "td"))
    }
}

/// All `td` siblings that follow `cell` within its row, in order.
pub fn sibling_cells<'a>(cell: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut cells = Vec::new();
    let mut node = cell.next_sibling();
    while let Some(current) = node {
        if let Some(el) = ElementRef::wrap(current) {
            if el.value().name() == "td" {
                cells.push(el);
            }
        }
        node = current.next_sibling();
    }
    cells
}

/// Normalized full text content of an element.
pub fn cell_text(cell: &ElementRef<'_>) -> String {
    normalize(&cell.text().collect::<String>())
}
