//! Publishable data model: items, documents, and document trees.
//!
//! These types mirror what the surrounding requirements tool hands to the
//! publisher. Link data (`links`, `child_links`) arrives pre-resolved; the
//! publisher never validates or rewrites it.
//!
//! A tree is loaded from a JSON publishing manifest:
//!
//! ```json
//! {
//!   "documents": [
//!     {
//!       "prefix": "REQ",
//!       "items": [
//!         { "id": "REQ001", "level": "1.0", "heading": true, "text": "Overview" },
//!         { "id": "REQ002", "level": "1.1", "text": "The system shall...",
//!           "ref": "main.rs", "links": ["SYS001"], "child_links": ["TST001"] }
//!       ],
//!       "children": [ { "documents": [ { "prefix": "TST", "items": [] } ] } ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid level '{0}': expected dot-separated numbers like 1.2")]
    InvalidLevel(String),
}

/// Dotted outline position of an item (`1`, `1.2`, `2.3.1`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Level(Vec<u32>);

impl Level {
    pub fn parts(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for Level {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ModelError::InvalidLevel(s.to_string()))?;
        Ok(Level(parts))
    }
}

impl TryFrom<String> for Level {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
            .join(".");
        // `pad` so width/alignment specifiers work (`{:<8}`)
        f.pad(&joined)
    }
}

/// A single unit of a document: a heading or a normative statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub level: Level,
    /// Headings render only their title; body, reference and links are hidden.
    #[serde(default)]
    pub heading: bool,
    #[serde(default)]
    pub text: String,
    /// External reference: text to look for in the project's files.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Parent item ids, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// Child item ids, in order. Populated by the surrounding tool.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_links: Vec<String>,
    /// The item's own source file, excluded from reference lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Item {
    /// Display title: the first non-empty line of a heading's text, otherwise the id.
    pub fn title(&self) -> &str {
        if self.heading {
            if let Some(line) = self.text.lines().map(str::trim).find(|l| !l.is_empty()) {
                return line;
            }
        }
        &self.id
    }

    /// The reference, if one is set and non-blank.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.trim().is_empty())
    }
}

/// An ordered sequence of items sharing a prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub prefix: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Tree>,
}

/// An ordered collection of documents, possibly nested through `Document::children`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Tree {
    /// Load a tree from a JSON publishing manifest.
    ///
    /// Items without a `path` get the manifest's, so reference lookup never
    /// matches the manifest's own `ref` entries.
    pub fn from_json_file(path: &Path) -> Result<Tree, ModelError> {
        let content = fs::read_to_string(path)?;
        let mut tree: Tree = serde_json::from_str(&content)?;
        tree.default_item_paths(path);
        Ok(tree)
    }

    fn default_item_paths(&mut self, path: &Path) {
        for document in &mut self.documents {
            for item in document.items.iter_mut().filter(|i| i.path.is_none()) {
                item.path = Some(path.to_path_buf());
            }
            for child in &mut document.children {
                child.default_item_paths(path);
            }
        }
    }

    /// Every document, depth-first: each document before its children, siblings in order.
    pub fn walk(&self) -> Vec<&Document> {
        let mut documents = Vec::new();
        walk_recursive(self, &mut documents);
        documents
    }
}

fn walk_recursive<'a>(tree: &'a Tree, out: &mut Vec<&'a Document>) {
    for document in &tree.documents {
        out.push(document);
        for child in &document.children {
            walk_recursive(child, out);
        }
    }
}

/// Anything the publisher can render.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Item(&'a Item),
    Document(&'a Document),
    Tree(&'a Tree),
}

impl<'a> Target<'a> {
    /// Items in outline order. Trees yield every document's items in `Tree::walk` order.
    pub fn items(&self) -> Box<dyn Iterator<Item = &'a Item> + 'a> {
        match *self {
            Target::Item(item) => Box::new(std::iter::once(item)),
            Target::Document(document) => Box::new(document.items.iter()),
            Target::Tree(tree) => Box::new(tree.walk().into_iter().flat_map(|d| d.items.iter())),
        }
    }

    /// Documents and trees render as standalone pages; single items render bare.
    pub fn is_collection(&self) -> bool {
        !matches!(self, Target::Item(_))
    }

    pub fn title(&self) -> &'a str {
        match *self {
            Target::Item(item) => &item.id,
            Target::Document(document) => &document.prefix,
            Target::Tree(_) => "Documents",
        }
    }
}

impl<'a> From<&'a Item> for Target<'a> {
    fn from(item: &'a Item) -> Self {
        Target::Item(item)
    }
}

impl<'a> From<&'a Document> for Target<'a> {
    fn from(document: &'a Document) -> Self {
        Target::Document(document)
    }
}

impl<'a> From<&'a Tree> for Target<'a> {
    fn from(tree: &'a Tree) -> Self {
        Target::Tree(tree)
    }
}
