//! Shared test fixtures for the reqpub test suite.
//!
//! Provides a small requirements model (headings, normative items, child
//! links, nested trees), a stub [`ReferenceLocator`], and helpers for turning
//! rendered lines into text.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let config = PublishConfig::default();
//! let locator = StubLocator::default();
//! let item = normative_item();
//! let text = join_lines(lines(Target::from(&item), ".txt", context(&config, false, &locator)));
//! assert!(text.contains("Links: sys4"));
//! ```

use crate::config::PublishConfig;
use crate::format::RenderContext;
use crate::model::{Document, Item, Tree};
use crate::publish::PublishError;
use crate::references::{RefLocation, ReferenceLocator};

// =========================================================================
// Items and documents
// =========================================================================

fn item(id: &str, level: &str) -> Item {
    Item {
        id: id.to_string(),
        level: level.parse().unwrap(),
        heading: false,
        text: String::new(),
        reference: None,
        links: Vec::new(),
        child_links: Vec::new(),
        path: None,
    }
}

/// `req3`: heading "Heading" at level 1.1.
pub fn heading_item() -> Item {
    Item {
        heading: true,
        text: "Heading".to_string(),
        ..item("req3", "1.1")
    }
}

/// `req4`: normative item at 1.2 with a reference and one parent link.
pub fn normative_item() -> Item {
    Item {
        text: "This shall...".to_string(),
        reference: Some("Doorstop.sublime-project".to_string()),
        links: vec!["sys4".to_string()],
        ..item("req4", "1.2")
    }
}

/// `req5`: normative item at 1.3 with a parent link and a child link.
pub fn child_linked_item() -> Item {
    Item {
        text: "Shall be tested.".to_string(),
        links: vec!["sys1".to_string()],
        child_links: vec!["tst1".to_string()],
        ..item("req5", "1.3")
    }
}

/// `REQ` containing heading, normative, and child-linked items in that order.
pub fn sample_document() -> Document {
    Document {
        prefix: "REQ".to_string(),
        items: vec![heading_item(), normative_item(), child_linked_item()],
        children: Vec::new(),
    }
}

/// A tree holding only [`sample_document`].
pub fn single_document_tree() -> Tree {
    Tree {
        documents: vec![sample_document()],
    }
}

/// `SYS` → (`REQ` → `TST`, `LLT`).
///
/// Walk order: SYS, REQ, TST, LLT. Items: sys1, req3, req4, tst1.
pub fn nested_tree() -> Tree {
    let tst = Document {
        prefix: "TST".to_string(),
        items: vec![Item {
            text: "Verify it.".to_string(),
            links: vec!["req5".to_string()],
            ..item("tst1", "1")
        }],
        children: Vec::new(),
    };
    let req = Document {
        prefix: "REQ".to_string(),
        items: vec![heading_item(), normative_item()],
        children: vec![Tree {
            documents: vec![tst],
        }],
    };
    let llt = Document {
        prefix: "LLT".to_string(),
        items: Vec::new(),
        children: Vec::new(),
    };
    let sys = Document {
        prefix: "SYS".to_string(),
        items: vec![Item {
            text: "The system.".to_string(),
            child_links: vec!["req4".to_string()],
            ..item("sys1", "1")
        }],
        children: vec![Tree {
            documents: vec![req, llt],
        }],
    };
    Tree {
        documents: vec![sys],
    }
}

// =========================================================================
// Reference locator stub
// =========================================================================

/// Resolves every reference to a fixed location, or to nothing.
pub struct StubLocator {
    location: Option<RefLocation>,
}

impl StubLocator {
    pub fn at(path: &str, line: Option<usize>) -> Self {
        Self {
            location: Some(RefLocation {
                path: path.to_string(),
                line,
            }),
        }
    }

    /// Every lookup fails with `ReferenceNotFound`.
    pub fn missing() -> Self {
        Self { location: None }
    }
}

impl Default for StubLocator {
    /// Mirrors a reference that matched a project file by name.
    fn default() -> Self {
        Self::at("Doorstop.sublime-project", None)
    }
}

impl ReferenceLocator for StubLocator {
    fn locate(&self, item: &Item) -> Result<RefLocation, PublishError> {
        self.location
            .clone()
            .ok_or_else(|| PublishError::ReferenceNotFound {
                id: item.id.clone(),
                reference: item.reference.clone().unwrap_or_default(),
            })
    }
}

// =========================================================================
// Rendering helpers
// =========================================================================

pub fn context<'a>(
    config: &'a PublishConfig,
    linkify: bool,
    locator: &'a StubLocator,
) -> RenderContext<'a> {
    RenderContext {
        config,
        linkify,
        references: locator,
    }
}

/// Join rendered lines, each followed by a newline. Panics on a render error.
pub fn join_lines(lines: impl Iterator<Item = Result<String, PublishError>>) -> String {
    lines
        .map(|line| line.unwrap_or_else(|e| panic!("render failed: {e}")) + "\n")
        .collect()
}
