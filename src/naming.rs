//! Output file names for documents published as part of a tree.
//!
//! The publisher asks a [`DocumentNaming`] strategy for each document's file
//! name inside the output directory. The default, [`PrefixNaming`], uses the
//! document prefix plus the format's extension:
//!
//! - `REQ` as HTML → `REQ.html`
//! - `TST` as Markdown → `TST.md`
//!
//! Any `Fn(&Document, Format) -> String` closure is also a naming strategy.

use crate::format::Format;
use crate::model::Document;

pub trait DocumentNaming {
    /// File name (no directory) for `document` rendered as `format`.
    fn file_name(&self, document: &Document, format: Format) -> String;
}

/// `{prefix}{extension}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixNaming;

impl DocumentNaming for PrefixNaming {
    fn file_name(&self, document: &Document, format: Format) -> String {
        format!("{}{}", document.prefix, format.extension())
    }
}

impl<F> DocumentNaming for F
where
    F: Fn(&Document, Format) -> String,
{
    fn file_name(&self, document: &Document, format: Format) -> String {
        self(document, format)
    }
}
