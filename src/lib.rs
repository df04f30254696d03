//! # reqpub
//!
//! Publishes requirement documents as plain text, Markdown, or HTML.
//!
//! An item is one unit of a requirements document: an id, an outline level,
//! heading or body text, an optional external reference, and links to parent
//! and child items. A document is an ordered list of items; a tree is an
//! ordered list of documents, each of which may carry child trees.
//!
//! # Pipeline
//!
//! ```text
//! Publisher::publish ─┬─ item/document → render::lines → one file
//!                     └─ tree → render::lines per document → one file each
//!                                                          → index.html
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`model`] | `Item`, `Document`, `Tree`, `Level`, and the `Target` union the publisher accepts |
//! | [`format`] | The closed set of output formats and one line grammar (`ItemRenderer`) per format |
//! | [`render`] | Lazy line sequences: format validation deferred to the first line |
//! | [`publish`] | Format inference, file/directory output, tree walking, the index page |
//! | [`references`] | Resolving an item's reference to a project file and line |
//! | [`naming`] | Output file names for documents inside a published tree |
//! | [`config`] | `reqpub.toml` loading, merging over defaults, validation |
//! | [`output`] | CLI summaries of what was published |
//!
//! # Design Decisions
//!
//! ## Explicit Configuration
//!
//! Whether references are resolved and whether child links are shown are
//! fields of [`config::PublishConfig`], passed into every render. Tests build
//! their own configs side by side instead of toggling shared state.
//!
//! ## Lazy Rendering, Eager Publishing
//!
//! [`render::lines`] defers every check until the sequence is consumed, so an
//! unknown format is reported by the first `next()`. [`publish::Publisher::publish`]
//! validates the format up front, before creating directories or files.
//!
//! ## Maud for HTML
//!
//! HTML is produced with [Maud](https://maud.lambda.xyz/): all interpolated ids,
//! titles, and file names are escaped automatically. Item bodies are Markdown
//! and are converted with `pulldown-cmark`.

pub mod config;
pub mod format;
pub mod model;
pub mod naming;
pub mod output;
pub mod publish;
pub mod references;
pub mod render;

pub use config::PublishConfig;
pub use format::Format;
pub use model::{Document, Item, Level, Target, Tree};
pub use publish::{PublishError, PublishOptions, PublishReport, Publisher, index};

#[cfg(test)]
pub(crate) mod test_helpers;
