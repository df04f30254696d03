//! Publishing documents and trees to disk.
//!
//! [`Publisher::publish`] is the entry point. It settles the output format
//! first (explicit, else the path's extension, else HTML), failing before any
//! filesystem work when the format is unknown. Then:
//!
//! - **Item or document**: the path is a file. Its parent directory is created
//!   if needed and the rendered lines are streamed into it.
//! - **Tree**: the path is a directory. Every document (nested ones included)
//!   is written to its own file, named by the [`DocumentNaming`] strategy, and
//!   [`index`] then lists everything publishable in that directory. Two
//!   documents whose names collide fail the publish before anything is
//!   written.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── index.html     # Links to every published file
//! ├── SYS.html
//! ├── REQ.html
//! └── TST.html
//! ```
//!
//! Writes are not transactional: a render error mid-document leaves the
//! partially written file behind.

use crate::config::PublishConfig;
use crate::format::{Format, RenderContext, STYLESHEET};
use crate::model::{Document, Target, Tree};
use crate::naming::{DocumentNaming, PrefixNaming};
use crate::references::{ProjectFiles, ReferenceLocator};
use crate::render::{self, Lines};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the generated index page.
pub const INDEX: &str = "index.html";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Unknown format: '{0}' (expected .txt, .md, or .html)")]
    UnknownFormat(String),
    #[error("Reference '{reference}' of item {id} not found in project files")]
    ReferenceNotFound { id: String, reference: String },
    #[error("Documents {first} and {second} would both be published as {name}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-call publishing options.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Format extension (`.html`). Defaults to the output path's extension.
    pub format: Option<String>,
    /// Render links as hyperlinks. Defaults to on for trees published as
    /// Markdown or HTML, off otherwise.
    pub linkify: Option<bool>,
    /// Write `index.html` after publishing a tree.
    pub create_index: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            format: None,
            linkify: None,
            create_index: true,
        }
    }
}

/// What a publish call wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReport {
    pub format: Format,
    /// Published files, in write order.
    pub files: Vec<PathBuf>,
    /// The index page, when one was written.
    pub index: Option<PathBuf>,
}

pub struct Publisher {
    config: PublishConfig,
    references: Box<dyn ReferenceLocator>,
    naming: Box<dyn DocumentNaming>,
}

impl Publisher {
    /// Publisher resolving references under `config.project_root`, naming
    /// documents by prefix.
    pub fn new(config: PublishConfig) -> Self {
        let references = Box::new(ProjectFiles::new(config.project_root.clone()));
        Self {
            config,
            references,
            naming: Box::new(PrefixNaming),
        }
    }

    pub fn with_locator(mut self, locator: impl ReferenceLocator + 'static) -> Self {
        self.references = Box::new(locator);
        self
    }

    pub fn with_naming(mut self, naming: impl DocumentNaming + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    fn context(&self, linkify: bool) -> RenderContext<'_> {
        RenderContext {
            config: &self.config,
            linkify,
            references: self.references.as_ref(),
        }
    }

    /// Lazily render `target` in the format named by `format`.
    ///
    /// Nothing is validated until the first line is requested.
    pub fn lines<'a>(&'a self, target: impl Into<Target<'a>>, format: &str, linkify: bool) -> Lines<'a> {
        render::lines(target.into(), format, self.context(linkify))
    }

    /// Publish `target` to `path`.
    pub fn publish<'a>(
        &self,
        target: impl Into<Target<'a>>,
        path: &Path,
        options: &PublishOptions,
    ) -> Result<PublishReport, PublishError> {
        let target = target.into();
        let format = match options.format.as_deref() {
            Some(extension) => Format::from_extension(extension)?,
            None => infer_format(path)?,
        };
        let linkify = options.linkify.unwrap_or_else(|| {
            matches!(target, Target::Tree(_)) && matches!(format, Format::Markdown | Format::Html)
        });

        let report = match target {
            Target::Tree(tree) => {
                self.publish_tree(tree, path, format, linkify, options.create_index)?
            }
            single => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                self.write_lines(single, format, linkify, path)?;
                PublishReport {
                    format,
                    files: vec![path.to_path_buf()],
                    index: None,
                }
            }
        };
        tracing::info!(
            path = %path.display(),
            format = %format,
            files = report.files.len(),
            "Published"
        );
        Ok(report)
    }

    fn publish_tree(
        &self,
        tree: &Tree,
        directory: &Path,
        format: Format,
        linkify: bool,
        create_index: bool,
    ) -> Result<PublishReport, PublishError> {
        let documents = self.file_names(tree, format)?;
        fs::create_dir_all(directory)?;

        let mut files = Vec::new();
        for (document, name) in documents {
            let path = directory.join(name);
            self.write_document(document, format, linkify, &path)?;
            files.push(path);
        }

        let index_path = if create_index {
            index(directory)?
        } else {
            None
        };
        Ok(PublishReport {
            format,
            files,
            index: index_path,
        })
    }

    /// Output file name of every document in walk order.
    ///
    /// Two documents mapping to the same name is an error, raised before
    /// anything is written.
    fn file_names<'t>(
        &self,
        tree: &'t Tree,
        format: Format,
    ) -> Result<Vec<(&'t Document, String)>, PublishError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut documents = Vec::new();
        for document in tree.walk() {
            let name = self.naming.file_name(document, format);
            if let Some(first) = seen.insert(name.clone(), &document.prefix) {
                return Err(PublishError::NameCollision {
                    name,
                    first: first.to_string(),
                    second: document.prefix.clone(),
                });
            }
            documents.push((document, name));
        }
        Ok(documents)
    }

    fn write_document(
        &self,
        document: &Document,
        format: Format,
        linkify: bool,
        path: &Path,
    ) -> Result<(), PublishError> {
        self.write_lines(Target::Document(document), format, linkify, path)
    }

    fn write_lines(
        &self,
        target: Target<'_>,
        format: Format,
        linkify: bool,
        path: &Path,
    ) -> Result<(), PublishError> {
        let mut file = BufWriter::new(File::create(path)?);
        for line in render::render_format(target, format, self.context(linkify)) {
            writeln!(file, "{}", line?)?;
        }
        file.flush()?;
        tracing::debug!(path = %path.display(), "Wrote {}", target.title());
        Ok(())
    }
}

/// Format from the path's extension; paths without one publish as HTML.
fn infer_format(path: &Path) -> Result<Format, PublishError> {
    match path.extension() {
        Some(extension) => Format::from_extension(&format!(".{}", extension.to_string_lossy())),
        None => Ok(Format::Html),
    }
}

// ============================================================================
// Index page
// ============================================================================

/// Write `index.html` in `directory`, linking every publishable file there.
///
/// Only the directory itself is scanned. Files count as publishable when
/// their extension is one of the supported formats; the index never lists
/// itself. With nothing to list, no index is written and `Ok(None)` is
/// returned.
pub fn index(directory: &Path) -> Result<Option<PathBuf>, PublishError> {
    let names = publishable_files(directory)?;
    if names.is_empty() {
        tracing::debug!(directory = %directory.display(), "No published files, skipping index");
        return Ok(None);
    }

    let path = directory.join(INDEX);
    fs::write(&path, render_index(&names).into_string())?;
    tracing::debug!(path = %path.display(), entries = names.len(), "Wrote index");
    Ok(Some(path))
}

/// Publishable file names in `directory`, sorted lexicographically.
fn publishable_files(directory: &Path) -> Result<Vec<String>, PublishError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let publishable = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| Format::from_extension(e).is_ok());
        if publishable && name != INDEX {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Renders the index page listing `names`.
fn render_index(names: &[String]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Index" }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                h1 { "Index" }
                ul.index {
                    @for name in names {
                        li { a href=(name) { (name) } }
                    }
                }
            }
        }
    }
}
