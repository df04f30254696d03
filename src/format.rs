//! Output formats and their per-item line grammars.
//!
//! Each [`Format`] maps to exactly one [`ItemRenderer`]. Adding a format means
//! adding a variant, its extension, and a renderer; the render loop and the
//! publisher never branch on the format themselves.
//!
//! ## Text (`.txt`)
//!
//! ```text
//! 1.2     req4
//!
//!         This shall...
//!
//!         Reference: Doorstop.sublime-project (line None)
//!
//!         Links: sys4
//!
//! ```
//!
//! ## Markdown (`.md`)
//!
//! ```text
//! ## 1.2 req4
//!
//! This shall...
//!
//! Reference: Doorstop.sublime-project (line None)
//!
//! *Links: sys4*
//!
//! ```
//!
//! ## HTML (`.html`)
//!
//! ```text
//! <h2 id="req4">1.2 req4</h2>
//! <p>This shall...</p>
//! <p>Reference: Doorstop.sublime-project (line None)</p>
//! <p><em>Links: sys4</em></p>
//! ```
//!
//! Headings render only their title line in every format.

use crate::config::PublishConfig;
use crate::model::Item;
use crate::publish::PublishError;
use crate::references::ReferenceLocator;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fmt;

/// Stylesheet embedded in every generated HTML page.
pub(crate) const STYLESHEET: &str = include_str!("../static/publish.css");

/// Column width of the level in text output; also the body indent.
const TEXT_INDENT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Text,
    Markdown,
    Html,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Text, Format::Markdown, Format::Html];

    /// Parse a file extension such as `.html`. The leading dot is optional.
    pub fn from_extension(extension: &str) -> Result<Format, PublishError> {
        match extension.strip_prefix('.').unwrap_or(extension) {
            "txt" => Ok(Format::Text),
            "md" => Ok(Format::Markdown),
            "html" => Ok(Format::Html),
            _ => Err(PublishError::UnknownFormat(extension.to_string())),
        }
    }

    /// Dotted extension, e.g. `.md`.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Text => ".txt",
            Format::Markdown => ".md",
            Format::Html => ".html",
        }
    }

    pub fn renderer(self) -> &'static dyn ItemRenderer {
        match self {
            Format::Text => &TextRenderer,
            Format::Markdown => &MarkdownRenderer,
            Format::Html => &HtmlRenderer,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Everything a renderer needs besides the item itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a PublishConfig,
    /// Render link ids as hyperlinks/anchors (Markdown and HTML).
    pub linkify: bool,
    pub references: &'a dyn ReferenceLocator,
}

impl RenderContext<'_> {
    /// Text shown after `Reference: `, or `None` when the item has no reference.
    pub fn reference_display(&self, item: &Item) -> Result<Option<String>, PublishError> {
        let Some(reference) = item.reference() else {
            return Ok(None);
        };
        if self.config.check_ref {
            Ok(Some(self.references.locate(item)?.to_string()))
        } else {
            Ok(Some(format!("'{reference}'")))
        }
    }

    /// Child links to show, or an empty slice when the section is disabled.
    pub fn child_links<'i>(&self, item: &'i Item) -> &'i [String] {
        if self.config.publish_child_links {
            &item.child_links
        } else {
            &[]
        }
    }
}

/// Renders one item as lines of a single output grammar.
///
/// Every item's lines are self-contained: documents are the plain
/// concatenation of their items' lines, wrapped in the optional
/// prologue/epilogue.
pub trait ItemRenderer {
    fn render_item(
        &self,
        item: &Item,
        ctx: &RenderContext<'_>,
    ) -> Result<Vec<String>, PublishError>;

    /// Lines emitted before the first item of a document or tree.
    fn document_prologue(&self, _title: &str) -> Vec<String> {
        Vec::new()
    }

    /// Lines emitted after the last item of a document or tree.
    fn document_epilogue(&self) -> Vec<String> {
        Vec::new()
    }
}

// ============================================================================
// Plain text
// ============================================================================

pub struct TextRenderer;

impl ItemRenderer for TextRenderer {
    fn render_item(
        &self,
        item: &Item,
        ctx: &RenderContext<'_>,
    ) -> Result<Vec<String>, PublishError> {
        let indent = " ".repeat(TEXT_INDENT);
        let mut lines = vec![
            format!("{:<width$}{}", item.level, item.title(), width = TEXT_INDENT),
            String::new(),
        ];
        if item.heading {
            return Ok(lines);
        }

        if !item.text.trim().is_empty() {
            for line in item.text.trim_matches('\n').lines() {
                if line.trim().is_empty() {
                    lines.push(String::new());
                } else {
                    lines.push(format!("{indent}{line}"));
                }
            }
            lines.push(String::new());
        }
        if let Some(reference) = ctx.reference_display(item)? {
            lines.push(format!("{indent}Reference: {reference}"));
            lines.push(String::new());
        }
        if !item.links.is_empty() {
            lines.push(format!("{indent}Links: {}", item.links.join(", ")));
            lines.push(String::new());
        }
        let child_links = ctx.child_links(item);
        if !child_links.is_empty() {
            lines.push(format!("{indent}Child links: {}", child_links.join(", ")));
            lines.push(String::new());
        }
        Ok(lines)
    }
}

// ============================================================================
// Markdown
// ============================================================================

pub struct MarkdownRenderer;

impl MarkdownRenderer {
    fn links(ids: &[String], linkify: bool) -> String {
        if linkify {
            ids.iter()
                .map(|id| format!("[{id}](#{id})"))
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            ids.join(", ")
        }
    }
}

impl ItemRenderer for MarkdownRenderer {
    fn render_item(
        &self,
        item: &Item,
        ctx: &RenderContext<'_>,
    ) -> Result<Vec<String>, PublishError> {
        let mut header = format!("## {} {}", item.level, item.title());
        if ctx.linkify {
            header.push_str(&format!(" {{: #{} }}", item.id));
        }
        let mut lines = vec![header, String::new()];
        if item.heading {
            return Ok(lines);
        }

        if !item.text.trim().is_empty() {
            lines.extend(item.text.trim_matches('\n').lines().map(str::to_string));
            lines.push(String::new());
        }
        if let Some(reference) = ctx.reference_display(item)? {
            lines.push(format!("Reference: {reference}"));
            lines.push(String::new());
        }
        if !item.links.is_empty() {
            lines.push(format!("*Links: {}*", Self::links(&item.links, ctx.linkify)));
            lines.push(String::new());
        }
        let child_links = ctx.child_links(item);
        if !child_links.is_empty() {
            lines.push(format!(
                "*Child links: {}*",
                Self::links(child_links, ctx.linkify)
            ));
            lines.push(String::new());
        }
        Ok(lines)
    }
}

// ============================================================================
// HTML
// ============================================================================

pub struct HtmlRenderer;

/// Comma-separated ids, as anchors when `anchors` is set.
fn html_links(ids: &[String], anchors: bool) -> Markup {
    html! {
        @for (i, id) in ids.iter().enumerate() {
            @if i > 0 { ", " }
            @if anchors {
                a href={ "#" (id) } { (id) }
            } @else {
                (id)
            }
        }
    }
}

impl ItemRenderer for HtmlRenderer {
    fn render_item(
        &self,
        item: &Item,
        ctx: &RenderContext<'_>,
    ) -> Result<Vec<String>, PublishError> {
        let header = html! {
            h2 id=(item.id) { (item.level.to_string()) " " (item.title()) }
        };
        let mut lines = vec![header.into_string()];
        if item.heading {
            return Ok(lines);
        }

        if !item.text.trim().is_empty() {
            let mut body = String::new();
            md_html::push_html(&mut body, Parser::new(&item.text));
            // Blank lines inside <pre> are content.
            lines.extend(body.lines().map(str::to_string));
        }
        if let Some(reference) = ctx.reference_display(item)? {
            lines.push(html! { p { "Reference: " (reference) } }.into_string());
        }
        if !item.links.is_empty() {
            let links = html_links(&item.links, ctx.linkify);
            lines.push(html! { p { em { "Links: " (links) } } }.into_string());
        }
        let child_links = ctx.child_links(item);
        if !child_links.is_empty() {
            // Child links are always navigable in HTML.
            let links = html_links(child_links, true);
            lines.push(html! { p { em { "Child links: " (links) } } }.into_string());
        }
        Ok(lines)
    }

    fn document_prologue(&self, title: &str) -> Vec<String> {
        let head = html! {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLESHEET)) }
            }
        };
        vec![
            html! { (DOCTYPE) }.into_string(),
            r#"<html lang="en">"#.to_string(),
            head.into_string(),
            "<body>".to_string(),
        ]
    }

    fn document_epilogue(&self) -> Vec<String> {
        vec!["</body>".to_string(), "</html>".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn extension_round_trip() {
        for format in Format::ALL {
            assert_eq!(Format::from_extension(format.extension()).unwrap(), format);
        }
    }

    #[test]
    fn extension_without_dot() {
        assert_eq!(Format::from_extension("md").unwrap(), Format::Markdown);
    }

    #[test]
    fn unknown_extension_is_error() {
        for ext in [".a", ".htm", ".TXT", ""] {
            assert!(matches!(
                Format::from_extension(ext),
                Err(PublishError::UnknownFormat(_))
            ));
        }
    }

    #[test]
    fn text_level_column_is_padded() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let ctx = context(&config, false, &locator);
        let lines = TextRenderer.render_item(&heading_item(), &ctx).unwrap();
        assert_eq!(lines, vec!["1.1     Heading", ""]);
    }

    #[test]
    fn text_long_level_is_not_truncated() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let ctx = context(&config, false, &locator);
        let mut item = heading_item();
        item.level = "10.20.30".parse().unwrap();
        let lines = TextRenderer.render_item(&item, &ctx).unwrap();
        assert_eq!(lines[0], "10.20.30Heading");
    }

    #[test]
    fn text_multiline_body_is_indented() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let ctx = context(&config, false, &locator);
        let mut item = normative_item();
        item.reference = None;
        item.links.clear();
        item.text = "First line.\n\nSecond paragraph.\n".to_string();
        let lines = TextRenderer.render_item(&item, &ctx).unwrap();
        assert_eq!(
            lines,
            vec![
                "1.2     req4",
                "",
                "        First line.",
                "",
                "        Second paragraph.",
                "",
            ]
        );
    }

    #[test]
    fn leading_blank_lines_in_body_are_dropped() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let ctx = context(&config, false, &locator);
        let mut item = normative_item();
        item.reference = None;
        item.links.clear();
        item.text = "\n\n    indented start\n".to_string();

        let text = TextRenderer.render_item(&item, &ctx).unwrap();
        assert_eq!(text, vec!["1.2     req4", "", "            indented start", ""]);

        let markdown = MarkdownRenderer.render_item(&item, &ctx).unwrap();
        assert_eq!(markdown, vec!["## 1.2 req4", "", "    indented start", ""]);
    }

    #[test]
    fn html_code_block_keeps_blank_lines() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let ctx = context(&config, false, &locator);
        let mut item = normative_item();
        item.reference = None;
        item.links.clear();
        item.text = "```\nfirst\n\nthird\n```\n".to_string();

        let lines = HtmlRenderer.render_item(&item, &ctx).unwrap();
        assert_eq!(
            lines,
            vec![
                r#"<h2 id="req4">1.2 req4</h2>"#,
                "<pre><code>first",
                "",
                "third",
                "</code></pre>",
            ]
        );
    }

    #[test]
    fn markdown_linkified_links() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let ctx = context(&config, true, &locator);
        let lines = MarkdownRenderer
            .render_item(&child_linked_item(), &ctx)
            .unwrap();
        assert!(lines.contains(&"*Links: [sys1](#sys1)*".to_string()));
        assert!(lines.contains(&"*Child links: [tst1](#tst1)*".to_string()));
        assert_eq!(lines[0], "## 1.3 req5 {: #req5 }");
    }

    #[test]
    fn html_body_is_converted_from_markdown() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let ctx = context(&config, false, &locator);
        let mut item = normative_item();
        item.text = "This **shall** work.".to_string();
        let lines = HtmlRenderer.render_item(&item, &ctx).unwrap();
        assert_eq!(lines[0], r#"<h2 id="req4">1.2 req4</h2>"#);
        assert_eq!(lines[1], "<p>This <strong>shall</strong> work.</p>");
    }

    #[test]
    fn html_escapes_text() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let ctx = context(&config, false, &locator);
        let mut item = heading_item();
        item.text = "<script>alert('x')</script>".to_string();
        let lines = HtmlRenderer.render_item(&item, &ctx).unwrap();
        assert!(!lines[0].contains("<script>"));
        assert!(lines[0].contains("&lt;script&gt;"));
    }

    #[test]
    fn html_links_plain_unless_linkify() {
        let config = PublishConfig::default();
        let locator = StubLocator::default();
        let plain = HtmlRenderer
            .render_item(&normative_item(), &context(&config, false, &locator))
            .unwrap();
        assert!(plain.contains(&"<p><em>Links: sys4</em></p>".to_string()));

        let linked = HtmlRenderer
            .render_item(&normative_item(), &context(&config, true, &locator))
            .unwrap();
        assert!(linked.contains(&r##"<p><em>Links: <a href="#sys4">sys4</a></em></p>"##.to_string()));
    }

    #[test]
    fn html_prologue_is_a_full_page_head() {
        let prologue = HtmlRenderer.document_prologue("REQ");
        assert_eq!(prologue[0], "<!DOCTYPE html>");
        assert!(prologue[2].contains("<title>REQ</title>"));
        assert_eq!(HtmlRenderer.document_epilogue().last().unwrap(), "</html>");
    }

    #[test]
    fn text_and_markdown_have_no_prologue() {
        assert!(TextRenderer.document_prologue("REQ").is_empty());
        assert!(MarkdownRenderer.document_epilogue().is_empty());
    }
}
