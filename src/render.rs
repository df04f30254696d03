//! Lazy line rendering.
//!
//! [`lines`] returns a [`Lines`] iterator without doing any work: the format
//! string is only parsed when the first line is requested, so an unknown
//! format surfaces as the first item of the sequence rather than at call
//! time. After an error the sequence ends.
//!
//! Items are rendered one at a time as the iterator advances; each item's
//! lines already end with whatever separator its grammar needs, so documents
//! are the plain concatenation of their items.

use crate::format::{Format, ItemRenderer, RenderContext};
use crate::model::{Item, Target};
use crate::publish::PublishError;

/// Render `target` as lines of the format named by the extension `format`.
pub fn lines<'a>(target: Target<'a>, format: &str, ctx: RenderContext<'a>) -> Lines<'a> {
    Lines {
        state: State::Pending {
            target,
            format: format.to_string(),
            ctx,
        },
    }
}

/// Render `target` in an already-validated format.
pub fn render_format<'a>(target: Target<'a>, format: Format, ctx: RenderContext<'a>) -> Lines<'a> {
    Lines {
        state: State::Rendering(Rendering::new(target, format, ctx)),
    }
}

/// Single-pass sequence of output lines (without trailing newlines).
pub struct Lines<'a> {
    state: State<'a>,
}

enum State<'a> {
    Pending {
        target: Target<'a>,
        format: String,
        ctx: RenderContext<'a>,
    },
    Rendering(Rendering<'a>),
    Done,
}

struct Rendering<'a> {
    renderer: &'static dyn ItemRenderer,
    ctx: RenderContext<'a>,
    items: Box<dyn Iterator<Item = &'a Item> + 'a>,
    buffer: std::vec::IntoIter<String>,
    epilogue: Option<Vec<String>>,
}

impl<'a> Rendering<'a> {
    fn new(target: Target<'a>, format: Format, ctx: RenderContext<'a>) -> Self {
        let renderer = format.renderer();
        let (prologue, epilogue) = if target.is_collection() {
            (
                renderer.document_prologue(target.title()),
                Some(renderer.document_epilogue()),
            )
        } else {
            (Vec::new(), None)
        };
        Self {
            renderer,
            ctx,
            items: target.items(),
            buffer: prologue.into_iter(),
            epilogue,
        }
    }

    fn next_line(&mut self) -> Option<Result<String, PublishError>> {
        loop {
            if let Some(line) = self.buffer.next() {
                return Some(Ok(line));
            }
            match self.items.next() {
                Some(item) => match self.renderer.render_item(item, &self.ctx) {
                    Ok(lines) => self.buffer = lines.into_iter(),
                    Err(e) => return Some(Err(e)),
                },
                None => self.buffer = self.epilogue.take()?.into_iter(),
            }
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = Result<String, PublishError>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, State::Pending { .. }) {
            if let State::Pending {
                target,
                format,
                ctx,
            } = std::mem::replace(&mut self.state, State::Done)
            {
                match Format::from_extension(&format) {
                    Ok(format) => {
                        self.state = State::Rendering(Rendering::new(target, format, ctx));
                    }
                    Err(e) => return Some(Err(e)),
                }
            }
        }

        let State::Rendering(rendering) = &mut self.state else {
            return None;
        };
        match rendering.next_line() {
            Some(Ok(line)) => Some(Ok(line)),
            end => {
                self.state = State::Done;
                end
            }
        }
    }
}
