//! Renders diagnostics as one-line summaries or as annotated source snippets.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Without a source each diagnostic prints as `severity at start..end: message`.
pub struct DiagnosticsPrinter<'a> {
    diagnostics: &'a Diagnostics,
    source: Option<&'a str>,
    colored: bool,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            match self.source {
                Some(source) => write!(w, "{}", renderer.render(&[snippet(diag, source)]))?,
                None => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }
}

fn snippet<'a>(diag: &'a DiagnosticMessage, source: &'a str) -> Group<'a> {
    let mut snippet = Snippet::source(source).line_start(1).annotation(
        AnnotationKind::Primary
            .span(caret_range(diag.range, source.len()))
            .label(&diag.message),
    );
    for related in &diag.related {
        snippet = snippet.annotation(
            AnnotationKind::Context
                .span(caret_range(related.range, source.len()))
                .label(&related.message),
        );
    }

    let level = match diag.severity() {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    };
    level.primary_title(&diag.message).element(snippet)
}

/// An empty span still needs one column for the caret, unless it sits at the very end.
fn caret_range(range: TextRange, len: usize) -> std::ops::Range<usize> {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    if start == end {
        start..(start + 1).min(len)
    } else {
        start..end
    }
}
