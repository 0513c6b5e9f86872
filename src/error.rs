//! Error types for loading navigation models

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid model document: {message}")]
    Yaml {
        message: String,
        /// Position of the error in the source, when the YAML parser reports one
        span: Option<Span>,
    },

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for ModelError {
    fn from(err: serde_yaml::Error) -> Self {
        let span = err.location().map(|loc| loc.index()..loc.index() + 1);
        ModelError::Yaml {
            message: err.to_string(),
            span,
        }
    }
}

impl ModelError {
    /// Format the error with source context using ariadne
    ///
    /// Errors without a source position fall back to their plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (message, span) = match self {
            ModelError::Yaml {
                message,
                span: Some(span),
            } => (message, clamp_span(span, source.len())),
            _ => return self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid model document")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Keep a reported span inside the source so the report can always be drawn
fn clamp_span(span: &Span, len: usize) -> Span {
    let start = span.start.min(len);
    let end = span.end.min(len).max(start);
    start..end
}
