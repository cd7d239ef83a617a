use crate::diagnostic::{render_diagnostics, Diagnostic};

/// Errors surfaced by the rewrite pipeline.
///
/// Both variants are unrecoverable at the point of detection: the transform
/// never produces partial output, and re-invoking it on the same input is
/// pointless because the pipeline is deterministic.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input text is not a syntactically valid binding expression.
    #[error("failed to parse binding expression")]
    Parse {
        /// The offending input, kept for rendering diagnostics against.
        source_text: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// An expression tree violated the rewriter's shape requirements.
    #[error("malformed expression tree: {0}")]
    MalformedTree(String),
}

impl Error {
    pub fn parse(source_text: &str, diagnostics: Vec<Diagnostic>) -> Self {
        Error::Parse {
            source_text: source_text.to_string(),
            diagnostics,
        }
    }

    /// Positioned diagnostics for this error (empty for tree-shape errors).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Parse { diagnostics, .. } => diagnostics,
            Error::MalformedTree(_) => &[],
        }
    }

    /// Render the error to stderr. Parse errors get ariadne reports against
    /// the offending text; tree-shape errors get a plain message.
    pub fn render(&self, origin: &str) {
        match self {
            Error::Parse {
                source_text,
                diagnostics,
            } => render_diagnostics(diagnostics, origin, source_text),
            Error::MalformedTree(msg) => eprintln!("error: malformed expression tree: {}", msg),
        }
    }
}
