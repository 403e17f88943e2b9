use crate::{lexer, parser, token::Spanned, typer};

/// A failed compilation, holding the stage's error and its rendered
/// diagnostic.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{rendered}")]
    Lex {
        error: Spanned<lexer::Error>,
        rendered: String,
    },
    #[error("{rendered}")]
    Parse {
        error: Spanned<parser::Error>,
        rendered: String,
    },
    #[error("{rendered}")]
    Type {
        error: Spanned<typer::Error>,
        rendered: String,
    },
}

impl Error {
    /// The stage which failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Lex { .. } => "lexer",
            Error::Parse { .. } => "parser",
            Error::Type { .. } => "typer",
        }
    }

    /// The rendered diagnostic, as in
    /// `"<line>,<col>..<line>,<col>: <message>. Hint: <hint>"`.
    pub fn rendered(&self) -> &str {
        match self {
            Error::Lex { rendered, .. }
            | Error::Parse { rendered, .. }
            | Error::Type { rendered, .. } => rendered,
        }
    }
}
