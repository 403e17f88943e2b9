/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into an AST.
pub mod parser;

/// The typer checks the AST and lowers it into the scoped IR.
pub mod typer;

pub mod ast;
pub mod error;
pub mod ir;
pub mod token;

pub mod util {
    pub mod fmt;
    pub mod lines;
    #[cfg(test)]
    pub(crate) mod test_utils;
}

use log::debug;

pub use crate::error::Error;
use crate::{
    ast::Program,
    ir::Ir,
    lexer::Tokenized,
    token::TokenTable,
    util::{
        fmt::{Context, Show},
        lines::LineIndex,
    },
};

/// Every artifact of a successful run of the pipeline.
#[derive(Debug)]
pub struct Compilation {
    pub tokens: TokenTable,
    pub lines: LineIndex,
    pub program: Program,
    pub ir: Ir,
}

/// Runs the lexer, the parser and the typer over `src`, stopping at the first
/// error.
pub fn compile(src: &str) -> Result<Compilation, Error> {
    let Tokenized { tokens, lines } = lexer::tokenize(src).map_err(|error| {
        let lines = LineIndex::of(src);
        let rendered = render(&lines, &error);
        Error::Lex { error, rendered }
    })?;
    debug!("lexed {} tokens over {} lines", tokens.len(), lines.line_count());

    let program = parser::parse_program(&tokens).map_err(|error| {
        let rendered = render(&lines, &error);
        Error::Parse { error, rendered }
    })?;
    debug!("parsed {} top-level statements", program.stmts.len());

    let ir = typer::typecheck(&program).map_err(|error| {
        let rendered = render(&lines, &error);
        Error::Type { error, rendered }
    })?;
    debug!("built {} scopes", ir.scope_count());

    Ok(Compilation {
        tokens,
        lines,
        program,
        ir,
    })
}

fn render(lines: &LineIndex, error: &impl Show) -> String {
    let ctx = Context { lines };
    format!("{:#}", error.display(&ctx))
}
