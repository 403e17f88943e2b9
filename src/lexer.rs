use std::str::CharIndices;

use log::trace;

use crate::{
    token::{Span, Spanned, Token, TokenKind, TokenTable, KEYWORDS, SYMBOLS},
    util::lines::LineIndex,
};

pub mod dfa;

use dfa::{Accept, CharClass, State};

pub use dfa::ErrorKind;

pub const SUGGESTED_TOKENS_CAPACITY: usize = 8_192;

/// The lexer's output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: TokenTable,
    pub lines: LineIndex,
}

/// Lexes the provided string, stopping at the first ill-formed lexeme.
pub fn tokenize(src: &str) -> Result<Tokenized, Spanned<Error>> {
    Lexer::new(src).lex()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    /// The error state the machine reached.
    pub state: State,
    pub kind: ErrorKind,
    pub lexeme: Box<str>,
}

impl Error {
    pub fn message(&self) -> String {
        let lexeme = &self.lexeme;
        match self.kind {
            ErrorKind::UnexpectedChar => format!("unexpected character `{lexeme}`"),
            ErrorKind::MalformedNumber => format!("malformed number `{lexeme}`"),
            ErrorKind::UnterminatedString => "unterminated string literal".into(),
            ErrorKind::MalformedLogicalOperator => {
                format!("malformed logical operator `{lexeme}`")
            }
        }
    }

    pub fn hint(&self) -> &'static str {
        match self.kind {
            ErrorKind::UnexpectedChar => "this character can't start any token",
            ErrorKind::MalformedNumber => "a decimal point must be followed by a digit",
            ErrorKind::UnterminatedString => "close the string with `\"` before the line ends",
            ErrorKind::MalformedLogicalOperator => "logical operators are `&&` and `||`",
        }
    }
}

/// Returns the error token which stands for the provided error's lexeme.
pub fn error_token(error: &Spanned<Error>) -> Token {
    Token::new(TokenKind::Error(error.inner.lexeme.clone()), error.span)
}

/// A position in the source, counted both in characters (as spans are) and
/// in bytes (for slicing).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Pos {
    char: usize,
    byte: usize,
}

/// Drives the transition table over the source.
struct Lexer<'src> {
    src: &'src str,
    iter: CharIndices<'src>,
    /// Number of characters taken from `iter` so far.
    chars_read: usize,
    /// A character which ended the previous lexeme and must be scanned again.
    pushed_back: Option<(Pos, char)>,
    state: State,
    /// Start of the lexeme being scanned.
    current_lo: Pos,
    tokens: TokenTable,
    lines: LineIndex,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str) -> Lexer<'src> {
        Lexer {
            src,
            iter: src.char_indices(),
            chars_read: 0,
            pushed_back: None,
            state: State::INITIAL,
            current_lo: Pos { char: 0, byte: 0 },
            tokens: TokenTable::with_capacity(SUGGESTED_TOKENS_CAPACITY.min(src.len() / 2 + 1)),
            lines: LineIndex::new(),
        }
    }

    fn lex(mut self) -> Result<Tokenized, Spanned<Error>> {
        while let Some((pos, c)) = self.next_char() {
            self.step(pos, c)?;
        }
        trace!("lexed {} tokens", self.tokens.len());
        Ok(Tokenized {
            tokens: self.tokens,
            lines: self.lines,
        })
    }

    /// Returns the next character to be scanned. Once the input is exhausted, a
    /// lexeme still in progress is closed by a synthetic line break at the end
    /// of the source.
    fn next_char(&mut self) -> Option<(Pos, char)> {
        if let Some(pushed_back) = self.pushed_back.take() {
            return Some(pushed_back);
        }
        match self.iter.next() {
            Some((byte, c)) => {
                let pos = Pos {
                    char: self.chars_read,
                    byte,
                };
                self.chars_read += 1;
                Some((pos, c))
            }
            None if self.state == State::INITIAL => None,
            None => Some((self.end(), '\n')),
        }
    }

    fn end(&self) -> Pos {
        Pos {
            char: self.chars_read,
            byte: self.src.len(),
        }
    }

    /// Returns the position right past `c`, which was read at `pos`.
    fn after(&self, pos: Pos, c: char) -> Pos {
        if pos.byte >= self.src.len() {
            return self.end();
        }
        Pos {
            char: pos.char + 1,
            byte: pos.byte + c.len_utf8(),
        }
    }

    fn step(&mut self, pos: Pos, c: char) -> Result<(), Spanned<Error>> {
        if self.state == State::INITIAL {
            self.current_lo = pos;
        }
        // Every state has a wildcard rule, so this only fails if the table is
        // broken; report the character rather than panicking.
        let next = dfa::next_state(self.state, CharClass::of(c)).unwrap_or(State::UNEXPECTED_CHAR);
        self.state = next;

        if let Some(kind) = next.error() {
            return Err(self.error(next, kind, pos, c));
        }
        match next.accept() {
            None => {
                self.track_line(pos, c);
                Ok(())
            }
            Some(Accept::Consume) => {
                self.track_line(pos, c);
                let hi = self.after(pos, c);
                self.finish(hi)
            }
            Some(Accept::PushBack) => {
                self.pushed_back = Some((pos, c));
                self.finish(pos)
            }
        }
    }

    /// Completes the current lexeme, which ends at `hi`.
    fn finish(&mut self, hi: Pos) -> Result<(), Spanned<Error>> {
        let state = std::mem::replace(&mut self.state, State::INITIAL);
        if state.is_trivia() {
            return Ok(());
        }
        let span = Span::new_of_bounds(self.current_lo.char..hi.char);
        let text = &self.src[self.current_lo.byte..hi.byte];
        let kind = match state {
            State::IDENT_END => match KEYWORDS.get(text) {
                Some(&keyword) => TokenKind::Keyword(keyword),
                None => TokenKind::Identifier(text.into()),
            },
            State::INT_END => TokenKind::IntLiteral(text.into()),
            State::FLOAT_END => TokenKind::FloatLiteral(text.into()),
            State::STRING_END => TokenKind::StringLiteral(text[1..text.len() - 1].into()),
            _ => match SYMBOLS.get(text) {
                Some(&symbol) => TokenKind::Symbol(symbol),
                None => {
                    let error = Error {
                        state,
                        kind: ErrorKind::UnexpectedChar,
                        lexeme: text.into(),
                    };
                    return Err(span.wrap(error));
                }
            },
        };
        self.tokens.push(Token::new(kind, span));
        Ok(())
    }

    fn error(&self, state: State, kind: ErrorKind, pos: Pos, c: char) -> Spanned<Error> {
        let lo = self.current_lo;
        // An unexpected character is its own lexeme. Otherwise the offending
        // character only proves the lexeme so far can't be completed.
        let hi = if lo == pos { self.after(pos, c) } else { pos };
        let span = Span::new_of_bounds(lo.char..hi.char);
        let error = Error {
            state,
            kind,
            lexeme: self.src[lo.byte..hi.byte].into(),
        };
        span.wrap(error)
    }

    fn track_line(&mut self, pos: Pos, c: char) {
        if c == '\n' && pos.byte < self.src.len() {
            self.lines.push_line_start(pos.char + 1);
        }
    }
}
