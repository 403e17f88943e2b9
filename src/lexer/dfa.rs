//! The lexer's finite-state machine.
//!
//! The machine is a flat table indexed by `(state, character class)`, built at
//! compile time from the [`RULES`] list. Each row may also have a wildcard
//! entry (under [`CharClass::Other`]) used when the exact class has no rule.
//! Adding a token form is a matter of adding rules; the lexer driver has no
//! per-symbol logic.

use std::fmt;

/// Partitions every input character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    Letter,
    Digit,
    Dot,
    Quote,
    Newline,
    Whitespace,
    Plus,
    Minus,
    Comma,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Equals,
    Less,
    Greater,
    Not,
    Ampersand,
    Pipe,
    Star,
    Slash,
    /// The wildcard column. Never the class of an actual character.
    Other,
    /// A character outside of the alphabet. Never used as a table index;
    /// lookups go straight to the wildcard column.
    NotAChar,
}

/// Number of columns in the table (every class but [`CharClass::NotAChar`]).
const CLASS_COUNT: usize = CharClass::NotAChar as usize;

impl CharClass {
    pub fn of(c: char) -> CharClass {
        use CharClass::*;
        if c.is_alphabetic() {
            return Letter;
        }
        if c.is_ascii_digit() {
            return Digit;
        }
        match c {
            '.' => Dot,
            '"' => Quote,
            '\n' | '\r' => Newline,
            ' ' | '\t' => Whitespace,
            '+' => Plus,
            '-' => Minus,
            ',' => Comma,
            ':' => Colon,
            ';' => Semicolon,
            '(' => LParen,
            ')' => RParen,
            '{' => LBrace,
            '}' => RBrace,
            '=' => Equals,
            '<' => Less,
            '>' => Greater,
            '!' => Not,
            '&' => Ampersand,
            '|' => Pipe,
            '*' => Star,
            '/' => Slash,
            _ => NotAChar,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct State(u8);

impl State {
    pub const INITIAL: State = State(0);

    // Identifiers and keywords.
    const IDENT: State = State(1);
    pub const IDENT_END: State = State(2);

    pub const NEWLINE: State = State(3);

    // Numbers.
    const INT: State = State(4);
    const DOT: State = State(5);
    const FRACTION: State = State(6);
    pub const FLOAT_END: State = State(7);
    pub const INT_END: State = State(8);

    // Division or comment.
    const SLASH: State = State(9);
    const COMMENT: State = State(10);
    pub const COMMENT_END: State = State(11);
    const SLASH_END: State = State(12);

    // Strings.
    const STRING: State = State(13);
    pub const STRING_END: State = State(14);

    /// Single-character punctuation, complete as soon as it is read.
    const PUNCT_END: State = State(15);

    // Multiplication or power.
    const STAR: State = State(16);
    const STAR_STAR_END: State = State(17);
    const STAR_END: State = State(18);

    // Logical operators.
    const AMPERSAND: State = State(19);
    const LOGICAL_END: State = State(20);
    const PIPE: State = State(21);

    // Assignment and relations.
    const EQUALS: State = State(22);
    const ASSIGN_END: State = State(23);
    const RELATION: State = State(24);
    const RELATION_EQ_END: State = State(25);
    const RELATION_END: State = State(26);

    // Minus or arrow.
    const MINUS: State = State(27);
    const ARROW_END: State = State(28);
    const MINUS_END: State = State(29);

    // Errors.
    pub const UNEXPECTED_CHAR: State = State(101);
    pub const MALFORMED_NUMBER: State = State(102);
    pub const UNTERMINATED_STRING: State = State(103);
    pub const MALFORMED_LOGICAL: State = State(104);

    /// Whether reaching this state completes a lexeme (or fails it).
    pub fn is_final(self) -> bool {
        self.accept().is_some() || self.error().is_some()
    }

    /// Returns how the lexeme is finished, if this is an accepting state.
    pub fn accept(self) -> Option<Accept> {
        use Accept::*;
        let accept = match self {
            State::IDENT_END
            | State::FLOAT_END
            | State::INT_END
            | State::SLASH_END
            | State::STAR_END
            | State::ASSIGN_END
            | State::RELATION_END
            | State::MINUS_END => PushBack,
            State::NEWLINE
            | State::COMMENT_END
            | State::STRING_END
            | State::PUNCT_END
            | State::STAR_STAR_END
            | State::LOGICAL_END
            | State::RELATION_EQ_END
            | State::ARROW_END => Consume,
            _ => return None,
        };
        Some(accept)
    }

    /// Returns the diagnostic class, if this is an error state.
    pub fn error(self) -> Option<ErrorKind> {
        let class = match self {
            State::UNEXPECTED_CHAR => ErrorKind::UnexpectedChar,
            State::MALFORMED_NUMBER => ErrorKind::MalformedNumber,
            State::UNTERMINATED_STRING => ErrorKind::UnterminatedString,
            State::MALFORMED_LOGICAL => ErrorKind::MalformedLogicalOperator,
            _ => return None,
        };
        Some(class)
    }

    /// Whether the finished lexeme is dropped instead of becoming a token.
    pub fn is_trivia(self) -> bool {
        matches!(self, State::NEWLINE | State::COMMENT_END)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.0)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Accept {
    /// The lookahead character is part of the lexeme.
    Consume,
    /// The lookahead character starts the next lexeme and must be un-read.
    PushBack,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedChar,
    MalformedNumber,
    UnterminatedString,
    MalformedLogicalOperator,
}

use CharClass as C;

/// `(from, class, to)` transitions. A [`CharClass::Other`] rule is the row's
/// wildcard.
#[rustfmt::skip]
const RULES: &[(State, CharClass, State)] = &[
    // Identifiers.
    (State::INITIAL, C::Letter, State::IDENT),
    (State::IDENT, C::Letter, State::IDENT),
    (State::IDENT, C::Digit, State::IDENT),
    (State::IDENT, C::Other, State::IDENT_END),

    // Integers and floats.
    (State::INITIAL, C::Digit, State::INT),
    (State::INT, C::Digit, State::INT),
    (State::INT, C::Dot, State::DOT),
    (State::INT, C::Other, State::INT_END),
    (State::DOT, C::Digit, State::FRACTION),
    (State::DOT, C::Other, State::MALFORMED_NUMBER),
    (State::FRACTION, C::Digit, State::FRACTION),
    (State::FRACTION, C::Other, State::FLOAT_END),

    // Strings.
    (State::INITIAL, C::Quote, State::STRING),
    (State::STRING, C::Other, State::STRING),
    (State::STRING, C::Quote, State::STRING_END),
    (State::STRING, C::Newline, State::UNTERMINATED_STRING),

    // Whitespace.
    (State::INITIAL, C::Whitespace, State::INITIAL),
    (State::INITIAL, C::Newline, State::NEWLINE),
    (State::INITIAL, C::Other, State::UNEXPECTED_CHAR),

    // Punctuation.
    (State::INITIAL, C::Plus, State::PUNCT_END),
    (State::INITIAL, C::Comma, State::PUNCT_END),
    (State::INITIAL, C::Colon, State::PUNCT_END),
    (State::INITIAL, C::Semicolon, State::PUNCT_END),
    (State::INITIAL, C::LParen, State::PUNCT_END),
    (State::INITIAL, C::RParen, State::PUNCT_END),
    (State::INITIAL, C::LBrace, State::PUNCT_END),
    (State::INITIAL, C::RBrace, State::PUNCT_END),

    // Minus or arrow.
    (State::INITIAL, C::Minus, State::MINUS),
    (State::MINUS, C::Greater, State::ARROW_END),
    (State::MINUS, C::Other, State::MINUS_END),

    // Multiplication or power.
    (State::INITIAL, C::Star, State::STAR),
    (State::STAR, C::Star, State::STAR_STAR_END),
    (State::STAR, C::Other, State::STAR_END),

    // Division or line comment.
    (State::INITIAL, C::Slash, State::SLASH),
    (State::SLASH, C::Slash, State::COMMENT),
    (State::SLASH, C::Other, State::SLASH_END),
    (State::COMMENT, C::Other, State::COMMENT),
    (State::COMMENT, C::Newline, State::COMMENT_END),

    // Assignment and relations.
    (State::INITIAL, C::Equals, State::EQUALS),
    (State::EQUALS, C::Equals, State::RELATION_EQ_END),
    (State::EQUALS, C::Other, State::ASSIGN_END),
    (State::INITIAL, C::Less, State::RELATION),
    (State::INITIAL, C::Greater, State::RELATION),
    (State::INITIAL, C::Not, State::RELATION),
    (State::RELATION, C::Equals, State::RELATION_EQ_END),
    (State::RELATION, C::Other, State::RELATION_END),

    // Logical operators.
    (State::INITIAL, C::Ampersand, State::AMPERSAND),
    (State::AMPERSAND, C::Ampersand, State::LOGICAL_END),
    (State::AMPERSAND, C::Other, State::MALFORMED_LOGICAL),
    (State::INITIAL, C::Pipe, State::PIPE),
    (State::PIPE, C::Pipe, State::LOGICAL_END),
    (State::PIPE, C::Other, State::MALFORMED_LOGICAL),
];

/// Rows cover every non-final state.
const STATE_COUNT: usize = 30;

type Table = [[Option<State>; CLASS_COUNT]; STATE_COUNT];

static TABLE: Table = build_table();

const fn build_table() -> Table {
    let mut table: Table = [[None; CLASS_COUNT]; STATE_COUNT];
    let mut i = 0;
    while i < RULES.len() {
        let (from, class, to) = RULES[i];
        assert!((from.0 as usize) < STATE_COUNT, "source state out of range");
        assert!(!matches!(class, CharClass::NotAChar), "NotAChar has no column");
        table[from.0 as usize][class as usize] = Some(to);
        i += 1;
    }
    table
}

/// Returns the state reached from `state` on a character of class `class`,
/// falling back to the row's wildcard. `None` means the row has neither.
pub fn next_state(state: State, class: CharClass) -> Option<State> {
    let row = TABLE.get(state.0 as usize)?;
    let exact = match class {
        CharClass::NotAChar => None,
        class => row[class as usize],
    };
    exact.or(row[CharClass::Other as usize])
}
