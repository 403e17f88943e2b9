use std::{fmt, ops::Range};

#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    lo: usize,
    len: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Token {
        Token {
            kind,
            len: span.len,
            lo: span.lo,
        }
    }

    pub fn span(&self) -> Span {
        Span {
            len: self.len,
            lo: self.lo,
        }
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol(symbol)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?}, {})", self.kind, self.span())
    }
}

/// A half-open range of character offsets into the source.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub len: u32,
    pub lo: usize,
}

impl Span {
    pub fn new_of_bounds(Range { start: lo, end: hi }: Range<usize>) -> Span {
        debug_assert!(hi >= lo);
        let len = u32::try_from(hi - lo).unwrap_or(u32::MAX);
        Self::new_of_length(lo, len)
    }

    pub fn new_of_length(lo: usize, len: u32) -> Span {
        Span { len, lo }
    }

    pub fn hi(self) -> usize {
        self.lo + self.len as usize
    }

    /// Returns a span which starts at `self` and ends at `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new_of_bounds(self.lo..other.hi().max(self.lo))
    }

    /// Returns the source text covered by the span.
    pub fn substr(self, src: &str) -> &str {
        let mut bounds = src
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(src.len()));
        let lo = bounds.nth(self.lo).unwrap_or(src.len());
        let hi = match (self.len as usize).checked_sub(1) {
            Some(rest) => bounds.nth(rest).unwrap_or(src.len()),
            None => lo,
        };
        &src[lo..hi]
    }

    pub fn wrap<T>(self, inner: T) -> Spanned<T> {
        Spanned { span: self, inner }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({self}, len: {})", self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.lo;
        let hi = self.hi();
        write!(f, "{lo}..{hi}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spanned<T> {
    pub span: Span,
    pub inner: T,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier(Box<str>),
    IntLiteral(Box<str>),
    FloatLiteral(Box<str>),
    /// The literal's contents, without the surrounding quotes.
    StringLiteral(Box<str>),
    Symbol(Symbol),
    /// Synthesized at the span of an ill-formed lexeme. Never stored in a
    /// [`TokenTable`].
    Error(Box<str>),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "keyword `{}`", k.as_str()),
            TokenKind::Identifier(name) => write!(f, "identifier `{name}`"),
            TokenKind::IntLiteral(text) => write!(f, "integer `{text}`"),
            TokenKind::FloatLiteral(text) => write!(f, "float `{text}`"),
            TokenKind::StringLiteral(text) => write!(f, "string {text:?}"),
            TokenKind::Symbol(s) => write!(f, "`{}`", s.as_str()),
            TokenKind::Error(text) => write!(f, "malformed lexeme {text:?}"),
        }
    }
}

macro_rules! lexeme_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }
        }
    };
}

lexeme_enum! {
    pub enum Keyword {
        Var => "var",
        Let => "let",
        Input => "input",
        If => "if",
        Else => "else",
        Switch => "switch",
        Case => "case",
        Default => "default",
        For => "for",
        While => "while",
        In => "in",
        Range => "range",
        Func => "func",
        Return => "return",
        Print => "print",
        VoidTy => "Void",
        IntTy => "Int",
        DoubleTy => "Double",
        StringTy => "String",
        BoolTy => "Bool",
        True => "true",
        False => "false",
    }
}

lexeme_enum! {
    pub enum Symbol {
        Plus => "+",
        Minus => "-",
        Star => "*",
        StarStar => "**",
        Slash => "/",
        Comma => ",",
        Colon => ":",
        Semicolon => ";",
        LParen => "(",
        RParen => ")",
        LBrace => "{",
        RBrace => "}",
        Assign => "=",
        EqEq => "==",
        NotEq => "!=",
        Less => "<",
        LessEq => "<=",
        Greater => ">",
        GreaterEq => ">=",
        Not => "!",
        AndAnd => "&&",
        OrOr => "||",
        Arrow => "->",
    }
}

pub static KEYWORDS: phf::Map<&'static str, Keyword> = phf::phf_map! {
    "var" => Keyword::Var,
    "let" => Keyword::Let,
    "input" => Keyword::Input,
    "if" => Keyword::If,
    "else" => Keyword::Else,
    "switch" => Keyword::Switch,
    "case" => Keyword::Case,
    "default" => Keyword::Default,
    "for" => Keyword::For,
    "while" => Keyword::While,
    "in" => Keyword::In,
    "range" => Keyword::Range,
    "func" => Keyword::Func,
    "return" => Keyword::Return,
    "print" => Keyword::Print,
    "Void" => Keyword::VoidTy,
    "Int" => Keyword::IntTy,
    "Double" => Keyword::DoubleTy,
    "String" => Keyword::StringTy,
    "Bool" => Keyword::BoolTy,
    "true" => Keyword::True,
    "false" => Keyword::False,
};

pub static SYMBOLS: phf::Map<&'static str, Symbol> = phf::phf_map! {
    "+" => Symbol::Plus,
    "-" => Symbol::Minus,
    "*" => Symbol::Star,
    "**" => Symbol::StarStar,
    "/" => Symbol::Slash,
    "," => Symbol::Comma,
    ":" => Symbol::Colon,
    ";" => Symbol::Semicolon,
    "(" => Symbol::LParen,
    ")" => Symbol::RParen,
    "{" => Symbol::LBrace,
    "}" => Symbol::RBrace,
    "=" => Symbol::Assign,
    "==" => Symbol::EqEq,
    "!=" => Symbol::NotEq,
    "<" => Symbol::Less,
    "<=" => Symbol::LessEq,
    ">" => Symbol::Greater,
    ">=" => Symbol::GreaterEq,
    "!" => Symbol::Not,
    "&&" => Symbol::AndAnd,
    "||" => Symbol::OrOr,
    "->" => Symbol::Arrow,
};

/// The lexer's output: tokens in source order, with strictly increasing,
/// non-overlapping spans.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenTable {
    tokens: Vec<Token>,
}

impl TokenTable {
    pub fn with_capacity(capacity: usize) -> TokenTable {
        TokenTable {
            tokens: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, token: Token) {
        debug_assert!(
            self.tokens.last().is_none_or(|last| last.span().hi() <= token.lo),
            "token spans must be increasing"
        );
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenTable {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
