use std::fmt;

use log::{debug, trace};

use crate::{
    ast::{
        Assign, BinaryOperator, Block, Branch, Call, Case, Comparator, Const, Decl, Expr,
        ExprKind, For, Func, Ident, If, Iterable, Literal, Param, Program, Range, Stmt, Switch,
        TopLevelStmt, TypeName, UnaryOperator, While,
    },
    ir::Ty,
    token::{Keyword, Span, Spanned, Symbol, Token, TokenKind, TokenTable},
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Parses a whole program.
///
/// On failure, the returned error is the one which got furthest into the
/// input, which might come from an alternative that was rolled back.
pub fn parse_program(tokens: &TokenTable) -> Result<Program> {
    let mut p = Parser::new(tokens.as_slice());
    let result = p.parse_program();
    result.map_err(|error| p.finish_error(error))
}

/// Parses a single expression which must span the whole input.
pub fn parse_expr(tokens: &TokenTable) -> Result<Expr> {
    let mut p = Parser::new(tokens.as_slice());
    let result = p.parse_expr().and_then(|expr| match p.peek() {
        Some(_) => Err(p.unexpected(Expected::Eof)),
        None => Ok(expr),
    });
    result.map_err(|error| p.finish_error(error))
}

struct Parser<'tok> {
    tokens: &'tok [Token],
    cursor: usize,
    checkpoints: Vec<Checkpoint>,
    /// The error which got furthest into the input, across every checkpoint.
    deepest: Option<Ranked>,
}

/// A saved cursor position, opened by [`Parser::speculate`].
#[derive(Debug)]
struct Checkpoint {
    cursor: usize,
    /// The highest ranked error seen while this checkpoint was open.
    best: Option<Ranked>,
}

#[derive(Debug)]
struct Ranked {
    error: Spanned<Error>,
    /// Tokens consumed from the checkpoint until the failure.
    len: usize,
    /// Token index of the failure.
    token: usize,
}

impl Checkpoint {
    /// Keeps the new error unless the current one got further, either
    /// relative to this checkpoint or in absolute terms.
    fn offer(&mut self, new: Ranked) {
        if let Some(old) = &self.best {
            if old.len > new.len || old.token > new.token {
                return;
            }
        }
        self.best = Some(new);
    }
}

impl Parser<'_> {
    fn parse_program(&mut self) -> Result<Program> {
        trace!("parse program");
        let mut stmts = Vec::new();
        while let Some(token) = self.peek() {
            let start = token.span();
            let stmt = self.parse_top_level_stmt()?;
            stmts.push(start.to(self.prev_span()).wrap(stmt));
        }
        Ok(Program { stmts })
    }

    fn parse_top_level_stmt(&mut self) -> Result<TopLevelStmt> {
        trace!("parse top level stmt");
        if self.is_keyword(Keyword::Let) {
            self.parse_decl(Keyword::Let).map(TopLevelStmt::Let)
        } else if self.is_keyword(Keyword::Func) {
            self.parse_func().map(TopLevelStmt::Func)
        } else {
            Err(self.unexpected(Expected::TopLevelStmt))
        }
    }

    /// Parses a `let` or a `var` declaration.
    fn parse_decl(&mut self, keyword: Keyword) -> Result<Decl> {
        trace!("parse {} stmt", keyword.as_str());
        self.consume_keyword(keyword)?;
        let name = self.parse_ident()?;
        let ty = if self.take(Symbol::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.consume(Symbol::Assign)?;
        let value = self.parse_expr()?;
        self.consume(Symbol::Semicolon)?;
        Ok(Decl { name, ty, value })
    }

    fn parse_func(&mut self) -> Result<Func> {
        trace!("parse func stmt");
        self.consume_keyword(Keyword::Func)?;
        let name = self.parse_ident()?;
        let params = self.parse_list(Self::parse_param)?;
        let ret = if self.take(Symbol::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Func {
            name,
            params,
            ret,
            body,
        })
    }

    fn parse_param(&mut self) -> Result<Param> {
        let name = self.parse_ident()?;
        self.consume(Symbol::Colon)?;
        let ty = self.parse_type()?;
        Ok(Param { name, ty })
    }

    fn parse_block(&mut self) -> Result<Block> {
        trace!("parse block");
        let open = self.consume(Symbol::LBrace)?.span();
        let mut stmts = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return Err(self.unexpected(Expected::Stmt));
            };
            if token.is_symbol(Symbol::RBrace) {
                break;
            }
            let start = token.span();
            let stmt = self.parse_stmt()?;
            stmts.push(start.to(self.prev_span()).wrap(stmt));
        }
        let close = self.consume(Symbol::RBrace)?.span();
        Ok(Block {
            stmts,
            span: open.to(close),
        })
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        let stmt = match self.peek_kind() {
            Some(TokenKind::Keyword(keyword)) => match keyword {
                Keyword::Let => Stmt::TopLevel(TopLevelStmt::Let(self.parse_decl(Keyword::Let)?)),
                Keyword::Var => Stmt::Var(self.parse_decl(Keyword::Var)?),
                Keyword::Print => self.parse_print()?,
                Keyword::Return => self.parse_return()?,
                Keyword::For => Stmt::For(self.parse_for()?),
                Keyword::While => Stmt::Branch(Branch::While(self.parse_while()?)),
                Keyword::If => Stmt::Branch(Branch::If(self.parse_if()?)),
                Keyword::Switch => Stmt::Branch(Branch::Switch(self.parse_switch()?)),
                _ => return Err(self.unexpected(Expected::Stmt)),
            },
            // An identifier starts either an assignment or a call.
            Some(TokenKind::Identifier(_)) => self.speculate(
                |p| p.parse_assign().map(Stmt::Assign),
                |p| p.parse_call_stmt().map(Stmt::FuncCall),
            )?,
            _ => return Err(self.unexpected(Expected::Stmt)),
        };
        Ok(stmt)
    }

    fn parse_print(&mut self) -> Result<Stmt> {
        trace!("parse print stmt");
        self.consume_keyword(Keyword::Print)?;
        let args = self.parse_list(Self::parse_expr)?;
        self.consume(Symbol::Semicolon)?;
        Ok(Stmt::Print(args))
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        trace!("parse return stmt");
        self.consume_keyword(Keyword::Return)?;
        if self.take(Symbol::Semicolon) {
            return Ok(Stmt::Return(None));
        }
        let value = self.parse_expr()?;
        self.consume(Symbol::Semicolon)?;
        Ok(Stmt::Return(Some(value)))
    }

    fn parse_assign(&mut self) -> Result<Assign> {
        trace!("parse assign stmt");
        let target = self.parse_ident()?;
        self.consume(Symbol::Assign)?;
        let value = self.parse_expr()?;
        self.consume(Symbol::Semicolon)?;
        Ok(Assign { target, value })
    }

    fn parse_call_stmt(&mut self) -> Result<Call> {
        trace!("parse call stmt");
        let callee = self.parse_ident()?;
        let args = self.parse_list(Self::parse_expr)?;
        self.consume(Symbol::Semicolon)?;
        Ok(Call { callee, args })
    }

    fn parse_for(&mut self) -> Result<For> {
        trace!("parse for stmt");
        self.consume_keyword(Keyword::For)?;
        let var = self.parse_ident()?;
        self.consume_keyword(Keyword::In)?;
        let iterable = if self.is_keyword(Keyword::Range) {
            let start = self.consume_keyword(Keyword::Range)?.span();
            self.consume(Symbol::LParen)?;
            let from = self.parse_int_const()?;
            self.consume(Symbol::Comma)?;
            let to = self.parse_int_const()?;
            self.consume(Symbol::Comma)?;
            let step = self.parse_int_const()?;
            self.consume(Symbol::RParen)?;
            Iterable::Range(Range {
                from,
                to,
                step,
                span: start.to(self.prev_span()),
            })
        } else {
            Iterable::Expr(self.parse_expr()?)
        };
        let body = self.parse_block()?;
        Ok(For {
            var,
            iterable,
            body,
        })
    }

    fn parse_while(&mut self) -> Result<While> {
        trace!("parse while stmt");
        self.consume_keyword(Keyword::While)?;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(While { cond, body })
    }

    fn parse_if(&mut self) -> Result<If> {
        trace!("parse if stmt");
        self.consume_keyword(Keyword::If)?;
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;
        if !self.take_keyword(Keyword::Else) {
            return Ok(If {
                cond,
                then_block,
                else_block: None,
            });
        }
        let else_block = if self.is_keyword(Keyword::If) {
            let start = self.peek_span();
            let nested = self.parse_if()?;
            let span = start.to(self.prev_span());
            Block {
                stmts: vec![span.wrap(Stmt::Branch(Branch::If(nested)))],
                span,
            }
        } else {
            self.parse_block()?
        };
        Ok(If {
            cond,
            then_block,
            else_block: Some(else_block),
        })
    }

    fn parse_switch(&mut self) -> Result<Switch> {
        trace!("parse switch stmt");
        self.consume_keyword(Keyword::Switch)?;
        let subject = self.parse_expr()?;
        self.consume(Symbol::LBrace)?;
        let mut cases = Vec::new();
        loop {
            let start = self.peek_span();
            let comparator = match self.peek_kind() {
                Some(TokenKind::Keyword(Keyword::Case)) => {
                    self.advance();
                    Some(self.parse_comparator()?)
                }
                Some(TokenKind::Keyword(Keyword::Default)) => {
                    self.advance();
                    None
                }
                Some(TokenKind::Symbol(Symbol::RBrace)) => {
                    self.advance();
                    break;
                }
                _ => return Err(self.unexpected(Expected::Case)),
            };
            let body = self.parse_block()?;
            cases.push(Case {
                comparator,
                body,
                span: start.to(self.prev_span()),
            });
        }
        Ok(Switch { subject, cases })
    }

    fn parse_comparator(&mut self) -> Result<Comparator> {
        trace!("parse comparator");
        if self.is_keyword(Keyword::Range) {
            let start = self.consume_keyword(Keyword::Range)?.span();
            self.consume(Symbol::LParen)?;
            let lo = self.parse_int_const()?;
            self.consume(Symbol::Comma)?;
            let hi = self.parse_int_const()?;
            self.consume(Symbol::RParen)?;
            let span = start.to(self.prev_span());
            return Ok(Comparator::Range { lo, hi, span });
        }
        let first = self.parse_const()?;
        if !self.is(Symbol::Comma) {
            return Ok(Comparator::Const(first));
        }
        let mut seq = vec![first];
        while self.take(Symbol::Comma) {
            seq.push(self.parse_const()?);
        }
        Ok(Comparator::Seq(seq))
    }

    /// Parses a literal, with an optional leading minus for numbers.
    fn parse_const(&mut self) -> Result<Const> {
        let start = self.peek_span();
        let negative = self.take(Symbol::Minus);
        let lit = match self.peek_kind() {
            Some(TokenKind::IntLiteral(text)) => Literal::Int(self.parse_int(text, negative)?),
            Some(TokenKind::FloatLiteral(text)) => {
                let value = self.parse_float(text)?;
                Literal::Float(if negative { -value } else { value })
            }
            Some(TokenKind::StringLiteral(text)) if !negative => Literal::String(text.clone()),
            Some(TokenKind::Keyword(Keyword::True)) if !negative => Literal::Bool(true),
            Some(TokenKind::Keyword(Keyword::False)) if !negative => Literal::Bool(false),
            _ => return Err(self.unexpected(Expected::Const)),
        };
        self.advance();
        Ok(Const {
            lit,
            span: start.to(self.prev_span()),
        })
    }

    /// Parses an integer literal, with an optional leading minus.
    fn parse_int_const(&mut self) -> Result<i64> {
        let negative = self.take(Symbol::Minus);
        let Some(TokenKind::IntLiteral(text)) = self.peek_kind() else {
            return Err(self.unexpected(Expected::IntLiteral));
        };
        let value = self.parse_int(text, negative)?;
        self.advance();
        Ok(value)
    }

    fn parse_type(&mut self) -> Result<TypeName> {
        let ty = match self.peek_kind() {
            Some(TokenKind::Keyword(Keyword::IntTy)) => Ty::Int,
            Some(TokenKind::Keyword(Keyword::DoubleTy)) => Ty::Float,
            Some(TokenKind::Keyword(Keyword::StringTy)) => Ty::String,
            Some(TokenKind::Keyword(Keyword::BoolTy)) => Ty::Bool,
            Some(TokenKind::Keyword(Keyword::VoidTy)) => Ty::Void,
            _ => return Err(self.unexpected(Expected::Type)),
        };
        let span = self.peek_span();
        self.advance();
        Ok(TypeName { ty, span })
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        let Some(TokenKind::Identifier(name)) = self.peek_kind() else {
            return Err(self.unexpected(Expected::Ident));
        };
        let name = name.clone();
        let span = self.peek_span();
        self.advance();
        Ok(Ident { name, span })
    }

    /// Parses `'(' [item (',' item)* [',']] ')'`.
    fn parse_list<T>(&mut self, parse_item: impl Fn(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        self.consume(Symbol::LParen)?;
        let mut items = Vec::new();
        while !self.take(Symbol::RParen) {
            if self.is(Symbol::Comma) {
                return Err(self.unexpected(Expected::ListItem));
            }
            items.push(parse_item(self)?);
            // After an item, there must be either a separator or the end.
            if !self.take(Symbol::Comma) && !self.is(Symbol::RParen) {
                return Err(self.unexpected(Expected::Separator));
            }
        }
        Ok(items)
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        trace!("parse expr");
        self.parse_logic()
    }

    fn parse_logic(&mut self) -> Result<Expr> {
        const OPS: &[(Symbol, BinaryOperator)] = &[
            (Symbol::AndAnd, BinaryOperator::And),
            (Symbol::OrOr, BinaryOperator::Or),
        ];
        self.parse_left_assoc(OPS, Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        const OPS: &[(Symbol, BinaryOperator)] = &[
            (Symbol::EqEq, BinaryOperator::Eq),
            (Symbol::NotEq, BinaryOperator::Ne),
            (Symbol::Less, BinaryOperator::Lt),
            (Symbol::LessEq, BinaryOperator::Le),
            (Symbol::Greater, BinaryOperator::Gt),
            (Symbol::GreaterEq, BinaryOperator::Ge),
        ];
        self.parse_left_assoc(OPS, Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        const OPS: &[(Symbol, BinaryOperator)] = &[
            (Symbol::Plus, BinaryOperator::Add),
            (Symbol::Minus, BinaryOperator::Sub),
        ];
        self.parse_left_assoc(OPS, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        const OPS: &[(Symbol, BinaryOperator)] = &[
            (Symbol::Star, BinaryOperator::Mul),
            (Symbol::Slash, BinaryOperator::Div),
        ];
        self.parse_left_assoc(OPS, Self::parse_power)
    }

    /// Parses `operand (op operand)*`, nesting to the left.
    fn parse_left_assoc(
        &mut self,
        ops: &[(Symbol, BinaryOperator)],
        parse_operand: fn(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut lhs = parse_operand(self)?;
        while let Some(op) = self.take_operator(ops) {
            let rhs = parse_operand(self)?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_power(&mut self) -> Result<Expr> {
        trace!("parse power expr");
        let lhs = self.parse_unary()?;
        if self.take(Symbol::StarStar) {
            let rhs = self.parse_power()?;
            return Ok(binary(BinaryOperator::Pow, lhs, rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek_kind() {
            Some(TokenKind::Symbol(Symbol::Plus)) => UnaryOperator::Plus,
            Some(TokenKind::Symbol(Symbol::Minus)) => UnaryOperator::Minus,
            Some(TokenKind::Symbol(Symbol::Not)) => UnaryOperator::Not,
            _ => return self.parse_primary(),
        };
        let start = self.peek_span();
        self.advance();
        let expr = self.parse_unary()?;
        Ok(Expr {
            span: start.to(expr.span),
            kind: ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
        })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        trace!("parse primary expr");
        let span = self.peek_span();
        let lit = match self.peek_kind() {
            Some(TokenKind::IntLiteral(text)) => Literal::Int(self.parse_int(text, false)?),
            Some(TokenKind::FloatLiteral(text)) => Literal::Float(self.parse_float(text)?),
            Some(TokenKind::StringLiteral(text)) => Literal::String(text.clone()),
            Some(TokenKind::Keyword(Keyword::True)) => Literal::Bool(true),
            Some(TokenKind::Keyword(Keyword::False)) => Literal::Bool(false),
            Some(TokenKind::Keyword(Keyword::Input)) => {
                self.advance();
                let callee = Ident {
                    name: Keyword::Input.as_str().into(),
                    span,
                };
                let args = self.parse_list(Self::parse_expr)?;
                return Ok(Expr {
                    kind: ExprKind::Call(Call { callee, args }),
                    span: span.to(self.prev_span()),
                });
            }
            Some(TokenKind::Symbol(Symbol::LParen)) => {
                self.advance();
                let expr = self.parse_expr()?;
                let close = self.consume(Symbol::RParen)?.span();
                return Ok(Expr {
                    span: span.to(close),
                    ..expr
                });
            }
            // An identifier is either a call or a plain name.
            Some(TokenKind::Identifier(_)) => {
                return self.speculate(Self::parse_call_expr, Self::parse_ident_expr);
            }
            _ => return Err(self.unexpected(Expected::Expr)),
        };
        self.advance();
        Ok(Expr {
            kind: ExprKind::Literal(lit),
            span,
        })
    }

    fn parse_call_expr(&mut self) -> Result<Expr> {
        trace!("parse call expr");
        let callee = self.parse_ident()?;
        let args = self.parse_list(Self::parse_expr)?;
        let span = callee.span.to(self.prev_span());
        Ok(Expr {
            kind: ExprKind::Call(Call { callee, args }),
            span,
        })
    }

    fn parse_ident_expr(&mut self) -> Result<Expr> {
        trace!("parse ident expr");
        let Ident { name, span } = self.parse_ident()?;
        Ok(Expr {
            kind: ExprKind::Ident(name),
            span,
        })
    }

    fn parse_int(&self, text: &str, negative: bool) -> Result<i64> {
        let parsed = if negative {
            format!("-{text}").parse()
        } else {
            text.parse()
        };
        parsed.map_err(|_| {
            self.peek_span().wrap(Error::LiteralOutOfRange {
                literal: text.into(),
            })
        })
    }

    fn parse_float(&self, text: &str) -> Result<f64> {
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.peek_span().wrap(Error::LiteralOutOfRange {
                literal: text.into(),
            })),
        }
    }
}

fn binary(op: BinaryOperator, lhs: Expr, rhs: Expr) -> Expr {
    Expr {
        span: lhs.span.to(rhs.span),
        kind: ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
    }
}

// Speculative parsing.
impl Parser<'_> {
    /// Tries `first`; if it fails, rolls the cursor back and tries `second`,
    /// whose failure is final. The returned error is the highest ranked one
    /// seen by either alternative.
    fn speculate<T>(
        &mut self,
        first: impl FnOnce(&mut Self) -> Result<T>,
        second: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.checkpoint();
        match first(self) {
            Ok(parsed) => {
                self.commit();
                return Ok(parsed);
            }
            Err(error) => self.rollback(error),
        }
        match second(self) {
            Ok(parsed) => {
                self.commit();
                Ok(parsed)
            }
            Err(error) => Err(self.abandon(error)),
        }
    }

    fn checkpoint(&mut self) {
        debug!("checkpoint at token {}", self.cursor);
        self.checkpoints.push(Checkpoint {
            cursor: self.cursor,
            best: None,
        });
    }

    /// Closes the innermost checkpoint after a successful alternative. Its
    /// best error is handed to the enclosing checkpoint, if any.
    fn commit(&mut self) {
        let Some(frame) = self.checkpoints.pop() else {
            return;
        };
        debug!("commit checkpoint at token {}", frame.cursor);
        if let (Some(best), Some(parent)) = (frame.best, self.checkpoints.last_mut()) {
            parent.offer(Ranked {
                len: best.token.saturating_sub(parent.cursor),
                ..best
            });
        }
    }

    /// Records the error in the innermost checkpoint and restores its cursor.
    fn rollback(&mut self, error: Spanned<Error>) {
        debug!("rollback at token {}: {:?}", self.cursor, error.inner);
        self.record(error);
        if let Some(frame) = self.checkpoints.last() {
            self.cursor = frame.cursor;
        }
    }

    /// Closes the innermost checkpoint after every alternative failed,
    /// returning its best error.
    fn abandon(&mut self, error: Spanned<Error>) -> Spanned<Error> {
        debug!("abandon at token {}: {:?}", self.cursor, error.inner);
        self.record(error.clone());
        self.checkpoints
            .pop()
            .and_then(|frame| frame.best)
            .map_or(error, |best| best.error)
    }

    fn record(&mut self, error: Spanned<Error>) {
        let token = self.cursor;
        let Some(frame) = self.checkpoints.last_mut() else {
            return;
        };
        let ranked = Ranked {
            error,
            len: token.saturating_sub(frame.cursor),
            token,
        };
        if self.deepest.as_ref().is_none_or(|deepest| deepest.token <= token) {
            self.deepest = Some(Ranked {
                error: ranked.error.clone(),
                ..ranked
            });
        }
        frame.offer(ranked);
    }

    /// Picks the error to report once the parse as a whole has failed.
    fn finish_error(&mut self, error: Spanned<Error>) -> Spanned<Error> {
        match self.deepest.take() {
            Some(deepest) if deepest.token > self.cursor => deepest.error,
            _ => error,
        }
    }
}

// Token helpers.
impl<'tok> Parser<'tok> {
    fn new(tokens: &'tok [Token]) -> Parser<'tok> {
        Parser {
            tokens,
            cursor: 0,
            checkpoints: Vec::with_capacity(8),
            deepest: None,
        }
    }

    /// Returns the current token, if any.
    fn peek(&self) -> Option<&'tok Token> {
        self.tokens.get(self.cursor)
    }

    fn peek_kind(&self) -> Option<&'tok TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    /// Returns the current token's span, or an empty span at the end of the
    /// input.
    fn peek_span(&self) -> Span {
        self.peek().map_or_else(|| self.eof_span(), Token::span)
    }

    /// Returns the span of the last consumed token.
    fn prev_span(&self) -> Span {
        match self.cursor.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span(),
            None => Span::new_of_length(0, 0),
        }
    }

    fn eof_span(&self) -> Span {
        let hi = self.tokens.last().map_or(0, |token| token.span().hi());
        Span::new_of_length(hi, 0)
    }

    /// Returns the current token and advances.
    fn advance(&mut self) -> Option<&'tok Token> {
        let token = self.peek()?;
        self.cursor += 1;
        Some(token)
    }

    fn is(&self, symbol: Symbol) -> bool {
        self.peek().is_some_and(|token| token.is_symbol(symbol))
    }

    fn is_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_some_and(|token| token.is_keyword(keyword))
    }

    /// Advances if the current token is the provided symbol.
    fn take(&mut self, symbol: Symbol) -> bool {
        let is = self.is(symbol);
        if is {
            self.advance();
        }
        is
    }

    fn take_keyword(&mut self, keyword: Keyword) -> bool {
        let is = self.is_keyword(keyword);
        if is {
            self.advance();
        }
        is
    }

    /// Advances if the current token is one of the provided operators.
    fn take_operator(&mut self, ops: &[(Symbol, BinaryOperator)]) -> Option<BinaryOperator> {
        let &(_, op) = ops.iter().find(|&&(symbol, _)| self.is(symbol))?;
        self.advance();
        Some(op)
    }

    /// Advances if the current token is the provided symbol. If not, returns an
    /// error.
    fn consume(&mut self, symbol: Symbol) -> Result<&'tok Token> {
        match self.peek() {
            Some(token) if token.is_symbol(symbol) => {
                self.cursor += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(Expected::Symbol(symbol))),
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<&'tok Token> {
        match self.peek() {
            Some(token) if token.is_keyword(keyword) => {
                self.cursor += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(Expected::Keyword(keyword))),
        }
    }

    /// Builds an error at the current token, which is left unconsumed.
    fn unexpected(&self, expected: Expected) -> Spanned<Error> {
        match self.peek() {
            Some(token) => token.span().wrap(Error::Unexpected {
                found: token.kind.clone(),
                expected,
            }),
            None => self.eof_span().wrap(Error::UnexpectedEof { expected }),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Unexpected { found: TokenKind, expected: Expected },
    UnexpectedEof { expected: Expected },
    LiteralOutOfRange { literal: Box<str> },
}

impl Error {
    pub fn message(&self) -> String {
        match self {
            Error::Unexpected { found, .. } => format!("unexpected {found}"),
            Error::UnexpectedEof { .. } => "unexpected end of input".into(),
            Error::LiteralOutOfRange { literal } => {
                format!("literal `{literal}` is out of range")
            }
        }
    }

    pub fn hint(&self) -> String {
        match self {
            Error::Unexpected { expected, .. } | Error::UnexpectedEof { expected } => {
                expected.to_string()
            }
            Error::LiteralOutOfRange { .. } => {
                "integers must fit in 64 bits and floats must be finite".into()
            }
        }
    }
}

/// What the parser was looking for when it failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    Symbol(Symbol),
    Keyword(Keyword),
    Ident,
    IntLiteral,
    Type,
    Expr,
    Stmt,
    TopLevelStmt,
    Const,
    Case,
    /// An argument or parameter, before a comma.
    ListItem,
    /// A comma or the closing parenthesis, after a list item.
    Separator,
    Eof,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Symbol(symbol) => write!(f, "expected `{}`", symbol.as_str()),
            Expected::Keyword(keyword) => write!(f, "expected `{}`", keyword.as_str()),
            Expected::Ident => f.write_str("expected an identifier"),
            Expected::IntLiteral => f.write_str("expected an integer literal"),
            Expected::Type => f.write_str("expected a type (`Int`, `Double`, `String`, `Bool` or `Void`)"),
            Expected::Expr => f.write_str("expected an expression"),
            Expected::Stmt => f.write_str("expected a statement or `}`"),
            Expected::TopLevelStmt => f.write_str("expected `let` or `func`"),
            Expected::Const => f.write_str("expected a constant"),
            Expected::Case => f.write_str("expected `case`, `default` or `}`"),
            Expected::ListItem => f.write_str("`,` can only follow an item"),
            Expected::Separator => f.write_str("expected `,` or `)`"),
            Expected::Eof => f.write_str("expected end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::util::test_utils::tree_tests;

    tree_tests!(
        use parser;

        fn test_literals() {
            let expr = "f(1, 2.5, \"hi\", true, false)";
            let tree_ok = r#"
                call f (0..28)
                  int 1 (2..3)
                  float 2.5 (5..8)
                  string "hi" (10..14)
                  bool true (16..20)
                  bool false (22..27)
            "#;
        }

        fn test_left_assoc_additive() {
            let program = "let x = 5 - 7 + 2 - 3;";
            let tree_ok = "
                let x (0..22)
                  binary Sub (8..21)
                    binary Add (8..17)
                      binary Sub (8..13)
                        int 5 (8..9)
                        int 7 (12..13)
                      int 2 (16..17)
                    int 3 (20..21)
            ";
        }

        fn test_right_assoc_power() {
            let program = "let x = 2 ** 3 ** 4;";
            let tree_ok = "
                let x (0..20)
                  binary Pow (8..19)
                    int 2 (8..9)
                    binary Pow (13..19)
                      int 3 (13..14)
                      int 4 (18..19)
            ";
        }

        fn test_mul_binds_tighter_than_add() {
            let program = "let x = a + b * c;";
            let tree_ok = "
                let x (0..18)
                  binary Add (8..17)
                    ident a (8..9)
                    binary Mul (12..17)
                      ident b (12..13)
                      ident c (16..17)
            ";
        }

        fn test_parens_and_unary() {
            let expr = "-(a + b) * !c";
            let tree_ok = "
                binary Mul (0..13)
                  unary Minus (0..8)
                    binary Add (1..8)
                      ident a (2..3)
                      ident b (6..7)
                  unary Not (11..13)
                    ident c (12..13)
            ";
        }

        fn test_unary_binds_tighter_than_power() {
            let expr = "-2 ** 2";
            let tree_ok = "
                binary Pow (0..7)
                  unary Minus (0..2)
                    int 2 (1..2)
                  int 2 (6..7)
            ";
        }

        fn test_logic_and_relational() {
            let expr = "a < b && c == d || e";
            let tree_ok = "
                binary Or (0..20)
                  binary And (0..15)
                    binary Lt (0..5)
                      ident a (0..1)
                      ident b (4..5)
                    binary Eq (9..15)
                      ident c (9..10)
                      ident d (14..15)
                  ident e (19..20)
            ";
        }

        fn test_call_and_input_exprs() {
            let expr = "f(g(x), input(),) + y";
            let tree_ok = "
                binary Add (0..21)
                  call f (0..17)
                    call g (2..6)
                      ident x (4..5)
                    call input (8..15)
                  ident y (20..21)
            ";
        }

        fn test_call_statement_and_assignment() {
            let program = "
                func main() {
                    var f = 0;
                    f();
                    f = 1;
                }
            ";
            let tree_ok = "
                func main() (0..50)
                  var f (18..28)
                    int 0 (26..27)
                  call f (33..37)
                  assign f (42..48)
                    int 1 (46..47)
            ";
        }

        fn test_func_with_params_and_return() {
            let program = "
                func add(a: Int, b: Double,) -> Double {
                    return a + b;
                }
                let r: Double = add(1, 2.0);
            ";
            let tree_ok = "
                func add(a: Int, b: Double) -> Double (0..60)
                  return (45..58)
                    binary Add (52..57)
                      ident a (52..53)
                      ident b (56..57)
                let r: Double (61..89)
                  call add (77..88)
                    int 1 (81..82)
                    float 2.0 (84..87)
            ";
        }

        fn test_print_and_empty_return() {
            let program = "
                func f() -> Void {
                    print(\"a\", 1);
                    return;
                }
            ";
            let tree_ok = r#"
                func f() -> Void (0..51)
                  print (23..37)
                    string "a" (29..32)
                    int 1 (34..35)
                  return (42..49)
            "#;
        }

        fn test_for_loops() {
            let program = "
                func f(s: String) {
                    for i in range(0, -10, -2) { print(i); }
                    for c in s { print(c); }
                }
            ";
            let tree_ok = "
                func f(s: String) (0..95)
                  for i (24..64)
                    range 0 -10 -2 (33..50)
                    body
                      print (53..62)
                        ident i (59..60)
                  for c (69..93)
                    ident s (78..79)
                    body
                      print (82..91)
                        ident c (88..89)
            ";
        }

        fn test_if_else_if_chain() {
            let program = "
                func f(x: Int) {
                    if x > 0 { print(1); } else if x < 0 { print(2); } else { print(3); }
                }
            ";
            let tree_ok = "
                func f(x: Int) (0..92)
                  if (21..90)
                    binary Gt (24..29)
                      ident x (24..25)
                      int 0 (28..29)
                    then
                      print (32..41)
                        int 1 (38..39)
                    else
                      if (49..90)
                        binary Lt (52..57)
                          ident x (52..53)
                          int 0 (56..57)
                        then
                          print (60..69)
                            int 2 (66..67)
                        else
                          print (79..88)
                            int 3 (85..86)
            ";
        }

        fn test_while() {
            let program = "
                func f() {
                    var i = 0;
                    while i < 3 { i = i + 1; }
                }
            ";
            let tree_ok = "
                func f() (0..58)
                  var i (15..25)
                    int 0 (23..24)
                  while (30..56)
                    binary Lt (36..41)
                      ident i (36..37)
                      int 3 (40..41)
                    body
                      assign i (44..54)
                        binary Add (48..53)
                          ident i (48..49)
                          int 1 (52..53)
            ";
        }

        fn test_switch() {
            let program = "
                func f(x: Int) {
                    switch x {
                        case 1 { print(1); }
                        case 2, -3 { print(2); }
                        case range(10, 20) { print(3); }
                        default { print(4); }
                    }
                }
            ";
            let tree_ok = "
                func f(x: Int) (0..172)
                  switch (21..170)
                    ident x (28..29)
                    case 1 (40..60)
                      print (49..58)
                        int 1 (55..56)
                    case 2, -3 (69..93)
                      print (82..91)
                        int 2 (88..89)
                    case range(10, 20) (102..134)
                      print (123..132)
                        int 3 (129..130)
                    default (143..164)
                      print (153..162)
                        int 4 (159..160)
            ";
        }

        fn test_speculative_failure_reports_deepest_error() {
            let program = "func f() { x = ; }";
            let expected_errors = &["1,16..1,16: unexpected `;`. Hint: expected an expression"];
        }

        fn test_call_statement_failure_is_reported() {
            let program = "func f() { g(1 2); }";
            let expected_errors = &["1,16..1,16: unexpected integer `2`. Hint: expected `,` or `)`"];
        }

        fn test_rolled_back_call_expr_error_is_reported() {
            let program = "let x = f(1;";
            let expected_errors = &["1,12..1,12: unexpected `;`. Hint: expected `,` or `)`"];
        }

        fn test_missing_semicolon_at_end() {
            let program = "let x = y";
            let expected_errors = &["1,10..1,10: unexpected end of input. Hint: expected `;`"];
        }

        fn test_leading_comma() {
            let program = "let x = f(, 1);";
            let expected_errors = &["1,11..1,11: unexpected `,`. Hint: `,` can only follow an item"];
        }

        fn test_bad_top_level_stmt() {
            let program = "var x = 1;";
            let expected_errors = &["1,1..1,3: unexpected keyword `var`. Hint: expected `let` or `func`"];
        }

        fn test_int_out_of_range() {
            let program = "let x = 99999999999999999999;";
            let expected_errors = &[
                "1,9..1,28: literal `99999999999999999999` is out of range. Hint: integers must fit in 64 bits and floats must be finite"
            ];
        }

        fn test_bad_type() {
            let program = "let x: Float = 1.0;";
            let expected_errors = &[
                "1,8..1,12: unexpected identifier `Float`. Hint: expected a type (`Int`, `Double`, `String`, `Bool` or `Void`)"
            ];
        }

        fn test_bad_case() {
            let program = "func f(x: Int) { switch x { print(x); } }";
            let expected_errors = &["1,29..1,33: unexpected keyword `print`. Hint: expected `case`, `default` or `}`"];
        }
    );
}
