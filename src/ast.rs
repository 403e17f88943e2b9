// program ::= top_stmt*
// top_stmt ::= let_stmt | func_stmt
// let_stmt ::= 'let' ID [':' TYPE] '=' expr ';'
// var_stmt ::= 'var' ID [':' TYPE] '=' expr ';'
// func_stmt ::= 'func' ID '(' [param (',' param)* [',']] ')' ['->' TYPE] block
// param ::= ID ':' TYPE
// block ::= '{' stmt* '}'
// stmt ::= let_stmt
//        | var_stmt
//        | 'print' args ';'
//        | 'return' [expr] ';'
//        | ID '=' expr ';'
//        | ID args ';'
//        | 'for' ID 'in' ('range' '(' INT ',' INT ',' INT ')' | expr) block
//        | 'while' expr block
//        | if_stmt
//        | 'switch' expr '{' case* '}'
// if_stmt ::= 'if' expr block ['else' (block | if_stmt)]
// case ::= 'case' comparator block | 'default' block
// comparator ::= 'range' '(' INT ',' INT ')' | const (',' const)*
// const ::= ['-'] INT | ['-'] FLOAT | STRING | 'true' | 'false'
// args ::= '(' [expr (',' expr)* [',']] ')'
// expr ::= rel (('&&' | '||') rel)*
// rel ::= add (('==' | '!=' | '<' | '<=' | '>' | '>=') add)*
// add ::= mul (('+' | '-') mul)*
// mul ::= pow (('*' | '/') pow)*
// pow ::= unary ['**' pow]
// unary ::= ('+' | '-' | '!') unary | primary
// primary ::= INT | FLOAT | STRING | 'true' | 'false' | '(' expr ')'
//           | 'input' args | ID args | ID

// Precedence (tightest first)
//
// + - ! (prefix)
// ** (right-associative)
// * /
// + -
// == != < <= > >=
// && ||

use crate::{
    ir::Ty,
    token::{Span, Spanned},
};

#[derive(Debug, PartialEq, Default)]
pub struct Program {
    pub stmts: Vec<Spanned<TopLevelStmt>>,
}

#[derive(Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
    /// From the opening brace to the closing one.
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum TopLevelStmt {
    Let(Decl),
    Func(Func),
}

#[derive(Debug, PartialEq)]
pub enum Stmt {
    TopLevel(TopLevelStmt),
    Var(Decl),
    Assign(Assign),
    Print(Vec<Expr>),
    Return(Option<Expr>),
    FuncCall(Call),
    For(For),
    Branch(Branch),
}

/// A `let` or `var` declaration.
#[derive(Debug, PartialEq)]
pub struct Decl {
    pub name: Ident,
    pub ty: Option<TypeName>,
    pub value: Expr,
}

#[derive(Debug, PartialEq)]
pub struct Func {
    pub name: Ident,
    pub params: Vec<Param>,
    pub ret: Option<TypeName>,
    pub body: Block,
}

#[derive(Debug, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeName,
}

#[derive(Debug, PartialEq)]
pub struct Assign {
    pub target: Ident,
    pub value: Expr,
}

#[derive(Debug, PartialEq)]
pub struct Call {
    pub callee: Ident,
    pub args: Vec<Expr>,
}

#[derive(Debug, PartialEq)]
pub struct For {
    pub var: Ident,
    pub iterable: Iterable,
    pub body: Block,
}

#[derive(Debug, PartialEq)]
pub enum Iterable {
    Range(Range),
    Expr(Expr),
}

/// `range(from, to, step)`.
#[derive(Debug, PartialEq)]
pub struct Range {
    pub from: i64,
    pub to: i64,
    pub step: i64,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum Branch {
    If(If),
    While(While),
    Switch(Switch),
}

#[derive(Debug, PartialEq)]
pub struct If {
    pub cond: Expr,
    pub then_block: Block,
    /// An `else if` is kept as an `else` block whose sole statement is the
    /// nested `if`.
    pub else_block: Option<Block>,
}

#[derive(Debug, PartialEq)]
pub struct While {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Debug, PartialEq)]
pub struct Switch {
    pub subject: Expr,
    pub cases: Vec<Case>,
}

#[derive(Debug, PartialEq)]
pub struct Case {
    /// `None` for the `default` case.
    pub comparator: Option<Comparator>,
    pub body: Block,
    /// From the `case` (or `default`) keyword to the closing brace.
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum Comparator {
    Const(Const),
    /// Two or more constants.
    Seq(Vec<Const>),
    /// `range(lo, hi)`, matching `lo <= subject < hi`.
    Range { lo: i64, hi: i64, span: Span },
}

#[derive(Debug, PartialEq)]
pub struct Const {
    pub lit: Literal,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(Box<str>),
    Call(Call),
    Unary {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(Box<str>),
    Bool(bool),
}

impl Literal {
    pub fn ty(&self) -> Ty {
        match self {
            Literal::Int(_) => Ty::Int,
            Literal::Float(_) => Ty::Float,
            Literal::String(_) => Ty::String,
            Literal::Bool(_) => Ty::Bool,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

impl UnaryOperator {
    /// The operator's name in the operator table.
    pub fn op_name(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "u+",
            UnaryOperator::Minus => "u-",
            UnaryOperator::Not => "!",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOperator {
    /// The operator's name in the operator table.
    pub fn op_name(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Pow => "**",
            Eq => "==",
            Ne => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            And => "&&",
            Or => "||",
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct TypeName {
    pub ty: Ty,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: Box<str>,
    pub span: Span,
}
