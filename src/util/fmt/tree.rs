use std::fmt::{self, Write};

use crate::{
    ast::*,
    ir::{Entry, Ir, Scope, Scoped, Ty, Value, Var},
    token::{Span, TokenTable},
};

const INDENT_WIDTH: usize = 2;

/// Adapts a printing function to [`fmt::Display`].
struct Render<F>(F);

impl<F> fmt::Display for Render<F>
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

pub fn print_tokens_string(tokens: &TokenTable) -> String {
    Render(|f: &mut fmt::Formatter<'_>| print_tokens(f, tokens)).to_string()
}

pub fn print_program_string(program: &Program) -> String {
    Render(|f: &mut fmt::Formatter<'_>| print_program(f, program)).to_string()
}

pub fn print_expr_string(expr: &Expr) -> String {
    Render(|f: &mut fmt::Formatter<'_>| print_expr(f, 0, expr)).to_string()
}

pub fn print_ir_string(ir: &Ir) -> String {
    Render(|f: &mut fmt::Formatter<'_>| print_ir(f, ir)).to_string()
}

pub fn print_tokens(w: &mut impl Write, tokens: &TokenTable) -> fmt::Result {
    for token in tokens {
        writeln!(w, "{} {}", token.span(), token.kind)?;
    }
    Ok(())
}

pub fn print_program(w: &mut impl Write, program: &Program) -> fmt::Result {
    for stmt in &program.stmts {
        sp(w, 0)?;
        print_top_level_stmt(w, 0, &stmt.inner, stmt.span)?;
    }
    Ok(())
}

/// Prints a declaration whose indentation has already been written.
fn print_top_level_stmt(
    w: &mut impl Write,
    i: usize,
    stmt: &TopLevelStmt,
    span: Span,
) -> fmt::Result {
    match stmt {
        TopLevelStmt::Let(decl) => print_decl(w, i, "let", decl, span),
        TopLevelStmt::Func(func) => {
            write!(w, "func {}(", func.name.name)?;
            for (idx, param) in func.params.iter().enumerate() {
                if idx > 0 {
                    write!(w, ", ")?;
                }
                write!(w, "{}: {}", param.name.name, param.ty.ty)?;
            }
            write!(w, ")")?;
            if let Some(ret) = &func.ret {
                write!(w, " -> {}", ret.ty)?;
            }
            writeln!(w, " ({span})")?;
            print_stmts(w, i + 1, &func.body)
        }
    }
}

fn print_decl(
    w: &mut impl Write,
    i: usize,
    keyword: &str,
    decl: &Decl,
    span: Span,
) -> fmt::Result {
    write!(w, "{keyword} {}", decl.name.name)?;
    if let Some(ty) = &decl.ty {
        write!(w, ": {}", ty.ty)?;
    }
    writeln!(w, " ({span})")?;
    print_expr(w, i + 1, &decl.value)
}

fn print_stmts(w: &mut impl Write, i: usize, block: &Block) -> fmt::Result {
    for stmt in &block.stmts {
        print_stmt(w, i, &stmt.inner, stmt.span)?;
    }
    Ok(())
}

/// Prints a label line followed by the block's statements, one level deeper.
fn print_labeled_block(w: &mut impl Write, i: usize, label: &str, block: &Block) -> fmt::Result {
    sp(w, i)?;
    writeln!(w, "{label}")?;
    print_stmts(w, i + 1, block)
}

fn print_stmt(w: &mut impl Write, i: usize, stmt: &Stmt, span: Span) -> fmt::Result {
    sp(w, i)?;
    match stmt {
        Stmt::TopLevel(stmt) => print_top_level_stmt(w, i, stmt, span)?,
        Stmt::Var(decl) => print_decl(w, i, "var", decl, span)?,
        Stmt::Assign(Assign { target, value }) => {
            writeln!(w, "assign {} ({span})", target.name)?;
            print_expr(w, i + 1, value)?;
        }
        Stmt::Print(args) => {
            writeln!(w, "print ({span})")?;
            for arg in args {
                print_expr(w, i + 1, arg)?;
            }
        }
        Stmt::Return(value) => {
            writeln!(w, "return ({span})")?;
            if let Some(value) = value {
                print_expr(w, i + 1, value)?;
            }
        }
        Stmt::FuncCall(Call { callee, args }) => {
            writeln!(w, "call {} ({span})", callee.name)?;
            for arg in args {
                print_expr(w, i + 1, arg)?;
            }
        }
        Stmt::For(For {
            var,
            iterable,
            body,
        }) => {
            writeln!(w, "for {} ({span})", var.name)?;
            match iterable {
                Iterable::Range(Range {
                    from,
                    to,
                    step,
                    span,
                }) => {
                    sp(w, i + 1)?;
                    writeln!(w, "range {from} {to} {step} ({span})")?;
                }
                Iterable::Expr(expr) => print_expr(w, i + 1, expr)?,
            }
            print_labeled_block(w, i + 1, "body", body)?;
        }
        Stmt::Branch(Branch::While(While { cond, body })) => {
            writeln!(w, "while ({span})")?;
            print_expr(w, i + 1, cond)?;
            print_labeled_block(w, i + 1, "body", body)?;
        }
        Stmt::Branch(Branch::If(If {
            cond,
            then_block,
            else_block,
        })) => {
            writeln!(w, "if ({span})")?;
            print_expr(w, i + 1, cond)?;
            print_labeled_block(w, i + 1, "then", then_block)?;
            if let Some(else_block) = else_block {
                print_labeled_block(w, i + 1, "else", else_block)?;
            }
        }
        Stmt::Branch(Branch::Switch(Switch { subject, cases })) => {
            writeln!(w, "switch ({span})")?;
            print_expr(w, i + 1, subject)?;
            for case in cases {
                print_case(w, i + 1, case)?;
            }
        }
    }
    Ok(())
}

fn print_case(w: &mut impl Write, i: usize, case: &Case) -> fmt::Result {
    sp(w, i)?;
    match &case.comparator {
        None => write!(w, "default")?,
        Some(Comparator::Const(c)) => write!(w, "case {}", ConstDisplay(c))?,
        Some(Comparator::Seq(consts)) => {
            write!(w, "case ")?;
            for (idx, c) in consts.iter().enumerate() {
                if idx > 0 {
                    write!(w, ", ")?;
                }
                write!(w, "{}", ConstDisplay(c))?;
            }
        }
        Some(Comparator::Range { lo, hi, .. }) => write!(w, "case range({lo}, {hi})")?,
    }
    writeln!(w, " ({})", case.span)?;
    print_stmts(w, i + 1, &case.body)
}

struct ConstDisplay<'a>(&'a Const);

impl fmt::Display for ConstDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.lit {
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x:?}"),
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

pub fn print_expr(w: &mut impl Write, i: usize, expr: &Expr) -> fmt::Result {
    sp(w, i)?;
    let span = expr.span;
    match &expr.kind {
        ExprKind::Literal(Literal::Int(int)) => writeln!(w, "int {int} ({span})")?,
        ExprKind::Literal(Literal::Float(float)) => writeln!(w, "float {float:?} ({span})")?,
        ExprKind::Literal(Literal::String(string)) => writeln!(w, "string {string:?} ({span})")?,
        ExprKind::Literal(Literal::Bool(bool)) => writeln!(w, "bool {bool} ({span})")?,
        ExprKind::Ident(name) => writeln!(w, "ident {name} ({span})")?,
        ExprKind::Call(Call { callee, args }) => {
            writeln!(w, "call {} ({span})", callee.name)?;
            for arg in args {
                print_expr(w, i + 1, arg)?;
            }
        }
        ExprKind::Unary {
            op,
            expr: inner_expr,
        } => {
            writeln!(w, "unary {op:?} ({span})")?;
            print_expr(w, i + 1, inner_expr)?;
        }
        ExprKind::Binary { op, lhs, rhs } => {
            writeln!(w, "binary {op:?} ({span})")?;
            print_expr(w, i + 1, lhs)?;
            print_expr(w, i + 1, rhs)?;
        }
    }
    Ok(())
}

pub fn print_ir(w: &mut impl Write, ir: &Ir) -> fmt::Result {
    print_scope(w, ir, 0, ir.root())
}

fn print_scope(w: &mut impl Write, ir: &Ir, i: usize, scope: &Scope) -> fmt::Result {
    for entry in scope.entries() {
        print_entry(w, ir, i, entry)?;
    }
    Ok(())
}

fn print_entry(w: &mut impl Write, ir: &Ir, i: usize, entry: &Entry) -> fmt::Result {
    sp(w, i)?;
    match entry {
        Entry::NewVar { name, var } => {
            let keyword = if var.mutable { "var" } else { "let" };
            writeln!(w, "{keyword} {name}: {} ({})", var.ty, var.span)?;
            print_value(w, i + 1, &var.value)?;
        }
        Entry::Expr(expr) => {
            writeln!(w, "expr {}", expr.op)?;
            for arg in &expr.args {
                print_var(w, i + 1, arg)?;
            }
        }
        Entry::Scoped(Scoped {
            kind,
            born,
            dependency,
            scope,
        }) => {
            write!(w, "scoped {} {scope}", kind.as_str())?;
            if !born.is_empty() {
                write!(w, " born [{}]", born.join(", "))?;
            }
            writeln!(w)?;
            if let Some(dependency) = dependency {
                sp(w, i + 1)?;
                writeln!(w, "when")?;
                print_value(w, i + 2, dependency)?;
            }
            print_scope(w, ir, i + 1, ir.scope(*scope))?;
        }
    }
    Ok(())
}

/// Prints a value without its type.
fn print_value(w: &mut impl Write, i: usize, value: &Value) -> fmt::Result {
    sp(w, i)?;
    write_value_head(w, value)?;
    writeln!(w)?;
    print_value_args(w, i, value)
}

fn print_var(w: &mut impl Write, i: usize, var: &Var) -> fmt::Result {
    sp(w, i)?;
    write_value_head(w, &var.value)?;
    writeln!(w, ": {}", var.ty)?;
    print_value_args(w, i, &var.value)
}

fn write_value_head(w: &mut impl Write, value: &Value) -> fmt::Result {
    match value {
        Value::Arg => write!(w, "arg"),
        Value::Ref { name, .. } => write!(w, "ref {name}"),
        Value::Atom(atom) if atom.ty == Ty::String => write!(w, "atom {:?}", atom.text),
        Value::Atom(atom) => write!(w, "atom {}", atom.text),
        Value::Expr(expr) => write!(w, "expr {}", expr.op),
    }
}

fn print_value_args(w: &mut impl Write, i: usize, value: &Value) -> fmt::Result {
    if let Value::Expr(expr) = value {
        for arg in &expr.args {
            print_var(w, i + 1, arg)?;
        }
    }
    Ok(())
}

fn sp(w: &mut impl Write, i: usize) -> fmt::Result {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}
