use crate::{
    ir::TyList,
    lexer, parser,
    token::Spanned,
    typer,
    util::fmt::{Context, Show},
};

/// Writes the span prefix of alternate renderings.
fn write_span_prefix(
    f: &mut std::fmt::Formatter<'_>,
    ctx: &Context<'_>,
    span: crate::token::Span,
) -> std::fmt::Result {
    if f.alternate() {
        write!(f, "{}: ", ctx.lines.span(span))?;
    }
    Ok(())
}

impl Show for Spanned<lexer::Error> {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &Context<'_>) -> std::fmt::Result {
        let Spanned { span, inner: error } = self;
        write_span_prefix(f, ctx, *span)?;
        write!(f, "{}. Hint: {}", error.message(), error.hint())
    }
}

impl Show for Spanned<parser::Error> {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &Context<'_>) -> std::fmt::Result {
        let Spanned { span, inner: error } = self;
        write_span_prefix(f, ctx, *span)?;
        write!(f, "{}. Hint: {}", error.message(), error.hint())
    }
}

impl Show for Spanned<typer::Error> {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &Context<'_>) -> std::fmt::Result {
        let lines = ctx.lines;
        let Spanned { span, inner: error } = self;
        write_span_prefix(f, ctx, *span)?;

        use typer::Error::*;
        match error {
            UndefinedName { name } => write!(
                f,
                "`{name}` is not defined. \
                Hint: declare it with `let` or `var` before using it"
            ),
            UndefinedFunction { name } => write!(
                f,
                "function `{name}` is not defined. \
                Hint: functions must be declared before they are called"
            ),
            NoMatchingAlternative {
                op,
                args,
                alternatives,
            } => {
                write!(f, "can't apply `{op}` to {}. Hint: ", TyList(args))?;
                if alternatives.is_empty() {
                    return write!(f, "`{op}` accepts no arguments");
                }
                write!(f, "accepted signatures: ")?;
                for (i, spec) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{spec}")?;
                }
                Ok(())
            }
            AnnotationMismatch { declared, inferred } => write!(
                f,
                "declared type {declared} doesn't match inferred type {inferred}. \
                Hint: change the annotation or the initializer"
            ),
            VoidBinding { name } => write!(
                f,
                "can't bind a Void value to `{name}`. \
                Hint: the initializer doesn't produce a value"
            ),
            VoidPrint => write!(
                f,
                "can't print a Void value. Hint: the argument doesn't produce a value"
            ),
            ImmutableAssignment { name, declared_at } => write!(
                f,
                "can't assign to immutable binding `{name}`. \
                Hint: `{name}` is declared with `let` at {}; \
                declare it with `var` to allow assignments",
                lines.span(*declared_at)
            ),
            AssignmentMismatch {
                name,
                expected,
                found,
                declared_at,
            } => write!(
                f,
                "can't assign {found} to `{name}` of type {expected}. \
                Hint: `{name}` is declared at {}",
                lines.span(*declared_at)
            ),
            DuplicateFunction { name, previous } => {
                write!(f, "function `{name}` is already defined. Hint: ")?;
                match previous {
                    Some(previous) => write!(f, "previous definition at {}", lines.span(*previous)),
                    None => write!(f, "`{name}` is a builtin"),
                }
            }
            DuplicateParam { name } => write!(
                f,
                "parameter `{name}` is declared twice. Hint: rename one of the parameters"
            ),
            ConditionNotBool { found } => write!(
                f,
                "condition must be Bool, found {found}. \
                Hint: compare the value explicitly, as in `x != 0`"
            ),
            ReturnMismatch {
                func,
                expected,
                found,
            } => write!(
                f,
                "function `{func}` returns {expected}, found {found}. \
                Hint: change the returned value or the `->` annotation"
            ),
            ZeroStep => write!(
                f,
                "range step can't be zero. Hint: use a positive or negative step"
            ),
            NotIterable { found } => write!(
                f,
                "can't iterate over {found}. \
                Hint: `for` iterates over `range(from, to, step)` or a String"
            ),
            CaseMismatch { subject, found } => write!(
                f,
                "case of type {found} doesn't match subject of type {subject}. \
                Hint: every case constant must have the subject's type"
            ),
            CaseRangeNotInt { subject } => write!(
                f,
                "range case on a {subject} subject. Hint: `range` cases need an Int subject"
            ),
            DefaultNotLast => write!(
                f,
                "`default` must be the last case. Hint: move it after every other case"
            ),
        }
    }
}
