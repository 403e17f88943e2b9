use indoc::indoc;
use pretty_assertions::assert_eq;

use ms2::{
    ast::TopLevelStmt,
    ir::{Entry, ScopeKind, Ty, Value},
    parser, typer, Error,
};

const SAMPLES: &[(&str, &str)] = &[
    ("basic", include_str!("../samples/basic.ms2")),
    ("control_flow", include_str!("../samples/control_flow.ms2")),
    ("functions", include_str!("../samples/functions.ms2")),
];

fn compile_err(src: &str) -> Error {
    match ms2::compile(src) {
        Ok(_) => panic!("expected {src:?} to fail"),
        Err(error) => error,
    }
}

#[test]
fn every_sample_compiles() {
    for (name, src) in SAMPLES {
        if let Err(error) = ms2::compile(src) {
            panic!("sample {name} failed in the {}: {error}", error.stage());
        }
    }
}

#[test]
fn root_entries_mirror_top_level_decls() {
    for (name, src) in SAMPLES {
        let compilation = ms2::compile(src).unwrap();
        let stmts = &compilation.program.stmts;
        let entries = compilation.ir.root().entries();
        assert_eq!(stmts.len(), entries.len(), "in sample {name}");

        for (stmt, entry) in stmts.iter().zip(entries) {
            match (&stmt.inner, entry) {
                (TopLevelStmt::Let(decl), Entry::NewVar { name, var }) => {
                    assert_eq!(&decl.name.name, name);
                    assert_eq!(var.span, stmt.span);
                    assert!(!var.mutable);
                }
                (TopLevelStmt::Func(func), Entry::Scoped(scoped)) => {
                    assert_eq!(scoped.kind, ScopeKind::Fun);
                    let scope = compilation.ir.scope(scoped.scope);
                    assert_eq!(scope.func_name.as_deref(), Some(&*func.name.name));
                    assert!(compilation.ir.ops.get(&func.name.name).unwrap().user_defined);
                }
                (stmt, entry) => panic!("{stmt:?} lowered to {entry:?} in sample {name}"),
            }
        }
    }
}

#[test]
fn typechecking_is_deterministic() {
    for (_, src) in SAMPLES {
        let compilation = ms2::compile(src).unwrap();
        let first = typer::typecheck(&compilation.program).unwrap();
        let second = typer::typecheck(&compilation.program).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, compilation.ir);
    }
}

#[test]
fn token_spans_are_increasing() {
    for (_, src) in SAMPLES {
        let compilation = ms2::compile(src).unwrap();
        for pair in compilation.tokens.as_slice().windows(2) {
            assert!(pair[0].span().hi() <= pair[1].span().lo);
        }
    }
}

#[test]
fn speculative_statements_pick_the_right_form() {
    let src = indoc! {"
        func main() {
            var f = 0;
            f = 1;
        }
        func g() {
            g();
        }
    "};
    let compilation = ms2::compile(src).unwrap();
    let ir = &compilation.ir;
    let ops: Vec<&str> = ir
        .root()
        .entries()
        .iter()
        .filter_map(|entry| match entry {
            Entry::Scoped(scoped) => Some(scoped.scope),
            _ => None,
        })
        .flat_map(|scope| ir.scope(scope).entries())
        .filter_map(|entry| match entry {
            Entry::Expr(expr) => Some(&*expr.op),
            _ => None,
        })
        .collect();
    assert_eq!(ops, ["$assign", "g"]);
}

#[test]
fn let_bindings_are_immutable() {
    let src = indoc! {"
        func main() {
            let x = 1;
            var y = 1;
            y = 2;
            x = 2;
        }
    "};
    let error = compile_err(src);
    assert!(matches!(
        &error,
        Error::Type { error, .. } if matches!(error.inner, typer::Error::ImmutableAssignment { .. })
    ));
    assert_eq!(
        error.to_string(),
        "5,5..5,10: can't assign to immutable binding `x`. \
        Hint: `x` is declared with `let` at 2,5..2,14; \
        declare it with `var` to allow assignments"
    );
}

#[test]
fn overload_failures_list_the_argument_types() {
    let error = compile_err("let x = input(1, 2.0);");
    assert_eq!(
        error.rendered(),
        "1,9..1,21: can't apply `input` to (Int, Double). \
        Hint: accepted signatures: () -> String"
    );

    let error = compile_err("let x = \"a\" - \"b\";");
    assert_eq!(error.stage(), "typer");
    assert!(error.rendered().starts_with("1,9..1,17: can't apply `-` to (String, String)."));
}

#[test]
fn each_stage_reports_its_errors() {
    let error = compile_err("let x = 5#;");
    assert_eq!(error.stage(), "lexer");
    assert_eq!(
        error.rendered(),
        "1,10..1,10: unexpected character `#`. Hint: this character can't start any token"
    );

    let error = compile_err("let x = (1;");
    assert_eq!(error.stage(), "parser");
    assert!(matches!(error, Error::Parse { .. }));

    let error = compile_err("let x = y;");
    assert_eq!(error.stage(), "typer");
}

#[test]
fn refs_point_at_the_binding_visible_when_lowered() {
    let src = r#"func f() { let x = 1; if true { print(x); let x = "s"; } }"#;
    let ir = ms2::compile(src).unwrap().ir;

    let Entry::Scoped(func) = &ir.root().entries()[0] else {
        panic!("expected the function scope");
    };
    let Entry::Scoped(branch) = &ir.scope(func.scope).entries()[1] else {
        panic!("expected the branch scope");
    };
    let Entry::Expr(print) = &ir.scope(branch.scope).entries()[0] else {
        panic!("expected the print action");
    };
    let arg = &print.args[0];
    let Value::Ref { name, binding } = &arg.value else {
        panic!("expected a reference, found {:?}", arg.value);
    };

    assert_eq!(&**name, "x");
    assert_eq!(arg.ty, Ty::Int);
    assert_eq!(binding.scope, func.scope);
    let (_, resolved) = ir.binding(*binding).unwrap();
    assert_eq!(resolved.ty, arg.ty);
    // By name, the branch now sees its own later `x`.
    assert_eq!(ir.lookup("x", branch.scope).unwrap().1.ty, Ty::String);

    let src = r#"func g() { var y = 1; print(y); var y = "s"; print(y); }"#;
    let ir = ms2::compile(src).unwrap().ir;
    let Entry::Scoped(func) = &ir.root().entries()[0] else {
        panic!("expected the function scope");
    };
    let tys: Vec<Ty> = ir
        .scope(func.scope)
        .entries()
        .iter()
        .filter_map(|entry| match entry {
            Entry::Expr(print) => match &print.args[0].value {
                Value::Ref { binding, .. } => ir.binding(*binding).map(|(_, var)| var.ty),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(tys, [Ty::Int, Ty::String]);
}

#[test]
fn diagnostic_columns_count_characters() {
    let error = compile_err("let café = 1; let z = q;");
    assert_eq!(
        error.rendered(),
        "1,23..1,23: `q` is not defined. Hint: declare it with `let` or `var` before using it"
    );

    let error = compile_err("let s = \"ñandú\";\nlet n: Int = s;");
    assert!(error.rendered().starts_with("2,8..2,10: "), "{}", error.rendered());

    let compilation = ms2::compile("let café = 1;").unwrap();
    let eq = compilation.tokens.get(2).unwrap();
    assert_eq!(eq.span(), ms2::token::Span::new_of_bounds(9..10));
}

#[test]
fn parse_expr_requires_the_whole_input() {
    let tokens = ms2::lexer::tokenize("1 + 2 3").unwrap().tokens;
    let error = parser::parse_expr(&tokens).unwrap_err();
    assert_eq!(
        error.inner,
        parser::Error::Unexpected {
            found: ms2::token::TokenKind::IntLiteral("3".into()),
            expected: parser::Expected::Eof,
        }
    );
}
