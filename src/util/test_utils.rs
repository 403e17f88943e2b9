use crate::{
    lexer::{self, Tokenized},
    parser,
    token::Spanned,
    typer,
    util::{
        fmt::{tree, Context, Show},
        lines::LineIndex,
    },
};

pub fn format_errors<E>(lines: &LineIndex, e: &[Spanned<E>]) -> Vec<String>
where
    Spanned<E>: Show,
{
    let ctx = Context { lines };
    e.iter().map(|e| format!("{:#}", e.display(&ctx))).collect()
}

/// Each variant contains the input.
pub enum Test {
    ParserProgram(&'static str),
    ParserExpr(&'static str),
    TyperProgram(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    ExpectedErrors(&'static [&'static str]),
}

#[track_caller]
pub fn run_pipeline(test: Test) -> (String, Vec<String>) {
    let input = match test {
        Test::ParserProgram(input) | Test::ParserExpr(input) | Test::TyperProgram(input) => input,
    };
    let Tokenized { tokens, lines } = match lexer::tokenize(input) {
        Ok(tokenized) => tokenized,
        Err(error) => {
            let lines = LineIndex::of(input);
            return (String::new(), format_errors(&lines, &[error]));
        }
    };

    match test {
        Test::ParserProgram(_) => match parser::parse_program(&tokens) {
            Ok(prog) => (tree::print_program_string(&prog), vec![]),
            Err(error) => (String::new(), format_errors(&lines, &[error])),
        },
        Test::ParserExpr(_) => match parser::parse_expr(&tokens) {
            Ok(expr) => (tree::print_expr_string(&expr), vec![]),
            Err(error) => (String::new(), format_errors(&lines, &[error])),
        },
        Test::TyperProgram(_) => {
            let prog = match parser::parse_program(&tokens) {
                Ok(prog) => prog,
                Err(error) => return (String::new(), format_errors(&lines, &[error])),
            };
            match typer::typecheck(&prog) {
                Ok(ir) => (tree::print_ir_string(&ir), vec![]),
                Err(error) => (String::new(), format_errors(&lines, &[error])),
            }
        }
    }
}

#[track_caller]
pub fn run_assertion(
    assertion: Assertion,
    formatted_actual_tree: &str,
    formatted_actual_errors: &[String],
) {
    match assertion {
        Assertion::TreeOk(expected_tree) => {
            let expected_errors: &[&str] = &[];
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors);
            ::pretty_assertions::assert_eq!(formatted_actual_tree.trim(), expected_tree.trim());
        }
        Assertion::ExpectedErrors(expected_errors) => {
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors);
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let $source_kind:ident = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test =
                    tree_tests!(@@get_test($test_kind, $source_kind), ::indoc::indoc! { $source });
                let (formatted_actual_tree, formatted_actual_errors) =
                    crate::util::test_utils::run_pipeline(test);
                let ctx = (&formatted_actual_tree, &formatted_actual_errors);
                tree_tests!(@@expand_assertions, ctx, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $ctx:expr, []) => {};
    (@@expand_assertions, $ctx:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $ctx.0,
            $ctx.1,
        );
        tree_tests!(@@expand_assertions, $ctx, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_errors, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedErrors($expected)
    };

    (@@get_test(parser, program), $source:expr) => {
        crate::util::test_utils::Test::ParserProgram($source)
    };
    (@@get_test(parser, expr), $source:expr) => {
        crate::util::test_utils::Test::ParserExpr($source)
    };
    (@@get_test(typer, program), $source:expr) => {
        crate::util::test_utils::Test::TyperProgram($source)
    };
}
pub(crate) use tree_tests;
