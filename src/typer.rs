use std::collections::HashMap;

use log::debug;

use crate::{
    ast::{
        Assign, Block, Branch, Call, Case, Comparator, Const, Decl, Expr, ExprKind, For, Func, If,
        Iterable, Literal, Program, Range, Stmt, Switch, TopLevelStmt, While,
    },
    ir::{
        builtins, Atom, Entry, ExprValue, Ir, OpSpec, ScopeId, ScopeKind, Scoped, Ty, Value, Var,
    },
    token::{Span, Spanned},
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Checks the whole program, lowering it into a fresh [`Ir`].
///
/// The first semantic error aborts the pass.
pub fn typecheck(program: &Program) -> Result<Ir> {
    let mut typer = Typer::new();
    for stmt in &program.stmts {
        typer.check_top_level(ScopeId::ROOT, &stmt.inner, stmt.span)?;
    }
    Ok(typer.ir)
}

struct Typer {
    ir: Ir,
    /// Where each user function was declared.
    func_spans: HashMap<Box<str>, Span>,
}

impl Typer {
    fn new() -> Typer {
        Typer {
            ir: Ir::new(),
            func_spans: HashMap::new(),
        }
    }

    fn check_top_level(&mut self, scope: ScopeId, stmt: &TopLevelStmt, span: Span) -> Result<()> {
        match stmt {
            TopLevelStmt::Let(decl) => self.check_decl(scope, decl, span, false),
            TopLevelStmt::Func(func) => self.check_func(scope, func),
        }
    }

    fn check_decl(&mut self, scope: ScopeId, decl: &Decl, span: Span, mutable: bool) -> Result<()> {
        let name = &decl.name.name;
        let (value, ty) = self.lower(scope, &decl.value)?;
        if ty == Ty::Void {
            let error = Error::VoidBinding { name: name.clone() };
            return Err(decl.value.span.wrap(error));
        }
        if let Some(annotation) = &decl.ty {
            if annotation.ty != ty {
                let error = Error::AnnotationMismatch {
                    declared: annotation.ty,
                    inferred: ty,
                };
                return Err(annotation.span.wrap(error));
            }
        }

        let var = Var {
            value,
            ty,
            span,
            mutable,
        };
        let scope = self.ir.scope_mut(scope);
        scope.push(Entry::NewVar {
            name: name.clone(),
            var: var.clone(),
        });
        scope.bind(name.clone(), var);
        Ok(())
    }

    fn check_func(&mut self, scope: ScopeId, func: &Func) -> Result<()> {
        let name = &func.name.name;
        let spec = OpSpec {
            args: func.params.iter().map(|param| param.ty.ty).collect(),
            ret: func.ret.as_ref().map_or(Ty::Void, |ret| ret.ty),
        };
        debug!("registering function `{name}` as {spec}");
        // Registered before the body is checked so that it may call itself.
        if !self.ir.ops.define(name, spec) {
            let error = Error::DuplicateFunction {
                name: name.clone(),
                previous: self.func_spans.get(name).copied(),
            };
            return Err(func.name.span.wrap(error));
        }
        self.func_spans.insert(name.clone(), func.name.span);

        let body = self.new_scope(scope, ScopeKind::Fun, Some(name.clone()));
        let mut born: Vec<Box<str>> = Vec::with_capacity(func.params.len());
        for param in &func.params {
            let param_name = &param.name.name;
            if born.contains(param_name) {
                let error = Error::DuplicateParam {
                    name: param_name.clone(),
                };
                return Err(param.name.span.wrap(error));
            }
            let var = Var {
                value: Value::Arg,
                ty: param.ty.ty,
                span: param.name.span.to(param.ty.span),
                mutable: false,
            };
            self.ir.scope_mut(body).bind(param_name.clone(), var);
            born.push(param_name.clone());
        }

        self.check_block(body, &func.body)?;
        self.push_scoped(scope, ScopeKind::Fun, born, None, body);
        Ok(())
    }

    fn check_block(&mut self, scope: ScopeId, block: &Block) -> Result<()> {
        for stmt in &block.stmts {
            self.check_stmt(scope, &stmt.inner, stmt.span)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, scope: ScopeId, stmt: &Stmt, span: Span) -> Result<()> {
        match stmt {
            Stmt::TopLevel(stmt) => self.check_top_level(scope, stmt, span),
            Stmt::Var(decl) => self.check_decl(scope, decl, span, true),
            Stmt::Assign(assign) => self.check_assign(scope, assign, span),
            Stmt::Print(args) => self.check_print(scope, args),
            Stmt::Return(value) => self.check_return(scope, value.as_ref(), span),
            Stmt::FuncCall(call) => {
                let (action, _) = self.lower_call(scope, call, span)?;
                self.ir.scope_mut(scope).push(Entry::Expr(action));
                Ok(())
            }
            Stmt::For(for_stmt) => self.check_for(scope, for_stmt),
            Stmt::Branch(Branch::If(if_stmt)) => self.check_if(scope, if_stmt),
            Stmt::Branch(Branch::While(while_stmt)) => self.check_while(scope, while_stmt),
            Stmt::Branch(Branch::Switch(switch)) => self.check_switch(scope, switch),
        }
    }

    fn check_assign(&mut self, scope: ScopeId, assign: &Assign, span: Span) -> Result<()> {
        let target = &assign.target;
        let Some((binding_id, binding)) = self.ir.lookup(&target.name, scope) else {
            let error = Error::UndefinedName {
                name: target.name.clone(),
            };
            return Err(target.span.wrap(error));
        };
        let (expected, declared_at) = (binding.ty, binding.span);
        if !binding.mutable {
            let error = Error::ImmutableAssignment {
                name: target.name.clone(),
                declared_at,
            };
            return Err(span.wrap(error));
        }

        let value = self.lower_var(scope, &assign.value)?;
        if value.ty != expected {
            let error = Error::AssignmentMismatch {
                name: target.name.clone(),
                expected,
                found: value.ty,
                declared_at,
            };
            return Err(assign.value.span.wrap(error));
        }

        let target = Var {
            value: Value::Ref {
                name: target.name.clone(),
                binding: binding_id,
            },
            ty: expected,
            span: target.span,
            mutable: true,
        };
        let action = ExprValue {
            op: builtins::ASSIGN.into(),
            args: vec![target, value],
        };
        self.ir.scope_mut(scope).push(Entry::Expr(action));
        Ok(())
    }

    fn check_print(&mut self, scope: ScopeId, args: &[Expr]) -> Result<()> {
        let mut vars = Vec::with_capacity(args.len());
        for arg in args {
            let var = self.lower_var(scope, arg)?;
            if var.ty == Ty::Void {
                return Err(arg.span.wrap(Error::VoidPrint));
            }
            vars.push(var);
        }
        let action = ExprValue {
            op: builtins::PRINT.into(),
            args: vars,
        };
        self.ir.scope_mut(scope).push(Entry::Expr(action));
        Ok(())
    }

    fn check_return(&mut self, scope: ScopeId, value: Option<&Expr>, span: Span) -> Result<()> {
        let func = self.ir.scope(scope).func_name.clone().unwrap_or_default();
        let expected = self
            .ir
            .ops
            .get(&func)
            .and_then(|op| op.alternatives.first())
            .map_or(Ty::Void, |spec| spec.ret);

        let (args, found, span) = match value {
            Some(value) => {
                let var = self.lower_var(scope, value)?;
                let ty = var.ty;
                (vec![var], ty, value.span)
            }
            None => (Vec::new(), Ty::Void, span),
        };
        if found != expected {
            let error = Error::ReturnMismatch {
                func,
                expected,
                found,
            };
            return Err(span.wrap(error));
        }

        let action = ExprValue {
            op: builtins::RETURN.into(),
            args,
        };
        self.ir.scope_mut(scope).push(Entry::Expr(action));
        Ok(())
    }

    fn check_for(&mut self, scope: ScopeId, for_stmt: &For) -> Result<()> {
        let (dependency, ty) = match &for_stmt.iterable {
            Iterable::Range(range) => (range_predicate(range)?, Ty::Int),
            Iterable::Expr(expr) => {
                let var = self.lower_var(scope, expr)?;
                if var.ty != Ty::String {
                    return Err(expr.span.wrap(Error::NotIterable { found: var.ty }));
                }
                let dependency = ExprValue {
                    op: builtins::ITER_STR.into(),
                    args: vec![var],
                };
                (dependency, Ty::String)
            }
        };

        let body = self.new_scope(scope, ScopeKind::While, None);
        let name = &for_stmt.var.name;
        let var = Var {
            value: Value::Arg,
            ty,
            span: for_stmt.var.span,
            mutable: false,
        };
        self.ir.scope_mut(body).bind(name.clone(), var);
        self.check_block(body, &for_stmt.body)?;

        let dependency = Some(Value::Expr(dependency));
        self.push_scoped(scope, ScopeKind::While, vec![name.clone()], dependency, body);
        Ok(())
    }

    fn check_if(&mut self, scope: ScopeId, if_stmt: &If) -> Result<()> {
        let cond = self.lower_cond(scope, &if_stmt.cond)?;
        let then_scope = self.new_scope(scope, ScopeKind::IfBranch, None);
        self.check_block(then_scope, &if_stmt.then_block)?;
        self.push_scoped(scope, ScopeKind::IfBranch, Vec::new(), Some(cond), then_scope);

        if let Some(else_block) = &if_stmt.else_block {
            let else_scope = self.new_scope(scope, ScopeKind::ElseBranch, None);
            self.check_block(else_scope, else_block)?;
            self.push_scoped(scope, ScopeKind::ElseBranch, Vec::new(), None, else_scope);
        }
        Ok(())
    }

    fn check_while(&mut self, scope: ScopeId, while_stmt: &While) -> Result<()> {
        let cond = self.lower_cond(scope, &while_stmt.cond)?;
        let body = self.new_scope(scope, ScopeKind::While, None);
        self.check_block(body, &while_stmt.body)?;
        self.push_scoped(scope, ScopeKind::While, Vec::new(), Some(cond), body);
        Ok(())
    }

    fn lower_cond(&self, scope: ScopeId, cond: &Expr) -> Result<Value> {
        let (value, ty) = self.lower(scope, cond)?;
        if ty != Ty::Bool {
            return Err(cond.span.wrap(Error::ConditionNotBool { found: ty }));
        }
        Ok(value)
    }

    fn check_switch(&mut self, scope: ScopeId, switch: &Switch) -> Result<()> {
        let subject = self.lower_var(scope, &switch.subject)?;
        let last = switch.cases.len().saturating_sub(1);
        for (i, case) in switch.cases.iter().enumerate() {
            let dependency = match &case.comparator {
                Some(comparator) => Some(Value::Expr(case_predicate(&subject, comparator)?)),
                None if i == last => None,
                None => return Err(case.span.wrap(Error::DefaultNotLast)),
            };
            self.check_case(scope, case, dependency)?;
        }
        Ok(())
    }

    fn check_case(&mut self, scope: ScopeId, case: &Case, dependency: Option<Value>) -> Result<()> {
        let body = self.new_scope(scope, ScopeKind::CaseBranch, None);
        self.check_block(body, &case.body)?;
        self.push_scoped(scope, ScopeKind::CaseBranch, Vec::new(), dependency, body);
        Ok(())
    }

    fn new_scope(&mut self, parent: ScopeId, kind: ScopeKind, func_name: Option<Box<str>>) -> ScopeId {
        let id = self.ir.new_scope(parent, func_name);
        debug!("new {} scope {id} in {parent}", kind.as_str());
        id
    }

    fn push_scoped(
        &mut self,
        parent: ScopeId,
        kind: ScopeKind,
        born: Vec<Box<str>>,
        dependency: Option<Value>,
        scope: ScopeId,
    ) {
        let scoped = Scoped {
            kind,
            born,
            dependency,
            scope,
        };
        self.ir.scope_mut(parent).push(Entry::Scoped(scoped));
    }

    fn lower_var(&self, scope: ScopeId, expr: &Expr) -> Result<Var> {
        let (value, ty) = self.lower(scope, expr)?;
        Ok(Var {
            value,
            ty,
            span: expr.span,
            mutable: false,
        })
    }

    /// Lowers an expression into a value, along with its type.
    fn lower(&self, scope: ScopeId, expr: &Expr) -> Result<(Value, Ty)> {
        match &expr.kind {
            ExprKind::Literal(lit) => {
                let atom = atom_of(lit);
                let ty = atom.ty;
                Ok((Value::Atom(atom), ty))
            }
            ExprKind::Ident(name) => match self.ir.lookup(name, scope) {
                Some((binding, var)) => {
                    let value = Value::Ref {
                        name: name.clone(),
                        binding,
                    };
                    Ok((value, var.ty))
                }
                None => Err(expr.span.wrap(Error::UndefinedName { name: name.clone() })),
            },
            ExprKind::Call(call) => {
                let (value, ty) = self.lower_call(scope, call, expr.span)?;
                Ok((Value::Expr(value), ty))
            }
            ExprKind::Unary { op, expr: operand } => {
                let args = vec![self.lower_var(scope, operand)?];
                let (value, ty) = self.apply(op.op_name(), args, expr.span)?;
                Ok((Value::Expr(value), ty))
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let args = vec![self.lower_var(scope, lhs)?, self.lower_var(scope, rhs)?];
                let (value, ty) = self.apply(op.op_name(), args, expr.span)?;
                Ok((Value::Expr(value), ty))
            }
        }
    }

    fn lower_call(&self, scope: ScopeId, call: &Call, span: Span) -> Result<(ExprValue, Ty)> {
        let callee = &call.callee;
        if !self.ir.ops.contains(&callee.name) {
            let error = Error::UndefinedFunction {
                name: callee.name.clone(),
            };
            return Err(callee.span.wrap(error));
        }
        let args = call
            .args
            .iter()
            .map(|arg| self.lower_var(scope, arg))
            .collect::<Result<Vec<_>>>()?;
        self.apply(&callee.name, args, span)
    }

    /// Picks the alternative of `op` whose argument types are exactly those of
    /// `args`.
    fn apply(&self, op: &str, args: Vec<Var>, span: Span) -> Result<(ExprValue, Ty)> {
        let arg_tys: Vec<Ty> = args.iter().map(|arg| arg.ty).collect();
        let operator = self.ir.ops.get(op);
        match operator.and_then(|operator| operator.resolve(&arg_tys)) {
            Some(ret) => {
                let value = ExprValue {
                    op: op.into(),
                    args,
                };
                Ok((value, ret))
            }
            None => {
                let error = Error::NoMatchingAlternative {
                    op: op.into(),
                    args: arg_tys,
                    alternatives: operator.map(|found| found.alternatives.clone()).unwrap_or_default(),
                };
                Err(span.wrap(error))
            }
        }
    }
}

/// Builds the dependency value of a `for` loop over a range.
fn range_predicate(range: &Range) -> Result<ExprValue> {
    if range.step == 0 {
        return Err(range.span.wrap(Error::ZeroStep));
    }
    let args = [range.from, range.to, range.step]
        .into_iter()
        .map(|bound| atom_var(&Literal::Int(bound), range.span))
        .collect();
    Ok(ExprValue {
        op: builtins::ITER_RANGE.into(),
        args,
    })
}

/// Builds the dependency value of a `case`, matching `subject` against the
/// comparator.
fn case_predicate(subject: &Var, comparator: &Comparator) -> Result<ExprValue> {
    let check = |c: &Const| {
        let found = c.lit.ty();
        if found == subject.ty {
            Ok(atom_var(&c.lit, c.span))
        } else {
            let error = Error::CaseMismatch {
                subject: subject.ty,
                found,
            };
            Err(c.span.wrap(error))
        }
    };

    let mut args = vec![subject.clone()];
    let op = match comparator {
        Comparator::Const(c) => {
            args.push(check(c)?);
            builtins::CASE_IS
        }
        Comparator::Seq(consts) => {
            for c in consts {
                args.push(check(c)?);
            }
            builtins::CASE_OF
        }
        Comparator::Range { lo, hi, span } => {
            if subject.ty != Ty::Int {
                let error = Error::CaseRangeNotInt {
                    subject: subject.ty,
                };
                return Err(span.wrap(error));
            }
            args.push(atom_var(&Literal::Int(*lo), *span));
            args.push(atom_var(&Literal::Int(*hi), *span));
            builtins::CASE_IN
        }
    };
    Ok(ExprValue {
        op: op.into(),
        args,
    })
}

fn atom_of(lit: &Literal) -> Atom {
    let text: Box<str> = match lit {
        Literal::Int(i) => i.to_string().into(),
        Literal::Float(f) => format!("{f:?}").into(),
        Literal::String(s) => s.clone(),
        Literal::Bool(b) => b.to_string().into(),
    };
    Atom { ty: lit.ty(), text }
}

fn atom_var(lit: &Literal, span: Span) -> Var {
    let atom = atom_of(lit);
    Var {
        ty: atom.ty,
        value: Value::Atom(atom),
        span,
        mutable: false,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    UndefinedName {
        name: Box<str>,
    },
    UndefinedFunction {
        name: Box<str>,
    },
    NoMatchingAlternative {
        op: Box<str>,
        args: Vec<Ty>,
        alternatives: Vec<OpSpec>,
    },
    AnnotationMismatch {
        declared: Ty,
        inferred: Ty,
    },
    VoidBinding {
        name: Box<str>,
    },
    VoidPrint,
    ImmutableAssignment {
        name: Box<str>,
        declared_at: Span,
    },
    AssignmentMismatch {
        name: Box<str>,
        expected: Ty,
        found: Ty,
        declared_at: Span,
    },
    DuplicateFunction {
        name: Box<str>,
        /// `None` if the name belongs to a builtin.
        previous: Option<Span>,
    },
    DuplicateParam {
        name: Box<str>,
    },
    ConditionNotBool {
        found: Ty,
    },
    ReturnMismatch {
        func: Box<str>,
        expected: Ty,
        found: Ty,
    },
    ZeroStep,
    NotIterable {
        found: Ty,
    },
    CaseMismatch {
        subject: Ty,
        found: Ty,
    },
    CaseRangeNotInt {
        subject: Ty,
    },
    DefaultNotLast,
}

#[cfg(test)]
mod tests {
    use crate::util::test_utils::tree_tests;

    tree_tests!(
        use typer;

        fn test_top_level_decls() {
            let program = r#"
                let x = 1 + 2.5;
                let s: String = "a" + "b";
                func add(a: Int, b: Int) -> Int {
                    return a + b;
                }
            "#;
            let tree_ok = r#"
                let x: Double (0..16)
                  expr +
                    atom 1: Int
                    atom 2.5: Double
                let s: String (17..43)
                  expr +
                    atom "a": String
                    atom "b": String
                scoped FUN #1 born [a, b]
                  expr $return
                    expr +: Int
                      ref a: Int
                      ref b: Int
            "#;
        }

        fn test_shadowing() {
            let program = "
                let x = 1;
                func f(x: String) {
                    print(x);
                }
            ";
            let tree_ok = "
                let x: Int (0..10)
                  atom 1
                scoped FUN #1 born [x]
                  expr print
                    ref x: String
            ";
        }

        fn test_while_and_if_else() {
            let program = r#"
                func f(n: Int) {
                    var i = 0;
                    while i < n {
                        i = i + 1;
                    }
                    if i == n { print(i); } else { print("no"); }
                }
            "#;
            let tree_ok = r#"
                scoped FUN #1 born [n]
                  var i: Int (21..31)
                    atom 0
                  scoped WHILE #2
                    when
                      expr <
                        ref i: Int
                        ref n: Int
                    expr $assign
                      ref i: Int
                      expr +: Int
                        ref i: Int
                        atom 1: Int
                  scoped IF_BRANCH #3
                    when
                      expr ==
                        ref i: Int
                        ref n: Int
                    expr print
                      ref i: Int
                  scoped ELSE_BRANCH #4
                    expr print
                      atom "no": String
            "#;
        }

        fn test_for_and_switch() {
            let program = r#"
                func f(s: String) {
                    for c in s { print(c); }
                    for i in range(10, 0, -2) { print(i); }
                    switch 3 {
                        case 1 { print("one"); }
                        case 2, 3 { print("few"); }
                        case range(4, 10) { print("some"); }
                        default { print("many"); }
                    }
                }
            "#;
            let tree_ok = r#"
                scoped FUN #1 born [s]
                  scoped WHILE #2 born [c]
                    when
                      expr $iterStr
                        ref s: String
                    expr print
                      ref c: String
                  scoped WHILE #3 born [i]
                    when
                      expr $iterRange
                        atom 10: Int
                        atom 0: Int
                        atom -2: Int
                    expr print
                      ref i: Int
                  scoped CASE_BRANCH #4
                    when
                      expr $caseIs
                        atom 3: Int
                        atom 1: Int
                    expr print
                      atom "one": String
                  scoped CASE_BRANCH #5
                    when
                      expr $caseOf
                        atom 3: Int
                        atom 2: Int
                        atom 3: Int
                    expr print
                      atom "few": String
                  scoped CASE_BRANCH #6
                    when
                      expr $caseIn
                        atom 3: Int
                        atom 4: Int
                        atom 10: Int
                    expr print
                      atom "some": String
                  scoped CASE_BRANCH #7
                    expr print
                      atom "many": String
            "#;
        }

        fn test_recursion() {
            let program = "
                func fact(n: Int) -> Int {
                    if n < 2 { return 1; }
                    return n * fact(n - 1);
                }
                let r = fact(5);
            ";
            let tree_ok = "
                scoped FUN #1 born [n]
                  scoped IF_BRANCH #2
                    when
                      expr <
                        ref n: Int
                        atom 2: Int
                    expr $return
                      atom 1: Int
                  expr $return
                    expr *: Int
                      ref n: Int
                      expr fact: Int
                        expr -: Int
                          ref n: Int
                          atom 1: Int
                let r: Int (84..100)
                  expr fact
                    atom 5: Int
            ";
        }

        fn test_undefined_name() {
            let program = "let x = y;";
            let expected_errors = &[
                "1,9..1,9: `y` is not defined. Hint: declare it with `let` or `var` before using it"
            ];
        }

        fn test_undefined_name_after_non_ascii() {
            let program = "let café = 1; let z = q;";
            let expected_errors = &[
                "1,23..1,23: `q` is not defined. Hint: declare it with `let` or `var` before using it"
            ];
        }

        fn test_undefined_function() {
            let program = "let x = h(1);";
            let expected_errors = &[
                "1,9..1,9: function `h` is not defined. Hint: functions must be declared before they are called"
            ];
        }

        fn test_builtin_called_with_arguments() {
            let program = "let x = input(1);";
            let expected_errors = &[
                "1,9..1,16: can't apply `input` to (Int). Hint: accepted signatures: () -> String"
            ];
        }

        fn test_operator_type_pair_mismatch() {
            let program = "let x = 1 + true;";
            let expected_errors = &[
                "1,9..1,16: can't apply `+` to (Int, Bool). Hint: accepted signatures: \
                (Int, Int) -> Int, (Double, Double) -> Double, (Int, Double) -> Double, \
                (Double, Int) -> Double, (String, String) -> String"
            ];
        }

        fn test_annotation_mismatch() {
            let program = "let x: Int = \"a\";";
            let expected_errors = &[
                "1,8..1,10: declared type Int doesn't match inferred type String. Hint: change the annotation or the initializer"
            ];
        }

        fn test_assign_to_let() {
            let program = "
                func f() {
                    let x = 1;
                    x = 2;
                }
            ";
            let expected_errors = &[
                "3,5..3,10: can't assign to immutable binding `x`. Hint: `x` is declared with `let` at 2,5..2,14; declare it with `var` to allow assignments"
            ];
        }

        fn test_assign_mismatch() {
            let program = r#"
                func f() {
                    var x = 1;
                    x = "a";
                }
            "#;
            let expected_errors = &[
                "3,9..3,11: can't assign String to `x` of type Int. Hint: `x` is declared at 2,5..2,14"
            ];
        }

        fn test_condition_not_bool() {
            let program = "func f() { while 1 { } }";
            let expected_errors = &[
                "1,18..1,18: condition must be Bool, found Int. Hint: compare the value explicitly, as in `x != 0`"
            ];
        }

        fn test_default_not_last() {
            let program = "func f(x: Int) { switch x { default { } case 1 { } } }";
            let expected_errors = &[
                "1,29..1,39: `default` must be the last case. Hint: move it after every other case"
            ];
        }

        fn test_case_mismatch() {
            let program = "func f(x: Int) { switch x { case \"a\" { } } }";
            let expected_errors = &[
                "1,34..1,36: case of type String doesn't match subject of type Int. Hint: every case constant must have the subject's type"
            ];
        }

        fn test_case_range_needs_int() {
            let program = "func f(x: Double) { switch x { case range(1, 2) { } } }";
            let expected_errors = &[
                "1,37..1,47: range case on a Double subject. Hint: `range` cases need an Int subject"
            ];
        }

        fn test_return_mismatch() {
            let program = "func f() -> Int { return \"a\"; }";
            let expected_errors = &[
                "1,26..1,28: function `f` returns Int, found String. Hint: change the returned value or the `->` annotation"
            ];
        }

        fn test_zero_step() {
            let program = "func f() { for i in range(0, 5, 0) { } }";
            let expected_errors = &[
                "1,21..1,34: range step can't be zero. Hint: use a positive or negative step"
            ];
        }

        fn test_not_iterable() {
            let program = "func f() { for i in 5 { } }";
            let expected_errors = &[
                "1,21..1,21: can't iterate over Int. Hint: `for` iterates over `range(from, to, step)` or a String"
            ];
        }

        fn test_duplicate_function() {
            let program = "func f() { } func f() { }";
            let expected_errors = &[
                "1,19..1,19: function `f` is already defined. Hint: previous definition at 1,6..1,6"
            ];
        }

        fn test_duplicate_param() {
            let program = "func f(a: Int, a: Int) { }";
            let expected_errors = &[
                "1,16..1,16: parameter `a` is declared twice. Hint: rename one of the parameters"
            ];
        }

        fn test_void_binding() {
            let program = "func g() { } let x = g();";
            let expected_errors = &[
                "1,22..1,24: can't bind a Void value to `x`. Hint: the initializer doesn't produce a value"
            ];
        }

        fn test_void_print() {
            let program = "func g() { } func f() { print(g()); }";
            let expected_errors = &[
                "1,31..1,33: can't print a Void value. Hint: the argument doesn't produce a value"
            ];
        }
    );
}
