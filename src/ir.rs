//! The typed intermediate representation.
//!
//! Scopes live in an arena owned by [`Ir`] and refer to their parent by
//! [`ScopeId`]. Each scope holds its bindings and an ordered list of entries;
//! nested control flow appears as [`Entry::Scoped`] entries pointing at child
//! scopes.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use crate::token::Span;

/// A semantic type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ty {
    Int,
    Float,
    Bool,
    String,
    Void,
}

impl Ty {
    /// The name used in source annotations.
    pub fn as_str(self) -> &'static str {
        match self {
            Ty::Int => "Int",
            Ty::Float => "Double",
            Ty::Bool => "Bool",
            Ty::String => "String",
            Ty::Void => "Void",
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Helper to display a list of types as `(Int, Double)`.
pub struct TyList<'a>(pub &'a [Ty]);

impl fmt::Display for TyList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpSpec {
    pub args: Vec<Ty>,
    pub ret: Ty,
}

impl fmt::Display for OpSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", TyList(&self.args), self.ret)
    }
}

/// An operator or function, with every signature it accepts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Operator {
    pub alternatives: Vec<OpSpec>,
    /// Whether the operator was declared by the program.
    pub user_defined: bool,
}

impl Operator {
    /// Returns the return type of the alternative whose argument list is
    /// exactly `args`.
    pub fn resolve(&self, args: &[Ty]) -> Option<Ty> {
        self.alternatives
            .iter()
            .find(|spec| spec.args == args)
            .map(|spec| spec.ret)
    }
}

pub mod builtins {
    pub const INPUT: &str = "input";
    pub const PRINT: &str = "print";
    pub const UNARY_PLUS: &str = "u+";
    pub const UNARY_MINUS: &str = "u-";
    pub const NOT: &str = "!";

    pub const ASSIGN: &str = "$assign";
    pub const RETURN: &str = "$return";
    pub const ITER_RANGE: &str = "$iterRange";
    pub const ITER_STR: &str = "$iterStr";
    pub const CASE_IS: &str = "$caseIs";
    pub const CASE_OF: &str = "$caseOf";
    pub const CASE_IN: &str = "$caseIn";
}

/// Maps operator and function names to their signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorTable {
    ops: BTreeMap<Box<str>, Operator>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        OperatorTable::with_builtins()
    }
}

impl OperatorTable {
    /// Returns a table without any operator.
    pub fn empty() -> OperatorTable {
        OperatorTable {
            ops: BTreeMap::new(),
        }
    }

    /// Returns a table with every builtin operator registered.
    pub fn with_builtins() -> OperatorTable {
        use Ty::*;
        const NUMERIC_PAIRS: [[Ty; 2]; 4] = [[Int, Int], [Float, Float], [Int, Float], [Float, Int]];
        // Any float operand widens the result.
        let widened = |[a, b]: [Ty; 2]| if a == Int && b == Int { Int } else { Float };

        let mut table = OperatorTable::empty();
        let mut add = |name: &str, args: &[Ty], ret: Ty| {
            table.push_builtin(name, args, ret);
        };

        for pair in NUMERIC_PAIRS {
            for op in ["+", "-", "*", "/"] {
                add(op, &pair, widened(pair));
            }
            add("**", &pair, Float);
            for op in ["<", "<=", ">", ">=", "==", "!="] {
                add(op, &pair, Bool);
            }
        }
        add("+", &[String, String], String);
        for op in ["==", "!="] {
            add(op, &[Bool, Bool], Bool);
            add(op, &[String, String], Bool);
        }
        add("&&", &[Bool, Bool], Bool);
        add("||", &[Bool, Bool], Bool);
        for ty in [Int, Float] {
            add(builtins::UNARY_PLUS, &[ty], ty);
            add(builtins::UNARY_MINUS, &[ty], ty);
        }
        add(builtins::NOT, &[Bool], Bool);
        add(builtins::INPUT, &[], String);
        table
    }

    fn push_builtin(&mut self, name: &str, args: &[Ty], ret: Ty) {
        let spec = OpSpec {
            args: args.to_vec(),
            ret,
        };
        self.ops
            .entry(name.into())
            .or_default()
            .alternatives
            .push(spec);
    }

    pub fn get(&self, name: &str) -> Option<&Operator> {
        self.ops.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Registers a user function. Returns `false`, leaving the table
    /// untouched, if the name is already taken.
    pub fn define(&mut self, name: &str, spec: OpSpec) -> bool {
        if self.ops.contains_key(name) {
            return false;
        }
        let op = Operator {
            alternatives: vec![spec],
            user_defined: true,
        };
        self.ops.insert(name.into(), op);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operator)> {
        self.ops.iter().map(|(name, op)| (&**name, op))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a single binding: the scope which declares it and its position
/// among that scope's bindings. Shadowed bindings keep their id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingId {
    pub scope: ScopeId,
    pub index: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Fun,
    IfBranch,
    ElseBranch,
    While,
    CaseBranch,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Fun => "FUN",
            ScopeKind::IfBranch => "IF_BRANCH",
            ScopeKind::ElseBranch => "ELSE_BRANCH",
            ScopeKind::While => "WHILE",
            ScopeKind::CaseBranch => "CASE_BRANCH",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub ty: Ty,
    /// The literal as it should be emitted.
    pub text: Box<str>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprValue {
    pub op: Box<str>,
    pub args: Vec<Var>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A function parameter or loop variable, only known at run time.
    Arg,
    /// Another binding, as resolved when the value was lowered. A later
    /// declaration of the same name never changes what it points at.
    Ref { name: Box<str>, binding: BindingId },
    Atom(Atom),
    Expr(ExprValue),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Var {
    pub value: Value,
    pub ty: Ty,
    pub span: Span,
    pub mutable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scoped {
    pub kind: ScopeKind,
    /// Names bound on entry to the scope (parameters, loop variables).
    pub born: Vec<Box<str>>,
    /// The guard that governs entry to the scope.
    pub dependency: Option<Value>,
    pub scope: ScopeId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    NewVar { name: Box<str>, var: Var },
    Expr(ExprValue),
    Scoped(Scoped),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    /// The enclosing function, inherited by every nested scope.
    pub func_name: Option<Box<str>>,
    /// Every binding declared here, shadowed ones included.
    bindings: Vec<(Box<str>, Var)>,
    /// The latest binding of each name.
    visible: HashMap<Box<str>, u32>,
    entries: Vec<Entry>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, func_name: Option<Box<str>>) -> Scope {
        Scope {
            parent,
            func_name,
            bindings: Vec::new(),
            visible: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the latest binding of `name` declared in this very scope.
    pub fn var(&self, name: &str) -> Option<&Var> {
        let &index = self.visible.get(name)?;
        self.bindings.get(index as usize).map(|(_, var)| var)
    }

    /// Declares `name`, shadowing any previous binding of it in this scope.
    /// Returns the binding's position.
    pub(crate) fn bind(&mut self, name: Box<str>, var: Var) -> u32 {
        let index = u32::try_from(self.bindings.len()).unwrap_or(u32::MAX);
        self.visible.insert(name.clone(), index);
        self.bindings.push((name, var));
        index
    }

    pub(crate) fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }
}

/// The typer's output.
#[derive(Clone, Debug, PartialEq)]
pub struct Ir {
    pub ops: OperatorTable,
    scopes: Vec<Scope>,
}

impl Default for Ir {
    fn default() -> Self {
        Ir::new()
    }
}

impl Ir {
    /// Returns an IR with an empty root scope and the builtin operators.
    pub fn new() -> Ir {
        Ir {
            ops: OperatorTable::with_builtins(),
            scopes: vec![Scope::new(None, None)],
        }
    }

    pub fn root(&self) -> &Scope {
        self.scope(ScopeId::ROOT)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// Creates a scope nested in `parent`. Unless a function name is provided,
    /// the parent's one is inherited.
    pub(crate) fn new_scope(&mut self, parent: ScopeId, func_name: Option<Box<str>>) -> ScopeId {
        let func_name = func_name.or_else(|| self.scope(parent).func_name.clone());
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope::new(Some(parent), func_name));
        id
    }

    /// Walks the scope chain from `from` up to the root, returning the nearest
    /// binding named `name` visible so far.
    pub fn lookup(&self, name: &str, from: ScopeId) -> Option<(BindingId, &Var)> {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(&index) = scope.visible.get(name) {
                let binding = BindingId { scope: id, index };
                return self.binding(binding).map(|(_, var)| (binding, var));
            }
            current = scope.parent;
        }
        None
    }

    /// Returns the name and variable of a binding, as pointed at by
    /// [`Value::Ref`].
    pub fn binding(&self, id: BindingId) -> Option<(&str, &Var)> {
        let (name, var) = self.scopes.get(id.scope.index())?.bindings.get(id.index as usize)?;
        Some((name, var))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(ty: Ty) -> Var {
        Var {
            value: Value::Arg,
            ty,
            span: Span::new_of_bounds(0..1),
            mutable: false,
        }
    }

    #[test]
    fn builtin_resolution() {
        let table = OperatorTable::with_builtins();
        let plus = table.get("+").unwrap();
        assert_eq!(plus.resolve(&[Ty::Int, Ty::Int]), Some(Ty::Int));
        assert_eq!(plus.resolve(&[Ty::Int, Ty::Float]), Some(Ty::Float));
        assert_eq!(plus.resolve(&[Ty::String, Ty::String]), Some(Ty::String));
        assert_eq!(plus.resolve(&[Ty::String, Ty::Int]), None);
        assert_eq!(table.get("**").unwrap().resolve(&[Ty::Int, Ty::Int]), Some(Ty::Float));
        assert_eq!(table.get("==").unwrap().resolve(&[Ty::Bool, Ty::Bool]), Some(Ty::Bool));
        assert_eq!(table.get("<").unwrap().resolve(&[Ty::Bool, Ty::Bool]), None);
        assert_eq!(table.get("input").unwrap().resolve(&[]), Some(Ty::String));
        assert_eq!(table.get("input").unwrap().resolve(&[Ty::Int]), None);
        assert!(!table.contains("print"));
        assert!(!table.contains("$assign"));
    }

    #[test]
    fn define_rejects_taken_names() {
        let mut table = OperatorTable::with_builtins();
        let spec = OpSpec {
            args: vec![Ty::Int],
            ret: Ty::Void,
        };
        assert!(table.define("f", spec.clone()));
        assert!(!table.define("f", spec.clone()));
        assert!(!table.define("input", spec));
        assert!(table.get("f").unwrap().user_defined);
        assert!(!table.get("input").unwrap().user_defined);
    }

    #[test]
    fn lookup_walks_the_chain() {
        let mut ir = Ir::new();
        ir.scope_mut(ScopeId::ROOT).bind("x".into(), var(Ty::Int));
        let f = ir.new_scope(ScopeId::ROOT, Some("f".into()));
        let inner = ir.new_scope(f, None);
        ir.scope_mut(f).bind("x".into(), var(Ty::String));

        assert_eq!(ir.scope(inner).func_name.as_deref(), Some("f"));
        let (found_in, found) = ir.lookup("x", inner).unwrap();
        assert_eq!(found_in.scope, f);
        assert_eq!(found.ty, Ty::String);
        assert_eq!(ir.lookup("x", ScopeId::ROOT).unwrap().1.ty, Ty::Int);
        assert!(ir.lookup("y", inner).is_none());
    }

    #[test]
    fn shadowed_bindings_stay_reachable() {
        let mut ir = Ir::new();
        let root = ir.scope_mut(ScopeId::ROOT);
        let first = root.bind("x".into(), var(Ty::Int));
        let second = root.bind("x".into(), var(Ty::String));
        assert_ne!(first, second);

        let (latest, found) = ir.lookup("x", ScopeId::ROOT).unwrap();
        assert_eq!(latest.index, second);
        assert_eq!(found.ty, Ty::String);

        let shadowed = BindingId {
            scope: ScopeId::ROOT,
            index: first,
        };
        let (name, var) = ir.binding(shadowed).unwrap();
        assert_eq!(name, "x");
        assert_eq!(var.ty, Ty::Int);
    }
}
