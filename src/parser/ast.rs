// AST (Abstract Syntax Tree) definitions for the Toy language

use std::fmt;
use std::rc::Rc;

/// Source location information for error reporting
///
/// The file name is shared between every location produced by one lexer, so
/// cloning a location is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: Rc<str>,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(file: Rc<str>, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Declared or inferred tensor shape. Empty means "infer from the initializer".
pub type Shape = Vec<usize>;

/// A scalar numeric literal: `1`, `2.5`
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    value: f64,
    location: Location,
}

impl NumberExpr {
    pub fn new(value: f64, location: Location) -> Self {
        Self { value, location }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// One element of a tensor literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralElement {
    Number(NumberExpr),
    Literal(LiteralExpr),
}

/// A tensor literal: `[[1, 2], [3, 4]]`
///
/// `dims` is computed bottom-up while parsing: the first entry is the number
/// of immediate elements, followed by the (shared) dims of nested literals.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    values: Vec<LiteralElement>,
    dims: Vec<usize>,
    location: Location,
}

impl LiteralExpr {
    pub fn new(values: Vec<LiteralElement>, dims: Vec<usize>, location: Location) -> Self {
        Self {
            values,
            dims,
            location,
        }
    }

    pub fn values(&self) -> &[LiteralElement] {
        &self.values
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// A reference to a variable (also used for function parameters)
#[derive(Debug, Clone, PartialEq)]
pub struct VarExpr {
    name: String,
    location: Location,
}

impl VarExpr {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// `var name<shape> = init`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclExpr {
    name: String,
    shape: Shape,
    init: Box<Expr>,
    location: Location,
}

impl VarDeclExpr {
    pub fn new(name: impl Into<String>, shape: Shape, init: Expr, location: Location) -> Self {
        Self {
            name: name.into(),
            shape,
            init: Box::new(init),
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn init(&self) -> &Expr {
        &self.init
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// `return` or `return expr`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnExpr {
    expr: Option<Box<Expr>>,
    location: Location,
}

impl ReturnExpr {
    pub fn new(expr: Option<Expr>, location: Location) -> Self {
        Self {
            expr: expr.map(Box::new),
            location,
        }
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_deref()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// Binary arithmetic, `op` is one of `+`, `-`, `*`
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    op: char,
    lhs: Box<Expr>,
    rhs: Box<Expr>,
    location: Location,
}

impl BinaryExpr {
    pub fn new(op: char, lhs: Expr, rhs: Expr, location: Location) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            location,
        }
    }

    pub fn op(&self) -> char {
        self.op
    }

    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// A call to a user-defined function
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    callee: String,
    args: Vec<Expr>,
    location: Location,
}

impl CallExpr {
    pub fn new(callee: impl Into<String>, args: Vec<Expr>, location: Location) -> Self {
        Self {
            callee: callee.into(),
            args,
            location,
        }
    }

    pub fn callee(&self) -> &str {
        &self.callee
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// The `print` builtin, which takes exactly one argument
#[derive(Debug, Clone, PartialEq)]
pub struct PrintExpr {
    arg: Box<Expr>,
    location: Location,
}

impl PrintExpr {
    pub fn new(arg: Expr, location: Location) -> Self {
        Self {
            arg: Box::new(arg),
            location,
        }
    }

    pub fn arg(&self) -> &Expr {
        &self.arg
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// Expressions and statements. Statements are expressions in Toy.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    Literal(LiteralExpr),
    Var(VarExpr),
    VarDecl(VarDeclExpr),
    Return(ReturnExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Print(PrintExpr),
}

impl Expr {
    /// Get the source location of this node
    pub fn location(&self) -> &Location {
        match self {
            Expr::Number(e) => e.location(),
            Expr::Literal(e) => e.location(),
            Expr::Var(e) => e.location(),
            Expr::VarDecl(e) => e.location(),
            Expr::Return(e) => e.location(),
            Expr::Binary(e) => e.location(),
            Expr::Call(e) => e.location(),
            Expr::Print(e) => e.location(),
        }
    }
}

/// Function signature: `def name(a, b)`
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    name: String,
    params: Vec<VarExpr>,
    location: Location,
}

impl Prototype {
    pub fn new(name: impl Into<String>, params: Vec<VarExpr>, location: Location) -> Self {
        Self {
            name: name.into(),
            params,
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[VarExpr] {
        &self.params
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    proto: Prototype,
    body: Vec<Expr>,
}

impl Function {
    pub fn new(proto: Prototype, body: Vec<Expr>) -> Self {
        Self { proto, body }
    }

    pub fn proto(&self) -> &Prototype {
        &self.proto
    }

    pub fn body(&self) -> &[Expr] {
        &self.body
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    functions: Vec<Function>,
}

impl Module {
    pub fn new(functions: Vec<Function>) -> Self {
        Self { functions }
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Function> {
        self.functions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Module {
    type Item = &'a Function;
    type IntoIter = std::slice::Iter<'a, Function>;

    fn into_iter(self) -> Self::IntoIter {
        self.functions.iter()
    }
}
