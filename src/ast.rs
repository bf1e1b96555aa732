// AST node kinds: the core consumes a fully-built, already-typed AST;
// it does not parse source text or infer types. Building these by hand
// (rather than via a parser) is deliberate: the concrete syntax and its
// parser are out of scope for this crate.

use crate::value::TypeSpec;

// Abstract over the memory management strategy for AST sub-nodes.
// No sharing is needed here (each node has exactly one parent), so
// unlike the corpus's `Rc`-based `Node<T>`, plain ownership suffices.
pub type Node<T> = Box<T>;
pub type Seq<T> = Vec<T>;

/// Expression nodes: evaluate to a `Value`.
#[derive(Clone, Debug)]
pub enum Expr {
    /// A literal integer or char; becomes a `VirtualInteger`.
    Int(i64),
    /// A literal list; becomes a `VirtualList` of its evaluated
    /// elements.
    List(Seq<Expr>),
    /// `Get` (reads the named variable, aliasing its storage).
    Get(String),
    /// `Getitem` (indexes a list-typed expression at a compile-time
    /// constant index).
    Getitem(Node<Expr>, i64),
    /// A function call: evaluates each argument in order, then
    /// dispatches on `(name, arg types)`.
    Call(String, Seq<Expr>),
    /// `copy(expr)` (evaluates `expr`, then invokes `Value::copy` on
    /// the result).
    Copy(Node<Expr>),
}

/// Statement nodes: evaluated for effect.
#[derive(Clone, Debug)]
pub enum Statement {
    /// `Type name;` (binds `name` to a fresh value of `Type`).
    Declaration(TypeSpec, String),
    /// A bare expression, evaluated and discarded.
    Expr(Expr),
    /// `if (cond) { body }`.
    If(Expr, Code),
    /// `while (cond) { body }`.
    While(Expr, Code),
}

/// A statement sequence (a function body).
#[derive(Clone, Debug, Default)]
pub struct Code(pub Seq<Statement>);

impl Code {
    pub fn new(statements: Vec<Statement>) -> Code {
        Code(statements)
    }
}

/// A function definition. The driver only ever invokes `main` with no
/// arguments, but `main` can itself call other functions defined here
/// (dispatched the same way as a call to a built-in: by exact name and
/// argument-type match), so parameters and an optional return
/// expression are part of the surface.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub params: Seq<(TypeSpec, String)>,
    pub body: Code,
    /// Evaluated, in the function's own environment, after `body` runs;
    /// its value becomes the call's result. `None` for a void function.
    pub return_expr: Option<Expr>,
}

/// A whole program: a flat set of function definitions.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub functions: Seq<Function>,
}

impl Program {
    pub fn new(functions: Vec<Function>) -> Program {
        Program { functions }
    }

    pub fn find(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}
