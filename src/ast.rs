use std::rc::Rc;

/// A sequence of statements executed in order within one scope.
pub type Block = Vec<Statement>;

/// The root of a parsed compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The top-level statements.
    pub body: Block,
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// `Expr` covers all kinds of expressions, from literals and variables to
/// calls, operators, table constructors and function literals. Every variant
/// carries the line it starts on for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `nil`
    Nil {
        /// Line number in the source code.
        line: usize,
    },
    /// `true` or `false`.
    Boolean {
        /// The constant value.
        value: bool,
        /// Line number in the source code.
        line:  usize,
    },
    /// A numeric literal.
    Number {
        /// The constant value.
        value: f64,
        /// Line number in the source code.
        line:  usize,
    },
    /// A string literal, with escapes already resolved.
    String {
        /// The constant value.
        value: Rc<str>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `...`, the extra arguments of the enclosing vararg function.
    Vararg {
        /// Line number in the source code.
        line: usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary operation.
    UnaryOp {
        /// The unary operator.
        op:   UnaryOperator,
        /// The operand.
        expr: Box<Expr>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation.
    BinaryOp {
        /// The left operand.
        left:  Box<Expr>,
        /// The binary operator.
        op:    BinaryOperator,
        /// The right operand.
        right: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A table constructor such as `{1, 2, x = 3, [k] = v}`.
    Table {
        /// The entries in written order.
        entries: Vec<TableEntry>,
        /// Line number in the source code.
        line:    usize,
    },
    /// Indexing `t[k]`, or `t.name` which is sugar for `t["name"]`.
    Index {
        /// The indexed expression.
        table: Box<Expr>,
        /// The key expression.
        key:   Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A function call `f(args)`.
    Call {
        /// The expression producing the function.
        callee:    Box<Expr>,
        /// The argument expressions.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A method call `o:m(args)`, which passes `o` as the first argument.
    MethodCall {
        /// The receiver, evaluated once.
        object:    Box<Expr>,
        /// The method name looked up on the receiver.
        method:    String,
        /// The argument expressions, not counting the receiver.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A parenthesized expression. Truncates multiple results to one.
    Paren {
        /// The inner expression.
        expr: Box<Expr>,
        /// Line number in the source code.
        line: usize,
    },
    /// A function literal `function(params) ... end`.
    Function {
        /// The shared function body.
        body: Rc<FunctionBody>,
        /// Line number in the source code.
        line: usize,
    },
}

impl Expr {
    /// Returns the line number associated with this expression.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Nil { line }
            | Self::Boolean { line, .. }
            | Self::Number { line, .. }
            | Self::String { line, .. }
            | Self::Vararg { line }
            | Self::Variable { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Table { line, .. }
            | Self::Index { line, .. }
            | Self::Call { line, .. }
            | Self::MethodCall { line, .. }
            | Self::Paren { line, .. }
            | Self::Function { line, .. } => *line,
        }
    }

    /// Whether the expression can produce more than one value: calls and `...`.
    #[must_use]
    pub const fn is_multi_valued(&self) -> bool {
        matches!(self, Self::Call { .. } | Self::MethodCall { .. } | Self::Vararg { .. })
    }
}

/// One entry of a table constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    /// The explicit key, or `None` for a positional entry.
    pub key:   Option<Expr>,
    /// The value expression.
    pub value: Expr,
}

/// The parameters and body shared by every closure created from one function
/// literal or declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    /// Named parameters, including the implicit `self` of methods.
    pub params:    Vec<String>,
    /// Whether the parameter list ends with `...`.
    pub is_vararg: bool,
    /// The statements of the function.
    pub body:      Block,
    /// Line of the `function` keyword.
    pub line:      usize,
}

/// One `if`/`elseif` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBranch {
    pub condition: Expr,
    pub body:      Block,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `local a, b = x, y`
    Local {
        /// The declared names.
        names:  Vec<String>,
        /// The initializers, possibly fewer or more than the names.
        values: Vec<Expr>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `local function f() ... end`, where `f` is in scope inside its body.
    LocalFunction {
        /// The declared name.
        name: String,
        /// The function body.
        body: Rc<FunctionBody>,
        /// Line number in the source code.
        line: usize,
    },
    /// `a, t.k = x, y`
    Assignment {
        /// Variables or index expressions.
        targets: Vec<Expr>,
        /// The values, evaluated before any target is written.
        values:  Vec<Expr>,
        /// Line number in the source code.
        line:    usize,
    },
    /// `if c then ... elseif c then ... else ... end`
    If {
        /// The `if` arm followed by the `elseif` arms.
        branches:   Vec<ConditionalBranch>,
        /// The `else` block.
        else_block: Option<Block>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `while c do ... end`
    While {
        condition: Expr,
        body:      Block,
        /// Line number in the source code.
        line:      usize,
    },
    /// `repeat ... until c`, where `c` sees the body's locals.
    Repeat {
        body:      Block,
        condition: Expr,
        /// Line number in the source code.
        line:      usize,
    },
    /// `for v = start, stop [, step] do ... end`
    NumericFor {
        /// The loop variable.
        var:   String,
        start: Expr,
        stop:  Expr,
        /// The increment, 1 when absent.
        step:  Option<Expr>,
        body:  Block,
        /// Line number in the source code.
        line:  usize,
    },
    /// `for k, v in explist do ... end`
    GenericFor {
        /// The loop variables.
        names: Vec<String>,
        /// Expressions producing the iterator function, state and control
        /// value.
        exprs: Vec<Expr>,
        body:  Block,
        /// Line number in the source code.
        line:  usize,
    },
    /// `function a.b.c:m() ... end`
    FunctionDecl {
        /// The dotted name; the first element is a variable.
        path:   Vec<String>,
        /// The method name after `:`, if any.
        method: Option<String>,
        /// The function body.
        body:   Rc<FunctionBody>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `return explist`
    Return {
        values: Vec<Expr>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `break`
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// `do ... end`
    Do {
        body: Block,
        /// Line number in the source code.
        line: usize,
    },
    /// A call evaluated for its side effects.
    Call {
        /// The call or method call expression.
        call: Expr,
        /// Line number in the source code.
        line: usize,
    },
}

impl Statement {
    /// Returns the line number associated with this statement.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Local { line, .. }
            | Self::LocalFunction { line, .. }
            | Self::Assignment { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::Repeat { line, .. }
            | Self::NumericFor { line, .. }
            | Self::GenericFor { line, .. }
            | Self::FunctionDecl { line, .. }
            | Self::Return { line, .. }
            | Self::Break { line }
            | Self::Do { line, .. }
            | Self::Call { line, .. } => *line,
        }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`^`)
    Pow,
    /// Concatenation (`..`)
    Concat,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`~=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Short-circuit `and`
    And,
    /// Short-circuit `or`
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`not x`).
    Not,
    /// Length (`#x`).
    Length,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Concat, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
            NotEqual, Or, Pow, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Pow => "^",
            Concat => "..",
            Equal => "==",
            NotEqual => "~=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Not => "not",
            Self::Length => "#",
        };
        write!(f, "{operator}")
    }
}
