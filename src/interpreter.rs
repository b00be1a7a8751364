/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the AST against chained lexical environments,
/// evaluates expressions and statements, calls closures and built-ins and
/// reports runtime errors. It is the core execution engine of the
/// interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles scoping, closures, multiple results and control flow.
/// - Reports runtime errors such as type mismatches or calls of non-functions.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a lazy stream of tokens,
/// each corresponding to a language element such as a number, a string, a
/// name, a keyword or a symbol. This is the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with their source line.
/// - Handles numeric and string literals, comments and long strings.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token sequence produced by the lexer and
/// constructs the AST of one chunk, using recursive descent for statements
/// and precedence climbing for expressions.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates the grammar, reporting the first error with its line.
/// - Rejects misplaced `return`, `break` and `...`.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// # Responsibilities
/// - Defines the `Value` enum and its truthiness, equality and coercions.
/// - Implements tables with insertion-ordered traversal.
/// - Represents built-in and user-defined functions.
pub mod value;
