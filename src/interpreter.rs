/// The lexical scanner.
///
/// Turns source text into a stream of line-tagged tokens, decoding
/// literals along the way. The first lexical error ends the scan.
pub mod lexer;

/// The static type system.
///
/// The closed set of primitive types, the two composed constructors and
/// the structural compatibility check every other component consults.
pub mod types;

/// Runtime values.
///
/// Typed values with shared, in-place mutable container payloads, total
/// equality and hashing, and the textual renderings `print`, `dump` and
/// `toString` use.
pub mod value;

/// Variables and lexical scopes.
///
/// The storage cells declarations allocate and the scope chain the parser
/// binds names against.
pub mod env;

/// The parser and binder.
///
/// Recursive descent with one token of lookahead, building the executable
/// tree and resolving every name to its cell while parsing.
pub mod parser;

/// The tree-walking evaluator.
///
/// Statement execution and eager expression evaluation over the bound
/// tree.
pub mod evaluator;
