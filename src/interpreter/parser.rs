/// Parser state and shared machinery.
///
/// Holds the [`Parser`](core::Parser) itself: one-token lookahead over the
/// scanned stream, the eat/take/unexpected helper set, and type
/// annotations, which both statements and expressions need.
pub mod core;

/// Statement parsing.
///
/// Blocks, declarations (which allocate cells while parsing), print and
/// dump, control flow and the assignment-or-expression statement.
pub mod statement;

/// Expression parsing.
///
/// The precedence chain from the ternary conditional down to primaries,
/// literal constructors for arrays and dictionaries, casts, builtin
/// actions, lvalue chains and trailing method calls.
pub mod expression;
