/// The interpreter itself and the expression dispatch.
///
/// Holds [`Interpreter`](core::Interpreter) with its input/output
/// endpoints, the statement runner entry, the expression evaluator and
/// the store path for assignment targets.
pub mod core;

/// Statement execution: declarations, print and dump, control flow and
/// assignment.
pub mod statement;

/// Binary operator evaluation, including the per-operator category gates.
pub mod binary;

/// Unary operator evaluation.
pub mod unary;

/// The total, default-producing cast conversions.
pub mod cast;

/// Index reads and the three container write paths.
pub mod access;

/// Builtin collection methods.
pub mod method;
