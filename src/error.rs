/// The single error kind raised by the scanner, the parser and the
/// evaluator.
///
/// Every variant carries the source line it was raised on, plus the
/// offending lexeme, name or type text where one exists. Rendering via
/// [`Display`](std::fmt::Display) produces the canonical diagnostic form
/// `NN: message` with a two-digit line number, which is what both execution
/// modes print when a run fails.
///
/// Internal invariant violations (an operator reaching a branch the parser
/// rules out, a value built with a payload that does not fit its type) are
/// deliberately *not* part of this enum. They are bugs in the interpreter,
/// not in the interpreted program, and panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
    /// The scanner met a character sequence that is not a lexeme.
    InvalidLexeme {
        /// The rejected text.
        lexeme: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The input ended inside a construct (comment, literal, statement).
    UnexpectedEof {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The parser met a well-formed lexeme in a position it cannot occur.
    UnexpectedLexeme {
        /// The rejected lexeme.
        lexeme: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A name was referenced without a reachable declaration.
    UndeclaredVariable {
        /// The unresolved name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A name was declared twice in the same scope.
    AlreadyDeclaredVariable {
        /// The re-declared name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A variable was read before its first assignment.
    UninitializedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `let`-bound variable was assigned after its initializer.
    ConstantAssignment {
        /// The name of the constant.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value's type does not structurally match what the context needs.
    InvalidType {
        /// Rendered text of the offending type.
        type_name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operation was applied to a category that does not support it,
    /// an index was out of range, or a dictionary key was absent.
    InvalidOperation {
        /// The source line where the error occurred.
        line: usize,
    },
}

/// Result alias used throughout the scanner, parser and evaluator.
pub type LangResult<T> = Result<T, LanguageError>;

impl LanguageError {
    /// The source line this error was raised on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::InvalidLexeme { line, .. }
            | Self::UnexpectedEof { line }
            | Self::UnexpectedLexeme { line, .. }
            | Self::UndeclaredVariable { line, .. }
            | Self::AlreadyDeclaredVariable { line, .. }
            | Self::UninitializedVariable { line, .. }
            | Self::ConstantAssignment { line, .. }
            | Self::InvalidType { line, .. }
            | Self::InvalidOperation { line } => *line,
        }
    }
}

impl std::fmt::Display for LanguageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLexeme { lexeme, line } => {
                write!(f, "{line:02}: Invalid lexeme [{lexeme}]")
            },
            Self::UnexpectedEof { line } => {
                write!(f, "{line:02}: Unexpected end of file")
            },
            Self::UnexpectedLexeme { lexeme, line } => {
                write!(f, "{line:02}: Unexpected lexeme [{lexeme}]")
            },
            Self::UndeclaredVariable { name, line } => {
                write!(f, "{line:02}: Undeclared variable [{name}]")
            },
            Self::AlreadyDeclaredVariable { name, line } => {
                write!(f, "{line:02}: Variable already declared [{name}]")
            },
            Self::UninitializedVariable { name, line } => {
                write!(f, "{line:02}: Uninitialized variable [{name}]")
            },
            Self::ConstantAssignment { name, line } => {
                write!(f, "{line:02}: Assignment to constant variable [{name}]")
            },
            Self::InvalidType { type_name, line } => {
                write!(f, "{line:02}: Invalid type [{type_name}]")
            },
            Self::InvalidOperation { line } => {
                write!(f, "{line:02}: Invalid operation")
            },
        }
    }
}

impl std::error::Error for LanguageError {}
