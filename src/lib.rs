//! # swiftlet
//!
//! swiftlet is a small, statically-typed scripting language: a lexical
//! scanner, a recursive-descent parser that binds names into lexical
//! scopes while parsing, and a tree-walking evaluator over typed runtime
//! values. Programs declare `var`/`let` variables over primitive
//! (`Bool`, `Int`, `Float`, `Char`, `String`) and composed (`Array<T>`,
//! `Dict<K,V>`) types, branch, loop over arrays and strings, cast between
//! primitives and call a small set of builtin collection methods.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic
)]
#![allow(clippy::missing_errors_doc)]

use std::io::{self, BufRead, BufReader, Write};

/// Defines the structure of parsed code.
///
/// This module declares the statement and expression enums that represent
/// a program as an executable tree. The tree comes out of the parser
/// already bound: variable references carry their resolved storage cells.
pub mod ast;
/// The unified language error.
///
/// One error kind covers lexical, syntactic and runtime failures alike,
/// each carrying its source line and rendering as the canonical
/// `NN: message` diagnostic.
pub mod error;
/// The interpreter pipeline.
///
/// Scanner, type system, value model, binding environment, parser and
/// evaluator, each in its own module.
pub mod interpreter;

pub use crate::{
    error::{LangResult, LanguageError},
    interpreter::{env::Environment, evaluator::core::Interpreter},
};

use crate::interpreter::{lexer, parser::core::Parser};

/// Runs one source text through the whole pipeline: scan, parse-and-bind
/// against `env`, then execute on `interpreter`.
///
/// The environment and interpreter are caller-owned so consecutive runs
/// can share state; the interactive mode feeds every prompt line through
/// here against one persistent global scope. Parsing happens entirely
/// before execution starts, and a parse failure rewinds any scopes the
/// aborted parse left open.
///
/// # Errors
/// The first language error raised by the scanner, parser or evaluator.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use swiftlet::{run_source, Environment, Interpreter};
///
/// let mut env = Environment::new();
/// let mut interpreter = Interpreter::new(Cursor::new(String::new()), Vec::new());
///
/// run_source("println(2 + 3)", &mut env, &mut interpreter).unwrap();
/// assert_eq!(interpreter.into_output(), b"5\n");
/// ```
pub fn run_source<R: BufRead, W: Write>(
    source: &str,
    env: &mut Environment,
    interpreter: &mut Interpreter<R, W>,
) -> LangResult<()> {
    let tokens = lexer::scan(source)?;

    let depth = env.depth();
    let program = match Parser::new(&tokens, env).parse() {
        Ok(program) => program,
        Err(error) => {
            env.truncate(depth);
            return Err(error);
        },
    };

    interpreter.run(&program)
}

/// Runs one program against the standard streams with a fresh global
/// scope. This is what batch mode does with a script file.
///
/// # Errors
/// The first language error raised anywhere in the pipeline.
///
/// # Examples
/// ```
/// // A well-formed program runs to completion.
/// assert!(swiftlet::interpret("var x: Int = 2 + 3").is_ok());
///
/// // 'y' was never declared, so binding fails while parsing.
/// assert!(swiftlet::interpret("println(y)").is_err());
/// ```
pub fn interpret(source: &str) -> LangResult<()> {
    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(BufReader::new(io::stdin()), io::stdout());

    run_source(source, &mut env, &mut interpreter)
}
