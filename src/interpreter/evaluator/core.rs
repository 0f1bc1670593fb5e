use std::{
    cell::RefCell,
    collections::HashMap,
    io::{BufRead, Write},
    rc::Rc,
};

use rand::Rng;

use crate::{
    ast::{ActionOp, Expr, Stmt},
    error::{LangResult, LanguageError},
    interpreter::{
        evaluator::{binary, cast, unary},
        types::Type,
        value::{Payload, Value},
    },
};

/// The tree-walking evaluator.
///
/// Runs a fully bound tree in a single eager pass: statements execute for
/// their effects, expressions evaluate left to right to typed values. The
/// evaluator owns the program's input and output endpoints, so `read()`
/// and `print` can be driven from buffers in tests and from the standard
/// streams in the binary.
pub struct Interpreter<R, W> {
    pub(crate) input: R,
    pub(crate) out: W,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Wraps the endpoints the program will read from and print to.
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Hands back the output endpoint, consuming the interpreter. Tests
    /// use this to inspect what a program printed.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes a parsed program front to back.
    ///
    /// # Errors
    /// The first language error raised by any statement; execution stops
    /// there.
    pub fn run(&mut self, program: &[Stmt]) -> LangResult<()> {
        for statement in program {
            self.execute(statement)?;
        }

        Ok(())
    }

    /// Evaluates one expression node to a value.
    pub(crate) fn eval(&mut self, expr: &Expr) -> LangResult<Value> {
        match expr {
            Expr::Constant { value, .. } => Ok(value.clone()),
            Expr::Variable { cell, line } => cell.borrow().value(*line),
            Expr::Access { base, index, line } => self.eval_access(base, index, *line),
            Expr::Unary { op, operand, line } => {
                let value = self.eval(operand)?;
                unary::eval_unary(*op, &value, *line)
            },
            Expr::Binary {
                left,
                op,
                right,
                line,
            } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary::eval_binary(*op, &left, &right, *line)
            },
            Expr::Conditional {
                condition,
                then_expr,
                else_expr,
                line,
            } => self.eval_conditional(condition, then_expr, else_expr, *line),
            Expr::Cast { op, operand, .. } => {
                let value = self.eval(operand)?;
                Ok(cast::eval_cast(*op, &value))
            },
            Expr::ArrayLiteral {
                element,
                items,
                line,
            } => self.eval_array_literal(element, items, *line),
            Expr::DictLiteral {
                key,
                value,
                entries,
                line,
            } => self.eval_dict_literal(key, value, entries, *line),
            Expr::Action { op, .. } => Ok(self.eval_action(*op)),
            Expr::Method {
                op,
                target,
                argument,
                line,
            } => self.eval_method(*op, target, argument.as_deref(), *line),
        }
    }

    /// Stores a value into a settable expression: a variable cell or a
    /// container element. The parser only ever produces these two as
    /// assignment targets.
    pub(crate) fn store(&mut self, target: &Expr, value: Value) -> LangResult<()> {
        match target {
            Expr::Variable { cell, line } => cell.borrow_mut().set(value, *line),
            Expr::Access { base, index, line } => self.store_access(base, index, value, *line),
            _ => unreachable!("assignment targets are settable by construction"),
        }
    }

    /// `cond ? a : b` evaluates the condition and then exactly one branch.
    fn eval_conditional(
        &mut self,
        condition: &Expr,
        then_expr: &Expr,
        else_expr: &Expr,
        line: usize,
    ) -> LangResult<Value> {
        let value = self.eval(condition)?;
        match value.payload {
            Payload::Bool(true) => self.eval(then_expr),
            Payload::Bool(false) => self.eval(else_expr),
            _ => Err(LanguageError::InvalidOperation { line }),
        }
    }

    /// Builds an array value, gating every element's category against the
    /// declared element type.
    fn eval_array_literal(
        &mut self,
        element: &Type,
        items: &[Expr],
        line: usize,
    ) -> LangResult<Value> {
        let mut payloads = Vec::with_capacity(items.len());
        for item in items {
            let value = self.eval(item)?;
            if value.ty.category() != element.category() {
                return Err(LanguageError::InvalidType {
                    type_name: value.ty.to_string(),
                    line,
                });
            }
            payloads.push(value.payload);
        }

        Ok(Value::array(element.clone(), payloads))
    }

    /// Builds a dictionary value, gating keys and values by category. A
    /// repeated key keeps the later entry.
    fn eval_dict_literal(
        &mut self,
        key: &Type,
        value: &Type,
        entries: &[(Expr, Expr)],
        line: usize,
    ) -> LangResult<Value> {
        let mut payloads = HashMap::with_capacity(entries.len());
        for (key_expr, value_expr) in entries {
            let entry_key = self.eval(key_expr)?;
            let entry_value = self.eval(value_expr)?;

            if entry_key.ty.category() != key.category() {
                return Err(LanguageError::InvalidType {
                    type_name: entry_key.ty.to_string(),
                    line,
                });
            }
            if entry_value.ty.category() != value.category() {
                return Err(LanguageError::InvalidType {
                    type_name: entry_value.ty.to_string(),
                    line,
                });
            }
            payloads.insert(entry_key.payload, entry_value.payload);
        }

        Ok(Value::dict(key.clone(), value.clone(), payloads))
    }

    /// `read()` consumes one line of input, trimmed; at end of input it
    /// yields the empty string. `random()` samples a `Float` in `[0, 1)`.
    fn eval_action(&mut self, op: ActionOp) -> Value {
        match op {
            ActionOp::Read => {
                let mut buffer = String::new();
                let _ = self.input.read_line(&mut buffer);
                Value::from(buffer.trim())
            },
            ActionOp::Random => Value::from(rand::thread_rng().gen::<f32>()),
        }
    }
}

/// Shared element storage for a fresh array payload.
pub(crate) fn array_payload(items: Vec<Payload>) -> Payload {
    Payload::Array(Rc::new(RefCell::new(items)))
}
