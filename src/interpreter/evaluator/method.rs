use std::io::{BufRead, Write};

use crate::{
    ast::{Expr, MethodOp},
    error::{LangResult, LanguageError},
    interpreter::{
        evaluator::core::{array_payload, Interpreter},
        types::Type,
        value::{Payload, Value},
    },
};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Runs a builtin method call. The receiver evaluates first, then the
    /// argument when the method takes one.
    pub(crate) fn eval_method(
        &mut self,
        op: MethodOp,
        target: &Expr,
        argument: Option<&Expr>,
        line: usize,
    ) -> LangResult<Value> {
        let value = self.eval(target)?;
        let argument = match argument {
            Some(expr) => Some(self.eval(expr)?),
            None => None,
        };

        match op {
            MethodOp::Count => count(&value, line),
            MethodOp::Empty => empty(&value, line),
            MethodOp::Keys => keys(&value, line),
            MethodOp::Values => values(&value, line),
            MethodOp::Append => append(&value, argument, line),
            MethodOp::Contains => contains(&value, argument, line),
        }
    }
}

/// `count()`: the number of characters, elements or entries.
fn count(value: &Value, line: usize) -> LangResult<Value> {
    let result = match &value.payload {
        Payload::Str(s) => s.chars().count(),
        Payload::Array(items) => items.borrow().len(),
        Payload::Dict(entries) => entries.borrow().len(),
        _ => return Err(LanguageError::InvalidOperation { line }),
    };

    Ok(Value::from(result as i32))
}

/// `empty()`: whether the collection holds nothing.
fn empty(value: &Value, line: usize) -> LangResult<Value> {
    let result = match &value.payload {
        Payload::Str(s) => s.is_empty(),
        Payload::Array(items) => items.borrow().is_empty(),
        Payload::Dict(entries) => entries.borrow().is_empty(),
        _ => return Err(LanguageError::InvalidOperation { line }),
    };

    Ok(Value::from(result))
}

/// `keys()`: a fresh array of the dictionary's keys, typed with its key
/// type.
fn keys(value: &Value, line: usize) -> LangResult<Value> {
    match (&value.ty, &value.payload) {
        (Type::Dict(key, _), Payload::Dict(entries)) => {
            let items: Vec<Payload> = entries.borrow().keys().cloned().collect();
            Ok(Value::new(
                Type::Array(key.clone()),
                array_payload(items),
            ))
        },
        _ => Err(LanguageError::InvalidOperation { line }),
    }
}

/// `values()`: a fresh array of the dictionary's values, typed with its
/// value type.
fn values(value: &Value, line: usize) -> LangResult<Value> {
    match (&value.ty, &value.payload) {
        (Type::Dict(_, dict_value), Payload::Dict(entries)) => {
            let items: Vec<Payload> = entries.borrow().values().cloned().collect();
            Ok(Value::new(
                Type::Array(dict_value.clone()),
                array_payload(items),
            ))
        },
        _ => Err(LanguageError::InvalidOperation { line }),
    }
}

/// `append(x)`: pushes onto the shared element storage in place and
/// yields the array itself.
fn append(value: &Value, argument: Option<Value>, line: usize) -> LangResult<Value> {
    match (&value.ty, &value.payload) {
        (Type::Array(element), Payload::Array(items)) => {
            let Some(argument) = argument else {
                unreachable!("append always parses with an argument");
            };
            if !argument.ty.matches(element) {
                return Err(LanguageError::InvalidType {
                    type_name: argument.ty.to_string(),
                    line,
                });
            }

            items.borrow_mut().push(argument.payload);
            Ok(value.clone())
        },
        _ => Err(LanguageError::InvalidOperation { line }),
    }
}

/// `contains(x)`: membership by payload equality.
fn contains(value: &Value, argument: Option<Value>, line: usize) -> LangResult<Value> {
    match (&value.ty, &value.payload) {
        (Type::Array(element), Payload::Array(items)) => {
            let Some(argument) = argument else {
                unreachable!("contains always parses with an argument");
            };
            if !argument.ty.matches(element) {
                return Err(LanguageError::InvalidType {
                    type_name: argument.ty.to_string(),
                    line,
                });
            }

            let found = items.borrow().contains(&argument.payload);
            Ok(Value::from(found))
        },
        _ => Err(LanguageError::InvalidOperation { line }),
    }
}
