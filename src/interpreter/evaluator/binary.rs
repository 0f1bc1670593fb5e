use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::BinaryOp,
    error::{LangResult, LanguageError},
    interpreter::{
        types::Category,
        value::{Payload, Value},
    },
};

/// Categories the relational operators accept.
const COMPARABLE: [Category; 4] = [
    Category::Int,
    Category::Float,
    Category::Char,
    Category::String,
];
/// Categories `-`, `*` and `/` accept.
const NUMERIC: [Category; 2] = [Category::Int, Category::Float];
/// Categories `+` accepts.
const ADDABLE: [Category; 6] = [
    Category::Int,
    Category::Float,
    Category::Char,
    Category::String,
    Category::Array,
    Category::Dict,
];
/// Categories `&&` and `||` accept.
const LOGICAL: [Category; 1] = [Category::Bool];

/// Applies a binary operator to two already-evaluated operands.
///
/// Both operands were evaluated eagerly, left first, before this runs;
/// `&&` and `||` do not short-circuit. Operands must be structurally
/// compatible with each other and category-eligible for the operator.
///
/// # Errors
/// `InvalidOperation` when either operand's category is outside what the
/// operator accepts; `InvalidType` with the right operand's type text when
/// the categories are eligible but the types do not match.
pub(crate) fn eval_binary(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    line: usize,
) -> LangResult<Value> {
    match op {
        BinaryOp::And | BinaryOp::Or => logic(op, left, right, line),
        BinaryOp::Equal | BinaryOp::NotEqual => equality(op, left, right, line),
        BinaryOp::LowerThan
        | BinaryOp::LowerEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterEqual => relational(op, left, right, line),
        BinaryOp::Add => add(left, right, line),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => arithmetic(op, left, right, line),
    }
}

/// Picks the error for an operand pair no operator arm matched: an
/// ineligible category is an invalid operation, an eligible pair that
/// fails to match structurally blames the right operand's type.
fn operand_error(left: &Value, right: &Value, allowed: &[Category], line: usize) -> LanguageError {
    if allowed.contains(&left.ty.category()) && allowed.contains(&right.ty.category()) {
        LanguageError::InvalidType {
            type_name: right.ty.to_string(),
            line,
        }
    } else {
        LanguageError::InvalidOperation { line }
    }
}

fn logic(op: BinaryOp, left: &Value, right: &Value, line: usize) -> LangResult<Value> {
    match (&left.payload, &right.payload) {
        (Payload::Bool(a), Payload::Bool(b)) => {
            let result = match op {
                BinaryOp::And => *a && *b,
                BinaryOp::Or => *a || *b,
                _ => unreachable!("logic handles && and || only"),
            };
            Ok(Value::from(result))
        },
        _ => Err(operand_error(left, right, &LOGICAL, line)),
    }
}

/// `==` and `!=` accept any pair of structurally matching types and
/// compare payloads; container payloads compare by contents.
fn equality(op: BinaryOp, left: &Value, right: &Value, line: usize) -> LangResult<Value> {
    if !left.ty.matches(&right.ty) {
        return Err(LanguageError::InvalidType {
            type_name: right.ty.to_string(),
            line,
        });
    }

    let equal = left.payload == right.payload;
    Ok(Value::from(match op {
        BinaryOp::Equal => equal,
        BinaryOp::NotEqual => !equal,
        _ => unreachable!("equality handles == and != only"),
    }))
}

/// `<`, `<=`, `>`, `>=` over `Int`, `Float`, `Char` and `String`; strings
/// compare by length, not lexicographically.
fn relational(op: BinaryOp, left: &Value, right: &Value, line: usize) -> LangResult<Value> {
    match (&left.payload, &right.payload) {
        (Payload::Int(a), Payload::Int(b)) => Ok(Value::from(compare(op, a, b))),
        (Payload::Float(a), Payload::Float(b)) => Ok(Value::from(compare(op, a, b))),
        (Payload::Char(a), Payload::Char(b)) => Ok(Value::from(compare(op, a, b))),
        (Payload::Str(a), Payload::Str(b)) => {
            Ok(Value::from(compare(op, &a.chars().count(), &b.chars().count())))
        },
        _ => Err(operand_error(left, right, &COMPARABLE, line)),
    }
}

fn compare<T: PartialOrd>(op: BinaryOp, a: &T, b: &T) -> bool {
    match op {
        BinaryOp::LowerThan => a < b,
        BinaryOp::LowerEqual => a <= b,
        BinaryOp::GreaterThan => a > b,
        BinaryOp::GreaterEqual => a >= b,
        _ => unreachable!("compare handles the four orderings only"),
    }
}

/// `+` is addition on numbers, a wrapping code sum on chars, concatenation
/// on strings and arrays, and a key-union on dictionaries where the right
/// operand wins collisions. Container results live in fresh storage.
fn add(left: &Value, right: &Value, line: usize) -> LangResult<Value> {
    match (&left.payload, &right.payload) {
        (Payload::Int(a), Payload::Int(b)) => Ok(Value::from(a.wrapping_add(*b))),
        (Payload::Float(a), Payload::Float(b)) => Ok(Value::from(a + b)),
        (Payload::Char(a), Payload::Char(b)) => {
            let code = (*a as u32).wrapping_add(*b as u32);
            Ok(Value::from(char::from_u32(code).unwrap_or('\0')))
        },
        (Payload::Str(a), Payload::Str(b)) => Ok(Value::from(format!("{a}{b}"))),
        (Payload::Array(a), Payload::Array(b)) => {
            if !left.ty.matches(&right.ty) {
                return Err(LanguageError::InvalidType {
                    type_name: right.ty.to_string(),
                    line,
                });
            }

            let mut joined = a.borrow().clone();
            joined.extend(b.borrow().iter().cloned());
            Ok(Value::new(
                left.ty.clone(),
                Payload::Array(Rc::new(RefCell::new(joined))),
            ))
        },
        (Payload::Dict(a), Payload::Dict(b)) => {
            if !left.ty.matches(&right.ty) {
                return Err(LanguageError::InvalidType {
                    type_name: right.ty.to_string(),
                    line,
                });
            }

            let mut merged = a.borrow().clone();
            for (key, value) in b.borrow().iter() {
                merged.insert(key.clone(), value.clone());
            }
            Ok(Value::new(
                left.ty.clone(),
                Payload::Dict(Rc::new(RefCell::new(merged))),
            ))
        },
        _ => Err(operand_error(left, right, &ADDABLE, line)),
    }
}

/// `-`, `*` and `/` over `Int`/`Float`. Integer arithmetic wraps; integer
/// division truncates toward zero and rejects a zero divisor. Float
/// division keeps IEEE semantics, zero divisors included.
fn arithmetic(op: BinaryOp, left: &Value, right: &Value, line: usize) -> LangResult<Value> {
    match (&left.payload, &right.payload) {
        (Payload::Int(a), Payload::Int(b)) => {
            let result = match op {
                BinaryOp::Sub => a.wrapping_sub(*b),
                BinaryOp::Mul => a.wrapping_mul(*b),
                BinaryOp::Div => {
                    if *b == 0 {
                        return Err(LanguageError::InvalidOperation { line });
                    }
                    a.wrapping_div(*b)
                },
                _ => unreachable!("arithmetic handles -, * and / only"),
            };
            Ok(Value::from(result))
        },
        (Payload::Float(a), Payload::Float(b)) => {
            let result = match op {
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                _ => unreachable!("arithmetic handles -, * and / only"),
            };
            Ok(Value::from(result))
        },
        _ => Err(operand_error(left, right, &NUMERIC, line)),
    }
}
