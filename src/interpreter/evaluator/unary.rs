use crate::{
    ast::UnaryOp,
    error::{LangResult, LanguageError},
    interpreter::value::{Payload, Value},
};

/// Applies a unary operator: `!` on `Bool`, sign negation on `Int` and
/// `Float`. Integer negation wraps.
///
/// # Errors
/// `InvalidType` with the operand's type text for any other category.
pub(crate) fn eval_unary(op: UnaryOp, value: &Value, line: usize) -> LangResult<Value> {
    match (op, &value.payload) {
        (UnaryOp::Not, Payload::Bool(b)) => Ok(Value::from(!b)),
        (UnaryOp::Neg, Payload::Int(i)) => Ok(Value::from(i.wrapping_neg())),
        (UnaryOp::Neg, Payload::Float(x)) => Ok(Value::from(-x)),
        _ => Err(LanguageError::InvalidType {
            type_name: value.ty.to_string(),
            line,
        }),
    }
}
