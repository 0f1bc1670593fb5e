use crate::{
    ast::CastOp,
    interpreter::value::{Payload, Value},
};

/// Applies a cast. Casts are total: every source category produces a
/// value, with unsupported sources degrading to the target's zero value
/// (`0`, `0.0`, `false`, the NUL character) instead of failing.
pub(crate) fn eval_cast(op: CastOp, value: &Value) -> Value {
    match op {
        CastOp::ToBool => to_bool(value),
        CastOp::ToInt => to_int(value),
        CastOp::ToFloat => to_float(value),
        CastOp::ToChar => to_char(value),
        CastOp::ToString => to_string(value),
    }
}

/// Numbers convert by non-zeroness, chars by not being the digit `'0'`,
/// containers by non-emptiness; strings have no boolean reading and give
/// `false`.
fn to_bool(value: &Value) -> Value {
    let result = match &value.payload {
        Payload::Bool(b) => *b,
        Payload::Int(i) => *i != 0,
        Payload::Float(x) => *x != 0.0,
        Payload::Char(c) => *c != '0',
        Payload::Str(_) => false,
        Payload::Array(items) => !items.borrow().is_empty(),
        Payload::Dict(entries) => !entries.borrow().is_empty(),
    };

    Value::from(result)
}

fn to_int(value: &Value) -> Value {
    let result = match &value.payload {
        Payload::Int(i) => *i,
        Payload::Float(x) => *x as i32,
        Payload::Char(c) => *c as i32,
        _ => 0,
    };

    Value::from(result)
}

fn to_float(value: &Value) -> Value {
    let result = match &value.payload {
        Payload::Int(i) => *i as f32,
        Payload::Float(x) => *x,
        Payload::Char(c) => *c as u32 as f32,
        _ => 0.0,
    };

    Value::from(result)
}

fn to_char(value: &Value) -> Value {
    let result = match &value.payload {
        Payload::Int(i) => char::from_u32(*i as u32).unwrap_or('\0'),
        Payload::Char(c) => *c,
        _ => '\0',
    };

    Value::from(result)
}

/// The one cast that never degrades: any payload has a textual rendering.
fn to_string(value: &Value) -> Value {
    Value::from(value.payload.to_string())
}
