use std::io::{BufRead, Write};

use crate::{
    ast::Expr,
    error::{LangResult, LanguageError},
    interpreter::{
        evaluator::core::Interpreter,
        types::Type,
        value::{Payload, Value},
    },
};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Reads `base[index]`.
    ///
    /// Strings and arrays take an `Int` index and yield the character or
    /// element at that position; dictionaries take a key matching their
    /// key type. The base evaluates before the index.
    ///
    /// # Errors
    /// `InvalidType` for an index/key of the wrong type, and
    /// `InvalidOperation` for a non-indexable base, an out-of-range index
    /// or an absent key.
    pub(crate) fn eval_access(
        &mut self,
        base: &Expr,
        index: &Expr,
        line: usize,
    ) -> LangResult<Value> {
        let base_value = self.eval(base)?;
        let index_value = self.eval(index)?;

        match (&base_value.ty, &base_value.payload) {
            (Type::String, Payload::Str(text)) => {
                let position = int_index(&index_value, line)?;
                text.chars()
                    .nth(position)
                    .map(Value::from)
                    .ok_or(LanguageError::InvalidOperation { line })
            },
            (Type::Array(element), Payload::Array(items)) => {
                let position = int_index(&index_value, line)?;
                let payload = items
                    .borrow()
                    .get(position)
                    .cloned()
                    .ok_or(LanguageError::InvalidOperation { line })?;

                Ok(Value::new((**element).clone(), payload))
            },
            (Type::Dict(key, value), Payload::Dict(entries)) => {
                if !index_value.ty.matches(key) {
                    return Err(LanguageError::InvalidType {
                        type_name: index_value.ty.to_string(),
                        line,
                    });
                }
                let payload = entries
                    .borrow()
                    .get(&index_value.payload)
                    .cloned()
                    .ok_or(LanguageError::InvalidOperation { line })?;

                Ok(Value::new((**value).clone(), payload))
            },
            _ => Err(LanguageError::InvalidOperation { line }),
        }
    }

    /// Writes through `base[index]`.
    ///
    /// Array and dictionary writes mutate the shared container in place; a
    /// dictionary write inserts or overwrites the key. Characters of a
    /// string are immutable, so a string write rebuilds the text and
    /// stores it back through the base target, which must accept it.
    pub(crate) fn store_access(
        &mut self,
        base: &Expr,
        index: &Expr,
        value: Value,
        line: usize,
    ) -> LangResult<()> {
        let base_value = self.eval(base)?;
        let index_value = self.eval(index)?;

        match (&base_value.ty, &base_value.payload) {
            (Type::String, Payload::Str(text)) => {
                let position = int_index(&index_value, line)?;
                if !value.ty.matches(&Type::Char) {
                    return Err(LanguageError::InvalidType {
                        type_name: value.ty.to_string(),
                        line,
                    });
                }
                if position >= text.chars().count() {
                    return Err(LanguageError::InvalidOperation { line });
                }
                let Payload::Char(written) = value.payload else {
                    unreachable!("a Char-typed value holds a char payload");
                };

                let rebuilt: String = text
                    .chars()
                    .enumerate()
                    .map(|(i, c)| if i == position { written } else { c })
                    .collect();
                self.store(base, Value::from(rebuilt))
            },
            (Type::Array(element), Payload::Array(items)) => {
                let position = int_index(&index_value, line)?;
                if !value.ty.matches(element) {
                    return Err(LanguageError::InvalidOperation { line });
                }

                let mut items = items.borrow_mut();
                match items.get_mut(position) {
                    Some(slot) => {
                        *slot = value.payload;
                        Ok(())
                    },
                    None => Err(LanguageError::InvalidOperation { line }),
                }
            },
            (Type::Dict(key, dict_value), Payload::Dict(entries)) => {
                if !index_value.ty.matches(key) {
                    return Err(LanguageError::InvalidType {
                        type_name: index_value.ty.to_string(),
                        line,
                    });
                }
                if !value.ty.matches(dict_value) {
                    return Err(LanguageError::InvalidOperation { line });
                }

                entries.borrow_mut().insert(index_value.payload, value.payload);
                Ok(())
            },
            _ => Err(LanguageError::InvalidOperation { line }),
        }
    }
}

/// An index into a string or array must be `Int`, and in range once it
/// is; a negative index is out of range by definition.
fn int_index(index: &Value, line: usize) -> LangResult<usize> {
    match index.payload {
        Payload::Int(i) => {
            usize::try_from(i).map_err(|_| LanguageError::InvalidOperation { line })
        },
        _ => Err(LanguageError::InvalidType {
            type_name: index.ty.to_string(),
            line,
        }),
    }
}
