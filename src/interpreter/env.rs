use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    error::{LangResult, LanguageError},
    interpreter::{types::Type, value::Value},
};

/// A shared, mutable storage cell for one declared variable.
///
/// Cells are handed out by the [`Environment`] at declaration time and
/// embedded directly into every tree node that references the name, so the
/// evaluator never looks names up.
pub type Cell = Rc<RefCell<Variable>>;

/// The storage behind one declared name: its declared type, whether it was
/// bound with `let`, and the current value (absent until the first
/// assignment).
#[derive(Debug)]
pub struct Variable {
    name: String,
    ty: Type,
    constant: bool,
    value: Option<Value>,
}

impl Variable {
    fn new(name: &str, ty: Type, constant: bool) -> Self {
        Self {
            name: name.to_string(),
            ty,
            constant,
            value: None,
        }
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    #[must_use]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Whether this cell was bound with `let`.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        self.constant
    }

    /// Reads the current value.
    ///
    /// # Errors
    /// `UninitializedVariable` if nothing has been assigned yet.
    pub fn value(&self, line: usize) -> LangResult<Value> {
        self.value.clone().ok_or_else(|| LanguageError::UninitializedVariable {
            name: self.name.clone(),
            line,
        })
    }

    /// First assignment. Permitted on constants, so `let` initializers and
    /// constant loop variables go through here.
    ///
    /// # Errors
    /// `InvalidType` if the value does not structurally match the declared
    /// type.
    pub fn initialize(&mut self, value: Value, line: usize) -> LangResult<()> {
        self.write(value, true, line)
    }

    /// Any later assignment.
    ///
    /// # Errors
    /// `ConstantAssignment` on a `let`-bound cell, `InvalidType` on a
    /// structural mismatch with the declared type.
    pub fn set(&mut self, value: Value, line: usize) -> LangResult<()> {
        self.write(value, false, line)
    }

    fn write(&mut self, value: Value, initialize: bool, line: usize) -> LangResult<()> {
        if !initialize && self.constant {
            return Err(LanguageError::ConstantAssignment {
                name: self.name.clone(),
                line,
            });
        }
        if !self.ty.matches(&value.ty) {
            return Err(LanguageError::InvalidType {
                type_name: value.ty.to_string(),
                line,
            });
        }
        self.value = Some(value);
        Ok(())
    }
}

/// The lexical scope chain the parser binds against.
///
/// Scopes form a stack: the bottom scope holds the globals and outlives
/// every parse (the interactive mode reuses it line after line), and one
/// scope is pushed per block, loop body and `for` loop-variable binding for
/// exactly the syntactic extent of that construct. Declaring allocates a
/// [`Cell`] in the innermost scope; lookup walks from the innermost scope
/// outward, so inner declarations shadow outer ones.
#[derive(Debug, Default)]
pub struct Environment {
    scopes: Vec<HashMap<String, Cell>>,
}

impl Environment {
    /// An environment holding only the empty global scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Opens a nested scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Closes the innermost scope, dropping its name bindings. Cells stay
    /// alive for as long as some tree node references them.
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "global scope must survive");
    }

    /// Current depth of the scope stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Drops scopes down to `depth`. Used to rewind after an aborted parse
    /// left block scopes open.
    pub fn truncate(&mut self, depth: usize) {
        self.scopes.truncate(depth.max(1));
    }

    /// Allocates a cell for `name` in the innermost scope.
    ///
    /// # Errors
    /// `AlreadyDeclaredVariable` if the innermost scope already binds the
    /// name. Shadowing an outer scope's binding is fine.
    pub fn declare(
        &mut self,
        name: &str,
        ty: Type,
        constant: bool,
        line: usize,
    ) -> LangResult<Cell> {
        let scope = self
            .scopes
            .last_mut()
            .expect("the scope stack always holds the global scope");
        if scope.contains_key(name) {
            return Err(LanguageError::AlreadyDeclaredVariable {
                name: name.to_string(),
                line,
            });
        }

        let cell = Rc::new(RefCell::new(Variable::new(name, ty, constant)));
        scope.insert(name.to_string(), cell.clone());

        Ok(cell)
    }

    /// Resolves `name` to the nearest enclosing cell.
    ///
    /// # Errors
    /// `UndeclaredVariable` if no scope binds the name.
    pub fn get(&self, name: &str, line: usize) -> LangResult<Cell> {
        for scope in self.scopes.iter().rev() {
            if let Some(cell) = scope.get(name) {
                return Ok(cell.clone());
            }
        }

        Err(LanguageError::UndeclaredVariable {
            name: name.to_string(),
            line,
        })
    }
}
