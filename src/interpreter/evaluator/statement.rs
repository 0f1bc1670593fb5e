use std::io::{BufRead, Write};

use crate::{
    ast::{DeclUnit, Expr, Stmt},
    error::{LangResult, LanguageError},
    interpreter::{
        env::Cell,
        evaluator::core::Interpreter,
        types::Type,
        value::{Payload, Value},
    },
};

impl<R: BufRead, W: Write> Interpreter<R, W> {
    /// Executes one statement node.
    ///
    /// # Errors
    /// Any language error raised while evaluating a contained expression
    /// or writing a variable cell.
    pub fn execute(&mut self, statement: &Stmt) -> LangResult<()> {
        match statement {
            Stmt::Block { statements, .. } => {
                for inner in statements {
                    self.execute(inner)?;
                }
                Ok(())
            },
            Stmt::VarDecl { units, .. } | Stmt::LetDecl { units, .. } => self.execute_decl(units),
            Stmt::Print { expr, newline, .. } => self.execute_print(expr, *newline),
            Stmt::Dump { expr, .. } => self.execute_dump(expr),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                line,
            } => self.execute_if(condition, then_branch, else_branch.as_deref(), *line),
            Stmt::While {
                condition,
                body,
                line,
            } => self.execute_while(condition, body, *line),
            Stmt::For {
                variable,
                source,
                body,
                line,
            } => self.execute_for(variable, source, body, *line),
            Stmt::Assign {
                target, value, ..
            } => self.execute_assign(target.as_ref(), value),
        }
    }

    /// Runs the initializers of a declaration statement in source order.
    /// The cells already exist; this is their first write.
    fn execute_decl(&mut self, units: &[DeclUnit]) -> LangResult<()> {
        for unit in units {
            if let Some(initializer) = &unit.initializer {
                let value = self.eval(initializer)?;
                unit.variable.borrow_mut().initialize(value, unit.line)?;
            }
        }

        Ok(())
    }

    fn execute_print(&mut self, expr: &Expr, newline: bool) -> LangResult<()> {
        let value = self.eval(expr)?;
        if newline {
            writeln!(self.out, "{}", value.payload)
        } else {
            write!(self.out, "{}", value.payload)
        }
        .expect("program output must stay writable");
        self.out.flush().expect("program output must stay writable");

        Ok(())
    }

    fn execute_dump(&mut self, expr: &Expr) -> LangResult<()> {
        let value = self.eval(expr)?;
        writeln!(self.out, "{value}").expect("program output must stay writable");

        Ok(())
    }

    fn execute_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
        line: usize,
    ) -> LangResult<()> {
        let value = self.eval(condition)?;
        match value.payload {
            Payload::Bool(true) => self.execute(then_branch),
            Payload::Bool(false) => match else_branch {
                Some(branch) => self.execute(branch),
                None => Ok(()),
            },
            _ => Err(LanguageError::InvalidType {
                type_name: value.ty.to_string(),
                line,
            }),
        }
    }

    fn execute_while(&mut self, condition: &Expr, body: &Stmt, line: usize) -> LangResult<()> {
        loop {
            let value = self.eval(condition)?;
            let keep_going = match value.payload {
                Payload::Bool(b) => b,
                _ => {
                    return Err(LanguageError::InvalidType {
                        type_name: value.ty.to_string(),
                        line,
                    })
                },
            };
            if !keep_going {
                return Ok(());
            }

            self.execute(body)?;
        }
    }

    /// Iterates an array or string source in its natural order, writing
    /// each element into the shared loop-variable cell before running the
    /// body.
    fn execute_for(
        &mut self,
        variable: &Cell,
        source: &Expr,
        body: &Stmt,
        line: usize,
    ) -> LangResult<()> {
        let value = self.eval(source)?;

        match (&value.ty, &value.payload) {
            (Type::String, Payload::Str(text)) => {
                if !matches!(variable.borrow().ty(), Type::Char) {
                    let type_name = variable.borrow().ty().to_string();
                    return Err(LanguageError::InvalidType { type_name, line });
                }

                for c in text.chars() {
                    write_loop_variable(variable, Value::from(c), line)?;
                    self.execute(body)?;
                }
                Ok(())
            },
            (Type::Array(element), Payload::Array(items)) => {
                // Snapshot the elements so the body may grow or shrink the
                // array without upsetting the iteration.
                let snapshot: Vec<Payload> = items.borrow().clone();
                for payload in snapshot {
                    let element_value = Value::new((**element).clone(), payload);
                    write_loop_variable(variable, element_value, line)?;
                    self.execute(body)?;
                }
                Ok(())
            },
            _ => Err(LanguageError::InvalidOperation { line }),
        }
    }

    /// With a target, a type-checked store; without one, the expression
    /// runs for its effects and the value is dropped.
    fn execute_assign(&mut self, target: Option<&Expr>, value_expr: &Expr) -> LangResult<()> {
        let value = self.eval(value_expr)?;
        match target {
            Some(target) => self.store(target, value),
            None => Ok(()),
        }
    }
}

/// A constant loop variable is (re)initialized each iteration, a mutable
/// one is set; both paths check the element type against the declared one.
fn write_loop_variable(variable: &Cell, value: Value, line: usize) -> LangResult<()> {
    let constant = variable.borrow().is_constant();
    if constant {
        variable.borrow_mut().initialize(value, line)
    } else {
        variable.borrow_mut().set(value, line)
    }
}
