use crate::{
    ast::{DeclUnit, Stmt},
    error::{LangResult, LanguageError},
    interpreter::{lexer::Token, parser::core::Parser},
};

impl Parser<'_> {
    // <code> ::= { <cmd> }
    pub(crate) fn code(&mut self) -> LangResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while self.starts_statement() {
            statements.push(self.statement()?);
        }

        Ok(statements)
    }

    fn starts_statement(&mut self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::OpenBrace
                    | Token::Var
                    | Token::Let
                    | Token::Print
                    | Token::Println
                    | Token::Dump
                    | Token::If
                    | Token::While
                    | Token::For
            )
        ) || self.starts_expression()
    }

    pub(crate) fn starts_expression(&mut self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Not
                    | Token::Sub
                    | Token::OpenPar
                    | Token::False
                    | Token::True
                    | Token::IntegerLiteral(_)
                    | Token::FloatLiteral(_)
                    | Token::CharLiteral(_)
                    | Token::StringLiteral(_)
                    | Token::Read
                    | Token::Random
                    | Token::ToBool
                    | Token::ToInt
                    | Token::ToFloat
                    | Token::ToChar
                    | Token::ToString
                    | Token::Array
                    | Token::Dict
                    | Token::Name(_)
            )
        )
    }

    // <cmd> ::= <block> | <decl> | <print> | <dump> | <if> | <while>
    //         | <for> | <assign>
    fn statement(&mut self) -> LangResult<Stmt> {
        match self.peek().cloned() {
            Some(Token::OpenBrace) => self.block(),
            Some(Token::Var) => self.var_decl(),
            Some(Token::Let) => self.let_decl(),
            Some(Token::Print | Token::Println) => self.print(),
            Some(Token::Dump) => self.dump(),
            Some(Token::If) => self.if_stmt(),
            Some(Token::While) => self.while_stmt(),
            Some(Token::For) => self.for_stmt(),
            _ if self.starts_expression() => self.assign(),
            _ => self.unexpected(),
        }
    }

    // <block> ::= '{' <code> '}'
    fn block(&mut self) -> LangResult<Stmt> {
        let line = self.eat(&Token::OpenBrace)?;
        self.env.push_scope();
        let statements = self.code()?;
        self.env.pop_scope();
        self.eat(&Token::CloseBrace)?;

        Ok(Stmt::Block { statements, line })
    }

    // <var> ::= var <name> ':' <type> [ '=' <expr> ]
    //           { ',' <name> ':' <type> [ '=' <expr> ] } [';']
    fn var_decl(&mut self) -> LangResult<Stmt> {
        let line = self.eat(&Token::Var)?;
        let units = self.declarators(false)?;
        self.take(&Token::Semicolon);

        Ok(Stmt::VarDecl { units, line })
    }

    // <let> ::= let <name> ':' <type> '=' <expr>
    //           { ',' <name> ':' <type> '=' <expr> } [';']
    fn let_decl(&mut self) -> LangResult<Stmt> {
        let line = self.eat(&Token::Let)?;
        let units = self.declarators(true)?;
        self.take(&Token::Semicolon);

        Ok(Stmt::LetDecl { units, line })
    }

    fn declarators(&mut self, constant: bool) -> LangResult<Vec<DeclUnit>> {
        let mut units = vec![self.declarator(constant)?];
        while self.take(&Token::Comma) {
            units.push(self.declarator(constant)?);
        }

        Ok(units)
    }

    /// One `name ':' type [= expr]` declarator. The cell is allocated
    /// before the initializer parses, so the initializer can only observe
    /// the new name as an uninitialized variable.
    fn declarator(&mut self, constant: bool) -> LangResult<DeclUnit> {
        let (name, line) = self.name()?;
        self.eat(&Token::Colon)?;
        let ty = self.type_expr()?;
        let variable = self.env.declare(&name, ty, constant, line)?;

        let initializer = if constant {
            self.eat(&Token::Assign)?;
            Some(self.expression()?)
        } else if self.take(&Token::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        Ok(DeclUnit {
            variable,
            initializer,
            line,
        })
    }

    // <print> ::= (print | println) '(' <expr> ')' [';']
    fn print(&mut self) -> LangResult<Stmt> {
        let newline = matches!(self.peek(), Some(Token::Println));
        let line = self.line();
        self.advance();
        self.eat(&Token::OpenPar)?;
        let expr = self.expression()?;
        self.eat(&Token::ClosePar)?;
        self.take(&Token::Semicolon);

        Ok(Stmt::Print {
            expr,
            newline,
            line,
        })
    }

    // <dump> ::= dump '(' <expr> ')' [';']
    fn dump(&mut self) -> LangResult<Stmt> {
        let line = self.eat(&Token::Dump)?;
        self.eat(&Token::OpenPar)?;
        let expr = self.expression()?;
        self.eat(&Token::ClosePar)?;
        self.take(&Token::Semicolon);

        Ok(Stmt::Dump { expr, line })
    }

    // <if> ::= if <expr> <cmd> [ else <cmd> ]
    fn if_stmt(&mut self) -> LangResult<Stmt> {
        let line = self.eat(&Token::If)?;
        let condition = self.expression()?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.take(&Token::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            line,
        })
    }

    // <while> ::= while <expr> <cmd>
    fn while_stmt(&mut self) -> LangResult<Stmt> {
        let line = self.eat(&Token::While)?;
        let condition = self.expression()?;
        self.env.push_scope();
        let body = Box::new(self.statement()?);
        self.env.pop_scope();

        Ok(Stmt::While {
            condition,
            body,
            line,
        })
    }

    // <for> ::= for ( <name> | ( var | let ) <name> ':' <type> ) in <expr> <cmd>
    //
    // The declaring forms bind the loop variable in an implicit scope that
    // covers the loop; the bare-name form rebinds a variable that already
    // exists in an enclosing scope.
    fn for_stmt(&mut self) -> LangResult<Stmt> {
        let line = self.eat(&Token::For)?;
        self.env.push_scope();

        let variable = match self.peek() {
            Some(Token::Var | Token::Let) => {
                let constant = matches!(self.peek(), Some(Token::Let));
                self.advance();
                let (name, name_line) = self.name()?;
                self.eat(&Token::Colon)?;
                let ty = self.type_expr()?;
                self.env.declare(&name, ty, constant, name_line)?
            },
            _ => {
                let (name, name_line) = self.name()?;
                self.env.get(&name, name_line)?
            },
        };

        self.eat(&Token::In)?;
        let source = self.expression()?;
        let body = Box::new(self.statement()?);
        self.env.pop_scope();

        Ok(Stmt::For {
            variable,
            source,
            body,
            line,
        })
    }

    // <assign> ::= <expr> [ '=' <expr> ] [';']
    fn assign(&mut self) -> LangResult<Stmt> {
        let first = self.expression()?;

        let stmt = if self.peek() == Some(&Token::Assign) {
            let line = self.eat(&Token::Assign)?;
            if !first.is_settable() {
                return Err(LanguageError::UnexpectedLexeme {
                    lexeme: Token::Assign.to_string(),
                    line,
                });
            }
            let value = self.expression()?;
            Stmt::Assign {
                target: Some(first),
                value,
                line,
            }
        } else {
            let line = first.line_number();
            Stmt::Assign {
                target: None,
                value: first,
                line,
            }
        };
        self.take(&Token::Semicolon);

        Ok(stmt)
    }
}
