use std::{iter::Peekable, slice};

use crate::{
    ast::Stmt,
    error::{LangResult, LanguageError},
    interpreter::{env::Environment, lexer::Token, types::Type},
};

/// The recursive-descent parser and binder.
///
/// It walks the scanned `(token, line)` pairs with one token of lookahead
/// and builds the executable tree bottom-up. Binding is fused into
/// parsing: a declaration allocates a cell in the current scope of the
/// borrowed [`Environment`] and a name reference resolves to its cell on
/// the spot, so the finished tree needs no later resolution pass. The
/// environment outlives the parser, which is how the interactive mode
/// keeps globals alive from one line to the next.
///
/// The first syntax error aborts the parse; there is no recovery.
pub struct Parser<'a> {
    tokens: Peekable<slice::Iter<'a, (Token, usize)>>,
    pub(crate) env: &'a mut Environment,
    last_line: usize,
}

impl<'a> Parser<'a> {
    /// Prepares a parse of `tokens` binding against `env`.
    pub fn new(tokens: &'a [(Token, usize)], env: &'a mut Environment) -> Self {
        let last_line = tokens.last().map_or(1, |(_, line)| *line);
        Self {
            tokens: tokens.iter().peekable(),
            env,
            last_line,
        }
    }

    /// Parses a whole program: a statement sequence running to the end of
    /// the token stream.
    ///
    /// # Errors
    /// Any language error raised while parsing or binding.
    pub fn parse(mut self) -> LangResult<Vec<Stmt>> {
        let statements = self.code()?;
        match self.tokens.peek() {
            None => Ok(statements),
            Some(_) => self.unexpected(),
        }
    }

    /// The upcoming token, without consuming it.
    pub(crate) fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek().map(|(token, _)| token)
    }

    /// The line of the upcoming token, or of the last token once the
    /// stream is exhausted.
    pub(crate) fn line(&mut self) -> usize {
        self.tokens.peek().map_or(self.last_line, |(_, line)| *line)
    }

    /// Consumes and returns the next token with its line.
    pub(crate) fn advance(&mut self) -> Option<(&'a Token, usize)> {
        self.tokens.next().map(|(token, line)| (token, *line))
    }

    /// Consumes the next token if it equals `kind`.
    pub(crate) fn take(&mut self, kind: &Token) -> bool {
        if self.peek() == Some(kind) {
            self.advance();
            return true;
        }
        false
    }

    /// Requires the next token to be `kind` and returns its line.
    ///
    /// # Errors
    /// The generic syntax error for whatever sits there instead.
    pub(crate) fn eat(&mut self, kind: &Token) -> LangResult<usize> {
        let line = self.line();
        if self.take(kind) {
            Ok(line)
        } else {
            self.unexpected()
        }
    }

    /// Reports the current token as unusable here: unexpected end of file
    /// when the stream is exhausted, otherwise an unexpected lexeme with
    /// the token's source spelling.
    pub(crate) fn unexpected<T>(&mut self) -> LangResult<T> {
        let line = self.line();
        match self.tokens.peek() {
            None => Err(LanguageError::UnexpectedEof { line }),
            Some((token, _)) => Err(LanguageError::UnexpectedLexeme {
                lexeme: token.to_string(),
                line,
            }),
        }
    }

    /// Requires a name token and returns it with its line.
    pub(crate) fn name(&mut self) -> LangResult<(String, usize)> {
        match self.peek() {
            Some(Token::Name(_)) => match self.advance() {
                Some((Token::Name(name), line)) => Ok((name.clone(), line)),
                _ => unreachable!("peeked token changed under the parser"),
            },
            _ => self.unexpected(),
        }
    }

    // <type> ::= <primitive> | <composed>
    pub(crate) fn type_expr(&mut self) -> LangResult<Type> {
        match self.peek() {
            Some(Token::Bool) => {
                self.advance();
                Ok(Type::Bool)
            },
            Some(Token::Int) => {
                self.advance();
                Ok(Type::Int)
            },
            Some(Token::Float) => {
                self.advance();
                Ok(Type::Float)
            },
            Some(Token::Char) => {
                self.advance();
                Ok(Type::Char)
            },
            Some(Token::String) => {
                self.advance();
                Ok(Type::String)
            },
            Some(Token::Array) => self.array_type(),
            Some(Token::Dict) => self.dict_type(),
            _ => self.unexpected(),
        }
    }

    // <arraytype> ::= Array '<' <type> '>'
    pub(crate) fn array_type(&mut self) -> LangResult<Type> {
        self.eat(&Token::Array)?;
        self.eat(&Token::LowerThan)?;
        let inner = self.type_expr()?;
        self.eat(&Token::GreaterThan)?;

        Ok(Type::Array(Box::new(inner)))
    }

    // <dicttype> ::= Dict '<' <type> ',' <type> '>'
    pub(crate) fn dict_type(&mut self) -> LangResult<Type> {
        self.eat(&Token::Dict)?;
        self.eat(&Token::LowerThan)?;
        let key = self.type_expr()?;
        self.eat(&Token::Comma)?;
        let value = self.type_expr()?;
        self.eat(&Token::GreaterThan)?;

        Ok(Type::Dict(Box::new(key), Box::new(value)))
    }
}
