use crate::{
    ast::{ActionOp, BinaryOp, CastOp, Expr, MethodOp, UnaryOp},
    error::LangResult,
    interpreter::{lexer::Token, parser::core::Parser, types::Type, value::Value},
};

impl Parser<'_> {
    // <expr> ::= <cond> [ '?' <expr> ':' <expr> ]
    pub(crate) fn expression(&mut self) -> LangResult<Expr> {
        let condition = self.condition()?;

        if self.peek() == Some(&Token::Ternary) {
            let line = self.eat(&Token::Ternary)?;
            let then_expr = self.expression()?;
            self.eat(&Token::Colon)?;
            let else_expr = self.expression()?;
            return Ok(Expr::Conditional {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
                line,
            });
        }

        Ok(condition)
    }

    // <cond> ::= <rel> { ( '&&' | '||' ) <rel> }
    fn condition(&mut self) -> LangResult<Expr> {
        let mut left = self.relational()?;

        loop {
            let op = match self.peek() {
                Some(Token::And) => BinaryOp::And,
                Some(Token::Or) => BinaryOp::Or,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.relational()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                line,
            };
        }

        Ok(left)
    }

    // <rel> ::= <arith> [ ( '<' | '>' | '<=' | '>=' | '==' | '!=' ) <arith> ]
    //
    // Relational operators do not chain: at most one comparison per level.
    fn relational(&mut self) -> LangResult<Expr> {
        let left = self.additive()?;

        let op = match self.peek() {
            Some(Token::LowerThan) => BinaryOp::LowerThan,
            Some(Token::GreaterThan) => BinaryOp::GreaterThan,
            Some(Token::LowerEqual) => BinaryOp::LowerEqual,
            Some(Token::GreaterEqual) => BinaryOp::GreaterEqual,
            Some(Token::Equals) => BinaryOp::Equal,
            Some(Token::NotEquals) => BinaryOp::NotEqual,
            _ => return Ok(left),
        };
        let line = self.line();
        self.advance();
        let right = self.additive()?;

        Ok(Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
            line,
        })
    }

    // <arith> ::= <term> { ( '+' | '-' ) <term> }
    fn additive(&mut self) -> LangResult<Expr> {
        let mut left = self.multiplicative()?;

        loop {
            let op = match self.peek() {
                Some(Token::Add) => BinaryOp::Add,
                Some(Token::Sub) => BinaryOp::Sub,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.multiplicative()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                line,
            };
        }

        Ok(left)
    }

    // <term> ::= <prefix> { ( '*' | '/' ) <prefix> }
    fn multiplicative(&mut self) -> LangResult<Expr> {
        let mut left = self.prefix()?;

        loop {
            let op = match self.peek() {
                Some(Token::Mul) => BinaryOp::Mul,
                Some(Token::Div) => BinaryOp::Div,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.prefix()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                line,
            };
        }

        Ok(left)
    }

    // <prefix> ::= [ '!' | '-' ] <factor>
    fn prefix(&mut self) -> LangResult<Expr> {
        let op = match self.peek() {
            Some(Token::Not) => Some(UnaryOp::Not),
            Some(Token::Sub) => Some(UnaryOp::Neg),
            _ => None,
        };

        match op {
            Some(op) => {
                let line = self.line();
                self.advance();
                let operand = self.factor()?;
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                    line,
                })
            },
            None => self.factor(),
        }
    }

    // <factor> ::= ( '(' <expr> ')' | <rvalue> ) <function>
    fn factor(&mut self) -> LangResult<Expr> {
        let expr = if self.take(&Token::OpenPar) {
            let inner = self.expression()?;
            self.eat(&Token::ClosePar)?;
            inner
        } else {
            self.rvalue()?
        };

        self.method_chain(expr)
    }

    // <function> ::= { '.' ( <fnoargs> | <fonearg> ) }
    // <fnoargs>  ::= ( count | empty | keys | values ) '(' ')'
    // <fonearg>  ::= ( append | contains ) '(' <expr> ')'
    fn method_chain(&mut self, mut expr: Expr) -> LangResult<Expr> {
        while self.take(&Token::Dot) {
            let (op, takes_argument) = match self.peek() {
                Some(Token::Count) => (MethodOp::Count, false),
                Some(Token::Empty) => (MethodOp::Empty, false),
                Some(Token::Keys) => (MethodOp::Keys, false),
                Some(Token::Values) => (MethodOp::Values, false),
                Some(Token::Append) => (MethodOp::Append, true),
                Some(Token::Contains) => (MethodOp::Contains, true),
                _ => return self.unexpected(),
            };
            let line = self.line();
            self.advance();
            self.eat(&Token::OpenPar)?;
            let argument = if takes_argument {
                Some(Box::new(self.expression()?))
            } else {
                None
            };
            self.eat(&Token::ClosePar)?;

            expr = Expr::Method {
                op,
                target: Box::new(expr),
                argument,
                line,
            };
        }

        Ok(expr)
    }

    // <rvalue> ::= <const> | <action> | <cast> | <array> | <dict> | <lvalue>
    fn rvalue(&mut self) -> LangResult<Expr> {
        match self.peek() {
            Some(
                Token::False
                | Token::True
                | Token::IntegerLiteral(_)
                | Token::FloatLiteral(_)
                | Token::CharLiteral(_)
                | Token::StringLiteral(_),
            ) => self.constant(),
            Some(Token::Read | Token::Random) => self.action(),
            Some(
                Token::ToBool | Token::ToInt | Token::ToFloat | Token::ToChar | Token::ToString,
            ) => self.cast(),
            Some(Token::Array) => self.array_literal(),
            Some(Token::Dict) => self.dict_literal(),
            Some(Token::Name(_)) => self.lvalue(),
            _ => self.unexpected(),
        }
    }

    // <const> ::= <bool> | <int> | <float> | <char> | <string>
    fn constant(&mut self) -> LangResult<Expr> {
        let (value, line) = match self.advance() {
            Some((Token::False, line)) => (Value::from(false), line),
            Some((Token::True, line)) => (Value::from(true), line),
            Some((Token::IntegerLiteral(i), line)) => (Value::from(*i), line),
            Some((Token::FloatLiteral(x), line)) => (Value::from(*x), line),
            Some((Token::CharLiteral(c), line)) => (Value::from(*c), line),
            Some((Token::StringLiteral(s), line)) => (Value::from(s.as_str()), line),
            _ => unreachable!("constant parsed from a non-literal token"),
        };

        Ok(Expr::Constant { value, line })
    }

    // <action> ::= ( read | random ) '(' ')'
    fn action(&mut self) -> LangResult<Expr> {
        let (op, line) = match self.advance() {
            Some((Token::Read, line)) => (ActionOp::Read, line),
            Some((Token::Random, line)) => (ActionOp::Random, line),
            _ => unreachable!("action parsed from a non-action token"),
        };
        self.eat(&Token::OpenPar)?;
        self.eat(&Token::ClosePar)?;

        Ok(Expr::Action { op, line })
    }

    // <cast> ::= ( toBool | toInt | toFloat | toChar | toString ) '(' <expr> ')'
    fn cast(&mut self) -> LangResult<Expr> {
        let (op, line) = match self.advance() {
            Some((Token::ToBool, line)) => (CastOp::ToBool, line),
            Some((Token::ToInt, line)) => (CastOp::ToInt, line),
            Some((Token::ToFloat, line)) => (CastOp::ToFloat, line),
            Some((Token::ToChar, line)) => (CastOp::ToChar, line),
            Some((Token::ToString, line)) => (CastOp::ToString, line),
            _ => unreachable!("cast parsed from a non-cast token"),
        };
        self.eat(&Token::OpenPar)?;
        let operand = self.expression()?;
        self.eat(&Token::ClosePar)?;

        Ok(Expr::Cast {
            op,
            operand: Box::new(operand),
            line,
        })
    }

    // <array> ::= <arraytype> '(' [ <expr> { ',' <expr> } ] ')'
    fn array_literal(&mut self) -> LangResult<Expr> {
        let line = self.line();
        let Type::Array(element) = self.array_type()? else {
            unreachable!("array type parsing yields an array type");
        };

        self.eat(&Token::OpenPar)?;
        let mut items = Vec::new();
        if self.peek() != Some(&Token::ClosePar) {
            items.push(self.expression()?);
            while self.take(&Token::Comma) {
                items.push(self.expression()?);
            }
        }
        self.eat(&Token::ClosePar)?;

        Ok(Expr::ArrayLiteral {
            element: *element,
            items,
            line,
        })
    }

    // <dict> ::= <dicttype> '(' [ <expr> ':' <expr> { ',' <expr> ':' <expr> } ] ')'
    fn dict_literal(&mut self) -> LangResult<Expr> {
        let line = self.line();
        let Type::Dict(key, value) = self.dict_type()? else {
            unreachable!("dict type parsing yields a dict type");
        };

        self.eat(&Token::OpenPar)?;
        let mut entries = Vec::new();
        if self.peek() != Some(&Token::ClosePar) {
            entries.push(self.dict_entry()?);
            while self.take(&Token::Comma) {
                entries.push(self.dict_entry()?);
            }
        }
        self.eat(&Token::ClosePar)?;

        Ok(Expr::DictLiteral {
            key: *key,
            value: *value,
            entries,
            line,
        })
    }

    fn dict_entry(&mut self) -> LangResult<(Expr, Expr)> {
        let key = self.expression()?;
        self.eat(&Token::Colon)?;
        let value = self.expression()?;

        Ok((key, value))
    }

    // <lvalue> ::= <name> { '[' <expr> ']' }
    //
    // The name resolves to its cell right here; this is the only place
    // references are looked up.
    fn lvalue(&mut self) -> LangResult<Expr> {
        let (name, line) = self.name()?;
        let cell = self.env.get(&name, line)?;
        let mut expr = Expr::Variable { cell, line };

        while self.peek() == Some(&Token::OpenBracket) {
            let line = self.eat(&Token::OpenBracket)?;
            let index = self.expression()?;
            self.eat(&Token::CloseBracket)?;
            expr = Expr::Access {
                base: Box::new(expr),
                index: Box::new(index),
                line,
            };
        }

        Ok(expr)
    }
}
