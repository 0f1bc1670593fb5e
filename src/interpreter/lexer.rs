use logos::{FilterResult, Lexer, Logos, Skip};

use crate::error::{LangResult, LanguageError};

/// State carried by the lexer across tokens.
///
/// Tracks the current line number so every token, and every lexical error,
/// can be reported against its source line.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Lexical failure modes.
///
/// The scanner distinguishes text that is not a lexeme at all (a lone `&`,
/// an over-long character literal) from input that ends inside an open
/// construct (an unterminated string or block comment).
#[derive(Default, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// The slice under the lexer is not a valid lexeme.
    #[default]
    InvalidLexeme,
    /// The source ended inside a comment or literal.
    UnexpectedEof,
}

/// A lexical token of the language.
///
/// Keywords, symbols and operators are payload-free variants; names and
/// literals carry their decoded payload. Numeric literal decoding is
/// best-effort: text the 32-bit representations cannot hold decodes to
/// zero rather than failing the scan.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = LexerExtras)]
#[logos(error = ScanError)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    // Layout. Neither variant ever reaches the token stream; the callbacks
    // skip them while keeping the line count honest.
    #[token("\n", newline)]
    Newline,
    #[token("/*", block_comment)]
    Comment,

    // Symbols.
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("(")]
    OpenPar,
    #[token(")")]
    ClosePar,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,

    // Operators. A lone `&` or `|` matches nothing here and surfaces as an
    // invalid lexeme.
    #[token("=")]
    Assign,
    #[token("?")]
    Ternary,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("<")]
    LowerThan,
    #[token(">")]
    GreaterThan,
    #[token("<=")]
    LowerEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("==")]
    Equals,
    #[token("!=")]
    NotEquals,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("!")]
    Not,

    // Keywords.
    #[token("var")]
    Var,
    #[token("let")]
    Let,
    #[token("print")]
    Print,
    #[token("println")]
    Println,
    #[token("dump")]
    Dump,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("Bool")]
    Bool,
    #[token("Int")]
    Int,
    #[token("Float")]
    Float,
    #[token("Char")]
    Char,
    #[token("String")]
    String,
    #[token("Array")]
    Array,
    #[token("Dict")]
    Dict,
    #[token("false")]
    False,
    #[token("true")]
    True,
    #[token("read")]
    Read,
    #[token("random")]
    Random,
    #[token("toBool")]
    ToBool,
    #[token("toInt")]
    ToInt,
    #[token("toFloat")]
    ToFloat,
    #[token("toChar")]
    ToChar,
    #[token("toString")]
    ToString,
    #[token("count")]
    Count,
    #[token("empty")]
    Empty,
    #[token("keys")]
    Keys,
    #[token("values")]
    Values,
    #[token("append")]
    Append,
    #[token("contains")]
    Contains,

    // Names and literals.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Name(std::string::String),
    #[regex(r"[0-9]+", parse_integer)]
    IntegerLiteral(i32),
    #[regex(r"[0-9]+\.[0-9]*", parse_float)]
    FloatLiteral(f32),
    #[token("'", char_literal)]
    CharLiteral(char),
    #[token("\"", string_literal)]
    StringLiteral(std::string::String),
}

fn newline(lex: &mut Lexer<Token>) -> Skip {
    lex.extras.line += 1;
    Skip
}

/// Decodes an integer literal, best-effort: text `i32` cannot hold
/// decodes to zero.
fn parse_integer(lex: &Lexer<Token>) -> i32 {
    lex.slice().parse().unwrap_or(0)
}

/// Decodes a float literal, best-effort: malformed text decodes to zero.
fn parse_float(lex: &Lexer<Token>) -> f32 {
    lex.slice().parse().unwrap_or(0.0)
}

/// Consumes a `/* ... */` comment, honouring nesting: every inner `/*`
/// needs its own `*/` before the comment closes.
fn block_comment(lex: &mut Lexer<Token>) -> FilterResult<(), ScanError> {
    let remainder = lex.remainder();
    let bytes = remainder.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                depth += 1;
                i += 2;
            },
            b'*' if bytes.get(i + 1) == Some(&b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return FilterResult::Skip;
                }
            },
            b'\n' => {
                lex.extras.line += 1;
                i += 1;
            },
            _ => i += 1,
        }
    }

    lex.bump(remainder.len());
    FilterResult::Error(ScanError::UnexpectedEof)
}

/// Scans the rest of a `'c'` literal: exactly one character between the
/// quotes. An immediately closing quote or a second character before the
/// closing quote is an invalid lexeme.
fn char_literal(lex: &mut Lexer<Token>) -> Result<char, ScanError> {
    let remainder = lex.remainder();
    let mut chars = remainder.chars();

    let value = match chars.next() {
        None => return Err(ScanError::UnexpectedEof),
        Some('\'') => {
            lex.bump(1);
            return Err(ScanError::InvalidLexeme);
        },
        Some(c) => {
            if c == '\n' {
                lex.extras.line += 1;
            }
            c
        },
    };

    match chars.next() {
        Some('\'') => {
            lex.bump(value.len_utf8() + 1);
            Ok(value)
        },
        Some(c) => {
            lex.bump(value.len_utf8() + c.len_utf8());
            Err(ScanError::InvalidLexeme)
        },
        None => {
            lex.bump(remainder.len());
            Err(ScanError::UnexpectedEof)
        },
    }
}

/// Scans the rest of a `"..."` literal: any characters up to the closing
/// quote, kept verbatim (there are no escape sequences).
fn string_literal(lex: &mut Lexer<Token>) -> Result<std::string::String, ScanError> {
    let remainder = lex.remainder();

    for (i, c) in remainder.char_indices() {
        match c {
            '"' => {
                lex.bump(i + 1);
                return Ok(remainder[..i].to_string());
            },
            '\n' => lex.extras.line += 1,
            _ => {},
        }
    }

    lex.bump(remainder.len());
    Err(ScanError::UnexpectedEof)
}

/// Tokenizes a whole source text into `(token, line)` pairs.
///
/// The first lexical error aborts the scan; there is no recovery.
///
/// # Errors
/// `InvalidLexeme` with the offending slice, or `UnexpectedEof` when the
/// input ends inside a comment or literal.
pub fn scan(source: &str) -> LangResult<Vec<(Token, usize)>> {
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });
    let mut tokens = Vec::new();

    while let Some(item) = lexer.next() {
        match item {
            Ok(token) => tokens.push((token, lexer.extras.line)),
            Err(ScanError::InvalidLexeme) => {
                return Err(LanguageError::InvalidLexeme {
                    lexeme: lexer.slice().to_string(),
                    line: lexer.extras.line,
                })
            },
            Err(ScanError::UnexpectedEof) => {
                return Err(LanguageError::UnexpectedEof {
                    line: lexer.extras.line,
                })
            },
        }
    }

    Ok(tokens)
}

/// Renders the token the way it is written in source, for diagnostics.
impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Newline => "\\n",
            Self::Comment => "/*",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::OpenPar => "(",
            Self::ClosePar => ")",
            Self::OpenBracket => "[",
            Self::CloseBracket => "]",
            Self::OpenBrace => "{",
            Self::CloseBrace => "}",
            Self::Assign => "=",
            Self::Ternary => "?",
            Self::And => "&&",
            Self::Or => "||",
            Self::LowerThan => "<",
            Self::GreaterThan => ">",
            Self::LowerEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Not => "!",
            Self::Var => "var",
            Self::Let => "let",
            Self::Print => "print",
            Self::Println => "println",
            Self::Dump => "dump",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::In => "in",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Char => "Char",
            Self::String => "String",
            Self::Array => "Array",
            Self::Dict => "Dict",
            Self::False => "false",
            Self::True => "true",
            Self::Read => "read",
            Self::Random => "random",
            Self::ToBool => "toBool",
            Self::ToInt => "toInt",
            Self::ToFloat => "toFloat",
            Self::ToChar => "toChar",
            Self::ToString => "toString",
            Self::Count => "count",
            Self::Empty => "empty",
            Self::Keys => "keys",
            Self::Values => "values",
            Self::Append => "append",
            Self::Contains => "contains",
            Self::Name(name) => return write!(f, "{name}"),
            Self::IntegerLiteral(i) => return write!(f, "{i}"),
            Self::FloatLiteral(x) => return write!(f, "{x:?}"),
            Self::CharLiteral(c) => return write!(f, "'{c}'"),
            Self::StringLiteral(s) => return write!(f, "\"{s}\""),
        };
        write!(f, "{text}")
    }
}
