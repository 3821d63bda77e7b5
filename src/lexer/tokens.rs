use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("for", TokenKind::For);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("elif", TokenKind::Elif);
        map.insert("in", TokenKind::In);
        map.insert("while", TokenKind::While);
        map.insert("return", TokenKind::Return);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("null", TokenKind::Null);
        map.insert("def", TokenKind::Def);
        map.insert("hotpot", TokenKind::Hotpot);
        map
    };
    pub static ref OPERATOR_LOOKUP: HashMap<&'static str, Operator> = {
        let mut map = HashMap::new();
        map.insert("+", Operator::Plus);
        map.insert("-", Operator::Minus);
        map.insert("*", Operator::Star);
        map.insert("/", Operator::Slash);
        map.insert("%", Operator::Percent);
        map.insert("=", Operator::Assign);
        map.insert("==", Operator::Equals);
        map.insert("!=", Operator::NotEquals);
        map.insert("<", Operator::Less);
        map.insert("<=", Operator::LessEquals);
        map.insert(">", Operator::Greater);
        map.insert(">=", Operator::GreaterEquals);
        map.insert("+=", Operator::PlusEquals);
        map.insert("-=", Operator::MinusEquals);
        map.insert("*=", Operator::StarEquals);
        map.insert("/=", Operator::SlashEquals);
        map.insert("%=", Operator::PercentEquals);
        map.insert("&&", Operator::And);
        map.insert("||", Operator::Or);
        map.insert("!", Operator::Not);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    Assign,
    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,

    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    And,
    Or,
    Not,
}

/// How an operator combines its operands, used when typing binary expressions.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperatorClass {
    Arithmetic,
    Comparison,
    Logical,
    Assignment,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        OPERATOR_LOOKUP.get(symbol).copied()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Assign => "=",
            Operator::PlusEquals => "+=",
            Operator::MinusEquals => "-=",
            Operator::StarEquals => "*=",
            Operator::SlashEquals => "/=",
            Operator::PercentEquals => "%=",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Less => "<",
            Operator::LessEquals => "<=",
            Operator::Greater => ">",
            Operator::GreaterEquals => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Minus | Operator::Not)
    }

    pub fn class(&self) -> OperatorClass {
        match self {
            Operator::Plus
            | Operator::Minus
            | Operator::Star
            | Operator::Slash
            | Operator::Percent => OperatorClass::Arithmetic,
            Operator::Assign
            | Operator::PlusEquals
            | Operator::MinusEquals
            | Operator::StarEquals
            | Operator::SlashEquals
            | Operator::PercentEquals => OperatorClass::Assignment,
            Operator::Equals
            | Operator::NotEquals
            | Operator::Less
            | Operator::LessEquals
            | Operator::Greater
            | Operator::GreaterEquals => OperatorClass::Comparison,
            Operator::And | Operator::Or | Operator::Not => OperatorClass::Logical,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Int,
    Float,
    Identifier,
    /// Reserved; no source spelling produces it yet.
    Char,
    String,
    Operator(Operator),

    Colon,
    Comma,
    Ellipsis,     // ...
    EllipsisLess, // ..<
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Dot,

    Whitespace,
    Tab,
    NewLine,

    Unknown,

    // Reserved
    For,
    If,
    Else,
    Elif,
    In,
    While,
    Return,
    Break,
    Continue,
    True,
    False,
    Null,
    Def,
    Hotpot,
}

impl TokenKind {
    /// Whitespace inside a line, skipped between tokens by the parser.
    pub fn is_blank(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Tab)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Operator(operator) => write!(f, "Operator({})", operator),
            _ => write!(f, "{:?}", self),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: Vec<TokenKind>) -> bool {
        for token in tokens {
            if token == self.kind {
                return true;
            }
        }

        false
    }

    /// Human readable text for diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::NewLine => String::from("newline"),
            TokenKind::EOF => String::from("end of input"),
            _ => self.value.clone(),
        }
    }

    pub fn debug(&self) {
        if self.is_one_of_many(vec![
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::Unknown,
        ]) {
            println!("{} ({})", self.kind, self.value);
        } else {
            println!("{} ()", self.kind);
        }
    }
}
