use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Operator, Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(source).expect("lexer pattern must compile"),
        handler,
    }
}

lazy_static! {
    /// Tried in order at the cursor; the first match wins.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("^#[^\r\n]*", skip_handler),
        pattern("^(\r\n|\n|\r)", newline_handler),
        pattern("^ ", MK_DEFAULT_HANDLER!(TokenKind::Whitespace, " ")),
        pattern("^\t", MK_DEFAULT_HANDLER!(TokenKind::Tab, "\t")),
        pattern("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("^[0-9][0-9a-zA-Z_]*(\\.[0-9a-zA-Z_]*)*", number_handler),
        pattern("^(\"[^\"]*\"|'[^']*')", string_handler),
        pattern("^[\"']", unterminated_string_handler),
        pattern("^[~*+\\-/<>=%^|&!]{1,2}", operator_handler),
        pattern("^\\.\\.\\.", MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...")),
        pattern("^\\.\\.<", MK_DEFAULT_HANDLER!(TokenKind::EllipsisLess, "..<")),
        pattern("^\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("^\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern("^\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span covering the next `len` bytes.
    pub fn span(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    fn push_matched(&mut self, kind: TokenKind, value: String, len: usize) {
        let span = self.span(len);
        self.push(MK_TOKEN!(kind, value, span));
        self.advance_n(len);
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
    Ok(())
}

fn newline_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    let len = matched.len();
    lexer.push_matched(TokenKind::NewLine, matched, len);
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let len = value.len();
    lexer.push_matched(kind, value, len);
    Ok(())
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let is_digits = |text: &str| text.bytes().all(|b| b.is_ascii_digit());
    // The magnitude of `i64::MIN` is allowed so a leading minus can fold onto it.
    let fits = |text: &str| {
        text.parse::<u64>()
            .is_ok_and(|magnitude| magnitude <= i64::MIN.unsigned_abs())
    };

    let kind = match value.split_once('.') {
        None if is_digits(value.as_str()) && fits(value.as_str()) => TokenKind::Int,
        Some((whole, fraction))
            if is_digits(whole) && is_digits(fraction) && value.parse::<f64>().is_ok() =>
        {
            TokenKind::Float
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::NumberParseError {
                    token: value.clone(),
                },
                lexer.position(),
            ))
        }
    };

    let len = value.len();
    lexer.push_matched(kind, value, len);
    Ok(())
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    // Both quote characters are a single byte.
    let literal = matched[1..matched.len() - 1].to_string();

    let len = matched.len();
    lexer.push_matched(TokenKind::String, literal, len);
    Ok(())
}

fn unterminated_string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    Err(Error::new(
        ErrorImpl::UnterminatedString {
            quote: lexer.matched(regex),
        },
        lexer.position(),
    ))
}

fn operator_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);

    let mut spelling = matched.as_str();
    let mut operator = Operator::from_symbol(spelling);
    if operator.is_none() && spelling.len() > 1 {
        spelling = &matched[..1];
        operator = Operator::from_symbol(spelling);
    }

    let Some(operator) = operator else {
        return Err(Error::new(
            ErrorImpl::UnknownOperator {
                operator: spelling.to_string(),
            },
            lexer.position(),
        ));
    };

    let len = spelling.len();
    let value = spelling.to_string();
    lexer.push_matched(TokenKind::Operator(operator), value, len);
    Ok(())
}

/// Converts source text into tokens, ending with `EOF`.
///
/// Whitespace, tabs and newlines are kept as tokens since the parser
/// measures indentation from them. Comments are dropped.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex)?;
                matched = true;
                break;
            }
        }

        if !matched {
            if let Some(ch) = lex.at() {
                lex.push_matched(TokenKind::Unknown, ch.to_string(), ch.len_utf8());
            }
        }
    }

    let span = lex.span(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
