use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Error,
    lexer::tokens::{Operator, TokenKind},
};

use super::{expr::*, parser::Parser, stmt::*};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Logical,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
}

impl BindingPower {
    /// Numeric precedence used by the climbing loop. Higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BindingPower::Default => 0,
            BindingPower::Assignment => 30,
            BindingPower::Logical => 40,
            BindingPower::Equality => 50,
            BindingPower::Relational => 60,
            BindingPower::Additive => 100,
            BindingPower::Multiplicative => 110,
            BindingPower::Unary => 120,
        }
    }
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Assignment
    parser.led(TokenKind::Operator(Operator::Assign), BindingPower::Assignment, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::PlusEquals), BindingPower::Assignment, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::MinusEquals), BindingPower::Assignment, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::StarEquals), BindingPower::Assignment, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::SlashEquals), BindingPower::Assignment, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::PercentEquals), BindingPower::Assignment, parse_binary_expr);

    // Logical
    parser.led(TokenKind::Operator(Operator::And), BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::Or), BindingPower::Logical, parse_binary_expr);

    // Equality and relational
    parser.led(TokenKind::Operator(Operator::Equals), BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::NotEquals), BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::Less), BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::LessEquals), BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::Greater), BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::GreaterEquals), BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Operator(Operator::Plus), BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::Minus), BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::Star), BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::Slash), BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Operator(Operator::Percent), BindingPower::Multiplicative, parse_binary_expr);

    // Literals and symbols
    parser.nud(TokenKind::Int, parse_primary_expr);
    parser.nud(TokenKind::Float, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Null, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_symbol_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_expr);
    parser.nud(TokenKind::Operator(Operator::Minus), parse_prefix_expr);
    parser.nud(TokenKind::Operator(Operator::Not), parse_prefix_expr);

    // Statements
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
