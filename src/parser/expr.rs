use crate::{
    ast::{
        ast::Identifier,
        expressions::{
            ArrayExpr, BinaryExpr, CallArg, CallExpr, Expr, ExprKind, MethodRefExpr,
            PropertyRefExpr, UnaryExpr, VarExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Operator, TokenKind},
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

/// Parses an expression whose operators bind at least as tightly as `bp`.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    let left = parse_nud(parser)?;
    parse_binary(parser, bp.precedence(), left)
}

/// Parses a primary or prefix expression followed by any `.` member chain.
pub fn parse_nud(parser: &mut Parser) -> Result<Expr, Error> {
    let token_kind = parser.current_token_kind();
    let handler = parser.get_nud_lookup().get(&token_kind).copied();

    let Some(handler) = handler else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().describe(),
            },
            parser.get_position(),
        ));
    };

    let primary = handler(parser)?;
    parse_member_chain(parser, primary)
}

/// Absorbs binary operators into `left` while their precedence is at least `min_precedence`.
pub fn parse_binary(parser: &mut Parser, min_precedence: u8, mut left: Expr) -> Result<Expr, Error> {
    loop {
        let token_kind = parser.current_token_kind();
        let Some(bp) = parser.get_bp_lookup().get(&token_kind).copied() else {
            return Ok(left);
        };
        if bp.precedence() < min_precedence {
            return Ok(left);
        }

        let Some(handler) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Ok(left);
        };
        left = handler(parser, left, bp)?;
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance_skip_whitespace();
    let TokenKind::Operator(operator) = operator_token.kind else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.describe(),
            },
            operator_token.span.start,
        ));
    };

    let mut right = parse_nud(parser)?;

    let next_precedence = parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .map(|next| next.precedence());
    if next_precedence.is_some_and(|next| next > bp.precedence()) {
        right = parse_binary(parser, bp.precedence() + 1, right)?;
    }

    let span = Span {
        start: left.span.start.clone(),
        end: right.span.end.clone(),
    };
    Ok(Expr::new(
        ExprKind::Binary(BinaryExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }),
        span,
    ))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance_skip_whitespace();

    let kind = match token.kind {
        TokenKind::Int => match token.value.parse::<i64>() {
            Ok(value) => ExprKind::Int(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::Float => match token.value.parse::<f64>() {
            Ok(value) => ExprKind::Float(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::String => ExprKind::String(token.value),
        TokenKind::True => ExprKind::Bool(true),
        TokenKind::False => ExprKind::Bool(false),
        TokenKind::Null => ExprKind::Null,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.describe(),
                },
                token.span.start,
            ))
        }
    };

    Ok(Expr::new(kind, token.span))
}

/// A bare variable reference, or a call when the name is followed by `(`.
pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance_skip_whitespace();
    let identifier = Identifier {
        name: token.value,
        span: token.span,
    };

    if parser.current_token_kind() == TokenKind::OpenParen {
        let start = identifier.span.start.clone();
        let call = parse_call(parser, identifier)?;
        return Ok(Expr::new(ExprKind::Call(call), parser.span_from(start)));
    }

    let span = identifier.span.clone();
    Ok(Expr::new(ExprKind::Var(VarExpr::new(identifier.name)), span))
}

/// Parses `(label: value, ...)` after a callee name.
fn parse_call(parser: &mut Parser, callee: Identifier) -> Result<CallExpr, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let label = parser.expect(TokenKind::Identifier)?;
            parser.expect(TokenKind::Colon)?;
            let value = parse_expr(parser, BindingPower::Default)?;
            args.push(CallArg {
                label: Identifier {
                    name: label.value,
                    span: label.span,
                },
                value,
            });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance_skip_whitespace();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(CallExpr::new(callee, args))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance_skip_whitespace();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance_skip_whitespace().span.start;

    let mut values = vec![];
    if parser.current_token_kind() != TokenKind::CloseBracket {
        loop {
            values.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance_skip_whitespace();
        }
    }
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::new(
        ExprKind::Array(ArrayExpr { values }),
        parser.span_from(start),
    ))
}

/// `-operand` or `!operand`. A minus applied to a number literal folds into the literal.
pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance_skip_whitespace();
    let operator = match operator_token.kind {
        TokenKind::Operator(operator) if operator.is_unary() => operator,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.describe(),
                },
                operator_token.span.start,
            ))
        }
    };

    if operator == Operator::Minus && parser.current_token_kind() == TokenKind::Int {
        let token = parser.advance_skip_whitespace();
        let span = Span {
            start: operator_token.span.start,
            end: token.span.end,
        };
        return match format!("-{}", token.value).parse::<i64>() {
            Ok(value) => Ok(Expr::new(ExprKind::Int(value), span)),
            Err(_) => Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                token.span.start,
            )),
        };
    }

    let operand = parse_nud(parser)?;
    let span = Span {
        start: operator_token.span.start,
        end: operand.span.end.clone(),
    };

    let kind = match (operator, operand.kind) {
        (Operator::Minus, ExprKind::Int(value)) if value != i64::MIN => ExprKind::Int(-value),
        (Operator::Minus, ExprKind::Float(value)) => ExprKind::Float(-value),
        (operator, kind) => ExprKind::Unary(UnaryExpr {
            operator,
            operand: Box::new(Expr::new(kind, operand.span)),
        }),
    };

    Ok(Expr::new(kind, span))
}

/// Resolves `.name(...)` and `.name` left to right onto `receiver`.
fn parse_member_chain(parser: &mut Parser, mut receiver: Expr) -> Result<Expr, Error> {
    while parser.current_token_kind() == TokenKind::Dot {
        parser.advance_skip_whitespace();

        let error = Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().describe(),
                message: String::from("expected member name after '.'"),
            },
            parser.get_position(),
        );
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
        let member = Identifier {
            name: name.value,
            span: name.span,
        };
        let start = receiver.span.start.clone();

        let kind = if parser.current_token_kind() == TokenKind::OpenParen {
            ExprKind::MethodRef(MethodRefExpr {
                receiver: Box::new(receiver),
                call: parse_call(parser, member)?,
            })
        } else {
            ExprKind::PropertyRef(PropertyRefExpr {
                receiver: Box::new(receiver),
                member,
            })
        };

        receiver = Expr::new(kind, parser.span_from(start));
    }

    Ok(receiver)
}
