use crate::{
    ast::{
        ast::{DeclId, FuncId, HotpotId, Identifier},
        statements::{
            BlockStmt, BreakStmt, ContinueStmt, DeclStmt, ExpressionStmt, ForStmt, FuncDecl,
            FuncPrototype, HotpotDecl, IfBranch, IfStmt, ParamDecl, ReturnStmt, Stmt, WhileStmt,
        },
        types::DataType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Operator, TokenKind},
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::{parser::Parser, types::parse_type};

/// Parses one top-level line: a declaration registered with the program, or a free statement.
pub fn parse_top_level(parser: &mut Parser) -> Result<(), Error> {
    match parser.current_token_kind() {
        TokenKind::Def => {
            let function = parse_fn_decl(parser)?;
            parser.program_mut().add_function(function)
        }
        TokenKind::Hotpot => {
            let hotpot = parse_hotpot_decl(parser)?;
            parser.program_mut().add_hotpot(hotpot)
        }
        _ if parser.at_var_decl() => {
            let decl = parse_var_decl(parser)?;
            parser.expect_line_end()?;
            parser.program_mut().add_global(decl)
        }
        _ => {
            let stmt = parse_line_stmt(parser)?;
            parser.program_mut().add_stmt(stmt);
            Ok(())
        }
    }
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    if parser.at_var_decl() {
        let start = parser.current_token().span.start.clone();
        let decl = parse_var_decl(parser)?;
        return Ok(Stmt::Declaration(DeclStmt {
            decl,
            span: parser.span_from(start),
        }));
    }

    let expression = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.span.clone(),
        expression,
    }))
}

/// Parses a statement and the line break ending it.
///
/// Statements ending in a block already stop at the start of a line.
pub fn parse_line_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let stmt = parse_stmt(parser)?;
    if !stmt.ends_with_block() {
        parser.expect_line_end()?;
    }
    Ok(stmt)
}

/// Parses an indented block one step deeper than the current one.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<BlockStmt, Error> {
    parser.enter_block();
    let body = parse_block_body(parser);
    parser.leave_block();
    let body = body?;

    let (Some(first), Some(last)) = (body.first(), body.last()) else {
        return Err(Error::new(
            ErrorImpl::ExpectedToken {
                expected: String::from("an indented block"),
                token: parser.current_token().describe(),
            },
            parser.get_position(),
        ));
    };

    let span = Span {
        start: first.get_span().start.clone(),
        end: last.get_span().end.clone(),
    };
    Ok(BlockStmt { body, span })
}

fn parse_block_body(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let mut body = vec![];
    while parser.block_continues()? {
        body.push(parse_line_stmt(parser)?);
    }
    Ok(body)
}

/// `name : type [= value]`, allocated in the program's declaration arena.
pub fn parse_var_decl(parser: &mut Parser) -> Result<DeclId, Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().describe(),
            message: String::from("expected identifier during variable declaration"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    parser.expect(TokenKind::Colon)?;
    let declared_type = parse_type(parser)?;

    let init = if parser.current_token_kind() == TokenKind::Operator(Operator::Assign) {
        parser.advance_skip_whitespace();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let span = parser.span_from(name.span.start.clone());
    Ok(parser
        .program_mut()
        .alloc_decl(name.value, declared_type, init, span))
}

fn parse_if_branch(parser: &mut Parser) -> Result<IfBranch, Error> {
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect_block_start()?;
    let body = parse_block_stmt(parser)?;

    Ok(IfBranch { condition, body })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let column = parser.indent();
    let start = parser.advance_skip_whitespace().span.start;

    let mut branches = vec![parse_if_branch(parser)?];
    let mut else_body = None;

    loop {
        parser.skip_blank_lines();
        match parser.continuation(column) {
            Some(TokenKind::Elif) => {
                parser.advance_skip_whitespace();
                branches.push(parse_if_branch(parser)?);
            }
            Some(TokenKind::Else) => {
                parser.advance_skip_whitespace();
                parser.expect_block_start()?;
                else_body = Some(parse_block_stmt(parser)?);
                break;
            }
            _ => break,
        }
    }

    Ok(Stmt::If(IfStmt {
        branches,
        else_body,
        span: parser.span_from(start),
    }))
}

/// `for init, condition, step:`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance_skip_whitespace().span.start;

    let init = parse_var_decl(parser)?;
    parser.expect(TokenKind::Comma)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Comma)?;
    let step = parse_expr(parser, BindingPower::Default)?;
    parser.expect_block_start()?;
    let body = parse_block_stmt(parser)?;

    Ok(Stmt::For(ForStmt {
        init,
        condition,
        step,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance_skip_whitespace().span.start;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect_block_start()?;
    let body = parse_block_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance_skip_whitespace().span.start;
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: parser.span_from(start),
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let span = parser.advance_skip_whitespace().span;
    Ok(Stmt::Break(BreakStmt { span }))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let span = parser.advance_skip_whitespace().span;
    Ok(Stmt::Continue(ContinueStmt { span }))
}

/// `def name(label: type, ...): [type]` followed by the body block.
pub fn parse_fn_decl(parser: &mut Parser) -> Result<FuncDecl, Error> {
    let start = parser.advance_skip_whitespace().span.start;
    let name = parser.expect(TokenKind::Identifier)?;

    parser.expect(TokenKind::OpenParen)?;
    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let label = parser.expect(TokenKind::Identifier)?;
            parser.expect(TokenKind::Colon)?;
            let declared_type = parse_type(parser)?;

            let span = parser.span_from(label.span.start.clone());
            let decl = parser
                .program_mut()
                .alloc_decl(label.value, declared_type, None, span.clone());
            params.push(ParamDecl { decl, span });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance_skip_whitespace();
        }
    }
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Colon)?;

    let return_type = match parser.current_token_kind() {
        TokenKind::NewLine | TokenKind::EOF => DataType::Null,
        _ => parse_type(parser)?,
    };
    let prototype_span = parser.span_from(start.clone());
    parser.expect_line_end()?;

    let body = parse_block_stmt(parser)?;

    Ok(FuncDecl {
        id: FuncId(parser.advance_id()),
        prototype: FuncPrototype {
            name: name.value,
            params,
            return_type,
            span: prototype_span,
        },
        body,
        span: parser.span_from(start),
    })
}

/// `hotpot Name [: [Parent]]` followed by indented properties and methods.
pub fn parse_hotpot_decl(parser: &mut Parser) -> Result<HotpotDecl, Error> {
    let start = parser.advance_skip_whitespace().span.start;
    let name = parser.expect(TokenKind::Identifier)?;

    let mut parent = None;
    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance_skip_whitespace();
        if parser.current_token_kind() == TokenKind::Identifier {
            let token = parser.advance_skip_whitespace();
            parent = Some(Identifier {
                name: token.value,
                span: token.span,
            });
        }
    }
    parser.expect_line_end()?;

    parser.enter_block();
    let members = parse_hotpot_members(parser);
    parser.leave_block();
    let (properties, methods) = members?;

    Ok(HotpotDecl {
        id: HotpotId(parser.advance_id()),
        name: name.value,
        parent,
        properties,
        methods,
        span: parser.span_from(start),
    })
}

fn parse_hotpot_members(parser: &mut Parser) -> Result<(Vec<DeclId>, Vec<FuncDecl>), Error> {
    let mut properties = vec![];
    let mut methods = vec![];

    while parser.block_continues()? {
        if parser.current_token_kind() == TokenKind::Def {
            methods.push(parse_fn_decl(parser)?);
        } else if parser.at_var_decl() {
            properties.push(parse_var_decl(parser)?);
            parser.expect_line_end()?;
        } else {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().describe(),
                    message: String::from("expected a property or method in hotpot body"),
                },
                parser.get_position(),
            ));
        }
    }

    Ok((properties, methods))
}
