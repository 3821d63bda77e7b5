//! Type annotation parsing.
//!
//! A type is a name, optionally wrapped in brackets: `int`, `[string]`,
//! `[[Pot]]`. Each bracket pair adds one level of array nesting. `void` and
//! `null` both name the null type, any other unknown name is taken to be a
//! hotpot and is validated by the type checker.

use crate::{
    ast::types::DataType,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

pub fn parse_type(parser: &mut Parser) -> Result<DataType, Error> {
    let start = parser.get_position();

    let mut depth = 0;
    while parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance_skip_whitespace();
        depth += 1;
    }

    let mut data_type = match parser.current_token_kind() {
        TokenKind::Identifier | TokenKind::Null => {
            DataType::from_name(&parser.advance_skip_whitespace().value)
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::ExpectedToken {
                    expected: String::from("type name"),
                    token: parser.current_token().describe(),
                },
                parser.get_position(),
            ))
        }
    };

    let mut closed = 0;
    while parser.current_token_kind() == TokenKind::CloseBracket {
        parser.advance_skip_whitespace();
        closed += 1;
        data_type = DataType::array_of(data_type);
    }

    if closed != depth {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().describe(),
                message: String::from("unbalanced brackets in type"),
            },
            start,
        ));
    }

    Ok(data_type)
}
