//! Unit tests for error handling.

use crate::ast::types::DataType;
use crate::errors::errors::{Error, ErrorCategory, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.lang".to_string()))
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_error_categories() {
    let cases = [
        (
            ErrorImpl::UnterminatedString {
                quote: "\"".to_string(),
            },
            ErrorCategory::Lex,
        ),
        (
            ErrorImpl::IndentationError {
                expected: 4,
                found: 2,
            },
            ErrorCategory::Syntax,
        ),
        (ErrorImpl::BreakNotAllowed, ErrorCategory::Semantic),
        (
            ErrorImpl::CannotFindProperty {
                name: "b".to_string(),
            },
            ErrorCategory::Semantic,
        ),
        (ErrorImpl::EntryPointAlreadyDeclared, ErrorCategory::Registration),
        (
            ErrorImpl::InternalError {
                message: "oops".to_string(),
            },
            ErrorCategory::Internal,
        ),
    ];

    for (error, category) in cases {
        assert_eq!(Error::new(error, at(0)).category(), category);
    }
}

#[test]
fn test_error_messages() {
    let error = Error::new(
        ErrorImpl::CannotConvertValue {
            from: DataType::double(),
            to: DataType::int64(),
        },
        at(0),
    );
    assert_eq!(error.to_string(), "cannot convert value of type double to int");

    let error = Error::new(
        ErrorImpl::UnknownVariable {
            name: "foo".to_string(),
        },
        at(0),
    );
    assert_eq!(error.to_string(), "unknown variable \"foo\"");

    let error = Error::new(
        ErrorImpl::NotAllPathsReturn {
            type_: DataType::array_of(DataType::Bool),
        },
        at(0),
    );
    assert_eq!(error.to_string(), "not all paths return a value of type [bool]");

    let error = Error::new(
        ErrorImpl::IndentationError {
            expected: 4,
            found: 2,
        },
        at(0),
    );
    assert_eq!(
        error.to_string(),
        "invalid indentation: expected 4 columns, found 2"
    );
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::InternalError {
            message: "dangling".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::ReturnTypeMismatch {
            type_: DataType::String,
            function: "f".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => {
            assert_eq!(tip, "Function `f` cannot return a value of type `string`")
        }
        _ => panic!("Expected suggestion tip"),
    }

    let error = Error::new(
        ErrorImpl::CannotConvertValue {
            from: DataType::String,
            to: DataType::Record("Pot".to_string()),
        },
        at(0),
    );
    assert_eq!(
        error.get_tip().to_string(),
        "Expected type `Pot`, received `string`"
    );
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
