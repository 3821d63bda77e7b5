use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::DataType, Position};

#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

/// The phase of the front end an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Syntax,
    Semantic,
    Registration,
    Internal,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::UnknownOperator { .. } => "UnknownOperator",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::IndentationError { .. } => "IndentationError",
            ErrorImpl::UnknownFunction { .. } => "UnknownFunction",
            ErrorImpl::UnknownVariable { .. } => "UnknownVariable",
            ErrorImpl::UnknownDataType { .. } => "UnknownDataType",
            ErrorImpl::BreakNotAllowed => "BreakNotAllowed",
            ErrorImpl::ContinueNotAllowed => "ContinueNotAllowed",
            ErrorImpl::NotAllPathsReturn { .. } => "NotAllPathsReturn",
            ErrorImpl::CannotConvertValue { .. } => "CannotConvertValue",
            ErrorImpl::CannotCallMethod { .. } => "CannotCallMethod",
            ErrorImpl::CannotFindProperty { .. } => "CannotFindProperty",
            ErrorImpl::ReturnNotAllowed => "ReturnNotAllowed",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::HotpotAlreadyDeclared { .. } => "HotpotAlreadyDeclared",
            ErrorImpl::EntryPointAlreadyDeclared => "EntryPointAlreadyDeclared",
            ErrorImpl::InternalError { .. } => "InternalError",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. }
            | ErrorImpl::UnknownOperator { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorCategory::Lex,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::ExpectedToken { .. }
            | ErrorImpl::IndentationError { .. } => ErrorCategory::Syntax,
            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::HotpotAlreadyDeclared { .. }
            | ErrorImpl::EntryPointAlreadyDeclared => ErrorCategory::Registration,
            ErrorImpl::InternalError { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Semantic,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { quote } => {
                ErrorTip::Suggestion(format!("String is missing its closing `{}`", quote))
            }
            ErrorImpl::UnknownOperator { operator } => {
                ErrorTip::Suggestion(format!("`{}` is not a known operator", operator))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedToken { expected, token } => {
                ErrorTip::Suggestion(format!("Expected {}, found `{}`", expected, token))
            }
            ErrorImpl::IndentationError { expected, found } => ErrorTip::Suggestion(format!(
                "Expected an indentation of {} columns, found {}",
                expected, found
            )),
            ErrorImpl::UnknownFunction { name } => {
                ErrorTip::Suggestion(format!("No function named `{}` is declared", name))
            }
            ErrorImpl::UnknownVariable { name } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", name))
            }
            ErrorImpl::UnknownDataType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::BreakNotAllowed => {
                ErrorTip::Suggestion(String::from("`break` is only allowed inside a loop"))
            }
            ErrorImpl::ContinueNotAllowed => {
                ErrorTip::Suggestion(String::from("`continue` is only allowed inside a loop"))
            }
            ErrorImpl::NotAllPathsReturn { type_ } => ErrorTip::Suggestion(format!(
                "Every path through the function must return a `{}`",
                type_
            )),
            ErrorImpl::CannotConvertValue { from, to } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                to, from
            )),
            ErrorImpl::CannotCallMethod { name } => ErrorTip::Suggestion(format!(
                "Method `{}` can only be called on a hotpot variable",
                name
            )),
            ErrorImpl::CannotFindProperty { name } => {
                ErrorTip::Suggestion(format!("No property named `{}` was found", name))
            }
            ErrorImpl::ReturnNotAllowed => {
                ErrorTip::Suggestion(String::from("`return` is only allowed inside a function"))
            }
            ErrorImpl::ReturnTypeMismatch { type_, function } => ErrorTip::Suggestion(format!(
                "Function `{}` cannot return a value of type `{}`",
                function, type_
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::HotpotAlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("Hotpot `{}` already declared", name))
            }
            ErrorImpl::EntryPointAlreadyDeclared => {
                ErrorTip::Suggestion(String::from("Only one `main` function may be declared"))
            }
            ErrorImpl::InternalError { .. } => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    // Lexing
    #[error("unterminated string literal opened with {quote:?}")]
    UnterminatedString { quote: String },
    #[error("unknown operator: {operator:?}")]
    UnknownOperator { operator: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Parsing
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected {expected}, found {token:?}")]
    ExpectedToken { expected: String, token: String },
    #[error("invalid indentation: expected {expected} columns, found {found}")]
    IndentationError { expected: usize, found: usize },

    // Semantic analysis
    #[error("unknown function {name:?}")]
    UnknownFunction { name: String },
    #[error("unknown variable {name:?}")]
    UnknownVariable { name: String },
    #[error("unknown data type {type_}")]
    UnknownDataType { type_: DataType },
    #[error("break is not allowed here")]
    BreakNotAllowed,
    #[error("continue is not allowed here")]
    ContinueNotAllowed,
    #[error("not all paths return a value of type {type_}")]
    NotAllPathsReturn { type_: DataType },
    #[error("cannot convert value of type {from} to {to}")]
    CannotConvertValue { from: DataType, to: DataType },
    #[error("cannot call method {name:?}")]
    CannotCallMethod { name: String },
    #[error("cannot find property {name:?}")]
    CannotFindProperty { name: String },
    #[error("return is not allowed here")]
    ReturnNotAllowed,
    #[error("cannot return {type_} from function {function:?}")]
    ReturnTypeMismatch { type_: DataType, function: String },

    // Registration
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("hotpot {name:?} already declared")]
    HotpotAlreadyDeclared { name: String },
    #[error("entry point already declared")]
    EntryPointAlreadyDeclared,

    #[error("internal error: {message}")]
    InternalError { message: String },
}
