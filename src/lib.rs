#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::{type_check, TypeCheckOptions},
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;
pub mod visitor;

extern crate regex;

/// Byte offset into a source file, and the file's name.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Tokenizes and parses `source` into a program registry.
pub fn parse_source(source: &str, file: Option<String>) -> Result<Program, Error> {
    let file = file.unwrap_or_else(|| String::from("shell"));
    let tokens = tokenize(source.to_string(), Some(file.clone()))?;
    parse(tokens, Rc::new(file))
}

/// Parses `source` and runs semantic analysis over the result.
pub fn check_source(
    source: &str,
    file: Option<String>,
    options: TypeCheckOptions,
) -> Result<Program, Error> {
    let program = parse_source(source, file)?;
    type_check(&program, options)?;
    Ok(program)
}

/// Finds the line holding byte `position`.
///
/// Returns the 1-based line number, the line's text and the offset of the
/// position inside it. A position at the very end of the content maps onto
/// the end of the last line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;
    let mut last = (1, String::new(), 0);

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        last = (line_number, line.to_string(), line.trim_end().len());
        start = end;
        line_number += 1;
    }

    Some(last)
}


pub fn display_error(error: &Error, source: &str, file: &str) {
    /*
        Error: UnknownVariable (Variable `b` not declared)
        -> main.hp
           |
        20 | a: int = b
           | ---------^
    */

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file);

    let position = error.get_position();
    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let trimmed = string.trim_start_matches([' ', '\t']);
    let start = string.len() - trimmed.len();

    (String::from(trimmed), start)
}
