//! Parser implementation for building the program registry.
//!
//! This module contains the main Parser struct: the token cursor, the
//! indentation bookkeeping for blocks, and the top-level parse loop.
//! Expressions are parsed by precedence climbing over NUD/LED handlers and
//! statements through a keyword-indexed handler table.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for literals, symbols and prefix operators
//! - LED (left denotation) handlers for binary operators
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_top_level,
};

/// Columns a block is indented relative to its parent. A tab counts as one step.
pub const INDENT_STEP: usize = 4;

/// The main parser structure that maintains parsing state.
///
/// A parser is built for exactly one token stream and consumed by `parse`,
/// so no cursor or indentation state outlives a run.
pub struct Parser {
    /// The list of tokens to parse, always ending with EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Column every statement of the current block must start at
    indent: usize,
    /// End of the last significant token consumed
    last_end: Position,
    /// The registry being built
    program: Program,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Counter for generating unique function and hotpot IDs
    current_id: i32,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    ///
    /// # Returns
    ///
    /// A new Parser instance ready to parse the token stream.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span {
                    start: end.clone(),
                    end
                }
            ));
        }

        Parser {
            tokens,
            pos: 0,
            last_end: Position(0, file),
            indent: 0,
            program: Program::new(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            current_id: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `offset` places ahead, or EOF past the end.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The cursor never moves past EOF.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        if !token.kind.is_blank() && token.kind != TokenKind::NewLine {
            self.last_end = token.span.end.clone();
        }
        token
    }

    /// Skips whitespace and tabs inside the current line.
    pub fn skip_whitespace(&mut self) {
        while self.current_token_kind().is_blank() {
            self.pos += 1;
        }
    }

    /// Advances past the current token and any whitespace following it.
    pub fn advance_skip_whitespace(&mut self) -> Token {
        let token = self.advance();
        self.skip_whitespace();
        token
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// Whitespace following the token is skipped.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::ExpectedToken {
                        expected: expected_kind.to_string(),
                        token: token.describe(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance_skip_whitespace())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Requires the current line to end here, consuming its newline.
    pub fn expect_line_end(&mut self) -> Result<(), Error> {
        self.skip_whitespace();
        match self.current_token_kind() {
            TokenKind::NewLine => {
                self.advance();
                Ok(())
            }
            TokenKind::EOF => Ok(()),
            _ => Err(Error::new(
                ErrorImpl::ExpectedToken {
                    expected: String::from("end of line"),
                    token: self.current_token().describe(),
                },
                self.get_position(),
            )),
        }
    }

    /// Requires the `:` and line break that introduce an indented block.
    pub fn expect_block_start(&mut self) -> Result<(), Error> {
        self.expect(TokenKind::Colon)?;
        self.expect_line_end()
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Whether the cursor sits on `identifier :`, the start of a variable declaration.
    pub fn at_var_decl(&self) -> bool {
        if self.current_token_kind() != TokenKind::Identifier {
            return false;
        }

        let mut offset = 1;
        while self.peek_kind(offset).is_blank() {
            offset += 1;
        }
        self.peek_kind(offset) == TokenKind::Colon
    }

    /// Column statements of the current block start at.
    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn enter_block(&mut self) {
        self.indent += INDENT_STEP;
    }

    pub fn leave_block(&mut self) {
        self.indent = self.indent.saturating_sub(INDENT_STEP);
    }

    /// Measures the leading whitespace at the cursor without consuming it.
    ///
    /// Returns the indentation in columns and the number of tokens it spans.
    pub fn measure_indent(&self) -> (usize, usize) {
        let mut columns = 0;
        let mut count = 0;

        loop {
            match self.peek_kind(count) {
                TokenKind::Whitespace => columns += 1,
                TokenKind::Tab => columns += INDENT_STEP,
                _ => break,
            }
            count += 1;
        }

        (columns, count)
    }

    /// Skips lines holding nothing but whitespace. Comments are already gone.
    pub fn skip_blank_lines(&mut self) {
        loop {
            let (_, count) = self.measure_indent();
            match self.peek_kind(count) {
                TokenKind::NewLine => self.pos += count + 1,
                TokenKind::EOF => {
                    self.pos += count;
                    return;
                }
                _ => return,
            }
        }
    }

    /// Decides whether the next line belongs to the current block.
    ///
    /// A line at the block's column continues it, and its indentation is
    /// consumed. A line dedented by whole steps ends it. Anything else is an
    /// indentation error.
    pub fn block_continues(&mut self) -> Result<bool, Error> {
        self.skip_blank_lines();
        if !self.has_tokens() {
            return Ok(false);
        }

        let (columns, count) = self.measure_indent();
        if columns == self.indent {
            self.pos += count;
            return Ok(true);
        }
        if columns < self.indent && columns % INDENT_STEP == 0 {
            return Ok(false);
        }

        let position = self
            .tokens
            .get(self.pos + count)
            .map(|token| token.span.start.clone())
            .unwrap_or_else(|| self.get_position());
        Err(Error::new(
            ErrorImpl::IndentationError {
                expected: self.indent,
                found: columns,
            },
            position,
        ))
    }

    /// Consumes the indentation before an `elif`/`else` sitting at `column`.
    pub fn continuation(&mut self, column: usize) -> Option<TokenKind> {
        let (columns, count) = self.measure_indent();
        let kind = self.peek_kind(count);
        if columns == column && matches!(kind, TokenKind::Elif | TokenKind::Else) {
            self.pos += count;
            Some(kind)
        } else {
            None
        }
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Binding powers are left alone, since `-` is both prefix and infix.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a leading keyword.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Advances the internal ID counter and returns the previous value.
    pub fn advance_id(&mut self) -> i32 {
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    pub fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Span from `start` to the end of the last significant token consumed.
    pub fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.last_end.clone(),
        }
    }
}

/// Parses a stream of tokens into a program registry.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses every top-level line until EOF.
/// Declarations are registered as they are parsed, so duplicate names are
/// reported at the second declaration.
///
/// # Arguments
///
/// * `tokens` - Vector of tokens to parse
/// * `file` - Reference-counted string containing the source file name
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    while parser.block_continues()? {
        parse_top_level(&mut parser)?;
    }

    Ok(parser.program)
}
