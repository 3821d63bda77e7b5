//! Parser module for building the program registry.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. Blocks are delimited by indentation, and expressions
//! are parsed by precedence climbing over NUD/LED handlers. It handles:
//!
//! - Top-level declarations (globals, functions, hotpots)
//! - Statement parsing (declarations, control flow, expressions)
//! - Expression parsing (binary ops, calls, member chains, literals)
//! - Type parsing for annotations

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
