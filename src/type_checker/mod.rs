//! Type checking and semantic analysis module.
//!
//! The type checker is a `Visitor` client. In one pass over the program it:
//!
//! - Resolves variable references to their declarations
//! - Classifies every declaration as global, local or property
//! - Types every expression and checks operand, initializer and return types
//! - Checks that `break`, `continue` and `return` appear where allowed
//!
//! The first error aborts the pass.

pub mod type_checker;

#[cfg(test)]
mod tests;
