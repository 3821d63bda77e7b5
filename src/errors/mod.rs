//! Error types and error handling for the front end.
//!
//! This module defines the error types used throughout checking. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for each phase
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
