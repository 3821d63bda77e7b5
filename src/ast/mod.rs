/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program registry, declaration handles and scopes
/// - expressions: Definitions for various expression types
/// - statements: Definitions for statements and declarations
/// - types: The `DataType` representation shared by annotations and checking
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
