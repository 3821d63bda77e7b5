use std::cell::OnceCell;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{
    ast::{DeclId, FuncId, HotpotId, Identifier, Program, Scope},
    expressions::Expr,
    types::DataType,
};

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(BlockStmt),
    Return(ReturnStmt),
    If(IfStmt),
    For(ForStmt),
    While(WhileStmt),
    Expression(ExpressionStmt),
    Declaration(DeclStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Block(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Declaration(stmt) => &stmt.span,
            Stmt::Break(stmt) => &stmt.span,
            Stmt::Continue(stmt) => &stmt.span,
        }
    }

    /// Statements that end with an indented block, and so already end on a line boundary.
    pub fn ends_with_block(&self) -> bool {
        matches!(self, Stmt::Block(_) | Stmt::If(_) | Stmt::For(_) | Stmt::While(_))
    }
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    /// True when every path through the block ends in a `return`.
    ///
    /// Only the last statement is considered: either a `return`, or an `if`
    /// with an `else` whose every branch returns on all paths.
    pub fn all_paths_return(&self) -> bool {
        match self.body.last() {
            Some(Stmt::Return(_)) => true,
            Some(Stmt::If(if_stmt)) => if_stmt.all_paths_return(),
            Some(Stmt::Block(block)) => block.all_paths_return(),
            _ => false,
        }
    }

    /// Declarations made directly by the block's own statements, in source order.
    ///
    /// Nested blocks and `for` initializers are not included.
    pub fn declarations(&self) -> Vec<DeclId> {
        self.body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Declaration(decl_stmt) => Some(decl_stmt.decl),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfBranch {
    pub condition: Expr,
    pub body: BlockStmt,
}

/// An `if` followed by any `elif` branches, in order, and an optional `else`.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub branches: Vec<IfBranch>,
    pub else_body: Option<BlockStmt>,
    pub span: Span,
}

impl IfStmt {
    pub fn all_paths_return(&self) -> bool {
        match &self.else_body {
            Some(else_body) => {
                else_body.all_paths_return()
                    && self
                        .branches
                        .iter()
                        .all(|branch| branch.body.all_paths_return())
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: DeclId,
    pub condition: Expr,
    pub step: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// A local variable declaration used as a statement.
#[derive(Debug, Clone)]
pub struct DeclStmt {
    pub decl: DeclId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub span: Span,
}

// DECLARATIONS

/// `name: type [= value]`, stored in the program's declaration arena.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: DeclId,
    pub name: String,
    pub declared_type: DataType,
    pub init: Option<Expr>,
    scope: OnceCell<Scope>,
    pub span: Span,
}

impl VarDecl {
    pub fn new(
        id: DeclId,
        name: String,
        declared_type: DataType,
        init: Option<Expr>,
        span: Span,
    ) -> Self {
        VarDecl {
            id,
            name,
            declared_type,
            init,
            scope: OnceCell::new(),
            span,
        }
    }

    pub fn scope(&self) -> Option<Scope> {
        self.scope.get().copied()
    }

    pub fn resolve_scope(&self, scope: Scope) -> Result<(), Error> {
        self.scope.set(scope).map_err(|_| {
            Error::new(
                ErrorImpl::InternalError {
                    message: format!("scope of `{}` resolved twice", self.name),
                },
                self.span.start.clone(),
            )
        })
    }
}

/// A function parameter. Always resolves to a local of its function.
#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub decl: DeclId,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FuncPrototype {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub return_type: DataType,
    pub span: Span,
}

impl FuncPrototype {
    /// The `Function` type of this signature.
    pub fn data_type(&self, program: &Program) -> DataType {
        DataType::Function {
            params: self
                .params
                .iter()
                .map(|param| {
                    program
                        .decl(param.decl)
                        .map(|decl| decl.declared_type.clone())
                        .unwrap_or(DataType::Unresolved)
                })
                .collect(),
            returns: Box::new(self.return_type.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub id: FuncId,
    pub prototype: FuncPrototype,
    pub body: BlockStmt,
    pub span: Span,
}

impl FuncDecl {
    pub fn name(&self) -> &str {
        &self.prototype.name
    }
}

/// A hotpot (record type) declaration.
#[derive(Debug, Clone)]
pub struct HotpotDecl {
    pub id: HotpotId,
    pub name: String,
    pub parent: Option<Identifier>,
    pub properties: Vec<DeclId>,
    pub methods: Vec<FuncDecl>,
    pub span: Span,
}

impl HotpotDecl {
    pub fn method(&self, name: &str) -> Option<&FuncDecl> {
        self.methods.iter().find(|method| method.name() == name)
    }
}
