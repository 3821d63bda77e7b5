use std::collections::HashSet;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span,
};

use super::{
    expressions::Expr,
    statements::{FuncDecl, HotpotDecl, Stmt, VarDecl},
    types::{DataType, BUILTIN_TYPE_NAMES},
};

/// Handle of a variable declaration inside `Program`'s declaration arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotpotId(pub i32);

/// Where a variable declaration lives, assigned by the type checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local(FuncId),
    Property(HotpotId),
}

/// A name as written in the source.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// The parsed program: every top-level construct, by kind.
///
/// Names are registered as they are added, so each of the global, function
/// and hotpot namespaces stays unique. Hotpot names additionally may not
/// reuse one of the built-in type names.
#[derive(Debug, Clone)]
pub struct Program {
    statements: Vec<Stmt>,
    functions: Vec<FuncDecl>,
    hotpots: Vec<HotpotDecl>,
    globals: Vec<DeclId>,
    main: Option<FuncDecl>,
    decls: Vec<VarDecl>,
    type_names: HashSet<String>,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    pub const ENTRY_POINT: &'static str = "main";

    pub fn new() -> Self {
        Program {
            statements: vec![],
            functions: vec![],
            hotpots: vec![],
            globals: vec![],
            main: None,
            decls: vec![],
            type_names: BUILTIN_TYPE_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.statements
    }

    pub fn functions(&self) -> &[FuncDecl] {
        &self.functions
    }

    pub fn hotpots(&self) -> &[HotpotDecl] {
        &self.hotpots
    }

    pub fn globals(&self) -> &[DeclId] {
        &self.globals
    }

    pub fn main(&self) -> Option<&FuncDecl> {
        self.main.as_ref()
    }

    pub fn decl(&self, id: DeclId) -> Option<&VarDecl> {
        self.decls.get(id.0)
    }

    /// Like `decl`, for handles that must be valid.
    pub fn var_decl(&self, id: DeclId) -> Result<&VarDecl, Error> {
        self.decl(id).ok_or_else(|| {
            Error::new(
                ErrorImpl::InternalError {
                    message: format!("dangling declaration handle {}", id.0),
                },
                Position::null(),
            )
        })
    }

    pub fn hotpot(&self, name: &str) -> Option<&HotpotDecl> {
        self.hotpots.iter().find(|hotpot| hotpot.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&FuncDecl> {
        self.functions.iter().find(|function| function.name() == name)
    }

    pub fn global(&self, name: &str) -> Option<&VarDecl> {
        self.globals
            .iter()
            .filter_map(|id| self.decl(*id))
            .find(|decl| decl.name == name)
    }

    /// Whether a type refers only to primitives and declared hotpots.
    pub fn is_known_type(&self, data_type: &DataType) -> bool {
        match data_type {
            DataType::Int { .. }
            | DataType::Float(_)
            | DataType::Bool
            | DataType::String
            | DataType::Null => true,
            DataType::Array(element) => self.is_known_type(element),
            DataType::Record(name) => self.hotpot(name).is_some(),
            DataType::Function { params, returns } => {
                params.iter().all(|param| self.is_known_type(param)) && self.is_known_type(returns)
            }
            DataType::Unresolved => false,
        }
    }

    /// Places a new variable declaration in the arena.
    pub fn alloc_decl(
        &mut self,
        name: String,
        declared_type: DataType,
        init: Option<Expr>,
        span: Span,
    ) -> DeclId {
        let id = DeclId(self.decls.len());
        self.decls
            .push(VarDecl::new(id, name, declared_type, init, span));
        id
    }

    pub fn add_stmt(&mut self, stmt: Stmt) {
        self.statements.push(stmt);
    }

    pub fn add_global(&mut self, id: DeclId) -> Result<(), Error> {
        let decl = self.var_decl(id)?;
        if self.global(&decl.name).is_some() {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: decl.name.clone(),
                },
                decl.span.start.clone(),
            ));
        }

        self.globals.push(id);
        Ok(())
    }

    /// Registers a function; `main` becomes the entry point.
    pub fn add_function(&mut self, function: FuncDecl) -> Result<(), Error> {
        if function.name() == Self::ENTRY_POINT {
            if self.main.is_some() {
                return Err(Error::new(
                    ErrorImpl::EntryPointAlreadyDeclared,
                    function.span.start.clone(),
                ));
            }
            self.main = Some(function);
            return Ok(());
        }

        if self.function(function.name()).is_some() {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared {
                    function: function.name().to_string(),
                },
                function.span.start.clone(),
            ));
        }

        self.functions.push(function);
        Ok(())
    }

    pub fn add_hotpot(&mut self, hotpot: HotpotDecl) -> Result<(), Error> {
        if !self.type_names.insert(hotpot.name.clone()) {
            return Err(Error::new(
                ErrorImpl::HotpotAlreadyDeclared {
                    name: hotpot.name.clone(),
                },
                hotpot.span.start.clone(),
            ));
        }

        self.hotpots.push(hotpot);
        Ok(())
    }
}
