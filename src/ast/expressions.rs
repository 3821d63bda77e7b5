use std::cell::{Cell, OnceCell};

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Operator,
    Span,
};

use super::{
    ast::{DeclId, Identifier},
    types::DataType,
};

static UNRESOLVED: DataType = DataType::Unresolved;

/// An expression node together with the type the type checker assigns to it.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    ty: OnceCell<DataType>,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            ty: OnceCell::new(),
            span,
        }
    }

    /// The resolved type, or `DataType::Unresolved` before type checking.
    pub fn data_type(&self) -> &DataType {
        self.ty.get().unwrap_or(&UNRESOLVED)
    }

    pub fn is_resolved(&self) -> bool {
        self.ty.get().is_some()
    }

    /// Records the type of this expression. Each expression is typed once.
    pub fn resolve_type(&self, data_type: DataType) -> Result<(), Error> {
        self.ty.set(data_type).map_err(|_| {
            Error::new(
                ErrorImpl::InternalError {
                    message: String::from("expression typed twice"),
                },
                self.span.start.clone(),
            )
        })
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Array(ArrayExpr),
    Var(VarExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    MethodRef(MethodRefExpr),
    PropertyRef(PropertyRefExpr),
}

/// Array literal, `[a, b, c]`.
#[derive(Debug, Clone)]
pub struct ArrayExpr {
    pub values: Vec<Expr>,
}

/// A bare variable reference.
///
/// The declaration it refers to is linked by handle once the type checker
/// resolves the name.
#[derive(Debug, Clone)]
pub struct VarExpr {
    pub name: String,
    decl: OnceCell<DeclId>,
}

impl VarExpr {
    pub fn new(name: String) -> Self {
        VarExpr {
            name,
            decl: OnceCell::new(),
        }
    }

    pub fn decl(&self) -> Option<DeclId> {
        self.decl.get().copied()
    }

    pub fn resolve(&self, decl: DeclId, span: &Span) -> Result<(), Error> {
        self.decl.set(decl).map_err(|_| {
            Error::new(
                ErrorImpl::InternalError {
                    message: format!("variable `{}` resolved twice", self.name),
                },
                span.start.clone(),
            )
        })
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub operator: Operator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub operator: Operator,
    pub operand: Box<Expr>,
}

/// One `label: value` argument of a call.
#[derive(Debug, Clone)]
pub struct CallArg {
    pub label: Identifier,
    pub value: Expr,
}

/// Function call, `name(label: value, ...)`. Also used for hotpot constructors.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Identifier,
    pub args: Vec<CallArg>,
    is_constructor: Cell<bool>,
}

impl CallExpr {
    pub fn new(callee: Identifier, args: Vec<CallArg>) -> Self {
        CallExpr {
            callee,
            args,
            is_constructor: Cell::new(false),
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.is_constructor.get()
    }

    pub fn mark_constructor(&self) {
        self.is_constructor.set(true);
    }
}

/// `receiver.name(...)`
#[derive(Debug, Clone)]
pub struct MethodRefExpr {
    pub receiver: Box<Expr>,
    pub call: CallExpr,
}

/// `receiver.name`
#[derive(Debug, Clone)]
pub struct PropertyRefExpr {
    pub receiver: Box<Expr>,
    pub member: Identifier,
}
