//! Traversal framework over the program registry.
//!
//! `Visitor` has one `visit_*` method per node kind. The defaults call the
//! matching `walk_*` function, which visits the node's children, so a client
//! overrides only the nodes it cares about and calls `walk_*` itself to keep
//! descending.
//!
//! While walking, the visitor keeps a `VisitContext`: the function, hotpot,
//! block and loop currently being visited. Each slot is set through a
//! `with_*` method that restores the previous value when the closure
//! returns, whether it succeeded or not.

use crate::{
    ast::{
        ast::Program,
        expressions::{
            ArrayExpr, BinaryExpr, CallExpr, Expr, ExprKind, MethodRefExpr, PropertyRefExpr,
            UnaryExpr, VarExpr,
        },
        statements::{
            BlockStmt, BreakStmt, ContinueStmt, DeclStmt, ExpressionStmt, ForStmt, FuncDecl,
            FuncPrototype, HotpotDecl, IfStmt, ParamDecl, ReturnStmt, Stmt, VarDecl, WhileStmt,
        },
    },
    errors::errors::Error,
};

/// The innermost loop a `break` or `continue` applies to.
#[derive(Debug, Clone, Copy)]
pub enum BreakTarget<'a> {
    For(&'a ForStmt),
    While(&'a WhileStmt),
}

/// What the visitor is currently inside of.
#[derive(Debug, Default, Clone)]
pub struct VisitContext<'a> {
    pub function: Option<&'a FuncDecl>,
    pub hotpot: Option<&'a HotpotDecl>,
    pub scope: Option<&'a BlockStmt>,
    pub break_target: Option<BreakTarget<'a>>,
}

/// Any declaration, for the `visit_decl` dispatcher.
#[derive(Debug, Clone, Copy)]
pub enum DeclRef<'a> {
    Var(&'a VarDecl),
    Param(&'a ParamDecl),
    Prototype(&'a FuncPrototype),
    Function(&'a FuncDecl),
    Hotpot(&'a HotpotDecl),
}

pub trait Visitor<'a>: Sized {
    /// The registry being visited. Declaration handles resolve against it.
    fn program(&self) -> &'a Program;

    fn context(&self) -> &VisitContext<'a>;

    fn context_mut(&mut self) -> &mut VisitContext<'a>;

    // Context

    fn with_function<F>(&mut self, function: Option<&'a FuncDecl>, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let saved = std::mem::replace(&mut self.context_mut().function, function);
        let result = f(self);
        self.context_mut().function = saved;
        result
    }

    fn with_hotpot<F>(&mut self, hotpot: Option<&'a HotpotDecl>, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let saved = std::mem::replace(&mut self.context_mut().hotpot, hotpot);
        let result = f(self);
        self.context_mut().hotpot = saved;
        result
    }

    fn with_scope<F>(&mut self, scope: Option<&'a BlockStmt>, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let saved = std::mem::replace(&mut self.context_mut().scope, scope);
        let result = f(self);
        self.context_mut().scope = saved;
        result
    }

    fn with_break_target<F>(&mut self, target: Option<BreakTarget<'a>>, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let saved = std::mem::replace(&mut self.context_mut().break_target, target);
        let result = f(self);
        self.context_mut().break_target = saved;
        result
    }

    // Program and declarations

    fn visit_program(&mut self) -> Result<(), Error> {
        walk_program(self)
    }

    fn visit_decl(&mut self, decl: DeclRef<'a>) -> Result<(), Error> {
        walk_decl(self, decl)
    }

    fn visit_var_decl(&mut self, decl: &'a VarDecl) -> Result<(), Error> {
        walk_var_decl(self, decl)
    }

    fn visit_param_decl(&mut self, param: &'a ParamDecl) -> Result<(), Error> {
        walk_param_decl(self, param)
    }

    fn visit_func_prototype(&mut self, prototype: &'a FuncPrototype) -> Result<(), Error> {
        walk_func_prototype(self, prototype)
    }

    fn visit_func_decl(&mut self, function: &'a FuncDecl) -> Result<(), Error> {
        walk_func_decl(self, function)
    }

    fn visit_hotpot_decl(&mut self, hotpot: &'a HotpotDecl) -> Result<(), Error> {
        walk_hotpot_decl(self, hotpot)
    }

    // Statements

    fn visit_stmt(&mut self, stmt: &'a Stmt) -> Result<(), Error> {
        walk_stmt(self, stmt)
    }

    fn visit_block_stmt(&mut self, block: &'a BlockStmt) -> Result<(), Error> {
        walk_block_stmt(self, block)
    }

    fn visit_return_stmt(&mut self, stmt: &'a ReturnStmt) -> Result<(), Error> {
        walk_return_stmt(self, stmt)
    }

    fn visit_if_stmt(&mut self, stmt: &'a IfStmt) -> Result<(), Error> {
        walk_if_stmt(self, stmt)
    }

    fn visit_for_stmt(&mut self, stmt: &'a ForStmt) -> Result<(), Error> {
        walk_for_stmt(self, stmt)
    }

    fn visit_while_stmt(&mut self, stmt: &'a WhileStmt) -> Result<(), Error> {
        walk_while_stmt(self, stmt)
    }

    fn visit_expression_stmt(&mut self, stmt: &'a ExpressionStmt) -> Result<(), Error> {
        self.visit_expr(&stmt.expression)
    }

    fn visit_decl_stmt(&mut self, stmt: &'a DeclStmt) -> Result<(), Error> {
        walk_decl_stmt(self, stmt)
    }

    fn visit_break_stmt(&mut self, _stmt: &'a BreakStmt) -> Result<(), Error> {
        Ok(())
    }

    fn visit_continue_stmt(&mut self, _stmt: &'a ContinueStmt) -> Result<(), Error> {
        Ok(())
    }

    // Expressions

    fn visit_expr(&mut self, expr: &'a Expr) -> Result<(), Error> {
        walk_expr(self, expr)
    }

    /// Null, int, float, bool and string literals. They have no children.
    fn visit_literal_expr(&mut self, _expr: &'a Expr) -> Result<(), Error> {
        Ok(())
    }

    fn visit_array_expr(&mut self, _expr: &'a Expr, array: &'a ArrayExpr) -> Result<(), Error> {
        walk_array_expr(self, array)
    }

    fn visit_var_expr(&mut self, _expr: &'a Expr, _var: &'a VarExpr) -> Result<(), Error> {
        Ok(())
    }

    fn visit_binary_expr(&mut self, _expr: &'a Expr, binary: &'a BinaryExpr) -> Result<(), Error> {
        walk_binary_expr(self, binary)
    }

    fn visit_unary_expr(&mut self, _expr: &'a Expr, unary: &'a UnaryExpr) -> Result<(), Error> {
        self.visit_expr(&unary.operand)
    }

    fn visit_call_expr(&mut self, _expr: &'a Expr, call: &'a CallExpr) -> Result<(), Error> {
        walk_call_expr(self, call)
    }

    fn visit_method_ref_expr(
        &mut self,
        _expr: &'a Expr,
        method: &'a MethodRefExpr,
    ) -> Result<(), Error> {
        walk_method_ref_expr(self, method)
    }

    fn visit_property_ref_expr(
        &mut self,
        _expr: &'a Expr,
        property: &'a PropertyRefExpr,
    ) -> Result<(), Error> {
        self.visit_expr(&property.receiver)
    }
}

/// Globals, then hotpots, functions, the entry point and finally free statements.
pub fn walk_program<'a, V: Visitor<'a>>(visitor: &mut V) -> Result<(), Error> {
    let program = visitor.program();

    for id in program.globals() {
        visitor.visit_decl(DeclRef::Var(program.var_decl(*id)?))?;
    }
    for hotpot in program.hotpots() {
        visitor.visit_decl(DeclRef::Hotpot(hotpot))?;
    }
    for function in program.functions() {
        visitor.visit_decl(DeclRef::Function(function))?;
    }
    if let Some(main) = program.main() {
        visitor.visit_decl(DeclRef::Function(main))?;
    }
    for stmt in program.statements() {
        visitor.visit_stmt(stmt)?;
    }

    Ok(())
}

pub fn walk_decl<'a, V: Visitor<'a>>(visitor: &mut V, decl: DeclRef<'a>) -> Result<(), Error> {
    match decl {
        DeclRef::Var(decl) => visitor.visit_var_decl(decl),
        DeclRef::Param(param) => visitor.visit_param_decl(param),
        DeclRef::Prototype(prototype) => visitor.visit_func_prototype(prototype),
        DeclRef::Function(function) => visitor.visit_func_decl(function),
        DeclRef::Hotpot(hotpot) => visitor.visit_hotpot_decl(hotpot),
    }
}

pub fn walk_var_decl<'a, V: Visitor<'a>>(visitor: &mut V, decl: &'a VarDecl) -> Result<(), Error> {
    match &decl.init {
        Some(init) => visitor.visit_expr(init),
        None => Ok(()),
    }
}

pub fn walk_param_decl<'a, V: Visitor<'a>>(
    visitor: &mut V,
    param: &'a ParamDecl,
) -> Result<(), Error> {
    let decl = visitor.program().var_decl(param.decl)?;
    visitor.visit_var_decl(decl)
}

pub fn walk_func_prototype<'a, V: Visitor<'a>>(
    visitor: &mut V,
    prototype: &'a FuncPrototype,
) -> Result<(), Error> {
    for param in &prototype.params {
        visitor.visit_param_decl(param)?;
    }
    Ok(())
}

pub fn walk_func_decl<'a, V: Visitor<'a>>(
    visitor: &mut V,
    function: &'a FuncDecl,
) -> Result<(), Error> {
    visitor.with_function(Some(function), |visitor| {
        visitor.visit_func_prototype(&function.prototype)?;
        visitor.visit_block_stmt(&function.body)
    })
}

pub fn walk_hotpot_decl<'a, V: Visitor<'a>>(
    visitor: &mut V,
    hotpot: &'a HotpotDecl,
) -> Result<(), Error> {
    visitor.with_hotpot(Some(hotpot), |visitor| {
        let program = visitor.program();
        for id in &hotpot.properties {
            visitor.visit_var_decl(program.var_decl(*id)?)?;
        }
        for method in &hotpot.methods {
            visitor.visit_func_decl(method)?;
        }
        Ok(())
    })
}

pub fn walk_stmt<'a, V: Visitor<'a>>(visitor: &mut V, stmt: &'a Stmt) -> Result<(), Error> {
    match stmt {
        Stmt::Block(block) => visitor.visit_block_stmt(block),
        Stmt::Return(stmt) => visitor.visit_return_stmt(stmt),
        Stmt::If(stmt) => visitor.visit_if_stmt(stmt),
        Stmt::For(stmt) => visitor.visit_for_stmt(stmt),
        Stmt::While(stmt) => visitor.visit_while_stmt(stmt),
        Stmt::Expression(stmt) => visitor.visit_expression_stmt(stmt),
        Stmt::Declaration(stmt) => visitor.visit_decl_stmt(stmt),
        Stmt::Break(stmt) => visitor.visit_break_stmt(stmt),
        Stmt::Continue(stmt) => visitor.visit_continue_stmt(stmt),
    }
}

pub fn walk_block_stmt<'a, V: Visitor<'a>>(
    visitor: &mut V,
    block: &'a BlockStmt,
) -> Result<(), Error> {
    visitor.with_scope(Some(block), |visitor| {
        for stmt in &block.body {
            visitor.visit_stmt(stmt)?;
        }
        Ok(())
    })
}

pub fn walk_return_stmt<'a, V: Visitor<'a>>(
    visitor: &mut V,
    stmt: &'a ReturnStmt,
) -> Result<(), Error> {
    visitor.visit_expr(&stmt.value)
}

pub fn walk_if_stmt<'a, V: Visitor<'a>>(visitor: &mut V, stmt: &'a IfStmt) -> Result<(), Error> {
    for branch in &stmt.branches {
        visitor.visit_expr(&branch.condition)?;
        visitor.visit_block_stmt(&branch.body)?;
    }
    match &stmt.else_body {
        Some(else_body) => visitor.visit_block_stmt(else_body),
        None => Ok(()),
    }
}

pub fn walk_for_stmt<'a, V: Visitor<'a>>(visitor: &mut V, stmt: &'a ForStmt) -> Result<(), Error> {
    let init = visitor.program().var_decl(stmt.init)?;
    visitor.visit_var_decl(init)?;
    visitor.visit_expr(&stmt.condition)?;
    visitor.visit_expr(&stmt.step)?;

    visitor.with_break_target(Some(BreakTarget::For(stmt)), |visitor| {
        visitor.visit_block_stmt(&stmt.body)
    })
}

pub fn walk_while_stmt<'a, V: Visitor<'a>>(
    visitor: &mut V,
    stmt: &'a WhileStmt,
) -> Result<(), Error> {
    visitor.visit_expr(&stmt.condition)?;

    visitor.with_break_target(Some(BreakTarget::While(stmt)), |visitor| {
        visitor.visit_block_stmt(&stmt.body)
    })
}

pub fn walk_decl_stmt<'a, V: Visitor<'a>>(visitor: &mut V, stmt: &'a DeclStmt) -> Result<(), Error> {
    let decl = visitor.program().var_decl(stmt.decl)?;
    visitor.visit_var_decl(decl)
}

pub fn walk_expr<'a, V: Visitor<'a>>(visitor: &mut V, expr: &'a Expr) -> Result<(), Error> {
    match &expr.kind {
        ExprKind::Null
        | ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Bool(_)
        | ExprKind::String(_) => visitor.visit_literal_expr(expr),
        ExprKind::Array(array) => visitor.visit_array_expr(expr, array),
        ExprKind::Var(var) => visitor.visit_var_expr(expr, var),
        ExprKind::Binary(binary) => visitor.visit_binary_expr(expr, binary),
        ExprKind::Unary(unary) => visitor.visit_unary_expr(expr, unary),
        ExprKind::Call(call) => visitor.visit_call_expr(expr, call),
        ExprKind::MethodRef(method) => visitor.visit_method_ref_expr(expr, method),
        ExprKind::PropertyRef(property) => visitor.visit_property_ref_expr(expr, property),
    }
}

pub fn walk_array_expr<'a, V: Visitor<'a>>(
    visitor: &mut V,
    array: &'a ArrayExpr,
) -> Result<(), Error> {
    for value in &array.values {
        visitor.visit_expr(value)?;
    }
    Ok(())
}

pub fn walk_binary_expr<'a, V: Visitor<'a>>(
    visitor: &mut V,
    binary: &'a BinaryExpr,
) -> Result<(), Error> {
    visitor.visit_expr(&binary.left)?;
    visitor.visit_expr(&binary.right)
}

/// Visits the argument values. The callee is a name, not an expression.
pub fn walk_call_expr<'a, V: Visitor<'a>>(visitor: &mut V, call: &'a CallExpr) -> Result<(), Error> {
    for arg in &call.args {
        visitor.visit_expr(&arg.value)?;
    }
    Ok(())
}

pub fn walk_method_ref_expr<'a, V: Visitor<'a>>(
    visitor: &mut V,
    method: &'a MethodRefExpr,
) -> Result<(), Error> {
    visitor.visit_expr(&method.receiver)?;
    walk_call_expr(visitor, &method.call)
}
