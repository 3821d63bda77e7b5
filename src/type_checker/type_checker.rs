use std::collections::{HashMap, HashSet};

use crate::{
    ast::{
        ast::{DeclId, Program, Scope},
        expressions::{
            ArrayExpr, BinaryExpr, CallExpr, Expr, ExprKind, MethodRefExpr, PropertyRefExpr,
            UnaryExpr, VarExpr,
        },
        statements::{
            BlockStmt, BreakStmt, ContinueStmt, ForStmt, FuncDecl, HotpotDecl, ParamDecl,
            ReturnStmt, VarDecl,
        },
        types::DataType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Operator, OperatorClass},
    visitor::visitor::{
        walk_binary_expr, walk_call_expr, walk_for_stmt, walk_func_decl,
        walk_hotpot_decl, walk_block_stmt, walk_method_ref_expr, walk_return_stmt, walk_var_decl,
        VisitContext, Visitor,
    },
    Span,
};

/// How a name inside a function body is matched to a local declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalResolution {
    /// The innermost declaration already visited. Later declarations are invisible.
    #[default]
    NearestPreceding,
    /// The last same-named declaration anywhere in the function body.
    LastDeclaration,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCheckOptions {
    pub resolution: LocalResolution,
}

/// Locals declared in one block.
#[derive(Debug, Default)]
pub struct Environment {
    pub variable_lookup: HashMap<String, DeclId>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            variable_lookup: HashMap::new(),
        }
    }

    /// Redeclaring a name in the same block shadows the earlier declaration.
    pub fn declare_variable(&mut self, variable_name: String, decl: DeclId) {
        self.variable_lookup.insert(variable_name, decl);
    }

    pub fn get_variable(&self, variable_name: &str) -> Option<DeclId> {
        self.variable_lookup.get(variable_name).copied()
    }
}

/// Resolves names, assigns scopes and checks types over a parsed program.
pub struct TypeChecker<'a> {
    program: &'a Program,
    context: VisitContext<'a>,
    options: TypeCheckOptions,
    /// Locals of the blocks being visited. At top level these hold loop and block locals.
    environments: Vec<Environment>,
    /// Element type for an array literal that directly initializes an annotated variable.
    pending_element_type: Option<DataType>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(program: &'a Program, options: TypeCheckOptions) -> Self {
        TypeChecker {
            program,
            context: VisitContext::default(),
            options,
            environments: vec![],
            pending_element_type: None,
        }
    }

    fn with_environment<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        self.environments.push(Environment::new());
        let result = f(self);
        self.environments.pop();
        result
    }

    /// The hotpot followed by its ancestors, stopping at unknown names or cycles.
    fn lineage(&self, hotpot: &'a HotpotDecl) -> Vec<&'a HotpotDecl> {
        let mut seen = HashSet::new();
        let mut chain = vec![];
        let mut current = Some(hotpot);

        while let Some(hotpot) = current {
            if !seen.insert(hotpot.name.as_str()) {
                break;
            }
            chain.push(hotpot);
            current = hotpot
                .parent
                .as_ref()
                .and_then(|parent| self.program.hotpot(&parent.name));
        }

        chain
    }

    fn find_method(&self, hotpot: &'a HotpotDecl, name: &str) -> Option<&'a FuncDecl> {
        self.lineage(hotpot)
            .into_iter()
            .find_map(|hotpot| hotpot.method(name))
    }

    fn find_property(&self, hotpot: &'a HotpotDecl, name: &str) -> Option<&'a VarDecl> {
        self.lineage(hotpot).into_iter().find_map(|hotpot| {
            hotpot
                .properties
                .iter()
                .filter_map(|id| self.program.decl(*id))
                .find(|decl| decl.name == name)
        })
    }

    fn nearest_local(&self, name: &str) -> Option<DeclId> {
        self.environments
            .iter()
            .rev()
            .find_map(|environment| environment.get_variable(name))
    }

    fn find_local(&self, function: &'a FuncDecl, name: &str) -> Option<DeclId> {
        match self.options.resolution {
            LocalResolution::NearestPreceding => self.nearest_local(name),
            LocalResolution::LastDeclaration => function
                .body
                .declarations()
                .into_iter()
                .rev()
                .find(|id| {
                    self.program
                        .decl(*id)
                        .is_some_and(|decl| decl.name == name)
                })
                .or_else(|| self.nearest_local(name)),
        }
    }

    /// Properties of the current hotpot, then parameters and locals of the
    /// current function (or top-level block locals), then every global.
    fn resolve_variable(&self, name: &str) -> Option<DeclId> {
        if let Some(hotpot) = self.context.hotpot {
            if let Some(property) = self.find_property(hotpot, name) {
                return Some(property.id);
            }
        }

        if let Some(function) = self.context.function {
            let param = function
                .prototype
                .params
                .iter()
                .map(|param| param.decl)
                .find(|id| {
                    self.program
                        .decl(*id)
                        .is_some_and(|decl| decl.name == name)
                });
            if param.is_some() {
                return param;
            }

            if let Some(local) = self.find_local(function, name) {
                return Some(local);
            }
        } else if let Some(local) = self.nearest_local(name) {
            return Some(local);
        }

        self.program.global(name).map(|decl| decl.id)
    }

    /// The hotpot a member access goes through: a variable whose declared type is a hotpot.
    fn receiver_hotpot(&self, receiver: &Expr) -> Option<&'a HotpotDecl> {
        let ExprKind::Var(var) = &receiver.kind else {
            return None;
        };
        let decl = self.program.decl(var.decl()?)?;
        self.program.hotpot(decl.declared_type.record_name()?)
    }

    fn require_known_type(&self, data_type: &DataType, span: &Span) -> Result<(), Error> {
        if self.program.is_known_type(data_type) {
            Ok(())
        } else {
            Err(Error::new(
                ErrorImpl::UnknownDataType {
                    type_: data_type.clone(),
                },
                span.start.clone(),
            ))
        }
    }

    fn require_type(&self, expr: &Expr, expected: &DataType) -> Result<(), Error> {
        if expr.data_type() == expected {
            Ok(())
        } else {
            Err(Error::new(
                ErrorImpl::CannotConvertValue {
                    from: expr.data_type().clone(),
                    to: expected.clone(),
                },
                expr.span.start.clone(),
            ))
        }
    }

    fn current_scope(&self) -> Scope {
        if let Some(function) = self.context.function {
            Scope::Local(function.id)
        } else if let Some(hotpot) = self.context.hotpot {
            Scope::Property(hotpot.id)
        } else {
            Scope::Global
        }
    }

    fn check_var_decl(&mut self, decl: &'a VarDecl, register: bool) -> Result<(), Error> {
        self.require_known_type(&decl.declared_type, &decl.span)?;

        if let (Some(init), DataType::Array(element)) = (&decl.init, &decl.declared_type) {
            if matches!(init.kind, ExprKind::Array(_)) {
                self.pending_element_type = Some(element.as_ref().clone());
            }
        }
        let walked = walk_var_decl(self, decl);
        self.pending_element_type = None;
        walked?;

        if let Some(init) = &decl.init {
            self.require_type(init, &decl.declared_type)?;
        }

        let scope = self.current_scope();
        decl.resolve_scope(scope)?;

        // Registered globals resolve through the program; only block locals are tracked here.
        if register && !matches!(scope, Scope::Property(_)) {
            if let Some(environment) = self.environments.last_mut() {
                environment.declare_variable(decl.name.clone(), decl.id);
            }
        }

        Ok(())
    }
}

impl<'a> Visitor<'a> for TypeChecker<'a> {
    fn program(&self) -> &'a Program {
        self.program
    }

    fn context(&self) -> &VisitContext<'a> {
        &self.context
    }

    fn context_mut(&mut self) -> &mut VisitContext<'a> {
        &mut self.context
    }

    fn visit_var_decl(&mut self, decl: &'a VarDecl) -> Result<(), Error> {
        self.check_var_decl(decl, true)
    }

    fn visit_param_decl(&mut self, param: &'a ParamDecl) -> Result<(), Error> {
        let decl = self.program.var_decl(param.decl)?;
        self.check_var_decl(decl, false)?;

        match decl.scope() {
            Some(Scope::Local(_)) => Ok(()),
            _ => Err(Error::new(
                ErrorImpl::InternalError {
                    message: format!("parameter `{}` is not local to its function", decl.name),
                },
                param.span.start.clone(),
            )),
        }
    }

    fn visit_func_decl(&mut self, function: &'a FuncDecl) -> Result<(), Error> {
        let return_type = &function.prototype.return_type;
        self.require_known_type(return_type, &function.prototype.span)?;

        walk_func_decl(self, function)?;

        if !return_type.is_null() && !function.body.all_paths_return() {
            return Err(Error::new(
                ErrorImpl::NotAllPathsReturn {
                    type_: return_type.clone(),
                },
                function.span.start.clone(),
            ));
        }

        Ok(())
    }

    fn visit_hotpot_decl(&mut self, hotpot: &'a HotpotDecl) -> Result<(), Error> {
        if let Some(parent) = &hotpot.parent {
            if parent.name == hotpot.name || self.program.hotpot(&parent.name).is_none() {
                return Err(Error::new(
                    ErrorImpl::UnknownDataType {
                        type_: DataType::Record(parent.name.clone()),
                    },
                    parent.span.start.clone(),
                ));
            }
        }

        walk_hotpot_decl(self, hotpot)
    }

    fn visit_block_stmt(&mut self, block: &'a BlockStmt) -> Result<(), Error> {
        self.with_environment(|checker| walk_block_stmt(checker, block))
    }

    fn visit_for_stmt(&mut self, stmt: &'a ForStmt) -> Result<(), Error> {
        self.with_environment(|checker| walk_for_stmt(checker, stmt))
    }

    fn visit_return_stmt(&mut self, stmt: &'a ReturnStmt) -> Result<(), Error> {
        let Some(function) = self.context.function else {
            return Err(Error::new(
                ErrorImpl::ReturnNotAllowed,
                stmt.span.start.clone(),
            ));
        };

        walk_return_stmt(self, stmt)?;

        if stmt.value.data_type() != &function.prototype.return_type {
            return Err(Error::new(
                ErrorImpl::ReturnTypeMismatch {
                    type_: stmt.value.data_type().clone(),
                    function: function.name().to_string(),
                },
                stmt.value.span.start.clone(),
            ));
        }

        Ok(())
    }

    fn visit_break_stmt(&mut self, stmt: &'a BreakStmt) -> Result<(), Error> {
        match self.context.break_target {
            Some(_) => Ok(()),
            None => Err(Error::new(ErrorImpl::BreakNotAllowed, stmt.span.start.clone())),
        }
    }

    fn visit_continue_stmt(&mut self, stmt: &'a ContinueStmt) -> Result<(), Error> {
        match self.context.break_target {
            Some(_) => Ok(()),
            None => Err(Error::new(
                ErrorImpl::ContinueNotAllowed,
                stmt.span.start.clone(),
            )),
        }
    }

    fn visit_literal_expr(&mut self, expr: &'a Expr) -> Result<(), Error> {
        let data_type = match &expr.kind {
            ExprKind::Int(_) => DataType::int64(),
            ExprKind::Float(_) => DataType::double(),
            ExprKind::Bool(_) => DataType::Bool,
            ExprKind::String(_) => DataType::String,
            _ => DataType::Null,
        };
        expr.resolve_type(data_type)
    }

    fn visit_array_expr(&mut self, expr: &'a Expr, array: &'a ArrayExpr) -> Result<(), Error> {
        let declared = self.pending_element_type.take();
        let nested = match &declared {
            Some(DataType::Array(inner)) => Some(inner.as_ref().clone()),
            _ => None,
        };

        for value in &array.values {
            if matches!(value.kind, ExprKind::Array(_)) {
                self.pending_element_type = nested.clone();
            }
            self.visit_expr(value)?;
        }

        let element = match declared {
            Some(element) => element,
            None => array
                .values
                .first()
                .map(|value| value.data_type().clone())
                .unwrap_or(DataType::Unresolved),
        };
        for value in &array.values {
            self.require_type(value, &element)?;
        }

        expr.resolve_type(DataType::array_of(element))
    }

    fn visit_var_expr(&mut self, expr: &'a Expr, var: &'a VarExpr) -> Result<(), Error> {
        let decl = self
            .resolve_variable(&var.name)
            .and_then(|id| self.program.decl(id))
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnknownVariable {
                        name: var.name.clone(),
                    },
                    expr.span.start.clone(),
                )
            })?;

        var.resolve(decl.id, &expr.span)?;
        expr.resolve_type(decl.declared_type.clone())
    }

    fn visit_binary_expr(&mut self, expr: &'a Expr, binary: &'a BinaryExpr) -> Result<(), Error> {
        walk_binary_expr(self, binary)?;

        let left = binary.left.data_type();
        let data_type = match binary.operator.class() {
            OperatorClass::Arithmetic | OperatorClass::Assignment => {
                self.require_type(&binary.right, left)?;
                left.clone()
            }
            OperatorClass::Comparison => {
                self.require_type(&binary.right, left)?;
                DataType::Bool
            }
            OperatorClass::Logical => {
                self.require_type(&binary.left, &DataType::Bool)?;
                self.require_type(&binary.right, &DataType::Bool)?;
                DataType::Bool
            }
        };

        expr.resolve_type(data_type)
    }

    fn visit_unary_expr(&mut self, expr: &'a Expr, unary: &'a UnaryExpr) -> Result<(), Error> {
        self.visit_expr(&unary.operand)?;

        let data_type = match unary.operator {
            Operator::Not => {
                self.require_type(&unary.operand, &DataType::Bool)?;
                DataType::Bool
            }
            _ => unary.operand.data_type().clone(),
        };

        expr.resolve_type(data_type)
    }

    fn visit_call_expr(&mut self, expr: &'a Expr, call: &'a CallExpr) -> Result<(), Error> {
        walk_call_expr(self, call)?;

        let name = call.callee.name.as_str();
        if self.program.hotpot(name).is_some() {
            call.mark_constructor();
            return expr.resolve_type(DataType::Record(name.to_string()));
        }

        let method = self
            .context
            .hotpot
            .and_then(|hotpot| self.find_method(hotpot, name));
        let function = method
            .or_else(|| self.program.function(name))
            .or_else(|| self.program.main().filter(|main| main.name() == name));

        match function {
            Some(function) => expr.resolve_type(function.prototype.return_type.clone()),
            None => Err(Error::new(
                ErrorImpl::UnknownFunction {
                    name: name.to_string(),
                },
                call.callee.span.start.clone(),
            )),
        }
    }

    fn visit_method_ref_expr(
        &mut self,
        expr: &'a Expr,
        method: &'a MethodRefExpr,
    ) -> Result<(), Error> {
        walk_method_ref_expr(self, method)?;

        let name = &method.call.callee.name;
        let hotpot = self.receiver_hotpot(&method.receiver).ok_or_else(|| {
            Error::new(
                ErrorImpl::CannotCallMethod { name: name.clone() },
                method.receiver.span.start.clone(),
            )
        })?;
        let function = self.find_method(hotpot, name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownFunction { name: name.clone() },
                method.call.callee.span.start.clone(),
            )
        })?;

        expr.resolve_type(function.prototype.return_type.clone())
    }

    fn visit_property_ref_expr(
        &mut self,
        expr: &'a Expr,
        property: &'a PropertyRefExpr,
    ) -> Result<(), Error> {
        self.visit_expr(&property.receiver)?;

        let name = &property.member.name;
        let decl = self
            .receiver_hotpot(&property.receiver)
            .and_then(|hotpot| self.find_property(hotpot, name))
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::CannotFindProperty { name: name.clone() },
                    property.member.span.start.clone(),
                )
            })?;

        expr.resolve_type(decl.declared_type.clone())
    }
}

/// Runs semantic analysis over a parsed program, stopping at the first error.
pub fn type_check(program: &Program, options: TypeCheckOptions) -> Result<(), Error> {
    let mut checker = TypeChecker::new(program, options);
    checker.visit_program()
}
