//! Unit tests for semantic analysis.

use std::rc::Rc;

use super::type_checker::{type_check, LocalResolution, TypeCheckOptions};
use crate::{
    ast::{
        ast::{Program, Scope},
        expressions::ExprKind,
        statements::Stmt,
        types::DataType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.lang".to_string())).unwrap();
    parse(tokens, Rc::new("test.lang".to_string())).unwrap()
}

fn check(source: &str) -> Result<Program, Error> {
    let program = parse_source(source);
    type_check(&program, TypeCheckOptions::default())?;
    Ok(program)
}

fn check_error(source: &str) -> Error {
    check(source).unwrap_err()
}

#[test]
fn test_function_returning_parameter() {
    check("def f(a: int): int\n    return a\n").unwrap();
}

#[test]
fn test_not_all_paths_return() {
    let error = check_error("def f(): int\n    a: int = 1\n");
    assert_eq!(error.get_error_name(), "NotAllPathsReturn");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::NotAllPathsReturn { type_ } if *type_ == DataType::int64()
    ));

    let error = check_error("def f(a: bool): int\n    if a:\n        return 1\n");
    assert_eq!(error.get_error_name(), "NotAllPathsReturn");

    check("def f(a: bool): int\n    if a:\n        return 1\n    else:\n        return 2\n")
        .unwrap();
    check("def f():\n    a: int = 1\n").unwrap();
}

#[test]
fn test_break_and_continue_outside_loop() {
    let error = check_error("break");
    assert_eq!(error.get_error_name(), "BreakNotAllowed");

    let error = check_error("def f():\n    continue\n");
    assert_eq!(error.get_error_name(), "ContinueNotAllowed");

    let error = check_error("while true:\n    a: int = 1\nbreak\n");
    assert_eq!(error.get_error_name(), "BreakNotAllowed");

    check("while true:\n    if true:\n        break\n    continue\n").unwrap();
    check("def f():\n    for i: int = 0, i < 3, i += 1:\n        break\n").unwrap();
}

#[test]
fn test_array_literals() {
    check("a: [int] = [1, 2]").unwrap();
    check("a: [int] = []").unwrap();
    check("a: [[int]] = [[1], [2, 3]]").unwrap();

    check("a: [[int]] = [[]]").unwrap();
    check("a: [[[int]]] = [[[1]], [[], [2]]]").unwrap();

    let error = check_error("a: [[int]] = [[1.5]]");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::CannotConvertValue { from, to }
            if *from == DataType::double() && *to == DataType::int64()
    ));

    let source = "a: [int] = [1, 2.5]";
    let error = check_error(source);
    assert_eq!(error.get_error_name(), "CannotConvertValue");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::CannotConvertValue { from, to }
            if *from == DataType::double() && *to == DataType::int64()
    ));
    assert_eq!(error.get_position().0 as usize, source.find("2.5").unwrap());

    let error = check_error("a: [string] = [\"x\", 1]");
    assert_eq!(error.get_error_name(), "CannotConvertValue");
}

#[test]
fn test_initializer_must_match_declared_type() {
    let error = check_error("a: int = \"text\"");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::CannotConvertValue { from, to }
            if *from == DataType::String && *to == DataType::int64()
    ));

    check("a: float = 1.5").unwrap();
    check("a: bool = 1 < 2").unwrap();
    check("a: bool = true && !false").unwrap();

    let error = check_error("a: int = 1 + 2.5");
    assert_eq!(error.get_error_name(), "CannotConvertValue");

    let error = check_error("a: bool = 1 && true");
    assert_eq!(error.get_error_name(), "CannotConvertValue");

    let error = check_error("a: bool = !1");
    assert_eq!(error.get_error_name(), "CannotConvertValue");
}

#[test]
fn test_unknown_data_types() {
    let error = check_error("a: Pan");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::UnknownDataType { type_ } if type_.to_string() == "Pan"
    ));

    let error = check_error("def f(): [Pan]\n    return []\n");
    assert_eq!(error.get_error_name(), "UnknownDataType");

    let error = check_error("def f(p: Pan):\n    a: int = 1\n");
    assert_eq!(error.get_error_name(), "UnknownDataType");

    let error = check_error("hotpot Child: Parent\n    a: int\n");
    assert_eq!(error.get_error_name(), "UnknownDataType");

    let error = check_error("hotpot Loop: Loop\n    a: int\n");
    assert_eq!(error.get_error_name(), "UnknownDataType");

    check("hotpot Pot:\n    a: int\nb: [Pot]\n").unwrap();
}

#[test]
fn test_variable_resolution_and_scopes() {
    let source = "\
g: int = 1
def f(p: int): int
    l: int = p + g
    return l
";
    let program = check(source).unwrap();
    let function = program.function("f").unwrap();

    assert_eq!(program.global("g").unwrap().scope(), Some(Scope::Global));
    let param = program.decl(function.prototype.params[0].decl).unwrap();
    assert_eq!(param.scope(), Some(Scope::Local(function.id)));

    let Stmt::Declaration(decl_stmt) = &function.body.body[0] else {
        panic!("expected a declaration");
    };
    let local = program.decl(decl_stmt.decl).unwrap();
    assert_eq!(local.scope(), Some(Scope::Local(function.id)));

    let init = local.init.as_ref().unwrap();
    assert_eq!(*init.data_type(), DataType::int64());
    let ExprKind::Binary(binary) = &init.kind else {
        panic!("expected a binary expression");
    };
    let ExprKind::Var(p) = &binary.left.kind else {
        panic!("expected a variable");
    };
    assert_eq!(p.decl(), Some(param.id));
    let ExprKind::Var(g) = &binary.right.kind else {
        panic!("expected a variable");
    };
    assert_eq!(g.decl(), Some(program.global("g").unwrap().id));
}

#[test]
fn test_unknown_variable() {
    let error = check_error("a: int = b");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::UnknownVariable { name } if name == "b"
    ));
    assert_eq!(error.get_position().0, 9);

    // Locals do not leak out of their block.
    let error = check_error("def f():\n    if true:\n        a: int = 1\n    a = 2\n");
    assert_eq!(error.get_error_name(), "UnknownVariable");

    // Locals of one function are invisible to another.
    let error = check_error("def f():\n    a: int = 1\ndef g():\n    a = 2\n");
    assert_eq!(error.get_error_name(), "UnknownVariable");
}

#[test]
fn test_globals_resolve_from_the_whole_program() {
    let program = check("a: int = b\nb: int = 1\n").unwrap();
    let a = program.global("a").unwrap();
    let ExprKind::Var(b) = &a.init.as_ref().unwrap().kind else {
        panic!("expected a variable");
    };
    assert_eq!(b.decl(), Some(program.global("b").unwrap().id));

    check("def f(): int\n    return late\nlate: int = 2\n").unwrap();
}

#[test]
fn test_top_level_loop_locals_end_with_the_loop() {
    check("for i: int = 0, i < 3, i += 1:\n    x: int = i\n    x += 1\n").unwrap();

    let error = check_error("for i: int = 0, i < 3, i += 1:\n    x: int = i\ni = 4\n");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::UnknownVariable { name } if name == "i"
    ));

    let error = check_error("if true:\n    x: int = 1\nx = 2\n");
    assert_eq!(error.get_error_name(), "UnknownVariable");
}

#[test]
fn test_local_resolution_modes_differ() {
    let source = "def f():\n    b: int = a\n    a: int = 1\n";

    let program = parse_source(source);
    let error = type_check(&program, TypeCheckOptions::default()).unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownVariable");

    let program = parse_source(source);
    let options = TypeCheckOptions {
        resolution: LocalResolution::LastDeclaration,
    };
    type_check(&program, options).unwrap();
}

#[test]
fn test_redeclared_local_picks_declaration_by_mode() {
    let source = "\
def f():
    a: int = 1
    b: int = a
    a: string = \"late\"
";
    let program = parse_source(source);
    type_check(&program, TypeCheckOptions::default()).unwrap();

    let program = parse_source(source);
    let options = TypeCheckOptions {
        resolution: LocalResolution::LastDeclaration,
    };
    let error = type_check(&program, options).unwrap_err();
    assert!(matches!(
        error.get_error(),
        ErrorImpl::CannotConvertValue { from, to }
            if *from == DataType::String && *to == DataType::int64()
    ));
}

#[test]
fn test_last_declaration_scans_only_the_function_body() {
    let source = "\
def f():
    a: int = 1
    if true:
        a: string = \"inner\"
    b: int = a
";
    let options = TypeCheckOptions {
        resolution: LocalResolution::LastDeclaration,
    };
    type_check(&parse_source(source), options).unwrap();
    type_check(&parse_source(source), TypeCheckOptions::default()).unwrap();

    // Loop initializers are not body declarations and fall back to the nearest one.
    let source = "def f():\n    for i: int = 0, i < 3, i += 1:\n        x: int = i\n";
    type_check(&parse_source(source), options).unwrap();
}

#[test]
fn test_top_level_for_init_is_global() {
    let program = check("for i: int = 0, i < 3, i += 1:\n    x: int = i\n").unwrap();

    let Stmt::For(for_stmt) = &program.statements()[0] else {
        panic!("expected a for statement");
    };
    assert_eq!(program.decl(for_stmt.init).unwrap().scope(), Some(Scope::Global));
}

#[test]
fn test_function_calls() {
    check("def one(): int\n    return 1\na: int = one()\n").unwrap();

    let error = check_error("a: int = missing()");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::UnknownFunction { name } if name == "missing"
    ));

    let error = check_error("def log():\n    a: int = 1\na: int = log()\n");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::CannotConvertValue { from, .. } if from.is_null()
    ));
}

#[test]
fn test_constructor_calls_are_marked() {
    let program = check("hotpot Pot:\n    a: int = 1\np: Pot = Pot()\n").unwrap();

    let init = program.global("p").unwrap().init.as_ref().unwrap();
    let ExprKind::Call(call) = &init.kind else {
        panic!("expected a call");
    };
    assert!(call.is_constructor());
    assert_eq!(*init.data_type(), DataType::Record("Pot".to_string()));

    let program = check("def one(): int\n    return 1\na: int = one()\n").unwrap();
    let ExprKind::Call(call) = &program.global("a").unwrap().init.as_ref().unwrap().kind else {
        panic!("expected a call");
    };
    assert!(!call.is_constructor());
}

const POT: &str = "\
hotpot Pot:
    a: int = 1
    def get(): int
        return a
    def twice(): int
        return get() * 2
p: Pot = Pot()
";

#[test]
fn test_method_and_property_references() {
    let source = format!("{}x: int = p.get()\ny: int = p.a\nz: int = p.twice()\n", POT);
    let program = check(&source).unwrap();

    let pot = program.hotpot("Pot").unwrap();
    let property = program.decl(pot.properties[0]).unwrap();
    assert_eq!(property.scope(), Some(Scope::Property(pot.id)));

    let get = pot.method("get").unwrap();
    let Stmt::Return(ret) = &get.body.body[0] else {
        panic!("expected a return");
    };
    let ExprKind::Var(a) = &ret.value.kind else {
        panic!("expected a variable");
    };
    assert_eq!(a.decl(), Some(property.id));
}

#[test]
fn test_missing_method() {
    let error = check_error(&format!("{}p.missing()\n", POT));
    assert!(matches!(
        error.get_error(),
        ErrorImpl::UnknownFunction { name } if name == "missing"
    ));

    let error = check_error(&format!("{}q: int = 1\nq.get()\n", POT));
    assert!(matches!(
        error.get_error(),
        ErrorImpl::CannotCallMethod { name } if name == "get"
    ));

    let error = check_error(&format!("{}Pot().get()\n", POT));
    assert_eq!(error.get_error_name(), "CannotCallMethod");
}

#[test]
fn test_missing_property() {
    let error = check_error(&format!("{}x: int = p.b\n", POT));
    assert!(matches!(
        error.get_error(),
        ErrorImpl::CannotFindProperty { name } if name == "b"
    ));

    let error = check_error(&format!("{}q: int = 1\nx: int = q.a\n", POT));
    assert_eq!(error.get_error_name(), "CannotFindProperty");
}

#[test]
fn test_inherited_members() {
    let source = format!(
        "{}hotpot Big: Pot\n    b: int = 2\n    def sum(): int\n        return a + b + get()\nq: Big = Big()\nx: int = q.get() + q.a\n",
        POT
    );
    check(&source).unwrap();
}

#[test]
fn test_return_checks() {
    let error = check_error("return 1");
    assert_eq!(error.get_error_name(), "ReturnNotAllowed");

    let error = check_error("def f(): int\n    return \"no\"\n");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::ReturnTypeMismatch { type_, function }
            if *type_ == DataType::String && function == "f"
    ));

    let error = check_error("def f():\n    return 1\n");
    assert_eq!(error.get_error_name(), "ReturnTypeMismatch");

    check("def f():\n    return null\n").unwrap();
}

#[test]
fn test_entry_point_is_checked() {
    let error = check_error("def main():\n    a: int = b\n");
    assert_eq!(error.get_error_name(), "UnknownVariable");

    check("def helper(): int\n    return 1\ndef main():\n    a: int = helper()\n").unwrap();
}

#[test]
fn test_expression_types_are_resolved() {
    let program = check("a: int = 1\nb: bool = a == 2\na += 3\n").unwrap();

    let Stmt::Expression(stmt) = &program.statements()[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(*stmt.expression.data_type(), DataType::int64());

    let init = program.global("b").unwrap().init.as_ref().unwrap();
    assert_eq!(*init.data_type(), DataType::Bool);
}

#[test]
fn test_assignment_requires_matching_type() {
    let error = check_error("a: int = 1\na = \"x\"\n");
    assert!(matches!(
        error.get_error(),
        ErrorImpl::CannotConvertValue { from, to }
            if *from == DataType::String && *to == DataType::int64()
    ));
}
