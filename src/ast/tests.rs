use std::rc::Rc;

use super::{
    ast::{DeclId, FuncId, HotpotId, Program, Scope},
    expressions::{Expr, ExprKind, VarExpr},
    statements::Stmt,
    types::{DataType, FloatType},
};
use crate::{lexer::lexer::tokenize, parser::parser::parse, Position, Span};

fn span() -> Span {
    let file = Rc::new("test.lang".to_string());
    Span {
        start: Position(0, Rc::clone(&file)),
        end: Position(1, file),
    }
}

fn parse_source(source: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some("test.lang".to_string())).unwrap();
    parse(tokens, Rc::new("test.lang".to_string())).unwrap()
}

#[test]
fn test_data_type_equality_ignores_width_and_precision() {
    let byte = DataType::Int {
        width: 8,
        signed: false,
    };
    assert_eq!(byte, DataType::int64());
    assert_eq!(DataType::Float(FloatType::Single), DataType::double());
    assert_ne!(DataType::int64(), DataType::double());

    assert_eq!(
        DataType::array_of(byte.clone()),
        DataType::array_of(DataType::int64())
    );
    assert_ne!(
        DataType::array_of(DataType::int64()),
        DataType::array_of(DataType::String)
    );
    assert_ne!(
        DataType::Record("Pot".to_string()),
        DataType::Record("Pan".to_string())
    );
}

#[test]
fn test_data_type_display() {
    assert_eq!(DataType::int64().to_string(), "int");
    assert_eq!(
        DataType::Int {
            width: 8,
            signed: false
        }
        .to_string(),
        "u8"
    );
    assert_eq!(DataType::Float(FloatType::Single).to_string(), "float");
    assert_eq!(DataType::double().to_string(), "double");
    assert_eq!(DataType::Null.to_string(), "null");
    assert_eq!(
        DataType::array_of(DataType::array_of(DataType::Bool)).to_string(),
        "[[bool]]"
    );
    assert_eq!(DataType::Record("Pot".to_string()).to_string(), "Pot");
    assert_eq!(
        DataType::Function {
            params: vec![DataType::int64(), DataType::String],
            returns: Box::new(DataType::Null),
        }
        .to_string(),
        "def(int, string) -> null"
    );
    assert_eq!(DataType::Unresolved.to_string(), "<unresolved>");
}

#[test]
fn test_data_type_from_name() {
    assert_eq!(DataType::from_name("int"), DataType::int64());
    assert!(matches!(
        DataType::from_name("float"),
        DataType::Float(FloatType::Single)
    ));
    assert!(matches!(
        DataType::from_name("double"),
        DataType::Float(FloatType::Double)
    ));
    assert!(DataType::from_name("void").is_null());
    assert!(DataType::from_name("null").is_null());
    assert_eq!(DataType::from_name("Pot").record_name(), Some("Pot"));
}

#[test]
fn test_expression_type_is_written_once() {
    let expr = Expr::new(ExprKind::Int(1), span());
    assert!(!expr.is_resolved());
    assert_eq!(*expr.data_type(), DataType::Unresolved);

    expr.resolve_type(DataType::int64()).unwrap();
    assert_eq!(*expr.data_type(), DataType::int64());

    let error = expr.resolve_type(DataType::String).unwrap_err();
    assert_eq!(error.get_error_name(), "InternalError");
    assert_eq!(*expr.data_type(), DataType::int64());
}

#[test]
fn test_variable_link_is_written_once() {
    let var = VarExpr::new("a".to_string());
    assert!(var.decl().is_none());

    var.resolve(DeclId(3), &span()).unwrap();
    assert_eq!(var.decl(), Some(DeclId(3)));
    assert!(var.resolve(DeclId(4), &span()).is_err());
}

#[test]
fn test_declaration_scope_is_written_once() {
    let program = parse_source("a: int = 1");
    let decl = program.global("a").unwrap();
    assert!(decl.scope().is_none());

    decl.resolve_scope(Scope::Global).unwrap();
    assert_eq!(decl.scope(), Some(Scope::Global));
    assert!(decl.resolve_scope(Scope::Local(FuncId(0))).is_err());
    assert_ne!(Scope::Local(FuncId(0)), Scope::Property(HotpotId(0)));
}

#[test]
fn test_all_paths_return() {
    let source = "\
def plain(): int
    return 1
def missing(): int
    a: int = 1
def branches(a: bool): int
    if a:
        return 1
    elif a:
        return 2
    else:
        return 3
def no_else(a: bool): int
    if a:
        return 1
def partial(a: bool): int
    if a:
        return 1
    else:
        b: int = 2
def nested(a: bool): int
    if a:
        if a:
            return 1
        else:
            return 2
    else:
        return 3
def early(): int
    return 1
    a: int = 2
";
    let program = parse_source(source);
    let returns = |name: &str| program.function(name).unwrap().body.all_paths_return();

    assert!(returns("plain"));
    assert!(!returns("missing"));
    assert!(returns("branches"));
    assert!(!returns("no_else"));
    assert!(!returns("partial"));
    assert!(returns("nested"));
    assert!(!returns("early"));
}

#[test]
fn test_block_declarations_are_direct_children() {
    let source = "\
def f():
    a: int = 1
    if true:
        b: int = 2
    else:
        c: int = 3
    for i: int = 0, i < 3, i += 1:
        d: int = 4
    while false:
        e: int = 5
    f: int = 6
";
    let program = parse_source(source);
    let names: Vec<String> = program
        .function("f")
        .unwrap()
        .body
        .declarations()
        .into_iter()
        .map(|id| program.decl(id).unwrap().name.clone())
        .collect();

    assert_eq!(names, vec!["a", "f"]);
}

#[test]
fn test_prototype_data_type() {
    let program = parse_source("def f(a: int, b: [string]): bool\n    return true\n");
    let function = program.function("f").unwrap();

    assert_eq!(
        function.prototype.data_type(&program),
        DataType::Function {
            params: vec![DataType::int64(), DataType::array_of(DataType::String)],
            returns: Box::new(DataType::Bool),
        }
    );
}

#[test]
fn test_known_types() {
    let program = parse_source("hotpot Pot:\n    a: int\n");

    assert!(program.is_known_type(&DataType::int64()));
    assert!(program.is_known_type(&DataType::array_of(DataType::Record("Pot".to_string()))));
    assert!(!program.is_known_type(&DataType::Record("Pan".to_string())));
    assert!(!program.is_known_type(&DataType::array_of(DataType::Record("Pan".to_string()))));
    assert!(!program.is_known_type(&DataType::Unresolved));
}

#[test]
fn test_program_registry_lookups() {
    let program = parse_source("x: int = 1\ndef f():\n    x = 2\nhotpot Pot:\nx = 3\n");

    assert_eq!(program.globals().len(), 1);
    assert!(program.global("y").is_none());
    assert!(program.function("f").is_some());
    assert!(program.hotpot("Pot").is_some());
    assert_eq!(program.statements().len(), 1);
    assert!(matches!(program.statements()[0], Stmt::Expression(_)));
    assert!(program.var_decl(DeclId(99)).is_err());
}
