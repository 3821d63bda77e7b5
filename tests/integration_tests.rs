//! Integration tests for the complete front end.
//!
//! These tests drive whole programs through tokenization, parsing and
//! semantic analysis using the public entry points.

use hotpot::{
    ast::{
        ast::Scope,
        expressions::ExprKind,
        statements::Stmt,
        types::DataType,
    },
    check_source,
    errors::errors::ErrorCategory,
    get_line_at_position, parse_source,
    type_checker::type_checker::{LocalResolution, TypeCheckOptions},
};

const PROGRAM: &str = "\
# A small inventory of pots.
count: int = 0
names: [string] = [\"tin\", 'clay']

hotpot Pot:
    size: int = 1
    def grow(by: int): int
        size += by
        return size

hotpot Kettle: Pot
    hot: bool = false
    def boil(): bool
        hot = true
        return hot

def add(a: int, b: int): int
    return a + b

def classify(n: int): string
    if n < 0:
        return \"negative\"
    elif n == 0:
        return \"zero\"
    else:
        return \"positive\"

def main():
    k: Kettle = Kettle()
    total: int = add(a: 1, b: 2) * -3
    for i: int = 0, i < 10, i += 1:
        if i % 2 == 0:
            continue
        total += k.grow(by: i)
    while total > 100:
        total -= 1
        if total == 50:
            break
    done: bool = k.boil() && k.size > 2

count = add(a: count, b: 1)
";

#[test]
fn test_check_full_program() {
    let program = check_source(PROGRAM, Some("pots.hp".to_string()), TypeCheckOptions::default())
        .unwrap();

    assert_eq!(program.globals().len(), 2);
    assert_eq!(program.hotpots().len(), 2);
    assert_eq!(program.functions().len(), 2);
    assert!(program.main().is_some());
    assert_eq!(program.statements().len(), 1);

    let kettle = program.hotpot("Kettle").unwrap();
    assert_eq!(kettle.parent.as_ref().unwrap().name, "Pot");
    let hot = program.decl(kettle.properties[0]).unwrap();
    assert_eq!(hot.scope(), Some(Scope::Property(kettle.id)));

    let names = program.global("names").unwrap();
    assert_eq!(names.scope(), Some(Scope::Global));
    assert_eq!(
        *names.init.as_ref().unwrap().data_type(),
        DataType::array_of(DataType::String)
    );
}

#[test]
fn test_constant_folding_and_calls() {
    let program = check_source(PROGRAM, None, TypeCheckOptions::default()).unwrap();
    let main = program.main().unwrap();

    let Stmt::Declaration(total) = &main.body.body[1] else {
        panic!("expected a declaration");
    };
    let init = program.decl(total.decl).unwrap().init.as_ref().unwrap();
    let ExprKind::Binary(binary) = &init.kind else {
        panic!("expected a binary expression");
    };
    assert!(matches!(binary.right.kind, ExprKind::Int(-3)));

    let ExprKind::Call(call) = &binary.left.kind else {
        panic!("expected a call");
    };
    assert!(!call.is_constructor());
    let labels: Vec<&str> = call.args.iter().map(|arg| arg.label.name.as_str()).collect();
    assert_eq!(labels, vec!["a", "b"]);
}

#[test]
fn test_errors_abort_with_category() {
    let cases = [
        ("a: string = \"open", ErrorCategory::Lex, "UnterminatedString"),
        ("a: int = 1 ^ 2", ErrorCategory::Lex, "UnknownOperator"),
        ("a: int = 12ab", ErrorCategory::Lex, "NumberParseError"),
        ("def f()\n    return 1\n", ErrorCategory::Syntax, "ExpectedToken"),
        ("if true:\n  a: int = 1\n", ErrorCategory::Syntax, "IndentationError"),
        ("x: int = 1\nx: int = 2\n", ErrorCategory::Registration, "VariableAlreadyDeclared"),
        ("hotpot string:\n    a: int\n", ErrorCategory::Registration, "HotpotAlreadyDeclared"),
        ("break", ErrorCategory::Semantic, "BreakNotAllowed"),
        ("a: int = 2.5", ErrorCategory::Semantic, "CannotConvertValue"),
    ];

    for (source, category, name) in cases {
        let error = check_source(source, None, TypeCheckOptions::default()).unwrap_err();
        assert_eq!(error.get_error_name(), name, "source: {:?}", source);
        assert_eq!(error.category(), category, "source: {:?}", source);
    }
}

#[test]
fn test_duplicate_global_points_at_second_declaration() {
    let source = "x: int = 1\nx: int = 2\n";
    let error = parse_source(source, None).unwrap_err();

    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
    let (line, text, column) = get_line_at_position(source, error.get_position().0).unwrap();
    assert_eq!(line, 2);
    assert_eq!(text, "x: int = 2\n");
    assert_eq!(column, 0);
}

#[test]
fn test_hotpot_method_references() {
    let base = "\
hotpot Pot:
    a: int = 1
    def get(): int
        return a
p: Pot = Pot()
";
    check_source(&format!("{}p.get()\n", base), None, TypeCheckOptions::default()).unwrap();

    let error = check_source(&format!("{}p.missing()\n", base), None, TypeCheckOptions::default())
        .unwrap_err();
    assert_eq!(error.get_error_name(), "UnknownFunction");
}

#[test]
fn test_resolution_mode_is_configurable() {
    let source = "\
def f(): int
    a: int = 1
    b: int = a
    a: bool = true
    return b
";
    check_source(source, None, TypeCheckOptions::default()).unwrap();

    let options = TypeCheckOptions {
        resolution: LocalResolution::LastDeclaration,
    };
    let error = check_source(source, None, options).unwrap_err();
    assert_eq!(error.get_error_name(), "CannotConvertValue");
}

#[test]
fn test_fresh_parse_per_call() {
    let first = parse_source("def f():\n    a: int = 1\n", None).unwrap();
    let second = parse_source("def f():\n    a: int = 1\n", None).unwrap();

    assert_eq!(first.functions().len(), 1);
    assert_eq!(second.functions().len(), 1);
    assert_eq!(first.functions()[0].id, second.functions()[0].id);
}
