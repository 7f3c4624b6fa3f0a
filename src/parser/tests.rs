use super::*;
use crate::ast::{Factor, Statement};

struct NoopEnv;

impl Evaluator for NoopEnv {
    fn variable(&self, _name: char) -> i32 {
        0
    }
    fn array_element(&self, _index: i32) -> i32 {
        0
    }
    fn rnd(&mut self, _bound: i32) -> i32 {
        0
    }
}

#[test]
fn empty_line_is_empty() {
    assert_eq!(parse_line(""), ParsedLine::Empty);
    assert_eq!(parse_line("   "), ParsedLine::Empty);
}

#[test]
fn bare_line_number_is_empty_numbered() {
    assert_eq!(parse_line("100"), ParsedLine::EmptyNumbered(100));
    assert_eq!(parse_line("  20  "), ParsedLine::EmptyNumbered(20));
}

#[test]
fn numbered_print_statement() {
    match parse_line("10 PRINT 1") {
        ParsedLine::Numbered(10, Statement::Print(_)) => {}
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn print_abbreviations_are_equivalent() {
    let a = parse_line("PRINT 5");
    let b = parse_line("PR 5");
    let c = parse_line("? 5");
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn input_is_not_swallowed_by_in_abbreviation() {
    match parse_line("INPUT A, B") {
        ParsedLine::Unnumbered(Statement::Input(lvs)) => assert_eq!(lvs.len(), 2),
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn let_keyword_is_optional() {
    let with_let = parse_line("LET A = 5");
    let without_let = parse_line("A = 5");
    assert_eq!(with_let, without_let);
}

#[test]
fn subtraction_parses_right_recursively() {
    match parse_line("PRINT 10 - 3 - 2") {
        ParsedLine::Unnumbered(Statement::Print(list)) => {
            assert_eq!(list.entries.len(), 1);
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn unary_minus_parses_as_expression_minus() {
    match parse_line("PRINT -5") {
        ParsedLine::Unnumbered(Statement::Print(list)) => match &list.entries[0].item {
            PrintItem::Expr(Expression::Minus(_)) => {}
            other => panic!("expected Expression::Minus, got {other:?}"),
        },
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn relop_tries_longer_operators_first() {
    match parse_line("IF A <= 1 THEN END") {
        ParsedLine::Unnumbered(Statement::If(_, RelOp::Le, _, _)) => {}
        other => panic!("unexpected parse: {other:?}"),
    }
    match parse_line("IF A <> 1 THEN END") {
        ParsedLine::Unnumbered(Statement::If(_, RelOp::Ne, _, _)) => {}
        other => panic!("unexpected parse: {other:?}"),
    }
    match parse_line("IF A >< 1 THEN END") {
        ParsedLine::Unnumbered(Statement::If(_, RelOp::Ne, _, _)) => {}
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn if_without_then_is_accepted() {
    match parse_line("IF A = 1 GOTO 10") {
        ParsedLine::Unnumbered(Statement::If(_, RelOp::Eq, _, stmt)) => {
            assert!(matches!(*stmt, Statement::Goto(_)));
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn nested_if_then_if_then_composes() {
    match parse_line("IF A = 1 THEN IF B = 2 THEN PRINT 1") {
        ParsedLine::Unnumbered(Statement::If(_, _, _, inner)) => {
            assert!(matches!(*inner, Statement::If(_, _, _, _)));
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn rnd_is_not_mistaken_for_a_bare_variable() {
    match parse_line("PRINT RND(6)") {
        ParsedLine::Unnumbered(Statement::Print(list)) => match &list.entries[0].item {
            PrintItem::Expr(Expression::Unsigned(UnsignedExpression::Value(Term::Value(
                Factor::Rnd(_),
            )))) => {}
            other => panic!("expected Factor::Rnd, got {other:?}"),
        },
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn dim_array_statement() {
    match parse_line("DIM@(10)") {
        ParsedLine::Unnumbered(Statement::DimArray(_)) => {}
        other => panic!("unexpected parse: {other:?}"),
    }
    match parse_line("DIM @(10)") {
        ParsedLine::Unnumbered(Statement::DimArray(_)) => {}
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn rem_keeps_verbatim_text_and_apostrophe_alias_normalizes() {
    match parse_line("10 REM hello") {
        ParsedLine::Numbered(10, Statement::Rem(text)) => assert_eq!(text, " hello"),
        other => panic!("unexpected parse: {other:?}"),
    }
    match parse_line("10 'hello") {
        ParsedLine::Numbered(10, Statement::Rem(text)) => assert_eq!(text, "hello"),
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn save_and_load_take_string_literals() {
    match parse_line(r#"SAVE "prog.bas""#) {
        ParsedLine::Unnumbered(Statement::Save(path)) => assert_eq!(path, "prog.bas"),
        other => panic!("unexpected parse: {other:?}"),
    }
    match parse_line(r#"LD "prog.bas""#) {
        ParsedLine::Unnumbered(Statement::Load(path)) => assert_eq!(path, "prog.bas"),
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn list_range_variants() {
    assert!(matches!(
        parse_line("LIST"),
        ParsedLine::Unnumbered(Statement::List(ListRange::All))
    ));
    assert!(matches!(
        parse_line("LIST 10"),
        ParsedLine::Unnumbered(Statement::List(ListRange::Single(_)))
    ));
    assert!(matches!(
        parse_line("LIST 10, 20"),
        ParsedLine::Unnumbered(Statement::List(ListRange::Range(_, _)))
    ));
}

#[test]
fn trailing_garbage_is_an_error() {
    match parse_line("PRINT 1 2") {
        ParsedLine::Error(_) => {}
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn unrecognized_statement_is_an_error() {
    match parse_line("10 FOOBAR") {
        ParsedLine::Error(_) => {}
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn print_list_with_trailing_separator_records_it() {
    match parse_line("PRINT A;") {
        ParsedLine::Unnumbered(Statement::Print(list)) => {
            assert_eq!(list.entries.len(), 1);
            assert_eq!(list.entries[0].separator, Some(PrintSeparator::Semicolon));
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn input_values_parses_numbers_and_variables() {
    let env = NoopEnv;
    let values = parse_input_values("1, -2, +3", 3, &env).expect("should parse");
    assert_eq!(values, vec![1, -2, 3]);
}

#[test]
fn input_values_rejects_wrong_count() {
    let env = NoopEnv;
    assert_eq!(parse_input_values("1, 2", 3, &env), None);
    assert_eq!(parse_input_values("1, 2, 3", 2, &env), None);
}

#[test]
fn input_values_substitutes_variable_value() {
    struct FixedEnv;
    impl Evaluator for FixedEnv {
        fn variable(&self, name: char) -> i32 {
            if name == 'A' {
                42
            } else {
                0
            }
        }
        fn array_element(&self, _index: i32) -> i32 {
            0
        }
        fn rnd(&mut self, _bound: i32) -> i32 {
            0
        }
    }
    let env = FixedEnv;
    let values = parse_input_values("A", 1, &env).expect("should parse");
    assert_eq!(values, vec![42]);
}
