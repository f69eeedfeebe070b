use std::{fs, path::Path};

use transbasic::{
    ast::{
        BinaryOperator, BranchForm, CaseExpression, ConditionKind, ExprKind, ExprNode,
        UnaryOperator,
    },
    codegen::{
        cpp::CppGenerator,
        events::{Event, EventLog},
    },
    error::{CompileError, ParseError, SemanticError},
    frontend::config::ParserConfig,
    read_source, translate, translate_with_config,
};
use walkdir::WalkDir;

#[test]
fn sample_programs_translate() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/programs").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| {
                                          e.path().extension().is_some_and(|ext| ext == "bas")
                                      })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let name = path.display().to_string();
        count += 1;

        let mut log = EventLog::new();
        if let Err(e) = translate(&name, &source, &mut log) {
            panic!("Program {name} failed:\n{source}\nError: {e}");
        }
        assert_eq!(log.count("begin_block"), log.count("end_block"), "{name}");
        assert_eq!(log.count("function"), log.count("end_function"), "{name}");

        let mut cpp = CppGenerator::new();
        if let Err(e) = translate(&name, &source, &mut cpp) {
            panic!("Program {name} failed to render:\n{e}");
        }
        assert!(cpp.output().contains("int main() {"), "{name}");
    }

    assert!(count > 0, "No sample programs found in tests/programs");
}

fn assert_success(src: &str) -> EventLog {
    let mut log = EventLog::new();
    if let Err(e) = translate("test.bas", src, &mut log) {
        panic!("Program failed: {e}\n{src}");
    }
    log
}

fn assert_failure(src: &str) -> CompileError {
    let mut log = EventLog::new();
    match translate("test.bas", src, &mut log) {
        Ok(()) => panic!("Program succeeded but was expected to fail:\n{src}"),
        Err(diagnostic) => diagnostic.error,
    }
}

fn assert_semantic(src: &str) -> SemanticError {
    match assert_failure(src) {
        CompileError::Semantic(e) => e,
        CompileError::Parse(e) => panic!("Expected a semantic error, got: {e}"),
    }
}

fn assert_syntax(src: &str) -> ParseError {
    match assert_failure(src) {
        CompileError::Parse(e) => e,
        CompileError::Semantic(e) => panic!("Expected a syntax error, got: {e}"),
    }
}

fn lenient(src: &str) -> EventLog {
    let config = ParserConfig { strict_exits: false,
                                ..ParserConfig::default() };
    let mut log = EventLog::new();
    if let Err(e) = translate_with_config("test.bas", src, config, &mut log) {
        panic!("Program failed: {e}");
    }
    log
}

/// The value of the last assignment in the log.
fn last_assigned(log: &EventLog) -> ExprNode {
    log.events()
       .iter()
       .rev()
       .find_map(|e| match e {
           Event::Expression(node) => Some(node.clone()),
           _ => None,
       })
       .expect("no assignment was emitted")
}

fn printed(log: &EventLog) -> Vec<ExprNode> {
    log.events()
       .iter()
       .rev()
       .find_map(|e| match e {
           Event::Print(items) => Some(items.clone()),
           _ => None,
       })
       .expect("no PRINT was emitted")
}

#[test]
fn mixed_arithmetic_promotes_and_casts_the_narrow_operand() {
    let log = assert_success("DIM a AS integer, b AS single\na = 2\nb = a + 1\n");
    let sum = last_assigned(&log);
    assert_eq!(sum.datatype, "single");
    assert_eq!(sum.cast, None);
    let left = sum.left().unwrap();
    assert_eq!(left.kind, ExprKind::Identifier("a".into()));
    assert_eq!(left.cast.as_deref(), Some("single"));
    assert_eq!(sum.effective_type(), "single");

    let log = assert_success("DIM a AS integer, b AS single\na = 2\nb = a + b\n");
    let sum = last_assigned(&log);
    assert_eq!(sum.datatype, "single");
    assert_eq!(sum.left().unwrap().cast.as_deref(), Some("single"));
    assert_eq!(sum.right().unwrap().cast, None);
}

#[test]
fn literals_widen_only_towards_a_wider_target() {
    let log = assert_success("DIM d AS double = 1\nDIM b AS byte = 1\nDIM i AS integer\nPRINT i + 1\n");
    let initializers: Vec<_> = log.events()
                                  .iter()
                                  .filter_map(|e| match e {
                                      Event::Declaration { initializer: Some(value),
                                                           .. } => Some(value.datatype.clone()),
                                      _ => None,
                                  })
                                  .collect();
    assert_eq!(initializers, ["double", "integer"]);

    let sum = &printed(&log)[0];
    assert_eq!(sum.datatype, "integer");
    assert_eq!(sum.left().unwrap().cast, None);
    assert_eq!(sum.right().unwrap().cast, None);
}

#[test]
fn comparing_a_value_with_itself_needs_no_cast() {
    let log = assert_success("DIM a AS integer\na = 3\nIF a = a THEN\n    PRINT a\nEND IF\n");
    let condition = log.events()
                       .iter()
                       .find_map(|e| match e {
                           Event::If(c, _) => Some(c.clone()),
                           _ => None,
                       })
                       .unwrap();
    assert_eq!(condition.datatype, "boolean");
    assert_eq!(condition.left().unwrap().cast, None);
    assert_eq!(condition.right().unwrap().cast, None);
}

#[test]
fn mixed_numeric_comparisons_are_accepted_and_mixed_families_are_not() {
    assert_success("DIM a AS byte, d AS double\nIF a < d THEN PRINT a\n");
    let e = assert_semantic("DIM s AS string, n AS integer\nIF s = n THEN PRINT s\n");
    assert!(matches!(&e, SemanticError::IncomparableOperands { left, right, .. }
                         if left == "string" && right == "integer"));
    assert_eq!(e.to_string(), "cannot compare string with integer");
    assert!(matches!(assert_semantic("DIM b AS boolean\nPRINT b = 1\n"),
                     SemanticError::IncomparableOperands { .. }));
}

#[test]
fn assigned_variable_reads_back_as_an_uncast_leaf() {
    let log = assert_success("DIM x AS integer\nx = 5\nx = x\n");
    let value = last_assigned(&log);
    assert_eq!(value.kind, ExprKind::Identifier("x".into()));
    assert_eq!(value.datatype, "integer");
    assert_eq!(value.cast, None);
}

#[test]
fn redeclaration_in_the_same_scope_fails() {
    match assert_semantic("DIM a AS integer\nDIM a AS string\n") {
        SemanticError::Redeclaration { name, pos } => {
            assert_eq!(name, "a");
            assert_eq!((pos.line, pos.column), (2, 5));
        },
        e => panic!("Unexpected error: {e}"),
    }
    assert_semantic("DIM a AS integer, a AS integer\n");
    assert_semantic("SUB Twice(a AS integer, a AS integer)\nEND SUB\n");
}

#[test]
fn nested_blocks_may_shadow() {
    assert_success("DIM a AS integer\nIF TRUE THEN\n    DIM a AS string\n    a = \"inner\"\nEND IF\na = 1\n");
    assert_success("DIM n AS integer\nSUB Show(n AS string)\n    PRINT n\nEND SUB\n");
    assert_success("FOR i = 1 TO 2\n    DIM t AS integer\nNEXT\nFOR i = 1 TO 2\n    DIM t AS string\nNEXT\n");
}

#[test]
fn names_leave_scope_with_their_block() {
    let e = assert_semantic("IF TRUE THEN\n    DIM inner AS integer\nEND IF\ninner = 1\n");
    assert!(matches!(e, SemanticError::UnknownIdentifier { name, .. } if name == "inner"));
    assert_semantic("FOR i = 1 TO 3\nNEXT\nPRINT i\n");
}

#[test]
fn unknown_identifier_is_reported_with_its_position() {
    let mut log = EventLog::new();
    let diagnostic = translate("calc.bas", "DIM a AS integer\na = b + 1\n", &mut log).unwrap_err();
    assert_eq!(diagnostic.to_string(), "calc.bas:2:5: error: unknown identifier 'b'");
    assert_eq!(log.count("assignment"), 0);
}

#[test]
fn columns_count_characters() {
    let mut log = EventLog::new();
    let diagnostic = translate("wide.bas", "PRINT \"éé\", y\n", &mut log).unwrap_err();
    assert_eq!(diagnostic.to_string(), "wide.bas:1:13: error: unknown identifier 'y'");
}

#[test]
fn unreadable_source_reports_a_zero_position() {
    let diagnostic = read_source(Path::new("tests/programs/missing.bas")).unwrap_err();
    assert!(matches!(diagnostic.error, CompileError::Parse(ParseError::UnreadableSource { .. })));
    assert!(diagnostic.to_string()
                      .starts_with("tests/programs/missing.bas:0:0: error: cannot read source file"));
}

#[test]
fn identifiers_are_case_sensitive_but_keywords_and_types_are_not() {
    assert_success("dim Total as INTEGER\nTotal = 1\nPrint Total\n");
    assert!(matches!(assert_semantic("DIM Total AS integer\ntotal = 1\n"),
                     SemanticError::UnknownIdentifier { .. }));
}

#[test]
fn block_if_opens_a_single_code_block() {
    let log = assert_success("DIM x AS integer\nIF x > 1 THEN\n    PRINT 1\nELSEIF x < 0 THEN\n    PRINT 2\nELSE\n    PRINT 3\nEND IF\n");
    assert_eq!(log.names(),
               ["module_header",
                "declaration",
                "end_of_statement",
                "if",
                "begin_block",
                "print",
                "end_of_statement",
                "else_if",
                "print",
                "end_of_statement",
                "else",
                "print",
                "end_of_statement",
                "end_block",
                "module_footer"]);
}

#[test]
fn block_if_without_else_has_no_branch_events() {
    let log = assert_success("IF 1 = 1 THEN\n    PRINT 1\nEND IF\n");
    assert_eq!(log.count("if"), 1);
    assert_eq!(log.count("begin_block"), 1);
    assert_eq!(log.count("end_block"), 1);
    assert_eq!(log.count("else_if"), 0);
    assert_eq!(log.count("else"), 0);
}

#[test]
fn single_line_if_takes_one_statement_per_branch() {
    let log = assert_success("DIM x AS integer\nIF x THEN x = 1 ELSE PRINT x\nPRINT 2\n");
    assert_eq!(log.count("begin_block"), 1);
    assert_eq!(log.count("else"), 1);
    assert_eq!(log.count("print"), 2);

    assert!(log.events()
               .iter()
               .any(|e| matches!(e, Event::If(_, BranchForm::SingleLine))));
    assert_success("IF TRUE THEN DIM y AS integer = 1\nPRINT y\n");

    assert_syntax("IF TRUE THEN\nPRINT 1\n");
    assert_syntax("IF TRUE THEN PRINT 1 ELSEIF FALSE THEN PRINT 2\n");
}

#[test]
fn conditions_must_be_boolean_or_numeric() {
    assert_success("DIM n AS long = 2\nWHILE n\n    n = n - 1\nWEND\n");
    let e = assert_semantic("IF \"yes\" THEN PRINT 1\n");
    assert!(matches!(e, SemanticError::TypeMismatch { expected, .. } if expected == "boolean"));
}

#[test]
fn arity_mismatch_fails_before_the_call_is_emitted() {
    let mut log = EventLog::new();
    let src = "SUB Pair(a AS integer, b AS integer)\nEND SUB\nPair(1)\n";
    let diagnostic = translate("test.bas", src, &mut log).unwrap_err();
    assert!(matches!(diagnostic.error,
                     CompileError::Semantic(SemanticError::ArityMismatch { expected: 2,
                                                                           found: 1,
                                                                           .. })));
    assert_eq!(log.count("function"), 1);
    assert_eq!(log.count("call"), 0);
}

#[test]
fn argument_types_must_match_by_position() {
    let src = "FUNCTION F(a AS integer, s AS string) AS integer\n    RETURN a\nEND FUNCTION\nPRINT F(1, 2)\n";
    match assert_semantic(src) {
        SemanticError::ArgumentTypeMismatch { name,
                                              position,
                                              expected,
                                              found,
                                              .. } => {
            assert_eq!(name, "F");
            assert_eq!(position, 2);
            assert_eq!(expected, "string");
            assert_eq!(found, "integer");
        },
        e => panic!("Unexpected error: {e}"),
    }
    let src = "SUB Scale(by AS double)\nEND SUB\nDIM i AS integer\nScale(i)\n";
    assert!(matches!(assert_semantic(src), SemanticError::ArgumentTypeMismatch { .. }));
    assert_success("SUB Scale(by AS double)\nEND SUB\nScale(2)\nScale(0.5)\n");
}

#[test]
fn routines_without_a_return_type_are_not_values() {
    let e = assert_semantic("SUB Hello\n    PRINT \"hi\"\nEND SUB\nDIM x AS integer = Hello\n");
    assert!(matches!(e, SemanticError::NoReturnValue { .. }));
    assert!(matches!(assert_semantic("DIM x AS integer\nx(1)\n"),
                     SemanticError::NotCallable { .. }));
    assert!(matches!(assert_semantic("SUB Hello\nEND SUB\nHello = 1\n"),
                     SemanticError::NotAVariable { .. }));
}

#[test]
fn routines_may_call_themselves_and_nest() {
    let log = assert_success("FUNCTION Fib(n AS integer) AS integer\n    IF n < 2 THEN RETURN n\n    RETURN Fib(n - 1) + Fib(n - 2)\nEND FUNCTION\nSUB Outer\n    SUB Inner\n    END SUB\n    Inner\nEND SUB\nOuter\n");
    assert_eq!(log.count("function"), 3);
    assert_eq!(log.count("end_function"), 3);
    assert!(matches!(assert_semantic("SUB Outer\n    SUB Inner\n    END SUB\nEND SUB\nInner\n"),
                     SemanticError::UnknownIdentifier { .. }));
}

#[test]
fn routine_signature_is_emitted_before_its_body() {
    let log = assert_success("FUNCTION Half(x AS double) AS double\n    RETURN x / 2\nEND FUNCTION\n");
    assert_eq!(log.names(),
               ["module_header",
                "function",
                "begin_block",
                "return",
                "end_of_statement",
                "end_block",
                "end_function",
                "module_footer"]);
    match &log.events()[1] {
        Event::Function { signature,
                          parameters, } => {
            assert_eq!(signature.identifier, "Half");
            assert_eq!(signature.datatype, "double");
            assert_eq!(parameters.len(), 1);
            assert_eq!(parameters[0].datatype, "double");
        },
        e => panic!("Unexpected event: {e}"),
    }
}

#[test]
fn return_must_suit_its_routine() {
    assert!(matches!(assert_semantic("RETURN\n"), SemanticError::MisplacedExit { .. }));
    assert!(matches!(assert_semantic("SUB S\n    RETURN 1\nEND SUB\n"),
                     SemanticError::ReturnValueMismatch { expects: false, .. }));
    assert!(matches!(assert_semantic("FUNCTION F AS integer\n    RETURN\nEND FUNCTION\n"),
                     SemanticError::ReturnValueMismatch { expects: true, .. }));
    assert!(matches!(assert_semantic("FUNCTION F AS integer\n    RETURN \"one\"\nEND FUNCTION\n"),
                     SemanticError::TypeMismatch { .. }));
    assert_success("FUNCTION F AS long\n    RETURN 1.5\nEND FUNCTION\nSUB S\n    RETURN\nEND SUB\n");
}

#[test]
fn select_case_emits_one_event_per_clause() {
    let log = assert_success("DIM n AS integer = 2\nSELECT CASE n\n    CASE 1\n        PRINT \"one\"\n    CASE 2, 3\n        PRINT \"two or three\"\n    CASE ELSE\n        PRINT \"many\"\nEND SELECT\n");
    assert_eq!(log.count("select"), 1);
    assert_eq!(log.count("case"), 2);
    assert_eq!(log.count("case_else"), 1);
    assert_eq!(log.count("end_select"), 1);
    assert_eq!(log.count("begin_block"), 3);
    assert_eq!(log.count("end_block"), 3);

    let sizes: Vec<_> = log.events()
                           .iter()
                           .filter_map(|e| match e {
                               Event::Case(items) => Some(items.len()),
                               _ => None,
                           })
                           .collect();
    assert_eq!(sizes, [1, 2]);
}

#[test]
fn case_items_support_ranges_and_comparisons() {
    let log = assert_success("DIM n AS integer\nSELECT CASE n\n    CASE IS < 0, 1 TO 9\n        PRINT n\nEND SELECT\n");
    let items = log.events()
                   .iter()
                   .find_map(|e| match e {
                       Event::Case(items) => Some(items.clone()),
                       _ => None,
                   })
                   .unwrap();
    assert!(matches!(&items[0], CaseExpression::Is { comparator: BinaryOperator::Less, .. }));
    assert!(matches!(&items[1], CaseExpression::Range { .. }));
    assert_eq!(items[1].to_string(), "1 TO 9");

    assert_syntax("DIM n AS integer\nSELECT CASE n\n    CASE IS + 1\nEND SELECT\n");
    assert!(matches!(assert_semantic("DIM n AS integer\nSELECT CASE n\n    CASE \"x\"\nEND SELECT\n"),
                     SemanticError::IncomparableOperands { .. }));
}

#[test]
fn case_after_case_else_fails() {
    let e = assert_syntax("SELECT CASE 1\n    CASE ELSE\n        PRINT 1\n    CASE 2\n        PRINT 2\nEND SELECT\n");
    assert!(matches!(e, ParseError::UnexpectedToken { expected, .. } if expected.contains("END SELECT")));
}

#[test]
fn empty_select_and_empty_clauses_are_accepted() {
    let log = assert_success("SELECT CASE 1\nEND SELECT\nSELECT CASE 2\n    CASE 2\nEND SELECT\n");
    assert_eq!(log.count("select"), 2);
    assert_eq!(log.count("case"), 1);
}

#[test]
fn exit_requires_a_matching_construct() {
    let e = assert_semantic("EXIT FOR\n");
    assert_eq!(e.to_string(), "EXIT FOR is not inside a matching construct");
    assert_semantic("WHILE TRUE\n    EXIT FOR\nWEND\n");
    assert_semantic("FOR i = 1 TO 2\n    SUB Inner\n        EXIT FOR\n    END SUB\nNEXT\n");
    assert_semantic("SUB S\n    EXIT FUNCTION\nEND SUB\n");
    assert_semantic("CONTINUE DO\n");

    let log = assert_success("FOR i = 1 TO 3\n    WHILE TRUE\n        EXIT FOR\n    WEND\nNEXT\nFUNCTION F AS integer\n    EXIT FUNCTION\nEND FUNCTION\n");
    assert_eq!(log.count("exit"), 2);
}

#[test]
fn lenient_exits_are_dropped_without_events() {
    let log = lenient("EXIT DO\nCONTINUE FOR\nRETURN\nPRINT 1\n");
    assert_eq!(log.count("exit"), 0);
    assert_eq!(log.count("continue"), 0);
    assert_eq!(log.count("return"), 0);
    assert_eq!(log.count("print"), 1);
}

#[test]
fn for_declares_its_counter_only_when_needed() {
    let log = assert_success("FOR i = 1 TO 10 STEP 2\nNEXT i\nDIM j AS long\nFOR j = 1 TO 3\nNEXT\n");
    let declares: Vec<_> = log.events()
                              .iter()
                              .filter_map(|e| match e {
                                  Event::For { counter,
                                               declares_counter,
                                               step,
                                               .. } => Some((counter.datatype.clone(),
                                                             *declares_counter,
                                                             step.is_some())),
                                  _ => None,
                              })
                              .collect();
    assert_eq!(declares,
               [("integer".to_string(), true, true), ("long".to_string(), false, false)]);
}

#[test]
fn for_rejects_bad_counters_and_mismatched_next() {
    assert!(matches!(assert_syntax("FOR i = 1 TO 2\nNEXT j\n"),
                     ParseError::MismatchedNext { .. }));
    assert!(matches!(assert_semantic("DIM s AS string\nFOR s = 1 TO 2\nNEXT\n"),
                     SemanticError::TypeMismatch { .. }));
    assert!(matches!(assert_semantic("FOR i = \"a\" TO 2\nNEXT\n"),
                     SemanticError::TypeMismatch { .. }));
    assert!(matches!(assert_semantic("SUB S\nEND SUB\nFOR S = 1 TO 2\nNEXT\n"),
                     SemanticError::NotAVariable { .. }));
}

#[test]
fn for_gives_an_untyped_counter_its_start_type() {
    let log = assert_success("DIM i\nFOR i = 1 TO 3\nNEXT\nPRINT i\n");
    let counter = log.events()
                     .iter()
                     .find_map(|e| match e {
                         Event::For { counter,
                                      declares_counter, .. } => {
                             Some((counter.datatype.clone(), *declares_counter))
                         },
                         _ => None,
                     })
                     .unwrap();
    assert_eq!(counter, ("integer".to_string(), false));
    assert_eq!(printed(&log)[0].datatype, "integer");

    assert!(matches!(assert_semantic("DIM i\nFOR i = 1 TO 3\nNEXT\ni = \"text\"\n"),
                     SemanticError::TypeMismatch { .. }));
}

#[test]
fn do_loops_take_a_condition_at_one_end() {
    let log = assert_success("DIM x AS integer\nDO WHILE x < 3\n    x = x + 1\nLOOP\nDO\n    x = x - 1\nLOOP UNTIL x = 0\n");
    let conditions: Vec<_> = log.events()
                                .iter()
                                .filter_map(|e| match e {
                                    Event::Do(c) | Event::Loop(c) => {
                                        Some((e.name(), c.as_ref().map(|c| c.kind)))
                                    },
                                    _ => None,
                                })
                                .collect();
    assert_eq!(conditions,
               [("do", Some(ConditionKind::While)),
                ("loop", None),
                ("do", None),
                ("loop", Some(ConditionKind::Until))]);

    let names = log.names();
    let last_block = names.iter().rposition(|n| *n == "end_block").unwrap();
    assert_eq!(names[last_block + 1], "loop");

    assert_syntax("DO WHILE TRUE\nLOOP UNTIL FALSE\n");
}

#[test]
fn continue_reaches_outer_loops() {
    let log = assert_success("DO\n    FOR i = 1 TO 2\n        CONTINUE DO\n    NEXT\nLOOP UNTIL TRUE\n");
    assert_eq!(log.count("continue"), 1);
}

#[test]
fn suffixes_declare_types() {
    let log = assert_success("DIM a%, b&, c!, d#, e$\n");
    let types: Vec<_> = log.events()
                           .iter()
                           .filter_map(|e| match e {
                               Event::Declaration { variable, .. } => {
                                   Some(variable.datatype.clone())
                               },
                               _ => None,
                           })
                           .collect();
    assert_eq!(types, ["integer", "long", "single", "double", "string"]);
}

#[test]
fn untyped_variables_take_the_type_of_their_first_value() {
    let log = assert_success("DIM v\nv = \"text\"\nv = \"more\"\n");
    match &log.events()[1] {
        Event::Declaration { variable, .. } => assert!(variable.datatype.is_empty()),
        e => panic!("Unexpected event: {e}"),
    }
    assert_eq!(last_assigned(&log).datatype, "string");

    let log = assert_success("DIM w = 2.5\n");
    match &log.events()[1] {
        Event::Declaration { variable, .. } => assert_eq!(variable.datatype, "single"),
        e => panic!("Unexpected event: {e}"),
    }

    assert!(matches!(assert_semantic("DIM v\nv = \"text\"\nv = 1\n"),
                     SemanticError::TypeMismatch { .. }));
    assert!(matches!(assert_semantic("DIM v\nPRINT v\n"), SemanticError::UnresolvedType { .. }));
    assert!(matches!(assert_semantic("DIM v = v\n"), SemanticError::UnknownIdentifier { .. }));
}

#[test]
fn operators_check_their_operand_types() {
    assert!(matches!(assert_semantic("DIM s AS string\nPRINT s * 2\n"),
                     SemanticError::NonNumericOperand { .. }));
    assert!(matches!(assert_semantic("PRINT 1 AND TRUE\n"),
                     SemanticError::NonBooleanOperand { .. }));
    assert!(matches!(assert_semantic("PRINT -\"a\"\n"), SemanticError::NonNumericOperand { .. }));
    assert!(matches!(assert_semantic("PRINT NOT 1\n"), SemanticError::NonBooleanOperand { .. }));
    assert!(matches!(assert_semantic("DIM n AS integer = \"7\"\n"),
                     SemanticError::TypeMismatch { .. }));
}

#[test]
fn precedence_follows_the_configured_levels() {
    let log = assert_success("PRINT 1 + 2 * 3, (1 + 2) * 3, 7 - 2 - 1\n");
    let items = printed(&log);
    assert_eq!(items[0].to_string(), "(1 + (2 * 3))");
    assert_eq!(items[1].to_string(), "((1 + 2) * 3)");
    assert_eq!(items[2].to_string(), "((7 - 2) - 1)");

    let log = assert_success("DIM a AS integer, b AS integer\nPRINT NOT a = b AND TRUE\n");
    let item = &printed(&log)[0];
    let ExprKind::Binary { op: BinaryOperator::And,
                           left,
                           .. } = &item.kind
    else {
        panic!("Expected AND at the root, got {item}");
    };
    assert!(matches!(left.kind, ExprKind::Unary { op: UnaryOperator::Not, .. }));
}

#[test]
fn string_literals_unescape_doubled_quotes() {
    let log = assert_success("PRINT \"say \"\"hi\"\"\"\n");
    assert_eq!(printed(&log)[0].kind, ExprKind::Str("say \"hi\"".into()));
}

#[test]
fn print_accepts_separators_and_no_items() {
    let log = assert_success("PRINT\nPRINT 1; 2, 3;\n");
    assert_eq!(printed(&log).len(), 3);
    assert_eq!(log.count("print"), 2);
}

#[test]
fn unknown_types_and_bad_input_are_rejected() {
    assert!(matches!(assert_semantic("DIM x AS variant\n"), SemanticError::UnknownType { .. }));
    assert!(matches!(assert_syntax("DIM x @\n"), ParseError::InvalidToken { .. }));
    assert!(matches!(assert_syntax("PRINT 99999999999999999999\n"),
                     ParseError::IntegerOutOfRange { text, .. } if text == "99999999999999999999"));
    assert!(matches!(assert_syntax("DIM x AS integer PRINT x\n"),
                     ParseError::UnexpectedToken { .. }));
    assert!(matches!(assert_syntax("WHILE TRUE\n"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(assert_syntax("END\n"), ParseError::UnexpectedToken { .. }));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let log = assert_success("' header\n\n\nDIM x AS integer ' trailing\n\n");
    assert_eq!(log.count("declaration"), 1);
}

#[test]
fn precedence_table_can_be_replaced() {
    use transbasic::frontend::{
        config::{PrecedenceLevel, PrecedenceTable, Resolution},
        lexer::Token,
    };

    let levels = PrecedenceTable::default().levels().to_vec();
    let reordered = vec![levels[0].clone(),
                         levels[1].clone(),
                         levels[2].clone(),
                         PrecedenceLevel::new(Resolution::Arithmetic,
                                              &[(Token::Star, BinaryOperator::Mul)]),
                         PrecedenceLevel::new(Resolution::Arithmetic,
                                              &[(Token::Plus, BinaryOperator::Add)]),];
    let config = ParserConfig { precedence: PrecedenceTable::new(reordered),
                                ..ParserConfig::default() };
    let mut log = EventLog::new();
    translate_with_config("test.bas", "PRINT 1 + 2 * 3\n", config, &mut log).unwrap();
    assert_eq!(printed(&log)[0].to_string(), "((1 + 2) * 3)");
}
