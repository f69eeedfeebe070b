use transbasic::{
    codegen::{cpp::CppGenerator, events::EventLog},
    translate, translate_to_cpp,
};

fn cpp(src: &str) -> String {
    translate_to_cpp("test.bas", src).unwrap_or_else(|e| panic!("Program failed: {e}\n{src}"))
}

fn assert_contains(out: &str, expected: &str) {
    assert!(out.contains(expected), "expected {expected:?} in:\n{out}");
}

#[test]
fn event_log_prints_one_line_per_event() {
    let mut log = EventLog::new();
    translate("test.bas", "DIM x AS integer = 1\nx = x * 2\n", &mut log).unwrap();
    assert_eq!(log.to_string(),
               "module_header\n\
                declaration x: integer = 1\n\
                end_of_statement\n\
                assignment x\n\
                expression (x * 2)\n\
                end_of_statement\n\
                module_footer\n");
}

#[test]
fn loop_headers_carry_their_conditions() {
    let mut log = EventLog::new();
    let src = "FOR i = 1 TO 9 STEP 2\nNEXT\nDO WHILE FALSE\nLOOP\nDO\nLOOP UNTIL TRUE\n";
    translate("test.bas", src, &mut log).unwrap();
    let out = log.to_string();
    assert_contains(&out, "for i: integer (new) = 1 to 9 step 2\n");
    assert_contains(&out, "do while FALSE\n");
    assert_contains(&out, "loop until TRUE\n");
}

#[test]
fn translation_unit_has_includes_and_main() {
    let out = cpp("PRINT \"hi\"\n");
    assert!(out.starts_with("#include <cmath>\n#include <cstdint>\n#include <iostream>\n#include <string>\n"));
    assert_contains(&out, "int main() {\n    std::cout << std::boolalpha;\n");
    assert_contains(&out, "    std::cout << std::string(\"hi\") << '\\n';\n");
    assert!(out.ends_with("    return 0;\n}\n"));
}

#[test]
fn file_level_variables_become_globals() {
    let out = cpp("DIM total AS integer = 0\nFOR i = 1 TO 3\n    total = total + i\nNEXT\nPRINT total\n");
    assert_contains(&out, "int32_t total{};\n");
    assert_contains(&out, "    total = 0;\n");
    assert_contains(&out,
                    "    for (int32_t i = 1; i <= 3; ++i) {\n        total = (total + i);\n    }\n");
    assert_contains(&out, "    std::cout << total << '\\n';\n");
}

#[test]
fn block_locals_are_declared_in_place() {
    let out = cpp("IF TRUE THEN\n    DIM s AS string = \"x\"\n    DIM n AS long\nEND IF\n");
    assert_contains(&out, "    if (true) {\n");
    assert_contains(&out, "        std::string s = std::string(\"x\");\n");
    assert_contains(&out, "        int64_t n{};\n");
}

#[test]
fn casts_and_literal_types_are_rendered() {
    let out = cpp("DIM a AS integer = 2\nDIM b AS single\nb = a + 1\nDIM big AS long = 3000000000\n");
    assert_contains(&out, "    b = (static_cast<float>(a) + 1);\n");
    assert_contains(&out, "    big = 3000000000LL;\n");

    let out = cpp("DIM r AS double\nr = 7.5 MOD 2\n");
    assert_contains(&out, "    r = std::fmod(7.5, 2);\n");
}

#[test]
fn routines_are_hoisted_above_main() {
    let out = cpp("FUNCTION Twice(x AS integer) AS integer\n    RETURN x * 2\nEND FUNCTION\nSUB Hello\n    PRINT \"hello\"\nEND SUB\nHello\nPRINT Twice(4)\n");
    assert_contains(&out, "int32_t Twice(int32_t x) {\n    return (x * 2);\n}\n");
    assert_contains(&out, "void Hello() {\n");
    assert_contains(&out, "    Hello();\n");
    assert_contains(&out, "    std::cout << Twice(4) << '\\n';\n");
    let routine = out.find("int32_t Twice").unwrap();
    let main = out.find("int main()").unwrap();
    assert!(routine < main);
}

#[test]
fn nested_routines_are_emitted_before_their_parent() {
    let out = cpp("SUB Outer\n    SUB Inner\n        PRINT 1\n    END SUB\n    Inner\nEND SUB\nOuter\n");
    let inner = out.find("void Inner()").unwrap();
    let outer = out.find("void Outer()").unwrap();
    assert!(inner < outer);
}

#[test]
fn select_becomes_an_if_chain_over_a_temporary() {
    let out = cpp("DIM n AS integer = 2\nSELECT CASE n\n    CASE 1, 2\n        PRINT \"low\"\n    CASE 3 TO 5\n        PRINT \"mid\"\n    CASE IS > 5\n        PRINT \"high\"\n    CASE ELSE\n        PRINT \"negative\"\nEND SELECT\n");
    assert_contains(&out, "const auto select_1 = n;\n");
    assert_contains(&out, "if (select_1 == 1 || select_1 == 2) {\n");
    assert_contains(&out, "else if ((select_1 >= 3 && select_1 <= 5)) {\n");
    assert_contains(&out, "else if (select_1 > 5) {\n");
    assert_contains(&out, "else {\n");
}

#[test]
fn exit_breaks_the_innermost_loop_and_jumps_out_of_others() {
    let out = cpp("WHILE TRUE\n    EXIT WHILE\nWEND\n");
    assert_contains(&out, "        break;\n");

    let out = cpp("FOR i = 1 TO 3\n    WHILE TRUE\n        EXIT FOR\n    WEND\nNEXT\n");
    assert_contains(&out, "goto exit_1;\n");
    assert_contains(&out, "    }\n    exit_1:;\n");

    let out = cpp("SELECT CASE 1\n    CASE 1\n        EXIT SELECT\nEND SELECT\n");
    assert_contains(&out, "goto exit_1;\n");
    assert_contains(&out, "exit_1:;\n");
}

#[test]
fn exit_routine_returns() {
    let out = cpp("SUB S\n    EXIT SUB\nEND SUB\nFUNCTION F AS integer\n    EXIT FUNCTION\nEND FUNCTION\n");
    assert_contains(&out, "void S() {\n    return;\n}\n");
    assert_contains(&out, "int32_t F() {\n    return {};\n}\n");
}

#[test]
fn continue_of_an_outer_loop_jumps_to_its_label() {
    let out = cpp("DO\n    FOR i = 1 TO 2\n        CONTINUE DO\n    NEXT\nLOOP UNTIL TRUE\n");
    assert_contains(&out, "goto continue_1;\n");
    assert_contains(&out, "continue_1:;\n");
    assert_contains(&out, "} while (!true);\n");

    let out = cpp("FOR i = 1 TO 2\n    CONTINUE FOR\nNEXT\n");
    assert_contains(&out, "        continue;\n");
}

#[test]
fn do_loops_test_where_the_condition_is_written() {
    let out = cpp("DIM x AS integer\nDO WHILE x < 3\n    x = x + 1\nLOOP\nDO\n    x = x - 1\nLOOP UNTIL x <= 0\nDO\n    EXIT DO\nLOOP\n");
    assert_contains(&out, "    while ((x < 3)) {\n");
    assert_contains(&out, "    do {\n");
    assert_contains(&out, "    } while (!(x <= 0));\n");
    assert_contains(&out, "    } while (true);\n");
}

#[test]
fn untyped_variables_are_declared_with_their_inferred_type() {
    let out = cpp("DIM v\nv = 2.5\nDIM unused\n");
    assert_contains(&out, "float v{};\n");
    assert_contains(&out, "    v = 2.5f;\n");
    assert!(!out.contains("unused"));
    assert!(!out.contains("@declare"));

    let out = cpp("IF TRUE THEN\n    DIM t\n    t = \"text\"\nEND IF\n");
    assert_contains(&out, "        std::string t{};\n        t = std::string(\"text\");\n");
}

#[test]
fn generator_output_is_empty_until_the_module_ends() {
    let mut generator = CppGenerator::new();
    assert!(generator.output().is_empty());
    let _ = translate("test.bas", "PRINT 1\nPRINT x\n", &mut generator);
    assert!(generator.output().is_empty());
}

#[test]
fn single_line_if_declarations_stay_visible_after_the_if() {
    let out = cpp("IF TRUE THEN DIM y AS integer = 1\nPRINT y\n");
    assert_contains(&out, "int32_t y{};\n");
    assert_contains(&out,
                    "    if (true) {\n        y = 1;\n    }\n    std::cout << y << '\\n';\n");

    let out = cpp("SUB S\n    IF TRUE THEN DIM y AS integer = 1\n    PRINT y\nEND SUB\n");
    assert_contains(&out,
                    "void S() {\n    int32_t y{};\n    if (true) {\n        y = 1;\n    }\n    std::cout << y << '\\n';\n}\n");

    let out = cpp("IF TRUE THEN\n    IF FALSE THEN DIM z AS string ELSE PRINT 1\n    z = \"set\"\nEND IF\n");
    assert_contains(&out,
                    "    if (true) {\n        std::string z{};\n        if (false) {\n        } else {\n");
    assert_contains(&out, "        z = std::string(\"set\");\n");
}

#[test]
fn for_over_an_untyped_variable_declares_it() {
    let out = cpp("DIM i\nFOR i = 1 TO 3\nNEXT\nPRINT i\n");
    assert_contains(&out, "int32_t i{};\n");
    assert_contains(&out, "    for (i = 1; i <= 3; ++i) {\n    }\n");
    assert!(!out.contains("@declare"));
}
