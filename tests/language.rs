use std::io::Cursor;

use swiftlet::{run_source, Environment, Interpreter, LanguageError};

/// Runs a program with no input and returns everything it printed.
fn run(source: &str) -> Result<String, LanguageError> {
    run_with_input(source, "")
}

/// Runs a program feeding `input` to `read()` and returns what it printed.
fn run_with_input(source: &str, input: &str) -> Result<String, LanguageError> {
    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(Cursor::new(input.to_string()), Vec::new());
    run_source(source, &mut env, &mut interpreter)?;

    Ok(String::from_utf8(interpreter.into_output()).expect("programs print valid utf-8"))
}

fn assert_prints(source: &str, expected: &str) {
    match run(source) {
        Ok(output) => assert_eq!(output, expected, "program: {source}"),
        Err(error) => panic!("program failed with '{error}': {source}"),
    }
}

fn assert_fails(source: &str, rendered: &str) {
    match run(source) {
        Ok(output) => panic!("program succeeded printing {output:?}: {source}"),
        Err(error) => assert_eq!(error.to_string(), rendered, "program: {source}"),
    }
}

#[test]
fn literals_round_trip_through_printing() {
    assert_prints("println(42)", "42\n");
    assert_prints("println(1.25)", "1.25\n");
    assert_prints("println(2.0)", "2.0\n");
    assert_prints("println('x')", "x\n");
    assert_prints("println(\"hi\")", "hi\n");
    assert_prints("println(true)", "true\n");
    assert_prints("println(false)", "false\n");
}

#[test]
fn print_omits_the_newline() {
    assert_prints("print(\"a\") print(\"b\")", "ab");
    assert_prints("print(1); print(2);", "12");
}

#[test]
fn numeric_literal_decoding_is_best_effort() {
    // Text the 32-bit representation cannot hold decodes to zero instead
    // of failing the scan.
    assert_prints("println(99999999999999999)", "0\n");
}

#[test]
fn comments_nest_and_vanish() {
    assert_prints("println(1) /* a /* nested */ b */ println(2)", "1\n2\n");
    assert_prints("/* leading */ println(3)", "3\n");
}

#[test]
fn lexical_errors_abort_the_scan() {
    assert_fails("var x: Int = 1 & 2", "01: Invalid lexeme [&]");
    assert_fails("var x: Int = 1 | 2", "01: Invalid lexeme [|]");
    assert_fails("/* never closed", "01: Unexpected end of file");
    assert_fails("println(\"never closed", "01: Unexpected end of file");
    assert_fails("var c: Char = ''", "01: Invalid lexeme ['']");
    assert_fails("var c: Char = 'ab'", "01: Invalid lexeme ['ab]");
}

#[test]
fn arithmetic_follows_the_operand_type() {
    assert_prints("println(3 / 2)", "1\n");
    assert_prints("println(0 - 7 / 2)", "-3\n");
    assert_prints("println(3.0 / 2.0)", "1.5\n");
    assert_prints("println(2 + 3 * 4)", "14\n");
    assert_prints("println((2 + 3) * 4)", "20\n");
    assert_prints("println(-3)", "-3\n");
    assert_prints("println(-1.5)", "-1.5\n");
}

#[test]
fn integer_division_by_zero_is_rejected() {
    assert_fails("println(1 / 0)", "01: Invalid operation");
    // Float division by zero keeps its IEEE reading.
    assert_prints("println(1.0 / 0.0)", "inf\n");
}

#[test]
fn addition_concatenates_and_merges() {
    assert_prints("println(\"foo\" + \"bar\")", "foobar\n");
    assert_prints("println('!' + '!')", "B\n");

    assert_prints(
        "var a: Array<Int> = Array<Int>(1, 2) + Array<Int>(3)\nprintln(a)",
        "[1, 2, 3]\n",
    );

    // The right operand wins a key collision.
    assert_prints(
        "var d: Dict<Int,Int> = Dict<Int,Int>(1: 1) + Dict<Int,Int>(1: 2)\nprintln(d[1])\nprintln(d.count())",
        "2\n1\n",
    );
}

#[test]
fn mixed_operand_types_do_not_widen() {
    assert_fails("println(1 + 1.5)", "01: Invalid type [Float]");
    assert_fails("println(true + false)", "01: Invalid operation");
    assert_fails(
        "println(Array<Int>(1) + Array<Float>(1.0))",
        "01: Invalid type [Array<Float>]",
    );
}

#[test]
fn relational_operators_yield_bool() {
    assert_prints("println(2 < 3)", "true\n");
    assert_prints("println(2.5 >= 2.5)", "true\n");
    assert_prints("println('a' < 'b')", "true\n");
    assert_prints("println(2 == 3)", "false\n");
    assert_prints("println(2 != 3)", "true\n");
}

#[test]
fn string_comparison_uses_lengths() {
    // Lexicographically "abc" < "zz" would hold; by length it does not.
    assert_prints("println(\"abc\" < \"zz\")", "false\n");
    assert_prints("println(\"ab\" <= \"xy\")", "true\n");
    assert_prints("println(\"abc\" > \"zz\")", "true\n");
}

#[test]
fn equality_compares_container_contents() {
    assert_prints("println(Array<Int>(1, 2) == Array<Int>(1, 2))", "true\n");
    assert_prints("println(Array<Int>(1) == Array<Int>(2))", "false\n");
    assert_fails(
        "println(Array<Int>(1) == Array<Float>(1.0))",
        "01: Invalid type [Array<Float>]",
    );
}

#[test]
fn logical_operators_evaluate_both_operands() {
    assert_prints("println(true && false)", "false\n");
    assert_prints("println(false || true)", "true\n");
    // No short-circuit: the right operand runs even when the left already
    // decides the result.
    assert_fails("var t: Bool = false && 1 / 0 == 0", "01: Invalid operation");
    assert_fails("println(1 && true)", "01: Invalid operation");
}

#[test]
fn ternary_evaluates_one_branch_only() {
    assert_prints("println(true ? 1 : 1 / 0)", "1\n");
    assert_prints("println(false ? 1 / 0 : 2)", "2\n");
    assert_fails("println(1 ? 2 : 3)", "01: Invalid operation");
}

#[test]
fn unary_operators_gate_their_category() {
    assert_prints("println(!true)", "false\n");
    assert_fails("println(!1)", "01: Invalid type [Int]");
    assert_fails("println(-\"x\")", "01: Invalid type [String]");
}

#[test]
fn declarations_initialize_in_order() {
    assert_prints("var a: Int = 1, b: Int = a + 1; println(b)", "2\n");
    assert_prints("let c: Int = 5\nprintln(c)", "5\n");
}

#[test]
fn declaring_twice_in_one_scope_fails() {
    assert_fails("var x: Int; var x: Float", "01: Variable already declared [x]");
    assert_fails("var x: Int = 1, x: Int = 2", "01: Variable already declared [x]");
}

#[test]
fn inner_scopes_shadow_outer_ones() {
    assert_prints(
        "var x: Int = 1\n{\n    var x: Int = 2\n    println(x)\n}\nprintln(x)",
        "2\n1\n",
    );
}

#[test]
fn names_fall_out_of_scope_with_their_block() {
    assert_fails(
        "{\n    var inner: Int = 1\n}\nprintln(inner)",
        "04: Undeclared variable [inner]",
    );
}

#[test]
fn reading_an_uninitialized_variable_fails() {
    assert_fails("var x: Int println(x)", "01: Uninitialized variable [x]");
}

#[test]
fn constants_accept_exactly_one_write() {
    assert_fails("let x: Int = 1 x = 2", "01: Assignment to constant variable [x]");
}

#[test]
fn assignment_checks_the_declared_type() {
    assert_fails("var x: Int = 1 x = 1.5", "01: Invalid type [Float]");
    assert_fails("var x: Int = 1.5", "01: Invalid type [Float]");
}

#[test]
fn assignment_needs_a_settable_target() {
    assert_fails("1 = 2", "01: Unexpected lexeme [=]");
    assert_fails("1 + 2 = 3", "01: Unexpected lexeme [=]");
}

#[test]
fn undeclared_names_fail_while_parsing() {
    assert_fails("var x: Int = 1\nvar y: Int = 2\nz = 3", "03: Undeclared variable [z]");
}

#[test]
fn if_branches_on_a_bool_condition() {
    assert_prints("if 2 < 3 println(1) else println(2)", "1\n");
    assert_prints("if 3 < 2 println(1) else println(2)", "2\n");
    assert_prints("if 3 < 2 println(1)", "");
    assert_fails("if 1 println(1)", "01: Invalid type [Int]");
}

#[test]
fn while_loops_until_the_condition_drops() {
    assert_prints(
        "var i: Int = 3\nwhile i > 0 {\n    print(i)\n    i = i - 1\n}",
        "321",
    );
    assert_fails("while 1 println(1)", "01: Invalid type [Int]");
}

#[test]
fn for_iterates_strings_into_a_char_variable() {
    assert_prints("for var v: Char in \"ab\" { println(v) }", "a\nb\n");
    assert_fails("for var v: Int in \"ab\" println(v)", "01: Invalid type [Int]");
}

#[test]
fn for_iterates_arrays_in_order() {
    assert_prints("for var v: Int in Array<Int>(1, 2, 3) { println(v) }", "1\n2\n3\n");
    assert_prints("for let v: Int in Array<Int>(4, 5) println(v)", "4\n5\n");
    assert_fails(
        "for var v: Bool in Array<Int>(1) println(v)",
        "01: Invalid type [Int]",
    );
}

#[test]
fn for_rebinds_an_existing_variable() {
    assert_prints(
        "var total: Int = 0\nvar v: Int\nfor v in Array<Int>(1, 2, 3) total = total + v\nprintln(total)\nprintln(v)",
        "6\n3\n",
    );
}

#[test]
fn for_needs_an_iterable_source() {
    assert_fails("for var v: Int in 5 println(v)", "01: Invalid operation");
}

#[test]
fn casts_are_total_with_zero_defaults() {
    assert_prints("println(toInt(\"x\"))", "0\n");
    assert_prints("println(toInt(3.7))", "3\n");
    assert_prints("println(toInt('A'))", "65\n");
    assert_prints("println(toFloat(2))", "2.0\n");
    assert_prints("println(toFloat(\"x\"))", "0.0\n");
    assert_prints("println(toChar(65))", "A\n");
    assert_prints("println(toBool(0))", "false\n");
    assert_prints("println(toBool(2))", "true\n");
    assert_prints("println(toBool('0'))", "false\n");
    assert_prints("println(toBool(\"anything\"))", "false\n");
    assert_prints("println(toBool(Array<Int>(1)))", "true\n");
    assert_prints("println(toBool(Array<Int>()))", "false\n");
    assert_prints("println(toString(1.5))", "1.5\n");
    assert_prints("println(toString(Array<Int>(1, 2)))", "[1, 2]\n");
}

#[test]
fn indexing_reads_elements() {
    assert_prints("var s: String = \"abc\"\nprintln(s[1])", "b\n");
    assert_prints("var a: Array<Int> = Array<Int>(1, 2, 3)\nprintln(a[0])", "1\n");
    assert_prints(
        "var d: Dict<String,Int> = Dict<String,Int>(\"one\": 1)\nprintln(d[\"one\"])",
        "1\n",
    );
}

#[test]
fn indexing_checks_bounds_and_index_types() {
    assert_fails(
        "var a: Array<Int> = Array<Int>(1, 2, 3)\nprintln(a[5])",
        "02: Invalid operation",
    );
    assert_fails(
        "var a: Array<Int> = Array<Int>(1, 2, 3)\nprintln(a[true])",
        "02: Invalid type [Bool]",
    );
    assert_fails("var s: String = \"abc\"\nprintln(s[0 - 1])", "02: Invalid operation");
    assert_fails(
        "var d: Dict<Int,Int> = Dict<Int,Int>(1: 1)\nprintln(d[2])",
        "02: Invalid operation",
    );
    assert_fails(
        "var d: Dict<Int,Int> = Dict<Int,Int>(1: 1)\nprintln(d[\"x\"])",
        "02: Invalid type [String]",
    );
}

#[test]
fn index_writes_mutate_in_place() {
    assert_prints("var a: Array<Int> = Array<Int>(1, 2)\na[0] = 9\nprintln(a)", "[9, 2]\n");
    assert_prints(
        "var d: Dict<Int,Int> = Dict<Int,Int>()\nd[1] = 10\nd[1] = 20\nprintln(d[1])\nprintln(d.count())",
        "20\n1\n",
    );
    // Element writes go through the shared container, not the cell, so a
    // constant array accepts them.
    assert_prints("let a: Array<Int> = Array<Int>(1)\na[0] = 5\nprintln(a[0])", "5\n");
}

#[test]
fn string_writes_rebuild_through_the_base() {
    assert_prints("var s: String = \"cat\"\ns[0] = 'b'\nprintln(s)", "bat\n");
    assert_fails(
        "let s: String = \"ab\"\ns[0] = 'c'",
        "02: Assignment to constant variable [s]",
    );
    assert_fails("var s: String = \"ab\"\ns[0] = 1", "02: Invalid type [Int]");
}

#[test]
fn array_literals_gate_element_categories() {
    assert_fails("var a: Array<Int> = Array<Int>(1, 2.0)", "01: Invalid type [Float]");
    assert_fails(
        "var d: Dict<Int,Int> = Dict<Int,Int>(1: true)",
        "01: Invalid type [Bool]",
    );
}

#[test]
fn nested_arrays_index_level_by_level() {
    assert_prints(
        "var m: Array<Array<Int>> = Array<Array<Int>>(Array<Int>(1, 2), Array<Int>(3))\nprintln(m[1][0])\nprintln(m.count())",
        "3\n2\n",
    );
}

#[test]
fn collection_methods_inspect_and_grow() {
    assert_prints(
        "var a: Array<Int> = Array<Int>()\nprintln(a.empty())\na.append(1)\na.append(2)\nprintln(a.count())\nprintln(a.contains(2))\nprintln(a.contains(7))",
        "true\n2\ntrue\nfalse\n",
    );
    // append yields the array, so calls chain.
    assert_prints(
        "var a: Array<Int> = Array<Int>(1)\nprintln(a.append(2).count())\nprintln(a)",
        "2\n[1, 2]\n",
    );
    assert_prints("println(\"hello\".count())", "5\n");
    assert_prints("println(\"\".empty())", "true\n");
}

#[test]
fn dict_methods_expose_keys_and_values() {
    assert_prints(
        "var d: Dict<String,Int> = Dict<String,Int>(\"one\": 1)\nprintln(d.keys())\nprintln(d.values())\nprintln(d.count())\nprintln(d.empty())",
        "[one]\n[1]\n1\nfalse\n",
    );
}

#[test]
fn methods_check_receiver_and_argument() {
    assert_fails("println((1).count())", "01: Invalid operation");
    assert_fails("println(\"x\".keys())", "01: Invalid operation");
    assert_fails(
        "var a: Array<Int> = Array<Int>(1)\nprintln(a.contains(true))",
        "02: Invalid type [Bool]",
    );
    assert_fails(
        "var a: Array<Int> = Array<Int>(1)\na.append(1.5)",
        "02: Invalid type [Float]",
    );
}

#[test]
fn read_consumes_trimmed_input_lines() {
    let output = run_with_input("println(read() + \"!\")", "hello\n").expect("read program runs");
    assert_eq!(output, "hello!\n");

    let output =
        run_with_input("println(read())\nprintln(read())", "  first  \nsecond\n").expect("read program runs");
    assert_eq!(output, "first\nsecond\n");

    // End of input degrades to the empty string.
    let output = run_with_input("println(read().empty())", "").expect("read program runs");
    assert_eq!(output, "true\n");
}

#[test]
fn random_samples_the_unit_interval() {
    assert_prints("var r: Float = random()\nprintln(r >= 0.0 && r < 1.0)", "true\n");
}

#[test]
fn dump_reveals_the_static_type() {
    assert_prints("dump(3)", "Int(3)\n");
    assert_prints("dump(1.5)", "Float(1.5)\n");
    assert_prints("dump('a')", "Char(a)\n");
    assert_prints("dump(\"hi\")", "String(hi)\n");
    assert_prints("dump(false)", "Bool(false)\n");
    assert_prints("dump(Array<Int>(1, 2))", "Array<Int>([1, 2])\n");
    assert_prints("dump(Dict<Int,Int>(1: 2))", "Dict<Int,Int>({1: 2})\n");
}

#[test]
fn method_chains_apply_to_any_factor() {
    assert_prints("println((\"ab\" + \"cd\").count())", "4\n");
    assert_prints("println(Array<Int>(1, 2, 3).count())", "3\n");
}

#[test]
fn globals_persist_across_interactive_lines() {
    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(Cursor::new(String::new()), Vec::new());

    run_source("var x: Int = 1", &mut env, &mut interpreter).expect("declaration runs");
    run_source("x = x + 41", &mut env, &mut interpreter).expect("assignment runs");
    run_source("println(x)", &mut env, &mut interpreter).expect("print runs");

    assert_eq!(interpreter.into_output(), b"42\n");
}

#[test]
fn a_failed_parse_rewinds_open_scopes() {
    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(Cursor::new(String::new()), Vec::new());

    // The block never closes, so parsing aborts with scopes pushed.
    let error = run_source("{ var trapped: Int = 1", &mut env, &mut interpreter)
        .expect_err("unclosed block fails");
    assert_eq!(error.to_string(), "01: Unexpected end of file");

    // The next line binds against the global scope as if nothing happened.
    run_source("var x: Int = 7", &mut env, &mut interpreter).expect("declaration runs");
    run_source("println(x)", &mut env, &mut interpreter).expect("print runs");
    assert_eq!(interpreter.into_output(), b"7\n");
}

#[test]
fn error_lines_render_with_two_digits() {
    let program = "println(1)\nprintln(2)\nprintln(3)\nprintln(4)\nprintln(5)\nprintln(6)\nprintln(7)\nprintln(8)\nprintln(9)\nprintln(10)\nprintln(oops)";
    assert_fails(program, "11: Undeclared variable [oops]");
}

mod type_matching {
    use swiftlet::interpreter::types::Type;

    fn array_of(inner: Type) -> Type {
        Type::Array(Box::new(inner))
    }

    fn dict_of(key: Type, value: Type) -> Type {
        Type::Dict(Box::new(key), Box::new(value))
    }

    #[test]
    fn primitive_matching_is_reflexive_and_tag_exact() {
        let primitives = [Type::Bool, Type::Int, Type::Float, Type::Char, Type::String];
        for a in &primitives {
            for b in &primitives {
                assert_eq!(a.matches(b), a == b, "{a} vs {b}");
                assert_eq!(a.matches(b), b.matches(a), "symmetry of {a} vs {b}");
            }
        }
    }

    #[test]
    fn composed_matching_recurses_on_inner_types() {
        assert!(array_of(Type::Int).matches(&array_of(Type::Int)));
        assert!(!array_of(Type::Int).matches(&array_of(Type::Float)));
        assert!(array_of(array_of(Type::Char)).matches(&array_of(array_of(Type::Char))));
        assert!(!array_of(array_of(Type::Char)).matches(&array_of(Type::Char)));

        assert!(dict_of(Type::Int, Type::String).matches(&dict_of(Type::Int, Type::String)));
        assert!(!dict_of(Type::Int, Type::String).matches(&dict_of(Type::Int, Type::Bool)));
        assert!(!dict_of(Type::Int, Type::String).matches(&dict_of(Type::Float, Type::String)));
    }

    #[test]
    fn constructors_never_cross_match() {
        assert!(!array_of(Type::Int).matches(&Type::Int));
        assert!(!Type::Int.matches(&array_of(Type::Int)));
        assert!(!array_of(Type::Int).matches(&dict_of(Type::Int, Type::Int)));
        assert!(!Type::String.matches(&Type::Char));
    }
}
