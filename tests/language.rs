use indoc::indoc;
use treelox::diagnostics::Diagnostics;
use treelox::error::Error;
use treelox::interpreter::Interpreter;
use treelox::{compile, run};

struct Outcome {
    output: String,
    errors: Vec<String>,
    had_error: bool,
    had_runtime_error: bool,
}

fn execute(source: &str) -> Outcome {
    let mut interpreter = Interpreter::with_output(Vec::new());
    let mut diagnostics = Diagnostics::new();
    run(source, &mut interpreter, &mut diagnostics);

    let mut report = Vec::new();
    diagnostics.report(&mut report).unwrap();
    let report = String::from_utf8(report).unwrap();

    Outcome {
        output: String::from_utf8(interpreter.into_output()).unwrap(),
        errors: report.lines().map(str::to_owned).collect(),
        had_error: diagnostics.had_error(),
        had_runtime_error: diagnostics.had_runtime_error(),
    }
}

fn assert_prints(source: &str, expected: &str) {
    let outcome = execute(source);
    assert!(
        outcome.errors.is_empty(),
        "unexpected errors for:\n{source}\n{:?}",
        outcome.errors
    );
    assert_eq!(outcome.output, expected, "output of:\n{source}");
}

#[test]
fn arithmetic_precedence() {
    assert_prints("print 1 + 2 * 3;", "7\n");
    assert_prints("print (1 + 2) * 3;", "9\n");
    assert_prints("print -2 * -(3 - 1) / 8;", "0.5\n");
}

#[test]
fn string_concatenation() {
    assert_prints(r#"print "a" + "b";"#, "ab\n");

    let outcome = execute(r#"print "a" + 1;"#);
    assert!(outcome.had_runtime_error);
    assert_eq!(
        outcome.errors,
        vec!["Operands must be two numbers or two strings.", "[line 1]"]
    );
}

#[test]
fn equality_and_truthiness() {
    assert_prints(
        "print nil == nil; print 0 == false; print !0; print !nil;",
        "true\nfalse\nfalse\ntrue\n",
    );
}

#[test]
fn division_by_zero() {
    let outcome = execute("print 1 / 0;");

    assert!(outcome.had_runtime_error);
    assert_eq!(outcome.output, "");
    assert!(outcome.errors[0].contains("Division by zero"));
}

#[test]
fn block_shadowing_does_not_leak() {
    assert_prints("var a = 1; { var a = 2; print a; } print a;", "2\n1\n");
}

#[test]
fn nested_blocks_assign_outward() {
    let source = indoc! {"
        var a = \"global\";
        {
            var b = 1;
            {
                a = \"changed\";
                b = b + 1;
                print b;
            }
        }
        print a;
    "};
    assert_prints(source, "2\nchanged\n");
}

#[test]
fn assignment_requires_prior_declaration() {
    let outcome = execute("x = 1;");

    assert!(outcome.had_runtime_error);
    assert!(!outcome.had_error);
    assert_eq!(outcome.errors, vec!["undefined variable 'x'", "[line 1]"]);
}

#[test]
fn while_loop() {
    assert_prints(
        "var i = 0; while (i < 3) { print i; i = i + 1; }",
        "0\n1\n2\n",
    );
}

#[test]
fn for_loop_and_fibonacci() {
    let source = indoc! {"
        var a = 0;
        var temp;
        for (var b = 1; a < 50; b = temp + b) {
            print a;
            temp = a;
            a = b;
        }
    "};
    assert_prints(source, "0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n");
}

#[test]
fn for_loop_variable_is_scoped_to_the_loop() {
    let outcome = execute("for (var i = 0; i < 1; i = i + 1) {} print i;");
    assert!(outcome.had_runtime_error);
    assert_eq!(outcome.errors[0], "undefined variable 'i'");
}

#[test]
fn redefinition_is_legal() {
    assert_prints("var a = 1; var a = a + 1; print a;", "2\n");
}

#[test]
fn runtime_error_reports_its_line_and_halts() {
    let source = indoc! {"
        print \"before\";
        var a = 1;
        print a + nil;
        print \"after\";
    "};
    let outcome = execute(source);

    assert_eq!(outcome.output, "before\n");
    assert_eq!(outcome.errors, vec!["Operands must be two numbers or two strings.", "[line 3]"]);
}

#[test]
fn syntax_errors_skip_execution() {
    let source = indoc! {"
        print 1;
        print (2;
        print 3;
    "};
    let outcome = execute(source);

    assert!(outcome.had_error);
    assert!(!outcome.had_runtime_error);
    assert_eq!(outcome.output, "");
    assert_eq!(
        outcome.errors,
        vec!["[line 2] Error at ';': Expected ')' after expression."]
    );
}

#[test]
fn one_malformed_statement_yields_one_error() {
    let source = indoc! {"
        var a = 1;
        var b = = 2;
        print a;
        print a + 1;
    "};
    let mut diagnostics = Diagnostics::new();
    let statements = compile(source, &mut diagnostics);

    assert_eq!(statements.len(), 3);
    let parse_errors = diagnostics
        .errors()
        .filter(|error| matches!(error, Error::Parse(_)))
        .count();
    assert_eq!(parse_errors, 1);
}

#[test]
fn scan_errors_are_all_collected() {
    let outcome = execute("var a = 1 # 2;\nprint a $;");

    assert!(outcome.had_error);
    assert_eq!(
        outcome.errors,
        vec![
            "[line 1] Error: Unexpected character '#'.",
            "[line 2] Error: Unexpected character '$'.",
            "[line 1] Error at '2': Expected ';' after variable declaration.",
        ]
    );
}

#[test]
fn errors_reset_between_runs_but_variables_persist() {
    let mut interpreter = Interpreter::with_output(Vec::new());
    let mut diagnostics = Diagnostics::new();

    run("var count = 1;", &mut interpreter, &mut diagnostics);
    run("print count +;", &mut interpreter, &mut diagnostics);
    assert!(diagnostics.had_error());

    diagnostics.reset();
    run("count = count + 1; print count;", &mut interpreter, &mut diagnostics);
    assert!(!diagnostics.had_error());
    assert!(!diagnostics.had_runtime_error());
    assert_eq!(String::from_utf8(interpreter.into_output()).unwrap(), "2\n");
}

#[test]
fn comments_are_ignored() {
    let source = indoc! {"
        // a line comment
        print 1; /* a block
        comment */ print 2;
    "};
    assert_prints(source, "1\n2\n");
}
