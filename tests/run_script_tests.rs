use rusty_script::frontend::parse;
use rusty_script::interpreter::{Environment, Interpreter};

use regex::Regex;
use std::path::Path;

use test_generator::test_resources;

/// Printed lines plus an optional trailing runtime error.
#[derive(Debug, PartialEq)]
struct Outcome {
    output: Vec<String>,
    runtime_error: Option<String>,
}

/// Each `.script` case carries a sidecar `.expected` file: the exact
/// stdout of the script, with a final `runtime error: ...` line when
/// evaluation is supposed to fail partway through.
#[test_resources("tests/script_cases/**/*.script")]
fn test_script_case(file: &str) {
    let source = std::fs::read_to_string(file).unwrap();
    let expected_path = Path::new(file).with_extension("expected");
    let expected_contents = std::fs::read_to_string(&expected_path).unwrap();

    let expected = parse_expected(&expected_contents);
    let actual = run_script(&source);

    assert_eq!(expected, actual);
}

fn run_script(source: &str) -> Outcome {
    let program = parse(source).unwrap();

    let mut output = vec![];
    let env = Environment::global();
    let result =
        Interpreter::with_output(std::io::Cursor::new(&mut output)).eval_program(&program, &env);

    Outcome {
        output: String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| l.to_owned())
            .collect(),
        runtime_error: result.err().map(|e| e.to_string()),
    }
}

fn parse_expected(contents: &str) -> Outcome {
    let error_regexer = Regex::new(r"^runtime error: (.*)$").unwrap();

    let mut outcome = Outcome {
        output: vec![],
        runtime_error: None,
    };

    for line in contents.lines() {
        if let Some(r) = error_regexer.captures(line) {
            outcome
                .runtime_error
                .replace(r.get(1).unwrap().as_str().to_owned());
        } else {
            outcome.output.push(line.to_owned());
        }
    }

    outcome
}
