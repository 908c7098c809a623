use rusty_script::frontend::parse;
use rusty_script::interpreter::{Environment, Interpreter, Value};

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::{fs, process};

#[derive(Parser)]
#[clap(name = "rscript", version, about = "A tree-walking script interpreter")]
struct Args {
    /// Script to run; opens a REPL when omitted.
    script: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let exit_code = match args.script {
        Some(path) => run_file(&path),
        None => run_prompt(),
    };
    process::exit(exit_code);
}

fn run_file(path: &PathBuf) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            return 74;
        }
    };

    let program = match parse(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{}", e);
            return 65;
        }
    };

    let env = Environment::global();
    match Interpreter::new().eval_program(&program, &env) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("{}", e);
            70
        }
    }
}

fn run_prompt() -> i32 {
    // One environment for the whole session; bindings persist across lines.
    let env = Environment::global();
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return 74;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return 0,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                return 74;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            return 0;
        }

        // Errors abandon the line, never the session.
        match run_line(&mut interpreter, &env, line) {
            Ok(value) => println!("{}", value),
            Err(message) => eprintln!("{}", message),
        }
    }
}

fn run_line(
    interpreter: &mut Interpreter<io::Stdout>,
    env: &Environment,
    source: &str,
) -> Result<Value, String> {
    let program = parse(source).map_err(|e| e.to_string())?;
    interpreter
        .eval_program(&program, env)
        .map_err(|e| e.to_string())
}
