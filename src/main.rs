use std::{
    fs,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use swiftlet::{run_source, Environment, Interpreter};

/// swiftlet is a small, statically-typed scripting language with typed
/// variables, arrays, dictionaries and a handful of builtin operations.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run; omit it to start an interactive session.
    script: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    match args.script {
        Some(path) => run_file(&path),
        None => run_prompt(),
    }
}

/// Batch mode: the whole file parses before anything runs. A language
/// error prints its rendered form and ends the run.
fn run_file(path: &Path) {
    let source = fs::read_to_string(path).unwrap_or_else(|_| {
        eprintln!(
            "Failed to read the script '{}'. Perhaps this file does not exist?",
            path.display()
        );
        process::exit(1);
    });

    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(BufReader::new(io::stdin()), io::stdout());

    if let Err(error) = run_source(&source, &mut env, &mut interpreter) {
        println!("{error}");
    }
}

/// Interactive mode: one line at a time against a persistent global
/// scope, so variables declared on earlier lines stay visible. A language
/// error prints and the prompt continues; end of input ends the session.
fn run_prompt() {
    let mut env = Environment::new();
    let mut interpreter = Interpreter::new(BufReader::new(io::stdin()), io::stdout());
    let stdin = io::stdin();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!();
                break;
            },
            Ok(_) => {},
        }

        if let Err(error) = run_source(&line, &mut env, &mut interpreter) {
            println!("{error}");
        }
    }
}
