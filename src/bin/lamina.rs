//! Command-line interface for lamina
//! This binary is used to inspect the compiler pipeline: the token stream
//! of a template and the generated script text.
//!
//! Usage:
//!   lamina tokens `<path>` [--format `<format>`]   - Print the token stream
//!   lamina compile `<path>` [--context `<type>`]   - Print the generated script

use clap::{Arg, Command};

use lamina::lamina::formats::TokenFormat;
use lamina::lamina::lexing;
use lamina::Compiler;

fn main() {
    let matches = Command::new("lamina")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting and compiling lamina templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a template")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('simple' or 'json')")
                        .default_value("simple"),
                ),
        )
        .subcommand(
            Command::new("compile")
                .about("Print the generated script for a template")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("context")
                        .long("context")
                        .short('c')
                        .help("Context type the generated script binds")
                        .default_value("Any"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            let format = tokens_matches.get_one::<String>("format").unwrap();
            handle_tokens_command(path, format);
        }
        Some(("compile", compile_matches)) => {
            let path = compile_matches.get_one::<String>("path").unwrap();
            let context = compile_matches.get_one::<String>("context").unwrap();
            handle_compile_command(path, context);
        }
        _ => unreachable!(),
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, format: &str) {
    let format = TokenFormat::from_string(format).unwrap_or_else(|error| {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    });

    let source = read_source(path);
    let tokens = lexing::lex(&source).unwrap_or_else(|error| {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    });

    let output = format.serialize(&tokens).unwrap_or_else(|error| {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    });

    println!("{}", output);
}

/// Handle the compile command
fn handle_compile_command(path: &str, context: &str) {
    let source = read_source(path);
    let output = Compiler::new()
        .compile_to_source(&source, context)
        .unwrap_or_else(|error| {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        });

    println!("{}", output);
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|error| {
        eprintln!("Error reading file: {}", error);
        std::process::exit(1);
    })
}
