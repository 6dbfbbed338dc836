//! IPPcode24 CLI: check, run and list programs.
//!
//! Exit codes:
//! - 0: Success
//! - 10: Usage error
//! - 11: Source or input file cannot be read
//! - 32: Source text rejected by the loader
//! - any other: the program's `EXIT` code or its runtime error code

mod commands;
mod logging;

use std::process;

fn main() {
    logging::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(commands::USAGE_EXIT_CODE);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(commands::USAGE_EXIT_CODE);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: ippvm <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <source> [--input <file>]   Load and execute a program");
    eprintln!("  check <source>                  Load a program and collect its labels");
    eprintln!("  disassemble <source>            Print the canonical listing");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=ippvm_vm=trace) for diagnostics on stderr.");
}
