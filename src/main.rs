use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use dearrow::{parse_source, rewrite_source_with, RewriteOptions};

#[derive(Parser)]
#[command(
    name = "dearrow",
    version,
    about = "dearrow — binding-expression rewriter. Parse. Rewrite. Regenerate."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite arrow functions in a binding expression
    Rewrite {
        /// Input file (reads stdin if omitted and --expr is not given)
        input: Option<PathBuf>,
        /// Literal expression to rewrite
        #[arg(long, conflicts_with = "input")]
        expr: Option<String>,
        /// Dotted path of the host unwrap function
        #[arg(long, default_value = "ko.unwrap")]
        unwrap: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a binding expression and report diagnostics
    Check {
        /// Input file (reads stdin if omitted and --expr is not given)
        input: Option<PathBuf>,
        /// Literal expression to check
        #[arg(long, conflicts_with = "input")]
        expr: Option<String>,
    },
    /// Print the parsed expression tree
    Ast {
        /// Input file (reads stdin if omitted and --expr is not given)
        input: Option<PathBuf>,
        /// Literal expression to parse
        #[arg(long, conflicts_with = "input")]
        expr: Option<String>,
        /// Emit JSON instead of the debug tree
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Rewrite {
            input,
            expr,
            unwrap,
            output,
        } => {
            let (origin, source) = read_input(input.as_deref(), expr.as_deref());
            let options = match RewriteOptions::new(&unwrap) {
                Ok(options) => options,
                Err(err) => {
                    err.render("--unwrap");
                    process::exit(1);
                }
            };
            match rewrite_source_with(&source, &options) {
                Ok(rewritten) => write_output(output.as_deref(), &rewritten),
                Err(err) => {
                    err.render(&origin);
                    process::exit(1);
                }
            }
        }
        Command::Check { input, expr } => {
            let (origin, source) = read_input(input.as_deref(), expr.as_deref());
            if let Err(err) = parse_source(&source) {
                err.render(&origin);
                process::exit(1);
            }
        }
        Command::Ast { input, expr, json } => {
            let (origin, source) = read_input(input.as_deref(), expr.as_deref());
            let program = match parse_source(&source) {
                Ok(program) => program,
                Err(err) => {
                    err.render(&origin);
                    process::exit(1);
                }
            };
            if json {
                match serde_json::to_string_pretty(&program) {
                    Ok(text) => println!("{}", text),
                    Err(err) => {
                        eprintln!("error: failed to serialize tree: {}", err);
                        process::exit(1);
                    }
                }
            } else {
                println!("{:#?}", program);
            }
        }
    }
}

/// Resolve the input source: a literal expression, a file, or stdin.
/// Returns (origin label, text).
fn read_input(input: Option<&std::path::Path>, expr: Option<&str>) -> (String, String) {
    if let Some(expr) = expr {
        return ("<expr>".to_string(), expr.to_string());
    }
    if let Some(path) = input {
        match std::fs::read_to_string(path) {
            Ok(text) => return (path.display().to_string(), text.trim_end().to_string()),
            Err(err) => {
                eprintln!("error: cannot read {}: {}", path.display(), err);
                process::exit(1);
            }
        }
    }
    let mut text = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut text) {
        eprintln!("error: cannot read stdin: {}", err);
        process::exit(1);
    }
    ("<stdin>".to_string(), text.trim_end().to_string())
}

fn write_output(output: Option<&std::path::Path>, text: &str) {
    match output {
        Some(path) => {
            if let Err(err) = std::fs::write(path, format!("{}\n", text)) {
                eprintln!("error: cannot write {}: {}", path.display(), err);
                process::exit(1);
            }
        }
        None => println!("{}", text),
    }
}
