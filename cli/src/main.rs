use clap::Parser;
use miette::{IntoDiagnostic, Result, miette};
use std::io::BufRead;
use std::io::BufReader;
use xeval::{Engine, Program, Variables, render_error};

/// xeval - compile-once, evaluate-many arithmetic expressions
#[derive(Parser, Debug)]
#[command(name = "xeval")]
#[command(about = "Evaluate xeval expressions", long_about = None)]
struct Args {
    /// Bind a variable, e.g. `--var x=1.5` (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
    vars: Vec<(String, f64)>,

    /// Print the compiled instructions before the result
    #[arg(long)]
    disasm: bool,

    /// Expression to evaluate (if not provided, reads one per line from stdin)
    expression: Option<String>,
}

fn parse_binding(text: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", text))?;
    let name = name.trim();
    let valid = name
        .bytes()
        .next()
        .is_some_and(|b| b == b'_' || b.is_ascii_alphabetic())
        && name.bytes().all(|b| b == b'_' || b.is_ascii_alphanumeric());
    if !valid {
        return Err(format!("'{}' is not a valid variable name", name));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {}", name, e))?;
    Ok((name.to_string(), value))
}

fn print_program(program: &Program) {
    if !program.is_empty() {
        println!("=== Instructions ===");
        print!("{}", program.disassemble());
        println!();
    }
}

fn interpret_input(engine: &Engine, vars: &Variables, input: &str, disasm: bool) {
    let program = match engine.parse(input, vars) {
        Ok(program) => program,
        Err(e) => {
            render_error(&e, input);
            return;
        }
    };

    if disasm {
        print_program(&program);
    }

    println!("{}", program.evaluate());
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut vars = Variables::new();
    for (name, value) in &args.vars {
        vars.define(name, *value);
    }
    tracing::debug!(count = vars.len(), "bound variables");

    let engine = Engine::new(xeval::default_registry(), Default::default());

    // Check if we have a direct expression argument
    if let Some(expr) = args.expression {
        interpret_input(&engine, &vars, &expr, args.disasm);
        return Ok(());
    }

    // Otherwise, read one expression per line
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = line.map_err(|e| miette!("Error reading line from stdin: {}", e))?;
        if line.trim().is_empty() {
            continue;
        }
        interpret_input(&engine, &vars, &line, args.disasm);
    }

    Ok(())
}
