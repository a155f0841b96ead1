//! jexl command-line driver.

use jexl::{report, Engine, EngineBuilder, JexlError, MapContext, Value};

fn main() {
    jexl::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: jexl eval <expression>");
                std::process::exit(1);
            }
            let source = args[2..].join(" ");
            eval_expression(&source);
        }
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: jexl run <file> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --strict            Fail on undefined variables and members");
                eprintln!("  --lenient           Resolve undefined names to null (default)");
                eprintln!("  --silent            Print null instead of failing");
                eprintln!("  --unsafe            Fail on navigation through null");
                eprintln!("  --set name=value    Define a variable (value is an expression)");
                std::process::exit(1);
            }
            let run = match parse_run_options(&args[2..]) {
                Ok(run) => run,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(1);
                }
            };
            run_file(run);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: jexl parse <file>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: jexl lex <file>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("jexl {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("jexl - expression and script evaluator");
    println!();
    println!("Usage: jexl <command> [options]");
    println!();
    println!("Commands:");
    println!("  eval <expr>     Evaluate an expression and print the result");
    println!("  run <file>      Execute a script file");
    println!("  parse <file>    Parse a script and print the tree");
    println!("  lex <file>      Tokenize a file and print the tokens");
    println!("  help            Show this message");
    println!("  version         Show version information");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=jexl=debug) for tracing output.");
}

struct RunOptions {
    path: String,
    builder: EngineBuilder,
    variables: Vec<(String, String)>,
}

fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut path = None;
    let mut builder = Engine::builder();
    let mut variables = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--strict" => builder = builder.strict(true),
            "--lenient" => builder = builder.strict(false),
            "--silent" => builder = builder.silent(true),
            "--unsafe" => builder = builder.safe(false),
            "--set" => {
                let Some(binding) = args.get(i + 1) else {
                    return Err("--set needs name=value".to_string());
                };
                variables.push(split_binding(binding)?);
                i += 1;
            }
            _ if arg.starts_with('-') => match arg.strip_prefix("--set=") {
                Some(binding) => variables.push(split_binding(binding)?),
                None => return Err(format!("unknown option '{arg}'")),
            },
            _ if path.is_none() => path = Some(arg.to_string()),
            _ => return Err(format!("unexpected argument '{arg}'")),
        }
        i += 1;
    }

    let path = path.ok_or_else(|| "missing file path".to_string())?;
    Ok(RunOptions {
        path,
        builder,
        variables,
    })
}

fn split_binding(binding: &str) -> Result<(String, String), String> {
    match binding.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid binding '{binding}', expected name=value")),
    }
}

/// Value of a `--set` binding: the text as an expression when it evaluates
/// cleanly, the raw text otherwise.
fn binding_value(engine: &Engine, text: &str) -> Value {
    let empty = MapContext::new().into_shared();
    engine
        .create_expression(text)
        .and_then(|expr| expr.evaluate(&empty))
        .unwrap_or_else(|_| Value::string(text))
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

fn fail(name: &str, source: &str, err: &JexlError) -> ! {
    eprint!("{}", report::render(name, source, err, true));
    std::process::exit(1);
}

fn eval_expression(source: &str) {
    let engine = Engine::new();
    let ctx = MapContext::new().into_shared();
    match engine
        .create_expression(source)
        .and_then(|expr| expr.evaluate(&ctx))
    {
        Ok(value) => println!("{value}"),
        Err(err) => fail("<expr>", source, &err),
    }
}

fn run_file(run: RunOptions) {
    let source = read_file(&run.path);
    let literal_engine = Engine::builder().cache(0).build();
    let ctx = run
        .variables
        .iter()
        .fold(MapContext::new(), |ctx, (name, text)| {
            ctx.with(name.as_str(), binding_value(&literal_engine, text))
        })
        .into_shared();

    let engine = run.builder.build();
    match engine
        .create_script(&source)
        .and_then(|script| script.execute(&ctx, &[]))
    {
        Ok(Value::Nil) => {}
        Ok(value) => println!("{value}"),
        Err(err) => fail(&run.path, &source, &err),
    }
}

fn parse_file(path: &str) {
    let source = read_file(path);
    match Engine::new().create_script(&source) {
        Ok(script) => println!("{}", script.ast()),
        Err(err) => fail(path, &source, &err),
    }
}

fn lex_file(path: &str) {
    let source = read_file(path);
    let tokens = jexl_lexer::tokenize(&source);
    println!("Tokens for '{}' ({} tokens):", path, tokens.len());
    for token in &tokens {
        println!("  {:?} @ {}", token.kind, token.span);
    }
}
