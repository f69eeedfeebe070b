use std::{fs, path::PathBuf, process};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use transbasic::{
    codegen::{cpp::CppGenerator, events::EventLog},
    error::{CompileError, Diagnostic},
    frontend::{
        config::ParserConfig,
        lexer::{Lexer, Token},
    },
    read_source, translate_with_config,
};

/// What the translator writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// A C++17 translation unit.
    Cpp,
    /// One line per generator event.
    Events,
    /// One line per token, with its position.
    Tokens,
}

/// transbasic translates a BASIC-like language to C++ in a single pass.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The source file to translate.
    input: PathBuf,

    /// Write the result here instead of to standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to produce.
    #[arg(long, value_enum, default_value_t = Emit::Cpp)]
    emit: Emit,

    /// Accept EXIT, CONTINUE and RETURN outside a matching construct and
    /// ignore them.
    #[arg(long)]
    lenient_exits: bool,

    /// Log more; repeat for more detail. RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                      EnvFilter::new(match verbose {
                                                                         0 => "warn",
                                                                         1 => "info",
                                                                         2 => "debug",
                                                                         _ => "trace",
                                                                     })
                                                  });
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();
}

fn tokens(source_name: &str, source: &str) -> Result<String, Diagnostic> {
    let mut lexer = Lexer::new(source_name, source);
    let mut out = String::new();
    loop {
        let spanned =
            lexer.next_token()
                 .map_err(|e| Diagnostic::new(source_name, CompileError::from(e)))?;
        out.push_str(&format!("{} {}\n", spanned.pos, spanned.token));
        if spanned.token == Token::EndOfInput {
            return Ok(out);
        }
    }
}

fn run(args: &Args) -> Result<String, Diagnostic> {
    let source = read_source(&args.input)?;
    let source_name = args.input.display().to_string();
    let config = ParserConfig { strict_exits: !args.lenient_exits,
                                ..ParserConfig::default() };

    match args.emit {
        Emit::Cpp => {
            let mut generator = CppGenerator::new();
            translate_with_config(&source_name, &source, config, &mut generator)?;
            Ok(generator.into_output())
        },
        Emit::Events => {
            let mut log = EventLog::new();
            translate_with_config(&source_name, &source, config, &mut log)?;
            Ok(log.to_string())
        },
        Emit::Tokens => tokens(&source_name, &source),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let output = run(&args).unwrap_or_else(|diagnostic| {
                               eprintln!("{diagnostic}");
                               process::exit(1);
                           });

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, output) {
                eprintln!("Failed to write the output file '{}': {e}", path.display());
                process::exit(1);
            }
        },
        None => print!("{output}"),
    }
}
