// toyc: Toy language front end driver

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use crossterm::style::Stylize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use toyc::parser::dump::dump;
use toyc::parser::{Lexer, Parser, Scanner, Token};

/// What to print for the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The parsed AST
    Ast,
    /// One token per line with its location
    Tokens,
}

#[derive(Debug, ClapParser)]
#[command(name = "toyc", version, about = "Parse Toy source and dump its AST")]
struct Cli {
    /// Input Toy source file
    file: PathBuf,

    /// Output to produce
    #[arg(long, value_enum, default_value_t = Emit::Ast)]
    emit: Emit,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("toyc=warn".parse()?))
        .init();

    let cli = Cli::parse();

    let mut lexer = Lexer::open(&cli.file);
    if let Some(warning) = lexer.warning() {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    match cli.emit {
        Emit::Tokens => {
            loop {
                let token = lexer.advance();
                if token == Token::Eof {
                    break;
                }
                let loc = lexer.location();
                let literal = lexer.take_literal();
                if literal.is_empty() {
                    println!("{:>4}:{:<4} {}", loc.line, loc.column, token);
                } else {
                    println!("{:>4}:{:<4} {} '{}'", loc.line, loc.column, token, literal);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Emit::Ast => {
            info!("Parsing {}", cli.file.display());
            match Parser::new(lexer).parse_module() {
                Ok(module) => {
                    print!("{}", dump(&module));
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("{} {}: {}", "error:".red().bold(), cli.file.display(), e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
