use std::{fs, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};

use mlogc::codegen::disasm;
use mlogc::frontend::token_dumper::TokenDumper;
use mlogc::{Program, Syntax};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// One instruction per line
    Text,
    /// postcard-encoded program image
    Bin,
}

#[derive(Parser)]
#[command(name = "mlogc", about = "Compile statement source to logic processor code", version)]
struct Cli {
    /// Source file
    #[arg(default_value = "code.txt")]
    input: PathBuf,

    /// Write the program here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Emit::Text)]
    emit: Emit,

    /// Prefix each instruction with its index
    #[arg(long, conflicts_with = "disasm")]
    numbered: bool,

    /// Show the program with jump targets marked
    #[arg(long)]
    disasm: bool,

    /// Dump raw statements before classification
    #[arg(long)]
    segments: bool,

    /// Dump classified tokens
    #[arg(long)]
    tokens: bool,

    /// Disable ANSI colors in dumps
    #[arg(long)]
    no_color: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    stderrlog::new()
        .module("mlogc")
        .quiet(cli.quiet)
        .verbosity(usize::from(cli.verbose) + 1)
        .init()
        .context("failed to initialise logging")?;

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read '{}'", cli.input.display()))?;

    let syntax = Syntax::standard();
    let program = compile(&cli, &source, &syntax)
        .with_context(|| format!("failed to compile '{}'", cli.input.display()))?;

    let bytes = match cli.emit {
        Emit::Bin => program
            .to_bytes()
            .map_err(|e| anyhow!("failed to encode program: {}", e))?,
        Emit::Text if cli.numbered => disasm::numbered(&program).into_bytes(),
        Emit::Text if cli.disasm => disasm::disassemble(&program).into_bytes(),
        Emit::Text => program.to_string().into_bytes(),
    };

    match &cli.output {
        Some(path) => fs::write(path, &bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(&bytes)
                .context("failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Runs the stages one at a time so intermediate dumps can be shown.
fn compile(cli: &Cli, source: &str, syntax: &Syntax) -> Result<Program> {
    let mut dumper = TokenDumper::new();
    if cli.no_color {
        dumper = dumper.no_color();
    }

    let raw = mlogc::segment(source, syntax);
    if cli.segments {
        eprint!("{}", dumper.dump_segments(&raw));
    }

    let statements = mlogc::classify(raw, syntax)?;
    if cli.tokens {
        eprint!("{}", dumper.dump_tokens(&statements));
    }

    let program = mlogc::generate(&statements, syntax)?;
    log::info!("{} instruction(s)", program.len());
    Ok(program)
}
