use std::{
    error::Error,
    fs,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use log::info;
use ms2::util::fmt::tree;

#[derive(Parser)]
#[command(name = "ms2c", about = "Checks a program and dumps one of its stages.")]
struct Cli {
    /// The source file.
    path: PathBuf,

    /// Which stage to print after a successful run.
    #[arg(long, value_enum, default_value_t = Emit::Ir)]
    emit: Emit,

    /// Disables ANSI colors in diagnostics.
    #[arg(long)]
    no_color: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "snake_case")]
enum Emit {
    Tokens,
    Ast,
    Ir,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("failed to run: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the program compiled.
fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    let src = fs::read_to_string(&cli.path)?;
    info!("compiling {}", cli.path.display());

    let compilation = match ms2::compile(&src) {
        Ok(compilation) => compilation,
        Err(error) => {
            let label = if cli.no_color {
                "error"
            } else {
                "\x1b[1;31merror\x1b[0m"
            };
            eprintln!("{label} ({}): {}", error.stage(), error.rendered());
            return Ok(false);
        }
    };

    let dump = match cli.emit {
        Emit::Tokens => tree::print_tokens_string(&compilation.tokens),
        Emit::Ast => tree::print_program_string(&compilation.program),
        Emit::Ir => tree::print_ir_string(&compilation.ir),
    };
    let mut stdout = io::stdout().lock();
    stdout.write_all(dump.as_bytes())?;
    stdout.flush()?;
    Ok(true)
}
