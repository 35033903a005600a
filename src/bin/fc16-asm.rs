//! Assembler front end: reads a source file, assembles it, and writes a
//! flat binary, or prints every collected diagnostic to stderr.

use clap::Parser;
use fc16_core::Assembler;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fc16-asm", about = "Assembles fc16 source into a flat binary")]
struct Cli {
    /// Source file to assemble
    input: PathBuf,

    /// Output path; defaults to the input with a `.bin` extension
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fc16-asm: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let source = std::fs::read_to_string(&cli.input)
        .map_err(|err| format!("failed to read {}: {err}", cli.input.display()))?;

    let rom = Assembler::assemble(&source).map_err(|err| {
        let mut message = format!("{err}\n");
        for diag in &err.diagnostics {
            message.push_str(&format!(
                "  {}:{}: {:?}: {}\n",
                diag.line, diag.column, diag.kind, diag.message
            ));
        }
        message
    })?;

    let output = cli.out.clone().unwrap_or_else(|| default_output_path(&cli.input));
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
        }
    }

    std::fs::write(&output, rom)
        .map_err(|err| format!("failed to write {}: {err}", output.display()))?;

    Ok(())
}

fn default_output_path(input: &std::path::Path) -> PathBuf {
    let mut out = input.to_path_buf();
    out.set_extension("bin");
    out
}
