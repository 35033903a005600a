//! Headless runner: loads a flat binary, drives the tick/step loop, and
//! reports console output plus final CPU state. No framebuffer
//! presentation — that's the host UI's job, out of scope here.

use clap::Parser;
use fc16_core::{Cpu, Memory};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fc16", about = "Headless runner for the fc16 virtual machine")]
struct Cli {
    /// Flat binary image to load at address 0
    program: PathBuf,

    /// Cycle budget passed to each `step` call
    #[arg(long, default_value_t = 100_000)]
    cycles: u64,

    /// Milliseconds of wall clock advanced before each step
    #[arg(long = "ticks-ms", default_value_t = 16)]
    ticks_ms: u16,

    /// Stop after this many step calls even if the program never halts
    #[arg(long = "max-steps", default_value_t = 10_000)]
    max_steps: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fc16: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let program = std::fs::read(&cli.program)
        .map_err(|err| format!("failed to read {}: {err}", cli.program.display()))?;

    let mut memory = Memory::new();
    memory.load_program(&program);
    let mut cpu = Cpu::new();

    let mut steps = 0u64;
    while !cpu.is_halted() && steps < cli.max_steps {
        memory.tick_timers(cli.ticks_ms);
        let spent = cpu.step(&mut memory, cli.cycles);
        steps += 1;
        if cpu.consume_display() {
            info!("step {steps}: display requested at cycle {}", cpu.cycles_executed());
        }
        if spent == 0 && !cpu.is_halted() {
            // No cycles consumed and still running means the budget was
            // too small to execute even one instruction.
            return Err("cycle budget too small to make progress".to_string());
        }
    }

    print_console(&cpu);
    print_report(&cpu, steps);
    Ok(())
}

fn print_console(cpu: &Cpu) {
    let bytes = cpu.console_bytes();
    let len = cpu.console_length() as usize;
    let capacity = bytes.len();

    let ordered: Vec<u8> = if (len as u16) < capacity as u16 {
        bytes[..len].to_vec()
    } else {
        let start = cpu.console_write_pos() as usize;
        bytes[start..].iter().chain(bytes[..start].iter()).copied().collect()
    };

    println!("--- console ---");
    println!("{}", String::from_utf8_lossy(&ordered));
    println!("---------------");
}

fn print_report(cpu: &Cpu, steps: u64) {
    let snap = cpu.snapshot();
    println!("halted: {}", snap.halted);
    println!("pc: {:#06x}  sp: {:#06x}  flags: {:#04x}", snap.pc, snap.sp, snap.flags.to_byte());
    for (i, value) in snap.registers.iter().enumerate() {
        println!("r{i}: {value:#06x}");
    }
    println!("cycles: {}  steps: {steps}", snap.cycles);
}
