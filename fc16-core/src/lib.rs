//! Core emulation crate: the CPU interpreter, the memory/MMIO subsystem,
//! and the two-pass assembler. Binaries in the workspace only glue these
//! together with a CLI and a run loop.

pub mod assembler;
pub mod cpu;
pub mod memory;

pub use assembler::{AssembleError, Assembler, Diagnostic, DiagnosticKind};
pub use cpu::{Cpu, Flags, RunState, Snapshot};
pub use memory::{rgb332_to_rgb8, Memory};
