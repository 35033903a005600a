//! End-to-end scenarios straight out of the virtual machine's testable
//! properties: assemble a short program, run it to completion, check
//! the observable state.

use fc16_core::{Assembler, Cpu, Memory};

fn run_to_halt(source: &str) -> (Cpu, Memory) {
    let rom = Assembler::assemble(source).expect("assembly should succeed");
    let mut memory = Memory::new();
    memory.load_program(&rom);
    let mut cpu = Cpu::new();
    for _ in 0..10_000 {
        if cpu.is_halted() {
            break;
        }
        cpu.step(&mut memory, 1_000_000);
    }
    (cpu, memory)
}

#[test]
fn fill_screen_scenario() {
    let (cpu, memory) = run_to_halt(
        "MOVI R0, 0x4000\nMOVI R1, 0xE0\nMOVI R2, 16384\nMEMSET\nDISPLAY\nHALT\n",
    );

    assert!(cpu.is_halted());
    assert_eq!(cpu.register(0), 0x8000);
    assert_eq!(cpu.register(1), 0xE0);
    assert_eq!(cpu.register(2), 0);
    assert_eq!(cpu.cycles_executed(), 17_399);
    for addr in 0x4000u32..0x8000 {
        assert_eq!(memory.read8(addr as u16), 0xE0, "pixel at {addr:#06x}");
    }
}

#[test]
fn sub_five_minus_five_clears_all_flags() {
    let (cpu, _mem) = run_to_halt("MOVI R0, 5\nMOVI R1, 5\nSUB R0, R1\nHALT\n");
    assert_eq!(cpu.register(0), 0);
    let flags = cpu.flags();
    assert_eq!(flags & 0b0001, 0b0001); // Z
    assert_eq!(flags & 0b0010, 0); // C
    assert_eq!(flags & 0b0100, 0); // N
    assert_eq!(flags & 0b1000, 0); // V
}

#[test]
fn sub_zero_minus_one_borrows_and_goes_negative() {
    let (cpu, _mem) = run_to_halt("MOVI R0, 0\nMOVI R1, 1\nSUB R0, R1\nHALT\n");
    assert_eq!(cpu.register(0), 0xFFFF);
    let flags = cpu.flags();
    assert_eq!(flags & 0b0001, 0); // Z
    assert_eq!(flags & 0b0010, 0b0010); // C (borrow)
    assert_eq!(flags & 0b0100, 0b0100); // N
    assert_eq!(flags & 0b1000, 0); // V
}

#[test]
fn div_by_zero_remainder_wins_when_rd_equals_r0() {
    let (cpu, _mem) = run_to_halt("MOVI R0, 1234\nMOVI R1, 0\nDIV R0, R1\nHALT\n");
    // Rd == R0 here: quotient (0xFFFF) is written first, then the
    // remainder overwrites R0 last, so R0 ends holding the dividend.
    assert_eq!(cpu.register(0), 1234);
}

#[test]
fn puti_formats_zero_and_max_value() {
    let (cpu, _mem) = run_to_halt("MOVI R0, 0\nPUTI R0\nHALT\n");
    let len = cpu.console_length() as usize;
    assert_eq!(&cpu.console_bytes()[..len], b"0");

    let (cpu, _mem) = run_to_halt("MOVI R0, 65535\nPUTI R0\nHALT\n");
    let len = cpu.console_length() as usize;
    assert_eq!(&cpu.console_bytes()[..len], b"65535");
}

#[test]
fn putx_formats_four_uppercase_hex_digits() {
    let (cpu, _mem) = run_to_halt("MOVI R0, 0x4000\nPUTX R0\nHALT\n");
    let len = cpu.console_length() as usize;
    assert_eq!(&cpu.console_bytes()[..len], b"0x4000");

    let (cpu, _mem) = run_to_halt("MOVI R0, 0xABCD\nPUTX R0\nHALT\n");
    let len = cpu.console_length() as usize;
    assert_eq!(&cpu.console_bytes()[..len], b"0xABCD");
}

#[test]
fn call_ret_round_trip_preserves_stack_pointer() {
    let rom = Assembler::assemble("CALL sub\nHALT\nsub: NOP\nRET\n").unwrap();
    let mut memory = Memory::new();
    memory.load_program(&rom);
    let mut cpu = Cpu::new();
    let initial_sp = cpu.sp();

    for _ in 0..100 {
        if cpu.is_halted() {
            break;
        }
        cpu.step(&mut memory, 1000);
    }

    assert!(cpu.is_halted());
    assert_eq!(cpu.sp(), initial_sp);
}

#[test]
fn forward_label_assembles_to_exact_bytes() {
    let rom = Assembler::assemble("JMP end\nNOP\nend: HALT\n").unwrap();
    assert_eq!(rom, vec![0x50, 0x04, 0x00, 0x00, 0x01]);
}

#[test]
fn timer_tick_advances_system_and_saturates_countdown() {
    let mut memory = Memory::new();
    memory.write16(0xFFF2, 100);
    memory.tick_timers(50);
    assert_eq!(memory.read16(0xFFF0), 50);
    assert_eq!(memory.read16(0xFFF2), 50);

    memory.tick_timers(60);
    assert_eq!(memory.read16(0xFFF0), 110);
    assert_eq!(memory.read16(0xFFF2), 0);
}

#[test]
fn key_latch_preserves_last_code_on_release() {
    let mut memory = Memory::new();
    memory.set_key(0x41, true);
    memory.set_key(0x00, false);
    assert_eq!(memory.read8(0xFFF4), 0x41);
    assert_eq!(memory.read8(0xFFF5), 0);

    memory.set_key(0x42, true);
    assert_eq!(memory.read8(0xFFF4), 0x42);
    assert_eq!(memory.read8(0xFFF5), 1);
}

#[test]
fn halt_makes_further_steps_free() {
    let rom = Assembler::assemble("HALT\n").unwrap();
    let mut memory = Memory::new();
    memory.load_program(&rom);
    let mut cpu = Cpu::new();

    cpu.step(&mut memory, 1000);
    assert!(cpu.is_halted());
    let cycles_at_halt = cpu.cycles_executed();

    assert_eq!(cpu.step(&mut memory, 1000), 0);
    assert_eq!(cpu.cycles_executed(), cycles_at_halt);
}

#[test]
fn push_pop_round_trip_restores_register_and_stack_pointer() {
    let rom = Assembler::assemble("MOVI R3, 0xBEEF\nPUSH R3\nMOVI R3, 0\nPOP R3\nHALT\n").unwrap();
    let mut memory = Memory::new();
    memory.load_program(&rom);
    let mut cpu = Cpu::new();
    let initial_sp = cpu.sp();

    for _ in 0..20 {
        if cpu.is_halted() {
            break;
        }
        cpu.step(&mut memory, 1000);
    }

    assert_eq!(cpu.register(3), 0xBEEF);
    assert_eq!(cpu.sp(), initial_sp);
}

#[test]
fn console_filter_drops_carriage_return_and_control_bytes() {
    let rom = Assembler::assemble(
        "MOVI R0, 0x0D\nPUTC R0\nMOVI R0, 0x41\nPUTC R0\nHALT\n",
    )
    .unwrap();
    let mut memory = Memory::new();
    memory.load_program(&rom);
    let mut cpu = Cpu::new();
    for _ in 0..100 {
        if cpu.is_halted() {
            break;
        }
        cpu.step(&mut memory, 1000);
    }

    let len = cpu.console_length() as usize;
    assert_eq!(&cpu.console_bytes()[..len], b"A");
}
