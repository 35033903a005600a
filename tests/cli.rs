//! CLI-level smoke tests: the two binaries glued together over a temp
//! directory, exercised the way a user would from a shell.

use std::process::Command;

fn bin(name: &str) -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // deps
    path.pop(); // debug
    path.push(name);
    path
}

#[test]
fn assembles_and_runs_a_fill_screen_program() {
    let dir = std::env::temp_dir().join("fc16-cli-smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let source_path = dir.join("fill.asm");
    let binary_path = dir.join("fill.bin");

    std::fs::write(
        &source_path,
        "MOVI R0, 0x4000\nMOVI R1, 0xE0\nMOVI R2, 16384\nMEMSET\nDISPLAY\nHALT\n",
    )
    .unwrap();

    let asm_status = Command::new(bin("fc16-asm"))
        .arg(&source_path)
        .arg("-o")
        .arg(&binary_path)
        .status()
        .expect("failed to run fc16-asm");
    assert!(asm_status.success());
    assert!(binary_path.exists());

    let run_output = Command::new(bin("fc16"))
        .arg(&binary_path)
        .output()
        .expect("failed to run fc16");
    assert!(run_output.status.success());

    let stdout = String::from_utf8_lossy(&run_output.stdout);
    assert!(stdout.contains("halted: true"));
    assert!(stdout.contains("cycles: 17399"));
}

#[test]
fn assembler_reports_diagnostics_and_exits_nonzero() {
    let dir = std::env::temp_dir().join("fc16-cli-smoke-bad");
    std::fs::create_dir_all(&dir).unwrap();
    let source_path = dir.join("broken.asm");
    std::fs::write(&source_path, "FROB R0, R1\n").unwrap();

    let output = Command::new(bin("fc16-asm"))
        .arg(&source_path)
        .output()
        .expect("failed to run fc16-asm");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("InvalidMnemonic"));
}
