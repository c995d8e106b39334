//! Runs the `torture` binary as a subprocess.

use std::process::{Command, Output};

fn torture(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_torture"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_bogus_args_exit_nonzero() {
    let output = torture(&["--pattern", "one_sided_and_tree", "--args", "bogus"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("'bogus'"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_oversized_width_exit_nonzero() {
    let output = torture(&["--args", "18446744073709551615-0", "--format", "json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("18446744073709551615"), "stderr: {}", stderr);
}

#[test]
fn test_flo_to_stdout() {
    let output = torture(&["--args", "4-1", "--format", "flo", "--cycles", "2"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        stdout,
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("and'4"), "stdout: {}", stdout);
}

#[test]
fn test_list_names_builtin_pattern() {
    let output = torture(&["--list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("one_sided_and_tree"));
    assert!(stdout.contains("64-4"));
}
