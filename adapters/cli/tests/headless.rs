use std::{fs, process::Command};

fn life_canvas() -> Command {
    Command::new(env!("CARGO_BIN_EXE_life-canvas"))
}

#[test]
fn headless_verification_succeeds_for_random_soup() {
    let output = life_canvas()
        .args([
            "--headless",
            "50",
            "--verify",
            "--width",
            "320",
            "--height",
            "200",
            "--cell-size",
            "8",
            "--soup-density",
            "0.35",
            "--seed",
            "17",
        ])
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to launch life-canvas");

    assert!(
        output.status.success(),
        "headless verification failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let log = String::from_utf8_lossy(&output.stdout);
    assert!(log.contains("headless run finished"), "missing summary in: {log}");
}

#[test]
fn headless_run_reads_config_file() {
    let directory = std::env::temp_dir().join(format!("life-canvas-{}", std::process::id()));
    fs::create_dir_all(&directory).expect("create temp dir");
    let path = directory.join("config.toml");
    fs::write(
        &path,
        r#"
cell_size = 10
step_interval_ms = 50

[viewport]
width = 100
height = 100

[seed]
patterns = [{ pattern = "r_pentomino", column = 4, row = 4 }]
"#,
    )
    .expect("write config");

    let status = life_canvas()
        .arg("--config")
        .arg(&path)
        .args(["--headless", "25", "--verify"])
        .status()
        .expect("failed to launch life-canvas");

    let _ = fs::remove_dir_all(&directory);
    assert!(status.success(), "config-driven headless run should succeed");
}

#[test]
fn invalid_configuration_exits_with_error() {
    let output = life_canvas()
        .args(["--headless", "1", "--cell-size", "0"])
        .output()
        .expect("failed to launch life-canvas");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cell size must be positive"));
}

#[test]
fn verify_requires_headless() {
    let status = life_canvas()
        .arg("--verify")
        .status()
        .expect("failed to launch life-canvas");

    assert!(!status.success(), "--verify alone must be rejected by argument parsing");
}

#[test]
fn oversized_viewport_exits_with_error() {
    let output = life_canvas()
        .args(["--headless", "1", "--cell-size", "1", "--width", "4000000000"])
        .output()
        .expect("failed to launch life-canvas");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("pixel limit"));
}
