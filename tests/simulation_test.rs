use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_traffic_ca"))
        .args(args)
        .env("RUST_LOG", "warn,traffic_ca=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs headless and prints its final summary
#[test]
fn test_headless_simulation_runs() {
    let output = run_cli(&["--steps", "20", "--seed", "3", "--p-brake", "0.2"]);

    assert!(
        output.status.success(),
        "Simulation failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("=== Final State ==="),
        "Simulation did not complete properly. stdout: {}",
        stdout
    );
    assert!(stdout.contains("Step: 20"), "Missing final step count");
    assert!(stdout.contains("Average velocity:"), "Missing 'Average velocity' statistic");
    assert!(stdout.contains("Flow:"), "Missing 'Flow' statistic");
    assert!(
        stdout.contains("Mean velocity after 5 warm-up steps:"),
        "Missing warm-up mean"
    );
}

/// Test that construction is logged with the seed in use
#[test]
fn test_construction_is_logged() {
    let output = run_cli(&["--steps", "1", "--seed", "99"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Created OneLane road"), "stderr: {}", stderr);
    assert!(stderr.contains("seed=99"), "stderr: {}", stderr);
}

/// Test that free flow reaches the maximum velocity
#[test]
fn test_free_flow_summary() {
    let output = run_cli(&[
        "--width", "100", "--vehicles", "5", "--steps", "10", "--seed", "1",
    ]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Average velocity: 5.000"), "stdout: {}", stdout);
    assert!(
        stdout.contains("Mean velocity after 5 warm-up steps: 5.000"),
        "stdout: {}",
        stdout
    );
}

/// Test that the road is drawn once per step on request
#[test]
fn test_two_lane_draw() {
    let output = run_cli(&[
        "--width", "12", "--lanes", "2", "--vehicles", "3", "--steps", "4", "--draw", "--seed", "5",
    ]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- After step 4 ---"));
    assert!(stdout.contains("Lane changes this step:"));
    let road_rows = stdout
        .lines()
        .filter(|line| line.len() == 12 && line.chars().all(|c| c == '.' || c.is_ascii_digit()))
        .count();
    // Initial picture plus one per step, two lanes each
    assert_eq!(road_rows, 10);
}

/// Test that invalid parameters are rejected with a configuration error
#[test]
fn test_invalid_parameters_rejected() {
    let output = run_cli(&["--lanes", "3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("lane count must be 1 or 2"), "stderr: {}", stderr);

    let output = run_cli(&["--density", "2.0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("density must be within [0, 1]"), "stderr: {}", stderr);

    let output = run_cli(&["--width", "10", "--vehicles", "11"]);
    assert!(!output.status.success());
}
