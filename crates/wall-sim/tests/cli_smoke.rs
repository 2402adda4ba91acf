use std::fs;
use std::process::Command;

use serde_json::Value;

fn wall_sim(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_wall-sim"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run wall-sim")
}

#[test]
fn plan_json_report_is_deterministic() {
    let args = [
        "plan", "--bond", "flemish", "--courses", "4", "--solver", "greedy", "--format", "json",
    ];
    let first = wall_sim(&args);
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    let second = wall_sim(&args);
    let a: Value = serde_json::from_slice(&first.stdout).expect("json");
    let b: Value = serde_json::from_slice(&second.stdout).expect("json");
    assert_eq!(a["order_hash"], b["order_hash"]);
    assert_eq!(a["width"], 5.75);
    assert_eq!(a["solver"], "greedy");
}

#[test]
fn config_file_feeds_the_plan() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plan.yaml");
    fs::write(
        &path,
        "bond: stretcher\ncourses: 3\nwidth: 4.5\nenvelope:\n  height: 1300\n  width: 100000\n",
    )
    .expect("write config");
    let output = wall_sim(&[
        "plan",
        "--config",
        path.to_str().expect("utf8 path"),
        "--format",
        "json",
    ]);
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["stride_count"], 1);
    assert_eq!(report["status"], "optimal");
    assert_eq!(report["strides"][0].as_array().map(Vec::len), Some(15));
}

#[test]
fn graph_command_prints_stats() {
    let output = wall_sim(&["graph", "--bond", "cross", "--courses", "2"]);
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["stats"]["courses"], 2);
    assert!(report["layout_hash"].is_string());
}

#[test]
fn invalid_width_fails() {
    let output = wall_sim(&["plan", "--bond", "stretcher", "--width", "3.3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid-width") || stderr.contains("width"), "{stderr}");
}
