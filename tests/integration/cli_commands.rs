//! Integration tests that run the tfci binary inside a simulated CI step.

use crate::integration::{parse_output_file, TfciRun};

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_output_command_writes_github_output() {
    let run = TfciRun::new().github();
    let output = run.run(&[
        "output",
        "--set",
        "plan_id=plan-123",
        "--json",
        r#"payload={"id": "plan-123"}"#,
    ]);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let entries = parse_output_file(&run.output_content());
    assert_eq!(
        entries,
        vec![
            ("status".to_string(), "Success".to_string()),
            ("plan_id".to_string(), "plan-123".to_string()),
            ("payload".to_string(), r#"{"id":"plan-123"}"#.to_string()),
        ]
    );

    let out = stdout(&output);
    assert!(out.contains("::set-output name=status::Success"));
    assert!(out.contains("::set-output name=plan_id::plan-123"));
    assert!(!out.contains("::set-output name=payload::"));
    assert!(out.contains("Wrote 3 output(s)"));
}

#[test]
fn test_output_command_multiline_from_file() {
    let run = TfciRun::new().github();
    let plan = run.workspace().join("plan.txt");
    std::fs::write(&plan, "line1\nline2").unwrap();
    let raw = format!("plan={}", plan.display());

    let output = run.run(&["output", "--file", &raw, "--status", "error"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let content = run.output_content();
    assert!(content.starts_with("status=Error\nplan<<GHDELIM_42_7_"));
    assert!(content.contains("\nline1\nline2\nGHDELIM_42_7_"));
    let entries = parse_output_file(&content);
    assert_eq!(entries[1], ("plan".to_string(), "line1\nline2".to_string()));
}

#[test]
fn test_output_command_falls_back_to_github_env() {
    let run = TfciRun::new().github().without("GITHUB_OUTPUT");
    let fallback = run.workspace().join("github_env");
    let run = run.var("GITHUB_ENV", &fallback.to_string_lossy());

    let output = run.run(&["--log-level", "warn", "output", "--set", "a=1"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(
        std::fs::read_to_string(&fallback).unwrap(),
        "status=Success\na=1\n"
    );
    assert!(stderr(&output).contains("GITHUB_OUTPUT environment variable is not set"));
}

#[test]
fn test_output_command_without_destination_fails() {
    let run = TfciRun::new().github().without("GITHUB_OUTPUT");
    let output = run.run(&["output", "--set", "a=1"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No output destination configured"));
    assert!(!run.output_path().exists());
}

#[test]
fn test_output_command_rejects_bad_key() {
    let run = TfciRun::new().github();
    let output = run.run(&["output", "--set", "bad key=1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid argument"));
    assert!(!run.output_path().exists());
}

#[test]
fn test_no_echo_suppresses_set_output() {
    let run = TfciRun::new().github();
    let output = run.run(&["--no-echo", "output", "--set", "a=1"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(!stdout(&output).contains("::set-output"));
    assert_eq!(run.output_content(), "status=Success\na=1\n");
}

#[test]
fn test_identity_json() {
    let run = TfciRun::new().github();
    let output = run.run(&["identity", "--format", "json"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["platform"], "github-actions");
    assert_eq!(value["id"], "gha-42-7");
    assert_eq!(value["run_id"], "42");
    assert_eq!(value["run_number"], "7");
    assert_eq!(value["sha_short"], "abcdef1");
    assert_eq!(value["ref_type"], "branch");
    assert_eq!(value["write_dir"], "/tmp/runner");
}

#[test]
fn test_generic_platform_echoes_only() {
    let run = TfciRun::new();
    let output = run.run(&["output", "--set", "a=1"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("::set-output name=a::1"));
    assert!(out.contains("No platform output file"));
}

#[test]
fn test_logs_stay_off_stdout() {
    let run = TfciRun::new().github().var("TF_LOG", "DEBUG");
    let output = run.run(&["identity", "--format", "json"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(serde_json::from_str::<serde_json::Value>(&stdout(&output)).is_ok());
    assert!(stderr(&output).contains("Starting tfci"));
}

#[test]
fn test_config_command_reflects_workspace_file() {
    let run = TfciRun::new();
    let config_dir = run.workspace().join(".tfci");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[output]\nplatform = \"github\"\n").unwrap();

    let output = run.run(&["config"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(stdout(&output).contains("platform = \"github\""));
}
