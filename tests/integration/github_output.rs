//! End-to-end tests of the GitHub output contract against real files.

use std::path::Path;
use tempfile::TempDir;
use tfci::command::{CommandContext, Status};
use tfci::environment::{
    build_environment, CiEnvironment, ConsoleEcho, EnvironmentOptions, GitHubContext, OutputOpts,
    OutputSet, OutputValue, PlatformSelection, PlatformType,
};
use tfci::error::OutputError;

use crate::integration::{env_from, parse_output_file};

fn github_context(output: &Path) -> GitHubContext {
    let output = output.to_string_lossy().to_string();
    let env = env_from(&[
        ("GITHUB_ACTIONS", "true"),
        ("GITHUB_RUN_ID", "42"),
        ("GITHUB_RUN_NUMBER", "7"),
        ("GITHUB_SHA", "abc"),
        ("GITHUB_OUTPUT", output.as_str()),
    ]);
    GitHubContext::from_env(&env, ConsoleEcho::disabled())
}

#[test]
fn test_single_line_outputs_written_exactly() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output");
    let mut ctx = github_context(&path);

    ctx.merge_outputs(
        OutputSet::new()
            .with("status", "Success")
            .with("plan_id", "plan-123"),
    );
    ctx.close_output().unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "status=Success\nplan_id=plan-123\n"
    );
    assert_eq!(ctx.identity().sha_short(), "abc");
}

#[test]
fn test_sibling_values_survive_hostile_payloads() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output");
    let mut ctx = github_context(&path);
    let delimiter = ctx.delimiter().as_str().to_string();

    let hostile = format!("first\n{}\nstatus=Hijacked\nkey<<EOF\n", delimiter);
    ctx.merge_outputs(
        OutputSet::new()
            .with("payload", hostile.as_str())
            .with("status", "Success")
            .with("quoted", r#"say "hi" = 1"#),
    );
    ctx.close_output().unwrap();

    let entries = parse_output_file(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(
        entries,
        vec![
            ("payload".to_string(), hostile),
            ("status".to_string(), "Success".to_string()),
            ("quoted".to_string(), r#"say "hi" = 1"#.to_string()),
        ]
    );
}

#[test]
fn test_two_invocations_append_to_shared_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output");

    let mut first = github_context(&path);
    first.merge_outputs(OutputSet::new().with("configuration_version_id", "cv-1"));
    first.close_output().unwrap();

    let mut second = github_context(&path);
    second.merge_outputs(OutputSet::new().with("run_id", "run-1"));
    second.close_output().unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "configuration_version_id=cv-1\nrun_id=run-1\n"
    );
}

#[test]
fn test_second_close_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output");
    let mut ctx = github_context(&path);

    ctx.merge_outputs(OutputSet::new().with("status", "Success"));
    ctx.close_output().unwrap();
    let report = ctx.close_output().unwrap();

    assert!(report.written.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "status=Success\n");
}

#[test]
fn test_unwritable_destination_reports_open_failure_and_clears() {
    let temp_dir = TempDir::new().unwrap();
    // A directory cannot be opened for appending.
    let mut ctx = github_context(temp_dir.path());
    ctx.merge_outputs(OutputSet::new().with("status", "Success"));

    let err = ctx.close_output().unwrap_err();
    assert!(matches!(err, OutputError::SinkWrite { .. }));
    assert!(ctx.pending_outputs().is_empty());
}

#[test]
fn test_command_context_payload_block() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output");
    let mut commands = CommandContext::new(Box::new(github_context(&path)));

    commands.add_output("configuration_version_id", "cv-abc");
    commands.add_output_with_opts(
        "payload",
        "{\"id\":\"cv-abc\"}",
        OutputOpts {
            multiline: true,
            stdout: false,
            platform_file: true,
        },
    );
    commands.finish(Status::Success).unwrap();

    let entries = parse_output_file(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], ("configuration_version_id".into(), "cv-abc".into()));
    assert_eq!(entries[1], ("payload".into(), "{\"id\":\"cv-abc\"}".into()));
    assert_eq!(entries[2], ("status".into(), "Success".into()));

    let raw = std::fs::read_to_string(&path).unwrap();
    let delim = format!("GHDELIM_42_7_{}", std::process::id());
    assert!(raw.contains(&format!("payload<<{}\n", delim)));
}

#[test]
fn test_factory_builds_github_from_signature() {
    let env = env_from(&[("GITHUB_ACTIONS", "true"), ("GITHUB_RUN_ID", "9")]);
    let options = EnvironmentOptions {
        platform: PlatformSelection::Auto,
        echo_stdout: false,
    };
    let ctx = build_environment(&env, &options);
    assert_eq!(ctx.platform(), PlatformType::GithubActions);
    assert_eq!(ctx.identity().id(), "gha-9-");
}

#[test]
fn test_hidden_values_stay_out_of_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("output");
    let mut ctx = github_context(&path);
    let console_only = OutputValue::with_opts(
        "visible in logs only",
        OutputOpts {
            platform_file: false,
            ..Default::default()
        },
    );
    ctx.merge_outputs(
        OutputSet::new()
            .with("note", console_only)
            .with("status", "Success"),
    );
    let report = ctx.close_output().unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "status=Success\n");
}
