use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn aictl_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("aictl"));
    cmd.env_remove("AICTL_CONFIG")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn unique_temp_path(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("aictl-test-{label}-{nanos}"))
}

fn write_config(label: &str, contents: &str) -> PathBuf {
    let path = unique_temp_path(label);
    fs::write(&path, contents).expect("config file should be writable");
    path
}

fn parse_stdout_json(output: &[u8]) -> Value {
    let text = String::from_utf8(output.to_vec()).expect("stdout should be utf-8");
    serde_json::from_str(text.trim()).expect("stdout should contain valid JSON")
}

const OPENAI_CONFIG: &str = "[ai]\nprovider = \"openai\"\n";

#[test]
fn dry_run_succeeds_without_api_key() {
    let config = write_config("dry-run", OPENAI_CONFIG);
    let assert = aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["--dry-run", "ai", "chat", "hi"])
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["dry_run"], Value::Bool(true));
    assert_eq!(body["provider"], Value::String("openai".to_string()));
    assert_eq!(body["model"], Value::String("gpt-4".to_string()));
    assert_eq!(body["prompt"], Value::String("hi".to_string()));
}

#[test]
fn dry_run_analyze_wraps_the_text_in_its_template() {
    let config = write_config("analyze", OPENAI_CONFIG);
    let assert = aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["--dry-run", "ai", "analyze", "foo"])
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(
        body["prompt"],
        Value::String("Analyze the following text and provide insights:\n\nfoo".to_string())
    );
}

#[test]
fn dry_run_summarize_wraps_the_text_in_its_template() {
    let config = write_config("summarize", OPENAI_CONFIG);
    let assert = aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["--dry-run", "ai", "summarize", "foo"])
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(
        body["prompt"],
        Value::String("Summarize the following text concisely:\n\nfoo".to_string())
    );
}

#[test]
fn dry_run_generate_carries_generation_options() {
    let config = write_config("generate", OPENAI_CONFIG);
    let assert = aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args([
            "--dry-run",
            "ai",
            "generate",
            "--temperature",
            "0.2",
            "--max-tokens",
            "64",
            "write a haiku",
        ])
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["prompt"], Value::String("write a haiku".to_string()));
    assert_eq!(body["max_tokens"], Value::from(64));
    assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
}

#[test]
fn missing_ai_section_is_a_disabled_feature_error() {
    let config = write_config("disabled", "");
    aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["ai", "chat", "hi"])
        .assert()
        .failure()
        .stderr(contains("AI features are not enabled"));
}

#[test]
fn invalid_provider_is_a_config_error() {
    let config = write_config("bad-provider", "[ai]\nprovider = \"hal9000\"\n");
    aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["ai", "chat", "hi"])
        .assert()
        .failure()
        .stderr(contains("failed to parse config file"));
}

#[test]
fn stdin_prompt_is_used_when_no_argument_given() {
    let config = write_config("stdin", OPENAI_CONFIG);
    let assert = aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["--dry-run", "ai", "chat"])
        .write_stdin("from stdin\n")
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["prompt"], Value::String("from stdin".to_string()));
}

#[test]
fn argument_prompt_has_priority_over_stdin() {
    let config = write_config("arg-priority", OPENAI_CONFIG);
    let assert = aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["--dry-run", "ai", "chat", "hi"])
        .write_stdin("ignored\n")
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["prompt"], Value::String("hi".to_string()));
}

#[test]
fn empty_prompt_is_an_explicit_error() {
    let config = write_config("empty-prompt", OPENAI_CONFIG);
    aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["--dry-run", "ai", "chat"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(contains("No prompt provided"));
}

#[test]
fn models_prints_the_configured_model() {
    let config = write_config(
        "models",
        "[ai]\nprovider = \"openai\"\nmodel = \"gpt-4o-mini\"\n",
    );
    aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["ai", "models"])
        .assert()
        .success()
        .stdout(contains("Current model: gpt-4o-mini"));
}

#[test]
fn config_check_reports_the_resolved_path() {
    let config = write_config("check", OPENAI_CONFIG);
    aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(contains("config OK:"));
}

#[test]
fn config_check_fails_for_a_missing_file() {
    let missing = unique_temp_path("missing");
    aictl_cmd()
        .env("AICTL_CONFIG", &missing)
        .args(["config", "check"])
        .assert()
        .failure()
        .stderr(contains("failed to read config file"));
}

#[test]
fn config_show_renders_the_loaded_configuration() {
    let config = write_config("show", OPENAI_CONFIG);
    aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(contains("\"provider\": \"openai\""));
}

#[test]
fn unconfigured_github_integration_fails_its_build() {
    let config = write_config("no-github", "");
    aictl_cmd()
        .env("AICTL_CONFIG", &config)
        .args(["github", "repos"])
        .assert()
        .failure()
        .stderr(contains("github is not configured"));
}

#[test]
fn completion_emits_a_script() {
    aictl_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(contains("aictl"));
}

#[test]
fn version_prints_build_information() {
    aictl_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(contains("aictl version"));
}
