use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::{json, Value};
use tempfile::tempdir;

fn run_veoarch(cwd: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_veoarch"))
        .current_dir(cwd)
        .env_remove("GEMINI_API_KEY")
        .args(args)
        .output()
        .expect("veoarch command should run")
}

#[test]
fn options_json_output_is_stable_and_complete() {
    let dir = tempdir().expect("tempdir should create");

    let first = run_veoarch(dir.path(), &["options", "--json"]);
    assert!(first.status.success(), "options --json should succeed");
    let second = run_veoarch(dir.path(), &["options", "--json"]);
    assert_eq!(first.stdout, second.stdout, "output should be stable");

    let parsed: Value = serde_json::from_slice(&first.stdout).expect("json should parse");
    let durations = parsed["durations"].as_array().expect("durations array");
    let table: Vec<(String, u64)> = durations
        .iter()
        .map(|entry| {
            (
                entry["keyword"].as_str().expect("keyword").to_owned(),
                entry["segments"].as_u64().expect("segments"),
            )
        })
        .collect();
    assert_eq!(
        table,
        vec![
            ("15s".to_owned(), 3),
            ("30s".to_owned(), 5),
            ("1m".to_owned(), 10),
            ("2m".to_owned(), 18),
        ]
    );
    assert_eq!(parsed["styles"].as_array().expect("styles").len(), 6);
}

#[test]
fn invalid_duration_fails_with_the_coded_message() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_veoarch(dir.path(), &["scene", "a harbor", "--duration", "45s"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("INVALID_DURATION"));
    assert!(stderr.contains("45s"));
}

#[test]
fn empty_scene_form_is_a_usage_error_before_any_credential_check() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_veoarch(dir.path(), &["scene"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("EMPTY_FORM"));
    assert!(
        !stderr.contains("MISSING_API_KEY"),
        "form validation should run before the credential lookup"
    );
}

#[test]
fn missing_credential_is_surfaced_as_the_generic_failure() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_veoarch(dir.path(), &["scene", "a harbor at dawn"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to generate prompt"));
    assert!(stderr.contains("MISSING_API_KEY"));
}

#[test]
fn show_renders_a_saved_result_offline() {
    let dir = tempdir().expect("tempdir should create");
    let result_path = dir.path().join("result.json");
    fs::write(
        &result_path,
        json!({
            "title": "Harbor Dawn",
            "technical": {
                "aspect_ratio": "16:9",
                "camera_movement": "slow dolly",
                "lens_type": "35mm"
            },
            "audio": { "music_theme": "Cinematic", "audio_prompt": "low strings" },
            "prompt_components": {
                "subject_action": "a",
                "environment_context": "b",
                "lighting_atmosphere": "c",
                "camera_technical": "d",
                "texture_details": "e"
            },
            "timeline": [
                { "timestamp": "00:00", "description": "boats sway" }
            ],
            "veo_optimized_prompt": "[STYLE: CINEMATIC] harbor at dawn"
        })
        .to_string(),
    )
    .expect("result should write");

    let board = run_veoarch(dir.path(), &["show", "result.json"]);
    assert!(board.status.success(), "show should succeed");
    let stdout = String::from_utf8_lossy(&board.stdout);
    assert!(stdout.contains("VEO 3 MASTER PROMPT"));
    assert!(stdout.contains("[1] 00:00  boats sway"));

    let field = run_veoarch(
        dir.path(),
        &["show", "result.json", "--field", "timeline.0.description"],
    );
    assert!(field.status.success(), "field extraction should succeed");
    assert_eq!(
        String::from_utf8_lossy(&field.stdout).trim(),
        "boats sway"
    );
}

#[test]
fn show_rejects_malformed_results_without_panicking() {
    let dir = tempdir().expect("tempdir should create");
    fs::write(dir.path().join("broken.json"), "{ nope").expect("file should write");

    let output = run_veoarch(dir.path(), &["show", "broken.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to generate prompt") || stderr.contains("not valid JSON"));
}
