use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn lintbridge(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lintbridge").unwrap();
    cmd.current_dir(dir)
        .env_remove("GITHUB_STEP_SUMMARY")
        .env_remove("GITHUB_REPOSITORY");
    cmd
}

fn sarif_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).unwrap()
}

#[test]
fn formats_lists_builtins() {
    let dir = tempfile::tempdir().unwrap();
    lintbridge(dir.path())
        .arg("formats")
        .assert()
        .success()
        .stdout("flake8\nmdl\nmypy\npylint\nsarif\n");
}

#[test]
fn schema_is_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = lintbridge(dir.path()).arg("schema").output().unwrap();
    assert!(output.status.success());
    let schema = sarif_json(&output.stdout);
    assert!(schema["properties"]["tool_name"].is_object());
}

#[test]
fn flake8_to_sarif_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let output = lintbridge(dir.path())
        .args(["sarif", "--format", "flake8", "--tool-name", "flake8", "--input"])
        .arg(fixture("flake8.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let log = sarif_json(&output.stdout);
    assert_eq!(log["version"], "2.1.0");
    assert_eq!(
        log["$schema"],
        "http://json.schemastore.org/sarif-2.1.0-rtm.6"
    );

    let run = &log["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "flake8");
    assert_eq!(run["tool"]["driver"]["rules"], serde_json::json!([]));

    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["ruleId"], "E111");
    assert_eq!(
        results[0]["message"]["text"],
        "indentation is not a multiple of four"
    );
    let location = &results[2]["locations"][0]["physicalLocation"];
    assert_eq!(location["artifactLocation"]["uri"], "src/util.py");
    assert_eq!(location["region"]["startLine"], 4);
    assert!(results[0].get("level").is_none());
}

#[test]
fn pylint_to_sarif_file_dedups_rules() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pylint.sarif");

    lintbridge(dir.path())
        .args(["sarif", "--format", "pylint", "--input"])
        .arg(fixture("pylint.json"))
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let log = sarif_json(&std::fs::read(&out).unwrap());
    let run = &log["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "lintbridge");

    let rules = run["tool"]["driver"]["rules"].as_array().unwrap();
    let ids: Vec<_> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["C0114", "E0602", "W0611"]);
    assert_eq!(rules[1]["name"], "undefined-variable");

    let results = run["results"].as_array().unwrap();
    assert_eq!(results[0]["level"], "note");
    assert_eq!(results[1]["level"], "error");
    assert_eq!(results[3]["ruleIndex"], 1);
    assert_eq!(
        results[1]["locations"][0]["physicalLocation"]["region"]["startColumn"],
        5
    );
}

#[test]
fn sarif_input_round_trips_through_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let first = lintbridge(dir.path())
        .args(["sarif", "--format", "mypy", "--input"])
        .arg(fixture("mypy.txt"))
        .output()
        .unwrap();
    assert!(first.status.success());

    let second = lintbridge(dir.path())
        .args(["sarif", "--format", "sarif", "--input", "-"])
        .write_stdin(first.stdout.clone())
        .output()
        .unwrap();
    assert!(second.status.success());
    assert_eq!(sarif_json(&first.stdout), sarif_json(&second.stdout));
}

#[test]
fn rooted_uris_use_analysis_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = lintbridge(dir.path())
        .args([
            "sarif",
            "--format",
            "mdl",
            "--analysis-path",
            "site",
            "--rooted-uris",
            "--input",
        ])
        .arg(fixture("mdl.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let log = sarif_json(&output.stdout);
    let results = log["runs"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[1]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
        "site/docs/guide.md"
    );
}

#[test]
fn custom_pattern_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("lintbridge.yaml"),
        "tool_name: shellcheck\n\
         pattern: '^(?P<path>[^:]+):(?P<line>\\d+):(?P<col>\\d+): (?P<level>\\w+): (?P<msg>.+) \\[(?P<id>SC\\d+)\\]$'\n\
         level_map:\n  error: error\n  warning: warning\n  info: note\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("out.txt"),
        "run.sh:3:7: info: Double quote to prevent globbing. [SC2086]\n",
    )
    .unwrap();

    let output = lintbridge(dir.path())
        .args(["sarif", "--input", "out.txt"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let log = sarif_json(&output.stdout);
    assert_eq!(log["runs"][0]["tool"]["driver"]["name"], "shellcheck");
    let result = &log["runs"][0]["results"][0];
    assert_eq!(result["level"], "note");
    assert_eq!(result["ruleId"], "SC2086");
}

#[test]
fn unknown_format_fails() {
    let dir = tempfile::tempdir().unwrap();
    lintbridge(dir.path())
        .args(["sarif", "--format", "eslint", "--input"])
        .arg(fixture("flake8.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized input format: eslint"));
}

#[test]
fn missing_format_fails() {
    let dir = tempfile::tempdir().unwrap();
    lintbridge(dir.path())
        .args(["sarif", "--input"])
        .arg(fixture("flake8.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input format given"));
}

#[test]
fn invalid_pattern_fails() {
    let dir = tempfile::tempdir().unwrap();
    lintbridge(dir.path())
        .args(["sarif", "--pattern", "(?P<path>", "--input"])
        .arg(fixture("flake8.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn malformed_pylint_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    lintbridge(dir.path())
        .args(["sarif", "--format", "pylint", "--input", "-"])
        .write_stdin("[{\"type\": ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON"));
}

#[test]
fn summary_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    lintbridge(dir.path())
        .args(["summary", "--format", "pylint", "--tool-name", "pylint", "--input"])
        .arg(fixture("pylint.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("## pylint results"))
        .stdout(predicate::str::contains(
            "| error | src/app.py:4:5 | E0602 (undefined-variable) | Undefined variable 'foo' |",
        ));
}

#[test]
fn summary_appends_to_step_summary() {
    let dir = tempfile::tempdir().unwrap();
    let summary = dir.path().join("step_summary.md");
    std::fs::write(&summary, "# Earlier step\n").unwrap();

    lintbridge(dir.path())
        .env("GITHUB_STEP_SUMMARY", &summary)
        .args(["summary", "--format", "mdl", "--input"])
        .arg(fixture("mdl.txt"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&summary).unwrap();
    assert!(content.starts_with("# Earlier step\n## lintbridge results"));
    assert!(content.contains("MD041 (first-line-heading)"));
}

#[test]
fn comment_requires_repo() {
    let dir = tempfile::tempdir().unwrap();
    lintbridge(dir.path())
        .args(["comment", "--format", "flake8", "--pr", "3", "--input"])
        .arg(fixture("flake8.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No repository given"));
}

/// Stand-in for `gh` that serves one stale comment and records every call
#[cfg(unix)]
fn fake_gh(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
echo "$@" >> "{dir}/calls.log"
case "$1 $2 $3" in
  "pr diff "*) cat "{diff}" ;;
  "api --method GET")
    if [ -f "{dir}/deleted" ]; then printf '%s\n' '[]'
    else printf '%s\n' '[{{"id": 7, "body": "<!-- lintbridge:flake8 -->\nold"}}, {{"id": 8, "body": "looks good"}}]'
    fi ;;
  "api --method DELETE") touch "{dir}/deleted" ;;
  "api --method POST") cat > "{dir}/review.json" ;;
esac
"#,
        dir = dir.display(),
        diff = fixture("app.diff").display(),
    );

    let path = dir.join("gh");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn comment_replaces_stale_review_comments() {
    let dir = tempfile::tempdir().unwrap();
    let gh = fake_gh(dir.path());
    std::fs::write(
        dir.path().join("lintbridge.yaml"),
        format!(
            "format: flake8\ntool_name: flake8\ngithub:\n  gh_binary: {}\nretry:\n  max_attempts: 1\n",
            gh.display()
        ),
    )
    .unwrap();

    lintbridge(dir.path())
        .env("GITHUB_REPOSITORY", "octo/widgets")
        .args(["comment", "--pr", "42", "--input"])
        .arg(fixture("flake8.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "octo/widgets#42: removed 1 old comments, posted 1",
        ));

    let calls = std::fs::read_to_string(dir.path().join("calls.log")).unwrap();
    let calls: Vec<_> = calls.lines().collect();
    assert_eq!(
        calls,
        vec![
            "api --method GET repos/octo/widgets/pulls/42/comments?per_page=100&page=1",
            "api --method DELETE repos/octo/widgets/pulls/comments/7",
            "api --method GET repos/octo/widgets/pulls/42/comments?per_page=100&page=1",
            "pr diff 42 --repo octo/widgets",
            "api --method POST repos/octo/widgets/pulls/42/reviews --input -",
        ]
    );

    let review: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("review.json")).unwrap())
            .unwrap();
    assert_eq!(review["event"], "COMMENT");
    assert_eq!(
        review["body"],
        "<!-- lintbridge:flake8 -->\nlintbridge found 1 diagnostics on changed lines."
    );
    let comments = review["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["path"], "src/app.py");
    assert_eq!(comments[0]["line"], 2);
    assert_eq!(comments[0]["side"], "RIGHT");
    assert_eq!(
        comments[0]["body"],
        "<!-- lintbridge:flake8 -->\nindentation is not a multiple of four [flake8:E111]"
    );
}
