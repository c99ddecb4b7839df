use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's config, data and API key.
fn flipperslog(dir: &TempDir) -> Command {
    let config = dir.path().join("config.json");
    if !config.exists() {
        std::fs::write(&config, "{}").unwrap();
    }

    let mut cmd = Command::cargo_bin("flipperslog").unwrap();
    cmd.env_remove("ANTHROPIC_API_KEY")
        .arg("--config")
        .arg(&config)
        .arg("--data-dir")
        .arg(dir.path().join("data"));
    cmd
}

#[test]
fn extract_reads_fenced_reply_from_stdin() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["extract", "--format", "json"])
        .write_stdin("```json\n{\"score\": 42000000, \"tableName\": \"Test Table\"}\n```")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tableName\": \"Test Table\""))
        .stdout(predicate::str::contains("42000000"));
}

#[test]
fn extract_reads_reply_from_file() {
    let dir = TempDir::new().unwrap();
    let reply = dir.path().join("reply.txt");
    std::fs::write(
        &reply,
        "Here is the result:\n{\"score\": 3542040, \"tableName\": \"Medieval Madness\"}\nHope this helps!",
    )
    .unwrap();

    flipperslog(&dir)
        .args(["extract", "--format", "csv"])
        .arg(&reply)
        .assert()
        .success()
        .stdout(predicate::str::contains("3542040,Medieval Madness"));
}

#[test]
fn extract_fails_without_json() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .arg("extract")
        .write_stdin("Sorry, I could not read the score from this image.")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no JSON object found in response"));
}

#[test]
fn extract_outcome_falls_back_to_placeholder() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["extract", "--outcome", "--format", "json"])
        .write_stdin(r#"{"score": "3542040"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"isMockData\": true"))
        .stdout(predicate::str::contains("Medieval Madness"))
        .stdout(predicate::str::contains("score is missing or not a number"));
}

#[test]
fn read_without_api_key_reports_placeholder() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["read", "--format", "json", "scoreboard.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"isMockData\": true"))
        .stdout(predicate::str::contains("no API key configured"));
}

#[test]
fn read_refuses_to_save_placeholder() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["read", "--save", "scoreboard.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not saving placeholder reading"));
}

#[test]
fn scores_add_and_list() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["scores", "add", "42,000,000", "--table", "Medieval Madness", "--date", "2024-10-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added score"));

    flipperslog(&dir)
        .args(["scores", "list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medieval Madness,42000000,2024-10-10"));

    flipperslog(&dir)
        .args(["tables", "recent", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Medieval Madness\""));
}

#[test]
fn scores_add_rejects_bad_input() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["scores", "add", "none"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid score"));

    flipperslog(&dir)
        .args(["scores", "add", "100", "--date", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn scores_tagged_with_active_venue() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["venues", "use", "42", "Ice Box Arcade"])
        .assert()
        .success();

    flipperslog(&dir)
        .args(["venues", "current"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ice Box Arcade (42)"));

    flipperslog(&dir)
        .args(["scores", "add", "1000", "--table", "Attack from Mars"])
        .assert()
        .success();

    flipperslog(&dir)
        .args(["scores", "list", "--venue", "42", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"venueId\": 42"));

    flipperslog(&dir).args(["venues", "clear"]).assert().success();

    flipperslog(&dir)
        .args(["venues", "current"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active venue."));
}

#[test]
fn delete_unknown_score_fails() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["scores", "delete", "123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("score not found"));
}

#[test]
fn tables_samples() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["tables", "samples"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medieval Madness"));
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();

    flipperslog(&dir)
        .args(["config", "set", "venues.search_radius_km", "2.5"])
        .assert()
        .success();

    flipperslog(&dir)
        .args(["config", "get", "venues.search_radius_km"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.5"));

    flipperslog(&dir)
        .args(["config", "set", "venues.no_such_key", "1"])
        .assert()
        .failure();
}
