//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("glossa")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

const ARTICLE_URL: &str = "https://www.dailyledger.example/local/riverside-park";

#[test]
fn test_cli_file_input() {
    cmd().arg(get_fixture_path("news_article.html")).assert().success();
}

#[test]
fn test_cli_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("news_article.html")).unwrap();
    cmd()
        .arg("-")
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("Riverside Park"));
}

#[test]
fn test_cli_json_output() {
    let output = cmd().args(["--url", ARTICLE_URL, &get_fixture_path("news_article.html")]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "City Council Approves New Riverside Park");
    assert_eq!(json["source"], "www.dailyledger.example");
    assert_eq!(json["paragraphs"].as_array().unwrap().len(), 3);
    assert_eq!(json["paragraphs"][0]["sentences"][0]["words"][0], "The");
}

#[test]
fn test_cli_default_source() {
    cmd()
        .arg(get_fixture_path("news_article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""source":"localhost""#));
}

#[test]
fn test_cli_pretty_json() {
    cmd()
        .args(["--pretty", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n"));
}

#[test]
fn test_cli_text_format() {
    cmd()
        .args(["-f", "text", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("City Council Approves New Riverside Park\n\n"))
        .stdout(predicate::str::contains(
            "Mr. Alvarez, who chairs the parks committee, said the project would open next summer.\nDr. Chen",
        ));
}

#[test]
fn test_cli_tree_format() {
    cmd()
        .args(["-f", "tree", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("[2.1] Will the budget hold?"))
        .stdout(predicate::str::contains("Will · the · budget · hold"));
}

#[test]
fn test_cli_invalid_format() {
    cmd()
        .args(["-f", "markdown", &get_fixture_path("news_article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("article.json");

    cmd()
        .args(["-o", output.to_str().unwrap()])
        .arg(get_fixture_path("news_article.html"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"paragraphs\""));
}

#[test]
fn test_cli_invalid_file() {
    cmd()
        .arg("nonexistent.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_cli_empty_content() {
    cmd().arg(get_fixture_path("empty_content.html")).assert().failure();
}

#[test]
fn test_cli_navigation_page() {
    cmd()
        .arg(get_fixture_path("navigation_page.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not readable"));
}

#[test]
fn test_cli_invalid_source_url() {
    cmd()
        .args(["--url", "not a url", &get_fixture_path("news_article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL"));
}

#[test]
fn test_cli_min_score() {
    cmd()
        .args(["--min-score", "1000", "--strict", &get_fixture_path("news_article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not readable"));
}

#[test]
fn test_cli_min_score_falls_back() {
    cmd()
        .args(["--min-score", "1000", "-f", "text", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Will the budget hold?"));
}

#[test]
fn test_cli_char_threshold() {
    cmd()
        .args(["--char-threshold", "100", &get_fixture_path("news_article.html")])
        .assert()
        .success();
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Glossa"))
        .stderr(predicate::str::contains("Sentences:"));
}
