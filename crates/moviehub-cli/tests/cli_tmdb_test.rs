#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a config pointing the client at `server`.
fn write_config(dir: &Path, server: &MockServer) {
    let content = format!(
        "[tmdb]\napi_key = \"test-key\"\nbase_url = \"{}/3/\"\n",
        server.uri()
    );
    std::fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviehub");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("tmdb"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_browse_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviehub");
    cmd.args(["browse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tab"))
        .stdout(predicate::str::contains("--open"));
}

#[test]
fn test_browse_rejects_unknown_route() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviehub");
    cmd.args(["browse", "--open", "/person/1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--open"));
}

#[test]
fn test_tmdb_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviehub");
    cmd.args(["tmdb", "search", "--kind", "movie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_tmdb_rejects_unknown_kind() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviehub");
    cmd.args(["tmdb", "top-rated", "--kind", "person"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--kind"));
}

#[test]
fn test_tmdb_top_rated_requires_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviehub");
    cmd.env_remove("TMDB_API_KEY")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["tmdb", "top-rated", "--kind", "movie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB API key is required"));
}

#[test]
fn test_config_init_writes_and_refuses_overwrite() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let dir_arg = dir.path().to_str().unwrap();

    // Act & Assert
    let mut first = cargo_bin_cmd!("moviehub");
    first
        .args(["--dir", dir_arg, "config", "init", "--api-key", "abc123"])
        .assert()
        .success();
    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("api_key = \"abc123\""));
    assert!(written.contains("debounce_ms = 1000"));

    let mut second = cargo_bin_cmd!("moviehub");
    second
        .args(["--dir", dir_arg, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tmdb_top_rated_prints_ten_rows() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/top_rated"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tmdb/movie_top_rated.json"
        )))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviehub");
    cmd.env_remove("TMDB_API_KEY")
        .env("RUST_LOG", "info")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["tmdb", "top-rated", "--kind", "movies"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top 10 Movies"))
        .stdout(predicate::str::contains("The Godfather"))
        .stdout(predicate::str::contains("Fight Club").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tmdb_details_not_found_fails() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/999999"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"success":false,"status_code":34,"status_message":"The resource you requested could not be found."}"#,
        ))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server);

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviehub");
    cmd.env_remove("TMDB_API_KEY")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["tmdb", "details", "--kind", "movie", "--id", "999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 404"));
}
