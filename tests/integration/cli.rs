#[path = "common/mod.rs"]
mod common;

use assert_cmd::Command;
use common::{read_document, write_config};
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::tempdir;

const WEBSOCKET_CONFIG: &str = r#"
version: "1"
proxy:
  output: out/config.json
  clients:
    - user_id: ""
      alter_id: 0
  port: 10086
  transport: 2
  web_socket:
    path: /ray
services:
  web:
    executable: /usr/sbin/nginx
    stop_command: "true"
    probe: shell
    status_command: "echo 4242"
  db:
    executable: /usr/sbin/postgres
    stop_command: "true"
    probe: shell
    status_command: "true"
"#;

fn rayconf() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("rayconf"))
}

#[test]
fn generate_writes_the_configured_output() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(temp.path(), WEBSOCKET_CONFIG);

    rayconf()
        .arg("generate")
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("out/config.json"));

    let document = read_document(&temp.path().join("out/config.json"));
    let stream = &document["inbounds"][0]["streamSettings"];
    assert_eq!(document["inbounds"][0]["port"], 10086);
    assert_eq!(stream["network"], "ws");
    assert_eq!(stream["wsSettings"]["path"], "/ray");
    assert!(stream["wsSettings"].get("headers").is_none());
}

#[test]
fn generate_output_flag_overrides_config() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(temp.path(), WEBSOCKET_CONFIG);
    let custom = temp.path().join("custom/daemon.json");

    rayconf()
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&custom)
        .assert()
        .success();

    assert!(custom.exists());
    assert!(!temp.path().join("out/config.json").exists());
}

#[test]
fn generate_dry_run_prints_without_writing() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(temp.path(), WEBSOCKET_CONFIG);

    rayconf()
        .arg("generate")
        .arg("-c")
        .arg(&config)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(contains("\"wsSettings\"").and(contains("\"freedom\"")));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn generate_rejects_unsupported_transport() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(
        temp.path(),
        "version: \"1\"\nproxy:\n  output: out/config.json\n  port: 10086\n  transport: 99\n",
    );

    rayconf()
        .arg("generate")
        .arg("-c")
        .arg(&config)
        .assert()
        .failure()
        .stderr(contains("Error: Unsupported transport type: 99"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn status_lists_every_service() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(temp.path(), WEBSOCKET_CONFIG);

    rayconf()
        .arg("status")
        .arg("-c")
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("db: stopped").and(contains("web: running")));
}

#[test]
fn status_of_a_single_service() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(temp.path(), WEBSOCKET_CONFIG);

    rayconf()
        .arg("status")
        .arg("-c")
        .arg(&config)
        .arg("-s")
        .arg("db")
        .assert()
        .success()
        .stdout(contains("db: stopped").and(contains("web").not()));
}

#[test]
fn stop_unknown_service_fails() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(temp.path(), WEBSOCKET_CONFIG);

    rayconf()
        .arg("stop")
        .arg("-c")
        .arg(&config)
        .arg("-s")
        .arg("apache")
        .assert()
        .failure()
        .stderr(contains("Service 'apache' is not defined in the config file"));
}

#[test]
fn stop_reports_service_that_keeps_running() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(temp.path(), WEBSOCKET_CONFIG);

    rayconf()
        .arg("stop")
        .arg("-c")
        .arg(&config)
        .arg("-s")
        .arg("web")
        .assert()
        .failure()
        .stderr(contains("Service 'web' is still running after stop"));

    rayconf()
        .arg("stop")
        .arg("-c")
        .arg(&config)
        .arg("-s")
        .arg("db")
        .assert()
        .success()
        .stdout(contains("db: stopped"));
}

#[test]
fn errors_are_reported_with_their_cause() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = write_config(temp.path(), WEBSOCKET_CONFIG);
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "not a directory").expect("failed to write blocker");

    rayconf()
        .arg("generate")
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(blocker.join("config.json"))
        .assert()
        .failure()
        .stderr(
            contains("Error: Failed to create config directory")
                .and(contains("blocker"))
                .and(contains("DirectoryCreation").not()),
        );
}

#[test]
fn config_falls_back_to_yml_in_working_directory() {
    let temp = tempdir().expect("failed to create tempdir");
    std::fs::write(temp.path().join("rayconf.yml"), WEBSOCKET_CONFIG)
        .expect("failed to write config");

    rayconf()
        .current_dir(temp.path())
        .arg("generate")
        .assert()
        .success();

    let document = read_document(&temp.path().join("out/config.json"));
    assert_eq!(document["inbounds"][0]["streamSettings"]["network"], "ws");
}

#[test]
fn yaml_config_takes_precedence_over_yml() {
    let temp = tempdir().expect("failed to create tempdir");
    write_config(temp.path(), WEBSOCKET_CONFIG);
    std::fs::write(temp.path().join("rayconf.yml"), "not: [valid")
        .expect("failed to write config");

    rayconf()
        .current_dir(temp.path())
        .arg("status")
        .arg("-s")
        .arg("db")
        .assert()
        .success()
        .stdout(contains("db: stopped"));
}
