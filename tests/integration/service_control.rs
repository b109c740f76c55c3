#[path = "common/mod.rs"]
mod common;

use std::path::PathBuf;

use rayconf::{
    error::SupervisorError,
    supervisor::{ProbeMode, ServiceSpec, ServiceSupervisor},
};

fn shell_service(status: &str, stop: &str) -> ServiceSupervisor {
    ServiceSupervisor::new(ServiceSpec {
        name: "web".into(),
        executable: PathBuf::from("/usr/sbin/nginx"),
        stop_command: stop.into(),
        probe: ProbeMode::Shell,
        status_command: Some(status.into()),
    })
}

#[test]
fn shell_probe_counts_pid_lines() {
    assert!(shell_service("echo 4242", "true").is_running().unwrap());
    assert!(!shell_service("printf '  \\n'", "true").is_running().unwrap());
}

#[test]
fn shell_probe_tolerates_failure_with_output() {
    let supervisor = shell_service("echo 4242; exit 1", "true");
    assert!(supervisor.is_running().unwrap());
}

#[test]
fn shell_probe_surfaces_silent_failure() {
    let err = shell_service("exit 3", "true").is_running().unwrap_err();
    match err {
        SupervisorError::StatusQueryFailed { service, source } => {
            assert_eq!(service, "web");
            assert!(source.to_string().contains("status 3"));
        }
        other => panic!("expected status query failure, got {other:?}"),
    }
}

#[test]
fn stop_on_stopped_service_succeeds() {
    shell_service("true", "true").stop().unwrap();
}

#[test]
fn stop_command_silent_failure_is_reported() {
    let err = shell_service("true", "exit 2").stop().unwrap_err();
    assert!(matches!(err, SupervisorError::StopCommandFailed { .. }));
}

#[test]
fn stop_verification_failure_is_reported() {
    let err = shell_service("echo 4242", "true").stop().unwrap_err();
    assert!(matches!(err, SupervisorError::StopVerificationFailed { .. }));
    assert_eq!(err.to_string(), "Service 'web' is still running after stop");
}

#[cfg(target_os = "linux")]
#[test]
fn native_probe_tracks_a_real_process() {
    use common::{SpawnedProcess, wait_until};
    use std::{fs, path::Path, process::Command};
    use tempfile::tempdir;

    let temp = tempdir().expect("failed to create tempdir");
    let script = temp.path().join("rayconf-native-target.sh");
    fs::write(&script, "while true; do sleep 1; done\n").expect("write script");

    let process = SpawnedProcess::new(
        Command::new("sh")
            .arg(&script)
            .spawn()
            .expect("spawn target process"),
    );
    let pid = process.pid();

    let supervisor = ServiceSupervisor::new(ServiceSpec {
        name: "native-target".into(),
        executable: script.clone(),
        stop_command: format!(
            "kill {pid}; for _ in $(seq 1 100); do [ -e /proc/{pid} ] || exit 0; sleep 0.05; done"
        ),
        probe: ProbeMode::Native,
        status_command: None,
    });

    wait_until("target process to appear", || {
        supervisor.is_running().unwrap_or(false)
    });

    supervisor.stop().expect("stop target process");
    assert!(!supervisor.is_running().unwrap());
    assert!(!Path::new(&format!("/proc/{pid}")).exists());
}
