#![allow(dead_code)]

use std::{
    fs,
    io,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use serde_json::Value;

/// Writes `body` as `rayconf.yaml` inside `dir` and returns its path.
pub fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("rayconf.yaml");
    fs::write(&path, body).expect("failed to write config");
    path
}

/// Reads a generated daemon config back as JSON.
pub fn read_document(path: &Path) -> Value {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read {:?}: {err}", path));
    serde_json::from_str(&content).expect("generated config is not valid JSON")
}

/// Polls `check` until it returns true or five seconds pass.
pub fn wait_until<F: FnMut() -> bool>(what: &str, mut check: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if check() {
            return;
        }

        if Instant::now() >= deadline {
            panic!("Timed out waiting for {what}");
        }

        thread::sleep(Duration::from_millis(100));
    }
}

/// A spawned process reaped on a background thread and killed on drop if it is
/// still alive, so a failing test never leaves it behind.
pub struct SpawnedProcess {
    pid: u32,
    reaper: Option<JoinHandle<io::Result<ExitStatus>>>,
}

impl SpawnedProcess {
    pub fn new(mut child: Child) -> Self {
        let pid = child.id();
        let reaper = thread::spawn(move || child.wait());
        Self {
            pid,
            reaper: Some(reaper),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for SpawnedProcess {
    fn drop(&mut self) {
        let Some(reaper) = self.reaper.take() else {
            return;
        };

        if !reaper.is_finished() {
            let _ = Command::new("kill")
                .arg("-9")
                .arg(self.pid.to_string())
                .status();
        }
        let _ = reaper.join();
    }
}
