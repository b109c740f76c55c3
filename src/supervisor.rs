//! Status and stop control for an externally managed service.
//!
//! The service is never started or tracked here. Each call asks the operating
//! system afresh, either through the process table or through a shell pipeline.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use strum_macros::{AsRefStr, EnumString};
use sysinfo::{Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::error::SupervisorError;
use crate::shell::{CommandRunner, ShellRunner};

/// How a service's running state is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProbeMode {
    /// Enumerate the process table directly.
    #[default]
    Native,
    /// Run a process listing pipeline and count the PID lines it prints.
    Shell,
}

/// Everything needed to query and stop one service.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    /// Name used in logs and errors.
    pub name: String,
    /// Executable path used to recognise the service's processes.
    pub executable: PathBuf,
    /// The service's own stop command, run through the shell.
    pub stop_command: String,
    /// Probe used by [`ServiceSupervisor::is_running`].
    pub probe: ProbeMode,
    /// Listing pipeline for [`ProbeMode::Shell`]. Defaults to a `ps | grep` pipeline.
    pub status_command: Option<String>,
}

impl ServiceSpec {
    /// Builds a spec from a named entry of the config file.
    pub fn from_config(name: &str, config: &ServiceConfig) -> Self {
        Self {
            name: name.to_string(),
            executable: config.executable.clone(),
            stop_command: config.stop_command.clone(),
            probe: config.probe.unwrap_or_default(),
            status_command: config.status_command.clone(),
        }
    }

    /// Shell pipeline printing one PID per line for processes running the executable.
    pub fn listing_command(&self) -> String {
        self.status_command.clone().unwrap_or_else(|| {
            format!(
                "ps -ef | grep '{}' | grep -v grep | awk '{{print $2}}'",
                self.executable.display()
            )
        })
    }
}

/// Queries and stops a single external service.
pub struct ServiceSupervisor<R = ShellRunner> {
    spec: ServiceSpec,
    runner: R,
}

impl ServiceSupervisor {
    /// Creates a supervisor that runs commands through `sh -c`.
    pub fn new(spec: ServiceSpec) -> Self {
        Self::with_runner(spec, ShellRunner)
    }
}

impl<R: CommandRunner> ServiceSupervisor<R> {
    /// Creates a supervisor with a custom command runner.
    pub fn with_runner(spec: ServiceSpec, runner: R) -> Self {
        Self { spec, runner }
    }

    /// The service this supervisor controls.
    pub fn spec(&self) -> &ServiceSpec {
        &self.spec
    }

    /// Returns whether at least one process of the service is alive.
    pub fn is_running(&self) -> Result<bool, SupervisorError> {
        debug!(
            "Probing service '{}' ({} probe)",
            self.spec.name,
            self.spec.probe.as_ref()
        );
        let running = match self.spec.probe {
            ProbeMode::Native => {
                let pids = native_pids(&self.spec.executable);
                debug!("Service '{}' matched PIDs {:?}", self.spec.name, pids);
                !pids.is_empty()
            }
            ProbeMode::Shell => self.shell_probe()?,
        };

        debug!(
            "Service '{}' is {}",
            self.spec.name,
            if running { "running" } else { "stopped" }
        );
        Ok(running)
    }

    /// Issues the service's stop command once, then checks it is gone.
    ///
    /// There is no retry, no forced kill and no timeout.
    pub fn stop(&self) -> Result<(), SupervisorError> {
        info!("Stopping service '{}'", self.spec.name);

        let output = self.runner.run(&self.spec.stop_command).map_err(|source| {
            SupervisorError::StopCommandFailed {
                service: self.spec.name.clone(),
                source,
            }
        })?;

        if !output.success {
            if output.is_blank() {
                return Err(SupervisorError::StopCommandFailed {
                    service: self.spec.name.clone(),
                    source: output.failure(),
                });
            }
            warn!(
                "Stop command for '{}' exited with {:?} but produced output; verifying",
                self.spec.name, output.code
            );
        }

        if self.is_running()? {
            return Err(SupervisorError::StopVerificationFailed {
                service: self.spec.name.clone(),
            });
        }

        info!("Service '{}' stopped", self.spec.name);
        Ok(())
    }

    /// Runs the listing pipeline. A failed run that still printed something is
    /// tolerated; the listing exits non-zero when nothing matched.
    fn shell_probe(&self) -> Result<bool, SupervisorError> {
        let command = self.spec.listing_command();
        let output =
            self.runner
                .run(&command)
                .map_err(|source| SupervisorError::StatusQueryFailed {
                    service: self.spec.name.clone(),
                    source,
                })?;

        if !output.success {
            if output.is_blank() {
                return Err(SupervisorError::StatusQueryFailed {
                    service: self.spec.name.clone(),
                    source: output.failure(),
                });
            }
            warn!(
                "Status query for '{}' exited with {:?}; using its output anyway",
                self.spec.name, output.code
            );
        }

        Ok(output.stdout.lines().any(|line| !line.trim().is_empty()))
    }
}

/// PIDs of every process whose executable or command line mentions `executable`,
/// excluding the calling process and its threads.
pub fn native_pids(executable: &Path) -> Vec<u32> {
    let needle = executable.to_string_lossy();
    let own_pid = sysinfo::get_current_pid().ok();

    // `cmd` is only loaded when requested.
    let refresh_kind = ProcessRefreshKind::nothing()
        .with_exe(UpdateKind::OnlyIfNotSet)
        .with_cmd(UpdateKind::OnlyIfNotSet);
    let mut system = System::new();
    system.refresh_processes_specifics(ProcessesToUpdate::All, true, refresh_kind);

    let mut pids: Vec<u32> = system
        .processes()
        .iter()
        .filter(|(pid, process)| {
            Some(**pid) != own_pid && process.thread_kind().is_none()
        })
        .filter(|(_, process)| process_matches(process, &needle))
        .map(|(pid, _)| pid.as_u32())
        .collect();
    pids.sort_unstable();
    pids
}

fn process_matches(process: &Process, needle: &str) -> bool {
    if process
        .exe()
        .is_some_and(|exe| exe.to_string_lossy().contains(needle))
    {
        return true;
    }

    let cmdline = process
        .cmd()
        .iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    cmdline.contains(needle)
}
