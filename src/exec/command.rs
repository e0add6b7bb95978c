// src/exec/command.rs

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Exit status of a finished step command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    /// Exit code, or -1 if the process was terminated by a signal.
    pub code: i32,
}

/// Run `cmd` through the platform shell in `cwd` and wait for it to exit.
///
/// stdout lines are logged at info and stderr lines at warn, both tagged
/// with `label`. An `Err` means the process could not be spawned or waited
/// on; a non-zero exit is reported through [`CommandOutcome`].
pub async fn run_shell_command(label: &str, cmd: &str, cwd: &Path) -> Result<CommandOutcome> {
    info!(step = %label, cmd = %cmd, "starting command");

    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning process for step '{label}'"))?;

    let stdout_task = child.stdout.take().map(|stdout| {
        let label = label.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(step = %label, "{}", line);
            }
        })
    });

    // Always consume stderr so buffers don't fill.
    let stderr_task = child.stderr.take().map(|stderr| {
        let label = label.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!(step = %label, "{}", line);
            }
        })
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of step '{label}'"))?;

    // Flush remaining output before reporting completion.
    for task in [stdout_task, stderr_task].into_iter().flatten() {
        if let Err(err) = task.await {
            debug!(step = %label, error = %err, "output reader task ended abnormally");
        }
    }

    let outcome = CommandOutcome {
        success: status.success(),
        code: status.code().unwrap_or(-1),
    };

    info!(
        step = %label,
        exit_code = outcome.code,
        success = outcome.success,
        "command exited"
    );

    Ok(outcome)
}
