//! Subprocess runner on `tokio::process`.

use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;

use pumpkinpi_app::ports::{CommandOutput, CommandRunner};
use pumpkinpi_domain::error::PumpkinError;

use crate::error::HostError;

/// Runs programs found on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn spawn(&self, program: &str, args: &[String]) -> Result<(), PumpkinError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| HostError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let program = program.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    tracing::debug!(%program, "background process finished");
                }
                Ok(status) => tracing::warn!(%program, %status, "background process failed"),
                Err(err) => tracing::warn!(%program, %err, "unable to wait for background process"),
            }
        });
        Ok(())
    }

    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> impl Future<Output = Result<CommandOutput, PumpkinError>> + Send {
        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null());
        let program = program.to_string();

        async move {
            let output = command.output().await.map_err(|source| HostError::Wait {
                program: program.clone(),
                source,
            })?;
            tracing::debug!(%program, status = %output.status, "process finished");
            Ok(CommandOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}
