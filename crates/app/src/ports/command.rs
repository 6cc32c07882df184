//! Command port — external processes (audio player, webcam capture tool).

use std::future::Future;
use std::sync::Arc;

use pumpkinpi_domain::error::PumpkinError;

/// What a finished process reported.
///
/// None of these fields is a reliable success signal for every tool; the
/// capture pipeline only logs them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Starts external programs.
pub trait CommandRunner: Send + Sync {
    /// Start `program` and return without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns a [`PumpkinError::Device`] when the process cannot be started.
    fn spawn(&self, program: &str, args: &[String]) -> Result<(), PumpkinError>;

    /// Run `program` to completion and collect its output.
    ///
    /// A non-zero exit code is **not** an error at this level.
    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> impl Future<Output = Result<CommandOutput, PumpkinError>> + Send;
}

impl<T: CommandRunner> CommandRunner for Arc<T> {
    fn spawn(&self, program: &str, args: &[String]) -> Result<(), PumpkinError> {
        (**self).spawn(program, args)
    }

    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> impl Future<Output = Result<CommandOutput, PumpkinError>> + Send {
        (**self).run(program, args)
    }
}
