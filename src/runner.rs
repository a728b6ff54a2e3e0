use std::{
    collections::VecDeque,
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::error::{ZoomError, ZoomResult};

/// One external-program invocation: program, argument vector, optional cwd.
///
/// Arguments are kept as a structured vector and handed to the process API
/// as-is; nothing is ever joined into a shell string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program_name(&self) -> String {
        Path::new(&self.program).display().to_string()
    }
}

/// Outcome of a completed invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    /// Exit code, if the process exited normally.
    pub status_code: Option<i32>,
    pub success: bool,
    /// Captured stderr, trimmed.
    pub stderr: String,
}

impl RunOutcome {
    pub fn success() -> Self {
        Self {
            status_code: Some(0),
            success: true,
            stderr: String::new(),
        }
    }

    pub fn failure(status_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            success: false,
            stderr: stderr.into(),
        }
    }
}

/// Capability for running external programs.
///
/// The pipeline never spawns processes directly; it goes through this trait
/// so invocations can be checked, and recorded in tests.
pub trait CommandRunner {
    /// Run `spec` to completion and report its outcome. A spawn failure
    /// (e.g. missing executable) is an `Err`, not an outcome.
    fn run(&mut self, spec: &CommandSpec) -> ZoomResult<RunOutcome>;
}

/// Production runner over [`std::process::Command`].
///
/// Stdin and stdout are discarded; stderr is captured for error reporting.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, spec: &CommandSpec) -> ZoomResult<RunOutcome> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }

        let out = cmd.output().map_err(|e| {
            ZoomError::process(format!("failed to run '{}': {e}", spec.program_name()))
        })?;

        Ok(RunOutcome {
            status_code: out.status.code(),
            success: out.status.success(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        })
    }
}

/// In-memory runner for tests and debugging.
///
/// Records every spec it is asked to run and replays a scripted queue of
/// outcomes, defaulting to success once the script is exhausted.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Vec<CommandSpec>,
    script: VecDeque<ZoomResult<RunOutcome>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next unscripted call (FIFO).
    pub fn push_outcome(&mut self, outcome: RunOutcome) {
        self.script.push_back(Ok(outcome));
    }

    /// Queue a spawn-level error for the next unscripted call.
    pub fn push_error(&mut self, err: ZoomError) {
        self.script.push_back(Err(err));
    }

    pub fn calls(&self) -> &[CommandSpec] {
        &self.calls
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, spec: &CommandSpec) -> ZoomResult<RunOutcome> {
        self.calls.push(spec.clone());
        self.script.pop_front().unwrap_or_else(|| Ok(RunOutcome::success()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builder_accumulates_args_and_cwd() {
        let spec = CommandSpec::new("ffmpeg")
            .arg("-f")
            .arg("image2")
            .current_dir("/tmp/frames");
        assert_eq!(spec.program, OsString::from("ffmpeg"));
        assert_eq!(spec.args, vec![OsString::from("-f"), OsString::from("image2")]);
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/tmp/frames")));
    }

    #[test]
    fn recording_runner_replays_script_then_succeeds() {
        let mut runner = RecordingRunner::new();
        runner.push_outcome(RunOutcome::failure(2, "bad frame"));

        let spec = CommandSpec::new("mandelbrot");
        let first = runner.run(&spec).unwrap();
        assert!(!first.success);
        assert_eq!(first.status_code, Some(2));

        let second = runner.run(&spec).unwrap();
        assert!(second.success);
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn system_runner_reports_missing_executable_as_error() {
        let mut runner = SystemRunner;
        let spec = CommandSpec::new("mandelzoom-test-no-such-binary");
        assert!(runner.run(&spec).is_err());
    }
}
