//! External process invocation
//!
//! Every call to `ffmpeg` or `ffprobe` goes through [`CommandRunner`], so the
//! builder can be exercised without spawning real processes.

use std::cell::RefCell;
use std::io;
use std::process::Command;

/// Captured result of a finished process
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, if the process exited normally
    pub status: Option<i32>,
    /// True if the process exited with status 0
    pub success: bool,
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Successful exit with the given stdout
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Failed exit with the given code and stderr
    pub fn failure(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            status: Some(code),
            success: false,
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    /// Standard output decoded lossily as UTF-8
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded lossily as UTF-8
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs a program to completion and captures its output.
///
/// An `Err` means the process could not be started at all; a started process
/// that fails is reported through [`CommandOutput::success`].
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        (**self).run(program, args)
    }
}

/// Runs programs found on `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        log::debug!("running: {} {}", program, args.join(" "));

        let output = Command::new(program).args(args).output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// A recorded call to a [`ScriptedRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Arguments joined with spaces
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Runner that answers with a closure instead of spawning processes.
///
/// Every call is recorded so tests can assert on the exact command lines.
pub struct ScriptedRunner<F>
where
    F: Fn(&Invocation) -> io::Result<CommandOutput>,
{
    respond: F,
    calls: RefCell<Vec<Invocation>>,
}

impl<F> ScriptedRunner<F>
where
    F: Fn(&Invocation) -> io::Result<CommandOutput>,
{
    /// Creates a runner that answers every call with `respond`
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Calls made to a specific program
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program == program)
            .cloned()
            .collect()
    }
}

impl<F> CommandRunner for ScriptedRunner<F>
where
    F: Fn(&Invocation) -> io::Result<CommandOutput>,
{
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        };
        let result = (self.respond)(&invocation);
        self.calls.borrow_mut().push(invocation);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_runner_records_calls() {
        let runner = ScriptedRunner::new(|inv| {
            if inv.program == "ffmpeg" {
                Ok(CommandOutput::success("ffmpeg version 6.1\n"))
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
            }
        });

        let out = runner.run("ffmpeg", &["-version".to_string()]).unwrap();
        assert!(out.success);
        assert_eq!(out.stdout_text(), "ffmpeg version 6.1\n");
        assert!(runner.run("ffprobe", &[]).is_err());

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].command_line(), "-version");
        assert_eq!(runner.calls_to("ffprobe").len(), 1);
    }

    #[test]
    fn test_system_runner_reports_missing_program() {
        let result = SystemRunner.run("spriter-test-no-such-program", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_failure_output() {
        let out = CommandOutput::failure(1, "conversion error");
        assert!(!out.success);
        assert_eq!(out.status, Some(1));
        assert_eq!(out.stderr_text(), "conversion error");
    }
}
