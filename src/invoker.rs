//! Best-effort execution of external line-oriented tools.
//!
//! Every failure mode (missing binary, non-zero exit, timeout, unreadable
//! output) collapses into an empty [`ToolOutput`] with `ok == false`. Callers
//! decide whether absent output matters; the invoker itself never errors.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A fully structured command line. Arguments go straight to the OS, never
/// through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Discard the tool's stderr instead of inheriting it.
    pub silent: bool,
    pub timeout: Option<Duration>,
}

impl ToolCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            silent: false,
            timeout: None,
        }
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub lines: Vec<String>,
    pub ok: bool,
}

impl ToolOutput {
    pub fn success(lines: Vec<String>) -> Self {
        Self { lines, ok: true }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

/// Capability to run an external tool and collect its stdout lines.
pub trait CommandRunner {
    fn run(&self, command: &ToolCommand) -> ToolOutput;
}

/// Runs tools as real OS subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> ToolOutput {
        let started = Instant::now();
        let stderr = if command.silent {
            Stdio::null()
        } else {
            Stdio::inherit()
        };

        let mut child = match Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(action = "spawn", component = "invoker", command = %command.display(), error = %e, "Failed to start tool");
                return ToolOutput::failed();
            }
        };

        let Some(mut stdout) = child.stdout.take() else {
            warn!(action = "spawn", component = "invoker", command = %command.display(), "Tool stdout was not captured");
            let _ = child.kill();
            let _ = child.wait();
            return ToolOutput::failed();
        };

        // Drain stdout on its own thread so a chatty tool cannot block on a full pipe.
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        let status = match command.timeout {
            Some(limit) => wait_with_deadline(&mut child, limit),
            None => child.wait().ok(),
        };

        let Some(status) = status else {
            warn!(
                action = "wait",
                component = "invoker",
                command = %command.display(),
                duration_ms = started.elapsed().as_millis(),
                "Tool timed out or could not be waited on"
            );
            return ToolOutput::failed();
        };

        if !status.success() {
            debug!(action = "exit", component = "invoker", command = %command.display(), status = %status, "Tool exited unsuccessfully");
            return ToolOutput::failed();
        }

        let bytes = match reader.join() {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                warn!(action = "read", component = "invoker", command = %command.display(), error = %e, "Failed to read tool output");
                return ToolOutput::failed();
            }
            Err(_) => return ToolOutput::failed(),
        };

        let lines = split_lines(&String::from_utf8_lossy(&bytes));
        debug!(
            action = "complete",
            component = "invoker",
            command = %command.display(),
            line_count = lines.len(),
            duration_ms = started.elapsed().as_millis(),
            "Tool finished"
        );
        ToolOutput::success(lines)
    }
}

/// Polls `child` until it exits or `limit` elapses. On timeout the child is
/// killed and reaped and `None` is returned.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + limit;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
        }
    }
}

/// Splits tool output into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_drops_blanks() {
        assert_eq!(
            split_lines("a.example.com\r\n\n  b.example.com  \n"),
            vec!["a.example.com".to_string(), "b.example.com".to_string()]
        );
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_display_joins_arguments() {
        let cmd = ToolCommand::new("subfinder", ["-d", "example.com"]);
        assert_eq!(cmd.display(), "subfinder -d example.com");
    }

    #[test]
    fn test_missing_binary_is_absorbed() {
        let cmd = ToolCommand::new("bhunty-no-such-tool-7f3a", Vec::<String>::new()).silent();
        assert_eq!(SystemRunner.run(&cmd), ToolOutput::failed());
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_lines() {
        let cmd = ToolCommand::new("sh", ["-c", "printf 'one\\ntwo\\n'"]).silent();
        let out = SystemRunner.run(&cmd);
        assert!(out.ok);
        assert_eq!(out.lines, vec!["one".to_string(), "two".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_discards_output() {
        let cmd = ToolCommand::new("sh", ["-c", "echo partial; exit 3"]).silent();
        let out = SystemRunner.run(&cmd);
        assert!(!out.ok);
        assert!(out.lines.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_arguments_are_not_shell_interpreted() {
        let cmd = ToolCommand::new("echo", ["example.com;", "$(whoami)"]).silent();
        let out = SystemRunner.run(&cmd);
        assert!(out.ok);
        assert_eq!(out.lines, vec!["example.com; $(whoami)".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_tool() {
        let cmd = ToolCommand::new("sleep", ["5"])
            .silent()
            .with_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let out = SystemRunner.run(&cmd);
        assert!(!out.ok);
        assert!(out.lines.is_empty());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_fast_tool_within_timeout() {
        let cmd = ToolCommand::new("echo", ["https://a.example.com/x"])
            .silent()
            .with_timeout(Duration::from_secs(10));
        let out = SystemRunner.run(&cmd);
        assert!(out.ok);
        assert_eq!(out.lines, vec!["https://a.example.com/x".to_string()]);
    }
}
