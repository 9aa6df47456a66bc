//! Blocking invocation of external executables.
//!
//! Every tool goes through [`ToolCommand`] so spawn failures, non-zero exits
//! and unreadable output turn into [`DeployError`]s the same way. Standard
//! error is always inherited: build logs and transfer progress stay visible
//! to whoever runs the deploy.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{DeployError, Result};

/// An external executable at a resolved path.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
}

impl ToolCommand {
    /// Wrap the executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the wrapped executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Start building an invocation of this tool.
    pub fn invoke(&self) -> Invocation<'_> {
        Invocation {
            tool: self,
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
        }
    }
}

/// A single pending invocation of a [`ToolCommand`].
#[derive(Debug)]
#[must_use]
pub struct Invocation<'a> {
    tool: &'a ToolCommand,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
}

impl Invocation<'_> {
    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    /// Run in `dir` instead of the inherited working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Set an environment variable for the child only.
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    /// Run to completion with stdout inherited.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Spawn`] if the program cannot be started and
    /// [`DeployError::CommandFailed`] if it exits unsuccessfully.
    pub fn run(self) -> Result<()> {
        let mut cmd = self.command();
        tracing::debug!("running {}", self.display());
        let status = cmd.status().map_err(|source| self.spawn_error(source))?;
        if !status.success() {
            return Err(self.failed(status));
        }
        Ok(())
    }

    /// Run to completion and return stdout with surrounding whitespace
    /// trimmed.
    ///
    /// # Errors
    ///
    /// As [`run`](Self::run), plus [`DeployError::NonUtf8Output`] if stdout
    /// is not UTF-8.
    pub fn capture(self) -> Result<String> {
        let mut cmd = self.command();
        cmd.stdout(Stdio::piped());
        tracing::debug!("running {}", self.display());
        let output = cmd.output().map_err(|source| self.spawn_error(source))?;
        if !output.status.success() {
            return Err(self.failed(output.status));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| DeployError::NonUtf8Output {
            program: self.program_name(),
        })?;
        Ok(stdout.trim().to_string())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.tool.program);
        cmd.args(&self.args).stderr(Stdio::inherit());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    fn program_name(&self) -> String {
        self.tool.program.display().to_string()
    }

    fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn display(&self) -> String {
        let mut line = self.program_name();
        for arg in self.arg_strings() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }

    fn spawn_error(&self, source: std::io::Error) -> DeployError {
        DeployError::Spawn {
            program: self.program_name(),
            source,
        }
    }

    fn failed(&self, status: std::process::ExitStatus) -> DeployError {
        DeployError::CommandFailed {
            program: self.program_name(),
            args: self.arg_strings(),
            status,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn capture_trims_stdout() {
        let out = ToolCommand::new("/bin/sh")
            .invoke()
            .args(["-c", "printf '  /nix/store/abc-proot\\n'"])
            .capture()
            .unwrap();
        assert_eq!(out, "/nix/store/abc-proot");
    }

    #[test]
    fn env_and_cwd_reach_the_child() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().canonicalize().unwrap();
        let out = ToolCommand::new("/bin/sh")
            .invoke()
            .args(["-c", "printf '%s %s' \"$NOD_TEST_VALUE\" \"$(pwd -P)\""])
            .env("NOD_TEST_VALUE", "hello")
            .current_dir(&dir)
            .capture()
            .unwrap();
        assert_eq!(out, format!("hello {}", dir.display()));
    }

    #[test]
    fn non_zero_exit_is_command_failed() {
        let err = ToolCommand::new("/bin/sh")
            .invoke()
            .args(["-c", "exit 3"])
            .run()
            .unwrap_err();
        let DeployError::CommandFailed { program, args, status } = err else {
            panic!("expected CommandFailed");
        };
        assert_eq!(program, "/bin/sh");
        assert_eq!(args, ["-c", "exit 3"]);
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = ToolCommand::new("/nonexistent/nod-tool")
            .invoke()
            .run()
            .unwrap_err();
        assert!(matches!(err, DeployError::Spawn { .. }));
    }
}
