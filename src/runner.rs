use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;

use eyre::{Result, WrapErr};

use crate::environment::EnvMap;
use crate::util;

/// A fully resolved child process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
    /// The child's entire environment. Nothing else is inherited.
    pub env: EnvMap,
}

impl Invocation {
    pub fn command_line(&self) -> String {
        util::command_line(&self.program, &self.args)
    }
}

/// Runs an [`Invocation`] to completion and reports its exit code.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32>;
}

/// Launches real processes, inheriting stdio.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<i32> {
        let status = util::cmd(&invocation.program, &invocation.args)
            .current_dir(&invocation.current_dir)
            .env_clear()
            .envs(&invocation.env)
            .status()
            .wrap_err_with(|| format!("Failed to run `{}`", invocation.command_line()))?;
        Ok(exit_code(status))
    }
}

/// Maps a child's status to the code this process should exit with. Children
/// killed by a signal map to `128 + signal`, like a shell reports them.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            log::warn!("Build tool was terminated by signal {signal}");
            return 128 + signal;
        }
    }

    1
}
