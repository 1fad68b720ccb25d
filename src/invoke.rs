use std::ffi::OsString;
use std::path::PathBuf;

use eyre::Result;
use owo_colors::OwoColorize;

use crate::environment::{self, EnvMap};
use crate::runner::{CommandRunner, Invocation};
use crate::{dotenv, project};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Build,
    Upload,
}

impl Mode {
    const UPLOAD: &str = "upload";

    /// Anything other than the exact `upload` keyword is a plain build.
    pub fn from_arg(arg: Option<&str>) -> Mode {
        match arg {
            Some(Mode::UPLOAD) => Mode::Upload,
            _ => Mode::Build,
        }
    }

    pub fn tool_args(self) -> &'static [&'static str] {
        match self {
            Mode::Build => &["run"],
            Mode::Upload => &["run", "-t", "upload"],
        }
    }
}

pub struct Options {
    pub project_root: PathBuf,
    pub env_file: PathBuf,
    pub build_tool: OsString,
    pub mode: Mode,
    pub dry_run: bool,
}

/// Loads the environment file, merges it over `inherited`, and runs the build
/// tool. Returns the exit code this process should finish with.
pub fn run(opts: &Options, inherited: EnvMap, runner: &impl CommandRunner) -> Result<i32> {
    let env_path = project::env_file_path(&opts.project_root, &opts.env_file);
    let overrides = match dotenv::load(&env_path)? {
        Some(entries) => {
            log::info!(
                "Loaded {} variable(s) from {}",
                entries.len(),
                env_path.display().yellow()
            );
            entries
        }
        None => Vec::new(),
    };

    let invocation = Invocation {
        program: opts.build_tool.clone(),
        args: opts.mode.tool_args().iter().map(|a| a.to_string()).collect(),
        current_dir: opts.project_root.clone(),
        env: environment::merge(inherited, &overrides),
    };

    if opts.dry_run {
        log::info!("Would run {}", invocation.command_line().bold());
        log::info!("  in {}", invocation.current_dir.display());
        for entry in &overrides {
            log::info!("  with {} from {}", entry.key.green(), env_path.display());
        }
        return Ok(0);
    }

    log::info!("Running {}", invocation.command_line().bold());
    let code = runner.run(&invocation)?;
    if code != 0 {
        log::error!(
            "`{}` failed with exit status {}",
            invocation.command_line(),
            code.red()
        );
    }
    Ok(code)
}
