use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use eyre::Result;
use log::LevelFilter;

mod dotenv;
mod environment;
mod invoke;
mod project;
mod runner;
mod util;

/// Build the firmware with variables from the project's `.env` file.
///
/// Every `KEY=VALUE` line in `.env` is passed to the build tool's environment,
/// overriding variables of the same name. The tool's exit status becomes this
/// program's exit status.
#[derive(Parser, Debug)]
#[command(name = "build-with-env", version)]
struct Cli {
    /// `upload` builds and flashes the device; anything else only builds.
    #[arg(allow_hyphen_values = true)]
    action: Option<String>,

    #[arg(hide = true, allow_hyphen_values = true)]
    ignored: Vec<String>,

    /// Project root. Defaults to two levels above this executable
    /// (`<root>/scripts/build-with-env`).
    #[arg(long, value_name = "DIR", env = "ENVBUILD_PROJECT_DIR")]
    project_dir: Option<PathBuf>,

    /// Environment file, relative to the project root.
    #[arg(
        long,
        value_name = "PATH",
        env = "ENVBUILD_ENV_FILE",
        default_value = dotenv::ENV_FILE_NAME
    )]
    env_file: PathBuf,

    /// Build tool to invoke.
    #[arg(long, value_name = "PROGRAM", env = "ENVBUILD_BUILD_TOOL", default_value = "pio")]
    build_tool: OsString,

    /// Print what would be run without running it.
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.ignored.is_empty() {
        log::debug!("Ignoring extra arguments: {:?}", cli.ignored);
    }

    let opts = invoke::Options {
        project_root: project::resolve_root(cli.project_dir)?,
        env_file: cli.env_file,
        build_tool: cli.build_tool,
        mode: invoke::Mode::from_arg(cli.action.as_deref()),
        dry_run: cli.dry_run,
    };

    let code = invoke::run(&opts, environment::inherited(), &runner::SystemRunner)?;
    std::process::exit(code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_positional_action() {
        let cli = Cli::try_parse_from(["build-with-env"]).unwrap();
        assert_eq!(cli.action, None);

        let cli = Cli::try_parse_from(["build-with-env", "upload"]).unwrap();
        assert_eq!(cli.action.as_deref(), Some("upload"));

        let cli = Cli::try_parse_from(["build-with-env", "upload", "monitor", "now"]).unwrap();
        assert_eq!(cli.action.as_deref(), Some("upload"));
        assert_eq!(cli.ignored, ["monitor", "now"]);
    }

    #[test]
    fn test_cli_unknown_flag_is_an_action() {
        let cli = Cli::try_parse_from(["build-with-env", "-x"]).unwrap();
        assert_eq!(cli.action.as_deref(), Some("-x"));
        assert!(!cli.dry_run);

        let cli = Cli::try_parse_from(["build-with-env", "--frobnicate", "upload"]).unwrap();
        assert_eq!(cli.action.as_deref(), Some("--frobnicate"));
        assert_eq!(cli.ignored, ["upload"]);

        // Known options are still options.
        let cli = Cli::try_parse_from(["build-with-env", "--dry-run", "-x"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.action.as_deref(), Some("-x"));
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "build-with-env",
            "--project-dir",
            "/work/firmware",
            "--env-file",
            "ci.env",
            "--build-tool",
            "platformio",
            "--dry-run",
            "-vv",
            "upload",
        ])
        .unwrap();

        assert_eq!(cli.project_dir, Some(PathBuf::from("/work/firmware")));
        assert_eq!(cli.env_file, PathBuf::from("ci.env"));
        assert_eq!(cli.build_tool, "platformio");
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.action.as_deref(), Some("upload"));
    }
}
