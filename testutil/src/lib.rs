use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use tempfile::TempDir;

#[macro_export]
macro_rules! test_context {
    () => {
        $crate::TestContext::init(env!("CARGO_BIN_EXE_build-with-env"))
    };
}

/// A throwaway firmware project with `build-with-env` installed under
/// `scripts/` and a mock `pio` on `PATH`.
pub struct TestContext {
    pub dir: TempDir,
    /// The project root, i.e. the directory holding `.env`.
    pub root: PathBuf,
    /// Directory holding the mock `pio`. Prepended to `PATH`.
    pub bin_dir: PathBuf,
}

impl TestContext {
    pub fn init(build_with_env: impl Into<PathBuf>) -> Self {
        let build_with_env = build_with_env.into();
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("firmware");
        let bin_dir = dir.path().join("bin");
        fs::create_dir_all(root.join("scripts")).unwrap();
        fs::create_dir_all(&bin_dir).unwrap();

        let mock_pio = find_mock_pio(&build_with_env);
        fs::copy(&build_with_env, root.join("scripts").join(exe("build-with-env"))).unwrap();
        fs::copy(&mock_pio, bin_dir.join(exe("pio"))).unwrap();

        Self { dir, root, bin_dir }
    }

    pub fn write_env(&self, content: &str) {
        fs::write(self.root.join(".env"), content).unwrap();
    }

    /// The project root as the child process will report it.
    pub fn canonical_root(&self) -> PathBuf {
        self.root.canonicalize().unwrap()
    }

    /// Runs the copy installed at `<root>/scripts/build-with-env`, from a
    /// working directory outside the project.
    pub fn build_with_env(&self) -> assert_cmd::Command {
        let script = self.root.join("scripts").join(exe("build-with-env"));
        let mut cmd = assert_cmd::Command::new(script);
        cmd.current_dir(self.dir.path());

        let mut paths = vec![self.bin_dir.clone()];
        paths.extend(env::split_paths(&env::var_os("PATH").unwrap_or_default()));
        cmd.env("PATH", env::join_paths(paths).unwrap());

        for var in [
            "ENVBUILD_PROJECT_DIR",
            "ENVBUILD_ENV_FILE",
            "ENVBUILD_BUILD_TOOL",
            "MOCK_PIO_ECHO",
            "MOCK_PIO_EXIT",
            "RUST_LOG",
        ] {
            cmd.env_remove(var);
        }

        cmd
    }
}

fn exe(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// `mock_pio` lands next to `build-with-env` when the whole workspace is
/// built. Otherwise (e.g. `cargo test -p envbuild`), build it into a
/// separate target directory so we don't wait on the outer cargo's lock.
fn find_mock_pio(build_with_env: &Path) -> PathBuf {
    static MOCK_PIO: OnceLock<PathBuf> = OnceLock::new();
    MOCK_PIO.get_or_init(|| locate_or_build_mock_pio(build_with_env)).clone()
}

fn locate_or_build_mock_pio(build_with_env: &Path) -> PathBuf {
    let target_dir = build_with_env.parent().expect("binary has a parent directory");
    let sibling = target_dir.join(exe("mock_pio"));
    if sibling.exists() {
        return sibling;
    }

    let fallback_target = target_dir.join("testutil-target");
    let status = Command::new(env!("CARGO"))
        .args(["build", "--quiet", "--bin", "mock_pio", "--manifest-path"])
        .arg(Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"))
        .arg("--target-dir")
        .arg(&fallback_target)
        .status()
        .expect("Failed to run cargo to build mock_pio");
    assert!(status.success(), "Failed to build mock_pio: {status:?}");

    fallback_target.join("debug").join(exe("mock_pio"))
}
