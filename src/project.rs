use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, eyre};

/// Returns the project root for a launcher installed at
/// `<root>/scripts/<name>`, i.e. the directory two levels above `script`.
pub fn root_from_script(script: &Path) -> Result<PathBuf> {
    script
        .parent()
        .and_then(Path::parent)
        .map(|root| {
            if root.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                root.to_path_buf()
            }
        })
        .ok_or_else(|| eyre!("Cannot derive a project root from {:?}", script))
}

/// Resolves the project root, preferring an explicit directory over the
/// location of the running executable.
pub fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        log::debug!("Using explicit project root {:?}", dir);
        return Ok(dir);
    }

    let exe = std::env::current_exe().wrap_err("Failed to locate the running executable")?;
    let root = root_from_script(&exe)?;
    log::debug!("Derived project root {:?} from {:?}", root, exe);
    Ok(root)
}

/// Resolves the environment file relative to the project root. Absolute
/// paths are used as given.
pub fn env_file_path(root: &Path, env_file: &Path) -> PathBuf {
    root.join(env_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_from_script() {
        let root = root_from_script(Path::new("/work/firmware/scripts/build-with-env")).unwrap();
        assert_eq!(root, Path::new("/work/firmware"));

        let root = root_from_script(Path::new("scripts/build-with-env")).unwrap();
        assert_eq!(root, Path::new("."));
    }

    #[test]
    fn test_root_from_script_too_shallow() {
        assert!(root_from_script(Path::new("/")).is_err());
        assert!(root_from_script(Path::new("build-with-env")).is_err());
    }

    #[test]
    fn test_resolve_root_prefers_explicit() {
        let root = resolve_root(Some(PathBuf::from("/srv/firmware"))).unwrap();
        assert_eq!(root, Path::new("/srv/firmware"));
    }

    #[test]
    fn test_env_file_path() {
        let root = Path::new("/work/firmware");
        assert_eq!(env_file_path(root, Path::new(".env")), Path::new("/work/firmware/.env"));
        assert_eq!(
            env_file_path(root, Path::new("config/local.env")),
            Path::new("/work/firmware/config/local.env")
        );
        assert_eq!(env_file_path(root, Path::new("/etc/fw.env")), Path::new("/etc/fw.env"));
    }
}
