//! Discovery and management of the `.gao-dev/` project directory.
//!
//! The `.gao-dev/` directory is the root of a project's document lifecycle
//! metadata: the SQLite catalog (`documents.db`), the `.archive/` root, and
//! the `retention.yaml` / `governance.yaml` config files.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

const PROJECT_DIR_NAME: &str = ".gao-dev";
const PROJECT_DIR_ENV: &str = "GAO_DEV_DIR";

/// Walks up the directory tree from `start` looking for a `.gao-dev/`
/// directory. The `GAO_DEV_DIR` environment variable is checked first.
///
/// Returns `None` if the filesystem root is reached without finding one.
pub fn find_project_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(PROJECT_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    let start = match start.canonicalize() {
        Ok(p) => p,
        Err(_) => return None,
    };

    let mut current = start.as_path();
    loop {
        let candidate = current.join(PROJECT_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    None
}

/// Like [`find_project_dir`], but returns [`ConfigError::ProjectDirNotFound`]
/// instead of `None`.
pub fn find_project_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_project_dir(start).ok_or(ConfigError::ProjectDirNotFound)
}

/// Ensures a `.gao-dev/` directory exists under `path`, creating it (and any
/// necessary parents) if needed. Returns the path to the directory.
pub fn ensure_project_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let dir = if path.ends_with(PROJECT_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(PROJECT_DIR_NAME)
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Path to the SQLite catalog inside a `.gao-dev/` directory.
pub fn documents_db_path(project_dir: &Path) -> PathBuf {
    project_dir.join("documents.db")
}

/// Path to the archive root inside a `.gao-dev/` directory.
pub fn archive_root(project_dir: &Path) -> PathBuf {
    project_dir.join(".archive")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_project_dir_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let gao_dev = dir.path().join(".gao-dev");
        std::fs::create_dir(&gao_dev).unwrap();

        let child = dir.path().join("src").join("deep");
        std::fs::create_dir_all(&child).unwrap();

        let found = find_project_dir(&child).unwrap().canonicalize().unwrap();
        assert_eq!(found, gao_dev.canonicalize().unwrap());
    }

    #[test]
    fn ensure_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = ensure_project_dir(dir.path()).unwrap();
        assert!(result.is_dir());
        assert!(result.ends_with(".gao-dev"));
    }

    #[test]
    fn ensure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let first = ensure_project_dir(dir.path()).unwrap();
        let second = ensure_project_dir(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn well_known_paths() {
        let project_dir = Path::new("/tmp/example/.gao-dev");
        assert_eq!(
            documents_db_path(project_dir),
            PathBuf::from("/tmp/example/.gao-dev/documents.db")
        );
        assert_eq!(
            archive_root(project_dir),
            PathBuf::from("/tmp/example/.gao-dev/.archive")
        );
    }
}
