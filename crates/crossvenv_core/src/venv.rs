//! Virtual environment inspection.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;

use crate::error::{ConvertError, ConvertResult};

/// Relative interpreter location every native venv carries.
const INTERPRETER: &str = "bin/python3";

/// Glob locating the version-specific site-packages directory.
const SITE_PACKAGES_GLOB: &str = "lib/*/site-packages";

/// A validated virtual environment.
#[derive(Debug, Clone)]
pub struct Venv {
    pub root: PathBuf,
    pub site_packages: PathBuf,
}

impl Venv {
    /// Validate the venv structure and locate its site-packages directory.
    ///
    /// The glob is expected to match exactly one version-specific directory;
    /// more than one means a malformed or multi-version venv, which is
    /// unsupported.
    pub fn inspect(root: &Path) -> ConvertResult<Self> {
        if !root.exists() {
            return Err(ConvertError::InputNotFound(root.to_path_buf()));
        }
        if !root.join(INTERPRETER).exists() {
            return Err(ConvertError::NotAVenv(root.to_path_buf()));
        }

        let pattern = format!(
            "{}/{}",
            Pattern::escape(&root.to_string_lossy()),
            SITE_PACKAGES_GLOB
        );
        let mut matches: Vec<PathBuf> = glob::glob(&pattern)
            .expect("site-packages glob pattern is valid")
            .filter_map(|entry| entry.ok())
            .collect();
        matches.sort();

        if matches.is_empty() {
            return Err(ConvertError::SitePackagesNotFound(root.to_path_buf()));
        }
        if matches.len() > 1 {
            return Err(ConvertError::AmbiguousSitePackages(root.to_path_buf()));
        }

        let site_packages = matches.remove(0);
        debug!("Located site-packages at {:?}", site_packages);
        Ok(Self {
            root: root.to_path_buf(),
            site_packages,
        })
    }

    /// Name of the `pythonX.Y` directory holding site-packages.
    pub fn python_dir_name(&self) -> String {
        self.site_packages
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn make_venv(root: &Path, python_dir: &str) {
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::write(root.join(INTERPRETER), "").unwrap();
        fs::create_dir_all(root.join("lib").join(python_dir).join("site-packages")).unwrap();
    }

    #[test]
    fn test_inspect_valid_venv() {
        let dir = tempdir().unwrap();
        make_venv(dir.path(), "python3.11");

        let venv = Venv::inspect(dir.path()).unwrap();
        assert_eq!(
            venv.site_packages,
            dir.path().join("lib/python3.11/site-packages")
        );
        assert_eq!(venv.python_dir_name(), "python3.11");
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        let err = Venv::inspect(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound(_)));
    }

    #[test]
    fn test_missing_interpreter() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/python3.11/site-packages")).unwrap();
        let err = Venv::inspect(dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::NotAVenv(_)));
    }

    #[test]
    fn test_missing_site_packages() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join(INTERPRETER), "").unwrap();
        let err = Venv::inspect(dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::SitePackagesNotFound(_)));
    }

    #[test]
    fn test_multiple_site_packages_is_ambiguous() {
        let dir = tempdir().unwrap();
        make_venv(dir.path(), "python3.11");
        fs::create_dir_all(dir.path().join("lib/python3.12/site-packages")).unwrap();
        let err = Venv::inspect(dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::AmbiguousSitePackages(_)));
    }
}
