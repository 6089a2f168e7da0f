//! Loading of the target-platform config document and its module twin.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::pydict;
use crate::vars::BuildVars;

/// The two on-disk representations of one build-time variable set.
///
/// The JSON document drives identity and context fields; the sysconfigdata
/// module twin is the form the converted interpreter will import, so it is
/// localized and re-serialized in the same module style it arrived in.
#[derive(Debug, Clone)]
pub struct ConfigPair {
    /// Path of the JSON document.
    pub document_path: PathBuf,
    /// Path of the sibling sysconfigdata module.
    pub module_path: PathBuf,
    /// Variables parsed from the JSON document.
    pub document_vars: BuildVars,
    /// Variables parsed from the module twin.
    pub module_vars: BuildVars,
}

impl ConfigPair {
    /// Load a config document and its module twin.
    pub fn load(document_path: &Path) -> ConvertResult<Self> {
        if !document_path.is_file() {
            return Err(ConvertError::ConfigNotFound(document_path.to_path_buf()));
        }
        let module_path = module_twin_path(document_path);
        if !module_path.is_file() {
            return Err(ConvertError::ConfigNotFound(module_path));
        }

        debug!("Loading sysconfig document from {:?}", document_path);
        let text = fs::read_to_string(document_path)?;
        let document_vars: BuildVars =
            serde_json::from_str(&text).map_err(|e| ConvertError::ConfigParseError {
                path: document_path.to_path_buf(),
                message: e.to_string(),
            })?;

        debug!("Loading sysconfigdata module from {:?}", module_path);
        let text = fs::read_to_string(&module_path)?;
        let module_vars =
            pydict::parse_module(&text).map_err(|message| ConvertError::ConfigParseError {
                path: module_path.clone(),
                message,
            })?;

        Ok(Self {
            document_path: document_path.to_path_buf(),
            module_path,
            document_vars,
            module_vars,
        })
    }
}

/// Derive the module twin's path from the document's.
///
/// Both forms share the `_sysconfigdata_...` structural tag; only the
/// representation suffix differs.
pub fn module_twin_path(document_path: &Path) -> PathBuf {
    document_path.with_extension("py")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::VarValue;
    use tempfile::tempdir;

    const DOC_NAME: &str = "_sysconfigdata_cpython-311_emscripten_wasm32-emscripten.json";
    const MODULE_NAME: &str = "_sysconfigdata_cpython-311_emscripten_wasm32-emscripten.py";

    #[test]
    fn test_twin_path_swaps_representation_suffix() {
        let twin = module_twin_path(Path::new("/cfg/lib/python3.11").join(DOC_NAME).as_path());
        assert_eq!(twin.file_name().unwrap(), MODULE_NAME);
    }

    #[test]
    fn test_load_pair() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DOC_NAME),
            r#"{"prefix": "/build/python", "VERSION_MAJOR": 3}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(MODULE_NAME),
            "build_time_vars = {'prefix': '/build/python', 'WITH_PYMALLOC': True}\n",
        )
        .unwrap();

        let pair = ConfigPair::load(&dir.path().join(DOC_NAME)).unwrap();
        assert_eq!(pair.document_vars.get_str("prefix"), Some("/build/python"));
        assert_eq!(
            pair.document_vars.get("VERSION_MAJOR"),
            Some(&VarValue::Int(3))
        );
        assert_eq!(
            pair.module_vars.get("WITH_PYMALLOC"),
            Some(&VarValue::Bool(true))
        );
    }

    #[test]
    fn test_missing_document_is_config_not_found() {
        let dir = tempdir().unwrap();
        let err = ConfigPair::load(&dir.path().join(DOC_NAME)).unwrap_err();
        assert!(matches!(err, ConvertError::ConfigNotFound(_)));
    }

    #[test]
    fn test_missing_twin_is_config_not_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DOC_NAME), r#"{"prefix": "/build"}"#).unwrap();
        let err = ConfigPair::load(&dir.path().join(DOC_NAME)).unwrap_err();
        assert!(matches!(err, ConvertError::ConfigNotFound(ref p) if p.ends_with(MODULE_NAME)));
    }

    #[test]
    fn test_invalid_document_is_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DOC_NAME), "not json").unwrap();
        fs::write(dir.path().join(MODULE_NAME), "build_time_vars = {}\n").unwrap();
        let err = ConfigPair::load(&dir.path().join(DOC_NAME)).unwrap_err();
        assert!(matches!(err, ConvertError::ConfigParseError { .. }));
    }

    #[test]
    fn test_invalid_twin_is_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DOC_NAME), r#"{"prefix": "/build"}"#).unwrap();
        fs::write(
            dir.path().join(MODULE_NAME),
            "import os\nbuild_time_vars = {}\n",
        )
        .unwrap();
        let err = ConfigPair::load(&dir.path().join(DOC_NAME)).unwrap_err();
        assert!(matches!(err, ConvertError::ConfigParseError { .. }));
    }
}
