//! Error types for the conversion pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting a venv.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input path does not exist: {0:?}")]
    InputNotFound(PathBuf),

    #[error("{0:?} does not appear to be a virtual environment")]
    NotAVenv(PathBuf),

    #[error("Couldn't find site-packages in {0:?}")]
    SitePackagesNotFound(PathBuf),

    #[error("Found more than one site-packages in {0:?}")]
    AmbiguousSitePackages(PathBuf),

    #[error("Could not find sysconfig file {0:?}")]
    ConfigNotFound(PathBuf),

    #[error("venv is {venv}; sysconfig file is for {config}")]
    ConsistencyError { venv: String, config: String },

    #[error("Sysconfig filename {0:?} does not match _sysconfigdata_<abiflags>_<platform>_<multiarch>")]
    MalformedConfigName(String),

    #[error("Failed to parse {path:?}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    #[error("Required build-time variable missing: {0}")]
    MissingRequiredVar(String),

    #[error("Don't know how to build a cross-venv file for {0}")]
    UnsupportedPlatform(String),

    #[error("Failed to render cross-target shim: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
