//! # crossvenv_core
//!
//! Conversion pipeline turning a native virtual environment into a
//! cross-compilation target venv.
//!
//! # Architecture
//!
//! - **vars**: build-time variable mapping and path localization
//! - **config**: the target-platform config document and its module twin
//! - **venv**: venv structure validation and site-packages discovery
//! - **platform**: the per-platform extension contract and registry
//! - **shim**: rendering of the generated cross-target shim module
//! - **convert**: the orchestrator tying the above together
//!
//! # Example
//!
//! ```rust,ignore
//! use crossvenv_core::convert;
//! use crossvenv_platforms::builtin;
//!
//! let registry = builtin();
//! let description = convert(venv_path, config_path, &registry)?;
//! println!("{} is now a {} cross venv.", venv_path.display(), description);
//! ```

pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod platform;
pub mod pydict;
pub mod shim;
pub mod vars;
pub mod venv;

// Re-export main types for convenience
pub use config::ConfigPair;
pub use context::{FrozenContext, TemplateContext};
pub use convert::{convert, PlatformIdentity, ACTIVATION_FILE};
pub use error::{ConvertError, ConvertResult};
pub use platform::{PlatformExtension, PlatformRegistry};
pub use shim::ShimRenderer;
pub use vars::{localize, BuildVars, VarValue};
pub use venv::Venv;
