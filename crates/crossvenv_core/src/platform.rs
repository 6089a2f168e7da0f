//! Platform extension contract and registry.

use std::collections::HashMap;

use tracing::debug;

use crate::context::TemplateContext;
use crate::error::{ConvertError, ConvertResult};
use crate::vars::BuildVars;

/// Per-platform hook that fills OS-identity fields into the shim context.
///
/// Implementations must set at least `release`, `os_sysname`, `os_nodename`,
/// `os_release` and `os_version`, and may set `machine`, `platform_version`
/// and `platform_extra` (extra code injected verbatim into the shim).
pub trait PlatformExtension: Send + Sync {
    /// The platform name this extension handles.
    fn name(&self) -> &str;

    /// Add OS-identity fields for this platform to the context.
    fn extend_context(
        &self,
        context: &mut TemplateContext,
        vars: &BuildVars,
    ) -> ConvertResult<()>;
}

/// A registry of platform extensions, keyed by platform name.
///
/// Dispatch is closed: the set of supported platforms is exactly the set
/// registered at startup, and an unknown platform name aborts the
/// conversion.
#[derive(Default)]
pub struct PlatformRegistry {
    extensions: HashMap<String, Box<dyn PlatformExtension>>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension under its `name()` identifier.
    ///
    /// An extension registered under an existing name replaces it.
    pub fn register(&mut self, extension: Box<dyn PlatformExtension>) {
        let name = extension.name().to_string();
        debug!("Registering platform extension: {}", name);
        self.extensions.insert(name, extension);
    }

    /// Get an extension by platform name.
    pub fn get(&self, name: &str) -> Option<&dyn PlatformExtension> {
        self.extensions.get(name).map(|e| e.as_ref())
    }

    /// Get an extension by platform name, failing if none is registered.
    pub fn get_required(&self, name: &str) -> ConvertResult<&dyn PlatformExtension> {
        self.get(name)
            .ok_or_else(|| ConvertError::UnsupportedPlatform(name.to_string()))
    }

    /// Check whether a platform is supported.
    pub fn contains(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    /// All registered platform names.
    pub fn names(&self) -> Vec<&str> {
        self.extensions.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl std::fmt::Debug for dyn PlatformExtension + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformExtension")
            .field("name", &self.name())
            .finish()
    }
}

impl std::fmt::Debug for PlatformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformRegistry")
            .field("platforms", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}
