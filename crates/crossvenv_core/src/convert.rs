//! The conversion pipeline.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::ConfigPair;
use crate::context::TemplateContext;
use crate::error::{ConvertError, ConvertResult};
use crate::platform::PlatformRegistry;
use crate::pydict;
use crate::shim::{self, ShimRenderer};
use crate::vars;
use crate::venv::Venv;

/// Name of the activation file dropped into site-packages.
pub const ACTIVATION_FILE: &str = "_cross_venv.pth";

/// Platform identity parsed from a sysconfig document filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIdentity {
    pub abiflags: String,
    pub platform: String,
    pub multiarch: String,
    pub arch: String,
    pub sdk: String,
}

impl PlatformIdentity {
    /// Parse `_sysconfigdata_<abiflags>_<platform>_<multiarch>` from a
    /// config file name, ignoring the extension.
    ///
    /// The stem must split on `_` into exactly those fields; the multiarch
    /// tag further splits on its first hyphen into arch and sdk. abiflags
    /// may be empty (builds without ABI flags), the other fields may not.
    pub fn parse(config_path: &Path) -> ConvertResult<Self> {
        let stem = config_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| malformed(config_path))?;

        let fields: Vec<&str> = stem.split('_').collect();
        let (abiflags, platform, multiarch) = match fields[..] {
            ["", "sysconfigdata", abiflags, platform, multiarch] => (abiflags, platform, multiarch),
            _ => return Err(malformed(config_path)),
        };
        if platform.is_empty() {
            return Err(malformed(config_path));
        }
        let (arch, sdk) = multiarch
            .split_once('-')
            .ok_or_else(|| malformed(config_path))?;
        if arch.is_empty() || sdk.is_empty() {
            return Err(malformed(config_path));
        }

        Ok(Self {
            abiflags: abiflags.to_string(),
            platform: platform.to_string(),
            multiarch: multiarch.to_string(),
            arch: arch.to_string(),
            sdk: sdk.to_string(),
        })
    }

    /// Name of the shim module generated for this identity.
    pub fn shim_module_name(&self) -> String {
        shim::module_name(&self.platform, &self.multiarch)
    }
}

fn malformed(config_path: &Path) -> ConvertError {
    let name = config_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config_path.to_string_lossy().into_owned());
    ConvertError::MalformedConfigName(name)
}

/// Convert a native venv into a cross-compilation target venv.
///
/// Validation (venv structure, config path, venv/config pairing, filename
/// parse) happens before anything is written. The write phase is not
/// transactional: a failure partway through leaves earlier artifacts on
/// disk, and re-running after fixing the error converges because every
/// artifact is overwritten deterministically.
///
/// Returns the human-readable `"<os> <multiarch>"` description of the
/// target platform.
pub fn convert(
    venv_path: &Path,
    config_path: &Path,
    registry: &PlatformRegistry,
) -> ConvertResult<String> {
    let venv = Venv::inspect(venv_path)?;

    if !config_path.is_file() {
        return Err(ConvertError::ConfigNotFound(config_path.to_path_buf()));
    }

    // The pythonX.Y segment above site-packages must match the one the
    // config was built for; pairing across interpreter versions is refused.
    let venv_python = venv.python_dir_name();
    let config_python = parent_dir_name(config_path);
    if venv_python != config_python {
        return Err(ConvertError::ConsistencyError {
            venv: venv_python,
            config: config_python,
        });
    }

    let identity = PlatformIdentity::parse(config_path)?;
    info!(
        "Converting {:?} for {} ({})",
        venv.root, identity.platform, identity.multiarch
    );

    let pair = ConfigPair::load(config_path)?;

    // The config lives at <base>/lib/pythonX.Y/<file>; that base is the
    // install location the venv will see at runtime.
    let new_base = config_path
        .ancestors()
        .nth(3)
        .unwrap_or_else(|| Path::new(""));
    debug!("Localizing build-time paths to {:?}", new_base);

    let localized_doc = vars::localize(&pair.document_vars, new_base)?;
    let document_out = venv.site_packages.join(file_name(&pair.document_path));
    fs::write(&document_out, serde_json::to_string_pretty(&localized_doc)?)?;

    let localized_module = vars::localize(&pair.module_vars, new_base)?;
    let module_out = venv.site_packages.join(file_name(&pair.module_path));
    fs::write(
        &module_out,
        pydict::write_module(&pair.module_path.display().to_string(), &localized_module),
    )?;

    let mut context = TemplateContext::new();
    context.set("platform", &identity.platform);
    // Some platforms use different capitalization for the OS name; their
    // extension overwrites this default.
    context.set("os", &identity.platform);
    context.set("multiarch", &identity.multiarch);
    context.set("abiflags", &identity.abiflags);
    context.set("arch", &identity.arch);
    context.set("sdk", &identity.sdk);

    let extension = registry.get_required(&identity.platform)?;
    extension.extend_context(&mut context, &localized_doc)?;
    let context = context.freeze();

    let shim_name = identity.shim_module_name();
    let rendered = ShimRenderer::new().render_cross_target(&context)?;
    fs::write(
        venv.site_packages.join(format!("{}.py", shim_name)),
        rendered,
    )?;

    fs::write(
        venv.site_packages.join(ACTIVATION_FILE),
        format!("import {}\n", shim_name),
    )?;

    let os_name = context.get("os").unwrap_or(&identity.platform);
    Ok(format!("{} {}", os_name, identity.multiarch))
}

fn parent_dir_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
