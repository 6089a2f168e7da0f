//! Emscripten platform extension.

use tracing::debug;

use crossvenv_core::{BuildVars, ConvertResult, PlatformExtension, TemplateContext};

/// SDK version reported when the config does not carry one.
const DEFAULT_SDK_VERSION: &str = "4.0.12";

/// Build-time variable naming the Emscripten SDK version.
const SDK_VERSION_VAR: &str = "EMSCRIPTEN_SDK_VERSION";

/// Extension for venvs targeting Emscripten (WebAssembly).
pub struct Emscripten;

impl PlatformExtension for Emscripten {
    fn name(&self) -> &str {
        "emscripten"
    }

    fn extend_context(
        &self,
        context: &mut TemplateContext,
        vars: &BuildVars,
    ) -> ConvertResult<()> {
        let version = vars
            .get_str(SDK_VERSION_VAR)
            .unwrap_or(DEFAULT_SDK_VERSION)
            .to_string();
        let machine = context.get("arch").unwrap_or("wasm32").to_string();
        debug!("Extending context for emscripten SDK {}", version);

        context.set("release", &version);
        context.set("platform_version", &version);
        context.set("machine", machine);

        context.set("os_sysname", "Emscripten");
        context.set("os_nodename", "emscripten");
        context.set("os_release", &version);
        context.set("os_version", "#1");

        context.set(
            "platform_extra",
            format!(
                "\n@monkeypatch(platform)\ndef libc_ver():\n    return (\"emscripten\", \"{}\")\n",
                version
            ),
        );

        Ok(())
    }
}
