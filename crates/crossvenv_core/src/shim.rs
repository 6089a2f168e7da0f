//! Cross-target shim rendering.
//!
//! The shim text lives in a bundled template asset with `{{name}}`
//! placeholders. The placeholder set is a fixed contract between the
//! template and the platform extensions; a placeholder with no context
//! value is an error rather than being passed through.

use regex::Regex;

use crate::context::FrozenContext;
use crate::error::{ConvertError, ConvertResult};

/// The bundled cross-target shim template.
pub const CROSS_TARGET_TEMPLATE: &str = include_str!("../assets/cross_target.py.tmpl");

/// Module name for a platform/multiarch pair, e.g.
/// `_cross_emscripten_wasm32_emscripten`.
pub fn module_name(platform: &str, multiarch: &str) -> String {
    format!("_cross_{}_{}", platform, multiarch.replace('-', "_"))
}

/// Renderer substituting context fields into a shim template.
pub struct ShimRenderer {
    placeholder: Regex,
}

impl Default for ShimRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShimRenderer {
    /// Create a new shim renderer.
    pub fn new() -> Self {
        Self {
            // Match {{field_name}} pattern
            placeholder: Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").unwrap(),
        }
    }

    /// Render the bundled cross-target template.
    pub fn render_cross_target(&self, context: &FrozenContext) -> ConvertResult<String> {
        self.render(CROSS_TARGET_TEMPLATE, context)
    }

    /// Render a template against a frozen context.
    pub fn render(&self, template: &str, context: &FrozenContext) -> ConvertResult<String> {
        let mut missing = Vec::new();
        let rendered = self
            .placeholder
            .replace_all(template, |caps: &regex::Captures| {
                let name = caps[1].to_string();
                match context.get(&name) {
                    Some(value) => value.to_string(),
                    None => {
                        missing.push(name);
                        String::new()
                    }
                }
            })
            .to_string();

        if let Some(name) = missing.first() {
            return Err(ConvertError::RenderError(format!(
                "no value for placeholder {{{{{}}}}}",
                name
            )));
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TemplateContext;

    #[test]
    fn test_module_name_flattens_hyphens() {
        assert_eq!(
            module_name("emscripten", "wasm32-emscripten"),
            "_cross_emscripten_wasm32_emscripten"
        );
        assert_eq!(module_name("ios", "arm64-iphoneos"), "_cross_ios_arm64_iphoneos");
    }

    #[test]
    fn test_render_substitutes_fields() {
        let mut context = TemplateContext::new();
        context.set("os", "Emscripten");
        context.set("machine", "wasm32");

        let renderer = ShimRenderer::new();
        let rendered = renderer
            .render("system = \"{{os}}\"\nmachine = \"{{machine}}\"\n", &context.freeze())
            .unwrap();
        assert_eq!(rendered, "system = \"Emscripten\"\nmachine = \"wasm32\"\n");
    }

    #[test]
    fn test_render_leaves_single_braces_alone() {
        let context = TemplateContext::new().freeze();
        let renderer = ShimRenderer::new();
        let rendered = renderer.render("d = {'a': 1}\n", &context).unwrap();
        assert_eq!(rendered, "d = {'a': 1}\n");
    }

    #[test]
    fn test_render_missing_placeholder_is_an_error() {
        let context = TemplateContext::new().freeze();
        let renderer = ShimRenderer::new();
        let err = renderer.render("{{nonexistent}}", &context).unwrap_err();
        assert!(matches!(err, ConvertError::RenderError(_)));
    }
}
