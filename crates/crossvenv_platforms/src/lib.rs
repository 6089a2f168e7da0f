//! # crossvenv_platforms
//!
//! Built-in platform extensions for crossvenv.
//!
//! Each supported target platform implements
//! [`PlatformExtension`](crossvenv_core::PlatformExtension) in its own
//! module. New platforms are added by implementing the trait and
//! registering the type in [`builtin`]; the conversion pipeline itself
//! carries no platform-specific logic.

pub mod emscripten;

pub use emscripten::Emscripten;

use crossvenv_core::PlatformRegistry;

/// Registry with all built-in platform extensions registered.
pub fn builtin() -> PlatformRegistry {
    let mut registry = PlatformRegistry::new();
    registry.register(Box::new(Emscripten));
    registry
}
