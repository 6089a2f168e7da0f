//! Template context assembled for shim rendering.

/// The context a shim is rendered from.
///
/// The orchestrator seeds the identity fields, the selected platform
/// extension adds the OS-identity fields, and the result is frozen before
/// rendering; nothing mutates it afterwards. Entries keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    entries: Vec<(String, String)>,
}

impl TemplateContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing in place if it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Freeze the context for rendering.
    pub fn freeze(self) -> FrozenContext {
        FrozenContext {
            entries: self.entries,
        }
    }
}

/// An immutable view of a fully assembled context.
#[derive(Debug, Clone)]
pub struct FrozenContext {
    entries: Vec<(String, String)>,
}

impl FrozenContext {
    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
