//! Preview registry
//!
//! Process-wide list of registered previews, built once during startup from
//! a statically declared set of registration functions and shared read-only
//! (via `Arc`) for the life of the process. The list is append-only:
//! insertion order is preserved for listing and duplicate names are kept,
//! with lookup returning the first match.

use crate::preview::PreviewProvider;
use std::sync::Arc;

/// Registration hook a host application contributes at startup.
pub type RegisterFn = fn(&mut PreviewRegistry);

#[derive(Default)]
pub struct PreviewRegistry {
    entries: Vec<(String, Arc<dyn PreviewProvider>)>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Run every registration function once, in declaration order.
    pub fn from_providers(register_fns: &[RegisterFn]) -> Self {
        let mut registry = Self::new();
        for register in register_fns {
            register(&mut registry);
        }
        registry
    }

    pub fn register(&mut self, name: &str, provider: Arc<dyn PreviewProvider>) {
        self.entries.push((name.to_string(), provider));
    }

    /// Registered names in declaration order; duplicates included.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// First provider registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn PreviewProvider>> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, provider)| provider)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
