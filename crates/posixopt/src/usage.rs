use crate::registry::normalize;
use indexmap::IndexSet;
use std::collections::HashMap;

/// Per-command allow-lists.
///
/// A command without an entry is unrestricted. Names are stored
/// lowercased; [`crate::GetOpt::add_usage`] resolves aliases to primary
/// names before they get here.
#[derive(Debug, Clone, Default)]
pub struct UsageDefinition {
    allowed: HashMap<String, IndexSet<String>>,
}

impl UsageDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `options` together with `command`, extending any existing entry.
    pub fn allow<I, S>(&mut self, command: &str, options: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.allowed.entry(normalize(command)).or_default();
        entry.extend(options.into_iter().map(|o| normalize(o.as_ref())));
        self
    }

    pub fn allowed(&self, command: &str) -> Option<&IndexSet<String>> {
        self.allowed.get(&normalize(command))
    }

    pub fn is_restricted(&self, command: &str) -> bool {
        self.allowed(command).is_some()
    }

    /// Whether `option` may be used with `command`.
    pub fn is_allowed(&self, command: &str, option: &str) -> bool {
        self.allowed(command)
            .is_none_or(|set| set.contains(&normalize(option)))
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
