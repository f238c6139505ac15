//! Canonical identity for cached calls
//!
//! A cached operation is keyed by the arguments it was called with. Two
//! calls share a cache entry only when their positional arguments match in
//! value and order and their named arguments match as an unordered set of
//! name/value pairs.

use std::collections::BTreeMap;

/// Identity of a single call to a cached operation
///
/// Positional arguments are order-sensitive; named arguments are stored
/// sorted by name, so the order they are supplied in does not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CallKey {
    positional: Vec<String>,
    named: BTreeMap<String, String>,
}

impl CallKey {
    /// Creates an empty key (a call with no arguments)
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument value
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.positional.push(value.to_string());
        self
    }

    /// Sets a named argument value
    ///
    /// Supplying the same name twice keeps the latest value, matching how a
    /// call site can only bind a named argument once.
    pub fn named_arg(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.named.insert(name.into(), value.to_string());
        self
    }
}
