//! Key namespacing

/// Owner namespace applied to every key the store touches
///
/// Keys become `namespace:key`. The namespace is also what makes `clear`
/// owner-scoped on a shared Redis server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyspace {
    namespace: Option<String>,
}

impl Keyspace {
    /// Keyspace for an optional namespace; blank namespaces are ignored
    pub fn new(namespace: Option<String>) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.trim().is_empty()),
        }
    }

    /// Keyspace with no namespace
    pub fn global() -> Self {
        Self::default()
    }

    /// Configured namespace
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Qualify a caller key (or key prefix)
    pub fn qualify(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}:{key}"),
            None => key.to_string(),
        }
    }

    /// Prefix shared by every key this keyspace owns, if scoped
    pub fn owner_prefix(&self) -> Option<String> {
        self.namespace.as_ref().map(|ns| format!("{ns}:"))
    }
}
