//! Service lifetime definitions.

use std::fmt;

/// Lifetime of a registered service.
///
/// Controls how a container caches instances created from a registration:
///
/// - **Singleton**: one instance for the whole application
/// - **Scoped**: one instance per scope
/// - **Transient**: a fresh instance per resolution
///
/// The collection only records the lifetime; caching behavior belongs to
/// the resolving container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per application, cached forever.
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime.
    Scoped,
    /// New instance per resolution, never cached.
    Transient,
}

impl Lifetime {
    /// Canonical lowercase name, as used in generated code and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
