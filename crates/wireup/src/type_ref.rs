//! References to open generic types.
//!
//! Rust has no runtime handle for an unapplied generic (`Repository<T>` is
//! not a type until `T` is chosen), so open registrations carry a symbolic
//! [`TypeRef`] instead of a [`std::any::TypeId`]. The generator emits these
//! with fully qualified paths so two crates referring to the same generic
//! agree on the identity.

use std::fmt;

/// A symbolic reference to an open generic type.
///
/// Identity is the pair of path and arity: `pause::Repository` with arity 1
/// and `pause::Repository` with arity 2 are distinct services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef {
    path: &'static str,
    arity: usize,
}

impl TypeRef {
    /// Creates a reference from a fully qualified path and the number of
    /// generic parameters left unapplied.
    pub const fn new(path: &'static str, arity: usize) -> Self {
        Self { path, arity }
    }

    /// Fully qualified path without generic arguments.
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Number of unapplied generic parameters.
    pub const fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)?;
        if self.arity > 0 {
            f.write_str("<")?;
            for i in 0..self.arity {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str("_")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_renders_placeholder_arguments() {
        assert_eq!(TypeRef::new("pause::Repository", 1).to_string(), "pause::Repository<_>");
        assert_eq!(
            TypeRef::new("pause::Cache", 2).to_string(),
            "pause::Cache<_, _>"
        );
    }

    #[test]
    fn test_zero_arity_renders_bare_path() {
        assert_eq!(TypeRef::new("pause::Thing", 0).to_string(), "pause::Thing");
    }

    #[test]
    fn test_identity_includes_arity() {
        assert_ne!(
            TypeRef::new("pause::Repository", 1),
            TypeRef::new("pause::Repository", 2)
        );
        assert_eq!(
            TypeRef::new("pause::Repository", 1),
            TypeRef::new("pause::Repository", 1)
        );
    }
}
