//! Canonical per-type configuration model.
//!
//! A [`ServiceDescriptor`] is synthesized once per generation run from
//! static source analysis, consumed by the planner, and discarded after
//! emission. Nothing here survives a run.

use std::fmt;

/// Lifetime a registration is planned with.
///
/// Mirrors the three-lifetime surface of the runtime collection; the
/// generator only ever writes the lifetime into emitted method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// One instance for the whole application.
    Singleton,
    /// One instance per scope.
    Scoped,
    /// A fresh instance per resolution.
    Transient,
}

impl Lifetime {
    /// Method-name fragment used by the emitter (`add_singleton`, ...).
    pub fn method_suffix(&self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        }
    }

    /// Maps the legacy integer ordinal (0, 1, 2) to a lifetime.
    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Singleton),
            1 => Some(Self::Scoped),
            2 => Some(Self::Transient),
            _ => None,
        }
    }

    /// Matches a lifetime name case-insensitively (`Scoped`, `scoped`).
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("singleton") {
            Some(Self::Singleton)
        } else if name.eq_ignore_ascii_case("scoped") {
            Some(Self::Scoped)
        } else if name.eq_ignore_ascii_case("transient") {
            Some(Self::Transient)
        } else {
            None
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_suffix())
    }
}

/// Identity of an implementation type: where it is declared and how many
/// generic parameters it leaves unbound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    /// Type name as declared (`OrderService`).
    pub name: String,
    /// Module path from the crate root, `::`-joined; empty at the root.
    pub module: String,
    /// Unbound generic parameters: type and const parameters count,
    /// lifetimes do not.
    pub arity: usize,
}

impl TypeIdentity {
    /// Crate-relative qualified path (`billing::orders::OrderService`).
    ///
    /// This is the deduplication key: the first descriptor seen for a
    /// qualified path wins, later ones are dropped.
    pub fn qualified(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.module, self.name)
        }
    }

    /// Path as emitted into generated code, rooted at `crate::`.
    pub fn emit_path(&self) -> String {
        format!("crate::{}", self.qualified())
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// A resolved contract: the base path plus any generic arguments the
/// implementing `impl` block applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRef {
    /// Base path without generic arguments, as it should appear in
    /// emitted code (`crate::notify::Notifier`, or as written when the
    /// trait could not be resolved to a local declaration).
    pub path: String,
    /// Rendered generic arguments, empty for a plain trait.
    pub args: Vec<String>,
}

impl ContractRef {
    /// Contract with no generic arguments.
    pub fn plain(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// Number of generic arguments the contract was written with.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Rendered form with arguments, used for closed-type registration.
    pub fn rendered(&self) -> String {
        if self.args.is_empty() {
            self.path.clone()
        } else {
            format!("{}<{}>", self.path, self.args.join(", "))
        }
    }
}

impl fmt::Display for ContractRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered())
    }
}

/// Position of the marker attribute that produced a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file the marker appears in, as supplied to the source set.
    pub file: String,
    /// 1-based line of the marker attribute.
    pub line: usize,
    /// 0-based column of the marker attribute.
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Canonical configuration record for one annotated type.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The implementing type.
    pub identity: TypeIdentity,
    /// Registration lifetime.
    pub lifetime: Lifetime,
    /// Optional service key; presence switches to keyed registration.
    pub key: Option<String>,
    /// Optional category gate; presence wraps emission in a runtime check.
    pub category: Option<String>,
    /// Idempotent registration: skip when the contract is already present.
    pub try_add: bool,
    /// Register the implementation type alone, clearing the contract list.
    pub as_self: bool,
    /// Explicit single-contract override, as written in the marker.
    pub explicit_contract: Option<ContractRef>,
    /// Resolved contracts, in `impl` declaration order.
    pub contracts: Vec<ContractRef>,
    /// Where the marker attribute sits, for diagnostics.
    pub location: SourceLocation,
}

impl ServiceDescriptor {
    /// Whether the implementation declares unbound generic parameters and
    /// must be registered by type reference.
    pub fn is_open_generic(&self) -> bool {
        self.identity.arity > 0
    }

    /// `as_self` and an explicit contract are mutually exclusive; a
    /// descriptor carrying both is excluded from emission and reported.
    pub fn has_conflict(&self) -> bool {
        self.as_self && self.explicit_contract.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_path_is_module_plus_name() {
        let identity = TypeIdentity {
            name: "OrderService".into(),
            module: "billing::orders".into(),
            arity: 0,
        };
        assert_eq!(identity.qualified(), "billing::orders::OrderService");
        assert_eq!(identity.emit_path(), "crate::billing::orders::OrderService");
    }

    #[test]
    fn test_root_module_types_have_bare_names() {
        let identity = TypeIdentity {
            name: "Root".into(),
            module: String::new(),
            arity: 0,
        };
        assert_eq!(identity.qualified(), "Root");
        assert_eq!(identity.emit_path(), "crate::Root");
    }

    #[test]
    fn test_lifetime_ordinals_match_the_legacy_encoding() {
        assert_eq!(Lifetime::from_ordinal(0), Some(Lifetime::Singleton));
        assert_eq!(Lifetime::from_ordinal(1), Some(Lifetime::Scoped));
        assert_eq!(Lifetime::from_ordinal(2), Some(Lifetime::Transient));
        assert_eq!(Lifetime::from_ordinal(3), None);
    }

    #[test]
    fn test_lifetime_names_are_case_insensitive() {
        assert_eq!(Lifetime::from_name("Scoped"), Some(Lifetime::Scoped));
        assert_eq!(Lifetime::from_name("TRANSIENT"), Some(Lifetime::Transient));
        assert_eq!(Lifetime::from_name("other"), None);
    }

    #[test]
    fn test_contract_rendering_includes_arguments() {
        let contract = ContractRef {
            path: "crate::repo::Repository".into(),
            args: vec!["u32".into()],
        };
        assert_eq!(contract.rendered(), "crate::repo::Repository<u32>");
        assert_eq!(contract.arity(), 1);
        assert_eq!(ContractRef::plain("crate::X").rendered(), "crate::X");
    }
}
