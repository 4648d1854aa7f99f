//! Position-attributed diagnostics.
//!
//! One hard class exists: `WG0001`, an `as_self` directive combined with an
//! explicit contract override on the same marker. The offending type is
//! excluded from emission and the rest of the pass continues; a diagnostic
//! never aborts generation for other types.

use std::fmt;

use crate::model::{ServiceDescriptor, SourceLocation};

/// Conflicting `as_self` + `contract` configuration.
pub const CONFLICTING_CONFIGURATION: &str = "WG0001";

/// How severe a diagnostic is for the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks emission for the offending type; a build should fail.
    Error,
    /// Informational; emission proceeds.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// One diagnostic produced during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable diagnostic code (`WG0001`).
    pub code: &'static str,
    /// Severity for the build.
    pub severity: Severity,
    /// Position of the marker attribute that caused the diagnostic.
    pub location: SourceLocation,
    /// Human-readable description naming the offending type.
    pub message: String,
}

impl Diagnostic {
    /// Whether this diagnostic should fail a build.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The `WG0001` conflict for one descriptor.
    pub fn conflicting_configuration(descriptor: &ServiceDescriptor) -> Self {
        Self {
            code: CONFLICTING_CONFIGURATION,
            severity: Severity::Error,
            location: descriptor.location.clone(),
            message: format!(
                "service `{}` sets both `as_self` and an explicit `contract`; \
                 the two are mutually exclusive, keep one",
                descriptor.identity
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.code, self.location, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lifetime, TypeIdentity};

    fn conflicted() -> ServiceDescriptor {
        ServiceDescriptor {
            identity: TypeIdentity {
                name: "Svc".into(),
                module: "services".into(),
                arity: 0,
            },
            lifetime: Lifetime::Singleton,
            key: None,
            category: None,
            try_add: false,
            as_self: true,
            explicit_contract: Some(crate::model::ContractRef::plain("crate::Api")),
            contracts: Vec::new(),
            location: SourceLocation {
                file: "services.rs".into(),
                line: 4,
                column: 0,
            },
        }
    }

    #[test]
    fn test_conflict_diagnostic_names_type_and_position() {
        let diagnostic = Diagnostic::conflicting_configuration(&conflicted());
        assert!(diagnostic.is_error());
        let rendered = diagnostic.to_string();
        assert!(rendered.contains("WG0001"));
        assert!(rendered.contains("services::Svc"));
        assert!(rendered.contains("services.rs:4:0"));
        assert!(rendered.contains("mutually exclusive"));
    }
}
