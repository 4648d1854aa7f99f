//! Generator options.
//!
//! Three knobs configure the emitted artifact: the extension method name,
//! the namespace (the module the artifact is wrapped in), and whether the
//! surface is crate-internal. Options arrive from several places — a TOML
//! config file, a build-supplied key/value map, environment variables, CLI
//! flags — and all of them feed the same struct; later layers override
//! earlier ones field by field.

use std::collections::BTreeMap;
use std::env;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::source::SourceSet;

/// Map key and TOML field for the method-name override.
pub const KEY_METHOD_NAME: &str = "method_name";
/// Map key and TOML field for the namespace override.
pub const KEY_NAMESPACE: &str = "namespace";
/// Map key and TOML field for the accessibility toggle.
pub const KEY_INTERNAL: &str = "internal";

/// Environment variable for the method-name override.
pub const ENV_METHOD_NAME: &str = "WIREUP_METHOD_NAME";
/// Environment variable for the namespace override.
pub const ENV_NAMESPACE: &str = "WIREUP_NAMESPACE";
/// Environment variable for the accessibility toggle.
pub const ENV_INTERNAL: &str = "WIREUP_INTERNAL";

const DEFAULT_METHOD_NAME: &str = "add_generated_services";
const DEFAULT_NAMESPACE: &str = "generated";

/// Configuration for one generation run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Name of the generated extension method; `add_generated_services`
    /// when absent.
    pub method_name: Option<String>,
    /// Module the artifact is wrapped in; when absent the source set's
    /// crate name, then its package name, then `generated` apply.
    pub namespace: Option<String>,
    /// Emit a `pub(crate)` surface instead of `pub`.
    pub internal: bool,
}

impl GeneratorOptions {
    /// Builds options from a string key/value map. Exactly the keys
    /// `method_name`, `namespace` and `internal` are recognized; anything
    /// else is rejected so a typoed key does not silently fall back.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                KEY_METHOD_NAME => options.method_name = Some(value.clone()),
                KEY_NAMESPACE => options.namespace = Some(value.clone()),
                KEY_INTERNAL => options.internal = parse_bool(key, value)?,
                _ => return Err(Error::invalid_option(key, "unrecognized option key")),
            }
        }
        options.validate()?;
        Ok(options)
    }

    /// Builds options from the `WIREUP_*` environment variables, the cargo
    /// rendition of build-supplied properties.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Ok(value) = env::var(ENV_METHOD_NAME) {
            options.method_name = Some(value);
        }
        if let Ok(value) = env::var(ENV_NAMESPACE) {
            options.namespace = Some(value);
        }
        if let Ok(value) = env::var(ENV_INTERNAL) {
            options.internal = parse_bool(KEY_INTERNAL, &value)?;
        }
        options.validate()?;
        Ok(options)
    }

    /// Overlays `over` on top of `self`: fields set in `over` win.
    pub fn merge(mut self, over: Self) -> Self {
        if over.method_name.is_some() {
            self.method_name = over.method_name;
        }
        if over.namespace.is_some() {
            self.namespace = over.namespace;
        }
        self.internal = self.internal || over.internal;
        self
    }

    /// Effective extension method name.
    pub fn method_name(&self) -> &str {
        self.method_name.as_deref().unwrap_or(DEFAULT_METHOD_NAME)
    }

    /// Effective namespace: explicit option, then the set's crate name,
    /// then its package name, then `generated`. Names are sanitized into
    /// valid module identifiers (`my-pkg` becomes `my_pkg`).
    pub fn resolve_namespace(&self, sources: &SourceSet) -> String {
        let raw = self
            .namespace
            .as_deref()
            .or_else(|| sources.crate_name())
            .or_else(|| sources.package_name())
            .unwrap_or(DEFAULT_NAMESPACE);
        sanitize_ident(raw)
    }

    /// Rejects values that would not survive as identifiers in the
    /// artifact.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.method_name
            && !is_ident(name)
        {
            return Err(Error::invalid_option(
                KEY_METHOD_NAME,
                format!("`{name}` is not a valid identifier"),
            ));
        }
        if let Some(namespace) = &self.namespace
            && !is_ident(&sanitize_ident(namespace))
        {
            return Err(Error::invalid_option(
                KEY_NAMESPACE,
                format!("`{namespace}` is not a valid module name"),
            ));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(Error::invalid_option(
            key,
            format!("expected a boolean, got `{value}`"),
        )),
    }
}

fn sanitize_ident(raw: &str) -> String {
    raw.replace('-', "_")
}

fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_nothing_is_set() {
        let options = GeneratorOptions::default();
        assert_eq!(options.method_name(), "add_generated_services");
        assert!(!options.internal);
        assert_eq!(
            options.resolve_namespace(&SourceSet::new()),
            "generated"
        );
    }

    #[test]
    fn test_namespace_fallback_prefers_crate_then_package_name() {
        let options = GeneratorOptions::default();
        let set = SourceSet::new()
            .with_crate_name("billing_core")
            .with_package_name("billing-pkg");
        assert_eq!(options.resolve_namespace(&set), "billing_core");

        let set = SourceSet::new().with_package_name("billing-pkg");
        assert_eq!(options.resolve_namespace(&set), "billing_pkg");

        let explicit = GeneratorOptions {
            namespace: Some("registrations".into()),
            ..Default::default()
        };
        assert_eq!(explicit.resolve_namespace(&set), "registrations");
    }

    #[test]
    fn test_from_map_recognizes_exactly_the_three_keys() {
        let mut map = BTreeMap::new();
        map.insert("method_name".to_string(), "install_all".to_string());
        map.insert("internal".to_string(), "true".to_string());
        let options = GeneratorOptions::from_map(&map).unwrap();
        assert_eq!(options.method_name(), "install_all");
        assert!(options.internal);

        map.insert("methd_name".to_string(), "oops".to_string());
        assert!(GeneratorOptions::from_map(&map).is_err());
    }

    #[test]
    fn test_invalid_method_name_is_rejected() {
        let mut map = BTreeMap::new();
        map.insert("method_name".to_string(), "0bad name".to_string());
        assert!(GeneratorOptions::from_map(&map).is_err());
    }

    #[test]
    fn test_merge_overlays_set_fields_only() {
        let base = GeneratorOptions {
            method_name: Some("base_name".into()),
            namespace: Some("base_ns".into()),
            internal: false,
        };
        let over = GeneratorOptions {
            method_name: None,
            namespace: Some("over_ns".into()),
            internal: true,
        };
        let merged = base.merge(over);
        assert_eq!(merged.method_name(), "base_name");
        assert_eq!(merged.namespace.as_deref(), Some("over_ns"));
        assert!(merged.internal);
    }

    #[test]
    fn test_bool_parsing_accepts_common_spellings() {
        assert!(parse_bool("internal", "TRUE").unwrap());
        assert!(parse_bool("internal", "1").unwrap());
        assert!(!parse_bool("internal", "false").unwrap());
        assert!(parse_bool("internal", "maybe").is_err());
    }
}
