//! Symbol graph over the scanned forest.
//!
//! The scanner is purely structural; this module is the semantic step that
//! turns its raw declarations into something the resolver can query: which
//! traits a type implements, what a written path refers to in a given
//! scope, and whether a trait is reachable through a supertrait chain.
//!
//! Name resolution is deliberately best-effort. A written path resolves via
//! the local module's declarations first, then the file-and-module `use`
//! map, and otherwise stays as written and is treated as external. That is
//! enough for the dominant case (contracts declared in the scanned crate)
//! without reimplementing rustc's name resolution.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::model::{ContractRef, TypeIdentity};
use crate::scanner::ScanOutput;

/// Traits whose impls never become contracts: the prelude set plus anything
/// rooted at `std`/`core`/`alloc`. The standard-library analog of excluding
/// framework disposal interfaces from registration.
static PRELUDE_TRAITS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Clone", "Copy", "Debug", "Default", "Display", "Drop", "Eq", "Error", "Extend", "Fn",
        "FnMut", "FnOnce", "From", "Hash", "Into", "IntoIterator", "Iterator", "Ord", "PartialEq",
        "PartialOrd", "Send", "Sized", "Sync", "ToString", "TryFrom", "TryInto", "Unpin", "AsMut",
        "AsRef", "Deref", "DerefMut",
    ]
    .into_iter()
    .collect()
});

/// Where a written path ended up pointing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A declaration in the scanned crate, crate-relative qualified path.
    Local(String),
    /// Anything else, kept as written (after `use` expansion).
    External(String),
}

impl Resolution {
    /// Path as it should appear in emitted code.
    pub fn emit_path(&self) -> String {
        match self {
            Self::Local(qualified) => format!("crate::{qualified}"),
            Self::External(path) => path.clone(),
        }
    }
}

/// Outcome of checking an explicit contract override against a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractVerdict {
    /// The override names the implementation type itself.
    SelfType,
    /// The override is implemented, directly or through a supertrait chain.
    Implemented(ContractRef),
    /// The override could not be tied to the type; callers fall back to the
    /// full contract list rather than dropping the registration.
    Unverified(ContractRef),
}

/// A scope a path was written in: the file and the module within it.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Source file the path appears in.
    pub file: &'a str,
    /// `::`-joined module path within the file, empty at the root.
    pub module: &'a str,
}

#[derive(Debug)]
struct ImplRecord {
    self_qualified: Option<String>,
    trait_resolution: Resolution,
    trait_args: Vec<String>,
    excluded: bool,
}

/// Semantic index built once per generation run.
#[derive(Debug, Default)]
pub struct SymbolGraph {
    // qualified path -> declared, for both types and traits
    decls: HashSet<String>,
    trait_supers: HashMap<String, Vec<String>>,
    trait_scopes: HashMap<String, (String, String)>,
    impls: Vec<ImplRecord>,
    impls_by_type: HashMap<String, Vec<usize>>,
    uses: HashMap<(String, String), HashMap<String, String>>,
}

impl SymbolGraph {
    /// Indexes one scan's declarations, resolving every impl's self type
    /// and trait path in the scope the impl was written in.
    pub fn build(scan: &ScanOutput) -> Self {
        let mut graph = Self {
            uses: scan.uses.clone(),
            ..Self::default()
        };

        for ty in &scan.types {
            graph.decls.insert(qualify(&ty.module, &ty.name));
        }
        for tr in &scan.traits {
            let qualified = qualify(&tr.module, &tr.name);
            graph.decls.insert(qualified.clone());
            graph
                .trait_scopes
                .insert(qualified.clone(), (tr.file.clone(), tr.module.clone()));
            graph.trait_supers.insert(qualified, tr.supertraits.clone());
        }

        for imp in &scan.impls {
            let scope = Scope {
                file: &imp.file,
                module: &imp.module,
            };
            let self_qualified = match graph.resolve(&imp.self_ty, scope) {
                Resolution::Local(qualified) => Some(qualified),
                Resolution::External(_) => None,
            };
            let trait_resolution = graph.resolve(&imp.trait_path, scope);
            let excluded = match &trait_resolution {
                Resolution::Local(_) => false,
                Resolution::External(path) => is_std_contract(path),
            };
            let index = graph.impls.len();
            if let Some(qualified) = &self_qualified {
                graph
                    .impls_by_type
                    .entry(qualified.clone())
                    .or_default()
                    .push(index);
            }
            graph.impls.push(ImplRecord {
                self_qualified,
                trait_resolution,
                trait_args: imp.trait_args.clone(),
                excluded,
            });
        }
        graph
    }

    /// Contracts a type is registered against by default: every directly
    /// implemented trait that survives the standard-library filter, in impl
    /// declaration order.
    pub fn contracts_of(&self, identity: &TypeIdentity) -> Vec<ContractRef> {
        let Some(indexes) = self.impls_by_type.get(&identity.qualified()) else {
            return Vec::new();
        };
        indexes
            .iter()
            .map(|&i| &self.impls[i])
            .filter(|record| !record.excluded)
            .map(|record| ContractRef {
                path: record.trait_resolution.emit_path(),
                args: record.trait_args.clone(),
            })
            .collect()
    }

    /// Checks an explicit contract override written in `scope` against the
    /// implementation type: the type itself, a directly implemented trait,
    /// or a trait reachable through supertrait chains all verify.
    pub fn verify_contract(
        &self,
        written: &str,
        identity: &TypeIdentity,
        scope: Scope<'_>,
    ) -> ContractVerdict {
        let resolution = self.resolve(written, scope);
        if resolution == Resolution::Local(identity.qualified()) {
            return ContractVerdict::SelfType;
        }

        let direct = self
            .impls_by_type
            .get(&identity.qualified())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for &index in direct {
            let record = &self.impls[index];
            if record.trait_resolution == resolution {
                return ContractVerdict::Implemented(ContractRef {
                    path: record.trait_resolution.emit_path(),
                    args: record.trait_args.clone(),
                });
            }
        }

        // Not implemented directly; walk supertrait chains of the traits
        // that are.
        let mut visited = HashSet::new();
        let mut frontier: Vec<Resolution> = direct
            .iter()
            .map(|&i| self.impls[i].trait_resolution.clone())
            .collect();
        while let Some(current) = frontier.pop() {
            let Resolution::Local(qualified) = &current else {
                continue;
            };
            if !visited.insert(qualified.clone()) {
                continue;
            }
            let supers = self.trait_supers.get(qualified).map(Vec::as_slice);
            let trait_scope = self.trait_scopes.get(qualified);
            let (Some(supers), Some((file, module))) = (supers, trait_scope) else {
                continue;
            };
            for written_super in supers {
                let resolved = self.resolve(
                    written_super,
                    Scope {
                        file: file.as_str(),
                        module: module.as_str(),
                    },
                );
                if resolved == resolution {
                    return ContractVerdict::Implemented(ContractRef::plain(resolved.emit_path()));
                }
                frontier.push(resolved);
            }
        }

        ContractVerdict::Unverified(ContractRef::plain(resolution.emit_path()))
    }

    /// Resolves a written path in a scope.
    ///
    /// `crate::`, `self::` and `super::` prefixes resolve structurally;
    /// single-segment names check the local module's declarations, then the
    /// scope's `use` map; multi-segment names expand their first segment
    /// through the `use` map. Anything still unmatched stays as written.
    pub fn resolve(&self, written: &str, scope: Scope<'_>) -> Resolution {
        let path = written.trim_start_matches("::");

        if let Some(rest) = path.strip_prefix("crate::") {
            return self.local_or_external(rest.to_string(), path);
        }
        if let Some(rest) = path.strip_prefix("self::") {
            return self.local_or_external(qualify(scope.module, rest), path);
        }
        if let Some(rest) = path.strip_prefix("super::") {
            let parent = match scope.module.rsplit_once("::") {
                Some((parent, _)) => parent,
                None => "",
            };
            return self.local_or_external(qualify(parent, rest), path);
        }

        match path.split_once("::") {
            None => {
                let in_module = qualify(scope.module, path);
                if self.decls.contains(&in_module) {
                    return Resolution::Local(in_module);
                }
                let scope_key = (scope.file.to_string(), scope.module.to_string());
                if let Some(full) = self.uses.get(&scope_key).and_then(|map| map.get(path)) {
                    return self.reresolve_expanded(full);
                }
                Resolution::External(path.to_string())
            }
            Some((first, rest)) => {
                let scope_key = (scope.file.to_string(), scope.module.to_string());
                if let Some(full) = self.uses.get(&scope_key).and_then(|map| map.get(first)) {
                    return self.reresolve_expanded(&format!("{full}::{rest}"));
                }
                // a child-module reference like `inner::Thing`
                let in_module = qualify(scope.module, path);
                if self.decls.contains(&in_module) {
                    return Resolution::Local(in_module);
                }
                if self.decls.contains(path) {
                    return Resolution::Local(path.to_string());
                }
                Resolution::External(path.to_string())
            }
        }
    }

    fn reresolve_expanded(&self, expanded: &str) -> Resolution {
        if let Some(rest) = expanded.strip_prefix("crate::") {
            return self.local_or_external(rest.to_string(), expanded);
        }
        if self.decls.contains(expanded) {
            return Resolution::Local(expanded.to_string());
        }
        Resolution::External(expanded.to_string())
    }

    fn local_or_external(&self, qualified: String, written: &str) -> Resolution {
        if self.decls.contains(&qualified) {
            Resolution::Local(qualified)
        } else {
            Resolution::External(written.to_string())
        }
    }
}

fn qualify(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}::{name}")
    }
}

/// Whether a written trait path is standard-library territory and filtered
/// out of contract lists.
pub fn is_std_contract(path: &str) -> bool {
    let path = path.trim_start_matches("::");
    match path.split_once("::") {
        Some((root, _)) => matches!(root, "std" | "core" | "alloc"),
        None => PRELUDE_TRAITS.contains(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;
    use crate::source::SourceSet;

    fn graph_of(content: &str) -> SymbolGraph {
        let set = SourceSet::new().with_source("lib.rs", content);
        SymbolGraph::build(&scan(&set).unwrap())
    }

    fn identity(module: &str, name: &str) -> TypeIdentity {
        TypeIdentity {
            name: name.into(),
            module: module.into(),
            arity: 0,
        }
    }

    #[test]
    fn test_contracts_follow_impl_order_and_skip_std_traits() {
        let graph = graph_of(
            r"
            pub trait Second {}
            pub trait First {}
            pub struct Svc;
            impl Second for Svc {}
            impl Clone for Svc { fn clone(&self) -> Self { Svc } }
            impl std::fmt::Debug for Svc {
                fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { Ok(()) }
            }
            impl First for Svc {}
            ",
        );
        let contracts = graph.contracts_of(&identity("", "Svc"));
        let paths: Vec<&str> = contracts.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["crate::Second", "crate::First"]);
    }

    #[test]
    fn test_local_traits_resolve_through_use_imports() {
        let set = SourceSet::new()
            .with_source("contracts.rs", "pub trait Notifier {}")
            .with_source(
                "services.rs",
                r"
                use crate::contracts::Notifier;
                pub struct Emailer;
                impl Notifier for Emailer {}
                ",
            );
        let graph = SymbolGraph::build(&scan(&set).unwrap());
        let contracts = graph.contracts_of(&identity("services", "Emailer"));
        assert_eq!(contracts[0].path, "crate::contracts::Notifier");
    }

    #[test]
    fn test_verify_accepts_the_type_itself() {
        let graph = graph_of("pub struct Svc;");
        let verdict = graph.verify_contract(
            "Svc",
            &identity("", "Svc"),
            Scope {
                file: "lib.rs",
                module: "",
            },
        );
        assert_eq!(verdict, ContractVerdict::SelfType);
    }

    #[test]
    fn test_verify_accepts_directly_implemented_traits() {
        let graph = graph_of(
            r"
            pub trait Api {}
            pub struct Svc;
            impl Api for Svc {}
            ",
        );
        let verdict = graph.verify_contract(
            "Api",
            &identity("", "Svc"),
            Scope {
                file: "lib.rs",
                module: "",
            },
        );
        assert_eq!(
            verdict,
            ContractVerdict::Implemented(ContractRef::plain("crate::Api"))
        );
    }

    #[test]
    fn test_verify_walks_supertrait_chains() {
        let graph = graph_of(
            r"
            pub trait Base {}
            pub trait Mid: Base {}
            pub trait Leaf: Mid {}
            pub struct Svc;
            impl Leaf for Svc {}
            ",
        );
        let verdict = graph.verify_contract(
            "Base",
            &identity("", "Svc"),
            Scope {
                file: "lib.rs",
                module: "",
            },
        );
        assert_eq!(
            verdict,
            ContractVerdict::Implemented(ContractRef::plain("crate::Base"))
        );
    }

    #[test]
    fn test_verify_reports_unrelated_contracts_as_unverified() {
        let graph = graph_of(
            r"
            pub trait Api {}
            pub trait Other {}
            pub struct Svc;
            impl Api for Svc {}
            ",
        );
        let verdict = graph.verify_contract(
            "Other",
            &identity("", "Svc"),
            Scope {
                file: "lib.rs",
                module: "",
            },
        );
        assert!(matches!(verdict, ContractVerdict::Unverified(_)));
    }

    #[test]
    fn test_generic_contracts_keep_impl_arguments() {
        let graph = graph_of(
            r"
            pub trait Repository<T> {}
            pub struct VecRepo<T>(Vec<T>);
            impl<T> Repository<T> for VecRepo<T> {}
            ",
        );
        let contracts = graph.contracts_of(&TypeIdentity {
            name: "VecRepo".into(),
            module: String::new(),
            arity: 1,
        });
        assert_eq!(contracts[0].path, "crate::Repository");
        assert_eq!(contracts[0].args, vec!["T"]);
    }

    #[test]
    fn test_std_filter_matches_roots_and_prelude_names() {
        assert!(is_std_contract("std::fmt::Debug"));
        assert!(is_std_contract("core::ops::Deref"));
        assert!(is_std_contract("Clone"));
        assert!(!is_std_contract("serde::Serialize"));
        assert!(!is_std_contract("Notifier"));
    }
}
