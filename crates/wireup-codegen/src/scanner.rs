//! Structural source scan.
//!
//! First pipeline stage: parse every file in the set and walk its items,
//! including nested inline modules, collecting
//!
//! - candidate `struct`/`enum` declarations that carry at least one
//!   attribute (a cheap pre-filter; whether an attribute is actually a
//!   recognized marker is the extractor's call),
//! - every type, trait and `impl Trait for Type` declaration plus per-scope
//!   `use` maps, which together feed the symbol graph.
//!
//! Output order is declaration order within the set, which downstream
//! stages rely on for deterministic generation.

use std::collections::HashMap;

use quote::ToTokens;
use tracing::debug;

use crate::error::{Error, Result};
use crate::source::SourceSet;

/// An annotated `struct`/`enum` declaration, before marker extraction.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// File the declaration lives in.
    pub file: String,
    /// Module path from the crate root, `::`-joined; empty at the root.
    pub module: String,
    /// Declared type name.
    pub name: String,
    /// Generic type and const parameter count (lifetimes excluded).
    pub arity: usize,
    /// All attributes on the declaration, in source order.
    pub attrs: Vec<syn::Attribute>,
}

/// Any `struct`/`enum` declaration, annotated or not.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Module path from the crate root.
    pub module: String,
    /// Declared type name.
    pub name: String,
    /// Generic type and const parameter count.
    pub arity: usize,
}

/// A trait declaration with its supertrait list.
#[derive(Debug, Clone)]
pub struct TraitDecl {
    /// File the declaration lives in.
    pub file: String,
    /// Module path from the crate root.
    pub module: String,
    /// Declared trait name.
    pub name: String,
    /// Generic type and const parameter count.
    pub arity: usize,
    /// Supertrait base paths, as written.
    pub supertraits: Vec<String>,
}

/// An `impl Trait for Type` item.
#[derive(Debug, Clone)]
pub struct ImplDecl {
    /// File the impl lives in.
    pub file: String,
    /// Module path from the crate root.
    pub module: String,
    /// Base path of the implementing type, as written, without arguments.
    pub self_ty: String,
    /// Base path of the implemented trait, as written, without arguments.
    pub trait_path: String,
    /// Rendered generic arguments applied to the trait, possibly empty.
    pub trait_args: Vec<String>,
}

/// Scope key for a `use` map: file plus module path within it.
pub type ScopeKey = (String, String);

/// Everything one structural pass over the source set produces.
#[derive(Debug, Default)]
pub struct ScanOutput {
    /// Attribute-carrying type declarations, in scan order.
    pub candidates: Vec<Candidate>,
    /// Every type declaration, for name resolution.
    pub types: Vec<TypeDecl>,
    /// Every trait declaration, for contract and supertrait resolution.
    pub traits: Vec<TraitDecl>,
    /// Every trait impl, in scan order (contract order follows it).
    pub impls: Vec<ImplDecl>,
    /// Imported name → full path, per (file, module) scope.
    pub uses: HashMap<ScopeKey, HashMap<String, String>>,
}

/// Parses and walks every file in the set.
///
/// A file that fails to parse as Rust fails the scan; everything below the
/// file level is handled structurally and never errors.
pub fn scan(sources: &SourceSet) -> Result<ScanOutput> {
    let mut output = ScanOutput::default();
    for file in sources.files() {
        let ast = syn::parse_file(&file.content).map_err(|e| Error::parse(&file.path, &e))?;
        walk_items(&ast.items, &file.path, &file.module, &mut output);
    }
    debug!(
        files = sources.len(),
        candidates = output.candidates.len(),
        traits = output.traits.len(),
        impls = output.impls.len(),
        "scanned source set"
    );
    Ok(output)
}

fn walk_items(items: &[syn::Item], file: &str, module: &str, output: &mut ScanOutput) {
    for item in items {
        match item {
            syn::Item::Struct(item) => {
                record_type(
                    file,
                    module,
                    &item.ident,
                    &item.generics,
                    &item.attrs,
                    output,
                );
            }
            syn::Item::Enum(item) => {
                record_type(
                    file,
                    module,
                    &item.ident,
                    &item.generics,
                    &item.attrs,
                    output,
                );
            }
            syn::Item::Trait(item) => {
                let supertraits = item
                    .supertraits
                    .iter()
                    .filter_map(|bound| match bound {
                        syn::TypeParamBound::Trait(t) => Some(path_base(&t.path)),
                        _ => None,
                    })
                    .collect();
                output.traits.push(TraitDecl {
                    file: file.to_string(),
                    module: module.to_string(),
                    name: item.ident.to_string(),
                    arity: generic_arity(&item.generics),
                    supertraits,
                });
            }
            syn::Item::Impl(item) => {
                if let Some((None, trait_path, _)) = item.trait_.as_ref().map(|(bang, p, f)| (bang.as_ref(), p, f))
                    && let syn::Type::Path(self_ty) = item.self_ty.as_ref()
                {
                    output.impls.push(ImplDecl {
                        file: file.to_string(),
                        module: module.to_string(),
                        self_ty: path_base(&self_ty.path),
                        trait_path: path_base(trait_path),
                        trait_args: path_args(trait_path),
                    });
                }
            }
            syn::Item::Use(item) => {
                let scope = (file.to_string(), module.to_string());
                let map = output.uses.entry(scope).or_default();
                flatten_use_tree(&item.tree, String::new(), map);
            }
            syn::Item::Mod(item) => {
                if let Some((_, items)) = &item.content {
                    let nested = if module.is_empty() {
                        item.ident.to_string()
                    } else {
                        format!("{module}::{}", item.ident)
                    };
                    walk_items(items, file, &nested, output);
                }
            }
            _ => {}
        }
    }
}

fn record_type(
    file: &str,
    module: &str,
    ident: &syn::Ident,
    generics: &syn::Generics,
    attrs: &[syn::Attribute],
    output: &mut ScanOutput,
) {
    let arity = generic_arity(generics);
    output.types.push(TypeDecl {
        module: module.to_string(),
        name: ident.to_string(),
        arity,
    });
    if !attrs.is_empty() {
        output.candidates.push(Candidate {
            file: file.to_string(),
            module: module.to_string(),
            name: ident.to_string(),
            arity,
            attrs: attrs.to_vec(),
        });
    }
}

fn flatten_use_tree(tree: &syn::UseTree, prefix: String, map: &mut HashMap<String, String>) {
    match tree {
        syn::UseTree::Path(path) => {
            let next = if prefix.is_empty() {
                path.ident.to_string()
            } else {
                format!("{prefix}::{}", path.ident)
            };
            flatten_use_tree(&path.tree, next, map);
        }
        syn::UseTree::Name(name) => {
            let full = if prefix.is_empty() {
                name.ident.to_string()
            } else {
                format!("{prefix}::{}", name.ident)
            };
            map.insert(name.ident.to_string(), full);
        }
        syn::UseTree::Rename(rename) => {
            let full = if prefix.is_empty() {
                rename.ident.to_string()
            } else {
                format!("{prefix}::{}", rename.ident)
            };
            map.insert(rename.rename.to_string(), full);
        }
        syn::UseTree::Group(group) => {
            for tree in &group.items {
                flatten_use_tree(tree, prefix.clone(), map);
            }
        }
        // glob imports are not resolvable structurally; skipped
        syn::UseTree::Glob(_) => {}
    }
}

/// Counts type and const parameters; lifetimes do not contribute to arity.
pub(crate) fn generic_arity(generics: &syn::Generics) -> usize {
    generics
        .params
        .iter()
        .filter(|p| !matches!(p, syn::GenericParam::Lifetime(_)))
        .count()
}

/// Path without generic arguments, segments joined with `::`.
pub(crate) fn path_base(path: &syn::Path) -> String {
    let mut out = String::new();
    if path.leading_colon.is_some() {
        out.push_str("::");
    }
    for (i, segment) in path.segments.iter().enumerate() {
        if i > 0 {
            out.push_str("::");
        }
        out.push_str(&segment.ident.to_string());
    }
    out
}

/// Rendered generic arguments of the final path segment, empty when the
/// path carries none.
pub(crate) fn path_args(path: &syn::Path) -> Vec<String> {
    let Some(last) = path.segments.last() else {
        return Vec::new();
    };
    match &last.arguments {
        syn::PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .map(|arg| render_tokens(arg.to_token_stream()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Renders a token stream compactly: token-stream display inserts spaces
/// around every token, which this squeezes back out of path syntax.
pub(crate) fn render_tokens(tokens: proc_macro2::TokenStream) -> String {
    tokens
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" ::", "::")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" <", "<")
        .replace(" ,", ",")
        .replace(",", ", ")
        .replace(",  ", ", ")
        .trim()
        .to_string()
}
