//! Marker recognition and configuration extraction.
//!
//! Turns one scanned candidate into a [`DescriptorSeed`]: the first
//! recognized marker attribute on the type wins, later markers on the same
//! type are ignored. Extraction never fails a run; a marker whose argument
//! list cannot be interpreted yields a seed at defaults (Singleton, no
//! contracts directives), and a type with no recognized marker yields
//! nothing at all.
//!
//! One table defines the recognized named keys and their typed fields; the
//! named-argument adapter and the legacy positional adapter both feed it.
//! A textual heuristic for degraded legacy lifetime syntax lives in its own
//! function and only runs after structured interpretation has failed.

use syn::spanned::Spanned;
use tracing::debug;

use crate::model::{Lifetime, SourceLocation, TypeIdentity};
use crate::scanner::{Candidate, render_tokens};

/// Extracted configuration for one annotated type, before contract
/// resolution.
#[derive(Debug, Clone)]
pub struct DescriptorSeed {
    /// The implementing type.
    pub identity: TypeIdentity,
    /// File the declaration lives in, scoping path resolution later.
    pub file: String,
    /// Registration lifetime.
    pub lifetime: Lifetime,
    /// Keyed registration name.
    pub key: Option<String>,
    /// Runtime category gate.
    pub category: Option<String>,
    /// Idempotent registration.
    pub try_add: bool,
    /// Register the implementation alone.
    pub as_self: bool,
    /// Explicit contract override, as written in the marker.
    pub explicit_contract: Option<String>,
    /// Position of the marker attribute.
    pub location: SourceLocation,
}

/// The four recognized marker forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Singleton,
    Scoped,
    Transient,
    /// Base form; the lifetime comes from the arguments.
    Service,
}

impl Marker {
    fn implied_lifetime(self) -> Lifetime {
        match self {
            Self::Singleton => Lifetime::Singleton,
            Self::Scoped => Lifetime::Scoped,
            Self::Transient => Lifetime::Transient,
            // base form defaults here; arguments may override
            Self::Service => Lifetime::Singleton,
        }
    }
}

/// Recognizes a marker by the final path segment, so both `#[scoped]` and
/// `#[wireup_macros::scoped]` match.
fn recognize(attr: &syn::Attribute) -> Option<Marker> {
    let last = attr.path().segments.last()?;
    match last.ident.to_string().as_str() {
        "singleton" => Some(Marker::Singleton),
        "scoped" => Some(Marker::Scoped),
        "transient" => Some(Marker::Transient),
        "service" => Some(Marker::Service),
        _ => None,
    }
}

/// Extracts the seed for a candidate, or `None` when no attribute on it is
/// a recognized marker.
pub fn extract(candidate: &Candidate) -> Option<DescriptorSeed> {
    let (attr, marker) = candidate
        .attrs
        .iter()
        .find_map(|attr| recognize(attr).map(|marker| (attr, marker)))?;

    let span = attr.span().start();
    let mut seed = DescriptorSeed {
        identity: TypeIdentity {
            name: candidate.name.clone(),
            module: candidate.module.clone(),
            arity: candidate.arity,
        },
        file: candidate.file.clone(),
        lifetime: marker.implied_lifetime(),
        key: None,
        category: None,
        try_add: false,
        as_self: false,
        explicit_contract: None,
        location: SourceLocation {
            file: candidate.file.clone(),
            line: span.line,
            column: span.column,
        },
    };

    match &attr.meta {
        syn::Meta::Path(_) => {}
        syn::Meta::List(_) => {
            match attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated,
            ) {
                Ok(args) => apply_args(&mut seed, marker, args.iter()),
                Err(error) => {
                    // degrade to defaults rather than failing the pass
                    debug!(
                        type_name = %seed.identity,
                        %error,
                        "marker arguments did not parse; using defaults"
                    );
                }
            }
        }
        syn::Meta::NameValue(_) => {
            debug!(type_name = %seed.identity, "unexpected marker shape; using defaults");
        }
    }

    Some(seed)
}

/// Applies parsed marker arguments to the seed: named assignments feed the
/// configuration table, bare flags toggle booleans, and positional
/// arguments carry the legacy lifetime-then-key form on `#[service(...)]`.
fn apply_args<'a>(
    seed: &mut DescriptorSeed,
    marker: Marker,
    args: impl Iterator<Item = &'a syn::Expr>,
) {
    let mut positional = 0usize;
    for arg in args {
        match arg {
            syn::Expr::Assign(assign) => apply_named(seed, assign),
            syn::Expr::Path(path) if is_flag(path, "try_add") => seed.try_add = true,
            syn::Expr::Path(path) if is_flag(path, "as_self") => seed.as_self = true,
            other => {
                if marker == Marker::Service {
                    apply_positional(seed, positional, other);
                }
                positional += 1;
            }
        }
    }
}

fn apply_named(seed: &mut DescriptorSeed, assign: &syn::ExprAssign) {
    let syn::Expr::Path(left) = assign.left.as_ref() else {
        return;
    };
    let Some(key) = left.path.get_ident().map(ToString::to_string) else {
        return;
    };
    // the configuration table: recognized key -> typed field
    match key.as_str() {
        "contract" => {
            if let syn::Expr::Path(path) = assign.right.as_ref() {
                seed.explicit_contract = Some(render_tokens(quote::ToTokens::to_token_stream(
                    &path.path,
                )));
            }
        }
        "key" => {
            if let Some(value) = str_literal(&assign.right) {
                seed.key = Some(value);
            }
        }
        "category" => {
            if let Some(value) = str_literal(&assign.right) {
                seed.category = Some(value);
            }
        }
        "try_add" => {
            if let Some(value) = bool_literal(&assign.right) {
                seed.try_add = value;
            }
        }
        "as_self" => {
            if let Some(value) = bool_literal(&assign.right) {
                seed.as_self = value;
            }
        }
        // unrecognized keys are ignored, not errors
        _ => {}
    }
}

fn apply_positional(seed: &mut DescriptorSeed, index: usize, expr: &syn::Expr) {
    match index {
        0 => {
            if let Some(lifetime) = lifetime_from_expr(expr) {
                seed.lifetime = lifetime;
            } else if let Some(lifetime) =
                heuristic_lifetime(&render_tokens(quote::ToTokens::to_token_stream(expr)))
            {
                seed.lifetime = lifetime;
            }
        }
        1 => {
            if let Some(value) = str_literal(expr) {
                seed.key = Some(value);
            }
        }
        _ => {}
    }
}

/// Structured interpretation of a legacy positional lifetime argument: a
/// path ending in a lifetime name (`Lifetime::Scoped`, `scoped`), the
/// legacy integer ordinal, or a string literal.
fn lifetime_from_expr(expr: &syn::Expr) -> Option<Lifetime> {
    match expr {
        syn::Expr::Path(path) => {
            let last = path.path.segments.last()?;
            Lifetime::from_name(&last.ident.to_string())
        }
        syn::Expr::Lit(lit) => match &lit.lit {
            syn::Lit::Int(int) => Lifetime::from_ordinal(int.base10_parse().ok()?),
            syn::Lit::Str(s) => Lifetime::from_name(&s.value()),
            _ => None,
        },
        _ => None,
    }
}

/// Last-resort textual match for degraded legacy syntax. Runs only after
/// [`lifetime_from_expr`] has failed, never as part of the primary path.
fn heuristic_lifetime(text: &str) -> Option<Lifetime> {
    let lower = text.to_ascii_lowercase();
    if lower.contains("singleton") {
        Some(Lifetime::Singleton)
    } else if lower.contains("scoped") {
        Some(Lifetime::Scoped)
    } else if lower.contains("transient") {
        Some(Lifetime::Transient)
    } else {
        None
    }
}

fn is_flag(path: &syn::ExprPath, name: &str) -> bool {
    path.path.is_ident(name)
}

fn str_literal(expr: &syn::Expr) -> Option<String> {
    match expr {
        syn::Expr::Lit(lit) => match &lit.lit {
            syn::Lit::Str(s) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

fn bool_literal(expr: &syn::Expr) -> Option<bool> {
    match expr {
        syn::Expr::Lit(lit) => match &lit.lit {
            syn::Lit::Bool(b) => Some(b.value),
            _ => None,
        },
        _ => None,
    }
}
