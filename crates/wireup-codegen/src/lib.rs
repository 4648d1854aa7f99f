//! Attribute-to-registration source generator for wireup.
//!
//! Scans Rust sources for service marker attributes (`#[singleton]`,
//! `#[scoped]`, `#[transient]`, `#[service(...)]`) on `struct` and `enum`
//! declarations, resolves which contracts each annotated type should be
//! registered against, and emits a deterministic registration extension for
//! [`wireup::ServiceCollection`](https://docs.rs/wireup).
//!
//! The pipeline runs once per pass, synchronously: scan → symbol graph →
//! extract → resolve → plan → emit. Per-type problems degrade (an
//! unrecognized marker skips the type, unparseable arguments fall back to
//! defaults, an unverifiable contract override falls back to the full
//! contract list); the only hard diagnostic is a marker combining `as_self`
//! with an explicit `contract`.
//!
//! Typical build-script use:
//!
//! ```no_run
//! use wireup_codegen::{generate_to_file, GeneratorOptions, SourceSet};
//!
//! let sources = SourceSet::from_dir("src")
//!     .unwrap()
//!     .with_crate_name(std::env::var("CARGO_PKG_NAME").unwrap());
//! let out = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap())
//!     .join("wireup_generated.rs");
//! let generation =
//!     generate_to_file(&sources, &GeneratorOptions::default(), &out).unwrap();
//! for diagnostic in &generation.diagnostics {
//!     println!("cargo::warning={diagnostic}");
//! }
//! assert!(!generation.has_errors());
//! ```

pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod extract;
pub mod generator;
pub mod model;
pub mod options;
pub mod plan;
pub mod resolve;
pub mod scanner;
pub mod source;
pub mod symbols;

pub use diagnostics::{Diagnostic, Severity};
pub use error::{Error, Result};
pub use generator::{Generation, generate, generate_to_file};
pub use model::{ContractRef, Lifetime, ServiceDescriptor, SourceLocation, TypeIdentity};
pub use options::GeneratorOptions;
pub use source::{SourceFile, SourceSet};
