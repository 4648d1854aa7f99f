//! Pipeline orchestration.
//!
//! One call runs the whole pass: scan the source set, build the symbol
//! graph, extract a seed per candidate, resolve contracts, plan, emit.
//! Everything is synchronous and stateless per run; the same set and
//! options always produce the same artifact text.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::diagnostics::Diagnostic;
use crate::emit::{self, EmitSettings};
use crate::error::{Error, Result};
use crate::options::GeneratorOptions;
use crate::source::SourceSet;
use crate::symbols::SymbolGraph;
use crate::{extract, plan, resolve, scanner};

/// Outcome of one generation run.
#[derive(Debug)]
pub struct Generation {
    /// The generated source artifact.
    pub code: String,
    /// Diagnostics produced along the way. Errors here mean types were
    /// excluded from the artifact and the build should fail.
    pub diagnostics: Vec<Diagnostic>,
}

impl Generation {
    /// Whether any diagnostic should fail the build.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Runs the full pipeline over a source set.
///
/// `Err` means the pass itself could not run (an unreadable or unparsable
/// file, invalid options); per-type conditions never surface here, they
/// degrade or turn into [`Diagnostic`]s on the returned [`Generation`].
pub fn generate(sources: &SourceSet, options: &GeneratorOptions) -> Result<Generation> {
    options.validate()?;

    let scan = scanner::scan(sources)?;
    let graph = SymbolGraph::build(&scan);

    let mut descriptors = Vec::with_capacity(scan.candidates.len());
    for candidate in &scan.candidates {
        let Some(seed) = extract::extract(candidate) else {
            continue;
        };
        debug!(type_name = %seed.identity, lifetime = %seed.lifetime, "extracted marker");
        descriptors.push(resolve::resolve(seed, &graph));
    }

    let plan = plan::plan(descriptors);
    let settings = EmitSettings {
        namespace: options.resolve_namespace(sources),
        method_name: options.method_name().to_string(),
        internal: options.internal,
    };
    let code = emit::emit(&plan, &settings);

    info!(
        files = sources.len(),
        registrations = plan.registrations.len(),
        diagnostics = plan.diagnostics.len(),
        namespace = %settings.namespace,
        "generation pass complete"
    );
    Ok(Generation {
        code,
        diagnostics: plan.diagnostics,
    })
}

/// Runs the pipeline and writes the artifact to `path`. The file is
/// written even when diagnostics were produced, so a failing build still
/// leaves the surviving registrations inspectable.
pub fn generate_to_file(
    sources: &SourceSet,
    options: &GeneratorOptions,
    path: impl AsRef<Path>,
) -> Result<Generation> {
    let generation = generate(sources, options)?;
    let path = path.as_ref();
    fs::write(path, &generation.code).map_err(|e| Error::io(path.to_path_buf(), e))?;
    Ok(generation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(content: &str) -> SourceSet {
        SourceSet::new().with_source("lib.rs", content)
    }

    #[test]
    fn test_generation_is_deterministic() {
        let set = sources(
            r#"
            pub trait Api {}
            #[singleton]
            pub struct Svc;
            impl Api for Svc {}
            #[transient(key = "aux")]
            pub struct Aux;
            "#,
        );
        let options = GeneratorOptions::default();
        let first = generate(&set, &options).unwrap();
        let second = generate(&set, &options).unwrap();
        assert_eq!(first.code, second.code);
    }

    #[test]
    fn test_unannotated_sets_still_emit_the_frame() {
        let generation =
            generate(&sources("pub struct Plain;"), &GeneratorOptions::default()).unwrap();
        assert!(!generation.has_errors());
        assert!(generation.code.contains("pub mod generated {"));
        assert!(generation.code.contains("self\n"));
    }

    #[test]
    fn test_conflicts_surface_as_error_diagnostics() {
        let generation = generate(
            &sources(
                r"
                pub trait Api {}
                #[singleton(as_self, contract = Api)]
                pub struct Bad;
                impl Api for Bad {}
                ",
            ),
            &GeneratorOptions::default(),
        )
        .unwrap();
        assert!(generation.has_errors());
        assert!(!generation.code.contains("Bad"));
    }

    #[test]
    fn test_generate_to_file_writes_the_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wireup_generated.rs");
        let generation = generate_to_file(
            &sources("#[singleton]\npub struct Svc;"),
            &GeneratorOptions::default(),
            &path,
        )
        .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, generation.code);
    }

    #[test]
    fn test_invalid_options_fail_the_pass() {
        let options = GeneratorOptions {
            method_name: Some("not an ident".into()),
            ..Default::default()
        };
        assert!(generate(&sources(""), &options).is_err());
    }
}
