//! Runs the wireup generator over `src/` and drops the registration
//! artifact into `OUT_DIR`, where `lib.rs` includes it.

use std::env;
use std::path::PathBuf;

use wireup_codegen::{GeneratorOptions, SourceSet, generate_to_file};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo::rerun-if-changed=src");

    let sources = SourceSet::from_dir("src")?.with_package_name(env::var("CARGO_PKG_NAME")?);
    let options = GeneratorOptions {
        namespace: Some("generated".into()),
        ..Default::default()
    };

    let out = PathBuf::from(env::var("OUT_DIR")?).join("wireup_generated.rs");
    let generation = generate_to_file(&sources, &options, &out)?;

    for diagnostic in &generation.diagnostics {
        println!("cargo::warning={diagnostic}");
    }
    if generation.has_errors() {
        return Err("conflicting service configuration, see warnings above".into());
    }
    Ok(())
}
