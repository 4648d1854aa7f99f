//! wiregen - registration generator front end.
//!
//! Parses a source tree, runs the wireup generation pipeline, writes the
//! artifact (or prints it to stdout), and reports diagnostics. Exit code 1
//! means error diagnostics were produced; the artifact is still written so
//! the surviving registrations stay inspectable.
//!
//! Options layer as defaults → config file (`--config`, TOML) → `WIREUP_*`
//! environment variables → CLI flags, strongest last.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wireup_codegen::{GeneratorOptions, SourceSet, generate};

/// Attribute-to-registration source generator for wireup
#[derive(Parser, Debug)]
#[command(name = "wiregen")]
#[command(about = "Generates wireup service registrations from marker attributes")]
#[command(version)]
struct Cli {
    /// Source directory to scan for annotated types
    #[arg(default_value = "src")]
    src: PathBuf,

    /// Write the artifact here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// TOML config file with `method_name`, `namespace`, `internal`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the generated extension method
    #[arg(long)]
    method_name: Option<String>,

    /// Module the artifact is wrapped in
    #[arg(long)]
    namespace: Option<String>,

    /// Emit a pub(crate) surface instead of pub
    #[arg(long)]
    internal: bool,

    /// Crate name for the namespace fallback chain
    #[arg(long)]
    crate_name: Option<String>,

    /// Run the pass and report diagnostics without writing anything
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WIREGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = layered_options(&cli)?;

    let mut sources = SourceSet::from_dir(&cli.src)
        .with_context(|| format!("failed to scan source directory {}", cli.src.display()))?;
    if let Some(crate_name) = &cli.crate_name {
        sources = sources.with_crate_name(crate_name);
    }
    info!(src = %cli.src.display(), files = sources.len(), "scanning source tree");

    let generation = generate(&sources, &options).context("generation pass failed")?;

    for diagnostic in &generation.diagnostics {
        eprintln!("{diagnostic}");
    }

    if !cli.check {
        match &cli.out {
            Some(path) => {
                fs::write(path, &generation.code)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(out = %path.display(), "artifact written");
            }
            None => print!("{}", generation.code),
        }
    }

    Ok(if generation.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Defaults, then the config file, then the environment, then CLI flags.
fn layered_options(cli: &Cli) -> anyhow::Result<GeneratorOptions> {
    let mut options = GeneratorOptions::default();

    if let Some(path) = &cli.config {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let from_file: GeneratorOptions = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        from_file.validate().context("invalid config file options")?;
        options = options.merge(from_file);
    }

    let from_env = GeneratorOptions::from_env().context("invalid WIREUP_* environment")?;
    options = options.merge(from_env);

    let from_flags = GeneratorOptions {
        method_name: cli.method_name.clone(),
        namespace: cli.namespace.clone(),
        internal: cli.internal,
    };
    from_flags.validate().context("invalid command line options")?;
    Ok(options.merge(from_flags))
}
