//! CLI for `apimap-openapi`.
//!
//! Standalone binary: reads a declaration file and a map file, writes one
//! `OpenAPI` document per requested map.
//!
//! # Subcommands
//!
//! ```text
//! # One map (defaults to the file's `default_map`)
//! apimap-openapi generate \
//!   --declarations api/declarations.yaml \
//!   --maps api/openapi/maps.yaml \
//!   --map users-and-things
//!
//! # Every map, each to its configured output
//! apimap-openapi generate -d api/declarations.yaml -m api/openapi/maps.yaml --all
//!
//! apimap-openapi list --maps api/openapi/maps.yaml
//! apimap-openapi inspect --declarations api/declarations.yaml
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use apimap_core::DeclarationStore;
use apimap_openapi::{Document, GenerateConfig, MapRegistry};
use clap::{Parser, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Alias-aware `OpenAPI` document generator.
#[derive(Parser)]
#[command(name = "apimap-openapi", version, about)]
enum Cli {
    /// Generate documents for one map or for every map.
    Generate(GenerateArgs),

    /// Print the configured map names.
    List(ListArgs),

    /// Print a summary of the declarations.
    Inspect(InspectArgs),
}

#[derive(Parser)]
struct GenerateArgs {
    /// Path to the declaration YAML (DTOs and controllers).
    #[arg(short, long)]
    declarations: PathBuf,

    /// Path to the map configuration YAML.
    #[arg(short, long)]
    maps: PathBuf,

    /// Map to generate. Defaults to the file's `default_map`.
    #[arg(long, conflicts_with = "all")]
    map: Option<String>,

    /// Generate every configured map.
    #[arg(long)]
    all: bool,

    /// Output path for a single map; `-` writes to stdout.
    /// Defaults to the map's `output`, else `openapi/<map>.json`.
    #[arg(short, long, conflicts_with = "all")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Version string written to `info.version`. Overrides the map file.
    #[arg(long, conflicts_with = "cargo_toml")]
    version: Option<String>,

    /// Read `info.version` from this `Cargo.toml`.
    #[arg(long, conflicts_with = "version")]
    cargo_toml: Option<PathBuf>,

    /// Skip security requirements and schemes.
    #[arg(long)]
    no_security: bool,

    /// Skip standard error/empty responses.
    #[arg(long)]
    no_standard_responses: bool,
}

#[derive(Parser)]
struct ListArgs {
    /// Path to the map configuration YAML.
    #[arg(short, long)]
    maps: PathBuf,
}

#[derive(Parser)]
struct InspectArgs {
    /// Path to the declaration YAML.
    #[arg(short, long)]
    declarations: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli {
        Cli::Generate(args) => run_generate(&args),
        Cli::List(args) => run_list(&args),
        Cli::Inspect(args) => run_inspect(&args),
    }
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let store = load_declarations(&args.declarations)?;
    let mut maps = MapRegistry::load(&args.maps)
        .with_context(|| format!("Failed to load maps: {}", args.maps.display()))?;

    if let Some(version) = resolve_version(args.version.as_ref(), args.cargo_toml.as_ref())? {
        for map in maps.maps.values_mut() {
            map.info.version.clone_from(&version);
        }
    }

    let config = apply_cli_overrides(GenerateConfig::new().with_settings(&maps.generator), args);

    if args.all {
        let docs = apimap_openapi::generate_all(&store, &maps, &config)
            .context("Failed to generate documents")?;
        for (name, doc) in &docs {
            let path = with_format_extension(maps.output_path(name)?, args.format);
            write_document(doc, &path, args.format)?;
        }
        eprintln!("Generated {} documents", docs.len());
        return Ok(());
    }

    let name = args.map.as_deref().unwrap_or(&maps.default_map);
    let doc = apimap_openapi::generate(&store, &maps, name, &config)
        .with_context(|| format!("Failed to generate map '{name}'"))?;

    let path = match &args.output {
        Some(path) => path.clone(),
        None => with_format_extension(maps.output_path(name)?, args.format),
    };
    write_document(&doc, &path, args.format)
}

/// Apply CLI flags that override map file settings.
fn apply_cli_overrides<'a>(mut config: GenerateConfig<'a>, args: &GenerateArgs) -> GenerateConfig<'a> {
    // Disable flags (one-directional: can only turn off via CLI)
    if args.no_security {
        config = config.skip_security();
    }
    if args.no_standard_responses {
        config = config.skip_standard_responses();
    }
    config
}

fn load_declarations(path: &Path) -> anyhow::Result<DeclarationStore> {
    eprintln!("Loading declarations: {}", path.display());
    DeclarationStore::load(path)
        .with_context(|| format!("Failed to load declarations: {}", path.display()))
}

/// Swap a `.json` default path to `.yaml` when writing YAML.
fn with_format_extension(path: PathBuf, format: Format) -> PathBuf {
    match format {
        Format::Yaml if path.extension().is_some_and(|ext| ext == "json") => {
            path.with_extension("yaml")
        }
        _ => path,
    }
}

fn write_document(doc: &Document, path: &Path, format: Format) -> anyhow::Result<()> {
    let output = match format {
        Format::Json => doc.to_json(),
        Format::Yaml => doc.to_yaml(),
    }
    .context("Failed to serialize document")?;

    if path == Path::new("-") {
        println!("{output}");
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, output).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

fn run_list(args: &ListArgs) -> anyhow::Result<()> {
    let maps = MapRegistry::load(&args.maps)
        .with_context(|| format!("Failed to load maps: {}", args.maps.display()))?;

    for name in maps.names() {
        let map = maps.get(name)?;
        let marker = if name == maps.default_map { " (default)" } else { "" };
        println!("{name}{marker}: {} controllers", map.controllers.len());
        for controller in &map.controllers {
            println!("  {controller}");
        }
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let store = load_declarations(&args.declarations)?;

    println!("=== Declarations ===");
    println!();

    println!("Data shapes: {}", store.dtos().len());
    for dto in store.dtos() {
        let deps: Vec<&str> = dto.dto_dependencies().map(|d| d.as_str()).collect();
        if deps.is_empty() {
            println!("  {} ({} fields)", dto.name, dto.fields.len());
        } else {
            println!(
                "  {} ({} fields) → {}",
                dto.name,
                dto.fields.len(),
                deps.join(", ")
            );
        }
    }

    println!();
    println!("Controllers: {}", store.controllers().len());
    for ctrl in store.controllers() {
        println!("  {} {}", ctrl.name, ctrl.route);
        for ep in &ctrl.endpoints {
            println!("    {} {} ({})", ep.method.as_str().to_uppercase(), ep.path, ep.name);
            let aliases = ep
                .request
                .iter()
                .flat_map(|r| r.aliases.iter())
                .chain(ep.response.iter().flat_map(|r| r.aliases.iter()));
            for (type_name, alias) in aliases {
                println!("      {type_name} as {alias}");
            }
        }
    }

    Ok(())
}

/// Resolve version from explicit flag or Cargo.toml flag.
fn resolve_version(
    explicit: Option<&String>,
    cargo_toml: Option<&PathBuf>,
) -> anyhow::Result<Option<String>> {
    match (explicit, cargo_toml) {
        (Some(v), _) => Ok(Some(v.clone())),
        (_, Some(path)) => read_cargo_version(path).map(Some),
        (None, None) => Ok(None),
    }
}

/// Read `version` from a Cargo.toml `[package]` or `[workspace.package]`.
fn read_cargo_version(path: &Path) -> anyhow::Result<String> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let doc: toml::Table =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    if let Some(v) = doc
        .get("package")
        .and_then(|p| p.get("version"))
        .and_then(toml::Value::as_str)
    {
        return Ok(v.to_string());
    }

    if let Some(v) = doc
        .get("workspace")
        .and_then(|w| w.get("package"))
        .and_then(|p| p.get("version"))
        .and_then(toml::Value::as_str)
    {
        return Ok(v.to_string());
    }

    bail!("No version found in {}", path.display())
}
