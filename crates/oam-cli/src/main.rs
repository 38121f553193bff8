use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use oam_core::Artifact;
use oam_core::config::{self, CONFIG_FILE_NAME, OamConfig};
use oam_core::extract::{DEFAULT_EXTERNAL_TAG, Extractor};
use oam_core::graph::dangling_refs;
use oam_core::parse::{self, spec::OpenApiSpec};
use oam_core::pipeline::{COMPOSITE_FILE_NAME, Pipeline, Source};
use oam_core::validate::validate_schema_names;

#[derive(Parser)]
#[command(name = "oam", about = "Combine OpenAPI 3.x documents into one", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge source documents into a composite under a template
    Combine {
        /// Path to the config file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,

        /// Template document the sources are merged into
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Source documents or directories of them (repeatable)
        #[arg(short, long)]
        input: Vec<PathBuf>,

        /// Directory of upstream documents
        #[arg(short, long)]
        upstream: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Substring identifying the public server
        #[arg(long)]
        domain: Option<String>,

        /// Keep only operations with the extraction tag
        #[arg(long)]
        external: bool,
    },

    /// Reduce a document to the operations with a tag and their schemas
    Extract {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Tag to keep
        #[arg(long, default_value = DEFAULT_EXTERNAL_TAG)]
        tag: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Validate an OpenAPI document
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new oam configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

/// Command-line values that take precedence over the config file.
#[derive(Default)]
struct CombineOverrides {
    template: Option<PathBuf>,
    input: Vec<PathBuf>,
    upstream: Option<PathBuf>,
    output: Option<PathBuf>,
    domain: Option<String>,
    external: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Combine {
            config,
            template,
            input,
            upstream,
            output,
            domain,
            external,
        } => cmd_combine(
            &config,
            CombineOverrides {
                template,
                input,
                upstream,
                output,
                domain,
                external,
            },
        ),

        Commands::Extract { input, tag, format } => cmd_extract(input, tag, format),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oam", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the config file, falling back to defaults when it is absent, then
/// apply command-line overrides.
fn resolve_config(config_path: &Path, overrides: CombineOverrides) -> Result<OamConfig> {
    let mut cfg = config::load_config(config_path)?.unwrap_or_default();

    if let Some(template) = overrides.template {
        cfg.template = template.display().to_string();
    }
    if !overrides.input.is_empty() {
        cfg.inputs = overrides
            .input
            .iter()
            .map(|p| p.display().to_string())
            .collect();
    }
    if let Some(upstream) = overrides.upstream {
        cfg.upstream = Some(upstream.display().to_string());
    }
    if let Some(output) = overrides.output {
        cfg.output = output.display().to_string();
    }
    if let Some(domain) = overrides.domain {
        cfg.selection.domain = domain;
    }
    if overrides.external {
        cfg.extract.enabled = true;
    }
    Ok(cfg)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_spec(path: &Path) -> Result<OpenApiSpec> {
    let content = read_text(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    };
    parsed.with_context(|| format!("failed to parse {}", path.display()))
}

fn read_source(path: &Path) -> Result<Source> {
    let content = read_text(path)?;
    Source::parse(content).with_context(|| format!("failed to parse {}", path.display()))
}

fn is_document(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

/// Expand directories to the documents they contain, sorted by file name.
/// Plain files are kept as given.
fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(path)
                .with_context(|| format!("failed to list {}", path.display()))?
            {
                let entry_path = entry?.path();
                if entry_path.is_file() && is_document(&entry_path) {
                    entries.push(entry_path);
                }
            }
            entries.sort();
            debug!("{} document(s) in {}", entries.len(), path.display());
            files.extend(entries);
        } else {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Write artifacts to disk under the given base directory.
fn write_artifacts(base: &Path, artifacts: &[Artifact]) -> Result<()> {
    for artifact in artifacts {
        let relative = Path::new(&artifact.path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            anyhow::bail!("refusing to write {} outside {}", artifact.path, base.display());
        }
        let path = base.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &artifact.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_combine(config_path: &Path, overrides: CombineOverrides) -> Result<()> {
    let cfg = resolve_config(config_path, overrides)?;

    let template = read_spec(Path::new(&cfg.template))?;

    let inputs = collect_inputs(&cfg.inputs)?;
    if inputs.is_empty() {
        anyhow::bail!("no source documents found in {}", cfg.inputs.join(", "));
    }
    let sources = inputs
        .iter()
        .map(|p| read_source(p))
        .collect::<Result<Vec<_>>>()?;

    let upstreams = match cfg.upstream {
        Some(ref dir) => collect_inputs(&[dir])?
            .iter()
            .map(|p| read_spec(p))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    eprintln!(
        "Combining {} source(s) into {}",
        sources.len(),
        template.info.title
    );

    let output = Pipeline::from_config(&cfg)
        .run(template, sources, &upstreams)
        .context("failed to combine documents")?;

    for issue in &output.naming_issues {
        eprintln!("  warning: {issue}");
    }

    let output_dir = PathBuf::from(&cfg.output);
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let artifacts = output.artifacts()?;
    write_artifacts(&output_dir, &artifacts)?;

    eprintln!(
        "Combined {} API(s) into {}",
        output.sources.len(),
        output_dir.join(COMPOSITE_FILE_NAME).display()
    );
    Ok(())
}

fn cmd_extract(input: PathBuf, tag: String, format: OutputFormat) -> Result<()> {
    let spec = read_spec(&input)?;
    let title = spec.info.title.clone();

    let Some(extracted) = Extractor::new(tag.clone()).extract_document(spec) else {
        anyhow::bail!("{title} has no operations tagged '{tag}'");
    };

    match format {
        OutputFormat::Yaml => print!("{}", parse::to_yaml(&extracted)?),
        OutputFormat::Json => println!("{}", parse::to_json(&extracted)?),
    }
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let parsed = read_spec(&input)?;

    eprintln!(
        "Valid OpenAPI {} document: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());
    eprintln!("  Operations: {}", parsed.operations().count());

    if let Some(ref components) = parsed.components {
        eprintln!("  Schemas: {}", components.schemas.len());
    }
    if let Some(segment) = parsed.resource_segment() {
        eprintln!("  Resource segment: /{segment}");
    }

    for issue in validate_schema_names(&parsed) {
        eprintln!("  warning: {issue}");
    }
    for name in dangling_refs(&parsed) {
        eprintln!("  warning: schema {name} is referenced but not defined");
    }

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
