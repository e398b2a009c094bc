use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use lazyproxy::{
    AutogenerateMode, InMemoryCatalog, InMemoryEntityStore, MetadataCatalog, ProxyConfig,
    generator::read_artifact,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "proxy-tool")]
#[command(about = "Pre-generates and inspects lazy proxy artifacts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate proxy artifacts for classes of a JSON catalog
    Generate {
        #[arg(long)]
        catalog: PathBuf,
        /// Output directory (defaults to LAZYPROXY_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        namespace: Option<String>,
        /// Only these classes (repeatable); all catalog classes by default
        #[arg(long = "class")]
        classes: Vec<String>,
    },
    /// Print the contents of a proxy artifact
    Inspect { artifact: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            catalog,
            out,
            namespace,
            classes,
        } => generate(&catalog, out, namespace, &classes),
        Command::Inspect { artifact } => inspect(&artifact),
    }
}

fn generate(
    catalog_path: &Path,
    out: Option<PathBuf>,
    namespace: Option<String>,
    only: &[String],
) -> Result<()> {
    let mut config = ProxyConfig::from_env()?.autogenerate(AutogenerateMode::Never);
    if let Some(out) = out {
        config = config.proxy_dir(out);
    }
    if let Some(namespace) = namespace {
        config = config.proxy_namespace(&namespace);
    }

    let catalog = InMemoryCatalog::from_json_file(catalog_path)
        .with_context(|| format!("Failed to load catalog '{}'", catalog_path.display()))?;

    let classes = if only.is_empty() {
        catalog.all_metadata()
    } else {
        only.iter()
            .map(|name| {
                catalog
                    .metadata_for(name)
                    .map_err(|e| anyhow!("{}", e))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let factory = lazyproxy::entity_proxy_factory(
        &config,
        Arc::new(catalog),
        Arc::new(InMemoryEntityStore::new()),
    );
    let generated = factory
        .generate_proxy_classes(&classes, Some(&config.proxy_dir))
        .context("Proxy generation failed")?;

    println!(
        "Generated {} of {} proxy classes into {}",
        generated,
        classes.len(),
        config.proxy_dir.display()
    );
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let artifact = read_artifact(path)
        .with_context(|| format!("Failed to read artifact '{}'", path.display()))?;
    let shape = &artifact.shape;

    println!("Proxy class:    {}", shape.proxy_class_name);
    println!("Entity class:   {}", shape.entity_class_name);
    println!("Generated at:   {}", artifact.generated_at);
    println!("Format version: {}", artifact.format_version);
    println!("Identifier:     {}", shape.identifier_fields.join(", "));
    println!("Fields:");
    for field in &shape.fields {
        let marker = if shape.is_identifier(&field.name) { " (id)" } else { "" };
        println!("  {}: {}{}", field.name, field.data_type, marker);
    }
    Ok(())
}
