use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use phare_core::{ClassLoader, ClassMap, ClassMapGenerator, Config};

#[derive(Parser, Debug)]
#[command(name = "phare", version, about = "PHP class autoloader toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a source tree and write a classmap index.
    Dump {
        /// Directory to scan.
        dir: PathBuf,
        /// Where to write the classmap JSON.
        #[arg(short, long, default_value = "classmap.json")]
        output: PathBuf,
        /// Strip this prefix from recorded paths.
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },
    /// Print the classes declared in the given files.
    Scan {
        files: Vec<PathBuf>,
    },
    /// Resolve a fully-qualified class name to a file.
    Resolve {
        class: String,
        /// Loader config (JSON with namespaces / prefixes / classMap).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Classmap index produced by `phare dump`.
        #[arg(long)]
        class_map: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Dump { dir, output, base_dir } => dump(&dir, &output, base_dir),
        Command::Scan { files } => scan(&files),
        Command::Resolve { class, config, class_map } => {
            resolve(&class, config.as_deref(), class_map.as_deref())
        }
    }
}

/// Enabled via PHARE_LOG or RUST_LOG; zero cost otherwise.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = std::env::var("PHARE_LOG").or_else(|_| std::env::var("RUST_LOG"));
    if let Ok(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .init();
    }
}

fn dump(dir: &Path, output: &Path, base_dir: Option<PathBuf>) -> Result<()> {
    let generator = match base_dir {
        Some(base) => ClassMapGenerator::with_base_dir(base),
        None => ClassMapGenerator::new(),
    };

    let outcome = generator
        .dump(source_files(dir), output)
        .with_context(|| format!("failed to write classmap to {}", output.display()))?;

    for dup in &outcome.duplicates {
        eprintln!(
            "warning: {} defined in both {} and {}",
            dup.class, dup.previous, dup.path
        );
    }
    println!("{} classes -> {}", outcome.class_map.len(), output.display());
    Ok(())
}

fn scan(files: &[PathBuf]) -> Result<()> {
    for path in files {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for class in phare_core::classes_in(&source) {
            println!("{class}\t{}", path.display());
        }
    }
    Ok(())
}

fn resolve(class: &str, config: Option<&Path>, class_map: Option<&Path>) -> Result<()> {
    let mut loader = ClassLoader::new();

    if let Some(path) = config {
        let config = Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        loader.add_config(&config);
    }
    if let Some(path) = class_map {
        let map = ClassMap::load(path)
            .with_context(|| format!("failed to load classmap {}", path.display()))?;
        loader.add_class_map(&map);
    }

    match loader.find_file(class) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => bail!("class `{class}` not found"),
    }
}

/// The injected sequence of candidate paths the generator consumes;
/// extension filtering happens in the generator itself.
fn source_files(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}
