use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use libhoogledb::{
    Config, DEFAULT_BASE_URL, DEFAULT_OUTPUT_FILE, DEFAULT_ROOT_NAMESPACE, Harvester,
    JarDiscovery, ManifestDiscovery, SymbolDiscovery, fetcher_for,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["manifest", "jar"])))]
struct Cli {
    /// Frege documentation base URL (http(s)://, file:// or a local directory)
    #[arg(short = 'u', long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Root package
    #[arg(short = 'p', long, default_value = DEFAULT_ROOT_NAMESPACE)]
    root_package: String,

    /// Package exclusion pattern; repeat to give several. Replaces the built-in exclusions.
    #[arg(short = 'e', long = "exclusions", value_name = "REGEX")]
    exclusions: Vec<String>,

    /// Output file
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// File listing the modules to document, one qualified name per line
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Compiled Frege jar whose top-level classes are the modules to document
    #[arg(long, value_name = "FILE")]
    jar: Option<PathBuf>,

    /// Log progress for every module
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let config = Config::default()
            .with_base_url(self.base_url.as_str())
            .with_root_namespace(self.root_package.as_str())
            .with_output(self.output.as_path());
        if self.exclusions.is_empty() {
            config
        } else {
            config.with_exclusions(self.exclusions.iter().map(String::as_str))
        }
    }

    fn discovery(&self) -> Box<dyn SymbolDiscovery> {
        match (&self.manifest, &self.jar) {
            (Some(manifest), _) => Box::new(ManifestDiscovery::new(manifest)),
            (None, Some(jar)) => Box::new(JarDiscovery::new(jar)),
            (None, None) => unreachable!("clap requires a module source"),
        }
    }

    fn log_filter(&self) -> EnvFilter {
        let level = if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let fetcher = fetcher_for(&config.base_url).context("Failed to set up page fetching")?;
    let harvester = Harvester::new(config).context("Failed to compile exclusion patterns")?;

    let summary = harvester
        .run(cli.discovery().as_ref(), fetcher.as_ref())
        .context("Failed to generate the Hoogle database")?;

    info!(
        "wrote {} of {} modules ({} discovered, {} skipped, {} bytes) to {}",
        summary.written.len(),
        summary.selected,
        summary.discovered,
        summary.failed.len(),
        summary.bytes,
        harvester.config().output.display()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
