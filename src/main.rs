use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phantomjs_embed::{Configuration, PhantomJs, Version};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "phantomjs-embed")]
#[command(about = "Locate, provision and run PhantomJS", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// PhantomJS release to resolve, e.g. 1.9.8
    #[arg(long = "phantomjs-version", global = true)]
    version: Option<Version>,
    /// Installation folder for provisioned binaries
    #[arg(long, global = true)]
    target_dir: Option<PathBuf>,
    /// Base URL the archive name is appended to
    #[arg(long, global = true)]
    download_url: Option<String>,
    /// Skip probing a phantomjs already on PATH
    #[arg(long, global = true)]
    no_native: bool,
    /// Seconds to wait for each phantomjs process
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the path of a usable phantomjs, provisioning it if needed
    Resolve,
    /// Run a script and print its output
    Run { script: PathBuf },
    /// List known PhantomJS releases
    Versions,
    /// Print the effective configuration
    Config,
}

fn main() {
    // RUST_LOG=phantomjs_embed=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Versions => cmd_versions(),
        Commands::Config => cmd_config(&configuration(&cli)?),
        Commands::Resolve => cmd_resolve(configuration(&cli)?),
        Commands::Run { ref script } => cmd_run(configuration(&cli)?, script),
    }
}

fn configuration(cli: &Cli) -> Result<Configuration> {
    let path = cli.config.clone().or_else(Configuration::default_path);
    let mut config = match path {
        Some(path) => Configuration::load(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Configuration::default(),
    };

    if let Some(version) = cli.version {
        config.version = version;
    }
    if let Some(target_dir) = &cli.target_dir {
        config.target_installation_folder = target_dir.clone();
    }
    if let Some(download_url) = &cli.download_url {
        config.download_url = download_url.clone();
    }
    if cli.no_native {
        config.check_native_installation = false;
    }
    if let Some(timeout) = cli.timeout {
        config.probe_timeout_secs = Some(timeout);
        config.run_timeout_secs = Some(timeout);
    }

    Ok(config)
}

fn cmd_versions() -> Result<()> {
    for version in Version::ALL {
        let download = if version.download_supported() {
            "download"
        } else {
            "native only"
        };
        println!("  {:<8} {}", version, download);
    }
    Ok(())
}

fn cmd_config(config: &Configuration) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn cmd_resolve(config: Configuration) -> Result<()> {
    let phantomjs = PhantomJs::new(config)?;
    println!("{}", phantomjs.executable().display());
    Ok(())
}

fn cmd_run(config: Configuration, script: &Path) -> Result<()> {
    let phantomjs = PhantomJs::new(config)?;
    let output = phantomjs
        .execute(script)
        .with_context(|| format!("failed to run {}", script.display()))?;
    print!("{output}");
    Ok(())
}
