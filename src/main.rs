use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use urban_site::contact::{self, ContactForm, ContactSink, HttpSink, LogSink};
use urban_site::fetch::{self, FetchEvent, Manifest};
use urban_site::image::ImageResolver;
use urban_site::logging::{self, LogConfig};
use urban_site::pages::Pages;
use urban_site::resolver::Resolver;
use urban_site::routes::{self, LiveSlugs};
use urban_site::{config, generate, output, store};

/// Exit code for `render` when the route resolves to a not-found page.
const EXIT_NOT_FOUND: i32 = 4;
/// Exit code for `contact` when the message was not accepted.
const EXIT_NOT_SENT: i32 = 3;

/// Shared flags for commands that query the store.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Ignore the snapshot cache: query the store for every section
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    if env!("URBAN_ON_RELEASE_TAG") == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("URBAN_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Called once at startup.
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "urban-site")]
#[command(about = "Static site generator for the Urban agency website")]
#[command(long_about = "\
Static site generator for the Urban agency website

Content is queried from the content store (or a local NDJSON export),
normalized into a manifest, and rendered to plain HTML.

Pipeline:

  fetch     store     →  <temp-dir>/manifest.json
  generate  manifest  →  <output>/

Generated site:

  dist/
  ├── index.html                   # Hero, work teaser, services, testimonials, clients, posts
  ├── about/  services/  contact/
  ├── work/index.html              # All work, with category filters
  ├── work/category/<cat>/         # Work listing with one filter active
  ├── work/<slug>/                 # Work detail
  ├── blog/  blog/<slug>/
  ├── 404.html
  └── assets/

Sections whose content fails to load render a skeleton with a short
message; the build still succeeds.

Run 'urban-site gen-config' to generate a documented site.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Site configuration file
    #[arg(long, default_value = "site.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest, snapshot cache)
    #[arg(long, default_value = ".urban-site-temp", global = true)]
    temp_dir: PathBuf,

    /// Read content from this NDJSON export instead of the store API
    #[arg(long, global = true)]
    export: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query the content store into a manifest
    Fetch(CacheArgs),
    /// Produce the final HTML site from the manifest
    Generate,
    /// Run the full pipeline: fetch → generate
    Build(CacheArgs),
    /// Fetch content and print the inventory without writing anything
    Check,
    /// Render one route to stdout (exit code 4 when not found)
    Render {
        /// Site path, e.g. /work/dankira
        path: String,
        /// Look detail slugs up in the store instead of the manifest
        #[arg(long)]
        live: bool,
    },
    /// Validate a contact message and forward it (exit code 3 when not sent)
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&LogConfig::from_verbosity(cli.verbose));

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = load_site_config(&cli)?;
    let base_dir = cli.config.parent().unwrap_or(Path::new("")).to_path_buf();
    let manifest_path = cli.temp_dir.join("manifest.json");

    match &cli.command {
        Command::Fetch(cache_args) => {
            let manifest = run_fetch(&site_config, &base_dir, &cli.temp_dir, !cache_args.no_cache)?;
            manifest.save(&manifest_path)?;
            info!("manifest written to {}", manifest_path.display());
        }
        Command::Generate => {
            let report = generate::generate(&manifest_path, &cli.output)?;
            output::print_generate_output(&report);
        }
        Command::Build(cache_args) => {
            println!("==> Stage 1: Fetching content");
            let manifest = run_fetch(&site_config, &base_dir, &cli.temp_dir, !cache_args.no_cache)?;
            manifest.save(&manifest_path)?;

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate_site(&manifest, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking content");
            let result = fetch::fetch(&site_config, &base_dir, &cli.temp_dir, false, None)?;
            output::print_inventory(&result.manifest, None);
            let degraded = result
                .manifest
                .sections
                .iter()
                .filter(|s| s.status.is_degraded())
                .count();
            if degraded == 0 {
                println!("==> Content is valid");
            } else {
                println!("==> {degraded} sections will render their empty state");
            }
        }
        Command::Render { path, live } => {
            let manifest = if manifest_path.exists() {
                Manifest::load(&manifest_path)?
            } else {
                warn!("no manifest at {}; rendering without content", manifest_path.display());
                Manifest::empty(site_config.clone())
            };
            let pages = Pages::new(&manifest);
            let outcome = if *live {
                let store = store::open(&site_config.store, &base_dir)?;
                let resolver = Resolver::new(
                    store,
                    ImageResolver::new(&site_config.store, &site_config.images),
                );
                routes::resolve_route(&pages, path, &LiveSlugs::new(&resolver))
            } else {
                routes::resolve_route(&pages, path, &manifest)
            };
            print!("{}", outcome.html);
            if !outcome.is_found() {
                warn!("{path}: status {}", outcome.status);
                std::io::stdout().flush()?;
                std::process::exit(EXIT_NOT_FOUND);
            }
        }
        Command::Contact { name, email, message } => {
            let form = ContactForm {
                name: name.clone(),
                email: email.clone(),
                message: message.clone(),
            };
            let sink: Box<dyn ContactSink> = match &site_config.contact.endpoint {
                Some(endpoint) => Box::new(HttpSink::new(
                    endpoint,
                    Duration::from_secs(site_config.store.timeout_secs),
                )?),
                None => Box::new(LogSink),
            };
            let result = contact::submit_contact(&form, sink.as_ref());
            output::print_contact_result(&result);
            if result.is_err() {
                std::process::exit(EXIT_NOT_SENT);
            }
        }
        // Printed before the config is loaded.
        Command::GenConfig => {}
    }

    Ok(())
}

/// Load `site.toml` and apply the `--export` override.
fn load_site_config(cli: &Cli) -> Result<config::SiteConfig, Box<dyn std::error::Error>> {
    let mut site_config = config::load_config(&cli.config)?;
    if let Some(export) = &cli.export {
        // Relative to the working directory, not the config file.
        let absolute = std::env::current_dir()?.join(export);
        site_config.store.export_file = Some(absolute.to_string_lossy().into_owned());
    }
    Ok(site_config)
}

/// Fetch every section, printing progress as sections arrive.
fn run_fetch(
    site_config: &config::SiteConfig,
    base_dir: &Path,
    temp_dir: &Path,
    use_cache: bool,
) -> Result<Manifest, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let (tx, rx) = std::sync::mpsc::channel::<FetchEvent>();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_fetch_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = fetch::fetch(site_config, base_dir, temp_dir, use_cache, Some(tx));
    printer.join().ok();
    let result = result?;
    if let Some(stats) = &result.cache_stats {
        println!("Cache: {stats}");
    }
    Ok(result.manifest)
}
