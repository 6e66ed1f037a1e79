use clap::{Parser, Subcommand};
use localpages::catalog::Catalog;
use localpages::{config, logging, output, page, paths, site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "localpages")]
#[command(about = "Generate service × location landing pages")]
#[command(long_about = "\
Generate service × location landing pages

Every service in the catalog gets one page per location, and every industry
gets one page per location. Copy comes from per-service templates with
{name}, {region}, {service}, {population}, {metro_population} and
{business_context} slots; services without templates fall back to generic copy.

Content structure:

  content/
  ├── config.toml       # Site config (optional)
  ├── services.toml     # [[service]] records with optional [service.seo]
  ├── locations.toml    # [[location]] records
  ├── industries.toml   # [[industry]] records (optional)
  └── cases/            # One case study per .toml file (optional)

Run 'localpages gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log fallbacks and per-page progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every page path the site will contain
    Paths {
        /// Print page keys as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Render one service page and print its bundle as JSON
    Render {
        /// Service slug
        service: String,
        /// Location slug
        location: String,
    },
    /// Render every page to HTML and write the sitemap
    Build,
    /// Render every page in memory and report duplicate or empty copy
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Command::Paths { json } => {
            let catalog = Catalog::load(&cli.source)?;
            let keys = paths::all_pages(&catalog);
            if json {
                println!("{}", serde_json::to_string_pretty(&keys)?);
            } else {
                output::print_paths_output(&keys);
            }
        }
        Command::Render { service, location } => {
            let (catalog, site_config) = load_content(&cli.source)?;
            let bundle = page::render_service_page(&catalog, &site_config, &service, &location)?;
            println!("{}", serde_json::to_string_pretty(&bundle)?);
        }
        Command::Build => {
            let (catalog, site_config) = load_content(&cli.source)?;
            init_thread_pool(&site_config.processing);
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let report = site::build_site(&catalog, &site_config, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let (catalog, site_config) = load_content(&cli.source)?;
            init_thread_pool(&site_config.processing);
            println!("==> Checking {}", cli.source.display());
            let report = site::check_site(&catalog, &site_config);
            output::print_check_output(&catalog, &report);
            if !report.is_ok() {
                return Err(format!("{} issue(s) found", report.issues.len()).into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_content(
    source: &std::path::Path,
) -> Result<(Catalog, config::SiteConfig), Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    let catalog = Catalog::load(source)?;
    Ok((catalog, site_config))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
