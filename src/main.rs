use clap::{Parser, Subcommand};
use service_pages::catalog::Catalog;
use service_pages::resolve::{Resolution, resolve};
use service_pages::serve::{self, ServeState};
use service_pages::{config, generate, output, render};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "service-pages")]
#[command(about = "Landing pages for every service in every city you cover")]
#[command(long_about = "\
Landing pages for every service in every city you cover

Every (service, city) pair gets two pages, one per URL layout:

  /services/{service}/{city}-{service}/
  /locations/{state}/{city}/{service}-{city}/

Data directory:

  data/
  ├── services.json     # { \"drywall-repair\": { \"name\": ..., \"warranty\": ... } }
  ├── locations.json    # { \"states\": { ... }, \"cities\": { ... } }
  └── config.toml       # Site name, phone, colors (optional)

Pages can be written to disk with 'generate' or served on demand with 'serve'.

Run 'service-pages gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Data directory with services.json, locations.json and config.toml
    #[arg(long, default_value = "data", global = true)]
    data: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the data directory and show what it contains
    Check,
    /// Print every page URL
    List,
    /// Write every page to the output directory
    Generate,
    /// Render the page for one request path
    Resolve {
        /// Request path, e.g. /services/drywall-repair/frederick-drywall-repair/
        path: String,
    },
    /// Serve pages over HTTP, resolving each request on the fly
    Serve {
        /// Address to listen on (overrides [serve] bind)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.data.display());
            config::load_config(&cli.data)?;
            let catalog = Catalog::read(&cli.data)?;
            let issues = catalog.integrity_issues();
            if !issues.is_empty() {
                output::print_integrity_issues(&issues);
                std::process::exit(1);
            }
            output::print_check_output(&catalog);
            println!("==> Data is valid");
        }
        Command::List => {
            let catalog = Catalog::load(&cli.data)?;
            output::print_list_output(&catalog);
        }
        Command::Generate => {
            let site_config = config::load_config(&cli.data)?;
            let catalog = Catalog::load(&cli.data)?;

            println!("==> Generating → {}", cli.output.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_generate_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = generate::generate(&catalog, &site_config, &cli.output, Some(tx));
            printer.join().ok();
            let report = result?;
            output::print_generate_summary(&report);

            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Command::Resolve { path } => {
            let site_config = config::load_config(&cli.data)?;
            let catalog = Catalog::load(&cli.data)?;
            let css = render::stylesheet(&site_config.colors);

            match resolve(&catalog, &site_config.site, &path) {
                Resolution::Found(page) => {
                    println!("{}", render::render_page(&page, &css).into_string());
                }
                Resolution::NotFound => {
                    println!(
                        "{}",
                        render::render_not_found(&site_config.site, &css).into_string()
                    );
                    eprintln!("No page for {}", path);
                    std::process::exit(1);
                }
            }
        }
        Command::Serve { bind } => {
            init_tracing();
            let site_config = config::load_config(&cli.data)?;
            let catalog = Catalog::load(&cli.data)?;
            let addr = match bind {
                Some(addr) => addr,
                None => site_config.serve.socket_addr()?,
            };

            let state = Arc::new(ServeState::new(catalog, site_config));
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve::serve(state, addr))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
