use clap::{Parser, Subcommand};

mod logging;
mod report;
mod run;
mod settings;

use pagescrape_core::config::Config;

use crate::report::Report;
use crate::settings::ScrapeArgs;

#[derive(Parser)]
#[command(
    name = "pagescrape",
    about = "Scrape headings and paragraphs from one page into a CSV file",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one page and write its text to CSV
    Scrape(ScrapeArgs),

    /// Check whether robots.txt allows fetching a URL
    Robots {
        /// URL to check
        url: String,

        /// User agent to match (default: robots.user_agent from config)
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Validate the configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::config_path);

    let config = Config::load(&config_path)?;

    logging::init(config.logging.as_ref(), cli.verbose);
    tracing::debug!(path = %config_path.display(), "Config loaded");

    match cli.command {
        Commands::Scrape(args) => {
            let settings = args.resolve(config)?;
            let mut report = Report::new(std::io::stdout());
            let outcome = run::scrape(&settings, &mut report).await;
            tracing::debug!(?outcome, "Run finished");
        }
        Commands::Robots { url, user_agent } => {
            let agent = user_agent.unwrap_or(config.robots.user_agent);
            let client = reqwest::Client::new();
            let allowed = pagescrape_browser::robots::can_crawl(&client, &url, &agent).await?;
            if allowed {
                println!("Allowed: {url} (user agent '{agent}')");
            } else {
                println!("Disallowed: {url} (user agent '{agent}')");
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&config)?;
                println!("{json}");
            }
            ConfigAction::Check => {
                let (warnings, errors) = config.validate();
                for w in &warnings {
                    println!("warning: {w}");
                }
                for e in &errors {
                    println!("error: {e}");
                }
                if errors.is_empty() {
                    println!("Config OK: {}", config_path.display());
                } else {
                    anyhow::bail!("{} config error(s)", errors.len());
                }
            }
        },
    }

    Ok(())
}
