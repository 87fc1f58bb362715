mod report;
mod stats;
mod sync;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "newsdesk-cli")]
#[command(about = "Newsdesk feed ingestion and reporting tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch daily feeds from storage and load articles into the database
    Sync {
        /// Sync exactly this feed (8-digit date key, e.g. 20260112)
        #[arg(long)]
        date: Option<String>,

        /// Otherwise: sync the most recent N feeds
        #[arg(long, default_value_t = 7)]
        days: usize,

        /// Preview which feeds would be synced without fetching anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Sweep feeds, aggregate per reporter, and publish data.json to storage
    Report {
        /// Date-key prefix to sweep, e.g. "2026"; empty sweeps everything
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Merge the stored evaluations into evaluations.json in storage
    ExportEvaluations,
    /// Print database summary statistics
    Stats,
    /// Parse a local feed XML file and print what it would ingest
    Parse { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync {
            date,
            days,
            dry_run,
        } => {
            let config = newsdesk_core::load_app_config()?;
            let pool = connect(&config).await?;
            let store = newsdesk_storage::FeedStore::from_app_config(&config)?;
            let parser = build_parser(&config)?;
            sync::run_sync(&pool, &store, &parser, date.as_deref(), days, dry_run).await
        }
        Commands::Report { prefix } => {
            let config = newsdesk_core::load_app_config()?;
            let store = newsdesk_storage::FeedStore::from_app_config(&config)?;
            let rules = newsdesk_core::attribution::load_attribution_or_default(
                &config.attribution_path,
            )?;
            report::run_report(&store, &rules, &prefix).await
        }
        Commands::ExportEvaluations => {
            let config = newsdesk_core::load_app_config()?;
            let pool = connect(&config).await?;
            let store = newsdesk_storage::FeedStore::from_app_config(&config)?;
            report::export_evaluations(&pool, &store).await
        }
        Commands::Stats => {
            let config = newsdesk_core::load_app_config()?;
            let pool = connect(&config).await?;
            stats::show_stats(&pool).await
        }
        Commands::Parse { file } => {
            let rules = newsdesk_core::AttributionConfig::default();
            let parser = newsdesk_feed::BylineParser::new(&rules);
            sync::parse_local_file(&file, &parser)
        }
    }
}

async fn connect(config: &newsdesk_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = newsdesk_db::PoolConfig::from_app_config(config);
    let pool = newsdesk_db::connect_pool(&config.database_url, pool_config).await?;
    newsdesk_db::run_migrations(&pool).await?;
    Ok(pool)
}

fn build_parser(
    config: &newsdesk_core::AppConfig,
) -> anyhow::Result<newsdesk_feed::BylineParser> {
    let rules =
        newsdesk_core::attribution::load_attribution_or_default(&config.attribution_path)?;
    Ok(newsdesk_feed::BylineParser::new(&rules))
}
