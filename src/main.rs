//! BigKinds crawler main entry point
//!
//! This is the command-line interface for the three crawl stages and the
//! full pipeline.

use anyhow::{anyhow, Context};
use bigkinds_crawler::config::{load_config, validate, Config};
use bigkinds_crawler::crawler::{
    load_news_list, load_topic_list, DEFAULT_DAYS_BACK, DEFAULT_MAX_TOPICS,
};
use bigkinds_crawler::output::latest_output_folder;
use bigkinds_crawler::Crawler;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// BigKinds crawler: trending topics, their news lists and article details
#[derive(Parser, Debug)]
#[command(name = "bigkinds-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Crawls trending topics and articles from BigKinds", long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

/// Settings that override the configuration file
#[derive(Args, Debug)]
struct Overrides {
    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base output directory
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Don't save the raw topic page HTML
    #[arg(long, global = true)]
    no_html: bool,

    /// Don't save JSON checkpoints
    #[arg(long, global = true)]
    no_json: bool,

    /// Write directly into the output directory instead of a timestamped folder
    #[arg(long, global = true)]
    no_timestamp: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Attempts per request, including the first
    #[arg(long, global = true)]
    retry_attempts: Option<u32>,

    /// Base retry delay in seconds
    #[arg(long, global = true)]
    retry_delay: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the topic list from the front page
    Topics,

    /// Crawl news lists for topics of an existing run
    News {
        /// Run folder holding topic-list.json (default: latest run)
        data_path: Option<PathBuf>,

        /// Topic ranks to process (comma-separated)
        #[arg(short, long, value_delimiter = ',', default_value = "1,2,3")]
        topics: Vec<u32>,

        /// Number of days to look back
        #[arg(short, long, default_value_t = DEFAULT_DAYS_BACK)]
        days: u32,
    },

    /// Crawl article details for a topic folder
    Details {
        /// Topic folder holding news-list.json
        topic_path: PathBuf,
    },

    /// Run the full crawling pipeline
    Pipeline {
        /// Maximum number of topics to process
        #[arg(short = 't', long, default_value_t = DEFAULT_MAX_TOPICS)]
        max_topics: usize,

        /// Number of days to look back
        #[arg(short, long, default_value_t = DEFAULT_DAYS_BACK)]
        days: u32,

        /// Also crawl article details for the best-ranked completed topic
        #[arg(long)]
        include_details: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bigkinds_crawler=info,warn"),
            1 => EnvFilter::new("bigkinds_crawler=debug,info"),
            2 => EnvFilter::new("bigkinds_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn resolve_config(overrides: &Overrides) -> anyhow::Result<Config> {
    let mut config = match &overrides.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(dir) = &overrides.output_dir {
        config.output.output_dir = dir.clone();
    }
    if overrides.no_html {
        config.output.save_html = false;
    }
    if overrides.no_json {
        config.output.save_json = false;
    }
    if overrides.no_timestamp {
        config.output.create_timestamp_folder = false;
    }
    if let Some(timeout) = overrides.timeout {
        config.crawler.timeout = timeout;
    }
    if let Some(attempts) = overrides.retry_attempts {
        config.crawler.retry_attempts = attempts;
    }
    if let Some(delay) = overrides.retry_delay {
        config.crawler.retry_delay = delay;
    }

    validate(&config)?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli.overrides)?;

    match cli.command {
        Command::Topics => handle_topics(config).await,
        Command::News {
            data_path,
            topics,
            days,
        } => handle_news(config, data_path, &topics, days).await,
        Command::Details { topic_path } => handle_details(config, topic_path).await,
        Command::Pipeline {
            max_topics,
            days,
            include_details,
        } => handle_pipeline(config, max_topics, days, include_details).await,
    }
}

/// Handles `topics`: crawls the topic list and shows the top 5
async fn handle_topics(config: Config) -> anyhow::Result<()> {
    let crawler = Crawler::new(config.crawler, config.output)?;
    let (topic_list, output_path) = crawler.crawl_topic_list().await?;

    println!("\n✓ Topic list crawling completed!");
    println!("Output: {}", output_path.display());
    println!("Topics found: {}", topic_list.topics.len());

    println!("\nTop 5 topics:");
    for topic in topic_list.ranked().into_iter().take(5) {
        println!("  {}. {} ({} news)", topic.rank, topic.topic, topic.news_count);
    }

    Ok(())
}

/// Handles `news`: crawls news lists for the given ranks of an existing run
async fn handle_news(
    mut config: Config,
    data_path: Option<PathBuf>,
    ranks: &[u32],
    days: u32,
) -> anyhow::Result<()> {
    let data_path = match data_path {
        Some(path) => path,
        None => latest_output_folder(&config.output.output_dir).ok_or_else(|| {
            anyhow!(
                "no previous run found under {}",
                config.output.output_dir.display()
            )
        })?,
    };

    // Write into the existing run folder
    config.output.output_dir = data_path.clone();
    config.output.create_timestamp_folder = false;

    let crawler = Crawler::new(config.crawler, config.output)?;
    let topic_list = load_topic_list(&data_path)?;

    println!("\nProcessing {} topics from {}", ranks.len(), data_path.display());

    for &rank in ranks {
        let Some(topic) = topic_list.by_rank(rank) else {
            println!("! Topic with rank {} not found", rank);
            continue;
        };

        println!("\nProcessing topic {}: {}", rank, topic.topic);
        let (news_list, _) = crawler
            .crawl_news_list_for_topic(topic, &data_path, days)
            .await?;
        println!("✓ Found {} news items", news_list.news_list.len());
    }

    println!("\n✓ News crawling completed!");
    Ok(())
}

/// Handles `details`: crawls article details for a topic folder
async fn handle_details(config: Config, topic_path: PathBuf) -> anyhow::Result<()> {
    let crawler = Crawler::new(config.crawler, config.output)?;
    let news_list = load_news_list(&topic_path)?;

    println!(
        "\nProcessing {} news items for details...",
        news_list.news_list.len()
    );
    println!("Topic: {}", news_list.topic);

    let report = crawler.crawl_news_details(&news_list, &topic_path).await?;

    println!("\n✓ News details crawling completed!");
    println!(
        "Success: {}, Errors: {}",
        report.success_count, report.error_count
    );
    println!("Output: {}", report.output_path.display());
    Ok(())
}

/// Handles `pipeline`: runs every stage in order
async fn handle_pipeline(
    config: Config,
    max_topics: usize,
    days: u32,
    include_details: bool,
) -> anyhow::Result<()> {
    println!("Starting full crawling pipeline...");
    println!("Max topics: {}", max_topics);
    println!("Include details: {}", if include_details { "Yes" } else { "No" });

    let crawler = Crawler::new(config.crawler, config.output)?;
    let report = crawler.crawl_full_pipeline(max_topics, days).await?;

    if include_details {
        match report.details_candidate() {
            Some(progress) => {
                println!("\nCrawling details for topic {}: {}", progress.rank, progress.topic);
                let news_list = load_news_list(&progress.topic_path)?;
                let details = crawler
                    .crawl_news_details(&news_list, &progress.topic_path)
                    .await?;
                println!("✓ Details crawling completed!");
                println!(
                    "Success: {}, Errors: {}",
                    details.success_count, details.error_count
                );
            }
            None => println!("\n! No topic news list was written; skipping details"),
        }
    }

    println!("\n✓ Full pipeline completed!");
    println!("Output: {}", report.output_path.display());
    println!("Total topics: {}", report.topic_list.topics.len());
    println!(
        "Topics completed: {}, failed: {}",
        report.completed(),
        report.failed()
    );
    Ok(())
}
