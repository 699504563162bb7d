use clap::Parser;
use rw_classifier::OpenAiClassifier;
use rw_core::{AppConfig, ArticleRecord, Result};
use rw_news::{NewsClient, NewsQuery};
use rw_pipeline::{Pipeline, PipelineConfig, RunOutcome};
use rw_publish::GithubStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Geopolitical risk news archiver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the fetch → classify → merge → publish pipeline once
    Run {
        /// Repeat the run every N seconds instead of exiting
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Import a legacy JSON export of article records into the archive
    Seed {
        /// Path to a JSON array of article records
        input: PathBuf,
    },
}

fn build_pipeline(config: &AppConfig) -> Pipeline {
    let news = NewsClient::new(&config.news_api_key, NewsQuery::from_config(config));
    let classifier = OpenAiClassifier::new(&config.classifier_api_key, &config.model_name);
    let remote = GithubStore::new(
        &config.github_token,
        &config.archive_repo,
        &config.archive_branch,
    );

    Pipeline::new(
        Arc::new(news),
        Arc::new(classifier),
        Arc::new(remote),
        PipelineConfig::from_config(config),
    )
}

fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Published {
            inserted,
            archive_len,
            live_len,
        } => {
            info!(
                "✅ Published: {} new records, archive now holds {}, live view {}",
                inserted, archive_len, live_len
            );
        }
        RunOutcome::NoArticles => info!("📭 No articles fetched, nothing published"),
        RunOutcome::NothingNew => info!("📭 Nothing new after filtering and merge, nothing published"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    let pipeline = build_pipeline(&config);

    match cli.command {
        Commands::Run { interval: None } => {
            let outcome = pipeline.run().await?;
            report(&outcome);
        }
        Commands::Run {
            interval: Some(secs),
        } => {
            info!("⏰ Running every {}s", secs);
            loop {
                // Each iteration is an independent run; a failed one is logged
                // and the next interval gets a fresh attempt.
                match pipeline.run().await {
                    Ok(outcome) => report(&outcome),
                    Err(e) => error!("Run failed: {}", e),
                }
                tokio::time::sleep(Duration::from_secs(secs)).await;
            }
        }
        Commands::Seed { input } => {
            info!("🌱 Seeding archive from {}", input.display());
            let data = std::fs::read(&input)?;
            let records: Vec<ArticleRecord> = serde_json::from_slice(&data)?;
            info!("Read {} records from export", records.len());
            let outcome = pipeline.seed(&records).await?;
            report(&outcome);
        }
    }

    Ok(())
}
