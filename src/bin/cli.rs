//! Command-line front end for the review service
//!
//! Run with: cargo run --features cli --bin clause-review -- review contract.pdf

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clause_review::delivery::DeliveryStrategy;
use clause_review::{
    ClientConfig, DocumentPayload, JobSnapshot, JobStatus, PollingStrategy, PushStrategy,
    ReviewClient,
};

#[derive(Parser)]
#[command(
    name = "clause-review",
    about = "Submit contracts for review and retrieve clause findings",
    version
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the review service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a document and wait for its findings
    Review {
        file: PathBuf,
        /// How to wait for the result
        #[arg(long, value_enum, default_value_t = WaitMode::Poll)]
        watch: WaitMode,
    },
    /// Submit a document and print the assigned job id
    Submit { file: PathBuf },
    /// Fetch the current status/result for a job once
    Result { job_id: String },
    /// Wait for an existing job to finish
    Watch {
        job_id: String,
        #[arg(long, value_enum, default_value_t = WaitMode::Poll)]
        strategy: WaitMode,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WaitMode {
    /// Poll the result endpoint with exponential backoff
    Poll,
    /// Open a server-push subscription
    Subscribe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clause_review=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.endpoint.base_url = base_url;
    }

    let client = Arc::new(ReviewClient::new(config.clone())?);

    match cli.command {
        Command::Review { file, watch } => {
            let payload = DocumentPayload::from_path(&file)?;
            let receipt = client.submit(payload).await?;
            println!("{} {}", style("job").dim(), style(&receipt.id).cyan());
            let snapshot = wait(client, &config, &receipt.id, watch).await?;
            render(&snapshot);
        }
        Command::Submit { file } => {
            let payload = DocumentPayload::from_path(&file)?;
            let receipt = client.submit(payload).await?;
            println!("{}", receipt.id);
        }
        Command::Result { job_id } => {
            let snapshot = client.fetch_result(&job_id).await?;
            render(&snapshot);
        }
        Command::Watch { job_id, strategy } => {
            let snapshot = wait(client, &config, &job_id, strategy).await?;
            render(&snapshot);
        }
    }

    Ok(())
}

async fn wait(
    client: Arc<ReviewClient>,
    config: &ClientConfig,
    id: &str,
    mode: WaitMode,
) -> anyhow::Result<JobSnapshot> {
    let strategy: Arc<dyn DeliveryStrategy> = match mode {
        WaitMode::Poll => Arc::new(PollingStrategy::new(client.clone(), config.polling.clone())),
        WaitMode::Subscribe => Arc::new(PushStrategy::new(client, config.push.clone())),
    };

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar.set_message(format!("waiting for analysis ({})", strategy.name()));

    let result = strategy.wait_for_result(id).await;
    bar.finish_and_clear();
    Ok(result?)
}

fn render(snapshot: &JobSnapshot) {
    match snapshot.status {
        JobStatus::Pending => {
            println!("{}", style("not ready yet, try again later").yellow());
            return;
        }
        JobStatus::Error => {
            let message = snapshot.message.as_deref().unwrap_or("no detail");
            println!("{} {}", style("analysis failed:").red().bold(), message);
            return;
        }
        JobStatus::Ready => {}
    }

    for clause in &snapshot.output {
        println!(
            "\n{} {}",
            style(format!("clause {}", clause.clause_index)).bold(),
            clause.clause_text
        );
        if let Some(issue) = &clause.issue {
            println!("  {} {}", style("issue:").red().bold(), issue);
        }
        if let Some(suggestion) = &clause.suggestion {
            println!("  {} {}", style("suggestion:").green(), suggestion);
        }
    }

    println!(
        "\n{} clauses, {} with issues",
        snapshot.output.len(),
        snapshot.issue_count()
    );
}
