use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally::api::{create_router, AppState};
use tally::config::Config;
use tally::extraction::{ExtractionOutcome, InvoiceExtractor};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Read the total amount from an invoice image")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Extract the total from a single invoice image and print it
    Extract {
        /// Invoice image to read
        file: Option<PathBuf>,
        /// Media type of the image, e.g. image/png. Detected when omitted.
        #[arg(long)]
        media_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    // Logs go to stderr so `tally extract` output stays clean on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();

    tracing::info!(
        "Initializing inference backend: {}...",
        config.gemini.model
    );
    let extractor = InvoiceExtractor::new(&config.gemini);
    if !extractor.is_available() {
        tracing::warn!("Inference unavailable - set GEMINI_API_KEY to enable extraction");
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            serve(config, extractor).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Extract { file, media_type } => {
            let outcome = extractor
                .run_file(file.as_deref(), media_type.as_deref())
                .await;
            Ok(report(&outcome))
        }
    }
}

async fn serve(config: Config, extractor: InvoiceExtractor) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, extractor);
    let app = create_router(state);

    tracing::info!("Tally starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn report(outcome: &ExtractionOutcome) -> ExitCode {
    match outcome {
        ExtractionOutcome::Success { text } => {
            println!("Total: {text}");
            ExitCode::SUCCESS
        }
        ExtractionOutcome::Failure { message, .. } => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
