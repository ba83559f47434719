use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use pixtext::api::{create_router, AppState};
use pixtext::config::Config;
use pixtext::ocr::OcrEngine;
use pixtext::processing::ExtractionPipeline;

#[derive(Parser)]
#[command(name = "pixtext")]
#[command(about = "Turn base64 screenshots into text with Tesseract OCR")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Run OCR on an image file and print the text
    Extract {
        path: PathBuf,
        /// Also write the thresholded image handed to the engine
        #[arg(long)]
        save_preprocessed: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let _log_guard = pixtext::logging::init(&config.logging)?;

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Extract {
            path,
            save_preprocessed,
        } => extract(&config, &path, save_preprocessed.as_deref()).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Initializing OCR engine: {}...", config.ocr.engine);
    let engine = OcrEngine::new(&config.ocr);
    match engine.probe().await {
        Ok(version) => tracing::info!("OCR engine ready: {}", version),
        Err(e) => tracing::warn!("OCR engine unavailable - /convert will fail: {}", e),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, engine);
    let app = create_router(state);

    tracing::info!("Pixtext starting on http://{}", addr);
    tracing::info!("  Convert:      POST http://{}/convert", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn extract(config: &Config, path: &Path, save_preprocessed: Option<&Path>) -> anyhow::Result<()> {
    let pipeline = ExtractionPipeline::new(OcrEngine::new(&config.ocr));

    let text = match save_preprocessed {
        None => pipeline.extract_path(path).await?,
        Some(out) => {
            let binary = pipeline.prepare_path(path).await?;
            binary.save(out)?;
            tracing::info!(
                path = %out.display(),
                threshold = binary.threshold(),
                "Preprocessed image written"
            );
            pipeline.engine().recognize(binary).await?
        }
    };

    println!("{text}");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
