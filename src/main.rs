use std::{path::Path, process::ExitCode, sync::Arc};

use clap::Parser;
use dx_rating_processor::{
    api::{build_router, AppState},
    args::{Args, Command},
    config::RatingConfig,
    database::{
        client::{load_reference_file, ReferenceClient, ReferenceError},
        db_structs::ReferenceEntry,
        reference_index::ReferenceIndex,
        store::{ReferenceStore, RetryPolicy}
    },
    error::ProcessorError,
    model::pipeline::{RatingProcessor, RatingReport},
    render::{cover_art_refs, Presenter},
    utils::logging::init_tracing
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ProcessorError> {
    let mut config = RatingConfig::from_env()?;
    args.apply(&mut config);

    match &args.command {
        Command::Rate { input, output } => {
            let store = ReferenceStore::new();
            load_reference(&args, &config, &store).await?;

            let report = score_file(input, &config, &store).await?;
            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => write_file(path, json.as_bytes()).await?,
                None => println!("{json}")
            }
        }
        Command::Render {
            input,
            output,
            no_cover_art
        } => {
            let store = ReferenceStore::new();
            let index = load_reference(&args, &config, &store).await?;

            let report = score_file(input, &config, &store).await?;
            let presenter = if *no_cover_art {
                Presenter::new(config.recent_capacity, config.older_capacity)
            } else {
                Presenter::from_config(&config)?
            };
            let chart = presenter
                .render(&report.selection, &cover_art_refs(&index, &report.selection))
                .await?;

            write_file(output, chart.body.as_bytes()).await?;
            info!("Wrote chart with total rating {} to {}", report.totals.total, output.display());
        }
        Command::Serve { bind } => {
            let store = Arc::new(ReferenceStore::new());
            let state = AppState::new(store.clone(), &config, Presenter::from_config(&config)?);

            // Requests are answered with 503 until the table is in place
            let loader_args = args.clone();
            let loader_config = config.clone();
            tokio::spawn(async move {
                let loaded = store
                    .load_with_retry(RetryPolicy::default(), || {
                        fetch_reference_entries(&loader_args, &loader_config)
                    })
                    .await;
                if let Err(e) = loaded {
                    error!("Reference table could not be loaded, ratings are unavailable: {e}");
                }
            });

            let listener = TcpListener::bind(bind).await.map_err(ProcessorError::Server)?;
            info!("Listening on {bind}");
            axum::serve(listener, build_router(state))
                .with_graceful_shutdown(shutdown_signal())
                .await
                .map_err(ProcessorError::Server)?;
        }
    }

    Ok(())
}

async fn load_reference(
    args: &Args,
    config: &RatingConfig,
    store: &ReferenceStore
) -> Result<Arc<ReferenceIndex>, ReferenceError> {
    match &args.reference_file {
        Some(path) => {
            let entries = load_reference_file(path).await?;
            Ok(store.install_entries(&entries))
        }
        None => {
            let client = ReferenceClient::new(&config.reference_url, config.request_timeout)?;
            store.load(&client).await
        }
    }
}

async fn fetch_reference_entries(args: &Args, config: &RatingConfig) -> Result<Vec<ReferenceEntry>, ReferenceError> {
    match &args.reference_file {
        Some(path) => load_reference_file(path).await,
        None => ReferenceClient::new(&config.reference_url, config.request_timeout)?.fetch().await
    }
}

async fn score_file(
    input: &Path,
    config: &RatingConfig,
    store: &ReferenceStore
) -> Result<RatingReport, ProcessorError> {
    let payload = tokio::fs::read(input).await.map_err(|source| ProcessorError::Read {
        path: input.to_path_buf(),
        source
    })?;
    let processor = RatingProcessor::new(config.limits(), config.mode);

    Ok(processor.process_submission(&payload, store)?)
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), ProcessorError> {
    tokio::fs::write(path, contents).await.map_err(|source| ProcessorError::Write {
        path: path.to_path_buf(),
        source
    })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
