mod config;
mod document;
mod error;
mod event;
mod handler;
mod http;
mod lambda;
mod logger;
mod server;
mod storage;

use config::{Config, RunMode};
use handler::{ObjectLocation, SolutionsHandler};
use storage::Backend;

/// Config file used when `-c/--config` is not given (extension optional)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = parse_config_path(std::env::args().skip(1))?;
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg)?;
    logger::log_startup(&cfg);

    // Build the Tokio runtime, sized by server.workers when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    // The store client is created once here and injected into the handler
    let store = Backend::from_config(&cfg.storage).await;
    let mut handler = SolutionsHandler::new(
        store,
        ObjectLocation {
            bucket: cfg.storage.bucket.clone(),
            key: cfg.storage.key.clone(),
        },
    );
    if cfg.logging.access_log {
        handler = handler.with_access_log(&cfg.logging.access_log_format);
    }

    match cfg.mode {
        RunMode::Server => server::serve(&cfg, handler).await,
        RunMode::Lambda => lambda::run(handler)
            .await
            .map_err(|e| e as Box<dyn std::error::Error>),
    }
}

/// Read `-c <path>` / `--config <path>` / `--config=<path>` from the arguments
fn parse_config_path(args: impl Iterator<Item = String>) -> Result<String, String> {
    let mut args = args;
    let mut path = DEFAULT_CONFIG_PATH.to_string();

    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--config=") {
            path = value.to_string();
        } else if arg == "-c" || arg == "--config" {
            path = args
                .next()
                .ok_or_else(|| format!("Missing value for {arg}"))?;
        } else {
            return Err(format!("Unknown argument: {arg}"));
        }
    }

    Ok(path)
}
