use env_logger::Env;
use log::{error, info, warn};
use visitor_log::{
    shared::storage,
    AppState, Config, HostTelemetryCollector, PublicIpCollector, TelemetryOptions,
};

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Connecting to {} log store", config.store.kind());
    let storage = match storage::connect(&config.store).await {
        Ok(storage) => storage,
        Err(e) => {
            error!("{} connection failed: {}", config.store.kind(), e);
            std::process::exit(1);
        }
    };

    let public_ip = match &config.public_ip_lookup {
        Some(url) => match PublicIpCollector::new(url.clone(), config.public_ip_timeout) {
            Ok(collector) => {
                info!("Public IP lookup enabled via {}", collector.url());
                Some(collector)
            }
            Err(e) => {
                warn!("Public IP lookup disabled: {}", e);
                None
            }
        },
        None => None,
    };

    let telemetry = HostTelemetryCollector::new(
        TelemetryOptions {
            cpu_sample: config.cpu_sample,
            collect_network: config.collect_network,
        },
        public_ip,
    );

    info!(
        "Validation mode: {}, serving static files from {}",
        config.validation_mode,
        config.static_dir.display()
    );
    let state = AppState::new(
        storage,
        telemetry,
        config.validation_mode,
        config.static_dir.clone(),
    );

    if let Err(e) = visitor_log::serve(&config.bind_address(), state).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
