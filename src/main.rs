use portscope::config::AppConfig;
use portscope::inventory::DockerInventory;
use portscope::orchestrator::Orchestrator;
use portscope::probe::Prober;
use portscope::server::{self, AppState};
use portscope::VERSION;

use std::env;
use std::sync::Arc;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let config = AppConfig::default();
    init_logging(&config);

    debug!("portscope v{} starting", VERSION);

    if let Err(err) = config.validate() {
        error!("{}", err);
        std::process::exit(2);
    }

    info!(
        "Running as container ID: {} on {}",
        config.self_container_id, config.external_hostname
    );

    if let Err(err) = run(config).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let inventory = DockerInventory::connect(&config.docker_endpoint)?;

    // The bollard connection is lazy; surface reachability problems early
    // but keep serving, the daemon may come up after us.
    if let Err(err) = inventory.ping().await {
        warn!("docker daemon not reachable yet: {}", err);
    }

    let prober = Prober::new()?;
    let state = Arc::new(AppState {
        inventory: Arc::new(inventory),
        orchestrator: Orchestrator::new(Arc::new(prober)),
        config,
    });

    server::start_server(state).await
}

fn init_logging(config: &AppConfig) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = parse_level(&config.log_level);

        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter
                .add_directive(format!("portscope={}", level).parse().unwrap())
                .add_directive("hyper=warn".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap())
                .add_directive("bollard=warn".parse().unwrap());
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}
