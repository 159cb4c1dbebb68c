use tracing_subscriber::EnvFilter;

use trainingcenter::{config::Config, router, scheduler::Scheduler, startup};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), trainingcenter::error::Error> {
    let db = startup::connect_to_database(&config).await?;
    let state = startup::build_app_state(&config, db.clone())?;

    Scheduler::new(db, state.vateud.clone())
        .await?
        .start()
        .await?;

    let router = router::routes().with_state(state);

    tracing::info!("Starting server on {}", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
