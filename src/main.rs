use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use uplink::server::{
    config::Config, error::Error, model::app::AppState, router, startup,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("Server exited with error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let db = startup::connect_to_database(&config).await?;

    startup::start_scheduler(&config, db.clone()).await?;

    let state = AppState {
        db,
        referral: config.referral,
    };
    let app = router::routes().with_state(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!(
        "Listening on {} (max referral depth {}, tier fallback {:?})",
        config.bind_address,
        config.referral.max_depth,
        config.referral.tier_fallback
    );

    axum::serve(listener, app).await?;

    Ok(())
}
