use astra::Server;
use homefinder::client_state;
use homefinder::config::AppConfig;
use homefinder::db::{init_db, seed_if_empty, Database};
use homefinder::responses::error_to_response;
use homefinder::router::{handle, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,homefinder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let db = Database::new(config.db_path.clone());

    if let Err(e) = init_db(&db, &config.schema_path) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }
    if config.seed {
        if let Err(e) = seed_if_empty(&db, &config.seed_path) {
            tracing::warn!(error = %e, "seeding demo listings failed");
        }
    }

    let state = AppState::new(db, config.scoring);

    if let Some(token) = &config.map_token {
        if let Err(e) = client_state::save_map_token(&state.client_state, token) {
            tracing::warn!(error = %e, "could not store map access token");
        }
    }

    tracing::info!(addr = %config.addr, workers = config.workers, "starting server");

    let server = Server::bind(&config.addr).max_workers(config.workers);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down");
}
