use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use sungbok_server::{
    config::settings,
    db::{MemoryStore, PgStore, Store},
    game::tiers::TierTable,
    http, metrics,
    rank::{RankResolver, RiotClient},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = settings();

    // Storage
    let store: Arc<dyn Store> = match &cfg.database_url {
        Some(url) => Arc::new(
            PgStore::connect(url, cfg.db_max_connections)
                .await
                .expect("Failed to set up Postgres"),
        ),
        None => {
            log::warn!("DATABASE_URL not set; using the in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    // Rank lookups for member registration
    if cfg.riot_api_key.is_empty() {
        log::warn!("RIOT_API_KEY not set; member registration will be rejected upstream");
    }
    let ranks: Arc<dyn RankResolver> =
        Arc::new(RiotClient::from_settings(cfg).expect("Invalid Riot API base URL"));

    let store = web::Data::from(store);
    let ranks = web::Data::from(ranks);
    let tiers = web::Data::new(TierTable::default());

    log::info!("listening on {}", cfg.server_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(store.clone())
            .app_data(ranks.clone())
            .app_data(tiers.clone())
            .configure(http::routes::init_routes)
    })
    .bind(&cfg.server_addr)?
    .run()
    .await
}
