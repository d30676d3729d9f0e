mod config;
mod db;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env();

    println!("🔌 Connecting to database...");
    let db = db::establish_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    let port = config.port;
    println!("🚀 Starting server on http://localhost:{}", port);

    let db = web::Data::new(db);
    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .app_data(web::Data::new(config.clone()))
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .configure(routes::configure_routes)
    })
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
