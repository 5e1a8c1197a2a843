use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use tasktrack::auth::TokenKeys;
use tasktrack::config::Config;
use tasktrack::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Keys are built once here and injected; handlers and middleware never
    // touch the environment.
    let token_keys = TokenKeys::from_secret(&config.jwt_secret);

    log::info!("Starting server at {}", config.server_url());

    let server_pool = pool.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(web::Data::new(token_keys.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    // The server has drained in-flight requests (actix handles SIGINT/SIGTERM
    // with graceful shutdown); release database connections before exit.
    log::info!("Server stopped, closing database pool");
    pool.close().await;

    Ok(())
}
