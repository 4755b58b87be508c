use std::net::TcpListener;

use env_logger::Env;
use sqlx::postgres::PgPoolOptions;

use quizgen_api::ai::AiClient;
use quizgen_api::config::Settings;
use quizgen_api::run;
use quizgen_api::store::QuizStore;

fn to_io_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::from_env().map_err(to_io_error)?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await
        .map_err(|e| {
            log::error!("Database connection error: {}", e);
            to_io_error(e)
        })?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(to_io_error)?;
    log::info!("Database connected successfully");

    let ai = AiClient::new(
        settings.groq_api_url.clone(),
        settings.groq_api_key.clone(),
        settings.groq_model.clone(),
    );

    let listener = TcpListener::bind(("0.0.0.0", settings.port))?;
    log::info!("Server running on port {}", settings.port);
    log::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        settings.port
    );

    run(listener, QuizStore::Postgres(pool), ai)?.await
}
