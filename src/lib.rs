use actix_web::dev::Server;
use actix_web::{middleware, web, App, HttpServer};
use std::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod ai;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod session;
pub mod store;

use crate::ai::AiClient;
use crate::models::{
    DeleteResponse, ErrorResponse, HealthResponse, LastCreated, Question, Quiz, QuizFormat,
    QuizStats,
};
use crate::store::QuizStore;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::generate_quiz,
        handlers::list_quizzes,
        handlers::get_quiz,
        handlers::delete_quiz,
        handlers::quiz_stats,
    ),
    components(
        schemas(
            Quiz, Question, QuizFormat, QuizStats, LastCreated,
            DeleteResponse, HealthResponse, ErrorResponse
        )
    ),
    tags(
        (name = "System", description = "Liveness endpoints"),
        (name = "Quiz", description = "Quiz generation and retrieval")
    )
)]
pub struct ApiDoc;

pub fn run(listener: TcpListener, store: QuizStore, ai: AiClient) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);
    let ai = web::Data::new(ai);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(ai.clone())
            .wrap(middleware::Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi())
            )
            .route("/", web::get().to(handlers::index))
            .service(
                web::scope("/api/quiz")
                    .route("/generate", web::post().to(handlers::generate_quiz))
                    // fixed paths must register ahead of /{id}
                    .route("/stats", web::get().to(handlers::quiz_stats))
                    .route("/health", web::get().to(handlers::health_check))
                    .route("", web::get().to(handlers::list_quizzes))
                    .route("/{id}", web::get().to(handlers::get_quiz))
                    .route("/{id}", web::delete().to(handlers::delete_quiz)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
