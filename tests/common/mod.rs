#![allow(dead_code)]

use std::net::TcpListener;

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};

use quizgen_api::ai::AiClient;
use quizgen_api::run;
use quizgen_api::store::{MemoryStore, QuizStore};

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

/// Source text comfortably above the 50-character minimum.
pub const VALID_CONTENT: &str = "Rust's ownership system guarantees memory safety without a garbage \
     collector by enforcing borrowing rules at compile time.";

/// A well-formed model output: multiple-choice shaped, so it passes
/// validation for every requested format.
pub fn default_model_output() -> String {
    serde_json::json!({
        "title": "Rust Basics Quiz",
        "questions": [
            {
                "question": "What enforces memory safety in Rust?",
                "options": ["Ownership", "Garbage collection", "Reference counting everywhere", "Manual free"],
                "correctAnswer": "Ownership",
                "explanation": "The borrow checker enforces ownership rules at compile time."
            },
            {
                "question": "When are borrowing rules checked?",
                "options": ["At runtime", "At compile time", "At link time", "Never"],
                "correctAnswer": "At compile time"
            }
        ]
    })
    .to_string()
}

fn bind_random() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// Serve a canned chat-completion payload wrapping `content` as the model's
/// message, standing in for the hosted completion endpoint.
async fn spawn_stub_completions(content: String) -> String {
    let (listener, port) = bind_random();

    let server = HttpServer::new(move || {
        let content = content.clone();
        App::new().default_service(web::route().to(move || {
            let content = content.clone();
            async move {
                HttpResponse::Ok().json(serde_json::json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": content } }
                    ]
                }))
            }
        }))
    })
    .listen(listener)
    .expect("Failed to bind stub completions server")
    .run();
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}/v1/chat/completions", port)
}

/// A completion endpoint that always fails with the given status.
async fn spawn_stub_completions_failing(status: u16) -> String {
    let (listener, port) = bind_random();

    let server = HttpServer::new(move || {
        App::new().default_service(web::route().to(move || async move {
            HttpResponse::build(StatusCode::from_u16(status).unwrap()).finish()
        }))
    })
    .listen(listener)
    .expect("Failed to bind stub completions server")
    .run();
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}/v1/chat/completions", port)
}

async fn spawn_app_against(endpoint: String) -> TestApp {
    let (listener, port) = bind_random();
    let address = format!("http://127.0.0.1:{}", port);

    let store = QuizStore::Memory(MemoryStore::new());
    let ai = AiClient::new(endpoint, "test-key".to_string(), "test-model".to_string());

    let server = run(listener, store, ai).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        api_client: reqwest::Client::new(),
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_model_output(default_model_output()).await
}

pub async fn spawn_app_with_model_output(output: String) -> TestApp {
    let endpoint = spawn_stub_completions(output).await;
    spawn_app_against(endpoint).await
}

pub async fn spawn_app_with_upstream_status(status: u16) -> TestApp {
    let endpoint = spawn_stub_completions_failing(status).await;
    spawn_app_against(endpoint).await
}

/// POST a text-only generate request.
pub async fn post_generate(
    app: &TestApp,
    text: &str,
    quiz_type: &str,
    count: u32,
) -> reqwest::Response {
    let form = reqwest::multipart::Form::new()
        .text("text", text.to_string())
        .text("quizType", quiz_type.to_string())
        .text("numberOfQuestions", count.to_string());

    app.api_client
        .post(format!("{}/api/quiz/generate", &app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.")
}
