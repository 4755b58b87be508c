use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::TryStreamExt;
use uuid::Uuid;

use crate::ai::AiClient;
use crate::error::ApiError;
use crate::extract;
use crate::models::{
    DeleteResponse, ErrorResponse, HealthResponse, ListQuizzesFilter, NewQuiz, Quiz, QuizFormat,
    QuizStats,
};
use crate::store::{ListFilter, QuizStore};

pub const MIN_CONTENT_CHARS: usize = 50;
pub const MAX_CONTENT_CHARS: usize = 50_000;
const DEFAULT_QUESTION_COUNT: u32 = 5;
const MAX_QUESTION_COUNT: u32 = 20;

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Quiz Generator API is running" }))
}

#[utoipa::path(
    get,
    path = "/api/quiz/health",
    responses(
        (status = 200, description = "Liveness payload", body = HealthResponse)
    )
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: "Quiz API is running".to_string(),
        timestamp: Utc::now(),
    })
}

/// Fields accepted by the multipart generate request.
#[derive(Default)]
struct GenerateRequest {
    pdf: Option<Vec<u8>>,
    text: Option<String>,
    quiz_type: Option<QuizFormat>,
    question_count: Option<u32>,
}

async fn read_text_field(field: &mut actix_multipart::Field) -> Result<String, ApiError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf)
        .map_err(|_| ApiError::BadRequest("Form fields must be valid UTF-8".to_string()))
}

async fn read_pdf_field(field: &mut actix_multipart::Field) -> Result<Vec<u8>, ApiError> {
    let is_pdf = field
        .content_type()
        .map_or(false, |mime| mime.essence_str() == "application/pdf");
    if !is_pdf {
        return Err(ApiError::UnsupportedFileType);
    }

    let mut buf = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        // Reject oversized uploads mid-stream instead of buffering them whole.
        if buf.len() + chunk.len() > extract::MAX_PDF_BYTES {
            return Err(ApiError::FileTooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

async fn collect_generate_request(mut payload: Multipart) -> Result<GenerateRequest, ApiError> {
    let mut request = GenerateRequest::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().to_string();
        match name.as_str() {
            "pdf" => {
                let bytes = read_pdf_field(&mut field).await?;
                if !bytes.is_empty() {
                    request.pdf = Some(bytes);
                }
            }
            "text" => request.text = Some(read_text_field(&mut field).await?),
            "quizType" => {
                let value = read_text_field(&mut field).await?;
                request.quiz_type =
                    Some(value.trim().parse::<QuizFormat>().map_err(ApiError::BadRequest)?);
            }
            "numberOfQuestions" => {
                let value = read_text_field(&mut field).await?;
                let count = value.trim().parse::<u32>().map_err(|_| {
                    ApiError::BadRequest("numberOfQuestions must be a positive integer".to_string())
                })?;
                request.question_count = Some(count);
            }
            // Unknown fields are drained and ignored.
            _ => {
                while field
                    .try_next()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
                    .is_some()
                {}
            }
        }
    }

    Ok(request)
}

/// Trim, enforce the minimum length and silently cap at 50k characters.
fn clamp_content(content: &str) -> Result<String, ApiError> {
    let trimmed = content.trim();
    let length = trimmed.chars().count();
    if length < MIN_CONTENT_CHARS {
        return Err(ApiError::ContentTooShort);
    }
    if length > MAX_CONTENT_CHARS {
        log::warn!("Content truncated to {} characters", MAX_CONTENT_CHARS);
        return Ok(trimmed.chars().take(MAX_CONTENT_CHARS).collect());
    }
    Ok(trimmed.to_string())
}

#[utoipa::path(
    post,
    path = "/api/quiz/generate",
    responses(
        (status = 201, description = "Quiz generated and persisted", body = Quiz),
        (status = 400, description = "Missing, oversized or unreadable input", body = ErrorResponse),
        (status = 500, description = "Generation or persistence failure", body = ErrorResponse)
    )
)]
pub async fn generate_quiz(
    store: web::Data<QuizStore>,
    ai: web::Data<AiClient>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let request = collect_generate_request(payload).await?;

    let quiz_type = request
        .quiz_type
        .ok_or_else(|| ApiError::BadRequest("quizType is required".to_string()))?;
    let question_count = request.question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
    if question_count == 0 || question_count > MAX_QUESTION_COUNT {
        return Err(ApiError::BadRequest(format!(
            "numberOfQuestions must be between 1 and {}",
            MAX_QUESTION_COUNT
        )));
    }

    let has_text = request.text.as_deref().map_or(false, |t| !t.trim().is_empty());
    if request.pdf.is_none() && !has_text {
        return Err(ApiError::EmptyContent);
    }

    let content = match &request.pdf {
        Some(bytes) => {
            log::info!("Processing PDF upload ({:.2} KB)", bytes.len() as f64 / 1024.0);
            extract::extract_pdf_text(bytes)?
        }
        None => request.text.unwrap_or_default(),
    };
    let content = clamp_content(&content)?;

    log::info!(
        "Generating {} quiz with {} questions from {} characters of content",
        quiz_type,
        question_count,
        content.chars().count()
    );
    let generated = ai.generate(&content, quiz_type, question_count).await?;

    // Generation and validation fully succeeded; only now touch the store.
    let title = generated
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Generated Quiz".to_string());
    let quiz = store
        .create(NewQuiz {
            title,
            quiz_type,
            questions: generated.questions,
        })
        .await?;

    log::info!("Quiz {} created with {} questions", quiz.id, quiz.questions.len());
    Ok(HttpResponse::Created().json(quiz))
}

#[utoipa::path(
    get,
    path = "/api/quiz",
    params(ListQuizzesFilter),
    responses(
        (status = 200, description = "Quizzes, newest first", body = Vec<Quiz>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_quizzes(
    store: web::Data<QuizStore>,
    filter: web::Query<ListQuizzesFilter>,
) -> Result<HttpResponse, ApiError> {
    if filter.limit.map_or(false, |l| l < 0) {
        return Err(ApiError::BadRequest("limit must be non-negative".to_string()));
    }

    let quizzes = store
        .list(ListFilter {
            quiz_type: filter.quiz_type,
            limit: filter.limit,
        })
        .await?;

    log::info!("Fetched {} quizzes", quizzes.len());
    Ok(HttpResponse::Ok().json(quizzes))
}

#[utoipa::path(
    get,
    path = "/api/quiz/{id}",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "The quiz", body = Quiz),
        (status = 404, description = "Quiz not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_quiz(
    store: web::Data<QuizStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let quiz = store.find(path.into_inner()).await?;
    log::info!("Retrieved quiz: {}", quiz.title);
    Ok(HttpResponse::Ok().json(quiz))
}

#[utoipa::path(
    delete,
    path = "/api/quiz/{id}",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Deleted quiz", body = DeleteResponse),
        (status = 404, description = "Quiz not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_quiz(
    store: web::Data<QuizStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let quiz = store.delete(path.into_inner()).await?;
    log::info!("Deleted quiz: {}", quiz.title);
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Quiz deleted successfully".to_string(),
        quiz,
    }))
}

#[utoipa::path(
    get,
    path = "/api/quiz/stats",
    responses(
        (status = 200, description = "Aggregate statistics", body = QuizStats),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn quiz_stats(store: web::Data<QuizStore>) -> Result<HttpResponse, ApiError> {
    let stats = store.stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_of_49_characters_is_rejected() {
        let content = "x".repeat(MIN_CONTENT_CHARS - 1);
        assert!(matches!(
            clamp_content(&content),
            Err(ApiError::ContentTooShort)
        ));
    }

    #[test]
    fn content_of_50_characters_is_accepted() {
        let content = "x".repeat(MIN_CONTENT_CHARS);
        assert_eq!(clamp_content(&content).unwrap(), content);
    }

    #[test]
    fn length_is_measured_after_trimming() {
        let padded = format!("   {}   ", "x".repeat(MIN_CONTENT_CHARS - 1));
        assert!(matches!(
            clamp_content(&padded),
            Err(ApiError::ContentTooShort)
        ));
    }

    #[test]
    fn overlong_content_is_silently_truncated() {
        let content = "y".repeat(MAX_CONTENT_CHARS + 1);
        let clamped = clamp_content(&content).unwrap();
        assert_eq!(clamped.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn content_at_the_cap_is_untouched() {
        let content = "y".repeat(MAX_CONTENT_CHARS);
        assert_eq!(clamp_content(&content).unwrap(), content);
    }
}
