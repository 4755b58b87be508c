use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::models::ErrorResponse;

/// Failures surfaced by the quiz API, each mapped to an HTTP status and a
/// user-facing message at the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Please provide either a PDF file or text content")]
    EmptyContent,

    #[error("Content is too short. Please provide at least 50 characters of text or a valid PDF with content")]
    ContentTooShort,

    #[error("Only PDF files are supported")]
    UnsupportedFileType,

    #[error("File size must be less than 10MB")]
    FileTooLarge,

    #[error("{0}")]
    BadRequest(String),

    #[error("Failed to extract text from PDF. Please ensure it contains readable text.")]
    ExtractionFailed(String),

    #[error("Failed to generate quiz with AI")]
    GenerationFailed(String),

    #[error("AI service is unavailable. Please check your API key.")]
    UpstreamUnavailable,

    #[error("Quiz not found")]
    NotFound,

    #[error("Failed to access quiz storage")]
    Persistence(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Persistence(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EmptyContent
            | ApiError::ContentTooShort
            | ApiError::UnsupportedFileType
            | ApiError::FileTooLarge
            | ApiError::BadRequest(_)
            | ApiError::ExtractionFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::GenerationFailed(_)
            | ApiError::UpstreamUnavailable
            | ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::ExtractionFailed(detail) => {
                log::error!("PDF extraction error: {}", detail)
            }
            ApiError::GenerationFailed(detail) => {
                log::error!("Quiz generation error: {}", detail)
            }
            ApiError::Persistence(detail) => log::error!("Storage error: {}", detail),
            other => log::warn!("Request failed: {}", other),
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
