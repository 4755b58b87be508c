//! Postgres persistence. Questions live in a JSONB column so a quiz is a
//! single document row; all queries are runtime-checked.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{LastCreated, NewQuiz, Quiz, QuizFormat, QuizStats};
use crate::store::ListFilter;

const SELECT_QUIZ: &str = "SELECT id, title, quiz_type, questions, created_at FROM quizzes";

fn row_to_quiz(row: &PgRow) -> Result<Quiz, ApiError> {
    let quiz_type: String = row.try_get("quiz_type")?;
    let quiz_type = quiz_type
        .parse::<QuizFormat>()
        .map_err(ApiError::Persistence)?;

    let questions: serde_json::Value = row.try_get("questions")?;
    let questions =
        serde_json::from_value(questions).map_err(|e| ApiError::Persistence(e.to_string()))?;

    Ok(Quiz {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        quiz_type,
        questions,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn create(pool: &PgPool, new_quiz: NewQuiz) -> Result<Quiz, ApiError> {
    let quiz = Quiz {
        id: Uuid::new_v4(),
        title: new_quiz.title,
        quiz_type: new_quiz.quiz_type,
        questions: new_quiz.questions,
        created_at: Utc::now(),
    };

    let questions =
        serde_json::to_value(&quiz.questions).map_err(|e| ApiError::Persistence(e.to_string()))?;

    sqlx::query(
        "INSERT INTO quizzes (id, title, quiz_type, questions, created_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(quiz.id)
    .bind(&quiz.title)
    .bind(quiz.quiz_type.as_str())
    .bind(questions)
    .bind(quiz.created_at)
    .execute(pool)
    .await?;

    Ok(quiz)
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Quiz, ApiError> {
    let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_QUIZ))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound)?;

    row_to_quiz(&row)
}

pub async fn list(pool: &PgPool, filter: ListFilter) -> Result<Vec<Quiz>, ApiError> {
    let rows = match (filter.quiz_type, filter.limit) {
        (Some(quiz_type), Some(limit)) => {
            sqlx::query(&format!(
                "{} WHERE quiz_type = $1 ORDER BY created_at DESC LIMIT $2",
                SELECT_QUIZ
            ))
            .bind(quiz_type.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        (Some(quiz_type), None) => {
            sqlx::query(&format!(
                "{} WHERE quiz_type = $1 ORDER BY created_at DESC",
                SELECT_QUIZ
            ))
            .bind(quiz_type.as_str())
            .fetch_all(pool)
            .await?
        }
        (None, Some(limit)) => {
            sqlx::query(&format!(
                "{} ORDER BY created_at DESC LIMIT $1",
                SELECT_QUIZ
            ))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        (None, None) => {
            sqlx::query(&format!("{} ORDER BY created_at DESC", SELECT_QUIZ))
                .fetch_all(pool)
                .await?
        }
    };

    rows.iter().map(row_to_quiz).collect()
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Quiz, ApiError> {
    // The original responds with the deleted record, so fetch before removal.
    let quiz = find(pool, id).await?;

    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    Ok(quiz)
}

pub async fn stats(pool: &PgPool) -> Result<QuizStats, ApiError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query("SELECT quiz_type, COUNT(*) AS count FROM quizzes GROUP BY quiz_type")
        .fetch_all(pool)
        .await?;
    let mut by_type: HashMap<String, i64> = HashMap::new();
    for row in rows {
        let quiz_type: String = row.try_get("quiz_type")?;
        let count: i64 = row.try_get("count")?;
        by_type.insert(quiz_type, count);
    }

    let last_created = sqlx::query(
        "SELECT title, created_at FROM quizzes ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?
    .map(|row| -> Result<LastCreated, ApiError> {
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        Ok(LastCreated {
            title: row.try_get("title")?,
            created_at,
        })
    })
    .transpose()?;

    Ok(QuizStats {
        total,
        by_type,
        last_created,
    })
}
