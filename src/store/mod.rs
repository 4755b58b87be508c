//! Persistence for quiz records. Production runs against Postgres; the
//! in-memory variant backs the integration test harness and local hacking.
//!
//! Records are read-only after creation: there is no update-in-place, only
//! create, read and full deletion.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{NewQuiz, Quiz, QuizFormat, QuizStats};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter {
    pub quiz_type: Option<QuizFormat>,
    pub limit: Option<i64>,
}

pub enum QuizStore {
    Postgres(sqlx::PgPool),
    Memory(MemoryStore),
}

impl QuizStore {
    /// Persist a validated quiz, assigning its identity and creation
    /// timestamp. The write is atomic: a quiz is stored whole or not at all.
    pub async fn create(&self, new_quiz: NewQuiz) -> Result<Quiz, ApiError> {
        match self {
            QuizStore::Postgres(pool) => postgres::create(pool, new_quiz).await,
            QuizStore::Memory(store) => store.create(new_quiz),
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<Quiz, ApiError> {
        match self {
            QuizStore::Postgres(pool) => postgres::find(pool, id).await,
            QuizStore::Memory(store) => store.find(id),
        }
    }

    /// List quizzes newest-first, optionally filtered by format and capped.
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<Quiz>, ApiError> {
        match self {
            QuizStore::Postgres(pool) => postgres::list(pool, filter).await,
            QuizStore::Memory(store) => store.list(filter),
        }
    }

    /// Remove a quiz and return it, or `NotFound`.
    pub async fn delete(&self, id: Uuid) -> Result<Quiz, ApiError> {
        match self {
            QuizStore::Postgres(pool) => postgres::delete(pool, id).await,
            QuizStore::Memory(store) => store.delete(id),
        }
    }

    pub async fn stats(&self) -> Result<QuizStats, ApiError> {
        match self {
            QuizStore::Postgres(pool) => postgres::stats(pool).await,
            QuizStore::Memory(store) => store.stats(),
        }
    }
}
