//! RwLock-backed store used by the test harness and local development.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{LastCreated, NewQuiz, Quiz, QuizStats};
use crate::store::ListFilter;

#[derive(Default)]
pub struct MemoryStore {
    quizzes: RwLock<Vec<Quiz>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> ApiError {
        ApiError::Persistence("quiz store lock poisoned".to_string())
    }

    pub fn create(&self, new_quiz: NewQuiz) -> Result<Quiz, ApiError> {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            title: new_quiz.title,
            quiz_type: new_quiz.quiz_type,
            questions: new_quiz.questions,
            created_at: Utc::now(),
        };

        let mut quizzes = self.quizzes.write().map_err(|_| Self::poisoned())?;
        quizzes.push(quiz.clone());
        Ok(quiz)
    }

    pub fn find(&self, id: Uuid) -> Result<Quiz, ApiError> {
        let quizzes = self.quizzes.read().map_err(|_| Self::poisoned())?;
        quizzes
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    pub fn list(&self, filter: ListFilter) -> Result<Vec<Quiz>, ApiError> {
        let quizzes = self.quizzes.read().map_err(|_| Self::poisoned())?;

        let mut matching: Vec<Quiz> = quizzes
            .iter()
            .filter(|q| filter.quiz_type.map_or(true, |t| q.quiz_type == t))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = filter.limit {
            matching.truncate(limit.max(0) as usize);
        }
        Ok(matching)
    }

    pub fn delete(&self, id: Uuid) -> Result<Quiz, ApiError> {
        let mut quizzes = self.quizzes.write().map_err(|_| Self::poisoned())?;
        let position = quizzes
            .iter()
            .position(|q| q.id == id)
            .ok_or(ApiError::NotFound)?;
        Ok(quizzes.remove(position))
    }

    pub fn stats(&self) -> Result<QuizStats, ApiError> {
        let quizzes = self.quizzes.read().map_err(|_| Self::poisoned())?;

        let mut by_type: HashMap<String, i64> = HashMap::new();
        for quiz in quizzes.iter() {
            *by_type.entry(quiz.quiz_type.to_string()).or_insert(0) += 1;
        }

        let last_created = quizzes
            .iter()
            .max_by_key(|q| q.created_at)
            .map(|q| LastCreated {
                title: q.title.clone(),
                created_at: q.created_at,
            });

        Ok(QuizStats {
            total: quizzes.len() as i64,
            by_type,
            last_created,
        })
    }
}
