//! One quiz-taking attempt: navigation, answer capture and scoring.
//!
//! Sessions are ephemeral client-side state over a quiz fetched from the
//! store. Nothing here is persisted; the score is derived on demand by
//! comparing captured answers against the stored correct answers.

use std::collections::HashMap;

use crate::models::{Question, Quiz};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    Completed,
}

/// Per-question grading outcome. An unanswered question is incorrect, never
/// an error.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub index: usize,
    pub submitted: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionResults {
    pub correct: usize,
    pub total: usize,
    pub breakdown: Vec<QuestionResult>,
}

pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    answers: HashMap<usize, String>,
    phase: SessionPhase,
}

impl QuizSession {
    /// Start an attempt at the first question. Quizzes are created with a
    /// non-empty question list, so `current` is always in bounds.
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            current: 0,
            answers: HashMap::new(),
            phase: SessionPhase::InProgress,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.current]
    }

    pub fn answer_at(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    /// Record an answer for the current question, overwriting any prior
    /// selection at this index.
    pub fn select_answer(&mut self, value: impl Into<String>) {
        if self.phase == SessionPhase::InProgress {
            self.answers.insert(self.current, value.into());
        }
    }

    /// Move to the next question, or complete the session from the last one.
    pub fn advance(&mut self) {
        if self.phase != SessionPhase::InProgress {
            return;
        }
        if self.current + 1 < self.quiz.questions.len() {
            self.current += 1;
        } else {
            self.phase = SessionPhase::Completed;
        }
    }

    /// Move back one question; a no-op at the first.
    pub fn retreat(&mut self) {
        if self.phase == SessionPhase::InProgress {
            self.current = self.current.saturating_sub(1);
        }
    }

    /// Reset to the first question with all answers cleared.
    pub fn restart(&mut self) {
        self.current = 0;
        self.answers.clear();
        self.phase = SessionPhase::InProgress;
    }

    /// Count of questions whose captured answer equals the stored one.
    pub fn score(&self) -> usize {
        self.quiz
            .questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                self.answers.get(index).map(String::as_str) == Some(question.correct_answer.as_str())
            })
            .count()
    }

    /// Full per-question breakdown, meaningful once the session completes.
    pub fn results(&self) -> SessionResults {
        let breakdown: Vec<QuestionResult> = self
            .quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let submitted = self.answers.get(&index).cloned();
                let is_correct = submitted.as_deref() == Some(question.correct_answer.as_str());
                QuestionResult {
                    index,
                    submitted,
                    correct_answer: question.correct_answer.clone(),
                    is_correct,
                }
            })
            .collect();

        SessionResults {
            correct: breakdown.iter().filter(|r| r.is_correct).count(),
            total: self.quiz.questions.len(),
            breakdown,
        }
    }
}
