use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// The question-style category of a quiz, fixed at creation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuizFormat {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Mixed,
}

impl QuizFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizFormat::MultipleChoice => "multiple-choice",
            QuizFormat::TrueFalse => "true-false",
            QuizFormat::ShortAnswer => "short-answer",
            QuizFormat::Mixed => "mixed",
        }
    }
}

impl fmt::Display for QuizFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple-choice" => Ok(QuizFormat::MultipleChoice),
            "true-false" => Ok(QuizFormat::TrueFalse),
            "short-answer" => Ok(QuizFormat::ShortAnswer),
            "mixed" => Ok(QuizFormat::Mixed),
            other => Err(format!("Unsupported quiz type: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    /// 4 entries for multiple-choice, ["True","False"] for true/false,
    /// empty for short-answer.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "quizType")]
    pub quiz_type: QuizFormat,
    pub questions: Vec<Question>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A fully validated quiz payload, ready for the store to assign an
/// identity and timestamp. Only the generation pipeline constructs these.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub quiz_type: QuizFormat,
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuizzesFilter {
    #[serde(rename = "type")]
    pub quiz_type: Option<QuizFormat>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuizStats {
    pub total: i64,
    #[serde(rename = "byType")]
    pub by_type: HashMap<String, i64>,
    #[serde(rename = "lastCreated")]
    pub last_created: Option<LastCreated>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LastCreated {
    pub title: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
    pub quiz: Quiz,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_format_round_trips_through_strings() {
        for format in [
            QuizFormat::MultipleChoice,
            QuizFormat::TrueFalse,
            QuizFormat::ShortAnswer,
            QuizFormat::Mixed,
        ] {
            assert_eq!(format.as_str().parse::<QuizFormat>(), Ok(format));
        }
        assert!("essay".parse::<QuizFormat>().is_err());
    }

    #[test]
    fn quiz_serializes_with_wire_field_names() {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            title: "Sample".to_string(),
            quiz_type: QuizFormat::TrueFalse,
            questions: vec![Question {
                text: "The sky is green.".to_string(),
                options: vec!["True".to_string(), "False".to_string()],
                correct_answer: "False".to_string(),
                explanation: None,
            }],
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&quiz).unwrap();
        assert_eq!(json["quizType"], "true-false");
        assert_eq!(json["questions"][0]["question"], "The sky is green.");
        assert_eq!(json["questions"][0]["correctAnswer"], "False");
        assert!(json["createdAt"].is_string());
        assert!(json["questions"][0].get("explanation").is_none());
    }
}
