//! Client for the hosted completion endpoint plus the parsing and validation
//! applied to its output. The generator is not trusted to follow the schema
//! in the instruction, so everything it returns is re-checked here.

use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::models::{Question, QuizFormat};
use crate::prompt;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 2000;

/// What the model is asked to produce: a title and a question list using the
/// same wire names as [`Question`].
#[derive(Debug, Deserialize)]
pub struct GeneratedQuiz {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn new(endpoint: String, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
        }
    }

    /// Submit one generation request and return a validated question set.
    ///
    /// A single attempt per caller request; failures surface immediately and
    /// are never retried here.
    pub async fn generate(
        &self,
        content: &str,
        format: QuizFormat,
        question_count: u32,
    ) -> Result<GeneratedQuiz, ApiError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt::system_prompt(format) },
                { "role": "user", "content": prompt::build_prompt(format, question_count, content) }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Completion endpoint unreachable: {}", e);
                ApiError::UpstreamUnavailable
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 || status.as_u16() == 429
            || status.is_server_error()
        {
            log::error!("Completion endpoint returned {}", status);
            return Err(ApiError::UpstreamUnavailable);
        }
        if !status.is_success() {
            return Err(ApiError::GenerationFailed(format!(
                "completion endpoint returned {}",
                status
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ApiError::GenerationFailed(format!("malformed completion body: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ApiError::GenerationFailed("completion had no choices".to_string()))?;

        let quiz = parse_quiz_payload(&content)?;
        validate_quiz(&quiz, format)?;

        log::info!("Generated {} {} questions", quiz.questions.len(), format);
        Ok(quiz)
    }
}

/// Extract a [`GeneratedQuiz`] from loosely formatted model output.
///
/// Strict decode of the whole message first; on failure, the first balanced
/// `{...}` span is decoded instead. Anything else is `GenerationFailed`.
pub fn parse_quiz_payload(raw: &str) -> Result<GeneratedQuiz, ApiError> {
    if let Ok(quiz) = serde_json::from_str::<GeneratedQuiz>(raw.trim()) {
        return Ok(quiz);
    }

    let span = balanced_json_span(raw).ok_or_else(|| {
        ApiError::GenerationFailed("no JSON object in model output".to_string())
    })?;

    serde_json::from_str(span)
        .map_err(|e| ApiError::GenerationFailed(format!("invalid JSON in model output: {}", e)))
}

/// First balanced `{...}` span in `raw`, tracking string literals so braces
/// inside question text do not terminate the scan early.
fn balanced_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in raw[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + idx + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Post-parse validation, enforced regardless of what the instruction asked
/// for. Multiple-choice quizzes get the full cardinality check; `mixed`
/// sub-questions stay loose apart from answer membership.
pub fn validate_quiz(quiz: &GeneratedQuiz, format: QuizFormat) -> Result<(), ApiError> {
    if quiz.questions.is_empty() {
        return Err(ApiError::GenerationFailed(
            "model returned no questions".to_string(),
        ));
    }

    for (index, question) in quiz.questions.iter().enumerate() {
        if question.text.trim().is_empty() {
            return Err(ApiError::GenerationFailed(format!(
                "question {} has no text",
                index
            )));
        }
        if question.correct_answer.trim().is_empty() {
            return Err(ApiError::GenerationFailed(format!(
                "question {} has no correct answer",
                index
            )));
        }
        if format == QuizFormat::MultipleChoice && question.options.len() != 4 {
            return Err(ApiError::GenerationFailed(format!(
                "question {} has {} options, expected 4",
                index,
                question.options.len()
            )));
        }
        if !question.options.is_empty()
            && !question.options.iter().any(|o| o == &question.correct_answer)
        {
            return Err(ApiError::GenerationFailed(format!(
                "question {} answer is not among its options",
                index
            )));
        }
    }

    Ok(())
}
