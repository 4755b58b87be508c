//! Builds the instruction sent to the completion endpoint. Pure and
//! deterministic: same format, count and content always yield the same text.

use crate::models::QuizFormat;

/// Content prefix embedded in the instruction, to bound request size. This is
/// intentionally smaller than the 50k pre-generation cap applied upstream.
pub const CONTENT_PREFIX_CHARS: usize = 4000;

const MULTIPLE_CHOICE_STRUCTURE: &str = r#"{
  "title": "Quiz Title",
  "questions": [
    {
      "question": "Question text",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": "Option A",
      "explanation": "Brief explanation"
    }
  ]
}

IMPORTANT: Each question MUST have exactly 4 options. The correctAnswer must be one of the options."#;

const TRUE_FALSE_STRUCTURE: &str = r#"{
  "title": "Quiz Title",
  "questions": [
    {
      "question": "Statement to evaluate",
      "options": ["True", "False"],
      "correctAnswer": "True",
      "explanation": "Brief explanation"
    }
  ]
}

IMPORTANT: Each question MUST have exactly 2 options: "True" and "False". The correctAnswer must be either "True" or "False"."#;

const SHORT_ANSWER_STRUCTURE: &str = r#"{
  "title": "Quiz Title",
  "questions": [
    {
      "question": "Question requiring a short answer",
      "options": [],
      "correctAnswer": "Expected answer",
      "explanation": "Brief explanation"
    }
  ]
}

IMPORTANT: For short-answer questions, the options array should be EMPTY []. Only provide the correctAnswer as a brief text answer."#;

const MIXED_STRUCTURE: &str = r#"{
  "title": "Quiz Title",
  "questions": [
    {
      "question": "Multiple choice question",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": "Option A",
      "explanation": "Brief explanation"
    },
    {
      "question": "True or false statement",
      "options": ["True", "False"],
      "correctAnswer": "True",
      "explanation": "Brief explanation"
    },
    {
      "question": "Short answer question",
      "options": [],
      "correctAnswer": "Expected answer",
      "explanation": "Brief explanation"
    }
  ]
}

IMPORTANT: Mix different question types:
- Multiple choice: 4 options
- True/False: 2 options ("True", "False")
- Short answer: empty options array []
Include at least one question of each type when the question count allows."#;

fn structure_for(format: QuizFormat) -> &'static str {
    match format {
        QuizFormat::MultipleChoice => MULTIPLE_CHOICE_STRUCTURE,
        QuizFormat::TrueFalse => TRUE_FALSE_STRUCTURE,
        QuizFormat::ShortAnswer => SHORT_ANSWER_STRUCTURE,
        QuizFormat::Mixed => MIXED_STRUCTURE,
    }
}

pub fn system_prompt(format: QuizFormat) -> String {
    format!(
        "You are a quiz generator. Always respond with valid JSON only. \
         Follow the exact structure provided for {} questions.",
        format
    )
}

pub fn build_prompt(format: QuizFormat, question_count: u32, content: &str) -> String {
    let excerpt: String = content.chars().take(CONTENT_PREFIX_CHARS).collect();
    format!(
        "Generate a quiz with {} questions based on the following content. Return ONLY valid JSON.\n\n\
         JSON Structure:\n{}\n\n\
         Content to base questions on:\n{}",
        question_count,
        structure_for(format),
        excerpt
    )
}
