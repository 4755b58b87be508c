use crate::common::{
    post_generate, spawn_app, spawn_app_with_model_output, spawn_app_with_upstream_status,
    VALID_CONTENT,
};

mod common;

#[tokio::test]
async fn content_of_49_characters_is_rejected() {
    let app = spawn_app().await;

    let response = post_generate(&app, &"x".repeat(49), "multiple-choice", 2).await;

    assert_eq!(400, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().contains("too short"));
}

#[tokio::test]
async fn content_of_50_characters_is_accepted() {
    let app = spawn_app().await;

    let response = post_generate(&app, &"x".repeat(50), "multiple-choice", 2).await;

    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn missing_content_is_rejected() {
    let app = spawn_app().await;

    let form = reqwest::multipart::Form::new()
        .text("quizType", "multiple-choice")
        .text("numberOfQuestions", "3");
    let response = app
        .api_client
        .post(format!("{}/api/quiz/generate", &app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("PDF file or text content"));
}

#[tokio::test]
async fn whitespace_only_text_counts_as_missing() {
    let app = spawn_app().await;

    let response = post_generate(&app, "   \n\t  ", "multiple-choice", 3).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn missing_quiz_type_is_rejected() {
    let app = spawn_app().await;

    let form = reqwest::multipart::Form::new()
        .text("text", VALID_CONTENT.to_string())
        .text("numberOfQuestions", "3");
    let response = app
        .api_client
        .post(format!("{}/api/quiz/generate", &app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn unknown_quiz_type_is_rejected() {
    let app = spawn_app().await;

    let response = post_generate(&app, VALID_CONTENT, "essay", 3).await;

    assert_eq!(400, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().contains("essay"));
}

#[tokio::test]
async fn question_count_defaults_when_absent() {
    let app = spawn_app().await;

    let form = reqwest::multipart::Form::new()
        .text("text", VALID_CONTENT.to_string())
        .text("quizType", "multiple-choice");
    let response = app
        .api_client
        .post(format!("{}/api/quiz/generate", &app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn out_of_range_question_count_is_rejected() {
    let app = spawn_app().await;

    let response = post_generate(&app, VALID_CONTENT, "multiple-choice", 0).await;
    assert_eq!(400, response.status().as_u16());

    let response = post_generate(&app, VALID_CONTENT, "multiple-choice", 21).await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn non_pdf_upload_is_rejected() {
    let app = spawn_app().await;

    let part = reqwest::multipart::Part::bytes(b"plain text file".to_vec())
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .part("pdf", part)
        .text("quizType", "multiple-choice")
        .text("numberOfQuestions", "3");

    let response = app
        .api_client
        .post(format!("{}/api/quiz/generate", &app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["error"], "Only PDF files are supported");
}

#[tokio::test]
async fn unreadable_pdf_reports_extraction_failure() {
    let app = spawn_app().await;

    let part = reqwest::multipart::Part::bytes(b"not actually a pdf".to_vec())
        .file_name("garbage.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .part("pdf", part)
        .text("quizType", "multiple-choice")
        .text("numberOfQuestions", "3");

    let response = app
        .api_client
        .post(format!("{}/api/quiz/generate", &app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Failed to extract text from PDF"));
}

#[tokio::test]
async fn model_output_without_json_is_a_generation_failure() {
    let app = spawn_app_with_model_output("I cannot help with that.".to_string()).await;

    let response = post_generate(&app, VALID_CONTENT, "multiple-choice", 2).await;

    assert_eq!(500, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["error"], "Failed to generate quiz with AI");
}

#[tokio::test]
async fn empty_question_list_is_a_generation_failure() {
    let output = serde_json::json!({ "title": "Empty", "questions": [] }).to_string();
    let app = spawn_app_with_model_output(output).await;

    let response = post_generate(&app, VALID_CONTENT, "mixed", 2).await;

    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn json_wrapped_in_prose_is_recovered() {
    let output = format!(
        "Here is your quiz:\n```json\n{}\n```\nGood luck!",
        common::default_model_output()
    );
    let app = spawn_app_with_model_output(output).await;

    let response = post_generate(&app, VALID_CONTENT, "multiple-choice", 2).await;

    assert_eq!(201, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["questions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn answer_outside_options_is_a_generation_failure() {
    let output = serde_json::json!({
        "title": "Broken",
        "questions": [
            {
                "question": "Pick one",
                "options": ["a", "b", "c", "d"],
                "correctAnswer": "e"
            }
        ]
    })
    .to_string();
    let app = spawn_app_with_model_output(output).await;

    let response = post_generate(&app, VALID_CONTENT, "multiple-choice", 1).await;

    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn wrong_option_count_fails_multiple_choice() {
    let output = serde_json::json!({
        "questions": [
            {
                "question": "Pick one",
                "options": ["a", "b"],
                "correctAnswer": "a"
            }
        ]
    })
    .to_string();
    let app = spawn_app_with_model_output(output).await;

    let response = post_generate(&app, VALID_CONTENT, "multiple-choice", 1).await;

    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn missing_title_falls_back_to_generic_label() {
    let output = serde_json::json!({
        "questions": [
            {
                "question": "Statement holds?",
                "options": ["True", "False"],
                "correctAnswer": "True"
            }
        ]
    })
    .to_string();
    let app = spawn_app_with_model_output(output).await;

    let response = post_generate(&app, VALID_CONTENT, "true-false", 1).await;

    assert_eq!(201, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["title"], "Generated Quiz");
}

#[tokio::test]
async fn upstream_auth_failure_reports_unavailable_service() {
    let app = spawn_app_with_upstream_status(401).await;

    let response = post_generate(&app, VALID_CONTENT, "multiple-choice", 2).await;

    assert_eq!(500, response.status().as_u16());
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        json["error"],
        "AI service is unavailable. Please check your API key."
    );
}

#[tokio::test]
async fn failed_generation_persists_nothing() {
    let app = spawn_app_with_model_output("no json here".to_string()).await;

    let response = post_generate(&app, VALID_CONTENT, "multiple-choice", 2).await;
    assert_eq!(500, response.status().as_u16());

    let listed: serde_json::Value = app
        .api_client
        .get(format!("{}/api/quiz", &app.address))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}
