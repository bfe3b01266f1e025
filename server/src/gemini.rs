//! Thin client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use serde_json::{json, Value};

use crate::error::ApiError;

pub const MIN_KEY_LEN: usize = 20;

/// How much of a non-JSON upstream body goes to the log.
const LOG_SNIPPET: usize = 1000;

#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base: &str, model: &str) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base, self.model)
    }

    /// POST `body` and return the decoded response once it carries a candidate.
    pub async fn generate(&self, api_key: &str, body: &Value) -> Result<Value, ApiError> {
        tracing::debug!(model = %self.model, "calling gemini");
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::internal(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::internal(format!("Failed to read body: {}", e.without_url())))?;
        tracing::debug!(status = status.as_u16(), "gemini responded");
        interpret_response(status.as_u16(), status.is_success(), &text)
    }
}

/// Classify an upstream reply. Pure so the error mapping can be tested
/// without a network.
pub fn interpret_response(status: u16, ok: bool, text: &str) -> Result<Value, ApiError> {
    let data: Value = match serde_json::from_str(text) {
        Ok(data) => data,
        Err(_) => {
            let snippet: String = text.chars().take(LOG_SNIPPET).collect();
            tracing::error!(status, body = %snippet, "gemini returned non-JSON");
            return Err(ApiError::internal(format!(
                "API returned non-JSON response (Status: {})",
                status
            )));
        }
    };

    if !ok {
        tracing::error!(status, response = %data, "gemini error response");
        let message = data
            .pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| data.get("message").and_then(Value::as_str))
            .filter(|m| !m.is_empty())
            .unwrap_or("Gemini API error");
        return Err(ApiError::internal(message));
    }

    if data.pointer("/candidates/0/content").map_or(true, Value::is_null) {
        tracing::error!(response = %data, "unexpected gemini response shape");
        return Err(ApiError::internal("Unexpected response format from API"));
    }
    Ok(data)
}

/// Text of the first part of the first candidate, if any.
pub fn first_text(data: &Value) -> Option<&str> {
    data.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

pub fn chat_body(system_instruction: &str, message: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": format!("{}\n\nUser Question: {}", system_instruction, message) }]
        }]
    })
}

pub fn json_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": { "responseMimeType": "application/json" }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn html_error_page_is_reported_with_status() {
        let err = interpret_response(502, false, "<html>Bad gateway</html>").unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "API returned non-JSON response (Status: 502)");
    }

    #[test]
    fn upstream_error_message_is_passed_through() {
        let body = r#"{"error":{"code":400,"message":"API key not valid."}}"#;
        let err = interpret_response(400, false, body).unwrap_err();
        assert_eq!(err.message, "API key not valid.");

        let err = interpret_response(429, false, r#"{"message":"slow down"}"#).unwrap_err();
        assert_eq!(err.message, "slow down");

        let err = interpret_response(500, false, "{}").unwrap_err();
        assert_eq!(err.message, "Gemini API error");
    }

    #[test]
    fn missing_candidate_is_unexpected() {
        let err = interpret_response(200, true, r#"{"candidates":[]}"#).unwrap_err();
        assert_eq!(err.message, "Unexpected response format from API");
    }

    #[test]
    fn text_comes_from_first_part() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"hi"},{"text":"later"}]}}]}"#;
        let data = interpret_response(200, true, body).unwrap();
        assert_eq!(first_text(&data), Some("hi"));

        let empty = r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#;
        let data = interpret_response(200, true, empty).unwrap();
        assert_eq!(first_text(&data), None);
    }

    #[test]
    fn idea_request_asks_for_json() {
        let body = json_body("idea please");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let chat = chat_body("persona", "who are you?");
        assert_eq!(chat["contents"][0]["parts"][0]["text"], "persona\n\nUser Question: who are you?");
    }
}
