use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::gemini::{chat_body, first_text, json_body, GeminiClient, MIN_KEY_LEN};

pub const CHAT_KEY_MISSING: &str =
    "Gemini API key not configured. Please set GEMINI_API_KEY environment variable.";
pub const IDEA_KEY_MISSING: &str = "Gemini API key not configured";
pub const CHAT_FALLBACK: &str = "I'm having a bit of trouble connecting right now. Try again?";

const PERSONA: &str = "You are the AI portfolio assistant for \"Dolraj Bashyal\" (handle: dols30).

Profile:
- Role: Computer Science Student & Developer
- Bio: Builds elegant, efficient and user-friendly applications for real-world problems.
- Main Skills: React, Next.js, Node.js, TypeScript, Tailwind CSS, C++, C#, Python, .NET MAUI, MySQL.
- Experience: Computer Science student at The University of Southern Mississippi, minor in Mathematics, Econ & Data Analysis. 10+ projects, 4.0 CGPA, 3+ years of experience.
- Personality: Professional, enthusiastic, slightly witty and helpful.

Answer questions from recruiters or visitors about Dolraj using this profile.
For contact details point them to the Contact tab or bashyal.dolraj30@gmail.com.
Keep answers concise, usually under 3 sentences.";

const IDEA_PROMPT: &str = "Generate a unique, creative, and modern coding project idea that uses React, Tailwind CSS, and Node.js. Provide a catchy title, a 1-sentence tagline, and 3 key technical features. Format the response as JSON with keys: title, tagline, features (array of strings).";

pub struct AppState {
    pub config: ApiConfig,
    pub gemini: GeminiClient,
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);
    let static_dir = state.config.static_dir.clone();

    let api = Router::new()
        .route(
            "/api",
            get(health)
                .post(health_post)
                .options(preflight)
                .fallback(health_method_not_allowed),
        )
        .route(
            "/api/chat",
            post(chat).options(preflight).fallback(method_not_allowed),
        )
        .route(
            "/api/generate-idea",
            post(generate_idea).options(preflight).fallback(method_not_allowed),
        )
        .route(
            "/api/contact",
            post(contact).options(preflight).fallback(method_not_allowed),
        )
        .with_state(state);

    let app = match static_dir {
        Some(dir) => {
            // SPA: unknown paths get the shell so client-side anchors resolve
            let index = ServeFile::new(dir.join("index.html"));
            api.fallback_service(ServeDir::new(dir).not_found_service(index))
        }
        None => api,
    };

    app.layer(cors).layer(TraceLayer::new_for_http())
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

async fn health() -> Json<Value> {
    Json(json!({ "message": "API is working!" }))
}

async fn health_post() -> Json<Value> {
    Json(json!({ "message": "POST request received" }))
}

async fn health_method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub success: bool,
    pub message: String,
}

async fn chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    // Missing configuration wins over a bad request body.
    let api_key = state
        .config
        .gemini_api_key
        .as_deref()
        .ok_or_else(|| ApiError::internal(CHAT_KEY_MISSING))?;
    let Json(request) = payload?;
    let message = required(&request.message).ok_or_else(|| ApiError::bad_request("Message is required"))?;
    if api_key.len() < MIN_KEY_LEN {
        return Err(ApiError::internal("Invalid API key format"));
    }

    tracing::info!(model = %state.gemini.model(), "chat request");
    let data = state.gemini.generate(api_key, &chat_body(PERSONA, message)).await?;
    let reply = first_text(&data).unwrap_or(CHAT_FALLBACK);
    Ok(Json(ChatReply { success: true, message: reply.to_string() }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdea {
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct IdeaReply {
    pub success: bool,
    pub idea: ProjectIdea,
}

async fn generate_idea(State(state): State<SharedState>) -> Result<Json<IdeaReply>, ApiError> {
    let api_key = state
        .config
        .gemini_api_key
        .as_deref()
        .ok_or_else(|| ApiError::internal(IDEA_KEY_MISSING))?;

    let data = state.gemini.generate(api_key, &json_body(IDEA_PROMPT)).await?;
    let idea = first_text(&data)
        .and_then(|text| serde_json::from_str::<ProjectIdea>(text).ok())
        .ok_or_else(|| ApiError::internal("Failed to generate project idea"))?;
    tracing::info!(title = %idea.title, "generated project idea");
    Ok(Json(IdeaReply { success: true, idea }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

async fn contact(payload: Result<Json<ContactRequest>, JsonRejection>) -> Result<Json<Value>, ApiError> {
    let Json(form) = payload?;
    let (Some(name), Some(email), Some(subject), Some(message)) = (
        required(&form.name),
        required(&form.email),
        required(&form.subject),
        required(&form.message),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    // Logged only; there is no mail transport.
    tracing::info!(name, email, subject, message, "contact form submission");
    Ok(Json(json!({ "success": true, "message": "Message received successfully!" })))
}

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    const TEST_KEY: &str = "test-key-0123456789abcdef";

    async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    /// Stand-in for Gemini answering every request with `body`.
    async fn fake_gemini(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().fallback(move || async move { (status, body) });
        format!("http://{}", spawn(app).await)
    }

    async fn api(key: Option<&str>, upstream: &str) -> String {
        let config = ApiConfig {
            gemini_api_key: key.map(str::to_string),
            gemini_api_base: upstream.to_string(),
            ..ApiConfig::default()
        };
        let gemini = GeminiClient::new(&config.gemini_api_base, &config.gemini_model).unwrap();
        let addr = spawn(router(Arc::new(AppState { config, gemini }))).await;
        format!("http://{}", addr)
    }

    async fn post_json(url: String, body: Value) -> (StatusCode, Value) {
        let response = reqwest::Client::new().post(url).json(&body).send().await.unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn contact_requires_every_field() {
        let base = api(None, "http://127.0.0.1:9").await;
        let (status, body) = post_json(
            format!("{}/api/contact", base),
            json!({ "name": "Ada", "email": "ada@example.com", "subject": "", "message": "hi" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "message": "All fields are required" }));
    }

    #[tokio::test]
    async fn contact_accepts_complete_form() {
        let base = api(None, "http://127.0.0.1:9").await;
        let (status, body) = post_json(
            format!("{}/api/contact", base),
            json!({ "name": "Ada", "email": "ada@example.com", "subject": "Hello", "message": "hi" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Message received successfully!");
    }

    #[tokio::test]
    async fn chat_without_key_reports_configuration_first() {
        let base = api(None, "http://127.0.0.1:9").await;
        let (status, body) = post_json(format!("{}/api/chat", base), json!({})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "message": CHAT_KEY_MISSING }));
    }

    #[tokio::test]
    async fn chat_requires_a_message() {
        let base = api(Some(TEST_KEY), "http://127.0.0.1:9").await;
        let (status, body) = post_json(format!("{}/api/chat", base), json!({ "message": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Message is required");
    }

    #[tokio::test]
    async fn short_key_is_rejected_before_calling_upstream() {
        let base = api(Some("short"), "http://127.0.0.1:9").await;
        let (status, body) = post_json(format!("{}/api/chat", base), json!({ "message": "hi" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Invalid API key format");
    }

    #[tokio::test]
    async fn chat_returns_first_candidate_text() {
        let upstream = fake_gemini(
            StatusCode::OK,
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi, I'm the assistant."}]}}]}"#,
        )
        .await;
        let base = api(Some(TEST_KEY), &upstream).await;
        let (status, body) = post_json(format!("{}/api/chat", base), json!({ "message": "hello" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "message": "Hi, I'm the assistant." }));
    }

    #[tokio::test]
    async fn chat_falls_back_when_candidate_has_no_text() {
        let upstream = fake_gemini(StatusCode::OK, r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).await;
        let base = api(Some(TEST_KEY), &upstream).await;
        let (status, body) = post_json(format!("{}/api/chat", base), json!({ "message": "hello" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], CHAT_FALLBACK);
    }

    #[tokio::test]
    async fn upstream_html_is_reported_as_non_json() {
        let upstream = fake_gemini(StatusCode::BAD_GATEWAY, "<html>oops</html>").await;
        let base = api(Some(TEST_KEY), &upstream).await;
        let (status, body) = post_json(format!("{}/api/chat", base), json!({ "message": "hello" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "API returned non-JSON response (Status: 502)");
    }

    #[tokio::test]
    async fn upstream_error_message_reaches_the_client() {
        let upstream = fake_gemini(
            StatusCode::FORBIDDEN,
            r#"{"error":{"code":403,"message":"API key not valid."}}"#,
        )
        .await;
        let base = api(Some(TEST_KEY), &upstream).await;
        let (status, body) = post_json(format!("{}/api/chat", base), json!({ "message": "hello" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "API key not valid.");
    }

    #[tokio::test]
    async fn idea_is_parsed_from_candidate_json() {
        let upstream = fake_gemini(
            StatusCode::OK,
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"title\":\"Orbit\",\"tagline\":\"Skills in space\",\"features\":[\"a\",\"b\",\"c\"]}"}]}}]}"#,
        )
        .await;
        let base = api(Some(TEST_KEY), &upstream).await;
        let (status, body) = post_json(format!("{}/api/generate-idea", base), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["idea"]["title"], "Orbit");
        assert_eq!(body["idea"]["features"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn idea_without_key_is_a_server_error() {
        let base = api(None, "http://127.0.0.1:9").await;
        let (status, body) = post_json(format!("{}/api/generate-idea", base), json!({})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], IDEA_KEY_MISSING);
    }

    #[tokio::test]
    async fn wrong_method_and_preflight() {
        let base = api(None, "http://127.0.0.1:9").await;
        let client = reqwest::Client::new();

        let response = client.get(format!("{}/api/chat", base)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 405);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "success": false, "message": "Method not allowed" }));

        let response = client
            .request(reqwest::Method::OPTIONS, format!("{}/api/contact", base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn health_check_and_cors_header() {
        let base = api(None, "http://127.0.0.1:9").await;
        let response = reqwest::Client::new()
            .get(format!("{}/api", base))
            .header("Origin", "https://example.com")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let origin = response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert_eq!(origin.as_deref(), Some("*"));
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "API is working!");
    }

    #[tokio::test]
    async fn malformed_json_gets_a_structured_error() {
        let base = api(None, "http://127.0.0.1:9").await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/contact", base))
            .header("Content-Type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}
