pub mod assist;
pub mod health;
pub mod profile;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .route("/api/v1/profile/:lang", get(profile::handle_get_localized))
        .route(
            "/api/v1/profile/:lang/experience",
            get(profile::handle_get_experience),
        )
        .route(
            "/api/v1/profile/:lang/experience/tags",
            get(profile::handle_get_experience_tags),
        )
        .route("/api/v1/assist", post(assist::handle_assist))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::credentials::StaticCredential;
    use crate::assistant::generator::{
        GenerationError, GenerationRequest, GeneratorFactory, TextGenerator,
    };
    use crate::assistant::AssistantGateway;
    use crate::config::AssistantConfig;
    use crate::models::fallback::fallback_profile;
    use crate::profile::ProfileOrigin;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            Ok(format!("echo: {}", request.query))
        }
    }

    impl GeneratorFactory for Echo {
        fn connect(&self, _api_key: &str) -> Arc<dyn TextGenerator> {
            Arc::new(Echo)
        }
    }

    fn app(api_key: Option<&str>) -> Router {
        let profile = fallback_profile();
        let assistant = AssistantGateway::new(
            &AssistantConfig::default(),
            profile.clone(),
            Arc::new(StaticCredential(api_key.map(str::to_string))),
            Arc::new(Echo),
        );
        build_router(AppState {
            profile,
            profile_origin: ProfileOrigin::Disabled,
            assistant,
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_origin_and_assistant_state() {
        let (status, body) = send(app(None), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["profile_origin"], "disabled");
        assert_eq!(body["assistant_online"], false);
    }

    #[tokio::test]
    async fn test_full_profile_uses_camel_case_shape() {
        let (status, body) = send(app(None), get("/api/v1/profile")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], fallback_profile().email);
        assert!(body["cvUrl"].is_string());
        assert!(body["content"]["en"]["avatarUrl"].is_string());
        assert!(body["content"]["ar"].is_object());
    }

    #[tokio::test]
    async fn test_localized_profile() {
        let (status, body) = send(app(None), get("/api/v1/profile/ar")).await;
        assert_eq!(status, StatusCode::OK);
        let data = fallback_profile();
        let expected = &data.content[&crate::models::profile::Language::Ar];
        assert_eq!(body["name"], expected.name.as_str());
        assert_eq!(body["language"], "ar");
        assert_eq!(body["direction"], "rtl");
    }

    #[tokio::test]
    async fn test_experience_tags() {
        let (status, body) = send(app(None), get("/api/v1/profile/en/experience/tags")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["IT Specialist", "Information Security Architect"]));
    }

    #[tokio::test]
    async fn test_unknown_language_is_rejected() {
        let (status, body) = send(app(None), get("/api/v1/profile/fr")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_experience_filter_by_tag() {
        let (status, body) = send(
            app(None),
            get("/api/v1/profile/en/experience?tag=Information%20Security%20Architect"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["id"], "exp1");

        let (_, body) = send(app(None), get("/api/v1/profile/en/experience")).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_assist_forwards_query() {
        let (status, body) = send(
            app(Some("key")),
            post_json("/api/v1/assist", json!({"query": "Hello", "language": "en"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "echo: Hello");
    }

    #[tokio::test]
    async fn test_assist_without_key_replies_offline() {
        let (status, body) = send(
            app(None),
            post_json("/api/v1/assist", json!({"query": "Hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["reply"],
            crate::assistant::prompts::offline_message(crate::models::profile::Language::En)
        );
    }

    #[tokio::test]
    async fn test_assist_rejects_unknown_language_as_validation_error() {
        let (status, body) = send(
            app(Some("key")),
            post_json("/api/v1/assist", json!({"query": "hi", "language": "fr"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_assist_accepts_uppercase_language_code() {
        let (status, body) = send(
            app(Some("key")),
            post_json("/api/v1/assist", json!({"query": "hi", "language": "EN"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "echo: hi");
    }

    #[tokio::test]
    async fn test_assist_rejects_blank_query() {
        let (status, _) = send(
            app(Some("key")),
            post_json("/api/v1/assist", json!({"query": "   ", "language": "ar"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
