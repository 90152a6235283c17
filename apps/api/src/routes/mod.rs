pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::applications::handlers;
use crate::extraction::handlers as extraction;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Relay
        .route(
            "/api/claude",
            post(extraction::handle_relay).fallback(extraction::handle_method_not_allowed),
        )
        // Applications API
        .route(
            "/api/v1/applications",
            get(handlers::handle_list_applications).post(handlers::handle_create_application),
        )
        .route(
            "/api/v1/applications/parse",
            post(extraction::handle_parse),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(handlers::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id",
            delete(handlers::handle_delete_application),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm_client::LlmClient;
    use crate::models::application::NewApplication;
    use crate::store::memory::MemoryRecordStore;
    use crate::store::RecordStore;

    fn app(upstream: &str) -> (Router, Arc<MemoryRecordStore>) {
        let store = Arc::new(MemoryRecordStore::new());
        let state = AppState {
            store: store.clone(),
            llm: LlmClient::new("test-key".to_string(), upstream).unwrap(),
        };
        (build_router(state), store)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app("http://127.0.0.1:1");
        let response = app.oneshot(empty_request(Method::GET, "/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_relay_passes_upstream_body_through() {
        let server = MockServer::start().await;
        let upstream = json!({
            "id": "msg_42",
            "type": "message",
            "content": [{"type": "text", "text": "{\"company\":\"Acme\",\"position\":\"SWE\"}"}],
            "stop_reason": "end_turn"
        });
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let (app, _) = app(&server.uri());
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/claude",
                json!({"jobDescription": "Acme is hiring a SWE"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, upstream);

        let requests = server.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let prompt = sent["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains("Acme is hiring a SWE"));
    }

    #[tokio::test]
    async fn test_relay_upstream_failure_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let (app, _) = app(&server.uri());
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/claude",
                json!({"jobDescription": "anything"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Failed to process request");
    }

    #[tokio::test]
    async fn test_relay_rejects_get_with_405() {
        let (app, _) = app("http://127.0.0.1:1");
        let response = app
            .oneshot(empty_request(Method::GET, "/api/claude"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_parse_returns_normalized_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "{\"company\":\"Acme\",\"position\":\"SWE\",\"url\":None}"}]
            })))
            .mount(&server)
            .await;

        let (app, _) = app(&server.uri());
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/applications/parse",
                json!({"jobDescription": "Acme SWE"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "company": "Acme",
                "position": "SWE",
                "application_url": "",
                "application_id": ""
            })
        );
    }

    #[tokio::test]
    async fn test_parse_garbled_output_is_422() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "no json here"}]
            })))
            .mount(&server)
            .await;

        let (app, _) = app(&server.uri());
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/applications/parse",
                json!({"jobDescription": "x"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_application_crud_flow() {
        let (app, store) = app("http://127.0.0.1:1");
        let user_id = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/applications",
                json!({
                    "user_id": user_id,
                    "company": "Acme",
                    "position": "Engineer",
                    "referral_name": "Priya"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["status"], "applied");
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/api/v1/applications/{id}/status"),
                json!({"user_id": user_id, "status": "processing"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(empty_request(
                Method::GET,
                &format!("/api/v1/applications?user_id={user_id}&filter=processing&q=PRIYA"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed = body_json(response).await;
        assert_eq!(listed["applications"].as_array().unwrap().len(), 1);
        assert_eq!(listed["counts"]["all"], 1);
        assert_eq!(listed["counts"]["processing"], 1);

        let response = app
            .clone()
            .oneshot(empty_request(
                Method::DELETE,
                &format!("/api/v1/applications/{id}?user_id={user_id}"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_empty_position_is_400() {
        let (app, store) = app("http://127.0.0.1:1");
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/v1/applications",
                json!({"user_id": Uuid::new_v4(), "company": "Acme", "position": ""}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_of_another_users_record_is_404() {
        let (app, store) = app("http://127.0.0.1:1");
        let owner = Uuid::new_v4();
        let record = store
            .insert(NewApplication {
                user_id: owner,
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                status: Default::default(),
                referral_name: None,
                url: None,
                application_id: None,
            })
            .await
            .unwrap();

        let response = app
            .oneshot(empty_request(
                Method::DELETE,
                &format!("/api/v1/applications/{}?user_id={}", record.id, Uuid::new_v4()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_filter() {
        let (app, _) = app("http://127.0.0.1:1");
        let response = app
            .oneshot(empty_request(
                Method::GET,
                &format!("/api/v1/applications?user_id={}&filter=ghosted", Uuid::new_v4()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
