use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde_json::json;

use crate::error::RelayError;
use crate::model::slots::model_table;
use crate::model::ModelSlot;
use crate::web::models::{ApiKeyRequest, ChatRequest};
use crate::AppState;

// Liveness message
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "Dual LLM Chat API is running" }))
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn models() -> impl Responder {
    HttpResponse::Ok().json(model_table())
}

pub async fn set_api_key(
    data: web::Data<AppState>,
    req: web::Json<ApiKeyRequest>,
) -> impl Responder {
    info!("Received new API key");
    let result = data.relay.set_api_key(&req.api_key).await;
    HttpResponse::Ok().json(result)
}

pub async fn api_key_status(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.relay.api_key_status())
}

// Chat endpoint, slot taken from the path
pub async fn query(
    data: web::Data<AppState>,
    slot: web::Path<String>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, RelayError> {
    let slot: ModelSlot = slot.parse()?;
    run_query(&data, slot, req.into_inner()).await
}

pub async fn query_llm1(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, RelayError> {
    run_query(&data, ModelSlot::First, req.into_inner()).await
}

pub async fn query_llm2(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, RelayError> {
    run_query(&data, ModelSlot::Second, req.into_inner()).await
}

async fn run_query(
    data: &AppState,
    slot: ModelSlot,
    request: ChatRequest,
) -> Result<HttpResponse, RelayError> {
    let response = data.relay.query(slot, request).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn not_found() -> Result<HttpResponse, RelayError> {
    Err(RelayError::UnknownRoute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::web::{recover, routes};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state(server: &MockServer, key: &str) -> web::Data<AppState> {
        web::Data::new(AppState::new(&Config::for_upstream(&server.uri(), key)).unwrap())
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap_fn(|req, srv| recover::catch_panic(req, srv))
                    .app_data($state)
                    .configure(routes::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_index_and_models() {
        let server = MockServer::start().await;
        let app = app!(state(&server, ""));

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Dual LLM Chat API is running");

        let req = test::TestRequest::get().uri("/api/models").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["llm1"]["id"], "gemini-2.0-pro-exp-02-05");
        assert_eq!(body["llm2"]["internal_id"], "llm2");
        assert_eq!(body["llm2"]["name"], "Gemini 2.0 Flash Thinking Experimental");
    }

    #[actix_web::test]
    async fn test_query_first_slot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "Hi there" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = app!(state(&server, "k"));

        let req = test::TestRequest::post()
            .uri("/api/query/first")
            .set_json(serde_json::json!({ "prompt": "Hello", "messages": [] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["content"], "Hi there");
        assert_eq!(body["model"], "gemini-2.0-pro-exp-02-05");
        assert!(body["usage"]["total_tokens"].as_u64().unwrap() > 0);
    }

    #[actix_web::test]
    async fn test_gemini_style_history_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "later" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = app!(state(&server, "k"));

        let req = test::TestRequest::post()
            .uri("/api/llm1")
            .set_json(serde_json::json!({
                "prompt": "continue",
                "messages": [
                    { "role": "model", "content": "earlier" },
                    { "role": "function", "content": "result" }
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["content"], "later");

        let requests = server.received_requests().await.unwrap();
        let sent: Value = requests[0].body_json().unwrap();
        assert_eq!(sent["contents"][1]["role"], "model");
        assert_eq!(sent["contents"][1]["parts"][0]["text"], "earlier");
        assert_eq!(sent["contents"][2]["role"], "model");
        assert_eq!(sent["contents"][3]["role"], "user");
    }

    #[actix_web::test]
    async fn test_query_without_key_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let app = app!(state(&server, ""));

        let req = test::TestRequest::post()
            .uri("/api/llm2")
            .set_json(serde_json::json!({ "prompt": "Hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["detail"],
            "API key is not set. Please set your Google API key in settings."
        );
    }

    #[actix_web::test]
    async fn test_upstream_timeout_maps_to_gateway_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(2)),
            )
            .mount(&server)
            .await;
        let mut config = Config::for_upstream(&server.uri(), "k");
        config.request_timeout = std::time::Duration::from_millis(200);
        let app = app!(web::Data::new(AppState::new(&config).unwrap()));

        let req = test::TestRequest::post()
            .uri("/api/llm1")
            .set_json(serde_json::json!({ "prompt": "Hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[actix_web::test]
    async fn test_unknown_slot_and_route() {
        let server = MockServer::start().await;
        let app = app!(state(&server, "k"));

        let req = test::TestRequest::post()
            .uri("/api/query/third")
            .set_json(serde_json::json!({ "prompt": "Hello" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Unknown model slot: third");

        let req = test::TestRequest::get().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let server = MockServer::start().await;
        let app = app!(state(&server, "k"));

        let req = test::TestRequest::post()
            .uri("/api/query/first")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"prompt\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid request: "));
    }

    #[actix_web::test]
    async fn test_api_key_roundtrip_through_routes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(1)
            .mount(&server)
            .await;
        let app = app!(state(&server, ""));

        let req = test::TestRequest::post()
            .uri("/api/set-api-key")
            .set_json(serde_json::json!({ "api_key": "nope" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], false);

        let req = test::TestRequest::get().uri("/api/api-key-status").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["is_set"], false);
    }
}
