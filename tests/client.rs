use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::web::{self, Data};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::json;

use sharepay::client::{Client, MemoryTokenStore, RequestError, TokenStore};
use sharepay::types::request::Payload;
use sharepay::types::response::ResponseEnvelope;
use sharepay::types::token::TokenPair;

async fn login(body: web::Json<serde_json::Value>) -> HttpResponse {
    if body["email"] != "jane@example.com" || body["password"] != "s3cret" {
        return HttpResponse::Unauthorized().json(json!({
            "success": false,
            "message": "Bad credentials",
            "code": "AUTH_BAD_CREDENTIALS",
        }));
    }
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "ok",
        "data": {"accessToken": "A1", "refreshToken": "R1", "tokenType": "Bearer"},
    }))
}

async fn logout(body: web::Json<serde_json::Value>) -> HttpResponse {
    if body["refreshToken"] != "R1" {
        return HttpResponse::BadRequest().json(json!({
            "success": false,
            "message": "Missing refresh token",
            "code": "AUTH_MISSING_TOKEN",
        }));
    }
    HttpResponse::Ok().json(json!({"success": true, "message": "ok", "data": {}}))
}

// Same message/code as `rejected`, on a 2xx transport status.
async fn declined() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": false,
        "message": "Insufficient balance",
        "code": "WALLET_002",
    }))
}

async fn rejected() -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(json!({
        "success": false,
        "message": "Insufficient balance",
        "code": "WALLET_002",
    }))
}

async fn delete_app() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn busy() -> HttpResponse {
    HttpResponse::build(StatusCode::SERVICE_UNAVAILABLE)
        .content_type("text/plain")
        .body("busy")
}

async fn plain() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("pong")
}

async fn broken() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body("{not json")
}

async fn echo_auth(req: HttpRequest) -> HttpResponse {
    let auth = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "ok",
        "data": {"authorization": auth},
    }))
}

async fn public_link(req: HttpRequest) -> HttpResponse {
    // The public collection page must be fetched without credentials.
    if req.headers().contains_key("Authorization") {
        return HttpResponse::InternalServerError().json(json!({
            "success": false,
            "message": "Unexpected Authorization header",
        }));
    }
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "ok",
        "data": {"id": "pl_1", "title": "Coffee", "amountType": "fixed", "amountValue": 3.5, "currency": "EUR"},
    }))
}

async fn start_backend() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .app_data(Data::new(()))
            .route("/auth/login", web::post().to(login))
            .route("/auth/logout", web::post().to(logout))
            .route("/wallets/declined", web::get().to(declined))
            .route("/wallets/rejected", web::get().to(rejected))
            .route("/merchants/apps/app_1", web::delete().to(delete_app))
            .route("/busy", web::get().to(busy))
            .route("/plain", web::get().to(plain))
            .route("/broken", web::get().to(broken))
            .route("/echo-auth", web::get().to(echo_auth))
            .route(
                "/merchants/payment-links/public/tok1",
                web::get().to(public_link),
            )
    })
    .workers(1)
    .disable_signals()
    .bind("127.0.0.1:0")
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

fn pair() -> TokenPair {
    TokenPair {
        access_token: String::from("A1"),
        refresh_token: String::from("R1"),
        token_type: String::from("Bearer"),
    }
}

fn connect(base: &str) -> (Client, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    let client = Client::connect(base, store.clone()).unwrap();
    (client, store)
}

#[actix_web::test]
async fn failure_envelope_matches_transport_error_shape() {
    let base = start_backend().await;
    let (client, _) = connect(&base);

    let declined = client
        .request::<serde_json::Value>(Method::GET, "/wallets/declined", Payload::None)
        .await
        .unwrap_err();
    let rejected = client
        .request::<serde_json::Value>(Method::GET, "/wallets/rejected", Payload::None)
        .await
        .unwrap_err();

    let declined = match declined {
        RequestError::Api(err) => err,
        other => panic!("expected api error, got {other}"),
    };
    let rejected = match rejected {
        RequestError::Api(err) => err,
        other => panic!("expected api error, got {other}"),
    };

    // Same application failure, only the transport status differs.
    assert_eq!(declined.message, rejected.message);
    assert_eq!(declined.code, rejected.code);
    assert_eq!(declined.code.as_deref(), Some("WALLET_002"));
    assert_eq!(declined.status, 200);
    assert_eq!(rejected.status, 422);
}

#[actix_web::test]
async fn no_content_yields_empty_success_envelope() {
    let base = start_backend().await;
    let (client, _) = connect(&base);

    let resp: ResponseEnvelope<serde_json::Value> = client
        .request(Method::DELETE, "/merchants/apps/app_1", Payload::None)
        .await
        .unwrap();
    assert!(resp.success);
    assert!(resp.message.is_empty());
    assert!(resp.data.is_none());

    // And through the typed surface.
    client.delete_app("app_1").await.unwrap();
}

#[actix_web::test]
async fn plain_text_failure_gets_status_message() {
    let base = start_backend().await;
    let (client, _) = connect(&base);

    let err = client
        .request::<serde_json::Value>(Method::GET, "/busy", Payload::None)
        .await
        .unwrap_err();
    match err {
        RequestError::Api(err) => {
            assert_eq!(err.status, 503);
            assert_eq!(err.message, "Request failed (503)");
            assert!(err.code.is_none());
        }
        other => panic!("expected api error, got {other}"),
    }
}

#[actix_web::test]
async fn success_with_unknown_content_type_is_rejected() {
    let base = start_backend().await;
    let (client, _) = connect(&base);

    let err = client
        .request::<serde_json::Value>(Method::GET, "/plain", Payload::None)
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::Unexpected(_)));
}

#[actix_web::test]
async fn malformed_json_body_is_surfaced_raw() {
    let base = start_backend().await;
    let (client, _) = connect(&base);

    let err = client
        .request::<serde_json::Value>(Method::GET, "/broken", Payload::None)
        .await
        .unwrap_err();
    match err {
        RequestError::InvalidJson(raw) => assert_eq!(raw, "{not json"),
        other => panic!("expected invalid json error, got {other}"),
    }
}

#[actix_web::test]
async fn login_stores_pair_and_logout_clears_it() {
    let base = start_backend().await;
    let (client, store) = connect(&base);

    client
        .login("jane@example.com", "s3cret", false)
        .await
        .unwrap();
    assert_eq!(store.get().unwrap().unwrap(), pair());

    client.logout().await.unwrap();
    assert!(store.get().unwrap().is_none());
}

#[actix_web::test]
async fn bad_credentials_surface_status_and_code() {
    let base = start_backend().await;
    let (client, store) = connect(&base);

    let err = client
        .login("jane@example.com", "wrong", false)
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.code(), Some("AUTH_BAD_CREDENTIALS"));
    assert!(store.get().unwrap().is_none());
}

#[actix_web::test]
async fn caller_authorization_header_wins() {
    let base = start_backend().await;
    let (client, store) = connect(&base);
    store.set(pair(), false).unwrap();

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer custom"));
    let resp: ResponseEnvelope<serde_json::Value> = client
        .request_with_headers(Method::GET, "/echo-auth", Payload::None, headers)
        .await
        .unwrap();
    assert_eq!(resp.data.unwrap()["authorization"], "Bearer custom");

    // Without caller headers the stored token is attached.
    let resp: ResponseEnvelope<serde_json::Value> = client
        .request(Method::GET, "/echo-auth", Payload::None)
        .await
        .unwrap();
    assert_eq!(resp.data.unwrap()["authorization"], "Bearer A1");
}

#[actix_web::test]
async fn public_endpoints_send_no_credentials() {
    let base = start_backend().await;
    let (client, store) = connect(&base);
    store.set(pair(), false).unwrap();

    let link = client.get_public_payment_link("tok1").await.unwrap();
    assert_eq!(link.id, "pl_1");
    assert_eq!(link.title, "Coffee");
}
