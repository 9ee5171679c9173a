mod common;

use chrono::{Duration, Utc};
use metrocasa_admin::services::tokens::TokenKeys;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

const SOME_ID: &str = "0b6f4a52-4c52-4d0e-9d7e-1a2b3c4d5e6f";

fn gated_routes() -> Vec<(Method, String, Option<Value>)> {
    vec![
        (Method::GET, "/api/users".into(), None),
        (
            Method::POST,
            "/api/users".into(),
            Some(json!({ "name": "Ana", "email": "ana@metrocasa.com.br", "cpf": "12345678909", "role": "designer" })),
        ),
        (Method::GET, format!("/api/users/{SOME_ID}"), None),
        (Method::PUT, format!("/api/users/{SOME_ID}"), Some(json!({ "metadata": { "phone": "11" } }))),
        (Method::GET, format!("/api/users/{SOME_ID}/properties"), None),
        (Method::GET, "/api/properties".into(), None),
        (Method::GET, "/api/properties/obras".into(), None),
        (Method::GET, format!("/api/properties/{SOME_ID}"), None),
        (
            Method::PUT,
            format!("/api/properties/{SOME_ID}"),
            Some(json!({ "project_evolution": { "project_percentage": 10 } })),
        ),
        (Method::GET, "/api/properties/tour".into(), None),
        (Method::GET, format!("/api/properties/tour/{SOME_ID}"), None),
        (Method::PUT, format!("/api/properties/tour/{SOME_ID}"), Some(json!({ "tour": "https://x" }))),
        (Method::GET, "/api/indicacao".into(), None),
        (Method::PATCH, format!("/api/indicacao/{SOME_ID}/status"), Some(json!({ "status": "approved" }))),
    ]
}

async fn call(app: &TestApp, method: Method, path: &str, body: Option<Value>, bearer: Option<&str>) -> reqwest::Response {
    let mut request = app.client.request(method, app.url(path));
    if let Some(token) = bearer {
        request = request.header("Authorization", format!("Bearer {token}"));
    }
    if let Some(body) = body {
        request = request.json(&body);
    }
    request.send().await.expect("requisição")
}

async fn assert_all_rejected(app: &TestApp, bearer: Option<&str>) {
    for (method, path, body) in gated_routes() {
        let response = call(app, method.clone(), &path, body, bearer).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {path} com token {bearer:?}"
        );
        let body: Value = response.json().await.expect("corpo JSON");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn missing_token_is_rejected_everywhere() {
    let app = spawn_app().await;
    assert_all_rejected(&app, None).await;

    let response = call(&app, Method::GET, "/api/users", None, None).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Token ausente");
}

#[tokio::test]
async fn malformed_tokens_are_rejected_everywhere() {
    let app = spawn_app().await;

    assert_all_rejected(&app, Some("not-a-token")).await;
    assert_all_rejected(&app, Some("a.b.c")).await;
    // Formato antigo base64("admin.<timestamp>.<API_KEY>")
    assert_all_rejected(&app, Some("YWRtaW4uMTcwMDAwMDAwMDAwMC50ZXN0LWFwaS1rZXk=")).await;
}

#[tokio::test]
async fn token_signed_with_another_key_is_rejected() {
    let app = spawn_app().await;
    let forged = TokenKeys::new("test-session-secret", "chave-errada", Duration::hours(1), Duration::hours(1))
        .issue_service_token("admin", Utc::now())
        .unwrap();

    assert_all_rejected(&app, Some(&forged)).await;
}

#[tokio::test]
async fn permission_outside_allow_list_is_rejected() {
    let app = spawn_app().await;
    let token = app.service_token("customer");
    assert_all_rejected(&app, Some(&token)).await;

    let empty = app.service_token("");
    assert_all_rejected(&app, Some(&empty)).await;
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = spawn_app().await;
    let expired = app
        .state
        .tokens
        .issue_service_token("admin", Utc::now() - Duration::days(2))
        .unwrap();

    assert_all_rejected(&app, Some(&expired)).await;
}

#[tokio::test]
async fn session_token_is_not_a_service_token() {
    let app = spawn_app().await;
    let session = app.session_token("admin");
    assert_all_rejected(&app, Some(&session)).await;
}

#[tokio::test]
async fn valid_token_reaches_the_store() {
    let app = spawn_app().await;
    let token = app.service_token("cac analyst");

    // O banco do teste é inalcançável: passar do gate significa cair no 500 genérico
    let response = call(&app, Method::GET, "/api/properties/obras", None, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Ocorreu um erro inesperado.");
}

#[tokio::test]
async fn validation_runs_after_the_gate() {
    let app = spawn_app().await;
    let token = app.service_token("admin");

    let response = call(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "name": "Ana", "email": "ana@metrocasa.com.br" })),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = call(
        &app,
        Method::PUT,
        &format!("/api/users/{SOME_ID}"),
        Some(json!({ "metadata": "permission" })),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = call(
        &app,
        Method::PUT,
        &format!("/api/properties/tour/{SOME_ID}"),
        Some(json!({ "tour": "ftp://x" })),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_auth_routes_skip_the_gate() {
    let app = spawn_app().await;

    let response = call(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Payload inválido: 400 (e não 401) prova que /api/auth não passa pelo gate
    let response = call(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "email": "não-é-email", "cpf": "1" })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_gets_the_json_error_contract() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/users"))
        .bearer_auth(app.service_token("admin"))
        .header("Content-Type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .expect("requisição");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("corpo JSON");
    assert_eq!(body["error"], "Dados inválidos.");
}

#[tokio::test]
async fn null_tour_is_accepted_as_removal() {
    let app = spawn_app().await;
    let token = app.service_token("marketing");

    // Passa da validação e só falha no banco inalcançável
    let response = call(
        &app,
        Method::PUT,
        &format!("/api/properties/tour/{SOME_ID}"),
        Some(json!({ "tour": null })),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unknown_api_paths_are_gated_before_not_found() {
    let app = spawn_app().await;

    for path in ["/api/users/nope/extra", "/api/nao-existe", "/api/indicacao/x/y/z"] {
        let response = call(&app, Method::GET, path, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
    }

    let token = app.service_token("cac");
    let response = call(&app, Method::GET, "/api/users/nope/extra", None, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("corpo JSON");
    assert_eq!(body["error"], "Rota não encontrada");

    // Fora do gate: /api/auth e caminhos fora de /api
    let response = call(&app, Method::GET, "/api/auth/nao-existe", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = call(&app, Method::GET, "/nao-existe", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
