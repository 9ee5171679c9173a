mod common;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn_app, ALLOWED_ORIGIN};

fn indication_body() -> Value {
    json!({
        "name": "Carlos Lima",
        "rg": "12.345.678-9",
        "cpf": "123.456.789-09",
        "phone": "11988887777",
        "birthDate": "1990-05-17",
        "address": { "cep": "01310-100", "number": "1000" },
        "bank": { "bank": "341", "agency": "0001", "account": "12345-6" },
        "isClient": false,
        "indication": { "name": "Marina Alves", "cpf": "98765432100", "phone": "11977776666" }
    })
}

#[tokio::test]
async fn disallowed_origin_is_forbidden_before_touching_the_store() {
    let app = spawn_app().await;

    for origin in ["https://evil.example.com", "https://metrocasa.com.br", "null"] {
        let response = app
            .client
            .post(app.url("/api/indicacao"))
            .header("Origin", origin)
            .json(&indication_body())
            .send()
            .await
            .unwrap();

        // 403 e não 500: o banco (inalcançável) nunca foi chamado
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{origin}");
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            ALLOWED_ORIGIN
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Forbidden origin");
    }
}

#[tokio::test]
async fn missing_origin_is_forbidden() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/indicacao"))
        .json(&indication_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn allowed_origin_with_invalid_body_is_bad_request() {
    let app = spawn_app().await;

    let mut body = indication_body();
    body["cpf"] = json!("abc");

    let response = app
        .client
        .post(app.url("/api/indicacao"))
        .header("Origin", ALLOWED_ORIGIN)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["access-control-allow-origin"], ALLOWED_ORIGIN);
}

#[tokio::test]
async fn allowed_origin_reaches_the_store_without_a_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/indicacao"))
        .header("Origin", ALLOWED_ORIGIN)
        .json(&indication_body())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["access-control-allow-origin"], ALLOWED_ORIGIN);
}

#[tokio::test]
async fn preflight_advertises_allowed_origin() {
    let app = spawn_app().await;

    let response = app
        .client
        .request(Method::OPTIONS, app.url("/api/indicacao"))
        .header("Origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], ALLOWED_ORIGIN);
    assert_eq!(response.headers()["access-control-allow-methods"], "POST, OPTIONS");
}

#[tokio::test]
async fn listing_indications_still_needs_a_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/indicacao"))
        .header("Origin", ALLOWED_ORIGIN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
