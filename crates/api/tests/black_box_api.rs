use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use skuflow_api::app::{build_app, services::AppServices};
use skuflow_infra::ServiceConfig;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(ServiceConfig::default()).await
    }

    async fn spawn_with(config: ServiceConfig) -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let services = Arc::new(AppServices::in_memory(config));
        let app = build_app(services, "*");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_sku(client: &reqwest::Client, srv: &TestServer, code: &str) -> Value {
    let res = client
        .post(srv.url("/skus"))
        .json(&json!({ "descricao": "A", "descricaoComercial": "B", "sku": code }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn transition(
    client: &reqwest::Client,
    srv: &TestServer,
    id: &str,
    target: &str,
) -> reqwest::Response {
    client
        .post(srv.url(&format!("/skus/{id}/transition")))
        .json(&json!({ "target": target }))
        .send()
        .await
        .unwrap()
}

async fn patch(
    client: &reqwest::Client,
    srv: &TestServer,
    id: &str,
    body: Value,
) -> reqwest::Response {
    client
        .patch(srv.url(&format!("/skus/{id}")))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn error_body(res: reqwest::Response) -> (StatusCode, Value) {
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_reports_ok_and_uptime() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn create_returns_pre_cadastro_record_with_camel_case_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_sku(&client, &srv, "X1").await;
    assert_eq!(created["status"], "PRE_CADASTRO");
    assert_eq!(created["descricaoComercial"], "B");
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let id = created["id"].as_str().unwrap();
    let res = client.get(srv.url(&format!("/skus/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: Value = res.json().await.unwrap();
    assert_eq!(found, created);
}

#[tokio::test]
async fn duplicate_code_is_a_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_sku(&client, &srv, "X1").await;

    let res = client
        .post(srv.url("/skus"))
        .json(&json!({ "descricao": "C", "descricaoComercial": "D", "sku": "X1" }))
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Missing field.
    let res = client
        .post(srv.url("/skus"))
        .json(&json!({ "descricao": "A", "sku": "X1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown status value.
    let created = create_sku(&client, &srv, "X2").await;
    let id = created["id"].as_str().unwrap();
    let res = transition(&client, &srv, id, "ativo").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Blank field.
    let res = client
        .post(srv.url("/skus"))
        .json(&json!({ "descricao": "  ", "descricaoComercial": "B", "sku": "X3" }))
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn requested_initial_status_is_ignored_unless_configured() {
    let body = json!({
        "descricao": "A", "descricaoComercial": "B", "sku": "S1", "status": "ATIVO"
    });
    let client = reqwest::Client::new();

    let strict = TestServer::spawn().await;
    let res = client.post(strict.url("/skus")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["status"], "PRE_CADASTRO");

    let permissive = TestServer::spawn_with(ServiceConfig::allowing_initial_status()).await;
    let res = client.post(permissive.url("/skus")).json(&body).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["status"], "ATIVO");
}

#[tokio::test]
async fn malformed_and_unknown_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/skus/not-a-uuid")).send().await.unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");

    let res = client
        .get(srv.url("/skus/01890a5d-ac96-774b-bcce-b302099a8057"))
        .send()
        .await
        .unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("não encontrado"));
}

#[tokio::test]
async fn lifecycle_transitions_and_rejections() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = create_sku(&client, &srv, "X2").await;
    let id = created["id"].as_str().unwrap();

    // PRE_CADASTRO cannot jump to ATIVO.
    let (status, body) = error_body(transition(&client, &srv, id, "ATIVO").await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_transition");
    assert_eq!(body["message"], "Transição inválida de PRE_CADASTRO para ATIVO");

    let res = transition(&client, &srv, id, "CADASTRO_COMPLETO").await;
    assert_eq!(res.status(), StatusCode::OK);
    let completed: Value = res.json().await.unwrap();
    assert_eq!(completed["status"], "CADASTRO_COMPLETO");
    assert_eq!(completed["sku"], "X2");

    let res = transition(&client, &srv, id, "ATIVO").await;
    assert_eq!(res.status(), StatusCode::OK);

    // ATIVO is locked for edits.
    let (status, body) = error_body(patch(&client, &srv, id, json!({ "descricao": "Z" })).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "edit_not_allowed");

    let res = transition(&client, &srv, id, "DESATIVADO").await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = transition(&client, &srv, id, "PRE_CADASTRO").await;
    let reopened: Value = res.json().await.unwrap();
    assert_eq!(reopened["status"], "PRE_CADASTRO");
}

#[tokio::test]
async fn commercial_description_edit_rolls_back_to_pre_cadastro() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = create_sku(&client, &srv, "X4").await;
    let id = created["id"].as_str().unwrap();
    transition(&client, &srv, id, "CADASTRO_COMPLETO").await;

    // Only descricaoComercial may change here.
    let (status, body) = error_body(patch(&client, &srv, id, json!({ "sku": "NOVO" })).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_edit");
    assert!(body["message"].as_str().unwrap().contains("apenas descricaoComercial"));

    let res = patch(&client, &srv, id, json!({ "descricaoComercial": "Nova" })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["status"], "PRE_CADASTRO");
    assert_eq!(updated["descricaoComercial"], "Nova");
    assert_eq!(updated["descricao"], "A");
}

#[tokio::test]
async fn pre_cadastro_edits_and_explicit_nulls() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = create_sku(&client, &srv, "E1").await;
    let id = created["id"].as_str().unwrap();

    let res = patch(&client, &srv, id, json!({ "descricao": "A2", "sku": "E2" })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["descricao"], "A2");
    assert_eq!(updated["sku"], "E2");
    assert_eq!(updated["status"], "PRE_CADASTRO");

    let (status, body) = error_body(patch(&client, &srv, id, json!({ "sku": null })).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    // Empty patch leaves the record as it was.
    let res = patch(&client, &srv, id, json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let same: Value = res.json().await.unwrap();
    assert_eq!(same, updated);
}

#[tokio::test]
async fn cancelado_is_final() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = create_sku(&client, &srv, "X8").await;
    let id = created["id"].as_str().unwrap();

    assert_eq!(transition(&client, &srv, id, "CANCELADO").await.status(), StatusCode::OK);

    let (status, body) = error_body(transition(&client, &srv, id, "ATIVO").await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "terminal_state");
    assert!(body["message"].as_str().unwrap().contains("definitivo"));
}

#[tokio::test]
async fn delete_then_everything_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = create_sku(&client, &srv, "DEL").await;
    let id = created["id"].as_str().unwrap();

    let res = client.delete(srv.url(&format!("/skus/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));

    let res = client.get(srv.url(&format!("/skus/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = client.delete(srv.url(&format!("/skus/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        transition(&client, &srv, id, "CADASTRO_COMPLETO").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn list_pages_filters_and_searches() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    for i in 0..15 {
        create_sku(&client, &srv, &format!("SKU{i}")).await;
    }

    let page2: Value = client
        .get(srv.url("/skus?page=2&limit=10"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page2["items"].as_array().unwrap().len(), 5);
    assert_eq!(page2["total"], 15);
    assert_eq!(page2["page"], 2);
    assert_eq!(page2["pages"], 2);

    // Newest first, non-numeric paging falls back to defaults.
    let first: Value = client
        .get(srv.url("/skus?page=abc&limit=xyz"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["page"], 1);
    assert_eq!(first["items"].as_array().unwrap().len(), 10);
    assert_eq!(first["items"][0]["sku"], "SKU14");

    let searched: Value = client
        .get(srv.url("/skus?q=sku1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // SKU1, SKU10..SKU14
    assert_eq!(searched["total"], 6);

    let by_status: Value = client
        .get(srv.url("/skus?status=ATIVO"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_status["total"], 0);
    assert_eq!(by_status["pages"], 0);

    let res = client.get(srv.url("/skus?status=bogus")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Oversized numbers clamp rather than fall back to defaults.
    let huge = "99999999999999999999";
    let clamped: Value = client
        .get(srv.url(&format!("/skus?limit={huge}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(clamped["items"].as_array().unwrap().len(), 15);
    assert_eq!(clamped["pages"], 1);

    let far: Value = client
        .get(srv.url(&format!("/skus?page={huge}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(far["items"].as_array().unwrap().is_empty());
    assert_eq!(far["total"], 15);
}

#[tokio::test]
async fn malformed_query_string_gets_json_error() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/skus?page=1&page=2")).await.unwrap();
    let (status, body) = error_body(res).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_query");
    assert!(body["message"].is_string());
}
