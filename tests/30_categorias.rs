mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_list_update_delete_category() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::client_for("cat-owner")?;

    let res = client
        .post(server.url("/api/categorias"))
        .json(&json!({ "nome": "Transporte", "icone": "🚌", "descricao": "Bus and metro" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = common::json_body(res).await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["gastoMensal"], json!(0.0));
    assert_eq!(created["totalGastos"], 0);

    let res = client.get(server.url("/api/categorias")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let listed = common::json_body(res).await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["nome"], "Transporte");

    let res = client
        .put(server.url(&format!("/api/categorias/{}", id)))
        .json(&json!({ "nome": "Transport", "gastoMensal": 150.75 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = common::json_body(res).await?;
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["nome"], "Transport");
    assert_eq!(updated["gastoMensal"], json!(150.75));
    assert_eq!(updated["criadoEm"], created["criadoEm"]);

    let res = client
        .delete(server.url(&format!("/api/categorias/{}", id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(server.url(&format!("/api/categorias/{}", id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn duplicate_names_are_rejected_per_tenant() -> Result<()> {
    let server = common::start_server().await?;
    let alice = common::client_for("dup-alice")?;
    let bob = common::client_for("dup-bob")?;
    let body = json!({ "nome": "Lazer" });

    let res = alice.post(server.url("/api/categorias")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = alice.post(server.url("/api/categorias")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error = common::json_body(res).await?;
    assert_eq!(error["code"], "BAD_REQUEST");
    assert!(error["message"].as_str().unwrap_or_default().contains("Lazer"));

    let res = bob.post(server.url("/api/categorias")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn invalid_category_reports_field_errors() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::client_for("cat-invalid")?;

    let res = client
        .post(server.url("/api/categorias"))
        .json(&json!({ "nome": "x".repeat(101), "gastoMensal": -5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = common::json_body(res).await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["nome"].is_string());
    assert!(body["field_errors"]["gastoMensal"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_category_is_not_found() -> Result<()> {
    let server = common::start_server().await?;
    let client = common::client_for("cat-missing")?;

    let res = client
        .put(server.url("/api/categorias/does-not-exist"))
        .json(&json!({ "nome": "Anything" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(server.url("/api/categorias/does-not-exist"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
