mod common;

use anyhow::Result;
use myflix_api::database::Store;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, PASSWORD};

#[tokio::test]
async fn registration_creates_user_without_exposing_password() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.register("cinephile", "cine@example.com").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    assert_eq!(body["username"], "cinephile");
    assert_eq!(body["email"], "cine@example.com");
    assert_eq!(body["birthday"], "1994-06-15");
    assert_eq!(body["favorite_movies"], json!([]));
    assert_eq!(body["to_watch"], json!([]));
    assert!(body.get("password").is_none());

    let stored = server.store.find_user("cinephile").await?.expect("user persisted");
    assert_ne!(stored.password, PASSWORD);
    assert!(stored.password.starts_with("$2"));
    Ok(())
}

#[tokio::test]
async fn short_username_is_rejected_and_nothing_persisted() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.register("abc", "abc@example.com").await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = res.json().await?;
    assert_eq!(body["errors"][0]["field"], "username");
    assert!(server.store.list_users().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn every_violation_is_reported_together() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "username": "no!", "password": "", "email": "nope" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = res.json().await?;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["username", "username", "password", "email"]);
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() -> Result<()> {
    let server = TestServer::spawn().await?;

    let first = server.register("cinephile", "cine@example.com").await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = server.register("cinephile", "other@example.com").await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let users = server.store.list_users().await?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "cine@example.com");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let server = TestServer::spawn().await?;

    server.register("cinephile", "cine@example.com").await?;
    let res = server.register("filmfan1", "cine@example.com").await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(server.store.list_users().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn lists_and_fetches_users() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_with_token("cinephile").await?;
    server.register("filmfan1", "filmfan1@example.com").await?;

    let res = server.get("/users", &token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let users: Value = res.json().await?;
    assert_eq!(users.as_array().map(Vec::len), Some(2));

    let res = server.get("/users/filmfan1", &token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let user: Value = res.json().await?;
    assert_eq!(user["email"], "filmfan1@example.com");

    let res = server.get("/users/ghost1", &token).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_replaces_profile_and_rehashes_password() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_with_token("cinephile").await?;

    let res = server
        .put_json(
            "/users/cinephile",
            &token,
            &json!({
                "username": "cinephile2",
                "password": "newpassword",
                "email": "new@example.com",
                "birthday": "1990-01-01"
            }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["username"], "cinephile2");
    assert_eq!(body["email"], "new@example.com");

    assert!(server.store.find_user("cinephile").await?.is_none());
    assert_eq!(server.login("cinephile2", PASSWORD).await?.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.login("cinephile2", "newpassword").await?.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn update_validates_and_detects_conflicts() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_with_token("cinephile").await?;
    server.register("filmfan1", "filmfan1@example.com").await?;

    let invalid = server
        .put_json("/users/cinephile", &token, &json!({ "username": "ab" }))
        .await?;
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let taken = server
        .put_json(
            "/users/cinephile",
            &token,
            &json!({ "username": "filmfan1", "password": "x", "email": "c@example.com" }),
        )
        .await?;
    assert_eq!(taken.status(), StatusCode::CONFLICT);

    let missing = server
        .put_json(
            "/users/ghost1",
            &token,
            &json!({ "username": "ghost1", "password": "x", "email": "g@example.com" }),
        )
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_confirms_in_plain_text() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_with_token("cinephile").await?;
    server.register("filmfan1", "filmfan1@example.com").await?;

    let res = server.delete("/users/filmfan1", &token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "filmfan1 was deleted.");
    assert!(server.store.find_user("filmfan1").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn deleting_unknown_user_is_not_found_and_changes_nothing() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.user_with_token("cinephile").await?;

    let res = server.delete("/users/ghost1", &token).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "ghost1 was not found.");
    assert_eq!(server.store.list_users().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn registration_accepts_form_bodies() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .form(&[
            ("username", "cinephile"),
            ("password", PASSWORD),
            ("email", "cine@example.com"),
            ("birthday", "1994-06-15"),
        ])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    assert_eq!(body["username"], "cinephile");
    assert_eq!(server.login("cinephile", PASSWORD).await?.status(), StatusCode::OK);

    let res = server
        .client
        .post(server.url("/users"))
        .form(&[("username", "abc")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}
