//! API integration tests
//!
//! These run against a live server with a seeded admin account
//! (username "admin", access code "admincode"). Run with:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to obtain a bearer token for a seeded account
async fn get_token(client: &Client, username: &str, code: &str) -> String {
    let response = client
        .post(format!("{}/auth/token/", BASE_URL))
        .json(&json!({
            "username": username,
            "confirmation_code": code
        }))
        .send()
        .await
        .expect("Failed to send token request");

    let body: Value = response.json().await.expect("Failed to parse token response");
    body["access"].as_str().expect("No access token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    get_token(client, "admin", "admincode").await
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_signup_echoes_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/signup/", BASE_URL))
        .json(&json!({
            "email": "newcomer@example.com",
            "username": "newcomer"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "newcomer@example.com");
    assert_eq!(body["username"], "newcomer");
}

#[tokio::test]
#[ignore]
async fn test_signup_reserved_username() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/signup/", BASE_URL))
        .json(&json!({
            "email": "me@example.com",
            "username": "me"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_signup_email_bound_to_other_username() {
    let client = Client::new();

    // First registration
    let _ = client
        .post(format!("{}/auth/signup/", BASE_URL))
        .json(&json!({
            "email": "taken@example.com",
            "username": "original_owner"
        }))
        .send()
        .await
        .expect("Failed to send request");

    // Same email, different username
    let response = client
        .post(format!("{}/auth/signup/", BASE_URL))
        .json(&json!({
            "email": "taken@example.com",
            "username": "impostor"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_token_unknown_user() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/token/", BASE_URL))
        .json(&json!({
            "username": "no_such_user",
            "confirmation_code": "whatever1"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_token_wrong_code() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/token/", BASE_URL))
        .json(&json!({
            "username": "admin",
            "confirmation_code": "wrongcode"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_anonymous_can_browse_titles() {
    let client = Client::new();

    let response = client
        .get(format!("{}/titles/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_hostile_paging_values_clamped() {
    let client = Client::new();

    let response = client
        .get(format!("{}/categories/?limit=-1&offset=-5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    // Echoed metadata reflects the clamped values, not the raw query
    assert_eq!(body["limit"], 1);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
#[ignore]
async fn test_anonymous_cannot_write() {
    let client = Client::new();

    let response = client
        .post(format!("{}/categories/", BASE_URL))
        .json(&json!({
            "name": "Films",
            "slug": "films"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .get(format!("{}/users/me/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_profile_patch_cannot_change_role() {
    let client = Client::new();
    let token = admin_token(&client).await;

    // Create a plain user and fetch its token would require email access,
    // so verify the contract shape on the admin account instead: the
    // profile endpoint ignores unknown fields and never echoes a changed
    // role for a payload without one.
    let response = client
        .patch(format!("{}/users/me/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "bio": "Reads everything twice."
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["bio"], "Reads everything twice.");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_list_users_requires_admin() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_admin_user_lifecycle() {
    let client = Client::new();
    let token = admin_token(&client).await;

    // Create
    let response = client
        .post(format!("{}/users/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "username": "lifecycle_user",
            "email": "lifecycle@example.com",
            "role": "moderator"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    // Read back by username
    let response = client
        .get(format!("{}/users/lifecycle_user/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["role"], "moderator");

    // Delete
    let response = client
        .delete(format!("{}/users/lifecycle_user/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_title_with_rating_and_review_uniqueness() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let auth = format!("Bearer {}", token);

    // Reference data
    let _ = client
        .post(format!("{}/categories/", BASE_URL))
        .header("Authorization", &auth)
        .json(&json!({"name": "Books", "slug": "books"}))
        .send()
        .await
        .expect("Failed to create category");

    let _ = client
        .post(format!("{}/genres/", BASE_URL))
        .header("Authorization", &auth)
        .json(&json!({"name": "Drama", "slug": "drama"}))
        .send()
        .await
        .expect("Failed to create genre");

    // Title with nested references on read
    let response = client
        .post(format!("{}/titles/", BASE_URL))
        .header("Authorization", &auth)
        .json(&json!({
            "name": "The Long Winter",
            "year": 1940,
            "category": "books",
            "genre": ["drama"]
        }))
        .send()
        .await
        .expect("Failed to create title");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let title_id = body["id"].as_i64().expect("No title id");
    assert!(body["rating"].is_null());
    assert_eq!(body["category"]["slug"], "books");
    assert_eq!(body["genre"][0]["slug"], "drama");

    // First review
    let response = client
        .post(format!("{}/titles/{}/reviews/", BASE_URL, title_id))
        .header("Authorization", &auth)
        .json(&json!({"text": "Bleak but brilliant.", "score": 9}))
        .send()
        .await
        .expect("Failed to create review");

    assert_eq!(response.status(), 201);
    let review: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(review["author"], "admin");
    assert_eq!(review["score"], 9);

    // Whole-number average serializes as an integer
    let response = client
        .get(format!("{}/titles/{}/", BASE_URL, title_id))
        .send()
        .await
        .expect("Failed to fetch title");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["rating"], 9);

    // Second review from the same author is rejected
    let response = client
        .post(format!("{}/titles/{}/reviews/", BASE_URL, title_id))
        .header("Authorization", &auth)
        .json(&json!({"text": "Changed my mind.", "score": 3}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Cleanup; cascades remove the review too
    let response = client
        .delete(format!("{}/titles/{}/", BASE_URL, title_id))
        .header("Authorization", &auth)
        .send()
        .await
        .expect("Failed to delete title");

    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/titles/{}/", BASE_URL, title_id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_title_year_in_future_rejected() {
    let client = Client::new();
    let token = admin_token(&client).await;

    let response = client
        .post(format!("{}/titles/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "From the Future",
            "year": 3020
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_comment_lifecycle() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let auth = format!("Bearer {}", token);

    let response = client
        .post(format!("{}/titles/", BASE_URL))
        .header("Authorization", &auth)
        .json(&json!({"name": "Commented Work", "year": 2001}))
        .send()
        .await
        .expect("Failed to create title");
    let title_id = response.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/titles/{}/reviews/", BASE_URL, title_id))
        .header("Authorization", &auth)
        .json(&json!({"text": "Fine.", "score": 7}))
        .send()
        .await
        .expect("Failed to create review");
    let review_id = response.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    // Create comment
    let response = client
        .post(format!(
            "{}/titles/{}/reviews/{}/comments/",
            BASE_URL, title_id, review_id
        ))
        .header("Authorization", &auth)
        .json(&json!({"text": "Agreed."}))
        .send()
        .await
        .expect("Failed to create comment");

    assert_eq!(response.status(), 201);
    let comment: Value = response.json().await.expect("Failed to parse response");
    let comment_id = comment["id"].as_i64().expect("No comment id");
    assert_eq!(comment["author"], "admin");

    // Patch it
    let response = client
        .patch(format!(
            "{}/titles/{}/reviews/{}/comments/{}/",
            BASE_URL, title_id, review_id, comment_id
        ))
        .header("Authorization", &auth)
        .json(&json!({"text": "Strongly agreed."}))
        .send()
        .await
        .expect("Failed to patch comment");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["text"], "Strongly agreed.");

    // Comment under a mismatched review path is not found
    let response = client
        .get(format!(
            "{}/titles/{}/reviews/{}/comments/{}/",
            BASE_URL, title_id, review_id + 9999, comment_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    // Cleanup
    let _ = client
        .delete(format!("{}/titles/{}/", BASE_URL, title_id))
        .header("Authorization", &auth)
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_filter_titles_by_category() {
    let client = Client::new();

    let response = client
        .get(format!("{}/titles/?category=books&limit=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    for item in body["items"].as_array().expect("items not an array") {
        assert_eq!(item["category"]["slug"], "books");
    }
}
