//! End-to-end tests for JagMart.
//!
//! Every test is `#[ignore]`d because it needs both servers running against
//! a migrated database:
//!
//! ```bash
//! cargo run -p jagmart-cli -- migrate
//! cargo run -p jagmart-storefront &
//! cargo run -p jagmart-admin &
//! cargo test -p jagmart-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - the database both servers use
//! - `STOREFRONT_URL` - default `http://localhost:3000`
//! - `ADMIN_URL` - default `http://localhost:3001`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::missing_panics_doc)]

use jagmart_admin::db::UserRepository;
use jagmart_admin::services::hash_password;
use jagmart_core::Email;
use reqwest::Client;
use serde_json::{Value, json};
use sqlx::PgPool;

pub const TEST_PASSWORD: &str = "green-cardamom-42";

#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[must_use]
pub fn admin_url() -> String {
    std::env::var("ADMIN_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client that keeps session cookies between requests.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

pub async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// An email no other test run has used.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.jagmart.in", uuid::Uuid::new_v4().simple())
}

/// A name no other test run has used, so catalog tests do not collide.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}

/// Create an admin directly in the database and sign in as them.
pub async fn admin_client() -> Client {
    let pool = pool().await;
    let email = unique_email("admin");
    let hash = hash_password(TEST_PASSWORD).unwrap();
    UserRepository::new(&pool)
        .create_admin(&Email::parse(&email).unwrap(), &hash, Some("Test"), None)
        .await
        .expect("Failed to create admin");

    let client = client();
    let resp = client
        .post(format!("{}/api/auth/login", admin_url()))
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("Admin login request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::OK, "admin login");
    client
}

/// Register a shopper on the storefront. The client is signed in afterwards.
pub async fn shopper_client() -> (Client, String) {
    let email = unique_email("shopper");
    let client = client();
    let resp = client
        .post(format!("{}/api/auth/register", storefront_url()))
        .json(&json!({ "email": email, "password": TEST_PASSWORD, "first_name": "Ravi" }))
        .send()
        .await
        .expect("Register request failed");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED, "register");
    (client, email)
}

/// POST JSON to the admin API and return the status and parsed body.
pub async fn admin_post(client: &Client, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
    let resp = client
        .post(format!("{}/api{path}", admin_url()))
        .json(body)
        .send()
        .await
        .expect("Admin request failed");
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

/// Create an active category, subcategory and product. Returns their IDs.
pub async fn seed_product(client: &Client, price: &str, stock: i64) -> (i64, i64, i64) {
    let (_, category) = admin_post(
        client,
        "/categories",
        &json!({ "name": unique_name("Category") }),
    )
    .await;
    let category_id = category["id"].as_i64().unwrap();

    let (_, subcategory) = admin_post(
        client,
        "/subcategories",
        &json!({ "category_id": category_id, "name": unique_name("Subcategory") }),
    )
    .await;
    let subcategory_id = subcategory["id"].as_i64().unwrap();

    let (_, product) = admin_post(
        client,
        "/products",
        &json!({
            "subcategory_id": subcategory_id,
            "name": unique_name("Product"),
            "price": price,
            "stock_quantity": stock,
        }),
    )
    .await;
    let product_id = product["id"].as_i64().unwrap();

    (category_id, subcategory_id, product_id)
}
