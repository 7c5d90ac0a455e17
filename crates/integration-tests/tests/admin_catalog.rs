//! Admin catalog management against a running admin server.

use jagmart_integration_tests::{
    TEST_PASSWORD, admin_client, admin_post, admin_url, client, seed_product, shopper_client,
    unique_name,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_shopper_cannot_sign_in_to_admin() {
    let (_, email) = shopper_client().await;

    let resp = client()
        .post(format!("{}/api/auth/login", admin_url()))
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Unauthorized access. Admin privileges required."
    );
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_admin_session_and_logout() {
    let client = admin_client().await;

    let me = client
        .get(format!("{}/api/auth/me", admin_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);

    let logout = client
        .post(format!("{}/api/auth/logout", admin_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let me = client
        .get(format!("{}/api/categories", admin_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_duplicate_category_is_conflict() {
    let client = admin_client().await;
    let name = unique_name("Dairy");

    let (status, _) = admin_post(&client, "/categories", &json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = admin_post(&client, "/categories", &json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_subcategory_with_missing_category_is_unprocessable() {
    let client = admin_client().await;

    let (status, body) = admin_post(
        &client,
        "/subcategories",
        &json!({ "category_id": i32::MAX, "name": unique_name("Orphan") }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Category does not exist");
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_product_listing_includes_parent_names() {
    let client = admin_client().await;
    let (_, _, product_id) = seed_product(&client, "45.00", 3).await;

    let products: Vec<Value> = client
        .get(format!("{}/api/products", admin_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let product = products
        .iter()
        .find(|p| p["id"].as_i64() == Some(product_id))
        .expect("new product is listed");
    assert!(product["category_name"].is_string());
    assert!(product["subcategory_name"].is_string());
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_patch_product_price_and_clear_description() {
    let client = admin_client().await;
    let (_, _, product_id) = seed_product(&client, "20.00", 5).await;

    let resp = client
        .patch(format!("{}/api/products/{product_id}", admin_url()))
        .json(&json!({ "price": "22.50", "description": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let product: Value = resp.json().await.unwrap();
    assert_eq!(product["price"], "22.50");
    assert!(product["description"].is_null());
    assert_eq!(product["stock_quantity"], 5);
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_deleting_category_removes_children() {
    let client = admin_client().await;
    let (category_id, subcategory_id, product_id) = seed_product(&client, "10.00", 1).await;

    let resp = client
        .delete(format!("{}/api/categories/{category_id}", admin_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .delete(format!("{}/api/subcategories/{subcategory_id}", admin_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .delete(format!("{}/api/products/{product_id}", admin_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_deactivating_a_user() {
    let client = admin_client().await;
    let (_, email) = shopper_client().await;

    let users: Vec<Value> = client
        .get(format!("{}/api/users", admin_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let shopper = users.iter().find(|u| u["email"] == email.as_str()).unwrap();
    assert_eq!(shopper["role"], "customer");

    let resp = client
        .patch(format!("{}/api/users/{}", admin_url(), shopper["id"]))
        .json(&json!({ "is_active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["is_active"], false);
}
