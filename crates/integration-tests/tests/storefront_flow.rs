//! Shopper flows against running storefront and admin servers.

use jagmart_integration_tests::{
    TEST_PASSWORD, admin_client, admin_url, client, seed_product, shopper_client, storefront_url,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn total(cart: &Value) -> f64 {
    cart["total"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_register_login_and_me() {
    let (shopper, email) = shopper_client().await;

    let me: Value = shopper
        .get(format!("{}/api/auth/me", storefront_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["email"], email.as_str());

    let fresh = client();
    let resp = fresh
        .post(format!("{}/api/auth/login", storefront_url()))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = fresh
        .post(format!("{}/api/auth/login", storefront_url()))
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_cart_requires_sign_in() {
    let resp = client()
        .get(format!("{}/api/cart", storefront_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_cart_add_update_remove() {
    let admin = admin_client().await;
    let (_, _, product_id) = seed_product(&admin, "54.00", 20).await;
    let (shopper, _) = shopper_client().await;
    let base = storefront_url();

    let cart: Value = shopper
        .post(format!("{base}/api/cart/items"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["item_count"], 2);
    assert!((total(&cart) - 108.0).abs() < f64::EPSILON);

    // Adding again increments.
    let cart: Value = shopper
        .post(format!("{base}/api/cart/items"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["item_count"], 3);

    let cart: Value = shopper
        .patch(format!("{base}/api/cart/items/{product_id}"))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["item_count"], 5);

    let cart: Value = shopper
        .delete(format!("{base}/api/cart/items/{product_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["item_count"], 0);
    assert!(total(&cart).abs() < f64::EPSILON);
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_new_product_is_browsable() {
    let admin = admin_client().await;
    let (category_id, subcategory_id, product_id) = seed_product(&admin, "99.00", 4).await;
    let base = storefront_url();
    let shopper = client();

    let product = shopper
        .get(format!("{base}/api/products/{product_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(product.status(), StatusCode::OK);

    let category: Value = shopper
        .get(format!("{base}/api/categories/{category_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        category["products"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["id"].as_i64() == Some(product_id))
    );

    let subcategory = shopper
        .get(format!("{base}/api/subcategories/{subcategory_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(subcategory.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_inactive_subcategory_hides_its_products() {
    let admin = admin_client().await;
    let (_, subcategory_id, product_id) = seed_product(&admin, "35.00", 8).await;
    let base = storefront_url();

    let resp = admin
        .patch(format!("{}/api/subcategories/{subcategory_id}", admin_url()))
        .json(&json!({ "is_active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let product = client()
        .get(format!("{base}/api/products/{product_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(product.status(), StatusCode::NOT_FOUND);

    let listing: Value = client()
        .get(format!("{base}/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        !listing
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["id"].as_i64() == Some(product_id))
    );

    let (shopper, _) = shopper_client().await;
    let resp = shopper
        .post(format!("{base}/api/cart/items"))
        .json(&json!({ "product_id": product_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
