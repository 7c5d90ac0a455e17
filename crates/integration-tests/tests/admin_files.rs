//! Image upload and spreadsheet import against a running admin server.

use jagmart_integration_tests::{admin_client, admin_url};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_upload_image() {
    let client = admin_client().await;
    let form = Form::new().text("folder", "products").part(
        "file",
        Part::bytes(PNG.to_vec())
            .file_name("milk.png")
            .mime_str("image/png")
            .unwrap(),
    );

    let resp = client
        .post(format!("{}/api/uploads", admin_url()))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    let path = body["path"].as_str().unwrap();
    assert!(path.starts_with("products/"));
    assert!(path.ends_with(".png"));
    assert!(body["url"].as_str().unwrap().ends_with(path));
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_upload_rejects_non_image() {
    let client = admin_client().await;
    let form = Form::new().text("folder", "categories").part(
        "file",
        Part::bytes(b"%PDF-1.7".to_vec())
            .file_name("menu.pdf")
            .mime_str("application/pdf")
            .unwrap(),
    );

    let resp = client
        .post(format!("{}/api/uploads", admin_url()))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "File must be an image");
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_upload_rejects_svg() {
    let client = admin_client().await;
    let form = Form::new().text("folder", "products").part(
        "file",
        Part::bytes(br#"<svg xmlns="http://www.w3.org/2000/svg"><script/></svg>"#.to_vec())
            .file_name("logo.svg")
            .mime_str("image/svg+xml")
            .unwrap(),
    );

    let resp = client
        .post(format!("{}/api/uploads", admin_url()))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Image must be a PNG, JPEG, GIF or WebP");
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_upload_rejects_unknown_folder() {
    let client = admin_client().await;
    let form = Form::new().text("folder", "banners").part(
        "file",
        Part::bytes(PNG.to_vec()).mime_str("image/png").unwrap(),
    );

    let resp = client
        .post(format!("{}/api/uploads", admin_url()))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running servers and DATABASE_URL"]
async fn test_import_rejects_non_workbook() {
    let client = admin_client().await;
    let form = Form::new().part(
        "file",
        Part::bytes(b"name,price\nMilk,54\n".to_vec()).file_name("catalog.csv"),
    );

    let resp = client
        .post(format!("{}/api/import", admin_url()))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
