//! Image endpoint integration tests.
//!
//! Run with: `cargo test -p pixmill-api --test images_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::{fixtures, image_part, png_part, setup_test_app, setup_test_app_with};
use pixmill_core::Config;
use serde_json::Value;
use std::time::Duration;

#[tokio::test]
async fn test_convert_png_to_jpeg_metadata() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(100, 100))
        .add_text("format", "jpeg")
        .add_text("quality", "90")
        .add_text("metadata", "true");
    let response = client.post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Image converted successfully");
    assert_eq!(body["data"]["width"], 100);
    assert_eq!(body["data"]["height"], 100);
    assert_eq!(body["data"]["format"], "jpeg");
    assert!(body["data"]["size"].as_u64().unwrap() > 0);

    let modified = body["data"]["modified"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(modified).is_ok());
    assert!(modified.ends_with('Z'));
}

#[tokio::test]
async fn test_convert_metadata_size_matches_binary_response() {
    let client = setup_test_app();

    let binary = client
        .post("/convert")
        .multipart(
            MultipartForm::new()
                .add_part("image", png_part(64, 48))
                .add_text("format", "webp")
                .add_text("quality", "70"),
        )
        .await;
    assert_eq!(binary.status_code(), 200);
    assert_eq!(binary.headers()["content-type"], "image/webp");

    let metadata = client
        .post("/convert")
        .add_query_param("metadata", "true")
        .multipart(
            MultipartForm::new()
                .add_part("image", png_part(64, 48))
                .add_text("format", "webp")
                .add_text("quality", "70"),
        )
        .await;
    let body: Value = metadata.json();

    assert_eq!(body["data"]["format"], "webp");
    assert_eq!(
        body["data"]["size"].as_u64().unwrap() as usize,
        binary.as_bytes().len()
    );
}

#[tokio::test]
async fn test_convert_binary_headers() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(20, 20))
        .add_text("format", "JPG");
    let response = client.post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let headers = response.headers();
    assert_eq!(headers["content-type"], "image/jpeg");
    assert_eq!(headers["cache-control"], "public, max-age=86400");
    assert_eq!(
        headers["content-length"].to_str().unwrap(),
        response.as_bytes().len().to_string()
    );
    assert_eq!(fixtures::dimensions(response.as_bytes()), (20, 20));
}

#[tokio::test]
async fn test_convert_unsupported_format() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(10, 10))
        .add_text("format", "bmp");
    let response = client.post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("unsupported format: bmp"));
}

#[tokio::test]
async fn test_convert_requires_format() {
    let client = setup_test_app();

    let form = MultipartForm::new().add_part("image", png_part(10, 10));
    let response = client.post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "format is required");
}

#[tokio::test]
async fn test_convert_format_from_query() {
    let client = setup_test_app();

    let response = client
        .post("/convert")
        .add_query_param("format", "gif")
        .multipart(MultipartForm::new().add_part("image", png_part(10, 10)))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.headers()["content-type"], "image/gif");
}

#[tokio::test]
async fn test_convert_out_of_range_quality_uses_default() {
    let client = setup_test_app();

    let mut sizes = Vec::new();
    for quality in ["80", "0", "150"] {
        let form = MultipartForm::new()
            .add_part("image", png_part(50, 50))
            .add_text("format", "jpeg")
            .add_text("quality", quality)
            .add_text("metadata", "true");
        let body: Value = client.post("/convert").multipart(form).await.json();
        sizes.push(body["data"]["size"].as_u64().unwrap());
    }

    assert_eq!(sizes[0], sizes[1]);
    assert_eq!(sizes[0], sizes[2]);
}

#[tokio::test]
async fn test_resize_without_file_field() {
    let client = setup_test_app();

    let form = MultipartForm::new().add_text("width", "100");
    let response = client.post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("Failed to read image"));
}

#[tokio::test]
async fn test_resize_defaults_to_configured_dimensions() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(40, 30))
        .add_text("width", "0")
        .add_text("height", "0")
        .add_text("metadata", "true");
    let body: Value = client.post("/resize").multipart(form).await.json();

    assert_eq!(body["message"], "Image resized successfully");
    assert_eq!(body["data"]["width"], 800);
    assert_eq!(body["data"]["height"], 600);
    assert_eq!(body["data"]["format"], "png");
}

#[tokio::test]
async fn test_resize_dimensions_from_query_keep_input_format() {
    let client = setup_test_app();

    let response = client
        .post("/resize")
        .add_query_param("width", "32")
        .add_query_param("height", "24")
        .multipart(MultipartForm::new().add_part("image", png_part(100, 100)))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(fixtures::dimensions(response.as_bytes()), (32, 24));
}

#[tokio::test]
async fn test_resize_ignores_unknown_format() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(30, 30))
        .add_text("width", "10")
        .add_text("height", "10")
        .add_text("format", "bmp");
    let response = client.post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
}

#[tokio::test]
async fn test_resize_rejects_dimension_above_limit() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(10, 10))
        .add_text("width", "20000");
    let response = client.post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_metadata_flag_must_be_exact() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(10, 10))
        .add_text("width", "5")
        .add_text("height", "5")
        .add_text("metadata", "True");
    let response = client.post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
}

#[tokio::test]
async fn test_trim_crops_uniform_border() {
    let client = setup_test_app();

    let png = fixtures::create_framed_png(60, 50, 10, 5, 30, 20);
    let form = MultipartForm::new().add_part("image", image_part(png, "framed.png", "image/png"));
    let response = client.post("/trim").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(fixtures::dimensions(response.as_bytes()), (30, 20));
}

#[tokio::test]
async fn test_trim_rejects_unknown_format() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(10, 10))
        .add_text("format", "bmp");
    let response = client.post("/trim").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("unsupported format: bmp"));
}

#[tokio::test]
async fn test_unrecognised_upload_without_known_extension() {
    let client = setup_test_app();

    let part = image_part(b"just some text".to_vec(), "notes.txt", "text/plain");
    let form = MultipartForm::new()
        .add_part("image", part)
        .add_text("format", "png");
    let response = client.post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(response
        .text()
        .contains("Failed to get image type: unsupported format: txt"));
}

#[tokio::test]
async fn test_undecodable_image_is_server_error() {
    let client = setup_test_app();

    let part = image_part(b"not really a png".to_vec(), "broken.png", "image/png");
    let form = MultipartForm::new()
        .add_part("image", part)
        .add_text("format", "jpeg");
    let response = client.post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process image"));
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let config = Config {
        max_upload_size_bytes: 1024,
        ..Config::default()
    };
    let client = setup_test_app_with(config);

    let form = MultipartForm::new()
        .add_part(
            "image",
            image_part(fixtures::create_noise_png(64, 64), "noise.png", "image/png"),
        )
        .add_text("format", "jpeg");
    let response = client.post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_wrong_method_on_image_routes() {
    let client = setup_test_app();

    for path in ["/resize", "/convert", "/trim"] {
        let response = client.get(path).await;
        assert_eq!(response.status_code(), 405, "GET {}", path);
        let body: Value = response.json();
        assert_eq!(body["message"], "Method not allowed");
    }
}

#[tokio::test]
async fn test_metadata_echoes_requested_token() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(12, 12))
        .add_text("format", "JPG")
        .add_text("metadata", "true");
    let body: Value = client.post("/convert").multipart(form).await.json();

    assert_eq!(body["data"]["format"], "jpg");
}

#[tokio::test]
async fn test_convert_too_wide_for_webp_reports_encoder_error() {
    let client = setup_test_app();

    let form = MultipartForm::new()
        .add_part("image", png_part(20_000, 1))
        .add_text("format", "webp");
    let response = client.post("/convert").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["data"]["code"], "IMAGE_PROCESSING_ERROR");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process image: Failed to encode webp"));
}

#[tokio::test]
async fn test_request_deadline_returns_json_timeout() {
    let config = Config {
        request_timeout: Duration::from_millis(1),
        ..Config::default()
    };
    let client = setup_test_app_with(config);

    let form = MultipartForm::new()
        .add_part("image", png_part(64, 64))
        .add_text("width", "1500")
        .add_text("height", "1500");
    let response = client.post("/resize").multipart(form).await;

    assert_eq!(response.status_code(), 408);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Request timed out");
    assert_eq!(body["data"]["code"], "REQUEST_TIMEOUT");
}
