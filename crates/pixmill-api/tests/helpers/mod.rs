//! Test helpers: build the router and in-memory fixtures for integration tests.
//!
//! Run from workspace root: `cargo test -p pixmill-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::Part;
use axum_test::TestServer;
use pixmill_api::setup;
use pixmill_core::Config;

/// Test server over the real router with default configuration.
pub fn setup_test_app() -> TestServer {
    setup_test_app_with(Config::default())
}

pub fn setup_test_app_with(config: Config) -> TestServer {
    let (_state, router) = setup::initialize_app(config).expect("Failed to initialize app");
    TestServer::new(router.into_make_service()).expect("Failed to create test server")
}

/// Multipart file part for the `image` field.
pub fn image_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string())
}

pub fn png_part(width: u32, height: u32) -> Part {
    image_part(fixtures::create_test_png(width, height), "image.png", "image/png")
}
