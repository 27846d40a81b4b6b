//! Upload extractor
//!
//! Buffers the `image` part of a multipart upload, works out its content type
//! and keeps the remaining text fields so handlers can read their parameters
//! with a query-string fallback.

use crate::error::HttpAppError;
use axum::extract::{FromRequest, Multipart, Query, Request};
use bytes::Bytes;
use pixmill_core::AppError;
use pixmill_processing::detect_content_type;
use std::collections::HashMap;

/// Name of the multipart field carrying the file
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Bytes,
    pub file_name: Option<String>,
    /// Content type detected from the payload (or its extension)
    pub content_type: String,
    form: HashMap<String, String>,
    query: HashMap<String, String>,
}

impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map(|Query(q)| q)
            .unwrap_or_default();

        let mut multipart = Multipart::from_request(req, state).await?;

        let mut form = HashMap::new();
        let mut image: Option<(Bytes, Option<String>)> = None;

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD && image.is_none() {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read image: {}", e.body_text()))
                })?;
                image = Some((data, file_name));
            } else if field.file_name().is_none() {
                let value = field.text().await?;
                form.entry(name).or_insert(value);
            }
        }

        let (data, file_name) = image.ok_or_else(|| {
            AppError::BadRequest(format!(
                "Failed to read image: no file field named \"{}\"",
                IMAGE_FIELD
            ))
        })?;

        tracing::debug!(
            file_name = file_name.as_deref().unwrap_or(""),
            size = data.len(),
            "Received upload"
        );

        let content_type = detect_content_type(&data, file_name.as_deref())?;

        Ok(ImageUpload {
            data,
            file_name,
            content_type,
            form,
            query,
        })
    }
}

impl ImageUpload {
    /// Form field `name`, falling back to the query parameter of the same name.
    /// Empty values count as absent.
    pub fn param(&self, name: &str) -> Option<&str> {
        non_empty(self.form.get(name)).or_else(|| non_empty(self.query.get(name)))
    }

    /// Requested output format token, if any
    pub fn output_format(&self) -> Option<&str> {
        self.param("format")
    }

    /// Positive integer from the form, else the query; 0 when neither parses.
    pub fn dimension(&self, name: &str) -> u32 {
        let parse = |source: &HashMap<String, String>| {
            source
                .get(name)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
        };
        parse(&self.form).or_else(|| parse(&self.query)).unwrap_or(0)
    }

    /// Raw quality value; range checking is left to the operation.
    pub fn quality(&self) -> Option<i64> {
        let parse = |source: &HashMap<String, String>| {
            source
                .get("quality")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| *v != 0)
        };
        parse(&self.form).or_else(|| parse(&self.query))
    }

    /// True only when `metadata` is exactly `"true"` in the query or the form.
    pub fn wants_metadata(&self) -> bool {
        let is_true = |source: &HashMap<String, String>| {
            source.get("metadata").map(String::as_str) == Some("true")
        };
        is_true(&self.query) || is_true(&self.form)
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}
