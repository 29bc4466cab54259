//! Shared helpers for multipart form handling and id parsing.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::Response;

use brickstore_core::DomainError;
use brickstore_infra::FileUpload;

use crate::app::errors::json_error;

/// Text fields + file parts of one multipart request.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    uploads: Vec<FileUpload>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn require(&self, name: &str) -> Result<&str, Response> {
        self.text(name).ok_or_else(|| {
            json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                format!("missing field \"{name}\""),
            )
        })
    }

    pub fn flag(&self, name: &str) -> bool {
        self.text(name).map(|v| v == "true").unwrap_or(false)
    }

    /// Parse a price field. Unparseable or negative input reads as absent;
    /// the domain decides whether a price is actually required.
    pub fn price(&self, name: &str) -> Option<u64> {
        self.text(name)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64)
    }

    /// Parse a field carrying a JSON array of strings (e.g. `deletedImages`).
    /// An absent field is an empty list; malformed JSON is a 400.
    pub fn json_string_list(&self, name: &str) -> Result<Vec<String>, Response> {
        match self.text(name) {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(raw).map_err(|_| {
                json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    format!("field \"{name}\" is not a valid JSON list"),
                )
            }),
        }
    }

    pub fn into_uploads(self) -> Vec<FileUpload> {
        self.uploads
    }
}

/// Drain a multipart body into text fields and file uploads. Parts carrying
/// a filename are treated as uploads regardless of their field name.
pub async fn collect_multipart(mut multipart: Multipart) -> Result<FormData, Response> {
    let mut form = FormData::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("malformed multipart body: {e}"),
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(filename) = field.file_name().map(str::to_string) {
            let content = field
                .bytes()
                .await
                .map_err(|e| {
                    json_error(
                        StatusCode::BAD_REQUEST,
                        "validation_error",
                        format!("failed to read upload: {e}"),
                    )
                })?
                .to_vec();
            form.uploads.push(FileUpload { filename, content });
        } else {
            let value = field.text().await.map_err(|e| {
                json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    format!("failed to read field: {e}"),
                )
            })?;
            form.fields.insert(name, value);
        }
    }
    Ok(form)
}

/// Parse a path/form identifier into its typed newtype.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid id: {raw}")))
}
