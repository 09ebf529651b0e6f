//! Raw submission fields, collected from whichever body encoding was sent.

use std::collections::HashMap;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::{Form, Json};
use serde_json::Value;
use stepguide_models::UploadedFile;

use crate::error::{ApiError, ApiResult};

/// Submission fields before mode resolution and validation.
///
/// Blank text fields are stored as `None`.
#[derive(Debug, Default, Clone)]
pub struct SubmissionForm {
    /// A `file` part that carried a filename
    pub file: Option<UploadedFile>,
    /// A `file` field sent as plain text
    pub file_field: Option<String>,
    pub video_url: Option<String>,
    pub guide_id: Option<String>,
    pub callback_url: Option<String>,
}

impl SubmissionForm {
    /// Read the body as multipart, JSON or urlencoded form depending on `Content-Type`.
    ///
    /// Bodies of any other type contribute no fields.
    pub async fn from_request(request: Request) -> ApiResult<Self> {
        let content_type = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid multipart request: {}", e)))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/json") || content_type.contains("+json") {
            let Json(body) = Json::<Value>::from_request(request, &())
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e.body_text())))?;
            Ok(Self::from_json(&body))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid form body: {}", e.body_text())))?;
            Ok(Self::from_fields(fields))
        } else {
            Ok(Self::default())
        }
    }

    /// Collect fields from a JSON object. Strings and numbers are accepted.
    pub fn from_json(body: &Value) -> Self {
        let field = |name: &str| body.get(name).and_then(text_value);
        Self {
            file: None,
            file_field: field("file"),
            video_url: field("video_url"),
            guide_id: field("guide_id"),
            callback_url: field("callback_url"),
        }
    }

    /// Collect fields from urlencoded key/value pairs.
    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        let mut take = |name: &str| fields.remove(name).and_then(non_blank);
        Self {
            file: None,
            file_field: take("file"),
            video_url: take("video_url"),
            guide_id: take("guide_id"),
            callback_url: take("callback_url"),
        }
    }

    /// Collect fields from a multipart body. Only one `file` part may carry a file.
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" if field.file_name().is_some() => {
                    if form.file.is_some() {
                        return Err(ApiError::upload("Only one file may be uploaded per request"));
                    }
                    form.file = Some(read_file(field).await?);
                }
                "file" => form.file_field = read_text(field).await?,
                "video_url" => form.video_url = read_text(field).await?,
                "guide_id" => form.guide_id = read_text(field).await?,
                "callback_url" => form.callback_url = read_text(field).await?,
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_file(field: Field<'_>) -> ApiResult<UploadedFile> {
    let filename = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(UploadedFile::new(bytes.to_vec(), content_type, filename))
}

async fn read_text(field: Field<'_>) -> ApiResult<Option<String>> {
    let text = field.text().await.map_err(multipart_error)?;
    Ok(non_blank(text))
}

fn multipart_error(error: MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::upload("File too large")
    } else {
        ApiError::bad_request(format!("Malformed multipart body: {}", error.body_text()))
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
