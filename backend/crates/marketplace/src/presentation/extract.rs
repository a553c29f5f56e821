//! Request body collection.
//!
//! Create and update endpoints accept either `application/json` or
//! `multipart/form-data`. Multipart text fields are gathered into a
//! JSON object (repeated fields become arrays) and file fields are
//! persisted through the [`UploadStore`] before deserialization, so
//! handlers see one uniform shape regardless of the wire format.

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{FromRequest, Multipart, Request};
use http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use platform::upload::{MAX_UPLOAD_BYTES, UploadKind, UploadStore};

use crate::error::{MarketError, MarketResult};

/// A parsed request body: text fields plus stored upload paths
#[derive(Debug, Default)]
pub struct CollectedBody {
    fields: Map<String, Value>,
    uploads: HashMap<&'static str, Vec<String>>,
}

impl CollectedBody {
    /// Deserialize the text fields into a request DTO
    pub fn parse<T: DeserializeOwned>(&self) -> MarketResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|err| MarketError::Validation(err.to_string()))
    }

    /// Stored paths for one upload field, in arrival order
    pub fn uploads(&self, kind: UploadKind) -> &[String] {
        self.uploads
            .get(kind.field_name())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First stored path for one upload field
    pub fn upload(&self, kind: UploadKind) -> Option<&str> {
        self.uploads(kind).first().map(String::as_str)
    }

    fn push_field(&mut self, name: String, text: String) {
        match self.fields.get_mut(&name) {
            // Repeated field, promote to an array
            Some(Value::Array(items)) => items.push(Value::String(text)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(text)]);
            }
            None => {
                self.fields.insert(name, Value::String(text));
            }
        }
    }
}

/// Read the whole request body, storing any uploads on the way.
///
/// An empty JSON body is treated as an empty object so bodyless
/// requests (e.g. a rent with the default period) still parse.
pub async fn collect_body(store: &UploadStore, req: Request) -> MarketResult<CollectedBody> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        collect_multipart(store, req).await
    } else {
        collect_json(req.into_body()).await
    }
}

/// JSON-only variant for endpoints that never accept uploads.
pub async fn collect_json_body(req: Request) -> MarketResult<CollectedBody> {
    collect_json(req.into_body()).await
}

async fn collect_multipart(store: &UploadStore, req: Request) -> MarketResult<CollectedBody> {
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|err| MarketError::Validation(err.to_string()))?;

    let mut body = CollectedBody::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| MarketError::Validation(err.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match UploadKind::from_field_name(&name) {
            Some(kind) => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let mime = field.content_type().map(|m| m.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| MarketError::Validation(err.to_string()))?;
                let path = store
                    .store(kind, &file_name, mime.as_deref(), &bytes)
                    .await?;
                body.uploads.entry(kind.field_name()).or_default().push(path);
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| MarketError::Validation(err.to_string()))?;
                body.push_field(name, text);
            }
        }
    }

    Ok(body)
}

async fn collect_json(body: Body) -> MarketResult<CollectedBody> {
    let bytes = axum::body::to_bytes(body, MAX_UPLOAD_BYTES)
        .await
        .map_err(|err| MarketError::Validation(err.to_string()))?;

    if bytes.is_empty() {
        return Ok(CollectedBody::default());
    }

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|err| MarketError::Validation(format!("Invalid JSON body: {}", err)))?;
    let fields = match value {
        Value::Object(map) => map,
        _ => return Err(MarketError::Validation("Expected a JSON object".into())),
    };

    Ok(CollectedBody {
        fields,
        uploads: HashMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_fields_become_arrays() {
        let mut body = CollectedBody::default();
        body.push_field("tags".into(), "rust".into());
        body.push_field("tags".into(), "axum".into());
        body.push_field("title".into(), "hello".into());

        assert_eq!(
            body.fields.get("tags"),
            Some(&serde_json::json!(["rust", "axum"]))
        );
        assert_eq!(body.fields.get("title"), Some(&serde_json::json!("hello")));
    }

    #[tokio::test]
    async fn test_empty_json_body_parses_to_defaults() {
        let body = collect_json(Body::empty()).await.unwrap();
        let parsed: crate::presentation::dto::RentBookRequest = body.parse().unwrap();
        assert!(parsed.rental_period.is_none());
    }

    #[tokio::test]
    async fn test_non_object_json_rejected() {
        let err = collect_json(Body::from("[1,2,3]")).await.unwrap_err();
        assert!(matches!(err, MarketError::Validation(_)));
    }
}
