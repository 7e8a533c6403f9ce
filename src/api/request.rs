//! Replayable request descriptions
//!
//! A `reqwest::Request` with a multipart body cannot be cloned, so calls are
//! described by value and turned into a fresh `RequestBuilder` for every
//! attempt.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;

/// File carried in a multipart body.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read a file from disk, naming the part after its final path component.
    pub fn from_path(path: &std::path::Path) -> Result<Self, ApiError> {
        let bytes = std::fs::read(path).map_err(|e| {
            ApiError::InvalidRequest(format!("cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Ok(Self {
            mime: mime_guess::from_path(path).first_or_octet_stream().to_string(),
            file_name,
            bytes,
        })
    }
}

/// Multipart form kept as plain data so it can be rebuilt.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, Attachment)>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn file(mut self, name: &str, attachment: Attachment) -> Self {
        self.files.push((name.to_string(), attachment));
        self
    }

    fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for (name, file) in &self.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime)
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            form = form.part(name.clone(), part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

/// One logical call against the API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, with leading and trailing slash
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Set once the call has been replayed after a token refresh
    pub(crate) retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter; `None` is left out entirely.
    pub fn query(mut self, key: &str, value: Option<impl ToString>) -> Self {
        if let Some(v) = value {
            self.query.push((key.to_string(), v.to_string()));
        }
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }

    pub fn is_retry(&self) -> bool {
        self.retried
    }

    /// Build a transport request. Authorization is attached by the caller.
    pub(crate) fn build(
        &self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = format!("{}{}", base_url, self.path);
        let mut builder = http.request(self.method.clone(), &url);
        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        builder = match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(body) => builder.multipart(body.to_form()?),
        };
        Ok(builder)
    }
}
