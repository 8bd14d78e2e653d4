//! The analysis backend seam.
//!
//! All PDF parsing, image extraction and link detection happen in a remote
//! service. This module hides that service behind [`AnalysisBackend`] so the
//! session can be driven by a stub in tests, and provides [`HttpBackend`],
//! the reqwest implementation that speaks the real wire format:
//!
//! ```text
//! POST <endpoint>                 multipart/form-data, field "file" = PDF bytes
//!   2xx  → JSON array of pages (or {"pages": [...]} envelope)
//!   else → failure, body ignored
//! GET  <origin>/health            2xx when the service is up
//! GET  <image url>                the extracted image itself
//! ```

use crate::config::ScanConfig;
use crate::error::{ImageLoadError, ScanError};
use crate::model::AnalysisResult;
use crate::upload::PdfFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

/// Something that turns a PDF into an [`AnalysisResult`].
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Short human-readable identifier used in logs.
    fn name(&self) -> &str;

    /// Submit one PDF for analysis. Exactly one attempt, no retry.
    async fn analyze(&self, file: &PdfFile) -> Result<AnalysisResult, ScanError>;

    /// Check whether an extracted image can be fetched.
    ///
    /// The default assumes every image loads.
    async fn probe_image(&self, url: &str) -> Result<(), ImageLoadError> {
        let _ = url;
        Ok(())
    }
}

/// The HTTP analysis backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
    field_name: String,
}

impl HttpBackend {
    /// Build a backend from the endpoint, field name and timeout in `config`.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ScanError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            field_name: config.field_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of the service health check, derived from the endpoint's origin.
    pub fn health_url(&self) -> Result<String, ScanError> {
        let mut url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| ScanError::InvalidConfig(format!("bad endpoint URL: {e}")))?;
        url.set_path("/health");
        url.set_query(None);
        url.set_fragment(None);
        Ok(url.to_string())
    }

    /// Ask the service whether it is up. Non-2xx answers yield `Ok(false)`.
    pub async fn health(&self) -> Result<bool, ScanError> {
        let url = self.health_url()?;
        debug!("Health check: {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(response.status().is_success())
    }

    fn transport_error(&self, e: reqwest::Error) -> ScanError {
        let reason = if e.is_timeout() {
            "request timed out".to_string()
        } else if e.is_connect() {
            format!("connection failed: {e}")
        } else {
            e.to_string()
        };
        ScanError::Transport {
            endpoint: self.endpoint.clone(),
            reason,
        }
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.endpoint
    }

    async fn analyze(&self, file: &PdfFile) -> Result<AnalysisResult, ScanError> {
        info!(
            "Uploading '{}' ({} bytes) to {}",
            file.name(),
            file.len(),
            self.endpoint
        );

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime())
            .map_err(|e| ScanError::Internal(format!("Invalid MIME type: {e}")))?;
        let form = Form::new().part(self.field_name.clone(), part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::UploadRejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        debug!("Received {} byte analysis body", body.len());

        AnalysisResult::from_json(&body)
    }

    async fn probe_image(&self, url: &str) -> Result<(), ImageLoadError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| ImageLoadError::Unreachable {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ImageLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}
