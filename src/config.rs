//! Configuration types for uploading and reporting.
//!
//! All behaviour is controlled through [`ScanConfig`], built via its
//! [`ScanConfigBuilder`]. Which parts of the report are shown is a separate,
//! cheap-to-copy [`ReportOptions`] value so a caller can re-render the same
//! result with different capabilities without touching the session.

use crate::backend::AnalysisBackend;
use crate::error::ScanError;
use crate::events::EventSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/upload";

/// Multipart field the backend reads the PDF from.
pub const DEFAULT_FIELD_NAME: &str = "file";

/// Configuration for a scan session.
///
/// Built via [`ScanConfig::builder()`] or using [`ScanConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_link_scan::ScanConfig;
///
/// let config = ScanConfig::builder()
///     .endpoint("https://scanner.example.com/upload")
///     .probe_concurrency(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ScanConfig {
    /// Full URL of the analysis endpoint. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Multipart field name carrying the PDF bytes. Default: `"file"`.
    pub field_name: String,

    /// Request timeout in seconds. Default: None (wait indefinitely).
    ///
    /// The upload is a single attempt; a timeout surfaces as a transport
    /// failure like any other.
    pub timeout_secs: Option<u64>,

    /// Pre-constructed backend. Takes precedence over `endpoint`.
    pub backend: Option<Arc<dyn AnalysisBackend>>,

    /// Receiver for notices and loading transitions. Default: None.
    pub events: Option<EventSink>,

    /// How many image URLs to probe at once when checking image loads. Default: 8.
    pub probe_concurrency: usize,

    /// Report capabilities. Default: [`ReportOptions::default()`].
    pub report: ReportOptions,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            timeout_secs: None,
            backend: None,
            events: None,
            probe_concurrency: 8,
            report: ReportOptions::default(),
        }
    }
}

impl fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfig")
            .field("endpoint", &self.endpoint)
            .field("field_name", &self.field_name)
            .field("timeout_secs", &self.timeout_secs)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn AnalysisBackend>"))
            .field("events", &self.events.as_ref().map(|_| "<dyn ScanEvents>"))
            .field("probe_concurrency", &self.probe_concurrency)
            .field("report", &self.report)
            .finish()
    }
}

impl ScanConfig {
    /// Create a new builder for `ScanConfig`.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ScanConfig`].
#[derive(Debug)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.config.field_name = name.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn AnalysisBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn events(mut self, events: EventSink) -> Self {
        self.config.events = Some(events);
        self
    }

    pub fn probe_concurrency(mut self, n: usize) -> Self {
        self.config.probe_concurrency = n.max(1);
        self
    }

    pub fn report(mut self, options: ReportOptions) -> Self {
        self.config.report = options;
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// The endpoint is only checked when no backend was injected.
    pub fn build(self) -> Result<ScanConfig, ScanError> {
        let c = &self.config;
        if c.backend.is_none()
            && !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://"))
        {
            return Err(ScanError::InvalidConfig(format!(
                "endpoint must be an http:// or https:// URL, got '{}'",
                c.endpoint
            )));
        }
        if c.field_name.trim().is_empty() {
            return Err(ScanError::InvalidConfig(
                "multipart field name must not be empty".into(),
            ));
        }
        if c.timeout_secs == Some(0) {
            return Err(ScanError::InvalidConfig("timeout must be ≥ 1s".into()));
        }
        Ok(self.config)
    }
}

// ── Report capabilities ──────────────────────────────────────────────────

/// Which capabilities the unified report view turns on.
///
/// | Preset | Filter | Stats | Link details | Raw JSON |
/// |--------|--------|-------|--------------|----------|
/// | [`ReportOptions::default`]  | all images | ✓ | ✓ | - |
/// | [`ReportOptions::gallery`]  | all images | - | - | - |
/// | [`ReportOptions::security`] | clickable only | ✓ | ✓ | ✓ |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Show only images flagged with a clickable link; empty pages are dropped.
    pub clickable_only: bool,
    /// Show the pages / images / clickable / detection-rate summary.
    pub show_stats: bool,
    /// Show one entry per extracted link with its label and metadata.
    pub show_link_details: bool,
    /// Append the full unfiltered result as pretty JSON.
    pub show_raw: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            clickable_only: false,
            show_stats: true,
            show_link_details: true,
            show_raw: false,
        }
    }
}

impl ReportOptions {
    /// Plain per-page image listing with badges.
    pub fn gallery() -> Self {
        Self {
            clickable_only: false,
            show_stats: false,
            show_link_details: false,
            show_raw: false,
        }
    }

    /// Clickable images only, with statistics and the raw log.
    pub fn security() -> Self {
        Self {
            clickable_only: true,
            show_stats: true,
            show_link_details: true,
            show_raw: true,
        }
    }
}
