//! Error types for the pdf-link-scan library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ScanError`]: **Fatal** for the current action: the file was rejected,
//!   the upload failed, or the report could not be written. Returned as
//!   `Err(ScanError)` and mirrored as a user-visible notice.
//!
//! * [`ImageLoadError`]: **Non-fatal**: one image URL could not be fetched.
//!   It is recorded in [`crate::report::FailedImages`] and shown as an inline
//!   placeholder; the rest of the report is unaffected.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-link-scan library.
#[derive(Debug, Error)]
pub enum ScanError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// The candidate's declared type is not `application/pdf`.
    #[error("'{name}' is not a PDF (declared type: {declared})\nPlease choose a .pdf file.")]
    NotAPdf { name: String, declared: String },

    /// Submit was requested with no accepted file.
    #[error("No PDF selected. Select a file first.")]
    NothingSelected,

    /// A drop gesture carried no files at all.
    #[error("Nothing was dropped")]
    EmptyDrop,

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The request never produced a response (DNS, refused, reset, timeout).
    #[error("Upload to '{endpoint}' failed: {reason}\nCheck that the analysis backend is running.")]
    Transport { endpoint: String, reason: String },

    /// The backend answered with a non-2xx status. The body is not interpreted.
    #[error("Upload failed: backend answered HTTP {status}")]
    UploadRejected { status: u16 },

    /// The 2xx body was not a page list nor a page envelope.
    #[error("Backend returned a malformed analysis result: {detail}")]
    MalformedResponse { detail: String },

    // ── Report errors ─────────────────────────────────────────────────────
    /// Could not create or write `report.json`.
    #[error("Failed to write report '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The platform opener could not be launched for a target.
    #[error("Could not open '{target}': {reason}")]
    OpenFailed { target: String, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    /// True for errors raised while talking to the backend.
    ///
    /// These are the ones the orchestrator reports as "upload failed".
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScanError::Transport { .. }
                | ScanError::UploadRejected { .. }
                | ScanError::MalformedResponse { .. }
        )
    }
}

/// A non-fatal error for a single image URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageLoadError {
    /// The image host answered with a non-2xx status.
    #[error("{url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The image request failed before a response arrived.
    #[error("{url}: {reason}")]
    Unreachable { url: String, reason: String },
}

impl ImageLoadError {
    /// The URL that failed to load.
    pub fn url(&self) -> &str {
        match self {
            ImageLoadError::Status { url, .. } | ImageLoadError::Unreachable { url, .. } => url,
        }
    }
}
