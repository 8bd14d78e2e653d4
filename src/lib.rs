//! # pdf-link-scan
//!
//! Upload a PDF to an image-link analysis backend and report which embedded
//! images carry clickable links.
//!
//! ## What lives here (and what doesn't)
//!
//! PDF parsing, image extraction and link detection all happen in a remote
//! service. This crate is the client: it validates and uploads the file,
//! parses the service's JSON answer, and turns it into a report with
//! per-page image listings, link details, statistics, a clickable-only
//! security view, and a `report.json` download.
//!
//! ## Flow Overview
//!
//! ```text
//! user
//!  │
//!  ├─ 1. Upload   UploadForm validates the declared type (application/pdf)
//!  ├─ 2. Session  ScanSession: loading on → POST multipart "file" → loading off
//!  ├─ 3. Model    AnalysisResult (pages → images → links)
//!  ├─ 4. Report   ReportView: stats, filter, labels, failed-image placeholders
//!  └─ 5. Actions  report.json, open image, open link
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_link_scan::{
//!     FailedImages, FileCandidate, PdfFile, ReportOptions, ReportView, ScanConfig, ScanSession,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::builder()
//!         .endpoint("http://localhost:8000/upload")
//!         .build()?;
//!     let mut session = ScanSession::new(&config)?;
//!
//!     let file = PdfFile::read(&FileCandidate::from_path("invoice.pdf"))?;
//!     let result = session.upload(file).await?;
//!
//!     let view = ReportView::build(result, &ReportOptions::security(), &FailedImages::new())?;
//!     println!("{view}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfscan` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod report;
pub mod session;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{AnalysisBackend, HttpBackend};
pub use config::{ReportOptions, ScanConfig, ScanConfigBuilder, DEFAULT_ENDPOINT};
pub use error::{ImageLoadError, ScanError};
pub use events::{EventSink, NoopEvents, ScanEvents};
pub use model::{AnalysisResult, BBox, ImageResult, LinkInfo, LinkKind, PageResult};
pub use report::{
    download_report, open_image, open_link, report_json, Badge, FailedImages, ImageDisplay,
    Opener, ReportStats, ReportView, SystemOpener,
};
pub use session::ScanSession;
pub use upload::{FileCandidate, PdfFile, UploadForm, PDF_MIME};
