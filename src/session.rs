//! Upload orchestration: one session, one loading flag, one result.
//!
//! [`ScanSession`] is the single owner of the loading flag and the current
//! [`AnalysisResult`]. The report layer only ever borrows the result.
//!
//! ## Upload sequence
//!
//! ```text
//! loading = true ─► result cleared ─► backend.analyze (single attempt)
//!                                       │
//!                      ┌── Ok ──────────┴────────── Err ──┐
//!                      ▼                                   ▼
//!               result stored                    notice raised
//!                      └──────────► loading = false ◄──────┘
//! ```
//!
//! The final step runs from a drop guard, so the flag is released on every
//! exit path, including when the caller drops the upload future mid-flight.
//! `upload` takes `&mut self`: a second upload on the same session cannot
//! start until the first one has returned.

use crate::backend::{AnalysisBackend, HttpBackend};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::events::{EventSink, NoopEvents};
use crate::model::AnalysisResult;
use crate::upload::PdfFile;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Owns the upload state for one user session.
pub struct ScanSession {
    backend: Arc<dyn AnalysisBackend>,
    events: EventSink,
    loading: bool,
    result: Option<AnalysisResult>,
}

impl ScanSession {
    /// Create a session from `config`.
    ///
    /// An injected backend wins; otherwise an [`HttpBackend`] is built from
    /// the endpoint settings.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let backend: Arc<dyn AnalysisBackend> = match &config.backend {
            Some(b) => Arc::clone(b),
            None => Arc::new(HttpBackend::from_config(config)?),
        };
        let events = config
            .events
            .clone()
            .unwrap_or_else(|| Arc::new(NoopEvents));
        Ok(Self::with_backend(backend, events))
    }

    pub fn with_backend(backend: Arc<dyn AnalysisBackend>, events: EventSink) -> Self {
        Self {
            backend,
            events,
            loading: false,
            result: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The current result, if the last upload succeeded.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn backend(&self) -> &Arc<dyn AnalysisBackend> {
        &self.backend
    }

    /// Upload `file` and store the analysis result.
    ///
    /// On failure the error is raised as a notice and also returned; the
    /// previous result has already been cleared and stays unset.
    pub async fn upload(&mut self, file: PdfFile) -> Result<&AnalysisResult, ScanError> {
        let _loading = LoadingGuard::engage(&mut self.loading, &self.events);
        self.result = None;

        let start = Instant::now();
        match self.backend.analyze(&file).await {
            Ok(result) => {
                info!(
                    "Analysis of '{}' complete: {} pages in {}ms",
                    file.name(),
                    result.pages().len(),
                    start.elapsed().as_millis()
                );
                let stored = self.result.insert(result);
                self.events.on_result(stored);
                Ok(&*stored)
            }
            Err(e) => {
                warn!("Upload of '{}' via {} failed: {}", file.name(), self.backend.name(), e);
                self.events.on_notice(&e);
                Err(e)
            }
        }
    }
}

/// Sets the loading flag on creation and clears it on drop.
struct LoadingGuard<'a> {
    loading: &'a mut bool,
    events: &'a EventSink,
}

impl<'a> LoadingGuard<'a> {
    fn engage(loading: &'a mut bool, events: &'a EventSink) -> Self {
        *loading = true;
        events.on_loading_changed(true);
        Self { loading, events }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.loading = false;
        self.events.on_loading_changed(false);
    }
}
