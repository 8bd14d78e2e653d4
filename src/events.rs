//! Observer trait for user-visible scan events.
//!
//! Inject an [`Arc<dyn ScanEvents>`] via
//! [`crate::config::ScanConfigBuilder::events`] to receive notices, loading
//! transitions, and finished results. The CLI turns these into a spinner and
//! coloured messages; tests record them to check ordering.
//!
//! # Example
//!
//! ```rust
//! use pdf_link_scan::{ScanConfig, ScanEvents};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingEvents {
//!     notices: AtomicUsize,
//! }
//!
//! impl ScanEvents for CountingEvents {
//!     fn on_notice(&self, error: &pdf_link_scan::ScanError) {
//!         self.notices.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{error}");
//!     }
//! }
//!
//! let events = Arc::new(CountingEvents { notices: AtomicUsize::new(0) });
//! let config = ScanConfig::builder()
//!     .events(events as Arc<dyn ScanEvents>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::ScanError;
use crate::model::AnalysisResult;
use std::sync::Arc;

/// Receives scan events from the upload form and the session.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ScanEvents: Send + Sync {
    /// A candidate file passed validation and is now held for submission.
    fn on_file_accepted(&self, name: &str) {
        let _ = name;
    }

    /// A blocking, user-visible notice: rejected file or failed upload.
    fn on_notice(&self, error: &ScanError) {
        let _ = error;
    }

    /// The loading flag changed. Called with `true` before the request is
    /// sent and with `false` on every exit path afterwards.
    fn on_loading_changed(&self, loading: bool) {
        let _ = loading;
    }

    /// A new analysis result is stored and ready to render.
    fn on_result(&self, result: &AnalysisResult) {
        let _ = result;
    }
}

/// A no-op implementation for callers that don't need events.
///
/// This is the default when no sink is configured.
pub struct NoopEvents;

impl ScanEvents for NoopEvents {}

/// Convenience alias matching the type stored in [`crate::config::ScanConfig`].
pub type EventSink = Arc<dyn ScanEvents>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TrackingEvents {
        accepted: Mutex<Vec<String>>,
        notices: AtomicUsize,
        loading: Mutex<Vec<bool>>,
        results: AtomicUsize,
    }

    impl ScanEvents for TrackingEvents {
        fn on_file_accepted(&self, name: &str) {
            self.accepted.lock().unwrap().push(name.to_string());
        }

        fn on_notice(&self, _error: &ScanError) {
            self.notices.fetch_add(1, Ordering::SeqCst);
        }

        fn on_loading_changed(&self, loading: bool) {
            self.loading.lock().unwrap().push(loading);
        }

        fn on_result(&self, _result: &AnalysisResult) {
            self.results.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_events_do_not_panic() {
        let ev = NoopEvents;
        ev.on_file_accepted("a.pdf");
        ev.on_notice(&ScanError::NothingSelected);
        ev.on_loading_changed(true);
        ev.on_loading_changed(false);
        ev.on_result(&AnalysisResult::default());
    }

    #[test]
    fn tracking_events_receive_calls() {
        let tracker = TrackingEvents {
            accepted: Mutex::new(Vec::new()),
            notices: AtomicUsize::new(0),
            loading: Mutex::new(Vec::new()),
            results: AtomicUsize::new(0),
        };

        tracker.on_file_accepted("report.pdf");
        tracker.on_loading_changed(true);
        tracker.on_result(&AnalysisResult::default());
        tracker.on_loading_changed(false);
        tracker.on_notice(&ScanError::UploadRejected { status: 500 });

        assert_eq!(*tracker.accepted.lock().unwrap(), vec!["report.pdf"]);
        assert_eq!(*tracker.loading.lock().unwrap(), vec![true, false]);
        assert_eq!(tracker.results.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.notices.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_events_work() {
        let ev: EventSink = Arc::new(NoopEvents);
        ev.on_loading_changed(true);
        ev.on_loading_changed(false);
    }
}
