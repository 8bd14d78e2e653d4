//! Per-report tracking of image URLs that failed to load.
//!
//! The set belongs to the rendering side, never to the result: it starts
//! empty for every report and is filled by load attempts. A URL leaves the
//! set only when a later attempt succeeds.

use crate::backend::AnalysisBackend;
use crate::error::ImageLoadError;
use crate::model::AnalysisResult;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::debug;

/// URLs whose image could not be loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailedImages {
    urls: HashSet<String>,
}

impl FailedImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_failed(&mut self, url: impl Into<String>) {
        self.urls.insert(url.into());
    }

    /// A successful load evicts the URL.
    pub fn mark_loaded(&mut self, url: &str) {
        self.urls.remove(url);
    }

    pub fn is_failed(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Try to load every distinct image URL in `result` and record outcomes.
    ///
    /// At most `concurrency` requests are in flight. Returns the failures
    /// from this pass, in completion order.
    pub async fn probe(
        &mut self,
        backend: &dyn AnalysisBackend,
        result: &AnalysisResult,
        concurrency: usize,
    ) -> Vec<ImageLoadError> {
        let mut seen = HashSet::new();
        let urls: Vec<&str> = result
            .images()
            .map(|img| img.url.as_str())
            .filter(|url| seen.insert(*url))
            .collect();
        debug!("Probing {} image URLs", urls.len());

        let outcomes: Vec<(&str, Result<(), ImageLoadError>)> = stream::iter(urls)
            .map(|url| async move { (url, backend.probe_image(url).await) })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut failures = Vec::new();
        for (url, outcome) in outcomes {
            match outcome {
                Ok(()) => self.mark_loaded(url),
                Err(e) => {
                    debug!("Image failed to load: {}", e);
                    self.mark_failed(url);
                    failures.push(e);
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::model::{ImageResult, PageResult};
    use crate::upload::PdfFile;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fails every URL containing "broken"; records each probe.
    struct PickyHost {
        probed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnalysisBackend for PickyHost {
        fn name(&self) -> &str {
            "picky"
        }

        async fn analyze(&self, _file: &PdfFile) -> Result<AnalysisResult, ScanError> {
            Ok(AnalysisResult::default())
        }

        async fn probe_image(&self, url: &str) -> Result<(), ImageLoadError> {
            self.probed.lock().unwrap().push(url.to_string());
            if url.contains("broken") {
                Err(ImageLoadError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            } else {
                Ok(())
            }
        }
    }

    fn image(url: &str) -> ImageResult {
        ImageResult {
            filename: "f.png".into(),
            url: url.into(),
            clickable_link_found: false,
            extracted_links: None,
            size: None,
            image_area: None,
        }
    }

    #[test]
    fn success_evicts_failure() {
        let mut failed = FailedImages::new();
        failed.mark_failed("http://x/a.png");
        assert!(failed.is_failed("http://x/a.png"));
        failed.mark_loaded("http://x/a.png");
        assert!(!failed.is_failed("http://x/a.png"));
        assert!(failed.is_empty());
    }

    #[tokio::test]
    async fn probe_records_failures_once_per_url() {
        let host = PickyHost {
            probed: Mutex::new(Vec::new()),
        };
        let result = AnalysisResult::new(vec![
            PageResult {
                page: 1,
                images: vec![image("http://x/ok.png"), image("http://x/broken.png")],
            },
            PageResult {
                page: 2,
                images: vec![image("http://x/broken.png")],
            },
        ]);

        let mut failed = FailedImages::new();
        failed.mark_failed("http://x/ok.png");
        let failures = failed.probe(&host, &result, 4).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].url(), "http://x/broken.png");
        assert!(failed.is_failed("http://x/broken.png"));
        assert!(!failed.is_failed("http://x/ok.png"));
        assert_eq!(failed.len(), 1);
        assert_eq!(host.probed.lock().unwrap().len(), 2);
    }
}
