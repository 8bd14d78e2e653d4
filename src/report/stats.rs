//! Aggregate statistics over a whole result.

use crate::model::AnalysisResult;
use serde::Serialize;

/// Counts shown at the top of a report.
///
/// Always computed over the unfiltered result, so pages without images
/// still count as scanned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportStats {
    pub total_pages: usize,
    pub total_images: usize,
    pub clickable_images: usize,
    /// `clickable_images / total_images` as a percentage; 0 with no images.
    pub detection_rate: f64,
}

impl ReportStats {
    pub fn compute(result: &AnalysisResult) -> Self {
        let total_pages = result.pages().len();
        let total_images = result.pages().iter().map(|p| p.images.len()).sum();
        let clickable_images = result
            .pages()
            .iter()
            .map(|p| p.clickable_images().count())
            .sum();

        let detection_rate = if total_images == 0 {
            0.0
        } else {
            clickable_images as f64 / total_images as f64 * 100.0
        };

        Self {
            total_pages,
            total_images,
            clickable_images,
            detection_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageResult, PageResult};

    fn image(clickable: bool) -> ImageResult {
        ImageResult {
            filename: "i.png".into(),
            url: "http://x/i.png".into(),
            clickable_link_found: clickable,
            extracted_links: None,
            size: None,
            image_area: None,
        }
    }

    #[test]
    fn empty_result_has_zero_rate() {
        let s = ReportStats::compute(&AnalysisResult::default());
        assert_eq!(s.total_pages, 0);
        assert_eq!(s.total_images, 0);
        assert_eq!(s.clickable_images, 0);
        assert_eq!(s.detection_rate, 0.0);
        assert!(!s.detection_rate.is_nan());
    }

    #[test]
    fn pages_without_images_still_count() {
        let r = AnalysisResult::new(vec![
            PageResult {
                page: 1,
                images: vec![image(true), image(false), image(false), image(true)],
            },
            PageResult {
                page: 2,
                images: vec![],
            },
        ]);
        let s = ReportStats::compute(&r);
        assert_eq!(s.total_pages, 2);
        assert_eq!(s.total_images, 4);
        assert_eq!(s.clickable_images, 2);
        assert!((s.detection_rate - 50.0).abs() < f64::EPSILON);
    }
}
