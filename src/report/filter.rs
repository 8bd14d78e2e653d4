//! Borrowed per-page views over a result.

use crate::model::{AnalysisResult, ImageResult};

/// The images of one page selected for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'a> {
    pub page: u32,
    pub images: Vec<&'a ImageResult>,
}

/// Every page with every image, in input order.
pub fn all_images(result: &AnalysisResult) -> Vec<PageSlice<'_>> {
    result
        .pages()
        .iter()
        .map(|p| PageSlice {
            page: p.page,
            images: p.images.iter().collect(),
        })
        .collect()
}

/// Only images flagged `clickable_link_found`; pages left empty are dropped.
///
/// The underlying result is untouched, so downloads and raw output still
/// see every page.
pub fn clickable_only(result: &AnalysisResult) -> Vec<PageSlice<'_>> {
    result
        .pages()
        .iter()
        .filter_map(|p| {
            let images: Vec<&ImageResult> = p.clickable_images().collect();
            (!images.is_empty()).then_some(PageSlice {
                page: p.page,
                images,
            })
        })
        .collect()
}
