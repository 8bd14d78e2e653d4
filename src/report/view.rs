//! The report view model and its text rendering.
//!
//! [`ReportView::build`] is a pure function of the result, the chosen
//! [`ReportOptions`], and the current [`FailedImages`]. Rendering the view
//! with `Display` produces the terminal report.

use crate::config::ReportOptions;
use crate::error::ScanError;
use crate::model::{AnalysisResult, BBox, ImageResult, LinkInfo, LinkKind};
use crate::report::actions::report_json;
use crate::report::failed::FailedImages;
use crate::report::filter::{all_images, clickable_only};
use crate::report::labels::{link_icon, link_label};
use crate::report::stats::ReportStats;
use std::fmt;

/// A fully resolved report, ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    /// Present when statistics are enabled.
    pub stats: Option<ReportStats>,
    pub clickable_only: bool,
    pub sections: Vec<PageSection>,
    /// Pretty JSON of the unfiltered result, when the raw log is enabled.
    pub raw: Option<String>,
}

/// One page of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSection {
    pub page: u32,
    pub cards: Vec<ImageCard>,
}

/// One image of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCard {
    pub filename: String,
    pub url: String,
    pub display: ImageDisplay,
    pub badge: Badge,
    /// Formatted `image_area`, e.g. `[0.0, 0.0, 100.5, 50.0]`.
    pub area: Option<String>,
    pub size: Option<u64>,
    /// Empty unless link details are enabled.
    pub links: Vec<LinkButton>,
}

/// What the image slot of a card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDisplay {
    Image { url: String },
    FailedPlaceholder,
}

/// Clickable-link badge, copied straight from the backend flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    ClickableLinkDetected,
    NoLinksFound,
}

impl Badge {
    pub fn from_flag(clickable_link_found: bool) -> Self {
        if clickable_link_found {
            Badge::ClickableLinkDetected
        } else {
            Badge::NoLinksFound
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Badge::ClickableLinkDetected => "⚠️ Clickable Link(s) Detected",
            Badge::NoLinksFound => "✅ No Links Found",
        }
    }
}

/// One extracted link, rendered as an "open" action.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkButton {
    pub kind: LinkKind,
    pub icon: &'static str,
    pub label: String,
    /// What the open action hands to the opener.
    pub target: String,
    pub description: Option<String>,
    /// Formatted confidence, e.g. `87.5%`.
    pub confidence: Option<String>,
    /// Formatted `bbox`.
    pub position: Option<String>,
}

impl ReportView {
    pub fn build(
        result: &AnalysisResult,
        options: &ReportOptions,
        failed: &FailedImages,
    ) -> Result<Self, ScanError> {
        let slices = if options.clickable_only {
            clickable_only(result)
        } else {
            all_images(result)
        };

        let sections = slices
            .into_iter()
            .map(|slice| PageSection {
                page: slice.page,
                cards: slice
                    .images
                    .into_iter()
                    .map(|img| ImageCard::build(img, options, failed))
                    .collect(),
            })
            .collect();

        let raw = if options.show_raw {
            Some(report_json(result)?)
        } else {
            None
        };

        Ok(Self {
            stats: options.show_stats.then(|| ReportStats::compute(result)),
            clickable_only: options.clickable_only,
            sections,
            raw,
        })
    }

    /// Number of image cards across all sections.
    pub fn card_count(&self) -> usize {
        self.sections.iter().map(|s| s.cards.len()).sum()
    }

    /// The terminal report as a string. Same as `to_string()`.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl ImageCard {
    fn build(img: &ImageResult, options: &ReportOptions, failed: &FailedImages) -> Self {
        let display = if failed.is_failed(&img.url) {
            ImageDisplay::FailedPlaceholder
        } else {
            ImageDisplay::Image {
                url: img.url.clone(),
            }
        };
        let links = if options.show_link_details {
            img.links().iter().map(LinkButton::build).collect()
        } else {
            Vec::new()
        };
        Self {
            filename: img.filename.clone(),
            url: img.url.clone(),
            display,
            badge: Badge::from_flag(img.clickable_link_found),
            area: img.image_area.as_ref().map(format_bbox),
            size: img.size,
            links,
        }
    }
}

impl LinkButton {
    fn build(link: &LinkInfo) -> Self {
        let kind = link.kind();
        Self {
            icon: link_icon(&kind),
            label: link_label(&kind),
            kind,
            target: link.content.clone(),
            description: link.description.clone(),
            // zero confidence is treated as "not reported"
            confidence: link
                .confidence
                .filter(|c| *c != 0.0)
                .map(|c| format!("{:.1}%", c * 100.0)),
            position: link.bbox.as_ref().map(format_bbox),
        }
    }
}

fn format_bbox(b: &BBox) -> String {
    format!("[{:.1}, {:.1}, {:.1}, {:.1}]", b[0], b[1], b[2], b[3])
}

// ── Text rendering ───────────────────────────────────────────────────────

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.clickable_only {
            "Security Report: Images With Clickable Links"
        } else {
            "Extraction Results"
        };
        writeln!(f, "{title}")?;
        writeln!(f, "{}", "=".repeat(title.chars().count()))?;

        if let Some(s) = &self.stats {
            writeln!(
                f,
                "Pages Scanned: {}   Images Found: {}   Clickable: {}   Detection Rate: {:.1}%",
                s.total_pages, s.total_images, s.clickable_images, s.detection_rate
            )?;
        }

        if self.sections.is_empty() {
            writeln!(f)?;
            if self.clickable_only {
                writeln!(f, "No clickable links detected.")?;
            } else {
                writeln!(f, "No pages in result.")?;
            }
        }

        for section in &self.sections {
            writeln!(f)?;
            write!(f, "{section}")?;
        }

        if let Some(raw) = &self.raw {
            writeln!(f)?;
            writeln!(f, "Raw result")?;
            writeln!(f, "----------")?;
            writeln!(f, "{raw}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PageSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Page {} - {} image(s)", self.page, self.cards.len())?;
        for (idx, card) in self.cards.iter().enumerate() {
            writeln!(f, "  [{}] {}", idx + 1, card.filename)?;
            match &card.display {
                ImageDisplay::Image { url } => writeln!(f, "      {url}")?,
                ImageDisplay::FailedPlaceholder => writeln!(f, "      [Failed to load image]")?,
            }
            if let Some(area) = &card.area {
                writeln!(f, "      Area: {area}")?;
            }
            if let Some(size) = card.size {
                writeln!(f, "      Size: {size} bytes")?;
            }
            writeln!(f, "      {}", card.badge.text())?;
            if !card.links.is_empty() {
                writeln!(f, "      Detected Links ({})", card.links.len())?;
                for link in &card.links {
                    writeln!(f, "        {} {} → {}", link.icon, link.label, link.target)?;
                    if let Some(d) = &link.description {
                        writeln!(f, "           {d}")?;
                    }
                    if let Some(c) = &link.confidence {
                        writeln!(f, "           Confidence: {c}")?;
                    }
                    if let Some(p) = &link.position {
                        writeln!(f, "           Position: {p}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageResult;

    fn link(tag: &str, content: &str) -> LinkInfo {
        LinkInfo {
            link_type: tag.into(),
            content: content.into(),
            description: None,
            confidence: None,
            bbox: None,
        }
    }

    fn image(name: &str, clickable: bool, links: Option<Vec<LinkInfo>>) -> ImageResult {
        ImageResult {
            filename: name.into(),
            url: format!("http://x/{name}"),
            clickable_link_found: clickable,
            extracted_links: links,
            size: None,
            image_area: None,
        }
    }

    #[test]
    fn badge_follows_flag_not_links() {
        // flag false despite a link: the badge must not recompute
        let r = AnalysisResult::new(vec![PageResult {
            page: 1,
            images: vec![image("a.png", false, Some(vec![link("url", "http://y")]))],
        }]);
        let v = ReportView::build(&r, &ReportOptions::default(), &FailedImages::new()).unwrap();
        assert_eq!(v.sections[0].cards[0].badge, Badge::NoLinksFound);
        assert_eq!(v.sections[0].cards[0].links.len(), 1);
    }

    #[test]
    fn failed_urls_show_placeholder() {
        let r = AnalysisResult::new(vec![PageResult {
            page: 1,
            images: vec![image("a.png", false, None), image("b.png", false, None)],
        }]);
        let mut failed = FailedImages::new();
        failed.mark_failed("http://x/b.png");
        let v = ReportView::build(&r, &ReportOptions::gallery(), &failed).unwrap();
        let cards = &v.sections[0].cards;
        assert_eq!(
            cards[0].display,
            ImageDisplay::Image {
                url: "http://x/a.png".into()
            }
        );
        assert_eq!(cards[1].display, ImageDisplay::FailedPlaceholder);
        assert!(v.to_string().contains("[Failed to load image]"));
    }

    #[test]
    fn link_metadata_is_formatted() {
        let mut l = link("pdf_structural", "https://target.example");
        l.description = Some("Annotation over image".into());
        l.confidence = Some(0.875);
        l.bbox = Some([1.0, 2.5, 3.0, 4.0]);
        let mut zero = link("text", "hello");
        zero.confidence = Some(0.0);

        let r = AnalysisResult::new(vec![PageResult {
            page: 7,
            images: vec![image("a.png", true, Some(vec![l, zero]))],
        }]);
        let v = ReportView::build(&r, &ReportOptions::default(), &FailedImages::new()).unwrap();
        let buttons = &v.sections[0].cards[0].links;
        assert_eq!(buttons[0].label, "PDF Link");
        assert_eq!(buttons[0].confidence.as_deref(), Some("87.5%"));
        assert_eq!(buttons[0].position.as_deref(), Some("[1.0, 2.5, 3.0, 4.0]"));
        assert_eq!(buttons[1].confidence, None);

        let text = v.to_string();
        assert!(text.contains("Page 7 - 1 image(s)"), "got:\n{text}");
        assert!(text.contains("Annotation over image"));
        assert!(text.contains("Confidence: 87.5%"));
    }

    #[test]
    fn gallery_hides_stats_and_links() {
        let r = AnalysisResult::new(vec![PageResult {
            page: 1,
            images: vec![image("a.png", true, Some(vec![link("url", "http://y")]))],
        }]);
        let v = ReportView::build(&r, &ReportOptions::gallery(), &FailedImages::new()).unwrap();
        assert!(v.stats.is_none());
        assert!(v.raw.is_none());
        assert!(v.sections[0].cards[0].links.is_empty());
        assert!(!v.to_string().contains("Pages Scanned"));
    }

    #[test]
    fn empty_security_view_says_so() {
        let r = AnalysisResult::new(vec![PageResult {
            page: 1,
            images: vec![image("a.png", false, None)],
        }]);
        let v = ReportView::build(&r, &ReportOptions::security(), &FailedImages::new()).unwrap();
        assert!(v.sections.is_empty());
        let text = v.to_string();
        assert!(text.contains("No clickable links detected."));
        // raw log still carries the unfiltered result
        assert!(text.contains("\"a.png\""));
    }
}
