//! Analysis result types returned by the backend.
//!
//! The backend produces the whole [`AnalysisResult`] in one response. It is
//! never mutated after parsing: the report layer borrows it for display and
//! serialises it back verbatim for `report.json`.
//!
//! Field names follow the backend's snake_case JSON. Older backend builds
//! used different names for two fields, so those are accepted as aliases on
//! input; output always uses the canonical names.

use crate::error::ScanError;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// Four coordinates `[x0, y0, x1, y1]` in PDF user space.
pub type BBox = [f64; 4];

/// The full backend answer: one entry per PDF page, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    pages: Vec<PageResult>,
}

/// One PDF page's extraction outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-based page number, assigned by the backend.
    pub page: u32,
    /// Images extracted from the page, in backend order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<ImageResult>,
}

/// One embedded image's extraction outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawImageResult")]
pub struct ImageResult {
    pub filename: String,
    /// Backend-hosted location of the extracted image.
    pub url: String,
    /// Whether the backend found at least one clickable link for this image.
    pub clickable_link_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_links: Option<Vec<LinkInfo>>,
    /// Size of the extracted image in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_area: Option<BBox>,
}

/// Wire form of [`ImageResult`] holding every spelling a backend may use.
///
/// Several spellings can appear in one object; the canonical name wins,
/// then the aliases in declaration order.
#[derive(Deserialize)]
struct RawImageResult {
    filename: String,
    url: String,
    #[serde(default)]
    clickable_link_found: Option<bool>,
    #[serde(default)]
    clickable_links_found: Option<bool>,
    #[serde(default)]
    has_links: Option<bool>,
    #[serde(default)]
    extracted_links: Option<Vec<LinkInfo>>,
    #[serde(default)]
    links: Option<Vec<LinkInfo>>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    image_area: Option<BBox>,
}

impl From<RawImageResult> for ImageResult {
    fn from(raw: RawImageResult) -> Self {
        Self {
            filename: raw.filename,
            url: raw.url,
            clickable_link_found: raw
                .clickable_link_found
                .or(raw.clickable_links_found)
                .or(raw.has_links)
                .unwrap_or(false),
            extracted_links: raw.extracted_links.or(raw.links),
            size: raw.size,
            image_area: raw.image_area,
        }
    }
}

/// `null` and a missing key both mean "no items".
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One link detected in or over an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkInfo {
    /// Raw type tag as sent by the backend. See [`LinkInfo::kind`].
    #[serde(rename = "type")]
    pub link_type: String,
    /// Link target.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Detector confidence in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}

/// Parsed form of [`LinkInfo::link_type`].
///
/// Unrecognised tags are kept verbatim in [`LinkKind::Other`] so nothing is
/// lost when the result is written back to disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Link annotation whose rectangle overlaps the image.
    PdfStructural,
    /// Link annotation found elsewhere on the same page.
    PdfStructuralGlobal,
    Url,
    Text,
    Qr,
    PdfWidgetUri,
    PdfWidgetLaunch,
    PdfWidgetGotoR,
    Other(String),
}

impl LinkKind {
    /// Parse a backend tag. Matching is exact.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "pdf_structural" => LinkKind::PdfStructural,
            "pdf_structural_global" => LinkKind::PdfStructuralGlobal,
            "url" => LinkKind::Url,
            "text" => LinkKind::Text,
            "qr" => LinkKind::Qr,
            "pdf_widget_uri" => LinkKind::PdfWidgetUri,
            "pdf_widget_launch" => LinkKind::PdfWidgetLaunch,
            "pdf_widget_gotor" => LinkKind::PdfWidgetGotoR,
            other => LinkKind::Other(other.to_string()),
        }
    }

    /// The backend tag for this kind.
    pub fn as_tag(&self) -> &str {
        match self {
            LinkKind::PdfStructural => "pdf_structural",
            LinkKind::PdfStructuralGlobal => "pdf_structural_global",
            LinkKind::Url => "url",
            LinkKind::Text => "text",
            LinkKind::Qr => "qr",
            LinkKind::PdfWidgetUri => "pdf_widget_uri",
            LinkKind::PdfWidgetLaunch => "pdf_widget_launch",
            LinkKind::PdfWidgetGotoR => "pdf_widget_gotor",
            LinkKind::Other(tag) => tag,
        }
    }
}

impl LinkInfo {
    pub fn kind(&self) -> LinkKind {
        LinkKind::from_tag(&self.link_type)
    }
}

impl ImageResult {
    /// Links reported for this image, empty when the backend sent none.
    pub fn links(&self) -> &[LinkInfo] {
        self.extracted_links.as_deref().unwrap_or(&[])
    }

    /// Check the backend contract "flag set iff link list non-empty".
    ///
    /// Returns `true` when the backend sent no link list at all, since the
    /// flag cannot be checked against anything.
    pub fn flag_matches_links(&self) -> bool {
        match &self.extracted_links {
            Some(links) => self.clickable_link_found == !links.is_empty(),
            None => true,
        }
    }
}

impl PageResult {
    /// Images on this page flagged with a clickable link.
    pub fn clickable_images(&self) -> impl Iterator<Item = &ImageResult> {
        self.images.iter().filter(|img| img.clickable_link_found)
    }
}

impl AnalysisResult {
    pub fn new(pages: Vec<PageResult>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[PageResult] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All images across all pages, in page order.
    pub fn images(&self) -> impl Iterator<Item = &ImageResult> {
        self.pages.iter().flat_map(|p| p.images.iter())
    }

    /// Parse a successful backend response body.
    ///
    /// Accepts either a bare JSON array of pages or an object carrying the
    /// array under `"pages"` (other envelope fields are ignored).
    pub fn from_json(body: &[u8]) -> Result<Self, ScanError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| ScanError::MalformedResponse {
                detail: e.to_string(),
            })?;

        let pages_value = match value {
            arr @ serde_json::Value::Array(_) => arr,
            serde_json::Value::Object(mut map) => {
                map.remove("pages").ok_or_else(|| ScanError::MalformedResponse {
                    detail: "object response has no \"pages\" field".into(),
                })?
            }
            other => {
                return Err(ScanError::MalformedResponse {
                    detail: format!("expected an array of pages, got {}", json_kind(&other)),
                })
            }
        };

        let pages: Vec<PageResult> =
            serde_json::from_value(pages_value).map_err(|e| ScanError::MalformedResponse {
                detail: e.to_string(),
            })?;

        let result = Self { pages };
        for page in result.pages() {
            for img in &page.images {
                if !img.flag_matches_links() {
                    warn!(
                        "Page {}: '{}' has clickable_link_found={} but {} extracted link(s)",
                        page.page,
                        img.filename,
                        img.clickable_link_found,
                        img.links().len()
                    );
                }
            }
        }
        debug!(
            "Parsed analysis result: {} pages, {} images",
            result.pages.len(),
            result.images().count()
        );
        Ok(result)
    }
}

impl From<Vec<PageResult>> for AnalysisResult {
    fn from(pages: Vec<PageResult>) -> Self {
        Self { pages }
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
