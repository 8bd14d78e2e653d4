//! Link tag → display label and icon.
//!
//! Purely cosmetic. Nothing here feeds back into whether an image counts as
//! clickable; that comes from the backend flag alone.

use crate::model::LinkKind;

/// Human label for a link kind.
///
/// Unrecognised tags fall back to the uppercased tag followed by `" Link"`,
/// e.g. `qr_code` → `"QR_CODE Link"`.
pub fn link_label(kind: &LinkKind) -> String {
    let fixed = match kind {
        LinkKind::PdfStructural => "PDF Link",
        LinkKind::PdfStructuralGlobal => "PDF Link (Page)",
        LinkKind::Url => "URL",
        LinkKind::Text => "Text",
        LinkKind::Qr => "QR Code",
        LinkKind::PdfWidgetUri => "PDF Widget",
        LinkKind::PdfWidgetLaunch => "PDF Launch",
        LinkKind::PdfWidgetGotoR => "PDF GoTo",
        LinkKind::Other(tag) => return format!("{} Link", tag.to_uppercase()),
    };
    fixed.to_string()
}

/// Icon shown in front of the label.
pub fn link_icon(kind: &LinkKind) -> &'static str {
    match kind {
        LinkKind::PdfStructural
        | LinkKind::PdfStructuralGlobal
        | LinkKind::PdfWidgetUri
        | LinkKind::PdfWidgetLaunch
        | LinkKind::PdfWidgetGotoR => "📄",
        LinkKind::Url => "🌐",
        LinkKind::Text => "📝",
        LinkKind::Qr => "🔳",
        LinkKind::Other(_) => "🔗",
    }
}
