//! Result rendering: turn an [`crate::model::AnalysisResult`] into a report.
//!
//! One unified view serves every use: a plain gallery, a statistics report,
//! or a clickable-only security report are all the same [`ReportView`] built
//! with different [`crate::config::ReportOptions`].
//!
//! ```text
//! AnalysisResult ──┬─► stats   (always over the unfiltered result)
//!                  ├─► filter  (clickable-only, drops empty pages)
//!                  ├─► labels  (link tag → label + icon, cosmetic only)
//!                  └─► view    (+ FailedImages placeholders) ─► text
//!
//! actions: report.json download (unfiltered), open image / open link
//! ```

pub mod actions;
pub mod failed;
pub mod filter;
pub mod labels;
pub mod stats;
pub mod view;

pub use actions::{download_report, open_image, open_link, report_json, Opener, SystemOpener};
pub use failed::FailedImages;
pub use filter::{all_images, clickable_only, PageSlice};
pub use labels::{link_icon, link_label};
pub use stats::ReportStats;
pub use view::{Badge, ImageCard, ImageDisplay, LinkButton, PageSection, ReportView};
