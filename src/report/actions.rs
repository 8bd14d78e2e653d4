//! User actions on a report: save `report.json`, open an image or a link.
//!
//! None of these talk to the backend. Targets handed to the opener are not
//! validated; the report shows them as-is and the user decides.

use crate::error::ScanError;
use crate::model::AnalysisResult;
use crate::report::view::{ImageCard, LinkButton};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Name of the saved report file.
pub const REPORT_FILENAME: &str = "report.json";

/// The full, unfiltered result as pretty-printed JSON.
pub fn report_json(result: &AnalysisResult) -> Result<String, ScanError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| ScanError::Internal(format!("Failed to serialise report: {e}")))
}

/// Save the full result as `report.json` inside `dir`.
///
/// Uses atomic write (temp file in `dir` + rename) so a crash never leaves a
/// half-written report behind. Returns the final path.
pub fn download_report(
    result: &AnalysisResult,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, ScanError> {
    let dir = dir.as_ref();
    let path = dir.join(REPORT_FILENAME);
    let json = report_json(result)?;

    let write_failed = |source: std::io::Error| ScanError::ReportWriteFailed {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(write_failed)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(json.as_bytes()).map_err(write_failed)?;
    tmp.persist(&path).map_err(|e| write_failed(e.error))?;

    info!("Saved report ({} bytes) to {}", json.len(), path.display());
    Ok(path)
}

/// Something that can open a URL in a new browsing context.
pub trait Opener {
    fn open(&self, target: &str) -> Result<(), ScanError>;
}

/// Hands targets to the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(target: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut c = Command::new("open");
            c.arg(target);
            c
        }
        #[cfg(target_os = "windows")]
        {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]).arg(target);
            c
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut c = Command::new("xdg-open");
            c.arg(target);
            c
        }
    }
}

impl Opener for SystemOpener {
    fn open(&self, target: &str) -> Result<(), ScanError> {
        debug!("Opening {}", target);
        spawn_reaped(Self::command(target), target).map(|_| ())
    }
}

/// Start `cmd` detached from our stdio and wait for it on a background
/// thread, so the opener never lingers as a zombie process.
fn spawn_reaped(
    mut cmd: Command,
    target: &str,
) -> Result<JoinHandle<io::Result<ExitStatus>>, ScanError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ScanError::OpenFailed {
            target: target.to_string(),
            reason: e.to_string(),
        })?;
    Ok(thread::spawn(move || child.wait()))
}

/// "View full image": open the card's image URL.
pub fn open_image(opener: &dyn Opener, card: &ImageCard) -> Result<(), ScanError> {
    opener.open(&card.url)
}

/// Open an extracted link's target.
pub fn open_link(opener: &dyn Opener, button: &LinkButton) -> Result<(), ScanError> {
    opener.open(&button.target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageResult, LinkInfo, PageResult};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
    }

    impl Opener for RecordingOpener {
        fn open(&self, target: &str) -> Result<(), ScanError> {
            self.opened.borrow_mut().push(target.to_string());
            Ok(())
        }
    }

    fn sample() -> AnalysisResult {
        AnalysisResult::new(vec![
            PageResult {
                page: 1,
                images: vec![ImageResult {
                    filename: "a.png".into(),
                    url: "http://x/a.png".into(),
                    clickable_link_found: true,
                    extracted_links: Some(vec![LinkInfo {
                        link_type: "mystery".into(),
                        content: "javascript:alert(1)".into(),
                        description: Some("odd".into()),
                        confidence: Some(0.5),
                        bbox: Some([1.0, 2.0, 3.0, 4.0]),
                    }]),
                    size: Some(10),
                    image_area: Some([0.0, 0.0, 5.0, 5.0]),
                }],
            },
            PageResult {
                page: 2,
                images: vec![],
            },
        ])
    }

    #[test]
    fn download_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let result = sample();
        let path = download_report(&result, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), REPORT_FILENAME);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'), "report should be pretty-printed");
        let parsed: AnalysisResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn download_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        download_report(&sample(), dir.path()).unwrap();
        let path = download_report(&AnalysisResult::default(), dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }

    #[cfg(unix)]
    #[test]
    fn spawned_opener_is_waited_on() {
        let handle = spawn_reaped(Command::new("true"), "x").unwrap();
        let status = handle.join().unwrap().unwrap();
        assert!(status.success());
    }

    #[test]
    fn missing_opener_is_open_failed() {
        let err = spawn_reaped(Command::new("pdfscan-no-such-opener"), "http://y").unwrap_err();
        assert!(matches!(err, ScanError::OpenFailed { ref target, .. } if target == "http://y"));
    }

    #[test]
    fn open_actions_pass_targets_unvalidated() {
        use crate::config::ReportOptions;
        use crate::report::{FailedImages, ReportView};

        let view =
            ReportView::build(&sample(), &ReportOptions::default(), &FailedImages::new()).unwrap();
        let card = &view.sections[0].cards[0];
        let opener = RecordingOpener::default();

        open_image(&opener, card).unwrap();
        open_link(&opener, &card.links[0]).unwrap();
        assert_eq!(
            *opener.opened.borrow(),
            vec!["http://x/a.png", "javascript:alert(1)"]
        );
    }
}
