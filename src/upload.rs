//! Upload form: pick one PDF and hand it to a callback.
//!
//! The form does no network I/O. It validates the *declared* type of a
//! candidate (derived from its extension, as a browser would) without looking
//! at the bytes, keeps the last accepted file for display, and forwards that
//! file to the registered callback on submit. Rejections are reported as
//! blocking notices through [`crate::events::ScanEvents::on_notice`].

use crate::error::ScanError;
use crate::events::{EventSink, NoopEvents};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The only declared type the form accepts.
pub const PDF_MIME: &str = "application/pdf";

/// A file offered by the user, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    name: String,
    declared_type: Option<String>,
    path: PathBuf,
}

impl FileCandidate {
    /// Candidate with an explicit declared type.
    pub fn new(
        name: impl Into<String>,
        declared_type: Option<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type,
            path: path.into(),
        }
    }

    /// Candidate whose declared type comes from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            declared_type: declared_type_for(&name).map(str::to_string),
            name,
            path: path.to_path_buf(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_pdf(&self) -> bool {
        self.declared_type.as_deref() == Some(PDF_MIME)
    }

    fn not_a_pdf(&self) -> ScanError {
        ScanError::NotAPdf {
            name: self.name.clone(),
            declared: self
                .declared_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// Extension → declared MIME type, the way browsers fill `File.type`.
fn declared_type_for(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(PDF_MIME),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "txt" => Some("text/plain"),
        "html" | "htm" => Some("text/html"),
        "json" => Some("application/json"),
        "zip" => Some("application/zip"),
        _ => None,
    }
}

/// A validated PDF ready to upload.
///
/// Only obtainable through validation, so holding one means the declared
/// type was `application/pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    name: String,
    path: Option<PathBuf>,
    bytes: Vec<u8>,
}

impl PdfFile {
    /// Validate a candidate and read its bytes from disk.
    pub fn read(candidate: &FileCandidate) -> Result<Self, ScanError> {
        if !candidate.is_pdf() {
            return Err(candidate.not_a_pdf());
        }
        let path = candidate.path();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ScanError::FileNotFound {
                path: path.to_path_buf(),
            },
        })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self {
            name: candidate.name().to_string(),
            path: Some(path.to_path_buf()),
            bytes,
        })
    }

    /// Validate an in-memory PDF by its filename.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ScanError> {
        let name = name.into();
        if declared_type_for(&name) != Some(PDF_MIME) {
            return Err(ScanError::NotAPdf {
                declared: declared_type_for(&name).unwrap_or("unknown").to_string(),
                name,
            });
        }
        Ok(Self {
            name,
            path: None,
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime(&self) -> &'static str {
        PDF_MIME
    }
}

/// Holds at most one accepted PDF and forwards it on submit.
pub struct UploadForm<F>
where
    F: FnMut(PdfFile),
{
    on_upload: F,
    selected: Option<PdfFile>,
    events: EventSink,
}

impl<F> UploadForm<F>
where
    F: FnMut(PdfFile),
{
    pub fn new(on_upload: F) -> Self {
        Self {
            on_upload,
            selected: None,
            events: Arc::new(NoopEvents),
        }
    }

    /// Route notices and acceptances to `events`.
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Click-to-browse: validate and hold `candidate`.
    ///
    /// Any previous selection is cleared first, so a rejected candidate
    /// leaves the form empty.
    pub fn select(&mut self, candidate: FileCandidate) -> Result<&PdfFile, ScanError> {
        self.selected = None;
        let file = PdfFile::read(&candidate).map_err(|e| self.notify(e))?;
        self.events.on_file_accepted(file.name());
        Ok(self.selected.insert(file))
    }

    /// Drag-and-drop: resolve exactly one candidate (the first) and select it.
    pub fn drop_files(
        &mut self,
        candidates: impl IntoIterator<Item = FileCandidate>,
    ) -> Result<&PdfFile, ScanError> {
        match candidates.into_iter().next() {
            Some(candidate) => self.select(candidate),
            None => {
                self.selected = None;
                Err(self.notify(ScanError::EmptyDrop))
            }
        }
    }

    /// Name of the held file, for display.
    pub fn filename(&self) -> Option<&str> {
        self.selected.as_ref().map(PdfFile::name)
    }

    /// Submit is enabled only while a valid file is held.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some()
    }

    /// Hand the held file to the callback.
    pub fn submit(&mut self) -> Result<(), ScanError> {
        match &self.selected {
            Some(file) => {
                (self.on_upload)(file.clone());
                Ok(())
            }
            None => Err(ScanError::NothingSelected),
        }
    }

    fn notify(&self, error: ScanError) -> ScanError {
        self.events.on_notice(&error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(contents).unwrap();
        f
    }

    #[test]
    fn declared_type_from_extension() {
        assert!(FileCandidate::from_path("/tmp/Report.PDF").is_pdf());
        assert!(!FileCandidate::from_path("/tmp/photo.png").is_pdf());
        assert_eq!(FileCandidate::from_path("/tmp/noext").declared_type(), None);
    }

    #[test]
    fn accepted_file_reaches_callback_unchanged() {
        let tmp = temp_file(".pdf", b"%PDF-1.7 body");
        let mut received = Vec::new();
        {
            let mut form = UploadForm::new(|f: PdfFile| received.push(f));
            let held = form.select(FileCandidate::from_path(tmp.path())).unwrap();
            assert_eq!(held.bytes(), b"%PDF-1.7 body");
            assert!(form.can_submit());
            form.submit().unwrap();
        }
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].bytes(), b"%PDF-1.7 body");
        assert_eq!(received[0].path(), Some(tmp.path()));
    }

    #[test]
    fn contents_are_not_inspected() {
        let tmp = temp_file(".pdf", b"definitely not a pdf");
        let mut form = UploadForm::new(|_f: PdfFile| {});
        assert!(form.select(FileCandidate::from_path(tmp.path())).is_ok());
    }

    #[test]
    fn non_pdf_is_rejected_and_clears_selection() {
        let pdf = temp_file(".pdf", b"%PDF");
        let txt = temp_file(".txt", b"hello");
        let mut calls = 0;
        {
            let mut form = UploadForm::new(|_f: PdfFile| calls += 1);
            form.select(FileCandidate::from_path(pdf.path())).unwrap();
            let err = form.select(FileCandidate::from_path(txt.path())).unwrap_err();
            assert!(matches!(err, ScanError::NotAPdf { .. }));
            assert_eq!(form.filename(), None);
            assert!(!form.can_submit());
            assert!(matches!(form.submit(), Err(ScanError::NothingSelected)));
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn explicit_declared_type_wins_over_extension() {
        let tmp = temp_file(".pdf", b"%PDF");
        let candidate = FileCandidate::new("x.pdf", Some("text/plain".into()), tmp.path());
        let mut form = UploadForm::new(|_f: PdfFile| {});
        assert!(form.select(candidate).is_err());
    }

    #[test]
    fn drop_takes_first_candidate_only() {
        let first = temp_file(".pdf", b"first");
        let second = temp_file(".pdf", b"second");
        let mut form = UploadForm::new(|_f: PdfFile| {});
        let held = form
            .drop_files(vec![
                FileCandidate::from_path(first.path()),
                FileCandidate::from_path(second.path()),
            ])
            .unwrap();
        assert_eq!(held.bytes(), b"first");
    }

    #[test]
    fn empty_drop_is_an_error() {
        let mut form = UploadForm::new(|_f: PdfFile| {});
        assert!(matches!(
            form.drop_files(Vec::new()),
            Err(ScanError::EmptyDrop)
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let mut form = UploadForm::new(|_f: PdfFile| {});
        let err = form
            .select(FileCandidate::from_path("/nonexistent/dir/a.pdf"))
            .unwrap_err();
        assert!(matches!(err, ScanError::FileNotFound { .. }));
        assert!(!form.can_submit());
    }

    #[test]
    fn from_bytes_validates_name() {
        assert!(PdfFile::from_bytes("a.pdf", vec![1, 2]).is_ok());
        assert!(matches!(
            PdfFile::from_bytes("a.docx", vec![]),
            Err(ScanError::NotAPdf { .. })
        ));
    }

    #[derive(Default)]
    struct NoticeLog {
        notices: std::sync::Mutex<Vec<String>>,
        accepted: std::sync::Mutex<Vec<String>>,
    }

    impl crate::events::ScanEvents for NoticeLog {
        fn on_file_accepted(&self, name: &str) {
            self.accepted.lock().unwrap().push(name.to_string());
        }

        fn on_notice(&self, error: &ScanError) {
            let tag = match error {
                ScanError::NotAPdf { .. } => "not-a-pdf",
                ScanError::EmptyDrop => "empty-drop",
                _ => "other",
            };
            self.notices.lock().unwrap().push(tag.to_string());
        }
    }

    #[test]
    fn rejections_raise_notices() {
        let txt = temp_file(".txt", b"plain");
        let log = Arc::new(NoticeLog::default());
        let mut calls = 0;
        {
            let mut form = UploadForm::new(|_| calls += 1).with_events(log.clone());
            assert!(form.select(FileCandidate::from_path(txt.path())).is_err());
            assert!(form.drop_files(Vec::new()).is_err());
            assert!(!form.can_submit());
        }
        assert_eq!(calls, 0);
        assert_eq!(*log.notices.lock().unwrap(), vec!["not-a-pdf", "empty-drop"]);
        assert!(log.accepted.lock().unwrap().is_empty());
    }
}
