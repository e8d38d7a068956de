//! Offline replay of exported debate records.

use std::fs;
use std::path::{Path, PathBuf};

use transcript_store::{
    ArchiveSummary, DocumentCodec, DocumentError, ExportDocument, ImportedDocument,
    TranscriptStore, ARCHIVE_EXPORT_FILE_NAME,
};

use crate::error::SessionError;
use crate::sink::{RenderMode, SessionSink, StatusTone};
use crate::status;

struct LoadedArchive {
    document: ImportedDocument,
    summary: ArchiveSummary,
}

/// Disconnected viewer over one loaded document. Shares no state with a live
/// [`SessionController`](crate::controller::SessionController).
pub struct ArchiveViewer<S> {
    sink: S,
    transcript: TranscriptStore,
    loaded: Option<LoadedArchive>,
    render_mode: RenderMode,
}

impl<S: SessionSink> ArchiveViewer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            transcript: TranscriptStore::new(),
            loaded: None,
            render_mode: RenderMode::default(),
        }
    }

    #[must_use]
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Parses, normalizes and renders `text`.
    ///
    /// Blank or malformed input leaves the current view untouched. A document
    /// with no usable turns clears the view.
    pub fn load_text(&mut self, text: &str) -> Result<&ArchiveSummary, SessionError> {
        let document = match DocumentCodec::import(text) {
            Ok(document) => document,
            Err(error) => {
                let message = match &error {
                    DocumentError::EmptyInput => status::ARCHIVE_EMPTY_INPUT,
                    _ => status::ARCHIVE_MALFORMED,
                };
                tracing::debug!(%error, "archive text rejected");
                self.sink.report_status(message, Some(StatusTone::Error));
                return Err(error.into());
            }
        };

        let report = document.normalize();
        self.reset_view();
        if report.turns.is_empty() {
            self.sink
                .report_status(status::ARCHIVE_NO_TURNS, Some(StatusTone::Error));
            return Err(SessionError::Precondition(status::ARCHIVE_NO_TURNS));
        }

        tracing::info!(
            turns = report.turns.len(),
            skipped = report.skipped.len(),
            "loaded debate record"
        );
        let summary = ArchiveSummary::from_document(&document, report.turns.len());
        self.transcript.replace(report.turns);
        self.render_all();
        self.sink.report_status(status::ARCHIVE_LOADED, None);

        let loaded = self.loaded.insert(LoadedArchive { document, summary });
        Ok(&loaded.summary)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<&ArchiveSummary, SessionError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) => {
                let error = DocumentError::io("reading debate record", path, source);
                self.sink
                    .report_status(&status::error_line(&error.to_string()), Some(StatusTone::Error));
                return Err(error.into());
            }
        };
        self.load_text(&text)
    }

    /// Changes the render mode and redraws the loaded transcript.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
        if self.loaded.is_some() {
            self.sink.clear();
            self.render_all();
        }
    }

    pub fn clear(&mut self) {
        self.reset_view();
        self.sink.report_status(status::ARCHIVE_CLEARED, None);
    }

    /// Re-export of the loaded config and normalized transcript.
    pub fn export(&mut self) -> Result<ExportDocument, SessionError> {
        let config = match &self.loaded {
            Some(loaded) if !self.transcript.is_empty() => loaded.document.config_value(),
            _ => {
                self.sink
                    .report_status(status::ARCHIVE_NOTHING_TO_EXPORT, Some(StatusTone::Error));
                return Err(SessionError::Precondition(status::ARCHIVE_NOTHING_TO_EXPORT));
            }
        };
        Ok(DocumentCodec::export_with_config(config, self.transcript.turns())?)
    }

    /// Writes the re-export into `dir` as `debate_replay.json`.
    pub fn export_to_dir(&mut self, dir: &Path) -> Result<PathBuf, SessionError> {
        let path = dir.join(ARCHIVE_EXPORT_FILE_NAME);
        self.export_to_file(&path)?;
        Ok(path)
    }

    pub fn export_to_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let document = self.export()?;
        if let Err(error) = DocumentCodec::write_to(path, &document) {
            self.sink
                .report_status(&status::error_line(&error.to_string()), Some(StatusTone::Error));
            return Err(error.into());
        }
        self.sink.report_status(status::ARCHIVE_EXPORTED, None);
        Ok(())
    }

    pub fn summary(&self) -> Option<&ArchiveSummary> {
        self.loaded.as_ref().map(|loaded| &loaded.summary)
    }

    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn reset_view(&mut self) {
        self.loaded = None;
        self.transcript.clear();
        self.sink.clear();
    }

    fn render_all(&mut self) {
        for turn in self.transcript.iter() {
            self.sink.render(turn.side, &turn.content, self.render_mode);
        }
    }
}
