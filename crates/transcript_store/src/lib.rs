mod archive;
mod clock;
mod document;
mod error;
mod store;
mod summary;
mod turn;

pub use archive::{ArchiveImporter, NormalizeReport, SkipReason, TRANSCRIPT_KEYS};
pub use clock::{now_rfc3339, now_unix_millis};
pub use document::{
    export_file_name, DocumentCodec, ExportDocument, ExportedTurn, ImportedDocument,
    ARCHIVE_EXPORT_FILE_NAME,
};
pub use error::DocumentError;
pub use store::TranscriptStore;
pub use summary::ArchiveSummary;
pub use turn::Turn;
