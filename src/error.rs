use thiserror::Error;

/// Engine-wide error types.
///
/// Every variant is surfaced to the caller unmodified; the engine never
/// retries a failed write or commit on its own.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page content not found: {0}")]
    NotFound(String),

    #[error("no heading matches anchor '{0}'")]
    SectionNotFound(String),

    #[error("content file {0} is not valid UTF-8")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("version log error: {0}")]
    Commit(#[from] git2::Error),

    #[error("repository has no commits")]
    NoHistory,

    #[error("record store error: {0}")]
    Record(String),

    #[error("save failed while {stage}: {source}")]
    Save {
        stage: &'static str,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Wrap an error that occurred inside a save pipeline, tagging the
    /// stage that failed. A save either completes every stage or surfaces
    /// the failing one; partial progress is never reported as success.
    pub fn during(stage: &'static str, source: StoreError) -> Self {
        StoreError::Save {
            stage,
            source: Box::new(source),
        }
    }
}
