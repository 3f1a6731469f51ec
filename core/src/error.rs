use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Version is missing from the snapshot data ({len} bytes)")]
    MissingVersion { len: usize },

    #[error("Snapshot data version [{version}] is unexpected")]
    UnsupportedVersion { version: i32 },

    #[error("Snapshot data bytes [{body}] do not divide evenly by the bytes per snapshot [{record}]")]
    CorruptLength { body: usize, record: usize },

    #[error("Snapshot record has an invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: i32, day: i32 },

    #[error("Snapshot record {index} is not after the previous record")]
    UnsortedRecords { index: usize },

    #[error("Snapshot history was not loaded")]
    NotLoaded,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HistoryError {
    /// True for errors that mean the persisted blob itself is unusable.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::MissingVersion { .. }
                | Self::UnsupportedVersion { .. }
                | Self::CorruptLength { .. }
                | Self::InvalidDate { .. }
                | Self::UnsortedRecords { .. }
        )
    }
}

pub type HistoryResult<T> = Result<T, HistoryError>;
