//! Error types for the examlens analytics core.
//!
//! Only loading and configuration can fail. Everything downstream of a
//! validated [`Dataset`](crate::dataset::Dataset) is a pure computation that
//! degrades to neutral values instead of returning errors.

/// Top-level error type for the analytics core.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// The input table is missing one or more required columns.
    #[error("Schema error: dataset must contain columns {required}; missing: {}", missing.join(", "))]
    Schema {
        missing: Vec<String>,
        required: String,
    },

    /// No usable rows remained after parsing and cleaning.
    #[error("Dataset is empty: no usable rows after cleaning ({dropped} row(s) dropped)")]
    EmptyDataset { dropped: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    pub fn schema(missing: Vec<String>) -> Self {
        Self::Schema {
            missing,
            required: crate::loader::REQUIRED_COLUMNS.join(", "),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from input validation rather than I/O or setup.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::EmptyDataset { .. })
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
