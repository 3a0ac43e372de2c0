//! Error types for the tour engine.
//!
//! Only authoring defects and storage/configuration plumbing surface as
//! [`TourError`]. Runtime conditions inside a running tour (a target that has
//! not mounted yet, a tooltip that would overflow, a rejected skip) are
//! ordinary return values and never reach this type.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all tour engine operations.
#[derive(Error, Debug)]
pub enum TourError {
    /// A tour definition violates a construction invariant
    #[error("Invalid tour '{tour_id}': {reason}")]
    InvalidStepModel { tour_id: String, reason: String },
    /// No tour with the given ID is known to the catalog
    #[error("Tour '{id}' not found")]
    UnknownTour { id: String },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Storage backend cannot be reached
    #[error("Persistence unavailable: {message}")]
    PersistenceUnavailable { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TourError {
        TourError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for tour model validation errors.
pub struct InvalidModelBuilder {
    tour_id: String,
}

impl InvalidModelBuilder {
    /// Create a new invalid model error builder for a tour.
    pub fn new(tour_id: impl Into<String>) -> Self {
        Self {
            tour_id: tour_id.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TourError {
        TourError::InvalidStepModel {
            tour_id: self.tour_id,
            reason: reason.into(),
        }
    }
}

impl TourError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for tour model validation errors.
    pub fn invalid_model(tour_id: impl Into<String>) -> InvalidModelBuilder {
        InvalidModelBuilder::new(tour_id)
    }

    /// Returns true for errors caused by a defect in a tour definition.
    pub fn is_authoring_error(&self) -> bool {
        matches!(self, TourError::InvalidStepModel { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TourError::database(message).with_source(e))
    }
}

/// Result type alias for tour engine operations
pub type Result<T> = std::result::Result<T, TourError>;
