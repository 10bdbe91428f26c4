//! Error types for sift_select

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while driving a select
///
/// Absence cases (unknown initial key, empty search result, closing an
/// already closed panel) are not errors and never produce one.
#[derive(Error, Debug)]
pub enum SelectError {
    /// The trigger passed to `open` is not part of the document
    #[error("Trigger element {0:#x} is not in the document")]
    UnknownElement(u64),

    /// The panel template produced an element that is not in the document
    #[error("Panel template returned unknown element {0:#x}")]
    InvalidPanel(u64),

    /// The select was destroyed
    #[error("Select has been destroyed")]
    Destroyed,

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for select operations
pub type Result<T> = std::result::Result<T, SelectError>;
