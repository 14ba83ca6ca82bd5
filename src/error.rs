//! RichEdit Error Types
//!
//! Centralized error handling for the editor shell and its document engine.

use thiserror::Error;

/// Reasons a document command can refuse to run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("command cannot run here: {0}")]
    NotApplicable(String),

    #[error("position {pos} is outside the document (size {size})")]
    PositionOutOfRange { pos: usize, size: usize },

    #[error("selection is not inside a table")]
    NotInTable,

    #[error("no image node is selected")]
    NoImageSelected,

    #[error("heading level {0} is not between 1 and 6")]
    InvalidHeadingLevel(u8),
}

/// Central error type for RichEdit
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for RichEdit operations
pub type EditorResult<T> = Result<T, EditorError>;
