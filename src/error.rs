//! Stage failures

use std::path::PathBuf;

use crate::outcome::{DecodeOutcome, Stage};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Failed to capture screenshot to {path}")]
    CaptureFailed { path: PathBuf },

    #[error("Failed to load image {path}: {source}")]
    ImageLoadFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Error initializing Tesseract OCR for language: {language} ({reason})")]
    EngineInitFailed { language: String, reason: String },
}

impl DecodeError {
    pub fn stage(&self) -> Stage {
        match self {
            DecodeError::CaptureFailed { .. } => Stage::Capture,
            DecodeError::ImageLoadFailed { .. } => Stage::ImageLoad,
            DecodeError::EngineInitFailed { .. } => Stage::EngineInit,
        }
    }
}

impl From<DecodeError> for DecodeOutcome {
    fn from(err: DecodeError) -> Self {
        DecodeOutcome::Failed {
            stage: err.stage(),
            message: err.to_string(),
        }
    }
}
