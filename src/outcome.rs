//! Result of one pipeline run

use serde::{Deserialize, Serialize};

/// Pipeline phase a failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Capture,
    ImageLoad,
    EngineInit,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Capture => "capture",
            Stage::ImageLoad => "image load",
            Stage::EngineInit => "engine init",
        }
    }
}

/// Exactly one of these is produced per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeOutcome {
    /// Payload of a QR code found in the screenshot
    QrDecoded { text: String },
    /// OCR text, possibly empty
    TextRecognized { text: String },
    Failed { stage: Stage, message: String },
}

impl DecodeOutcome {
    /// Extracted text, or `None` for a failed run
    pub fn text(&self) -> Option<&str> {
        match self {
            DecodeOutcome::QrDecoded { text } | DecodeOutcome::TextRecognized { text } => {
                Some(text.as_str())
            }
            DecodeOutcome::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, DecodeOutcome::Failed { .. })
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            DecodeOutcome::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Short line shown next to the result text
    pub fn status_message(&self) -> String {
        match self {
            DecodeOutcome::QrDecoded { .. } => {
                "QR code detected and decoded successfully".to_string()
            }
            DecodeOutcome::TextRecognized { .. } => "Text extracted successfully.".to_string(),
            DecodeOutcome::Failed {
                stage: Stage::Capture,
                ..
            } => "Error occurred while taking screenshot".to_string(),
            DecodeOutcome::Failed { message, .. } => message.clone(),
        }
    }
}
