//! Capture, then QR, then OCR

use std::path::{Path, PathBuf};

use crate::capture::{CommandCapture, ScreenCapture};
use crate::config::ShotscanConfig;
use crate::error::DecodeError;
use crate::ocr::{TesseractRecognizer, TextRecognizer};
use crate::outcome::DecodeOutcome;
use crate::qr::{QrDecoder, RqrrDecoder};

/// Where the screenshot goes when the caller does not pick a path
pub fn default_image_path() -> PathBuf {
    std::env::temp_dir().join("screenshot.png")
}

/// One capture tool, one QR decoder and one text recognizer sharing a
/// single image path.
///
/// Stages run strictly in sequence on the calling thread and each is
/// attempted at most once per [`Pipeline::run`].
#[derive(Debug)]
pub struct Pipeline<C = CommandCapture, Q = RqrrDecoder, T = TesseractRecognizer> {
    capture: C,
    qr: Q,
    ocr: T,
    image_path: PathBuf,
}

impl Pipeline {
    pub fn from_config(config: &ShotscanConfig, image_path: PathBuf) -> Self {
        Pipeline::new(
            CommandCapture::new(config.capture.clone()),
            RqrrDecoder::new(config.qr),
            TesseractRecognizer::new(config.ocr),
            image_path,
        )
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::from_config(&ShotscanConfig::default(), default_image_path())
    }
}

impl<C, Q, T> Pipeline<C, Q, T>
where
    C: ScreenCapture,
    Q: QrDecoder,
    T: TextRecognizer,
{
    pub fn new(capture: C, qr: Q, ocr: T, image_path: PathBuf) -> Self {
        Self {
            capture,
            qr,
            ocr,
            image_path,
        }
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn run(&self, qr_enabled: bool, language: &str) -> DecodeOutcome {
        match self.run_stages(qr_enabled, language) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("Pipeline failed at {}: {}", err.stage().name(), err);
                err.into()
            }
        }
    }

    fn run_stages(&self, qr_enabled: bool, language: &str) -> Result<DecodeOutcome, DecodeError> {
        if !self.capture.capture(&self.image_path) {
            return Err(DecodeError::CaptureFailed {
                path: self.image_path.clone(),
            });
        }

        if qr_enabled {
            if let Some(text) = self.qr.decode_qr(&self.image_path)? {
                return Ok(DecodeOutcome::QrDecoded { text });
            }
            log::info!("No QR code, falling back to OCR");
        }

        let text = self.ocr.recognize_text(&self.image_path, language)?;
        Ok(DecodeOutcome::TextRecognized { text })
    }
}
