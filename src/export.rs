//! Saving results and the captured screenshot

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::outcome::{DecodeOutcome, Stage};

/// Write the extracted text to a file
pub fn save_text(path: &Path, text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("No text to save");
    }
    std::fs::write(path, text)
        .with_context(|| format!("Failed to save text to {}", path.display()))?;
    log::info!("Text saved to {}", path.display());
    Ok(())
}

/// Timestamped screenshot name in the pictures folder (or home)
pub fn default_image_path() -> Option<PathBuf> {
    let mut path = dirs::picture_dir().or_else(dirs::home_dir)?;
    let name = chrono::Local::now()
        .format("Screenshot_%Y%m%d_%H%M%S.png")
        .to_string();
    path.push(name);
    Some(path)
}

/// Copy the captured screenshot, returning where it went
pub fn save_image(source: &Path, destination: Option<&Path>) -> Result<PathBuf> {
    let len = std::fs::metadata(source)
        .with_context(|| format!("No screenshot at {}", source.display()))?
        .len();
    if len == 0 {
        anyhow::bail!("No screenshot to save");
    }
    let destination = match destination {
        Some(path) => path.to_path_buf(),
        None => default_image_path().context("No pictures or home directory available")?,
    };
    std::fs::copy(source, &destination).with_context(|| {
        format!(
            "Failed to save screenshot {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    log::info!("Screenshot saved to {}", destination.display());
    Ok(destination)
}

/// Whether a run left a screenshot worth keeping
pub fn screenshot_available(outcome: &DecodeOutcome, screenshot: &Path) -> bool {
    !matches!(
        outcome.failed_stage(),
        Some(Stage::Capture) | Some(Stage::ImageLoad)
    ) && screenshot.is_file()
}

/// Where the CLI was asked to put the results
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportTargets<'a> {
    pub text: Option<&'a Path>,
    /// `Some(None)` saves to [`default_image_path`]
    pub image: Option<Option<&'a Path>>,
}

/// Save whatever the outcome allows. A refused save is logged, never fatal;
/// only IO failures on a requested save are errors.
pub fn export_outcome(
    outcome: &DecodeOutcome,
    screenshot: &Path,
    targets: ExportTargets<'_>,
) -> Result<Option<PathBuf>> {
    if let (Some(text), Some(path)) = (outcome.text(), targets.text) {
        if text.is_empty() {
            log::warn!("No text to save");
        } else {
            save_text(path, text)?;
        }
    }

    let Some(destination) = targets.image else {
        return Ok(None);
    };
    if !screenshot_available(outcome, screenshot) {
        log::warn!("No screenshot to save");
        return Ok(None);
    }
    save_image(screenshot, destination).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognized(text: &str) -> DecodeOutcome {
        DecodeOutcome::TextRecognized {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_empty_screenshot_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("screenshot.png");
        let dest = dir.path().join("kept.png");
        std::fs::write(&source, b"").unwrap();

        let err = save_image(&source, Some(&dest)).unwrap_err();
        assert_eq!(err.to_string(), "No screenshot to save");
        assert!(!dest.exists());
    }

    #[test]
    fn test_image_load_failure_skips_image_export() {
        let dir = tempfile::tempdir().unwrap();
        // capture tool exited 0 but wrote nothing usable
        let source = dir.path().join("screenshot.png");
        std::fs::write(&source, b"").unwrap();
        let dest = dir.path().join("kept.png");
        let outcome = DecodeOutcome::Failed {
            stage: Stage::ImageLoad,
            message: "Failed to load image".to_string(),
        };

        let saved = export_outcome(
            &outcome,
            &source,
            ExportTargets {
                text: None,
                image: Some(Some(&dest)),
            },
        )
        .unwrap();
        assert_eq!(saved, None);
        assert!(!dest.exists());
    }

    #[test]
    fn test_missing_screenshot_skips_image_export() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("kept.png");
        let saved = export_outcome(
            &recognized("text"),
            &dir.path().join("never-written.png"),
            ExportTargets {
                text: None,
                image: Some(Some(&dest)),
            },
        )
        .unwrap();
        assert_eq!(saved, None);
        assert!(!dest.exists());
    }

    #[test]
    fn test_empty_text_export_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = dir.path().join("result.txt");
        let saved = export_outcome(
            &recognized(""),
            &dir.path().join("screenshot.png"),
            ExportTargets {
                text: Some(&text_path),
                image: None,
            },
        )
        .unwrap();
        assert_eq!(saved, None);
        assert!(!text_path.exists());
    }

    #[test]
    fn test_export_text_and_image() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("screenshot.png");
        std::fs::write(&source, b"png bytes").unwrap();
        let text_path = dir.path().join("result.txt");
        let dest = dir.path().join("kept.png");

        let saved = export_outcome(
            &DecodeOutcome::QrDecoded {
                text: "payload".to_string(),
            },
            &source,
            ExportTargets {
                text: Some(&text_path),
                image: Some(Some(&dest)),
            },
        )
        .unwrap();
        assert_eq!(saved.as_deref(), Some(dest.as_path()));
        assert_eq!(std::fs::read_to_string(&text_path).unwrap(), "payload");
        assert_eq!(std::fs::read(&dest).unwrap(), b"png bytes");
    }

    #[test]
    fn test_save_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        save_text(&path, "line one\nline two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line one\nline two");
    }

    #[test]
    fn test_empty_text_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.txt");
        let err = save_text(&path, "").unwrap_err();
        assert_eq!(err.to_string(), "No text to save");
        assert!(!path.exists());
    }

    #[test]
    fn test_save_image_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("screenshot.png");
        let dest = dir.path().join("kept.png");
        std::fs::write(&source, b"png bytes").unwrap();

        let saved = save_image(&source, Some(&dest)).unwrap();
        assert_eq!(saved, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"png bytes");
    }

    #[test]
    fn test_save_image_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("kept.png");
        assert!(save_image(&dir.path().join("gone.png"), Some(&dest)).is_err());
    }

    #[test]
    fn test_default_image_name() {
        if let Some(path) = default_image_path() {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with("Screenshot_"));
            assert!(name.ends_with(".png"));
            // Screenshot_yyyyMMdd_hhmmss.png
            assert_eq!(name.len(), "Screenshot_20240101_120000.png".len());
        }
    }
}
