//! Screenshot capture through an external tool

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the destination path in custom argument lists
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Something that can write a screenshot to a path
pub trait ScreenCapture {
    /// Blocks until the capture finishes. `true` iff the tool reported success;
    /// the file itself is not checked here.
    fn capture(&self, destination: &Path) -> bool;
}

/// What the built-in spectacle invocation grabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    #[default]
    Fullscreen,
    Region,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capture program to run
    pub program: String,
    /// Only used for the built-in spectacle arguments
    pub mode: CaptureMode,
    /// Custom argument list; `{output}` is replaced by the destination
    pub args: Option<Vec<String>>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            program: "spectacle".to_string(),
            mode: CaptureMode::Fullscreen,
            args: None,
        }
    }
}

/// Runs a capture program as a subprocess and waits for it
#[derive(Debug, Clone, Default)]
pub struct CommandCapture {
    config: CaptureConfig,
}

impl CommandCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    /// Arguments passed to the program for a given destination
    pub fn args_for(&self, destination: &Path) -> Vec<String> {
        let output = destination.to_string_lossy();
        match &self.config.args {
            Some(template) => template
                .iter()
                .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
                .collect(),
            None => {
                // background, no notification, explicit output file
                let mode = match self.config.mode {
                    CaptureMode::Fullscreen => "-f",
                    CaptureMode::Region => "-r",
                };
                vec![
                    "-b".to_string(),
                    mode.to_string(),
                    "-n".to_string(),
                    "-o".to_string(),
                    output.into_owned(),
                ]
            }
        }
    }
}

impl ScreenCapture for CommandCapture {
    fn capture(&self, destination: &Path) -> bool {
        let args = self.args_for(destination);
        log::info!(
            "Capturing screenshot with {} {:?}",
            self.config.program,
            args
        );

        match Command::new(&self.config.program).args(&args).status() {
            Ok(status) if status.success() => {
                log::debug!("Capture wrote {}", destination.display());
                true
            }
            Ok(status) => {
                log::error!("{} exited with {}", self.config.program, status);
                false
            }
            Err(e) => {
                log::error!("Failed to launch {}: {}", self.config.program, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_spectacle_args() {
        let capture = CommandCapture::default();
        let args = capture.args_for(&PathBuf::from("/tmp/screenshot.png"));
        assert_eq!(capture.program(), "spectacle");
        assert_eq!(args, ["-b", "-f", "-n", "-o", "/tmp/screenshot.png"]);
    }

    #[test]
    fn test_region_mode_args() {
        let capture = CommandCapture::new(CaptureConfig {
            mode: CaptureMode::Region,
            ..Default::default()
        });
        let args = capture.args_for(&PathBuf::from("/tmp/shot.png"));
        assert_eq!(args[1], "-r");
        assert_eq!(args.last().map(String::as_str), Some("/tmp/shot.png"));
    }

    #[test]
    fn test_custom_template_substitutes_output() {
        let capture = CommandCapture::new(CaptureConfig {
            program: "grim".to_string(),
            mode: CaptureMode::Fullscreen,
            args: Some(vec!["-t".to_string(), "png".to_string(), "{output}".to_string()]),
        });
        let args = capture.args_for(&PathBuf::from("/tmp/out.png"));
        assert_eq!(args, ["-t", "png", "/tmp/out.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_decides_success() {
        let dest = PathBuf::from("/tmp/unused.png");
        let ok = CommandCapture::new(CaptureConfig {
            program: "true".to_string(),
            mode: CaptureMode::Fullscreen,
            args: Some(Vec::new()),
        });
        assert!(ok.capture(&dest));

        let failing = CommandCapture::new(CaptureConfig {
            program: "false".to_string(),
            mode: CaptureMode::Fullscreen,
            args: Some(Vec::new()),
        });
        assert!(!failing.capture(&dest));
    }

    #[test]
    fn test_missing_program_is_failure() {
        let capture = CommandCapture::new(CaptureConfig {
            program: "shotscan-no-such-capture-tool".to_string(),
            ..Default::default()
        });
        assert!(!capture.capture(&PathBuf::from("/tmp/unused.png")));
    }
}
