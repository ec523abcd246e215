// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people photographing pages.
//
// Every technical error is mapped to plain English with a concrete suggestion
// about the photo, the reference swatch, or the settings.

use crate::error::FolioError;
use crate::types::Stage;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user should retake the photo or pick another swatch.
    ActionRequired,
    /// A setting is out of range and must be edited.
    Configuration,
    /// Cannot be fixed by changing the photo (unreadable file, disk error).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Stage that failed.
    pub stage: Stage,
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether running the same input again could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `FolioError` into a `HumanError`.
pub fn humanize_error(err: &FolioError) -> HumanError {
    let stage = err.stage();
    match err {
        FolioError::Input { stage: Stage::ColorModel, reason } => HumanError {
            stage,
            message: "The colour sample couldn't be used.".into(),
            suggestion: format!(
                "Use a colour photo that shows only the page colour, then try again. ({reason})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::Input { reason, .. } => HumanError {
            stage,
            message: "The photo couldn't be used.".into(),
            suggestion: format!("Check that the file is a colour photo and not empty. ({reason})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::EmptyRegion { .. } => HumanError {
            stage,
            message: "We couldn't find the page in the photo.".into(),
            suggestion: "Make sure the page fills a good part of the photo and matches the colour sample. Lowering the threshold can also help.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::DegenerateQuadrangle(_) => HumanError {
            stage,
            message: "The page outline is too thin to straighten.".into(),
            suggestion: "Photograph the page from further away so all four corners are visible.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::InvalidSize { width, height } => HumanError {
            stage,
            message: "The detected page is too small.".into(),
            suggestion: format!(
                "Move closer to the page and try again. (Detected size: {width}x{height})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        FolioError::InvalidConfig { parameter, reason, .. } => HumanError {
            stage,
            message: "One of the settings isn't valid.".into(),
            suggestion: format!("Change `{parameter}`: it {reason}."),
            retriable: false,
            severity: Severity::Configuration,
        },

        FolioError::Serialization(detail) => HumanError {
            stage,
            message: "The settings file couldn't be read.".into(),
            suggestion: format!("Check the settings file for typos. ({detail})"),
            retriable: false,
            severity: Severity::Configuration,
        },

        FolioError::ImageError(detail) => HumanError {
            stage,
            message: "The result couldn't be saved as an image.".into(),
            suggestion: format!("Try a different file type such as PNG. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        FolioError::Io(detail) => HumanError {
            stage,
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check that the file exists and the folder is writable. ({detail})"),
            retriable: true,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_region_asks_for_a_better_photo() {
        let human = humanize_error(&FolioError::EmptyRegion { width: 640, height: 480 });
        assert_eq!(human.stage, Stage::QuadrangleExtraction);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn bad_reference_mentions_the_sample() {
        let err = FolioError::input(Stage::ColorModel, "reference has zero pixels");
        let human = humanize_error(&err);
        assert_eq!(human.stage, Stage::ColorModel);
        assert!(human.message.contains("colour sample"));
        assert!(human.suggestion.contains("zero pixels"));
    }

    #[test]
    fn config_errors_name_the_parameter() {
        let err = FolioError::InvalidConfig {
            parameter: "morph_kernel_size",
            value: "4".into(),
            reason: "must be odd",
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Configuration);
        assert!(human.suggestion.contains("morph_kernel_size"));
    }

    #[test]
    fn invalid_size_reports_dimensions() {
        let human = humanize_error(&FolioError::InvalidSize { width: 0, height: 12 });
        assert_eq!(human.stage, Stage::Rectification);
        assert!(human.suggestion.contains("0x12"));
    }
}
