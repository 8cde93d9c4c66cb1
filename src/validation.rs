//! Source clip preflight validation.
//!
//! Provides [`ClipInfo::validate`](crate::ClipInfo::validate), which inspects
//! probed metadata and returns a [`ValidationReport`] predicting how a
//! conversion will go. Errors in the report mean the conversion will fail;
//! warnings flag quality or size concerns (huge GIFs, upscaling) that do not
//! block it.
//!
//! # Example
//!
//! ```no_run
//! use reloop::ClipInfo;
//!
//! let clip = ClipInfo::probe("input.mp4")?;
//! let report = clip.validate();
//! if !report.is_convertible() {
//!     eprintln!("{report}");
//! }
//! # Ok::<(), reloop::ReloopError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::clip::ClipInfo;

/// Clips longer than this produce GIFs large enough to warrant a warning.
const LONG_CLIP_THRESHOLD: Duration = Duration::from_secs(30);

/// Summary of clip preflight checks.
///
/// Contains informational notices, warnings, and errors found by
/// [`ClipInfo::validate`](crate::ClipInfo::validate).
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Non-fatal issues that may affect output size or quality.
    pub warnings: Vec<String>,
    /// Fatal issues that will prevent conversion.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found.
    ///
    /// Warnings do not affect this result.
    pub fn is_convertible(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of entries (info + warnings + errors).
    pub fn entry_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.entry_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Run preflight checks over probed clip metadata.
pub(crate) fn validate_clip(clip: &ClipInfo) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.info.push(format!(
        "Video: {}x{} @ {:.2} fps, {} codec",
        clip.width, clip.height, clip.frames_per_second, clip.codec,
    ));
    report
        .info
        .push(format!("Duration: {:.2}s", clip.duration.as_secs_f64()));

    if clip.width == 0 || clip.height == 0 {
        report
            .errors
            .push("Video stream reports zero dimensions".to_string());
    }

    if clip.duration == Duration::ZERO {
        report.errors.push(
            "Container reports zero duration; the sample plan would contain no frames"
                .to_string(),
        );
    } else if clip.duration > LONG_CLIP_THRESHOLD {
        report.warnings.push(format!(
            "Clip is {:.0}s long; every sampled frame is stored fully, so the GIF will be large",
            clip.duration.as_secs_f64(),
        ));
    }

    if clip.width > 0 && clip.width < crate::config::DEFAULT_TARGET_WIDTH {
        report.warnings.push(format!(
            "Source is only {} px wide; output at the default {} px target means upscaling",
            clip.width,
            crate::config::DEFAULT_TARGET_WIDTH,
        ));
    }

    if clip.frames_per_second <= 0.0 {
        report.warnings.push(
            "Container reports no frame rate; sampling falls back entirely on seek timestamps"
                .to_string(),
        );
    } else if clip.frames_per_second < 5.0 {
        report.warnings.push(format!(
            "Source frame rate is only {:.2} fps; sampled frames will repeat",
            clip.frames_per_second,
        ));
    }

    report
}
