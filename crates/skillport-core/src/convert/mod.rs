//! Bidirectional conversion between Claude skills and Gemini extensions.
//!
//! Both directions implement [`Converter`]. A conversion reads everything it
//! needs up front, then writes files one by one. A failure after the first
//! write leaves earlier files in place: emission is at-least-once, not
//! atomic.

pub mod boilerplate;
pub mod to_claude;
pub mod to_gemini;

use std::path::Path;

use crate::detect::detect;
use crate::error::{PortError, Result};
use crate::types::{ConversionResult, Platform};

pub use to_claude::GeminiToClaude;
pub use to_gemini::ClaudeToGemini;

/// One conversion direction.
pub trait Converter {
    /// Platform read from the source directory.
    fn source(&self) -> Platform;

    /// Platform written to the output directory.
    fn target(&self) -> Platform;

    fn source_dir(&self) -> &Path;

    /// Perform the conversion, recording written files and warnings in
    /// `result` as it goes.
    fn run(&self, result: &mut ConversionResult) -> Result<()>;

    /// Run the conversion and fold any error into a failed result.
    fn convert(&self) -> ConversionResult {
        let mut result = ConversionResult::default();
        result.metadata.source = Some(self.source());
        result.metadata.target = Some(self.target());

        match self.run(&mut result) {
            Ok(()) => {
                result.success = true;
                tracing::info!(
                    source = %self.source(),
                    target = %self.target(),
                    dir = %self.source_dir().display(),
                    files = result.files.len(),
                    warnings = result.warnings.len(),
                    "conversion complete"
                );
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.source(),
                    target = %self.target(),
                    error = %e,
                    written = result.files.len(),
                    "conversion failed"
                );
                result.success = false;
                result.errors.push(e.to_string());
            }
        }
        result
    }
}

/// Pick the converter that produces `target` from `source_dir`.
pub fn converter_for(
    target: Platform,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<Box<dyn Converter>> {
    match target {
        Platform::Gemini => Ok(Box::new(ClaudeToGemini::new(source_dir, output_dir))),
        Platform::Claude => Ok(Box::new(GeminiToClaude::new(source_dir, output_dir))),
        other => Err(PortError::UnsupportedPlatform(other.to_string())),
    }
}

/// Convert `source_dir` toward `target`.
///
/// With no target, converts toward whichever side is missing. A
/// [`Platform::Universal`] target delegates to [`make_universal`]. Output
/// defaults to the source directory.
pub fn convert(
    source_dir: &Path,
    target: Option<Platform>,
    output_dir: Option<&Path>,
) -> ConversionResult {
    let output_dir = output_dir.unwrap_or(source_dir);

    let plan = detect(source_dir).and_then(|detection| {
        let detected = detection.require_known(source_dir)?;
        resolve_target(detected, target)
    });

    match plan {
        Ok(Platform::Universal) => make_universal(source_dir, Some(output_dir)),
        Ok(target) => match converter_for(target, source_dir, output_dir) {
            Ok(converter) => converter.convert(),
            Err(e) => failed(e, target),
        },
        Err(e) => failed(e, target.unwrap_or(Platform::Unknown)),
    }
}

/// Decide which platform to produce given what was detected.
fn resolve_target(detected: Platform, requested: Option<Platform>) -> Result<Platform> {
    match (detected, requested) {
        (_, Some(Platform::Unknown)) => Err(PortError::UnsupportedPlatform("unknown".into())),
        (_, Some(Platform::Universal)) => Ok(Platform::Universal),
        // Regenerating one side of a dual-platform directory from the other.
        (Platform::Universal, Some(target)) => Ok(target),
        (Platform::Universal, None) => Err(PortError::NothingToConvert(
            "directory already supports both platforms; pass an explicit target".into(),
        )),
        (detected, Some(target)) if detected == target => Err(PortError::NothingToConvert(
            format!("source is already a {} project", target.display_name()),
        )),
        (_, Some(target)) => Ok(target),
        (detected, None) => detected
            .opposite()
            .ok_or_else(|| PortError::UnsupportedPlatform(detected.to_string())),
    }
}

/// Make `dir` dual-platform by converting toward whichever side is missing.
pub fn make_universal(dir: &Path, output_dir: Option<&Path>) -> ConversionResult {
    let output_dir = output_dir.unwrap_or(dir);

    let detected = match detect(dir).and_then(|d| d.require_known(dir)) {
        Ok(platform) => platform,
        Err(e) => return failed(e, Platform::Universal),
    };

    let mut result = ConversionResult {
        success: true,
        ..Default::default()
    };
    result.metadata.source = Some(detected);
    result.metadata.target = Some(Platform::Universal);

    let missing = match detected {
        Platform::Universal => {
            result
                .warnings
                .push("directory already supports Claude Code and Gemini CLI".to_owned());
            return result;
        }
        other => other.opposite(),
    };

    if let Some(target) = missing {
        match converter_for(target, dir, output_dir) {
            Ok(converter) => {
                let converted = converter.convert();
                result.merge(converted);
                result.metadata.source = Some(detected);
                result.metadata.target = Some(Platform::Universal);
            }
            Err(e) => return failed(e, Platform::Universal),
        }
    }
    result
}

fn failed(error: PortError, target: Platform) -> ConversionResult {
    tracing::warn!(error = %error, "conversion aborted");
    let mut result = ConversionResult::default();
    result.metadata.target = Some(target);
    result.errors.push(error.to_string());
    result
}
