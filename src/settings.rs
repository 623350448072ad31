use crate::error::{Error, Result};
use std::path::PathBuf;

const DEFAULT_QUALITY: f32 = 0.8;
const DEFAULT_CONCURRENT_LIMIT: usize = 5;

/// Where converted `.webp` files are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// A `webp/` subdirectory next to each input file.
    Webp,
    /// The input file's own directory (in-place replacement).
    Same,
    /// A user-supplied directory; falls back to [`OutputMode::Webp`]
    /// behaviour when the custom path is empty.
    Custom,
}

/// Configuration for a single conversion run.
///
/// Use [`ConvertSettings::builder()`] to construct validated settings.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ConvertSettings {
    /// WebP quality factor in `0.0..=1.0` (multiplied by 100 for the codec)
    pub quality: f32,

    /// Delete original files after successful conversion
    pub delete_original: bool,

    /// Output path policy
    pub output_mode: OutputMode,

    /// Target directory for [`OutputMode::Custom`]; ignored otherwise
    pub custom_output_path: PathBuf,

    /// Maximum number of simultaneous conversions (always at least 1)
    pub concurrent_limit: usize,
}

impl ConvertSettings {
    /// Creates a new settings builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use webpify::{ConvertSettings, OutputMode};
    ///
    /// let settings = ConvertSettings::builder()
    ///     .quality(0.75)
    ///     .output_mode(OutputMode::Webp)
    ///     .concurrent_limit(8)
    ///     .build()
    ///     .expect("valid settings");
    /// ```
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `quality` is outside `0.0..=1.0` or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(Error::config(format!(
                "quality must be within 0.0..=1.0, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Returns the quality as the integer percentage the codec expects.
    #[must_use]
    pub fn quality_percent(&self) -> u8 {
        (self.quality * 100.0).round() as u8
    }

    /// Returns true when this run semantically replaces the original files.
    ///
    /// `delete_original` intentionally does not apply in [`OutputMode::Same`]:
    /// the `.webp` sibling already stands in for the source file, and the
    /// original is left untouched on disk.
    #[must_use]
    pub const fn deletes_originals(&self) -> bool {
        self.delete_original && !matches!(self.output_mode, OutputMode::Same)
    }
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            delete_original: true,
            output_mode: OutputMode::Webp,
            custom_output_path: PathBuf::new(),
            concurrent_limit: DEFAULT_CONCURRENT_LIMIT,
        }
    }
}

/// Builder for creating [`ConvertSettings`].
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    quality: Option<f32>,
    delete_original: Option<bool>,
    output_mode: Option<OutputMode>,
    custom_output_path: Option<PathBuf>,
    concurrent_limit: Option<usize>,
}

impl SettingsBuilder {
    /// Sets the WebP quality factor (`0.0..=1.0`).
    #[must_use]
    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Enables or disables deleting originals after successful conversion.
    #[must_use]
    pub fn delete_original(mut self, enabled: bool) -> Self {
        self.delete_original = Some(enabled);
        self
    }

    /// Sets the output path policy.
    #[must_use]
    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = Some(mode);
        self
    }

    /// Sets the target directory used with [`OutputMode::Custom`].
    #[must_use]
    pub fn custom_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_output_path = Some(path.into());
        self
    }

    /// Sets the maximum number of simultaneous conversions.
    ///
    /// Values below 1 are clamped to 1 (serial execution).
    #[must_use]
    pub fn concurrent_limit(mut self, limit: usize) -> Self {
        self.concurrent_limit = Some(limit);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<ConvertSettings> {
        let settings = ConvertSettings {
            quality: self.quality.unwrap_or(DEFAULT_QUALITY),
            delete_original: self.delete_original.unwrap_or(true),
            output_mode: self.output_mode.unwrap_or(OutputMode::Webp),
            custom_output_path: self.custom_output_path.unwrap_or_default(),
            concurrent_limit: self.concurrent_limit.unwrap_or(DEFAULT_CONCURRENT_LIMIT).max(1),
        };

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ConvertSettings::builder().build().unwrap();
        assert!((settings.quality - DEFAULT_QUALITY).abs() < f32::EPSILON);
        assert!(settings.delete_original);
        assert_eq!(settings.output_mode, OutputMode::Webp);
        assert!(settings.custom_output_path.as_os_str().is_empty());
        assert_eq!(settings.concurrent_limit, DEFAULT_CONCURRENT_LIMIT);
    }

    #[test]
    fn test_quality_out_of_range() {
        assert!(ConvertSettings::builder().quality(1.5).build().is_err());
        assert!(ConvertSettings::builder().quality(-0.1).build().is_err());
        assert!(ConvertSettings::builder().quality(f32::NAN).build().is_err());
    }

    #[test]
    fn test_quality_percent_rounds() {
        let settings = ConvertSettings::builder().quality(0.8).build().unwrap();
        assert_eq!(settings.quality_percent(), 80);

        let settings = ConvertSettings::builder().quality(0.755).build().unwrap();
        assert_eq!(settings.quality_percent(), 76);
    }

    #[test]
    fn test_concurrent_limit_clamped() {
        let settings = ConvertSettings::builder().concurrent_limit(0).build().unwrap();
        assert_eq!(settings.concurrent_limit, 1);
    }

    #[test]
    fn test_deletes_originals_skipped_in_same_mode() {
        let settings = ConvertSettings::builder()
            .delete_original(true)
            .output_mode(OutputMode::Same)
            .build()
            .unwrap();
        assert!(!settings.deletes_originals());

        let settings = ConvertSettings::builder()
            .delete_original(true)
            .output_mode(OutputMode::Webp)
            .build()
            .unwrap();
        assert!(settings.deletes_originals());
    }
}
