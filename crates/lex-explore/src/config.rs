//! Configuration types for the analysis engine.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic engine setup.

use serde::{Deserialize, Serialize};

/// Default absolute correlation a numeric pair needs to get a scatter plot.
pub const DEFAULT_SCATTER_THRESHOLD: f64 = 0.6;

/// Default number of bins for category-split histograms.
pub const DEFAULT_HISTOGRAM_BINS: usize = 15;

/// Configuration for the analysis engine.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_explore::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .scatter_threshold(0.8)
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum absolute correlation for a scatter plot (0.0 - 1.0).
    /// Default: 0.6
    pub scatter_threshold: f64,

    /// Number of bins used by category-split histograms.
    /// Default: 15
    pub histogram_bins: usize,

    /// Width of generated chart images in pixels.
    /// Default: 1200
    pub image_width: u32,

    /// Height of generated chart images in pixels.
    /// Default: 900
    pub image_height: u32,

    /// Number of CSV rows sampled for schema inference.
    /// Default: 1000
    pub infer_schema_length: usize,

    /// Number of example values listed per numeric column in the summary.
    /// Default: 5
    pub example_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scatter_threshold: DEFAULT_SCATTER_THRESHOLD,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            image_width: 1200,
            image_height: 900,
            infer_schema_length: 1000,
            example_count: 5,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Chart image size as `(width, height)`.
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_threshold(self.scatter_threshold)?;
        validate_bins(self.histogram_bins)?;

        if self.image_width == 0 || self.image_height == 0 {
            return Err(ConfigValidationError::InvalidImageSize {
                width: self.image_width,
                height: self.image_height,
            });
        }

        if self.infer_schema_length == 0 {
            return Err(ConfigValidationError::ZeroValue(
                "infer_schema_length".to_string(),
            ));
        }

        if self.example_count == 0 {
            return Err(ConfigValidationError::ZeroValue("example_count".to_string()));
        }

        Ok(())
    }
}

/// Check a scatter threshold passed directly to an operation.
pub fn validate_threshold(threshold: f64) -> Result<(), ConfigValidationError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigValidationError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// Check a histogram bin count passed directly to an operation.
pub fn validate_bins(bins: usize) -> Result<(), ConfigValidationError> {
    if bins == 0 {
        return Err(ConfigValidationError::InvalidBins(bins));
    }
    Ok(())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid scatter threshold: {0} (must be between 0.0 and 1.0)")]
    InvalidThreshold(f64),

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidBins(usize),

    #[error("Invalid image size: {width}x{height} (both sides must be positive)")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("'{0}' must be at least 1")]
    ZeroValue(String),
}

impl From<ConfigValidationError> for crate::error::AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    scatter_threshold: Option<f64>,
    histogram_bins: Option<usize>,
    image_width: Option<u32>,
    image_height: Option<u32>,
    infer_schema_length: Option<usize>,
    example_count: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Set the minimum absolute correlation for scatter plots.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0
    pub fn scatter_threshold(mut self, threshold: f64) -> Self {
        self.scatter_threshold = Some(threshold);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the chart image size in pixels.
    pub fn image_size(mut self, width: u32, height: u32) -> Self {
        self.image_width = Some(width);
        self.image_height = Some(height);
        self
    }

    /// Set how many CSV rows are sampled to infer column types.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set how many example values the summary lists per numeric column.
    pub fn example_count(mut self, count: usize) -> Self {
        self.example_count = Some(count);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            scatter_threshold: self.scatter_threshold.unwrap_or(defaults.scatter_threshold),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            image_width: self.image_width.unwrap_or(defaults.image_width),
            image_height: self.image_height.unwrap_or(defaults.image_height),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            example_count: self.example_count.unwrap_or(defaults.example_count),
        };

        config.validate()?;
        Ok(config)
    }
}
