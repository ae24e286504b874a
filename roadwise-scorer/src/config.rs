//! Tunable parameters for matching, merging and ranking.
//!
//! Every struct defaults to the engine's documented constants and exposes a
//! `validate` method that returns a copy when the values are usable. With the
//! `serde` feature the whole tree deserialises from JSON, and missing fields
//! fall back to their defaults.
//!
//! # Examples
//! ```
//! use roadwise_scorer::EngineConfig;
//!
//! let config = EngineConfig::default().validate()?;
//! assert_eq!(config.matching.hit_threshold_m, 30.0);
//! assert_eq!(config.merge.half_life_days, 30.0);
//! # Ok::<(), roadwise_scorer::ConfigError>(())
//! ```
#![expect(
    clippy::float_arithmetic,
    reason = "weight validation sums floating-point weights"
)]

use roadwise_core::{DEFAULT_REPORT_LIMIT, NEUTRAL, geometry::MAX_LINE_POINTS};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::decay::DEFAULT_HALF_LIFE_DAYS;

/// Segment matching parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct MatchConfig {
    /// Largest route/segment distance in metres that still counts as a hit.
    pub hit_threshold_m: f64,
    /// Degrees added to every side of the route's bounding box before
    /// pre-filtering segments; roughly 200–300 m at mid-latitudes.
    pub bbox_expansion_deg: f64,
    /// Points kept per line when approximating line distances.
    pub max_line_points: usize,
}

impl MatchConfig {
    /// Validate the parameters and return a copy.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for negative or non-finite distances and for
    /// point limits below two.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !is_non_negative(self.hit_threshold_m) {
            return Err(ConfigError::InvalidHitThreshold {
                value: self.hit_threshold_m,
            });
        }
        if !is_non_negative(self.bbox_expansion_deg) {
            return Err(ConfigError::InvalidBoxExpansion {
                value: self.bbox_expansion_deg,
            });
        }
        if self.max_line_points < 2 {
            return Err(ConfigError::TooFewLinePoints {
                value: self.max_line_points,
            });
        }
        Ok(self)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            hit_threshold_m: 30.0,
            bbox_expansion_deg: 0.0025,
            max_line_points: MAX_LINE_POINTS,
        }
    }
}

/// Report merging parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct MergeConfig {
    /// Days after which a report's freshness weight halves.
    pub half_life_days: f64,
    /// Most recent reports merged per segment.
    pub max_reports: usize,
}

impl MergeConfig {
    /// Validate the parameters and return a copy.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidHalfLife`] or
    /// [`ConfigError::ZeroReportLimit`].
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.half_life_days.is_finite() && self.half_life_days > 0.0) {
            return Err(ConfigError::InvalidHalfLife {
                value: self.half_life_days,
            });
        }
        if self.max_reports == 0 {
            return Err(ConfigError::ZeroReportLimit);
        }
        Ok(self)
    }

    /// Number of reports to merge per segment.
    ///
    /// An unvalidated zero cap falls back to [`DEFAULT_REPORT_LIMIT`].
    #[must_use]
    pub const fn report_limit(&self) -> usize {
        if self.max_reports == 0 {
            DEFAULT_REPORT_LIMIT
        } else {
            self.max_reports
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            half_life_days: DEFAULT_HALF_LIFE_DAYS,
            max_reports: DEFAULT_REPORT_LIMIT,
        }
    }
}

/// Relative weighting between route efficiency and road quality.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RankingWeights {
    /// Multiplier applied to the effectiveness component.
    pub effectiveness: f64,
    /// Multiplier applied to the quality component.
    pub quality: f64,
}

impl RankingWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidWeights`] when either value is negative
    /// or not finite, or when the total weight is zero.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ConfigError::InvalidWeights)
        }
    }

    fn is_valid(self) -> bool {
        is_non_negative(self.effectiveness)
            && is_non_negative(self.quality)
            && (self.effectiveness + self.quality) > 0.0
    }
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            effectiveness: 0.5,
            quality: 0.5,
        }
    }
}

/// Normalised value assigned when every candidate shares the same distance
/// (or duration), leaving min–max normalisation without a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TiedNormalization {
    /// Tied values normalise to `0.5`, so the component neither helps nor
    /// hurts any candidate.
    #[default]
    Neutral,
    /// Tied values normalise to `1.0`, as if every candidate were the
    /// costliest.
    Maximal,
}

impl TiedNormalization {
    /// Normalised value used for tied inputs.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Neutral => NEUTRAL,
            Self::Maximal => 1.0,
        }
    }
}

/// Ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RankingConfig {
    /// Component weights for the composite score.
    pub weights: RankingWeights,
    /// Evidence scores below this value produce a `low` confidence label.
    pub low_confidence_threshold: f64,
    /// Policy for min–max normalisation of tied inputs.
    pub tied_normalization: TiedNormalization,
}

impl RankingConfig {
    /// Validate the parameters and return a copy.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for invalid weights or a threshold outside
    /// `0.0..=1.0`.
    pub fn validate(self) -> Result<Self, ConfigError> {
        self.weights.validate()?;
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err(ConfigError::InvalidConfidenceThreshold {
                value: self.low_confidence_threshold,
            });
        }
        Ok(self)
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            low_confidence_threshold: 0.35,
            tied_normalization: TiedNormalization::default(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EngineConfig {
    /// Segment matching parameters.
    pub matching: MatchConfig,
    /// Report merging parameters.
    pub merge: MergeConfig,
    /// Ranking parameters.
    pub ranking: RankingConfig,
}

impl EngineConfig {
    /// Validate every section and return a copy.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(self) -> Result<Self, ConfigError> {
        self.matching.validate()?;
        self.merge.validate()?;
        self.ranking.validate()?;
        Ok(self)
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// Absent fields take their default values.
    ///
    /// # Examples
    /// ```
    /// use roadwise_scorer::{EngineConfig, TiedNormalization};
    ///
    /// let config = EngineConfig::from_json_str(
    ///     r#"{"ranking": {"weights": {"effectiveness": 0.3, "quality": 0.7}, "tiedNormalization": "maximal"}}"#,
    /// )?;
    /// assert_eq!(config.ranking.weights.quality, 0.7);
    /// assert_eq!(config.ranking.tied_normalization, TiedNormalization::Maximal);
    /// assert_eq!(config.matching.hit_threshold_m, 30.0);
    /// # Ok::<(), roadwise_scorer::ConfigError>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error for unusable values.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        config.validate()
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
