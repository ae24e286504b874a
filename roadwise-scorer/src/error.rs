//! Error types raised while configuring the route quality engine.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised when an [`EngineConfig`](crate::EngineConfig) is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The segment hit threshold was negative or not finite.
    #[error("hit threshold must be a finite, non-negative distance in metres, got {value}")]
    InvalidHitThreshold {
        /// Rejected threshold.
        value: f64,
    },
    /// The bounding-box expansion was negative or not finite.
    #[error("bounding box expansion must be finite and non-negative, got {value}")]
    InvalidBoxExpansion {
        /// Rejected expansion in degrees.
        value: f64,
    },
    /// Downsampling needs at least the two end points of a line.
    #[error("lines must keep at least 2 points when downsampled, got {value}")]
    TooFewLinePoints {
        /// Rejected point limit.
        value: usize,
    },
    /// The freshness half-life was zero, negative or not finite.
    #[error("half-life must be a positive number of days, got {value}")]
    InvalidHalfLife {
        /// Rejected half-life in days.
        value: f64,
    },
    /// At least one report must be merged per segment.
    #[error("report limit must be at least 1")]
    ZeroReportLimit,
    /// Ranking weights were negative, not finite or summed to zero.
    #[error("ranking weights must be finite, non-negative and sum to a positive value")]
    InvalidWeights,
    /// The low-confidence threshold fell outside `0.0..=1.0`.
    #[error("low-confidence threshold must lie within 0.0..=1.0, got {value}")]
    InvalidConfidenceThreshold {
        /// Rejected threshold.
        value: f64,
    },
    /// Decoding a JSON configuration document failed.
    #[error("failed to parse engine configuration")]
    Parse {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}
