//! Ordinal road condition levels reported by riders.
//!
//! The enum offers compile-time safety for condition lookups and carries the
//! fixed score each level contributes to route quality.
//!
//! # Examples
//! ```
//! use roadwise_core::RoadCondition;
//!
//! assert_eq!(RoadCondition::Optimal.as_str(), "optimal");
//! assert!(RoadCondition::Medium > RoadCondition::Maintenance);
//! ```

use std::{cmp::Ordering, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::probability::NEUTRAL;

/// Physical condition of a road segment, best first.
///
/// Ordering follows road quality: `Optimal > Medium > Sufficient >
/// Maintenance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RoadCondition {
    /// Smooth surface, nothing to report.
    Optimal,
    /// Minor wear.
    Medium,
    /// Rideable with care.
    Sufficient,
    /// Needs repair.
    Maintenance,
}

impl RoadCondition {
    /// Every level, best first.
    pub const ALL: [Self; 4] = [
        Self::Optimal,
        Self::Medium,
        Self::Sufficient,
        Self::Maintenance,
    ];

    /// Return the condition as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Medium => "medium",
            Self::Sufficient => "sufficient",
            Self::Maintenance => "maintenance",
        }
    }

    /// Fixed quality score for this level in `0.0..=1.0`.
    ///
    /// # Examples
    /// ```
    /// use roadwise_core::RoadCondition;
    ///
    /// assert_eq!(RoadCondition::Optimal.score(), 1.0);
    /// assert_eq!(RoadCondition::Maintenance.score(), 0.1);
    /// ```
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Optimal => 1.0,
            Self::Medium => 0.7,
            Self::Sufficient => 0.45,
            Self::Maintenance => 0.1,
        }
    }

    /// Score a raw condition label, returning the neutral `0.5` for labels
    /// that do not name a known level.
    ///
    /// # Examples
    /// ```
    /// use roadwise_core::RoadCondition;
    ///
    /// assert_eq!(RoadCondition::score_label("MEDIUM"), 0.7);
    /// assert_eq!(RoadCondition::score_label("potholes"), 0.5);
    /// ```
    #[must_use]
    pub fn score_label(label: &str) -> f64 {
        label.parse::<Self>().map_or(NEUTRAL, Self::score)
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Optimal => 3,
            Self::Medium => 2,
            Self::Sufficient => 1,
            Self::Maintenance => 0,
        }
    }
}

impl PartialOrd for RoadCondition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RoadCondition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for RoadCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label names no known condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown road condition '{label}'")]
pub struct UnknownCondition {
    /// The rejected label.
    pub label: String,
}

impl FromStr for RoadCondition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "optimal" => Ok(Self::Optimal),
            "medium" => Ok(Self::Medium),
            "sufficient" => Ok(Self::Sufficient),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(UnknownCondition {
                label: s.to_owned(),
            }),
        }
    }
}
