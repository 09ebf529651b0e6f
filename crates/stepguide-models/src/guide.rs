//! Guide artifact models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric identifier of a guide.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GuideId(pub i64);

/// Returned when text does not parse as a guide identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("guide_id must be a whole number, got '{0}'")]
pub struct InvalidGuideId(pub String);

impl GuideId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for GuideId {
    type Err = InvalidGuideId;

    /// Surrounding whitespace is ignored. Decimal and exponent notation are
    /// accepted when the value is a whole number (`42.0`, `1e2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<i64>() {
            return Ok(Self(id));
        }

        trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && n.fract() == 0.0)
            .filter(|n| *n >= i64::MIN as f64 && *n < i64::MAX as f64)
            .map(|n| Self(n as i64))
            .ok_or_else(|| InvalidGuideId(s.to_string()))
    }
}

impl fmt::Display for GuideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for GuideId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One extracted frame reference within a guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Position in the guide (1-indexed)
    pub index: u32,

    /// Timestamp of the frame in seconds
    pub second: u32,

    /// Display label
    pub title: String,

    /// Reference to the frame image
    pub image_url: String,
}

impl Step {
    /// Create a new step.
    pub fn new(index: u32, second: u32, title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            index,
            second,
            title: title.into(),
            image_url: image_url.into(),
        }
    }
}

/// Violations of the guide artifact invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    #[error("guide {0} has no steps")]
    Empty(GuideId),

    #[error("step at position {position} has index {found}, expected {expected}")]
    NonContiguousIndex {
        position: usize,
        expected: u32,
        found: u32,
    },

    #[error("step {index} goes back in time ({found}s after {previous}s)")]
    DecreasingSecond { index: u32, previous: u32, found: u32 },
}

/// The ordered list of steps produced for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideArtifact {
    pub guide_id: GuideId,
    pub steps: Vec<Step>,
}

impl GuideArtifact {
    pub fn new(guide_id: GuideId, steps: Vec<Step>) -> Self {
        Self { guide_id, steps }
    }

    /// Check that steps are non-empty, indexed 1..=n and never go back in time.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.steps.is_empty() {
            return Err(ArtifactError::Empty(self.guide_id));
        }

        let mut previous_second = 0;
        for (position, step) in self.steps.iter().enumerate() {
            let expected = position as u32 + 1;
            if step.index != expected {
                return Err(ArtifactError::NonContiguousIndex {
                    position,
                    expected,
                    found: step.index,
                });
            }
            if step.second < previous_second {
                return Err(ArtifactError::DecreasingSecond {
                    index: step.index,
                    previous: previous_second,
                    found: step.second,
                });
            }
            previous_second = step.second;
        }

        Ok(())
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: u32, second: u32) -> Step {
        Step::new(index, second, format!("Frame {}", second), "https://img.test/frame.jpg")
    }

    #[test]
    fn test_guide_id_parsing() {
        assert_eq!("42".parse::<GuideId>(), Ok(GuideId(42)));
        assert_eq!(" 7 ".parse::<GuideId>(), Ok(GuideId(7)));
        assert_eq!("-1".parse::<GuideId>(), Ok(GuideId(-1)));
        assert_eq!("0".parse::<GuideId>(), Ok(GuideId(0)));
        assert!("abc".parse::<GuideId>().is_err());
        assert!("".parse::<GuideId>().is_err());
        assert!("12abc".parse::<GuideId>().is_err());
    }

    #[test]
    fn test_guide_id_whole_number_notations() {
        assert_eq!("42.0".parse::<GuideId>(), Ok(GuideId(42)));
        assert_eq!("1e2".parse::<GuideId>(), Ok(GuideId(100)));
        assert_eq!("-3.0".parse::<GuideId>(), Ok(GuideId(-3)));
        assert_eq!(" 2.5e1 ".parse::<GuideId>(), Ok(GuideId(25)));

        assert!("4.5".parse::<GuideId>().is_err());
        assert!("NaN".parse::<GuideId>().is_err());
        assert!("inf".parse::<GuideId>().is_err());
        assert!("1e300".parse::<GuideId>().is_err());
    }

    #[test]
    fn test_guide_id_serializes_as_number() {
        let artifact = GuideArtifact::new(GuideId(42), vec![step(1, 5)]);
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["guide_id"], serde_json::json!(42));
        assert_eq!(json["steps"][0]["image_url"], "https://img.test/frame.jpg");
    }

    #[test]
    fn test_valid_artifact() {
        let artifact = GuideArtifact::new(GuideId(1), vec![step(1, 5), step(2, 5), step(3, 15)]);
        assert!(artifact.validate().is_ok());
        assert_eq!(artifact.len(), 3);
    }

    #[test]
    fn test_empty_artifact_rejected() {
        let artifact = GuideArtifact::new(GuideId(9), vec![]);
        assert_eq!(artifact.validate(), Err(ArtifactError::Empty(GuideId(9))));
    }

    #[test]
    fn test_index_gap_rejected() {
        let artifact = GuideArtifact::new(GuideId(1), vec![step(1, 5), step(3, 10)]);
        assert_eq!(
            artifact.validate(),
            Err(ArtifactError::NonContiguousIndex {
                position: 1,
                expected: 2,
                found: 3
            })
        );

        let zero_based = GuideArtifact::new(GuideId(1), vec![step(0, 5)]);
        assert!(zero_based.validate().is_err());
    }

    #[test]
    fn test_decreasing_second_rejected() {
        let artifact = GuideArtifact::new(GuideId(1), vec![step(1, 10), step(2, 5)]);
        assert_eq!(
            artifact.validate(),
            Err(ArtifactError::DecreasingSecond {
                index: 2,
                previous: 10,
                found: 5
            })
        );
    }
}
