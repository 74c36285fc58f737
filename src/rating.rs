use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    #[error("rating {0} is outside 0.0..=5.0 or not a multiple of 0.5")]
    OutOfRange(f32),

    #[error("'{0}' is not a rating")]
    NotANumber(String),
}

/// A score on a 0.0 to 5.0 scale in half-star steps.
///
/// Stored as a count of half stars, so `3.5` is `7` and `5.0` is `10`.
/// Comparing two ratings never suffers from float rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Rating(u8);

impl Rating {
    const MAX_HALVES: u8 = 10;

    pub const MIN: Rating = Rating(0);
    pub const MAX: Rating = Rating(Self::MAX_HALVES);

    /// Validates `value` against the 0.0..=5.0 range and the 0.5 step.
    pub fn new(value: f32) -> Result<Self, RatingError> {
        if !value.is_finite() || !(0.0..=5.0).contains(&value) {
            return Err(RatingError::OutOfRange(value));
        }

        let doubled = value * 2.0;
        if doubled.fract() != 0.0 {
            return Err(RatingError::OutOfRange(value));
        }

        Ok(Self(doubled as u8))
    }

    /// Rounds `value` to the nearest half star. Values outside 0.0..=5.0 are still rejected.
    pub fn nearest(value: f32) -> Result<Self, RatingError> {
        if !value.is_finite() || !(0.0..=5.0).contains(&value) {
            return Err(RatingError::OutOfRange(value));
        }

        Ok(Self((value * 2.0).round() as u8))
    }

    pub fn as_f32(&self) -> f32 {
        f32::from(self.0) / 2.0
    }

    /// Number of half stars, 0..=10.
    pub fn halves(&self) -> u8 {
        self.0
    }
}

impl TryFrom<f32> for Rating {
    type Error = RatingError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for f32 {
    fn from(value: Rating) -> Self {
        value.as_f32()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_f32())
    }
}

impl std::str::FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<f32>()
            .map_err(|_| RatingError::NotANumber(s.to_string()))?;
        Rating::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_half_steps_within_range() {
        for halves in 0..=10u8 {
            let value = f32::from(halves) / 2.0;
            let rating = Rating::new(value).unwrap();
            assert_eq!(rating.halves(), halves);
            assert_eq!(rating.as_f32(), value);
        }
    }

    #[test]
    fn rejects_out_of_range_and_off_step() {
        assert!(Rating::new(-0.5).is_err());
        assert!(Rating::new(5.5).is_err());
        assert!(Rating::new(4.2).is_err());
        assert!(Rating::new(f32::NAN).is_err());
    }

    #[test]
    fn nearest_snaps_to_half_stars() {
        assert_eq!(Rating::nearest(3.7).unwrap(), Rating::new(3.5).unwrap());
        assert_eq!(Rating::nearest(3.8).unwrap(), Rating::new(4.0).unwrap());
        assert_eq!(Rating::nearest(0.2).unwrap(), Rating::MIN);
        assert_eq!(Rating::nearest(4.5).unwrap(), Rating::new(4.5).unwrap());
        assert!(Rating::nearest(5.1).is_err());
        assert!(Rating::nearest(-0.1).is_err());
    }

    #[test]
    fn displays_with_one_decimal() {
        assert_eq!(Rating::new(4.0).unwrap().to_string(), "4.0");
        assert_eq!(Rating::new(3.5).unwrap().to_string(), "3.5");
        assert_eq!(Rating::MIN.to_string(), "0.0");
    }

    #[test]
    fn parses_from_text() {
        assert_eq!("4.5".parse::<Rating>().unwrap(), Rating::new(4.5).unwrap());
        assert_eq!("5".parse::<Rating>().unwrap(), Rating::MAX);
        assert!("four".parse::<Rating>().is_err());
    }

    #[test]
    fn serializes_as_number() {
        let rating = Rating::new(2.5).unwrap();
        assert_eq!(serde_json::to_string(&rating).unwrap(), "2.5");
        let back: Rating = serde_json::from_str("2.5").unwrap();
        assert_eq!(back, rating);
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }
}
