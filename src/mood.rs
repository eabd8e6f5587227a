//! # Feature: Mood Ratings
//!
//! Self-reported 1-10 wellbeing ratings submitted alongside the chat. Ratings
//! are validated where they enter the system, acknowledged with a short reply
//! and bucketed for analytics.
//!
//! - **Version**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Validated ratings, banded acknowledgments and distribution buckets

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RatingError;

/// A rating in 1..=10. Can only be built through validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MoodRating(u8);

impl MoodRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> Result<Self, RatingError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(MoodRating(value as u8))
        } else {
            Err(RatingError::OutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn band(self) -> MoodBand {
        match self.0 {
            0..=3 => MoodBand::Difficult,
            4..=6 => MoodBand::Mixed,
            _ => MoodBand::Positive,
        }
    }

    /// Reply sent back after the user submits a rating
    pub fn acknowledgment(self) -> String {
        let follow_up = match self.band() {
            MoodBand::Difficult => "I can see you're going through a difficult time. Remember that these feelings are temporary and you're not alone. Would you like to talk about what's making you feel this way?",
            MoodBand::Mixed => "It sounds like you're having a mixed day. That's completely normal. Is there anything specific that's been on your mind?",
            MoodBand::Positive => "I'm glad to hear you're feeling relatively positive today! What's been going well for you?",
        };
        format!("Thank you for sharing that you're feeling {}/10. {}", self.0, follow_up)
    }
}

impl TryFrom<i64> for MoodRating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        MoodRating::new(value)
    }
}

impl<'de> Deserialize<'de> for MoodRating {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        MoodRating::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for MoodRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodBand {
    Difficult,
    Mixed,
    Positive,
}

/// Counts of ratings per bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodDistribution {
    pub very_low: usize,
    pub low: usize,
    pub neutral: usize,
    pub good: usize,
    pub excellent: usize,
}

impl MoodDistribution {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = MoodRating>,
    {
        let mut distribution = MoodDistribution::default();
        for rating in ratings {
            match rating.value() {
                0..=2 => distribution.very_low += 1,
                3..=4 => distribution.low += 1,
                5..=6 => distribution.neutral += 1,
                7..=8 => distribution.good += 1,
                _ => distribution.excellent += 1,
            }
        }
        distribution
    }

    pub fn total(&self) -> usize {
        self.very_low + self.low + self.neutral + self.good + self.excellent
    }
}

/// Mean of the given ratings, rounded to two decimals
pub fn average_rating(ratings: &[MoodRating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: u32 = ratings.iter().map(|r| u32::from(r.value())).sum();
    let mean = f64::from(sum) / ratings.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}
