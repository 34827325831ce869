//! Engagement scoring, read-time estimation, and the synthetic-count policy.
//!
//! # Engagement score
//!
//! ```text
//! score = min((comments * 0.4 + likes * 0.3 + shares * 0.3) / views * 100, 100)
//! ```
//!
//! rounded to two decimals; zero views score `0.0`.
//!
//! # Synthetic counts
//!
//! Article pages often carry no engagement counters. Missing counts are filled
//! by a [`MetricFallback`] so the score stays defined. [`RandomMetrics`] draws
//! uniformly from [`MetricField::synthetic_range`]; tests inject fixed values.

use crate::models::MetricField;
use rand::{Rng, rng};

const COMMENT_WEIGHT: f64 = 0.4;
const LIKE_WEIGHT: f64 = 0.3;
const SHARE_WEIGHT: f64 = 0.3;
const MAX_SCORE: f64 = 100.0;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

pub fn engagement_score(views: u64, comments: u64, likes: u64, shares: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    let weighted =
        comments as f64 * COMMENT_WEIGHT + likes as f64 * LIKE_WEIGHT + shares as f64 * SHARE_WEIGHT;
    let raw = weighted / views as f64 * 100.0;
    round2(raw.min(MAX_SCORE))
}

/// Estimated reading time in whole minutes, never less than one.
///
/// Halves round to even.
pub fn read_minutes(word_count: u64, words_per_minute: u32) -> u32 {
    if words_per_minute == 0 {
        return 1;
    }
    let minutes = (word_count as f64 / words_per_minute as f64).round_ties_even();
    (minutes as u32).max(1)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Supplies a value for an engagement count that could not be extracted.
pub trait MetricFallback {
    fn synthesize(&self, field: MetricField) -> u64;
}

/// Uniform random values within each field's synthetic range.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomMetrics;

impl MetricFallback for RandomMetrics {
    fn synthesize(&self, field: MetricField) -> u64 {
        let (low, high) = field.synthetic_range();
        rng().random_range(low..=high)
    }
}

/// Always returns the same value per field.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics {
    pub views: u64,
    pub comments: u64,
    pub likes: u64,
    pub shares: u64,
}

#[cfg(test)]
impl FixedMetrics {
    /// The lower bound of every synthetic range.
    pub fn lower_bounds() -> Self {
        FixedMetrics {
            views: MetricField::Views.synthetic_range().0,
            comments: MetricField::Comments.synthetic_range().0,
            likes: MetricField::Likes.synthetic_range().0,
            shares: MetricField::Shares.synthetic_range().0,
        }
    }
}

#[cfg(test)]
impl MetricFallback for FixedMetrics {
    fn synthesize(&self, field: MetricField) -> u64 {
        match field {
            MetricField::Views => self.views,
            MetricField::Comments => self.comments,
            MetricField::Likes => self.likes,
            MetricField::Shares => self.shares,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_views_scores_zero() {
        assert_eq!(engagement_score(0, 100, 100, 100), 0.0);
        assert_eq!(engagement_score(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_weighted_formula() {
        // (10*0.4 + 20*0.3 + 10*0.3) / 1000 * 100 = 1.3
        assert_eq!(engagement_score(1000, 10, 20, 10), 1.3);
        // (1*0.4) / 3 * 100 = 13.333.. -> 13.33
        assert_eq!(engagement_score(3, 1, 0, 0), 13.33);
    }

    #[test]
    fn test_round2_halves_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(13.3333), 13.33);
    }

    #[test]
    fn test_score_is_capped() {
        assert_eq!(engagement_score(1, 1000, 1000, 1000), 100.0);
        assert_eq!(engagement_score(100, 200, 1000, 500), 100.0);
    }

    #[test]
    fn test_score_bounds_over_grid() {
        for views in [0u64, 1, 7, 100, 50_000] {
            for count in [0u64, 1, 200, 1000] {
                let score = engagement_score(views, count, count, count);
                assert!((0.0..=100.0).contains(&score), "{views} {count} -> {score}");
            }
        }
    }

    #[test]
    fn test_read_minutes() {
        assert_eq!(read_minutes(400, DEFAULT_WORDS_PER_MINUTE), 2);
        assert_eq!(read_minutes(0, DEFAULT_WORDS_PER_MINUTE), 1);
        assert_eq!(read_minutes(50, DEFAULT_WORDS_PER_MINUTE), 1);
        assert_eq!(read_minutes(1000, DEFAULT_WORDS_PER_MINUTE), 5);
        assert_eq!(read_minutes(500, DEFAULT_WORDS_PER_MINUTE), 2);
        assert_eq!(read_minutes(700, DEFAULT_WORDS_PER_MINUTE), 4);
        assert_eq!(read_minutes(300, 100), 3);
    }

    #[test]
    fn test_random_metrics_within_range() {
        let fallback = RandomMetrics;
        for field in MetricField::ALL {
            let (low, high) = field.synthetic_range();
            for _ in 0..200 {
                let value = fallback.synthesize(field);
                assert!(value >= low && value <= high, "{field:?} {value}");
            }
        }
    }

    #[test]
    fn test_fixed_metrics() {
        let fixed = FixedMetrics::lower_bounds();
        assert_eq!(fixed.synthesize(MetricField::Views), 100);
        assert_eq!(fixed.synthesize(MetricField::Shares), 0);
    }
}
