//! Star rating aggregation.

use crate::types::Review;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean star rating of a space, or the "no reviews yet" sentinel.
///
/// Serialized as a number or `null`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum AverageRating {
    /// The space has no reviews
    Unrated,
    /// Mean of all star ratings (between 1.0 and 5.0)
    Rated(f64),
}

impl AverageRating {
    /// The mean, if there is one.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Unrated => None,
            Self::Rated(value) => Some(value),
        }
    }
}

impl From<Option<f64>> for AverageRating {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unrated, Self::Rated)
    }
}

impl From<AverageRating> for Option<f64> {
    fn from(rating: AverageRating) -> Self {
        rating.value()
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrated => f.write_str("New"),
            Self::Rated(value) => write!(f, "{value:.1}"),
        }
    }
}

/// Review count and mean rating for a space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Number of reviews
    pub count: u32,
    /// Mean star rating
    pub average: AverageRating,
}

impl RatingSummary {
    /// Summary of a space nobody has reviewed.
    pub const UNRATED: Self = Self {
        count: 0,
        average: AverageRating::Unrated,
    };

    /// Returns `true` if at least one review contributed.
    #[must_use]
    pub const fn is_rated(&self) -> bool {
        matches!(self.average, AverageRating::Rated(_))
    }
}

/// Summarizes exactly the reviews passed in.
///
/// An empty set yields [`AverageRating::Unrated`], never a division by zero.
#[must_use]
#[allow(clippy::cast_precision_loss)] // star totals are tiny
pub fn summarize<'a, I>(reviews: I) -> RatingSummary
where
    I: IntoIterator<Item = &'a Review>,
{
    let (count, total) = reviews
        .into_iter()
        .fold((0u64, 0u64), |(count, total), review| {
            (count + 1, total + u64::from(review.stars.get()))
        });

    if count == 0 {
        return RatingSummary::UNRATED;
    }

    RatingSummary {
        count: u32::try_from(count).unwrap_or(u32::MAX),
        average: AverageRating::Rated(total as f64 / count as f64),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;
    use crate::types::{SpaceId, Stars, UserId};
    use chrono::Utc;

    fn reviews(stars: &[i64]) -> Vec<Review> {
        let space = SpaceId::new();
        stars
            .iter()
            .map(|s| {
                Review::new(
                    space,
                    UserId::new(),
                    Stars::new(*s).unwrap(),
                    "Lovely place".to_string(),
                    Utc::now(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_set_is_unrated() {
        let summary = summarize(&reviews(&[]));
        assert_eq!(summary, RatingSummary::UNRATED);
        assert!(!summary.is_rated());
        assert_eq!(summary.average.value(), None);
    }

    #[test]
    fn mean_of_three_four_five_is_four() {
        let summary = summarize(&reviews(&[3, 4, 5]));
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, AverageRating::Rated(4.0));
    }

    #[test]
    fn fractional_mean() {
        let summary = summarize(&reviews(&[4, 5]));
        assert_eq!(summary.average.value(), Some(4.5));
        assert_eq!(summary.average.to_string(), "4.5");
    }

    #[test]
    fn unrated_serializes_as_null() {
        let json = serde_json::to_value(RatingSummary::UNRATED).unwrap();
        assert_eq!(json, serde_json::json!({ "count": 0, "average": null }));
        assert_eq!(AverageRating::Unrated.to_string(), "New");
    }

    #[test]
    fn reflects_set_at_call_time() {
        let mut set = reviews(&[5]);
        assert_eq!(summarize(&set).average.value(), Some(5.0));

        set.extend(reviews(&[1]));
        assert_eq!(summarize(&set).average.value(), Some(3.0));

        set.clear();
        assert_eq!(summarize(&set), RatingSummary::UNRATED);
    }
}
