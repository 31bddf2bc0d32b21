//! Review summary calculator.
//!
//! The summary describes the reviews it is given and nothing else: callers
//! pass the currently loaded page, so the figures are per-page figures.

use serde::Serialize;

use crate::{Rating, Review};

/// Occurrence count for every integer score `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RatingHistogram([u32; 10]);

impl RatingHistogram {
    fn record(&mut self, rating: Rating) {
        self.0[(rating.value() - Rating::MIN) as usize] += 1;
    }

    /// Count for a score. Scores outside `1..=10` have no bucket.
    pub fn count(&self, score: u8) -> u32 {
        if (Rating::MIN..=Rating::MAX).contains(&score) {
            self.0[(score - Rating::MIN) as usize]
        } else {
            0
        }
    }

    /// Sum of all buckets.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Share of a bucket in percent.
    pub fn percentage(&self, score: u8) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(score) as f64 / total as f64 * 100.0
    }

    /// `(score, count)` pairs from the highest score down.
    pub fn iter_desc(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (Rating::MIN..=Rating::MAX).rev().map(|score| (score, self.count(score)))
    }
}

/// Mean of each detailed sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryAverages {
    pub cleanliness: f64,
    pub comfort: f64,
    pub location: f64,
    pub service: f64,
    pub value: f64,
    /// Number of reviews that carried detailed ratings.
    pub contributors: u32,
}

impl CategoryAverages {
    /// `(label, average)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("Cleanliness", self.cleanliness),
            ("Comfort", self.comfort),
            ("Location", self.location),
            ("Service", self.service),
            ("Value for money", self.value),
        ]
    }
}

/// Aggregate figures for a set of reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub total: u32,
    pub average: f64,
    pub histogram: RatingHistogram,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryAverages>,
}

impl ReviewSummary {
    /// The summary of no reviews.
    pub fn empty() -> Self {
        Self {
            total: 0,
            average: 0.0,
            histogram: RatingHistogram::default(),
            categories: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Mean rounded to one decimal for display.
    pub fn display_average(&self) -> f64 {
        (self.average * 10.0).round() / 10.0
    }

    /// Qualitative label for the mean score.
    pub fn label(&self) -> &'static str {
        rating_label(self.average)
    }
}

impl Default for ReviewSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Qualitative label for a score on the 10-point scale.
pub fn rating_label(score: f64) -> &'static str {
    match score {
        s if s >= 9.0 => "Exceptional",
        s if s >= 8.0 => "Excellent",
        s if s >= 7.0 => "Very good",
        s if s >= 6.0 => "Good",
        s if s >= 5.0 => "Fair",
        _ => "Poor",
    }
}

#[derive(Default)]
struct CategorySums {
    cleanliness: u64,
    comfort: u64,
    location: u64,
    service: u64,
    value: u64,
    count: u32,
}

/// Derive the summary of `reviews`.
pub fn summarize(reviews: &[Review]) -> ReviewSummary {
    if reviews.is_empty() {
        return ReviewSummary::empty();
    }

    let mut histogram = RatingHistogram::default();
    let mut rating_sum: u64 = 0;
    let mut sums = CategorySums::default();

    for review in reviews {
        rating_sum += review.rating.value() as u64;
        histogram.record(review.rating);

        if let Some(detail) = &review.detailed_ratings {
            sums.cleanliness += detail.cleanliness.value() as u64;
            sums.comfort += detail.comfort.value() as u64;
            sums.location += detail.location.value() as u64;
            sums.service += detail.service.value() as u64;
            sums.value += detail.value.value() as u64;
            sums.count += 1;
        }
    }

    let total = reviews.len() as u32;
    let categories = (sums.count > 0).then(|| {
        let n = sums.count as f64;
        CategoryAverages {
            cleanliness: sums.cleanliness as f64 / n,
            comfort: sums.comfort as f64 / n,
            location: sums.location as f64 / n,
            service: sums.service as f64 / n,
            value: sums.value as f64 / n,
            contributors: sums.count,
        }
    });

    ReviewSummary {
        total,
        average: rating_sum as f64 / total as f64,
        histogram,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DetailedRatings, ReviewId};
    use chrono::{TimeZone, Utc};

    fn review(id: &str, rating: u8) -> Review {
        Review {
            id: ReviewId::new(id),
            user_id: None,
            user_name: "Guest".to_string(),
            user_avatar: None,
            accommodation_code: None,
            rating: Rating::new(rating).unwrap(),
            title: String::new(),
            comment: String::new(),
            pros: None,
            cons: None,
            is_verified: false,
            check_in_date: None,
            check_out_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
            helpful_count: 0,
            detailed_ratings: None,
        }
    }

    fn detailed(cleanliness: u8) -> DetailedRatings {
        let eight = Rating::new(8).unwrap();
        DetailedRatings {
            cleanliness: Rating::new(cleanliness).unwrap(),
            comfort: eight,
            location: eight,
            service: eight,
            value: eight,
        }
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average, 0.0);
        assert!((1..=10).all(|score| summary.histogram.count(score) == 0));
        assert!(summary.categories.is_none());
    }

    #[test]
    fn test_mean_and_histogram() {
        let reviews: Vec<Review> = [10, 10, 8, 6]
            .iter()
            .enumerate()
            .map(|(i, r)| review(&i.to_string(), *r))
            .collect();

        let summary = summarize(&reviews);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.average, 8.5);
        assert_eq!(summary.histogram.count(10), 2);
        assert_eq!(summary.histogram.count(8), 1);
        assert_eq!(summary.histogram.count(6), 1);
        for score in [1, 2, 3, 4, 5, 7, 9] {
            assert_eq!(summary.histogram.count(score), 0);
        }
        assert_eq!(summary.histogram.total(), summary.total);
        assert!(summary.categories.is_none());
    }

    #[test]
    fn test_category_average_uses_only_detailed_reviews() {
        let mut reviews = vec![review("a", 9), review("b", 7), review("c", 5), review("d", 3)];
        reviews[0].detailed_ratings = Some(detailed(9));
        reviews[2].detailed_ratings = Some(detailed(7));

        let categories = summarize(&reviews).categories.unwrap();
        assert_eq!(categories.cleanliness, 8.0);
        assert_eq!(categories.comfort, 8.0);
        assert_eq!(categories.contributors, 2);
    }

    #[test]
    fn test_percentage_and_order() {
        let reviews = vec![review("a", 9), review("b", 9), review("c", 4), review("d", 1)];
        let summary = summarize(&reviews);

        assert_eq!(summary.histogram.percentage(9), 50.0);
        assert_eq!(summary.histogram.percentage(11), 0.0);
        let first = summary.histogram.iter_desc().next().unwrap();
        assert_eq!(first, (10, 0));
        assert_eq!(summary.histogram.iter_desc().count(), 10);
    }

    #[test]
    fn test_labels() {
        assert_eq!(rating_label(9.2), "Exceptional");
        assert_eq!(rating_label(8.0), "Excellent");
        assert_eq!(rating_label(6.4), "Good");
        assert_eq!(rating_label(0.0), "Poor");

        let summary = summarize(&[review("a", 8), review("b", 7), review("c", 7)]);
        assert_eq!(summary.display_average(), 7.3);
        assert_eq!(summary.label(), "Very good");
    }
}
