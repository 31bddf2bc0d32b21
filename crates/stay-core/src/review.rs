//! Review data models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{AccommodationCode, AccommodationType, CoreError, ReviewId, UserId};

/// An integer review score in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Create a rating, rejecting values outside `1..=10`.
    pub fn new(value: u8) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidRating(value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How out-of-domain ratings from the API are handled at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingPolicy {
    /// Drop values that are not integers in `1..=10`.
    #[default]
    Reject,
    /// Round to the nearest integer and clamp into `1..=10`.
    Clamp,
}

impl RatingPolicy {
    /// Resolve a raw wire score. Non-finite values never resolve.
    pub fn apply(&self, raw: f64) -> Option<Rating> {
        if !raw.is_finite() {
            return None;
        }
        match self {
            RatingPolicy::Reject => {
                let in_range = (Rating::MIN as f64..=Rating::MAX as f64).contains(&raw);
                (in_range && raw.fract() == 0.0).then(|| Rating(raw as u8))
            }
            RatingPolicy::Clamp => {
                let clamped = raw.round().clamp(Rating::MIN as f64, Rating::MAX as f64);
                Some(Rating(clamped as u8))
            }
        }
    }
}

/// Per-category sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedRatings {
    pub cleanliness: Rating,
    pub comfort: Rating,
    pub location: Rating,
    pub service: Rating,
    pub value: Rating,
}

/// A single guest review of an accommodation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: Option<String>,
    #[serde(default)]
    pub accommodation_code: Option<AccommodationCode>,
    pub rating: Rating,
    pub title: String,
    pub comment: String,
    #[serde(default)]
    pub pros: Option<String>,
    #[serde(default)]
    pub cons: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default)]
    pub check_out_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub helpful_count: u32,
    #[serde(default)]
    pub detailed_ratings: Option<DetailedRatings>,
}

impl Review {
    /// Number of nights between check-in and check-out, when both are known.
    pub fn nights(&self) -> Option<i64> {
        match (self.check_in_date, self.check_out_date) {
            (Some(check_in), Some(check_out)) if check_out > check_in => {
                Some((check_out - check_in).num_days())
            }
            _ => None,
        }
    }
}

/// Sub-scores as sent by the API, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailedRatingsRecord {
    #[serde(default, deserialize_with = "lenient_score")]
    pub cleanliness: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub comfort: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub location: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub service: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub value: Option<f64>,
}

impl DetailedRatingsRecord {
    /// Resolve every sub-score; `None` if any of them is missing or fails the policy.
    pub fn resolve(&self, policy: RatingPolicy) -> Option<DetailedRatings> {
        Some(DetailedRatings {
            cleanliness: policy.apply(self.cleanliness?)?,
            comfort: policy.apply(self.comfort?)?,
            location: policy.apply(self.location?)?,
            service: policy.apply(self.service?)?,
            value: policy.apply(self.value?)?,
        })
    }
}

/// A score that may arrive as a number, a numeric string, `null` or junk.
/// Anything that is not a number becomes `None` and is judged by the policy.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// `null` reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A review as sent by the API, before its ratings are validated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: ReviewId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_avatar: Option<String>,
    #[serde(default, alias = "accommodationId")]
    pub accommodation_code: Option<AccommodationCode>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default)]
    pub pros: Option<String>,
    #[serde(default)]
    pub cons: Option<String>,
    #[serde(default, alias = "verified", deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(default)]
    pub check_in_date: Option<NaiveDate>,
    #[serde(default)]
    pub check_out_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub helpful_count: u32,
    #[serde(default)]
    pub detailed_ratings: Option<DetailedRatingsRecord>,
}

impl ReviewRecord {
    /// Validate the record under `policy`.
    ///
    /// An invalid overall rating rejects the whole review. Invalid sub-scores
    /// only drop the detailed block.
    pub fn into_review(self, policy: RatingPolicy) -> Result<Review, CoreError> {
        let raw = self.rating.ok_or_else(|| CoreError::MissingRating {
            review_id: self.id.to_string(),
        })?;
        let rating = policy.apply(raw).ok_or_else(|| CoreError::RejectedReview {
            review_id: self.id.to_string(),
            value: raw,
        })?;
        let detailed_ratings = self
            .detailed_ratings
            .as_ref()
            .and_then(|detail| detail.resolve(policy));

        Ok(Review {
            id: self.id,
            user_id: self.user_id,
            user_name: self
                .user_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Guest".to_string()),
            user_avatar: self.user_avatar,
            accommodation_code: self.accommodation_code,
            rating,
            title: self.title,
            comment: self.comment,
            pros: self.pros,
            cons: self.cons,
            is_verified: self.is_verified,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            helpful_count: self.helpful_count,
            detailed_ratings,
        })
    }
}

/// Payload for creating a review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub accommodation_type: AccommodationType,
    pub accommodation_code: AccommodationCode,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pros: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cons: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_ratings: Option<DetailedRatingsInput>,
}

/// Sub-scores entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetailedRatingsInput {
    pub cleanliness: u8,
    pub comfort: u8,
    pub location: u8,
    pub service: u8,
    pub value: u8,
}

impl ReviewSubmission {
    /// Maximum title length accepted by the form.
    pub const MAX_TITLE_LEN: usize = 120;

    /// Check the payload before it is sent.
    pub fn validate(&self) -> Result<(), CoreError> {
        Rating::new(self.rating)?;

        if let Some(detail) = &self.detailed_ratings {
            for (name, score) in [
                ("cleanliness", detail.cleanliness),
                ("comfort", detail.comfort),
                ("location", detail.location),
                ("service", detail.service),
                ("value", detail.value),
            ] {
                Rating::new(score).map_err(|_| {
                    CoreError::Validation(format!("{} score must be between 1 and 10", name))
                })?;
            }
        }

        let title = self.title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("title is required".to_string()));
        }
        if title.chars().count() > Self::MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "title must be at most {} characters",
                Self::MAX_TITLE_LEN
            )));
        }
        if self.comment.trim().is_empty() {
            return Err(CoreError::Validation("comment is required".to_string()));
        }

        if let (Some(check_in), Some(check_out)) = (self.check_in_date, self.check_out_date) {
            if check_out < check_in {
                return Err(CoreError::Validation(
                    "check-out date must not be before check-in date".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Body of `POST /reviews/helpful`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpfulRequest {
    pub review_id: ReviewId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation_type: Option<AccommodationType>,
}

/// Acknowledgment of a helpful mark.
///
/// Servers that report the updated count make it authoritative.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpfulAck {
    #[serde(default)]
    pub review_id: Option<ReviewId>,
    #[serde(default, alias = "count")]
    pub helpful_count: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(rating: &str) -> String {
        format!(
            r#"{{
                "id": 7,
                "userName": "Ana",
                "accommodationId": "HTL-1",
                "rating": {rating},
                "title": "Lovely",
                "comment": "Great stay",
                "isVerified": true,
                "checkInDate": "2024-05-01",
                "checkOutDate": "2024-05-04",
                "createdAt": "2024-05-05T10:00:00Z",
                "helpfulCount": 3,
                "detailedRatings": {{"cleanliness": 9, "comfort": 8, "location": 10, "service": 7, "value": 8}}
            }}"#
        )
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(11).is_err());
        assert_eq!(Rating::new(10).unwrap().value(), 10);
    }

    #[test]
    fn test_reject_policy() {
        let policy = RatingPolicy::Reject;
        assert_eq!(policy.apply(8.0), Some(Rating(8)));
        assert_eq!(policy.apply(8.5), None);
        assert_eq!(policy.apply(0.0), None);
        assert_eq!(policy.apply(11.0), None);
        assert_eq!(policy.apply(f64::NAN), None);
    }

    #[test]
    fn test_clamp_policy() {
        let policy = RatingPolicy::Clamp;
        assert_eq!(policy.apply(8.5), Some(Rating(9)));
        assert_eq!(policy.apply(-3.0), Some(Rating(1)));
        assert_eq!(policy.apply(42.0), Some(Rating(10)));
        assert_eq!(policy.apply(f64::INFINITY), None);
    }

    #[test]
    fn test_record_into_review() {
        let record: ReviewRecord = serde_json::from_str(&record_json("9")).unwrap();
        let review = record.into_review(RatingPolicy::Reject).unwrap();

        assert_eq!(review.id.as_str(), "7");
        assert_eq!(review.rating.value(), 9);
        assert_eq!(review.accommodation_code.as_ref().map(|c| c.as_str()), Some("HTL-1"));
        assert_eq!(review.nights(), Some(3));
        assert_eq!(review.detailed_ratings.unwrap().location.value(), 10);
    }

    #[test]
    fn test_record_with_fractional_rating_is_rejected() {
        let record: ReviewRecord = serde_json::from_str(&record_json("7.5")).unwrap();
        let err = record.into_review(RatingPolicy::Reject).unwrap_err();
        assert!(matches!(err, CoreError::RejectedReview { .. }));
    }

    #[test]
    fn test_missing_user_name_falls_back_to_guest() {
        let json = r#"{"id":"r1","rating":6,"createdAt":"2024-01-01T00:00:00Z"}"#;
        let record: ReviewRecord = serde_json::from_str(json).unwrap();
        let review = record.into_review(RatingPolicy::Reject).unwrap();
        assert_eq!(review.user_name, "Guest");
        assert!(review.detailed_ratings.is_none());
    }

    #[test]
    fn test_invalid_detail_drops_only_detail() {
        let json = r#"{
            "id": "r2", "rating": 8, "createdAt": "2024-01-01T00:00:00Z",
            "detailedRatings": {"cleanliness": 12, "comfort": 8, "location": 8, "service": 8, "value": 8}
        }"#;
        let record: ReviewRecord = serde_json::from_str(json).unwrap();
        let review = record.into_review(RatingPolicy::Reject).unwrap();
        assert_eq!(review.rating.value(), 8);
        assert!(review.detailed_ratings.is_none());
    }

    #[test]
    fn test_null_or_text_rating_is_rejected_not_fatal() {
        for rating in ["null", r#""great""#] {
            let record: ReviewRecord = serde_json::from_str(&record_json(rating)).unwrap();
            let err = record.into_review(RatingPolicy::Clamp).unwrap_err();
            assert!(matches!(err, CoreError::MissingRating { .. }));
        }

        let json = r#"{"id":"r3","createdAt":"2024-01-01T00:00:00Z"}"#;
        let record: ReviewRecord = serde_json::from_str(json).unwrap();
        assert!(record.rating.is_none());
    }

    #[test]
    fn test_numeric_string_rating_is_read() {
        let record: ReviewRecord = serde_json::from_str(&record_json(r#""8""#)).unwrap();
        assert_eq!(record.into_review(RatingPolicy::Reject).unwrap().rating.value(), 8);
    }

    #[test]
    fn test_null_text_fields_become_empty() {
        let json = r#"{
            "id": "r4", "rating": 7, "createdAt": "2024-01-01T00:00:00Z",
            "title": null, "comment": null, "helpfulCount": null, "isVerified": null,
            "detailedRatings": {"cleanliness": null, "comfort": 8, "location": 8, "service": 8, "value": 8}
        }"#;
        let record: ReviewRecord = serde_json::from_str(json).unwrap();
        let review = record.into_review(RatingPolicy::Reject).unwrap();
        assert_eq!(review.title, "");
        assert_eq!(review.comment, "");
        assert_eq!(review.helpful_count, 0);
        assert!(!review.is_verified);
        assert!(review.detailed_ratings.is_none());
    }

    fn submission() -> ReviewSubmission {
        ReviewSubmission {
            accommodation_type: AccommodationType::Hotel,
            accommodation_code: AccommodationCode::new("HTL-1"),
            rating: 9,
            title: "Great".to_string(),
            comment: "Would stay again".to_string(),
            pros: None,
            cons: None,
            check_in_date: None,
            check_out_date: None,
            detailed_ratings: None,
        }
    }

    #[test]
    fn test_submission_validation() {
        assert!(submission().validate().is_ok());

        let mut bad = submission();
        bad.rating = 0;
        assert!(bad.validate().is_err());

        let mut bad = submission();
        bad.title = "   ".to_string();
        assert!(matches!(bad.validate(), Err(CoreError::Validation(_))));

        let mut bad = submission();
        bad.check_in_date = NaiveDate::from_ymd_opt(2024, 3, 10);
        bad.check_out_date = NaiveDate::from_ymd_opt(2024, 3, 8);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_submission_serializes_camel_case() {
        let json = serde_json::to_value(submission()).unwrap();
        assert_eq!(json["accommodationType"], "hotel");
        assert_eq!(json["accommodationCode"], "HTL-1");
        assert!(json.get("pros").is_none());
    }

    #[test]
    fn test_helpful_request_body() {
        let body = HelpfulRequest {
            review_id: ReviewId::new("r1"),
            accommodation_type: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"reviewId":"r1"}"#);
    }

    #[test]
    fn test_helpful_ack_count_alias() {
        let ack: HelpfulAck = serde_json::from_str(r#"{"count": 5}"#).unwrap();
        assert_eq!(ack.helpful_count, Some(5));
    }
}
