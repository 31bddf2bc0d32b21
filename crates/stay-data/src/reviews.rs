//! Review endpoints of the booking API.

use async_trait::async_trait;
use stay_core::{
    AccommodationCode, AccommodationType, HelpfulAck, HelpfulRequest, PagedResponse,
    RatingPolicy, Review, ReviewListConfig, ReviewRecord, ReviewSort, ReviewSubmission,
};
use stay_observability::StructuredLogger;

use crate::{ApiClient, ApiError, HttpTransport};

const LOAD_FAILED: &str = "Could not load reviews. Please try again later.";
const HELPFUL_FAILED: &str = "Could not mark the review as helpful.";
const SUBMIT_FAILED: &str = "Could not submit your review.";

/// Parameters of one page of reviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewQuery {
    pub accommodation_type: AccommodationType,
    pub accommodation_code: AccommodationCode,
    /// 1-indexed page.
    pub page: u32,
    pub limit: u32,
    pub sort: ReviewSort,
}

impl ReviewQuery {
    /// First page, default size, newest first.
    pub fn new(accommodation_type: AccommodationType, accommodation_code: AccommodationCode) -> Self {
        Self {
            accommodation_type,
            accommodation_code,
            page: 1,
            limit: 10,
            sort: ReviewSort::default(),
        }
    }

    /// First page with the configured size and sort.
    pub fn from_config(
        accommodation_type: AccommodationType,
        accommodation_code: AccommodationCode,
        config: &ReviewListConfig,
    ) -> Self {
        Self::new(accommodation_type, accommodation_code)
            .with_limit(config.page_size)
            .with_sort(config.default_sort)
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, ReviewListConfig::MAX_PAGE_SIZE);
        self
    }

    pub fn with_sort(mut self, sort: ReviewSort) -> Self {
        self.sort = sort;
        self
    }

    /// Path of the listing endpoint.
    pub fn path(&self) -> String {
        format!(
            "/reviews/{}/{}",
            self.accommodation_type.as_str(),
            urlencoding::encode(self.accommodation_code.as_str())
        )
    }

    /// Query parameters of the listing endpoint.
    pub fn params(&self) -> [(&'static str, String); 3] {
        [
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", self.sort.as_str().to_string()),
        ]
    }
}

/// Source of review pages and review mutations.
#[async_trait(?Send)]
pub trait ReviewSource {
    /// Fetch one page of reviews.
    async fn fetch_page(&self, query: &ReviewQuery) -> Result<PagedResponse<Review>, ApiError>;

    /// Mark a review as helpful on behalf of the token holder.
    async fn mark_helpful(
        &self,
        token: &str,
        request: &HelpfulRequest,
    ) -> Result<HelpfulAck, ApiError>;

    /// Create a review.
    async fn submit_review(
        &self,
        token: &str,
        submission: &ReviewSubmission,
    ) -> Result<Review, ApiError>;
}

#[async_trait(?Send)]
impl<S: ReviewSource + ?Sized> ReviewSource for std::rc::Rc<S> {
    async fn fetch_page(&self, query: &ReviewQuery) -> Result<PagedResponse<Review>, ApiError> {
        (**self).fetch_page(query).await
    }

    async fn mark_helpful(
        &self,
        token: &str,
        request: &HelpfulRequest,
    ) -> Result<HelpfulAck, ApiError> {
        (**self).mark_helpful(token, request).await
    }

    async fn submit_review(
        &self,
        token: &str,
        submission: &ReviewSubmission,
    ) -> Result<Review, ApiError> {
        (**self).submit_review(token, submission).await
    }
}

/// `ReviewSource` backed by the booking API.
pub struct ReviewGateway<T> {
    client: ApiClient<T>,
    policy: RatingPolicy,
    logger: StructuredLogger,
}

impl<T: HttpTransport> ReviewGateway<T> {
    pub fn new(client: ApiClient<T>, logger: StructuredLogger) -> Self {
        Self {
            client,
            policy: RatingPolicy::default(),
            logger: logger.child("review-gateway"),
        }
    }

    /// Set how out-of-domain ratings are handled.
    pub fn with_rating_policy(mut self, policy: RatingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// Decode and validate each record on its own; one bad record never
    /// fails the page.
    fn ingest(&self, page: PagedResponse<serde_json::Value>) -> PagedResponse<Review> {
        let policy = self.policy;
        page.filter_map(|raw| {
            let record: ReviewRecord = match serde_json::from_value(raw) {
                Ok(record) => record,
                Err(e) => {
                    self.logger
                        .warn_builder("Dropping malformed review record")
                        .field("error", e.to_string())
                        .emit();
                    return None;
                }
            };
            match record.into_review(policy) {
                Ok(review) => Some(review),
                Err(e) => {
                    self.logger
                        .warn_builder("Dropping review with invalid rating")
                        .field("error", e.to_string())
                        .emit();
                    None
                }
            }
        })
    }

    fn log_failure(&self, operation: &str, err: &ApiError) {
        let mut entry = self
            .logger
            .error_builder(format!("{} failed", operation))
            .field("message", err.message())
            .field("detail", err.detail());
        if let Some(status) = err.status() {
            entry = entry.field_i64("status", status as i64);
        }
        entry.emit();
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> ReviewSource for ReviewGateway<T> {
    async fn fetch_page(&self, query: &ReviewQuery) -> Result<PagedResponse<Review>, ApiError> {
        let request = self.client.get(&query.path()).query(query.params());

        self.logger
            .debug_builder("Fetching reviews")
            .field("accommodation_type", query.accommodation_type.as_str())
            .field("accommodation_code", query.accommodation_code.as_str())
            .field_i64("page", query.page as i64)
            .field("sort", query.sort.as_str())
            .emit();

        // Records stay untyped until ingestion so each can fail alone.
        let page: PagedResponse<serde_json::Value> = self
            .client
            .send_json(request)
            .await
            .map_err(|e| ApiError::from_fetch(e, LOAD_FAILED))
            .inspect_err(|e| self.log_failure("Review fetch", e))?;

        let page = self.ingest(page);
        self.logger
            .info_builder("Reviews fetched")
            .field_i64("count", page.len() as i64)
            .field_i64("total", page.total_elements as i64)
            .emit();
        Ok(page)
    }

    async fn mark_helpful(
        &self,
        token: &str,
        request: &HelpfulRequest,
    ) -> Result<HelpfulAck, ApiError> {
        let outgoing = self
            .client
            .post("/reviews/helpful")
            .bearer_auth(token)
            .json(request)
            .map_err(|e| ApiError::from_fetch(e, HELPFUL_FAILED))?;

        let ack: Option<HelpfulAck> = self
            .client
            .send_optional_json(outgoing)
            .await
            .map_err(|e| ApiError::from_fetch(e, HELPFUL_FAILED))
            .inspect_err(|e| self.log_failure("Helpful mark", e))?;

        self.logger
            .info_builder("Review marked helpful")
            .field("review_id", request.review_id.as_str())
            .emit();
        Ok(ack.unwrap_or_default())
    }

    async fn submit_review(
        &self,
        token: &str,
        submission: &ReviewSubmission,
    ) -> Result<Review, ApiError> {
        submission
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let outgoing = self
            .client
            .post("/reviews")
            .bearer_auth(token)
            .json(submission)
            .map_err(|e| ApiError::from_fetch(e, SUBMIT_FAILED))?;

        let record: ReviewRecord = self
            .client
            .send_json(outgoing)
            .await
            .map_err(|e| ApiError::from_fetch(e, SUBMIT_FAILED))
            .inspect_err(|e| self.log_failure("Review submission", e))?;

        record.into_review(self.policy).map_err(|e| ApiError::Decode {
            message: SUBMIT_FAILED.to_string(),
            detail: e.to_string(),
        })
    }
}
