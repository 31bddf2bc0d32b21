//! Review list presenter.
//!
//! Every fetch is stamped with a generation number. A response is applied
//! only if its ticket belongs to the latest generation, so a slow response
//! for old parameters can never overwrite the current list.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use stay_core::{
    summarize, HelpfulRequest, PagedResponse, Review, ReviewId, ReviewSort, ReviewSummary,
    ReviewsConfig,
};
use stay_data::{ApiError, ReviewQuery, ReviewSource};
use stay_observability::StructuredLogger;

use crate::auth::AuthState;
use crate::notification::{Clock, Notification, NotificationCenter, Severity, SystemClock, CODE_CLIENT};

/// What the reviews section currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing requested yet.
    Idle,
    Loading,
    Loaded {
        page: PagedResponse<Review>,
        summary: ReviewSummary,
    },
    Error {
        message: String,
    },
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Loaded { .. } => "loaded",
            ViewState::Error { .. } => "error",
        }
    }
}

/// Proof that a fetch was started, carrying the query to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: ReviewQuery,
}

impl FetchTicket {
    pub fn query(&self) -> &ReviewQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of handing a response to the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response became the displayed state.
    Applied,
    /// A newer fetch was started; the response was discarded.
    Stale,
}

/// Result of a helpful-mark action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpfulOutcome {
    /// The server accepted the mark; `helpful_count` is the displayed count.
    Marked { helpful_count: u32 },
    /// No session; nothing was sent.
    LoginRequired,
    /// Already marked in this session; nothing was sent.
    AlreadyMarked,
    /// The review is not part of the displayed page; nothing was sent.
    NotFound,
    /// The server call failed.
    Failed { message: String },
}

/// View state of the reviews section of one accommodation page.
pub struct ReviewListPresenter<S> {
    source: S,
    auth: AuthState,
    preview_size: usize,
    params: Option<ReviewQuery>,
    state: ViewState,
    generation: u64,
    show_all: bool,
    marked: HashSet<ReviewId>,
    notifications: NotificationCenter,
    clock: Box<dyn Clock>,
    logger: StructuredLogger,
}

impl<S: ReviewSource> ReviewListPresenter<S> {
    pub fn new(source: S, auth: AuthState, config: &ReviewsConfig, logger: StructuredLogger) -> Self {
        Self {
            source,
            auth,
            preview_size: config.reviews.preview_size,
            params: None,
            state: ViewState::Idle,
            generation: 0,
            show_all: false,
            marked: HashSet::new(),
            notifications: NotificationCenter::new(config.notifications.dismiss_after_ms),
            clock: Box::new(SystemClock),
            logger: logger.child("review-list"),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Seed review ids already marked helpful earlier in the session.
    pub fn with_marked(mut self, ids: impl IntoIterator<Item = ReviewId>) -> Self {
        self.marked.extend(ids);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn params(&self) -> Option<&ReviewQuery> {
        self.params.as_ref()
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Update the session, e.g. after login or logout.
    pub fn set_auth(&mut self, auth: AuthState) {
        self.auth = auth;
    }

    pub fn summary(&self) -> Option<&ReviewSummary> {
        match &self.state {
            ViewState::Loaded { summary, .. } => Some(summary),
            _ => None,
        }
    }

    pub fn page(&self) -> Option<&PagedResponse<Review>> {
        match &self.state {
            ViewState::Loaded { page, .. } => Some(page),
            _ => None,
        }
    }

    /// Record new parameters. Returns a ticket when a fetch is needed: on
    /// first mount, or when any parameter changed.
    pub fn set_params(&mut self, params: ReviewQuery) -> Option<FetchTicket> {
        let unchanged = self.params.as_ref() == Some(&params);
        if unchanged && !matches!(self.state, ViewState::Idle) {
            return None;
        }
        self.params = Some(params);
        self.begin_fetch()
    }

    /// Change the sort key, going back to the first page.
    pub fn set_sort(&mut self, sort: ReviewSort) -> Option<FetchTicket> {
        let params = self.params.clone()?.with_sort(sort).with_page(1);
        self.set_params(params)
    }

    /// Fetch the current parameters again.
    pub fn reload(&mut self) -> Option<FetchTicket> {
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let query = self.params.clone()?;
        // Any ticket handed out before this one is now stale.
        self.generation += 1;
        self.state = ViewState::Loading;

        self.logger
            .debug_builder("Review fetch started")
            .field_i64("generation", self.generation as i64)
            .field("sort", query.sort.as_str())
            .emit();

        Some(FetchTicket {
            generation: self.generation,
            query,
        })
    }

    /// Apply the response for `ticket` unless a newer fetch has started.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<PagedResponse<Review>, ApiError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            self.logger
                .debug_builder("Discarding stale review response")
                .field_i64("generation", ticket.generation as i64)
                .field_i64("current", self.generation as i64)
                .emit();
            return FetchOutcome::Stale;
        }

        match result {
            Ok(page) => {
                // Summary covers the whole page, not just the preview.
                let summary = summarize(&page.content);
                self.state = ViewState::Loaded { page, summary };
            }
            Err(err) => {
                self.logger
                    .error_builder("Review list failed to load")
                    .field("message", err.message())
                    .emit();
                let now = self.prune_expired();
                self.notifications.api_error("Reviews unavailable", &err, now);
                self.state = ViewState::Error {
                    message: err.message().to_string(),
                };
            }
        }
        FetchOutcome::Applied
    }

    /// Set parameters and, if that requires a fetch, perform it.
    pub async fn load(&mut self, params: ReviewQuery) -> Option<FetchOutcome> {
        let ticket = self.set_params(params)?;
        Some(self.run(ticket).await)
    }

    /// Change sort and fetch.
    pub async fn change_sort(&mut self, sort: ReviewSort) -> Option<FetchOutcome> {
        let ticket = self.set_sort(sort)?;
        Some(self.run(ticket).await)
    }

    /// Fetch the current parameters again.
    pub async fn refresh(&mut self) -> Option<FetchOutcome> {
        let ticket = self.reload()?;
        Some(self.run(ticket).await)
    }

    async fn run(&mut self, ticket: FetchTicket) -> FetchOutcome {
        let result = self.source.fetch_page(ticket.query()).await;
        self.complete_fetch(ticket, result)
    }

    /// Toggle between the preview and the whole page; returns the new value.
    pub fn toggle_show_all(&mut self) -> bool {
        self.show_all = !self.show_all;
        self.show_all
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.show_all = show_all;
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn preview_size(&self) -> usize {
        self.preview_size
    }

    /// Reviews to display given the preview toggle.
    pub fn visible_reviews(&self) -> &[Review] {
        match self.page() {
            Some(page) if self.show_all => &page.content,
            Some(page) => &page.content[..page.content.len().min(self.preview_size)],
            None => &[],
        }
    }

    /// Whether the preview hides some loaded reviews.
    pub fn has_hidden_reviews(&self) -> bool {
        self.page()
            .map(|page| page.content.len() > self.preview_size)
            .unwrap_or(false)
    }

    /// The helpful action is disabled once a review has been marked.
    pub fn can_mark_helpful(&self, review_id: &ReviewId) -> bool {
        !self.marked.contains(review_id)
    }

    /// Review ids marked helpful in this session.
    pub fn marked_ids(&self) -> impl Iterator<Item = &ReviewId> {
        self.marked.iter()
    }

    /// Mark a review as helpful.
    ///
    /// The displayed count is taken from the server acknowledgment; only when
    /// the server does not report one is it incremented locally.
    pub async fn mark_helpful(&mut self, review_id: &ReviewId) -> HelpfulOutcome {
        let now = self.prune_expired();

        // Anonymous users are told to log in; nothing is sent.
        let Some(token) = self.auth.token().map(str::to_string) else {
            self.logger
                .info_builder("Helpful mark needs login")
                .field("review_id", review_id.as_str())
                .emit();
            self.notifications
                .login_required("mark reviews as helpful", now);
            return HelpfulOutcome::LoginRequired;
        };

        if !self.can_mark_helpful(review_id) {
            self.notifications.push(
                "Already marked",
                "You have already marked this review as helpful.",
                CODE_CLIENT,
                Severity::Info,
                now,
            );
            return HelpfulOutcome::AlreadyMarked;
        }

        // The review may have left the page since it was rendered.
        let Some(current) = self.find_review(review_id).map(|r| r.helpful_count) else {
            self.logger
                .info_builder("Helpful mark for review not on page")
                .field("review_id", review_id.as_str())
                .emit();
            self.notifications.push(
                "Review unavailable",
                "This review is no longer shown. Refresh to see the latest reviews.",
                CODE_CLIENT,
                Severity::Info,
                now,
            );
            return HelpfulOutcome::NotFound;
        };

        let request = HelpfulRequest {
            review_id: review_id.clone(),
            accommodation_type: self.params.as_ref().map(|p| p.accommodation_type),
        };

        match self.source.mark_helpful(&token, &request).await {
            Ok(ack) => {
                // Prefer the server's count over a local increment.
                let helpful_count = ack.helpful_count.unwrap_or(current.saturating_add(1));
                if let Some(review) = self.find_review_mut(review_id) {
                    review.helpful_count = helpful_count;
                }
                self.marked.insert(review_id.clone());
                self.notifications.push(
                    "Thank you",
                    ack.message
                        .unwrap_or_else(|| "Your feedback has been recorded.".to_string()),
                    CODE_CLIENT,
                    Severity::Success,
                    self.clock.now(),
                );
                HelpfulOutcome::Marked { helpful_count }
            }
            Err(err) => {
                self.logger
                    .error_builder("Helpful mark failed")
                    .field("review_id", review_id.as_str())
                    .field("message", err.message())
                    .emit();
                self.notifications
                    .api_error("Could not mark as helpful", &err, self.clock.now());
                HelpfulOutcome::Failed {
                    message: err.message().to_string(),
                }
            }
        }
    }

    fn find_review(&self, review_id: &ReviewId) -> Option<&Review> {
        self.page()?.content.iter().find(|r| &r.id == review_id)
    }

    fn find_review_mut(&mut self, review_id: &ReviewId) -> Option<&mut Review> {
        match &mut self.state {
            ViewState::Loaded { page, .. } => page.content.iter_mut().find(|r| &r.id == review_id),
            _ => None,
        }
    }

    /// Notifications that have not expired yet.
    pub fn notifications(&self) -> Vec<&Notification> {
        self.notifications.active(self.clock.now())
    }

    /// Drop expired notifications before adding new ones; returns the current time.
    fn prune_expired(&mut self) -> DateTime<Utc> {
        let now = self.clock.now();
        self.notifications.prune(now);
        now
    }
}
