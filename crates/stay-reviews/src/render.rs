//! Reviews section renderer.

use stay_core::{PagedResponse, Review, ReviewSort, ReviewSummary};
use stay_data::{ReviewQuery, ReviewSource};

use crate::notification::Notification;
use crate::presenter::{ReviewListPresenter, ViewState};

/// Builds the links and form actions of the reviews section.
///
/// Every link carries the current query so a round trip re-renders the same
/// view.
#[derive(Debug, Clone)]
pub struct ReviewLinks {
    base_path: String,
}

impl ReviewLinks {
    /// `base_path` is the path serving the section, without query string.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into().trim_end_matches('/').to_string(),
        }
    }

    /// Links rooted at `/accommodations/{type}/{code}/reviews`.
    pub fn for_query(query: &ReviewQuery) -> Self {
        Self::new(format!(
            "/accommodations/{}/{}/reviews",
            query.accommodation_type.as_str(),
            urlencoding::encode(query.accommodation_code.as_str())
        ))
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn query_string(query: &ReviewQuery, show_all: bool) -> String {
        let mut qs = format!(
            "page={}&limit={}&sortBy={}",
            query.page,
            query.limit,
            query.sort.as_str()
        );
        if show_all {
            qs.push_str("&showAll=true");
        }
        qs
    }

    pub fn view(&self, query: &ReviewQuery, show_all: bool) -> String {
        format!("{}?{}", self.base_path, Self::query_string(query, show_all))
    }

    /// Sorting always restarts at page 1.
    pub fn sort(&self, query: &ReviewQuery, sort: ReviewSort, show_all: bool) -> String {
        self.view(&query.clone().with_sort(sort).with_page(1), show_all)
    }

    pub fn page(&self, query: &ReviewQuery, page: u32, show_all: bool) -> String {
        self.view(&query.clone().with_page(page), show_all)
    }

    /// Form action for marking `review_id` helpful.
    pub fn helpful(&self, query: &ReviewQuery, review_id: &str, show_all: bool) -> String {
        format!(
            "{}/{}/helpful?{}",
            self.base_path,
            urlencoding::encode(review_id),
            Self::query_string(query, show_all)
        )
    }
}

/// Render the reviews section for the presenter's current state.
pub fn render_reviews<S: ReviewSource>(presenter: &ReviewListPresenter<S>, links: &ReviewLinks) -> String {
    let notifications = render_notifications(&presenter.notifications());

    let body = match (presenter.state(), presenter.params()) {
        (ViewState::Loaded { page, summary }, Some(query)) => {
            let show_all = presenter.show_all();
            let reviews_html: String = presenter
                .visible_reviews()
                .iter()
                .map(|review| {
                    let action = links.helpful(query, review.id.as_str(), show_all);
                    render_single_review(review, &action, presenter.can_mark_helpful(&review.id))
                })
                .collect();

            let toggle = if presenter.has_hidden_reviews() {
                let (label, target) = if show_all {
                    ("Show fewer reviews", false)
                } else {
                    ("Show all reviews", true)
                };
                format!(
                    r#"<a class="btn-show-all" href="{}">{}</a>"#,
                    escape_html(&links.view(query, target)),
                    label
                )
            } else {
                String::new()
            };

            let list = if page.is_empty() {
                r#"<p class="reviews-empty">No reviews yet.</p>"#.to_string()
            } else {
                format!(r#"<div class="reviews-list">{}</div>"#, reviews_html)
            };

            format!(
                "{summary}\n    {sort}\n    {list}\n    {toggle}\n    {pagination}",
                summary = render_summary(summary),
                sort = render_sort_options(links, query, show_all),
                list = list,
                toggle = toggle,
                pagination = render_pagination(links, query, page, show_all),
            )
        }
        (ViewState::Error { message }, _) => format!(
            r#"<p class="reviews-error">{}</p>"#,
            escape_html(message)
        ),
        _ => r#"<p class="reviews-loading">Loading reviews...</p>"#.to_string(),
    };

    format!(
        r#"<section class="accommodation-reviews" data-section="reviews" data-state="{state}">
    <h2>Guest Reviews</h2>
    {notifications}
    {body}
</section>"#,
        state = presenter.state().name(),
        notifications = notifications,
        body = body
    )
}

fn render_summary(summary: &ReviewSummary) -> String {
    if summary.is_empty() {
        return r#"<div class="reviews-summary reviews-summary--empty"></div>"#.to_string();
    }

    let histogram_html: String = summary
        .histogram
        .iter_desc()
        .map(|(score, count)| {
            let pct = summary.histogram.percentage(score);
            format!(
                r#"<div class="rating-bar">
                    <span class="rating-label">{}</span>
                    <div class="rating-bar-track">
                        <div class="rating-bar-fill" style="width: {:.0}%"></div>
                    </div>
                    <span class="rating-count">{}</span>
                </div>"#,
                score, pct, count
            )
        })
        .collect();

    let categories_html: String = summary
        .categories
        .map(|categories| {
            categories
                .entries()
                .iter()
                .map(|(label, average)| {
                    format!(
                        r#"<li class="category-score"><span>{}</span><span>{:.1}</span></li>"#,
                        label, average
                    )
                })
                .collect::<String>()
        })
        .map(|items| format!(r#"<ul class="category-scores">{}</ul>"#, items))
        .unwrap_or_default();

    format!(
        r#"<div class="reviews-summary">
        <div class="average-rating">
            <span class="rating-number">{average:.1}</span>
            <span class="rating-scale">/ 10</span>
            <span class="rating-word">{label}</span>
            <span class="rating-count">({total} reviews)</span>
        </div>
        <div class="rating-distribution">
            {histogram_html}
        </div>
        {categories_html}
    </div>"#,
        average = summary.display_average(),
        label = summary.label(),
        total = summary.total,
        histogram_html = histogram_html,
        categories_html = categories_html
    )
}

fn render_sort_options(links: &ReviewLinks, query: &ReviewQuery, show_all: bool) -> String {
    let options: String = ReviewSort::ALL
        .iter()
        .map(|sort| {
            let class = if *sort == query.sort {
                "sort-option sort-option--active"
            } else {
                "sort-option"
            };
            format!(
                r#"<a class="{}" href="{}">{}</a>"#,
                class,
                escape_html(&links.sort(query, *sort, show_all)),
                sort.display_name()
            )
        })
        .collect();

    format!(r#"<nav class="reviews-sort">{}</nav>"#, options)
}

fn render_pagination<T>(
    links: &ReviewLinks,
    query: &ReviewQuery,
    page: &PagedResponse<T>,
    show_all: bool,
) -> String {
    if page.total_elements == 0 {
        return String::new();
    }

    let range = format!(
        r#"<span class="page-range">Showing {}-{} of {}</span>"#,
        page.start_item(),
        page.end_item(),
        page.total_elements
    );
    if page.total_pages <= 1 {
        return format!(r#"<nav class="reviews-pagination">{}</nav>"#, range);
    }

    let prev = if page.has_prev() {
        format!(
            r#"<a class="page-prev" href="{}">Previous</a>"#,
            escape_html(&links.page(query, page.page - 1, show_all))
        )
    } else {
        String::new()
    };
    let next = if page.has_next() {
        format!(
            r#"<a class="page-next" href="{}">Next</a>"#,
            escape_html(&links.page(query, page.page + 1, show_all))
        )
    } else {
        String::new()
    };

    format!(
        r#"<nav class="reviews-pagination">{}{}<span class="page-current">Page {} of {}</span>{}</nav>"#,
        range, prev, page.page, page.total_pages, next
    )
}

fn render_single_review(review: &Review, helpful_action: &str, can_mark: bool) -> String {
    let verified = if review.is_verified {
        r#"<span class="verified-badge">Verified stay</span>"#
    } else {
        ""
    };

    let stay = review
        .nights()
        .map(|nights| {
            let unit = if nights == 1 { "night" } else { "nights" };
            format!(r#"<span class="review-stay">{} {}</span>"#, nights, unit)
        })
        .unwrap_or_default();

    let pros = optional_paragraph("review-pros", review.pros.as_deref());
    let cons = optional_paragraph("review-cons", review.cons.as_deref());

    let disabled = if can_mark { "" } else { " disabled" };

    format!(
        r#"<article class="review" data-review-id="{id}">
        <header class="review-header">
            <span class="review-score">{rating}</span>
            <span class="review-author">{author}</span>
            <span class="review-date">{date}</span>
            {stay}
            {verified}
        </header>
        <h3 class="review-title">{title}</h3>
        <p class="review-body">{body}</p>
        {pros}{cons}
        <footer class="review-footer">
            <span class="helpful-count">{helpful} people found this helpful</span>
            <form method="post" action="{action}">
                <button class="btn-helpful" type="submit"{disabled}>Helpful</button>
            </form>
        </footer>
    </article>"#,
        id = escape_html(review.id.as_str()),
        rating = review.rating.value(),
        author = escape_html(&review.user_name),
        date = review.created_at.format("%Y-%m-%d"),
        stay = stay,
        verified = verified,
        title = escape_html(&review.title),
        body = escape_html(&review.comment),
        pros = pros,
        cons = cons,
        helpful = review.helpful_count,
        action = escape_html(helpful_action),
        disabled = disabled
    )
}

fn optional_paragraph(class: &str, text: Option<&str>) -> String {
    match text {
        Some(text) if !text.trim().is_empty() => {
            format!(r#"<p class="{}">{}</p>"#, class, escape_html(text))
        }
        _ => String::new(),
    }
}

fn render_notifications(notifications: &[&Notification]) -> String {
    if notifications.is_empty() {
        return String::new();
    }

    let items: String = notifications
        .iter()
        .map(|n| {
            format!(
                r#"<div class="notification notification--{}" data-code="{}"><strong>{}</strong> {}</div>"#,
                n.severity.as_str(),
                n.code,
                escape_html(&n.title),
                escape_html(&n.message)
            )
        })
        .collect();

    format!(r#"<div class="notifications" role="status">{}</div>"#, items)
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stay_core::{AccommodationCode, AccommodationType};

    fn query() -> ReviewQuery {
        ReviewQuery::new(AccommodationType::Hotel, AccommodationCode::new("HTL 1"))
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_links_carry_query() {
        let links = ReviewLinks::for_query(&query());
        assert_eq!(links.base_path(), "/accommodations/hotel/HTL%201/reviews");

        let q = query().with_page(3);
        assert_eq!(
            links.sort(&q, ReviewSort::RatingHigh, true),
            "/accommodations/hotel/HTL%201/reviews?page=1&limit=10&sortBy=rating_high&showAll=true"
        );
        assert_eq!(
            links.helpful(&q, "r/1", false),
            "/accommodations/hotel/HTL%201/reviews/r%2F1/helpful?page=3&limit=10&sortBy=newest"
        );
    }

    #[test]
    fn test_pagination_links_and_range() {
        let links = ReviewLinks::for_query(&query());
        assert!(render_pagination(&links, &query(), &PagedResponse::<()>::empty(10), false).is_empty());

        let single = render_pagination(&links, &query(), &PagedResponse::new(vec![(); 4], 1, 10, 4), false);
        assert!(single.contains("Showing 1-4 of 4"));
        assert!(!single.contains("page-next"));

        let first = render_pagination(&links, &query(), &PagedResponse::new(vec![(); 10], 1, 10, 25), false);
        assert!(!first.contains("page-prev"));
        assert!(first.contains("page=2"));
        assert!(first.contains("Page 1 of 3"));

        let last = render_pagination(&links, &query(), &PagedResponse::new(vec![(); 5], 3, 10, 25), false);
        assert!(last.contains("Showing 21-25 of 25"));
        assert!(last.contains("page-prev"));
        assert!(!last.contains("page-next"));
    }

    #[test]
    fn test_empty_summary_has_no_histogram() {
        let html = render_summary(&ReviewSummary::empty());
        assert!(!html.contains("rating-bar"));
    }
}
