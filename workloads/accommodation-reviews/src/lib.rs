//! Accommodation reviews section - Spin workload.
//!
//! Serves the server-rendered reviews section of an accommodation page:
//! - `GET /accommodations/{type}/{code}/reviews` lists a page of reviews
//! - `POST /accommodations/{type}/{code}/reviews/{reviewId}/helpful` marks a
//!   review helpful and re-renders the section with the outcome
//!
//! The session token comes from the `token` cookie. Review ids already marked
//! helpful are remembered in the `helpful_marked` cookie so the action stays
//! disabled across requests.

mod route;

#[cfg(target_arch = "wasm32")]
mod component;

pub use route::{parse_route, Route, RouteError};

use stay_core::ReviewId;
use stay_reviews::{cookie_value, escape_html};

/// Cookie holding the ids marked helpful in this browser session.
pub const MARKED_COOKIE: &str = "helpful_marked";

/// Ids stored in the marked cookie of a `Cookie` header.
pub fn marked_from_cookie(header: Option<&str>) -> Vec<ReviewId> {
    header
        .and_then(|h| cookie_value(h, MARKED_COOKIE))
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ReviewId::new)
                .collect()
        })
        .unwrap_or_default()
}

/// `Set-Cookie` value remembering `ids`.
pub fn marked_cookie<'a>(ids: impl IntoIterator<Item = &'a ReviewId>) -> String {
    let mut ids: Vec<&str> = ids.into_iter().map(|id| id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        MARKED_COOKIE,
        urlencoding::encode(&ids.join(","))
    )
}

/// Wrap a rendered section in a minimal HTML document.
pub fn render_page(title: &str, request_id: &str, section: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{styles}</style>
</head>
<body>
    <main class="reviews-container">
        <p class="request-info">Request ID: {request_id}</p>
        {section}
    </main>
</body>
</html>"#,
        title = escape_html(title),
        styles = REVIEWS_STYLES,
        request_id = escape_html(request_id),
        section = section
    )
}

/// Minimal error document.
pub fn render_error_page(status: u16, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{status}</title></head>
<body><h1>{status}</h1><p>{message}</p></body>
</html>"#,
        status = status,
        message = escape_html(message)
    )
}

const REVIEWS_STYLES: &str = r#"
* { box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f5f5f5; }
.reviews-container { max-width: 960px; margin: 0 auto; padding: 2rem; }
.request-info { font-size: 0.75rem; color: #666; }
.accommodation-reviews { background: white; padding: 2rem; border-radius: 8px; }
.notifications { margin-bottom: 1rem; }
.notification { padding: 0.5rem 1rem; border-radius: 4px; margin-bottom: 0.5rem; }
.notification--success { background: #e8f5e9; color: #2e7d32; }
.notification--info { background: #e3f2fd; color: #1565c0; }
.notification--warning { background: #fff8e1; color: #8d6e00; }
.notification--error { background: #ffebee; color: #c62828; }
.reviews-summary { display: flex; flex-wrap: wrap; gap: 2rem; margin-bottom: 2rem; padding-bottom: 1rem; border-bottom: 1px solid #eee; }
.average-rating { text-align: center; }
.rating-number { font-size: 3rem; font-weight: bold; color: #003580; }
.rating-word { display: block; font-weight: 600; }
.rating-distribution { flex: 1; min-width: 240px; }
.rating-bar { display: flex; align-items: center; gap: 0.5rem; margin: 0.2rem 0; }
.rating-bar-track { flex: 1; height: 8px; background: #eee; border-radius: 4px; }
.rating-bar-fill { height: 100%; background: #003580; border-radius: 4px; }
.category-scores { list-style: none; padding: 0; margin: 0; min-width: 200px; }
.category-score { display: flex; justify-content: space-between; padding: 0.2rem 0; }
.reviews-sort { display: flex; gap: 1rem; margin-bottom: 1rem; }
.sort-option--active { font-weight: bold; text-decoration: none; }
.review { border-bottom: 1px solid #eee; padding: 1rem 0; }
.review-header { display: flex; gap: 1rem; align-items: center; margin-bottom: 0.5rem; }
.review-score { background: #003580; color: white; padding: 0.25rem 0.5rem; border-radius: 4px; }
.verified-badge { background: #e8f5e9; color: #2e7d32; font-size: 0.75rem; padding: 0.25rem 0.5rem; border-radius: 4px; }
.review-body { color: #555; line-height: 1.6; }
.review-footer { display: flex; gap: 1rem; align-items: center; }
.btn-helpful[disabled] { opacity: 0.5; cursor: default; }
.reviews-pagination { display: flex; gap: 1rem; margin-top: 1rem; }
.page-range { color: #666; }
.reviews-loading, .reviews-error, .reviews-empty { color: #666; }
"#;
