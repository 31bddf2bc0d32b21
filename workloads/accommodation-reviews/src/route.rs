//! Route and query parsing.

use http::Method;
use stay_core::{AccommodationCode, AccommodationType, ReviewId, ReviewListConfig, ReviewSort};
use stay_data::ReviewQuery;
use thiserror::Error;

/// A request this workload serves.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// `GET /accommodations/{type}/{code}/reviews`
    List { query: ReviewQuery, show_all: bool },
    /// `POST /accommodations/{type}/{code}/reviews/{reviewId}/helpful`
    Helpful {
        query: ReviewQuery,
        show_all: bool,
        review_id: ReviewId,
    },
}

impl Route {
    pub fn query(&self) -> &ReviewQuery {
        match self {
            Route::List { query, .. } | Route::Helpful { query, .. } => query,
        }
    }

    pub fn show_all(&self) -> bool {
        match self {
            Route::List { show_all, .. } | Route::Helpful { show_all, .. } => *show_all,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::List { .. } => "reviews.list",
            Route::Helpful { .. } => "reviews.helpful",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    /// The path exists but not for this method; `allow` lists the one it takes.
    #[error("method not allowed")]
    MethodNotAllowed { allow: Method },
}

impl RouteError {
    pub fn status(&self) -> u16 {
        match self {
            RouteError::NotFound => 404,
            RouteError::BadRequest(_) => 400,
            RouteError::MethodNotAllowed { .. } => 405,
        }
    }

    /// Value for the `Allow` response header, if the status needs one.
    pub fn allow(&self) -> Option<&str> {
        match self {
            RouteError::MethodNotAllowed { allow } => Some(allow.as_str()),
            _ => None,
        }
    }
}

/// Match a method and path (with optional query string) to a route.
pub fn parse_route(
    method: &Method,
    path_with_query: &str,
    defaults: &ReviewListConfig,
) -> Result<Route, RouteError> {
    let (path, query_string) = path_with_query
        .split_once('?')
        .unwrap_or((path_with_query, ""));

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        ["accommodations", _, _, "reviews"] if method != Method::GET => {
            Err(RouteError::MethodNotAllowed { allow: Method::GET })
        }
        ["accommodations", _, _, "reviews", _, "helpful"] if method != Method::POST => {
            Err(RouteError::MethodNotAllowed { allow: Method::POST })
        }
        ["accommodations", kind, code, "reviews"] => {
            let (query, show_all) = parse_query(kind, code, query_string, defaults)?;
            Ok(Route::List { query, show_all })
        }
        ["accommodations", kind, code, "reviews", review_id, "helpful"] => {
            let (query, show_all) = parse_query(kind, code, query_string, defaults)?;
            let review_id = decode(review_id)?;
            if review_id.is_empty() {
                return Err(RouteError::BadRequest("empty review id".to_string()));
            }
            Ok(Route::Helpful {
                query,
                show_all,
                review_id: ReviewId::new(review_id),
            })
        }
        _ => Err(RouteError::NotFound),
    }
}

fn parse_query(
    kind: &str,
    code: &str,
    query_string: &str,
    defaults: &ReviewListConfig,
) -> Result<(ReviewQuery, bool), RouteError> {
    let accommodation_type: AccommodationType = kind
        .parse()
        .map_err(|e: stay_core::CoreError| RouteError::BadRequest(e.to_string()))?;
    let code = decode(code)?;
    if code.trim().is_empty() {
        return Err(RouteError::BadRequest("empty accommodation code".to_string()));
    }

    let mut query =
        ReviewQuery::from_config(accommodation_type, AccommodationCode::new(code), defaults);
    let mut show_all = false;

    for pair in query_string.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = decode(value)?;
        match key {
            "page" => query = query.with_page(parse_number(key, &value)?),
            "limit" => query = query.with_limit(parse_number(key, &value)?),
            "sortBy" => {
                let sort: ReviewSort = value
                    .parse()
                    .map_err(|e: stay_core::CoreError| RouteError::BadRequest(e.to_string()))?;
                query = query.with_sort(sort);
            }
            "showAll" => show_all = matches!(value.as_str(), "true" | "1"),
            _ => {}
        }
    }

    Ok((query, show_all))
}

fn parse_number(key: &str, value: &str) -> Result<u32, RouteError> {
    value
        .parse()
        .map_err(|_| RouteError::BadRequest(format!("{} must be a positive number", key)))
}

fn decode(segment: &str) -> Result<String, RouteError> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|_| RouteError::BadRequest("malformed percent-encoding".to_string()))
}
