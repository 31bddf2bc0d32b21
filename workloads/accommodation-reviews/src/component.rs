//! Spin HTTP entry point.

use anyhow::Context;
use futures::SinkExt;
use spin_sdk::http::{Fields, IncomingRequest, Method as SpinMethod, OutgoingResponse, ResponseOutparam};
use spin_sdk::http_component;

use stay_core::{RequestId, ReviewsConfig, DEFAULT_CONFIG_TOML};
use stay_data::{ApiClient, ReviewGateway, SpinTransport};
use stay_observability::StructuredLogger;
use stay_reviews::{render_reviews, AuthState, HelpfulOutcome, ReviewLinks, ReviewListPresenter};

use crate::{marked_cookie, marked_from_cookie, parse_route, render_error_page, render_page, Route};

const WORKLOAD: &str = "accommodation-reviews";

/// Main HTTP handler.
#[http_component]
async fn handle(req: IncomingRequest, response_out: ResponseOutparam) {
    let request_id = RequestId::generate();
    let path = req.path_with_query().unwrap_or_default();
    let method = match req.method() {
        SpinMethod::Get => http::Method::GET,
        SpinMethod::Head => http::Method::HEAD,
        SpinMethod::Post => http::Method::POST,
        SpinMethod::Put => http::Method::PUT,
        SpinMethod::Delete => http::Method::DELETE,
        SpinMethod::Connect => http::Method::CONNECT,
        SpinMethod::Options => http::Method::OPTIONS,
        SpinMethod::Trace => http::Method::TRACE,
        SpinMethod::Patch => http::Method::PATCH,
        SpinMethod::Other(name) => {
            http::Method::from_bytes(name.as_bytes()).unwrap_or(http::Method::OPTIONS)
        }
    };

    // Session token and marked ids both travel in the cookie header
    let cookie = req
        .headers()
        .entries()
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("cookie"))
        .and_then(|(_, value)| String::from_utf8(value).ok());

    // Load config
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            let logger = StructuredLogger::new(request_id.clone()).with_component(WORKLOAD);
            logger
                .error_builder("Configuration invalid")
                .field("error", format!("{:#}", e))
                .emit();
            let body = render_error_page(500, "Service misconfigured");
            send(response_out, 500, &request_id, Vec::new(), body).await;
            return;
        }
    };

    let logger = StructuredLogger::from_config(request_id.clone(), &config.logging)
        .with_component(WORKLOAD);

    logger
        .info_builder("Reviews request started")
        .field("method", method.as_str())
        .field("path", path.clone())
        .emit();

    // Parse route
    let route = match parse_route(&method, &path, &config.reviews) {
        Ok(route) => route,
        Err(e) => {
            logger
                .warn_builder("Request rejected")
                .field("reason", e.to_string())
                .field_i64("status", e.status() as i64)
                .emit();
            let extra = e
                .allow()
                .map(|allow| vec![("allow", allow.to_string())])
                .unwrap_or_default();
            let body = render_error_page(e.status(), &e.to_string());
            send(response_out, e.status(), &request_id, extra, body).await;
            return;
        }
    };

    // Fetch the requested page
    let gateway = ReviewGateway::new(
        ApiClient::new(config.api.base_url.clone(), SpinTransport),
        logger.clone(),
    )
    .with_rating_policy(config.reviews.rating_policy);

    let auth = AuthState::from_cookie_header(cookie.as_deref(), &config.auth.cookie_name);
    let mut presenter = ReviewListPresenter::new(gateway, auth, &config, logger.clone())
        .with_marked(marked_from_cookie(cookie.as_deref()));
    presenter.set_show_all(route.show_all());
    presenter.load(route.query().clone()).await;

    // Apply the helpful action against the freshly loaded page
    let mut extra = Vec::new();
    if let Route::Helpful { review_id, .. } = &route {
        let outcome = presenter.mark_helpful(review_id).await;
        logger
            .info_builder("Helpful action handled")
            .field("review_id", review_id.as_str())
            .field("outcome", format!("{:?}", outcome))
            .emit();
        if matches!(outcome, HelpfulOutcome::Marked { .. }) {
            extra.push(("set-cookie", marked_cookie(presenter.marked_ids())));
        }
    }

    // Render
    let query = route.query();
    let links = ReviewLinks::for_query(query);
    let title = format!(
        "{} {} reviews",
        query.accommodation_type.display_name(),
        query.accommodation_code
    );
    let body = render_page(&title, request_id.as_str(), &render_reviews(&presenter, &links));

    send(response_out, 200, &request_id, extra, body).await;
    logger
        .info_builder("Reviews request complete")
        .field("route", route.name())
        .field("state", presenter.state().name())
        .emit();
}

/// Embedded defaults with the API base URL taken from the `api_base_url`
/// variable when it is set.
fn load_config() -> anyhow::Result<ReviewsConfig> {
    let mut config = ReviewsConfig::from_toml_str(DEFAULT_CONFIG_TOML)?;
    if let Ok(base_url) = spin_sdk::variables::get("api_base_url") {
        if !base_url.trim().is_empty() {
            config = config.with_base_url(base_url);
        }
    }
    config.validate().context("invalid reviews configuration")?;
    Ok(config)
}

async fn send(
    response_out: ResponseOutparam,
    status: u16,
    request_id: &RequestId,
    extra: Vec<(&'static str, String)>,
    body: String,
) {
    let mut header_list: Vec<(String, Vec<u8>)> = vec![
        ("content-type".to_owned(), "text/html; charset=utf-8".into()),
        ("cache-control".to_owned(), "private, no-store".into()),
        ("x-request-id".to_owned(), request_id.to_string().into()),
    ];
    header_list.extend(
        extra
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value.into_bytes())),
    );

    let Ok(headers) = Fields::from_list(&header_list) else {
        eprintln!("invalid response headers");
        return;
    };
    let response = OutgoingResponse::new(headers);
    if response.set_status_code(status).is_err() {
        eprintln!("invalid status code {}", status);
    }

    let mut sink = response.take_body();
    response_out.set(response);
    if let Err(e) = sink.send(body.into_bytes()).await {
        eprintln!("failed to write response body: {}", e);
    }
}
