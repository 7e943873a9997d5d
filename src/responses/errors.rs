use crate::errors::ServerError;
use crate::store::StoreError;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into a proper HTML response
pub fn error_to_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        tracing::error!(error = %err, status, "request failed");
    } else {
        tracing::debug!(error = %err, status, "request rejected");
    }
    let message = match &err {
        // Database details stay in the log.
        ServerError::DbError(_) | ServerError::DbUnavailable(_) => "Something went wrong on our side.".to_string(),
        other => other.to_string(),
    };
    render(status, &message, None)
}

/// The listing store is down. The page links back to `retry_href` so the
/// visitor can re-issue the same search.
pub fn unavailable_response(err: &StoreError, retry_href: &str) -> Response {
    tracing::warn!(error = %err, retry = retry_href, "listing store unavailable");
    render(
        503,
        "Listings could not be loaded right now.",
        Some(retry_href),
    )
}

fn render(status: u16, message: &str, retry_href: Option<&str>) -> Response {
    let html = error_page(status, message, retry_href).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(html))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
