use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::constants::{ERROR_PROFILE, MASON};
use crate::mason::{Control, MasonBuilder};

/// Error details carried from [`AppError`](super::error::AppError) to the
/// [`render_errors`] middleware, which knows the request path.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub title: &'static str,
    pub messages: Vec<String>,
}

pub fn mason(status: StatusCode, body: MasonBuilder) -> Response {
    (status, [(header::CONTENT_TYPE, MASON)], Json(body)).into_response()
}

pub fn ok(body: MasonBuilder) -> Response {
    mason(StatusCode::OK, body)
}

pub fn created(location: String) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location)]).into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

fn error_document(title: &str, messages: Vec<String>, resource_url: Option<&str>) -> MasonBuilder {
    let mut body = MasonBuilder::new();
    if let Some(url) = resource_url {
        body.insert("resource_url", url);
    }
    body.add_error(title, messages);
    body.add_control("profile", Control::link(ERROR_PROFILE));
    body
}

/// Minimal Mason error document for `resource_url`.
pub fn create_error_response(
    status: StatusCode,
    title: &str,
    messages: impl IntoIterator<Item = String>,
    resource_url: &str,
) -> Response {
    mason(
        status,
        error_document(title, messages.into_iter().collect(), Some(resource_url)),
    )
}

/// Response for an error raised before the request path is known. The
/// report travels in the extensions so `render_errors` can rebuild it.
pub(crate) fn error_report(status: StatusCode, report: ErrorReport) -> Response {
    let body = error_document(report.title, report.messages.clone(), None);
    let mut response = mason(status, body);
    response.extensions_mut().insert(report);
    response
}

const REJECTION_BODY_LIMIT: usize = 16 * 1024;

/// Renders every client or handler error as a Mason document for the path
/// of the request that caused it. Rejections produced by the router itself
/// (wrong method, undecodable path segment) are wrapped too.
pub async fn render_errors(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let method = request.method().clone();
    let mut response = next.run(request).await;

    if let Some(report) = response.extensions_mut().remove::<ErrorReport>() {
        return create_error_response(response.status(), report.title, report.messages, &path);
    }

    let status = response.status();
    let is_mason = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value == MASON);
    if !status.is_client_error() || is_mason {
        return response;
    }

    let (parts, body) = response.into_parts();
    let detail = match to_bytes(body, REJECTION_BODY_LIMIT).await {
        Ok(bytes) if !bytes.is_empty() => String::from_utf8_lossy(&bytes).into_owned(),
        _ if status == StatusCode::METHOD_NOT_ALLOWED => {
            format!("{method} is not supported on {path}")
        }
        _ => status.to_string(),
    };
    tracing::warn!(%status, %path, detail = %detail, "Request rejected by router");

    let title = status.canonical_reason().unwrap_or("Client error");
    let mut rendered = create_error_response(status, title, [detail], &path);
    if let Some(allow) = parts.headers.get(header::ALLOW) {
        rendered.headers_mut().insert(header::ALLOW, allow.clone());
    }
    rendered
}
