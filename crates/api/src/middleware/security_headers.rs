//! Security headers added to every response.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
pub const X_FRAME_OPTIONS: &str = "x-frame-options";
pub const REFERRER_POLICY: &str = "referrer-policy";

/// Scripts only from this origin; styles may be inline because card colors
/// are written into `style` attributes. Media may come from any http(s) host.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self'; \
    style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
    font-src 'self' https://fonts.gstatic.com; \
    img-src 'self' https: http: data:; \
    media-src 'self' https: http:; \
    connect-src 'self'; \
    frame-ancestors 'none'; \
    base-uri 'none'; \
    form-action 'self'";

/// HSTS is only sent when `PATRIKA__SECURITY__HSTS_ENABLED=true`, i.e. when
/// TLS is terminated in front of the service.
fn hsts_enabled() -> bool {
    std::env::var("PATRIKA__SECURITY__HSTS_ENABLED")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        HeaderName::from_static(X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    // Invitation pages are shared as links, never embedded.
    headers.insert(
        HeaderName::from_static(X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        HeaderName::from_static(REFERRER_POLICY),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    if hsts_enabled() {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}
