//! Security response headers.
//!
//! Applied to every response that leaves the router, including 404s, static
//! assets and the 500 produced by panic recovery. Values set here override
//! anything a handler wrote.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// The fixed header set.
pub const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com",
    ),
    (header::REFERRER_POLICY, "origin-when-cross-origin"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "deny"),
    (header::X_XSS_PROTECTION, "0"),
];

/// Insert [`SECURITY_HEADERS`], replacing existing values.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// Middleware that stamps [`SECURITY_HEADERS`] onto the response.
pub async fn secure_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_headers_on_success_and_error() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route(
                "/boom",
                get(|| async { (StatusCode::BAD_REQUEST, [(header::X_FRAME_OPTIONS, "allow")]) }),
            )
            .layer(middleware::from_fn(secure_headers));

        for uri in ["/", "/boom", "/missing"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            for (name, value) in SECURITY_HEADERS {
                assert_eq!(response.headers()[&name], value, "{uri}: {name}");
            }
        }
    }
}
