//! Panic recovery.
//!
//! Outermost layer of the pipeline. A panic anywhere downstream becomes a
//! plain 500 with `Connection: close`, so the client does not reuse a stream
//! that may have been left in an unknown state. The panic unwinds past
//! `secure_headers`, so the security headers are stamped here as well.

use std::any::Any;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::status_response;
use crate::security::apply_security_headers;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Layer wrapping everything below it in panic recovery.
pub fn recover_panic() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    let mut response = status_response(StatusCode::INTERNAL_SERVER_ERROR);
    let headers = response.headers_mut();
    apply_security_headers(headers);
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_panic_becomes_500_with_connection_close() {
        let app = Router::new()
            .route("/", get(|| async { "fine" }))
            .route("/panic", get(|| async {
                #[allow(unreachable_code)]
                {
                    panic!("kaboom");
                    "unreachable"
                }
            }))
            .layer(recover_panic());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/panic").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONNECTION], "close");
        for (name, value) in crate::security::headers::SECURITY_HEADERS {
            assert_eq!(response.headers()[&name], value, "{name}");
        }

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
