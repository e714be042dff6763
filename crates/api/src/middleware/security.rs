//! Security response headers.
//!
//! Each header is only set when the handler has not already provided one.

use axum::http::header::{
    CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS,
    X_DNS_PREFETCH_CONTROL, X_FRAME_OPTIONS,
};
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

/// Scripts, styles, and fonts may come from the page itself or the two CDNs
/// the public site and admin pages load libraries from.
const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'self'; \
     script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; \
     style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; \
     font-src 'self' data: https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; \
     img-src 'self' data: https:; \
     connect-src 'self'; \
     object-src 'none'; \
     base-uri 'self'; \
     frame-ancestors 'self'";

const CROSS_ORIGIN_OPENER_POLICY: HeaderName = HeaderName::from_static("cross-origin-opener-policy");

/// `(header, value)` pairs applied to every response.
pub fn security_headers() -> [(HeaderName, HeaderValue); 7] {
    [
        (
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
        ),
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
        (REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        (
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        ),
        (X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
        (
            CROSS_ORIGIN_OPENER_POLICY,
            HeaderValue::from_static("same-origin"),
        ),
    ]
}

/// Layer every security header onto `router`.
pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    security_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(name, value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_allows_the_cdns() {
        assert!(CONTENT_SECURITY_POLICY_VALUE.contains("https://cdn.jsdelivr.net"));
        assert!(CONTENT_SECURITY_POLICY_VALUE.contains("https://cdnjs.cloudflare.com"));
    }

    #[test]
    fn header_names_are_distinct() {
        let headers = security_headers();
        for (i, (a, _)) in headers.iter().enumerate() {
            for (b, _) in &headers[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
