use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Capture time of the current request in milliseconds since the Unix epoch.
///
/// Inserted into request extensions before validation and routing; handlers
/// read it with `Extension<RequestTimestamp>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimestamp(pub i64);

impl RequestTimestamp {
    #[must_use]
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }
}

pub async fn stamp_request(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(RequestTimestamp::now());
    next.run(req).await
}
