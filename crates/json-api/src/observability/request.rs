//! Per-request span, request id propagation and completion logging.

use std::time::{Duration, Instant};

use salvo::{
    Request, async_trait,
    http::{StatusCode, header::HeaderValue},
    prelude::{Depot, FlowCtrl, Handler, Response},
};
use tracing::{Instrument as _, Level, error, info, info_span, warn};
use uuid::Uuid;

use crate::auth::USER_HEADER;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps each request in an `http.request` span and logs its outcome.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestLogger {
    slow_after: Duration,
}

impl RequestLogger {
    pub(crate) fn new(slow_after: Duration) -> Self {
        Self { slow_after }
    }
}

#[async_trait]
impl Handler for RequestLogger {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let started = Instant::now();
        let request_id = request_id(req.header::<String>(REQUEST_ID_HEADER));

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let span = info_span!(
            "http.request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.uri().path(),
            user_id = tracing::field::Empty,
            status = tracing::field::Empty,
        );

        if let Some(user) = req.header::<String>(USER_HEADER) {
            span.record("user_id", user.as_str());
        }

        ctrl.call_next(req, depot, res)
            .instrument(span.clone())
            .await;

        let status = res.status_code.unwrap_or(StatusCode::OK);
        let elapsed = started.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        span.record("status", status.as_u16());

        let level = completion_level(status);

        span.in_scope(|| {
            if level == Level::ERROR {
                error!(elapsed_ms, "request failed");
            } else if level == Level::WARN {
                warn!(elapsed_ms, "request rejected");
            } else {
                info!(elapsed_ms, "request completed");
            }

            if elapsed > self.slow_after {
                warn!(
                    elapsed_ms,
                    slow_after_ms = u64::try_from(self.slow_after.as_millis()).unwrap_or(u64::MAX),
                    "slow request"
                );
            }
        });
    }
}

fn completion_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

/// The caller's request id, or a fresh one when absent or blank.
fn request_id(header: Option<String>) -> String {
    header
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}
