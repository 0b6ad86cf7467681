use crate::auth::AuthenticatedUser;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpMessage};
use sprintsync_core::MetricsAggregator;
use std::time::Instant;
use tracing::{error, info, warn};

/// Time every request, record it in the metrics aggregator and log it.
///
/// Errors that escape the handler chain are recorded with their response
/// status (500 for anything unclassified) before being passed on.
pub async fn track_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let metrics = req.app_data::<web::Data<MetricsAggregator>>().cloned();
    let method = req.method().clone();
    let path = req.path().to_string();
    let start = Instant::now();

    let result = next.call(req).await;
    let latency_ms = round2(start.elapsed().as_secs_f64() * 1000.0);

    let (status, user_id, failure) = match &result {
        Ok(res) => (
            res.status(),
            res.request().extensions().get::<AuthenticatedUser>().map(|u| u.0),
            res.response().error().map(|e| e.to_string()),
        ),
        Err(e) => (e.as_response_error().status_code(), None, Some(e.to_string())),
    };

    if let Some(metrics) = &metrics {
        metrics.record(&path, latency_ms, status.as_u16());
    }

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status_code = status.as_u16(),
            user_id = ?user_id,
            latency_ms,
            error = failure.as_deref().unwrap_or(""),
            "request failed"
        );
    } else if status.is_client_error() {
        warn!(
            method = %method,
            path = %path,
            status_code = status.as_u16(),
            user_id = ?user_id,
            latency_ms,
            "request rejected"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status_code = status.as_u16(),
            user_id = ?user_id,
            latency_ms,
            "request completed"
        );
    }

    result
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
