//! Current-user extraction
//!
//! Token issuance and verification happen upstream. The gateway forwards the
//! authenticated user's id in the `X-User-Id` header; this extractor resolves
//! it against storage.

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use sprintsync_storage::User;
use std::future::{ready, Ready};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Marker stored in request extensions so the request log can name the user
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub i64);

/// The user making the request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<CurrentUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))?;

    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid X-User-Id header".to_string()))?;

    let user = state
        .storage
        .get_user(user_id)
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    req.extensions_mut().insert(AuthenticatedUser(user.id));
    Ok(CurrentUser(user))
}
