//! Identity handed over by the authentication layer in front of this service

use axum::http::HeaderMap;

use crate::pipeline::Identity;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `None` when the user id header is missing, blank or not valid text.
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let user_id = header_value(headers, USER_ID_HEADER)?;
    let email = header_value(headers, USER_EMAIL_HEADER).unwrap_or_default();
    Some(Identity::new(user_id, email))
}
