use axum::{
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};

/// Checks `Authorization: Bearer <token>` against the configured internal
/// token. With no token configured the internal surface stays closed.
pub fn authorize_internal(headers: &HeaderMap, expected_token: Option<&str>) -> Result<(), Response> {
    let Some(expected_token) = expected_token else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "internal api token is not configured",
        )
            .into_response());
    };

    authorize_bearer(headers, expected_token)
        .map_err(|status| (status, "unauthorized").into_response())
}

fn authorize_bearer(headers: &HeaderMap, expected_token: &str) -> Result<(), StatusCode> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token == expected_token {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
