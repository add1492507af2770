use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse};
use crate::state::AppState;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use tracing::debug;

/// Accepts the shorten request either as an urlencoded form or as JSON.
pub struct ShortenBody(pub CreateUrlRequest);

impl<S: Send + Sync> FromRequest<S> for ShortenBody {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(body) = Json::<CreateUrlRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(body))
        } else {
            let Form(body) = Form::<CreateUrlRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(body))
        }
    }
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    ShortenBody(request): ShortenBody,
) -> Result<Json<CreateUrlResponse>> {
    let mapping = state.allocator.allocate(&request.url).await?;

    Ok(Json(CreateUrlResponse {
        original_url: mapping.long_url,
        short_url: mapping.short_code.to_string(),
    }))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Response> {
    let long_url = state.resolver.resolve(&short_code).await?;
    let location = location_header(&long_url).ok_or_else(|| {
        AppError::Internal(format!(
            "stored url for '{short_code}' cannot be sent as a Location header"
        ))
    })?;
    debug!(code = %short_code, "redirecting");

    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}

/// Builds a `Location` value, percent-encoding characters a header cannot carry.
fn location_header(long_url: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(long_url).ok().or_else(|| {
        url::Url::parse(long_url)
            .ok()
            .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
    })
}
