//! `POST /api/shorten`

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use tracing::debug;

use super::helpers::{error_from_relay, json_response};
use super::types::{ShortenPayload, ShortenResponse};
use crate::services::ShortenService;

pub async fn shorten(
    service: web::Data<ShortenService>,
    payload: web::Json<ShortenPayload>,
) -> impl Responder {
    let payload = payload.into_inner();
    debug!(
        "Shorten request: url={:?}, customSlug={:?}",
        payload.url, payload.custom_slug
    );

    match service
        .shorten(payload.url.as_deref(), payload.custom_slug.as_deref())
        .await
    {
        Ok(result) => json_response(
            StatusCode::OK,
            &ShortenResponse {
                success: true,
                result,
            },
        ),
        Err(e) => error_from_relay(&e),
    }
}

