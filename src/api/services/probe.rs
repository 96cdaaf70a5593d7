//! `GET /api/test` and `GET /api/stats`

use actix_web::http::StatusCode;
use actix_web::{Responder, web};

use super::helpers::json_response;
use super::types::{ErrorBody, ProbeResponse, StatsResponse};
use crate::services::CredentialProbe;
use crate::services::probe::MSG_PROBE_OK;

pub const MSG_STATS_FAILED: &str = "Failed to fetch account stats";

pub async fn test_credential(probe: web::Data<CredentialProbe>) -> impl Responder {
    match probe.test().await {
        Ok(account) => json_response(
            StatusCode::OK,
            &ProbeResponse {
                success: true,
                message: MSG_PROBE_OK.to_string(),
                account,
            },
        ),
        Err(failure) => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ErrorBody::new(failure.error, Some(failure.code)).with_details(failure.details),
        ),
    }
}

pub async fn account_stats(probe: web::Data<CredentialProbe>) -> impl Responder {
    match probe.stats().await {
        Ok(stats) => json_response(
            StatusCode::OK,
            &StatsResponse {
                success: true,
                stats,
            },
        ),
        Err(_) => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ErrorBody::new(MSG_STATS_FAILED, None),
        ),
    }
}
