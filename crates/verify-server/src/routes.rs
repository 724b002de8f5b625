//! `POST /api/verify-siwe` and `POST /api/verify-solana`.
//!
//! Both endpoints are stateless: each request recovers or checks the signer
//! of `message` and compares it with the claimed `address`.
//!
//! | outcome | status | body |
//! |---|---|---|
//! | signer matches | 200 | `{success:true, address}` |
//! | signer differs | 401 | `{success:false, error}` |
//! | anything malformed | 500 | `{success:false, error}` |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chain_eth::VerifyOutcome;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::VerifyError;

pub const ADDRESS_MISMATCH: &str = "address mismatch";
pub const SIGNATURE_MISMATCH: &str = "signature mismatch";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub message: String,
    pub signature: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResponse {
    fn verified(address: String) -> Self {
        Self {
            success: true,
            address: Some(address),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            address: None,
            error: Some(error.into()),
        }
    }
}

type Reply = (StatusCode, Json<VerifyResponse>);

pub fn router() -> Router {
    Router::new()
        .route("/api/verify-siwe", post(verify_siwe))
        .route("/api/verify-solana", post(verify_solana))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn verify_siwe(payload: Result<Json<VerifyRequest>, JsonRejection>) -> Reply {
    match check_siwe(payload) {
        Ok(VerifyOutcome::Match(address)) => {
            info!(%address, "siwe signature verified");
            (StatusCode::OK, Json(VerifyResponse::verified(address)))
        }
        Ok(VerifyOutcome::Mismatch(recovered)) => {
            warn!(%recovered, "siwe signer does not match claimed address");
            (
                StatusCode::UNAUTHORIZED,
                Json(VerifyResponse::failed(ADDRESS_MISMATCH)),
            )
        }
        Err(err) => internal_error("siwe", err),
    }
}

async fn verify_solana(payload: Result<Json<VerifyRequest>, JsonRejection>) -> Reply {
    match check_solana(payload) {
        Ok(Some(address)) => {
            info!(%address, "solana signature verified");
            (StatusCode::OK, Json(VerifyResponse::verified(address)))
        }
        Ok(None) => {
            warn!("solana signature does not match claimed address");
            (
                StatusCode::UNAUTHORIZED,
                Json(VerifyResponse::failed(SIGNATURE_MISMATCH)),
            )
        }
        Err(err) => internal_error("solana", err),
    }
}

fn check_siwe(
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<VerifyOutcome, VerifyError> {
    let Json(req) = payload.map_err(|e| VerifyError::MalformedRequest(e.body_text()))?;
    Ok(chain_eth::verify_message(
        req.message.as_bytes(),
        &req.signature,
        &req.address,
    )?)
}

fn check_solana(
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Option<String>, VerifyError> {
    let Json(req) = payload.map_err(|e| VerifyError::MalformedRequest(e.body_text()))?;
    let valid = chain_sol::verify_message(req.message.as_bytes(), &req.signature, &req.address)?;
    Ok(valid.then_some(req.address))
}

fn internal_error(endpoint: &str, err: VerifyError) -> Reply {
    warn!(endpoint, error = %err, "verification request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(VerifyResponse::failed(err.to_string())),
    )
}
