use tracing::{error, warn};
use vercel_runtime::{Body, Response, StatusCode};

use crate::error::{AppError, Result};
use crate::http::cors::handle_preflight;
use crate::http::request::Incoming;
use crate::http::response::{json_response, render_error};
use crate::models::pricing::{CoinPurchaseRequest, CoinPurchaseResponse};
use crate::services::checkout::create_coin_checkout;
use crate::services::pricing::{quote_coins, validate_coins, INVALID_COINS};
use crate::state::Services;

const FAILURE: &str = "Failed to process coin purchase";

pub async fn handle(services: &Services, req: Incoming) -> anyhow::Result<Response<Body>> {
    if let Some(resp) = handle_preflight(&req.method)? {
        return Ok(resp);
    }
    match purchase(services, &req).await {
        Ok(body) => json_response(StatusCode::OK, &body),
        Err(err) => {
            match &err {
                AppError::InvalidInput(msg) => warn!(%msg, "coin purchase rejected"),
                AppError::MethodNotAllowed => warn!(method = %req.method, "unsupported method"),
                _ => error!(error = %err, "AI coin pricing error"),
            }
            render_error(&err, FAILURE)
        }
    }
}

async fn purchase(services: &Services, req: &Incoming) -> Result<CoinPurchaseResponse> {
    if !req.is_post() {
        return Err(AppError::MethodNotAllowed);
    }
    let parsed = parse_body(&req.body)?;
    let coins = validate_coins(&parsed)?;

    let checkout = services.checkout()?;
    let quote = quote_coins(services.generator.as_ref(), coins).await?;

    let origin = req
        .origin
        .as_deref()
        .unwrap_or(&services.config.default_origin);
    let session = create_coin_checkout(checkout, coins, quote.price, origin).await?;

    Ok(CoinPurchaseResponse {
        url: session.url,
        coins,
        price: quote.price,
        reasoning: quote.reasoning,
    })
}

fn parse_body(body: &[u8]) -> Result<CoinPurchaseRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::InvalidInput(INVALID_COINS.into()));
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| AppError::InvalidInput("Invalid JSON body".into()))?;
    // only the object form carries a coin count; `[1000]` is not `{"coins": 1000}`
    if !value.is_object() {
        return Err(AppError::InvalidInput(INVALID_COINS.into()));
    }
    serde_json::from_value(value).map_err(|_| AppError::InvalidInput(INVALID_COINS.into()))
}
