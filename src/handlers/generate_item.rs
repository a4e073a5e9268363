use tracing::{error, warn};
use vercel_runtime::{Body, Response, StatusCode};

use crate::error::{AppError, Result};
use crate::http::cors::handle_preflight;
use crate::http::request::Incoming;
use crate::http::response::{json_response, render_error};
use crate::models::weapon::WeaponResponse;
use crate::services::weapon::{generate_weapon, WeaponContext};
use crate::state::Services;

const FAILURE: &str = "Failed to generate weapon";

pub async fn handle(services: &Services, req: Incoming) -> anyhow::Result<Response<Body>> {
    if let Some(resp) = handle_preflight(&req.method)? {
        return Ok(resp);
    }
    match generate(services, &req).await {
        Ok(body) => json_response(StatusCode::OK, &body),
        Err(err) => {
            if let AppError::MethodNotAllowed = err {
                warn!(method = %req.method, "unsupported method");
            } else {
                error!(error = %err, "weapon generation error");
            }
            render_error(&err, FAILURE)
        }
    }
}

async fn generate(services: &Services, req: &Incoming) -> Result<WeaponResponse> {
    if !req.is_post() {
        return Err(AppError::MethodNotAllowed);
    }
    let ctx = WeaponContext::from_body(&req.body);
    let weapon = generate_weapon(services.generator.as_ref(), services.clock.as_ref(), &ctx).await?;
    Ok(WeaponResponse { success: true, weapon })
}
