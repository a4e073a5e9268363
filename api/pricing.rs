use realm_shop_api::{config::Config, handlers, http::request::Incoming, logging, Services};
use tracing::error;
use vercel_runtime::{run, Body, Error, Request, Response};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env();
    let defaults = Config::default();
    logging::init(config.as_ref().unwrap_or(&defaults));

    let services = config
        .and_then(Services::install)
        .map_err(|e| {
            error!(error = %e, "pricing cold start failed");
            e
        })?;
    // fail the cold start rather than every request
    services.checkout().map_err(|e| {
        error!(error = %e, "pricing cold start failed");
        e
    })?;
    run(handler).await
}

pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    let services = Services::shared()?;
    Ok(handlers::pricing::handle(services, Incoming::from(&req)).await?)
}
