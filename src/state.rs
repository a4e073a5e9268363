use std::sync::{Arc, OnceLock};

use crate::clients::{openai::OpenAiClient, stripe::StripeClient};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::checkout::CheckoutProvider;
use crate::services::generation::TextGenerator;

static SERVICES: OnceLock<Services> = OnceLock::new();

/// Provider clients shared by every invocation served by this process.
pub struct Services {
    pub config: Config,
    pub generator: Arc<dyn TextGenerator>,
    checkout: Option<Arc<dyn CheckoutProvider>>,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    pub fn new(
        config: Config,
        generator: Arc<dyn TextGenerator>,
        checkout: Option<Arc<dyn CheckoutProvider>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { config, generator, checkout, clock }
    }

    /// The generation key is mandatory; the payment key only matters to
    /// endpoints that call `checkout()`.
    pub fn from_config(config: Config) -> Result<Self> {
        let generator = Arc::new(OpenAiClient::from_config(&config)?);
        let checkout = match StripeClient::from_config(&config) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn CheckoutProvider>),
            Err(_) => None,
        };
        Ok(Self::new(config, generator, checkout, Arc::new(SystemClock {})))
    }

    /// Builds from `config` unless an earlier call already did.
    pub fn install(config: Config) -> Result<&'static Services> {
        if let Some(services) = SERVICES.get() {
            return Ok(services);
        }
        let services = Self::from_config(config)?;
        Ok(SERVICES.get_or_init(|| services))
    }

    /// Built on first use and reused for the life of the process.
    pub fn shared() -> Result<&'static Services> {
        match SERVICES.get() {
            Some(services) => Ok(services),
            None => Self::install(Config::from_env()?),
        }
    }

    pub fn checkout(&self) -> Result<&dyn CheckoutProvider> {
        self.checkout
            .as_deref()
            .ok_or_else(|| AppError::Config("Missing STRIPE_SECRET_KEY".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_without_generation_key_fails_before_caching() {
        let err = Services::install(Config::default()).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
        assert!(SERVICES.get().is_none());
    }
}
