#![allow(dead_code)]

use async_trait::async_trait;
use realm_shop_api::clock::Clock;
use realm_shop_api::config::Config;
use realm_shop_api::models::prompt::GenerationPrompt;
use realm_shop_api::services::checkout::{
    CheckoutProvider, CheckoutSession, PriceSpec, ProductSpec, SessionSpec,
};
use realm_shop_api::services::generation::TextGenerator;
use realm_shop_api::{AppError, Result, Services};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use vercel_runtime::{Body, Response};

#[derive(Debug)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

/// Replies with a canned text, or fails like a provider outage.
#[derive(Debug, Default)]
pub struct MockGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<GenerationPrompt>>,
}

impl MockGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::default(),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<GenerationPrompt> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.reply
            .clone()
            .ok_or_else(|| AppError::Upstream("connection reset".into()))
    }
}

#[derive(Debug, Default)]
pub struct MockCheckout {
    pub fail: bool,
    pub products: Mutex<Vec<ProductSpec>>,
    pub prices: Mutex<Vec<PriceSpec>>,
    pub sessions: Mutex<Vec<SessionSpec>>,
}

impl MockCheckout {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.products.lock().unwrap().len()
            + self.prices.lock().unwrap().len()
            + self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl CheckoutProvider for MockCheckout {
    async fn create_product(&self, spec: &ProductSpec) -> Result<String> {
        if self.fail {
            return Err(AppError::Upstream("card_error: api key expired".into()));
        }
        self.products.lock().unwrap().push(spec.clone());
        Ok("prod_test".into())
    }

    async fn create_price(&self, spec: &PriceSpec) -> Result<String> {
        self.prices.lock().unwrap().push(spec.clone());
        Ok("price_test".into())
    }

    async fn create_session(&self, spec: &SessionSpec) -> Result<CheckoutSession> {
        self.sessions.lock().unwrap().push(spec.clone());
        Ok(CheckoutSession {
            id: "cs_test".into(),
            url: "https://checkout.stripe.com/c/pay/cs_test".into(),
        })
    }
}

pub fn services(
    generator: Arc<MockGenerator>,
    checkout: Option<Arc<MockCheckout>>,
) -> Services {
    Services::new(
        Config::default(),
        generator,
        checkout.map(|c| c as Arc<dyn CheckoutProvider>),
        Arc::new(FixedClock(1_700_000_000_000)),
    )
}

pub fn body_json(resp: &Response<Body>) -> Value {
    serde_json::from_slice(resp.body()).unwrap()
}

pub fn header<'a>(resp: &'a Response<Body>, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}
