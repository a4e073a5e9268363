use crate::constants::{
    DEBUG_GENERATION_RAW, DEFAULT_GENERATION_BASE_URL, DEFAULT_GENERATION_MODEL, DEFAULT_ORIGIN,
    DEFAULT_ORIGIN_URL, DEFAULT_STRIPE_API_BASE, GENERATION_API_KEY, GENERATION_API_KEY_FALLBACKS,
    GENERATION_BASE_URL, GENERATION_MODEL, HUMAN_LOGGING, LOG_FILTER, STRIPE_API_BASE,
    STRIPE_SECRET_KEY,
};
use crate::error::{AppError, Result};
use secrecy::Secret;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub log_filter: String,
    pub human_logging: bool,
    pub debug_generation_raw: bool,
    pub generation_api_key: Option<Secret<String>>,
    pub generation_base_url: String,
    pub generation_model: String,
    pub stripe_secret_key: Option<Secret<String>>,
    pub stripe_api_base: String,
    pub default_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: String::new(),
            human_logging: false,
            debug_generation_raw: false,
            generation_api_key: None,
            generation_base_url: DEFAULT_GENERATION_BASE_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            stripe_secret_key: None,
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            default_origin: DEFAULT_ORIGIN_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            log_filter: env::var(LOG_FILTER).unwrap_or_default(),
            human_logging: parse_bool(HUMAN_LOGGING, defaults.human_logging)?,
            debug_generation_raw: env::var(DEBUG_GENERATION_RAW).ok().as_deref() == Some("1"),
            generation_api_key: std::iter::once(GENERATION_API_KEY)
                .chain(GENERATION_API_KEY_FALLBACKS)
                .find_map(non_empty)
                .map(Secret::new),
            generation_base_url: non_empty(GENERATION_BASE_URL)
                .unwrap_or(defaults.generation_base_url),
            generation_model: non_empty(GENERATION_MODEL).unwrap_or(defaults.generation_model),
            stripe_secret_key: non_empty(STRIPE_SECRET_KEY).map(Secret::new),
            stripe_api_base: non_empty(STRIPE_API_BASE).unwrap_or(defaults.stripe_api_base),
            default_origin: non_empty(DEFAULT_ORIGIN).unwrap_or(defaults.default_origin),
        })
    }
}

fn non_empty(env_var: &str) -> Option<String> {
    env::var(env_var).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(env_var: &str, default: bool) -> Result<bool> {
    match env::var(env_var) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::Config(format!(
                "Expected `true` or `false` to be provided for `{env_var}`"
            ))
        }),
        Err(_) => Ok(default),
    }
}
