pub const LOG_FILTER: &str = "RUST_LOG";
pub const HUMAN_LOGGING: &str = "HUMAN_LOGGING";
pub const DEBUG_GENERATION_RAW: &str = "DEBUG_GENERATION_RAW";

pub const GENERATION_API_KEY: &str = "GENERATION_API_KEY";
pub const GENERATION_API_KEY_FALLBACKS: [&str; 2] = ["ANTHROPIC_API_KEY", "OPENAI_API_KEY"];
pub const GENERATION_BASE_URL: &str = "GENERATION_BASE_URL";
pub const DEFAULT_GENERATION_BASE_URL: &str = "https://api.anthropic.com/v1/";
pub const GENERATION_MODEL: &str = "GENERATION_MODEL";
pub const DEFAULT_GENERATION_MODEL: &str = "claude-3-haiku-20240307";

pub const STRIPE_SECRET_KEY: &str = "STRIPE_SECRET_KEY";
pub const STRIPE_API_BASE: &str = "STRIPE_API_BASE";
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

pub const DEFAULT_ORIGIN: &str = "DEFAULT_ORIGIN";
pub const DEFAULT_ORIGIN_URL: &str = "https://i-like-mangos.vercel.app";

// Coin purchase limits

pub const MIN_COINS: u32 = 50;
pub const MAX_COINS: u32 = 50_000;
/// Smallest price ever charged, in dollars.
pub const MIN_PRICE: f64 = 0.50;
pub const CURRENCY: &str = "usd";

// Token budgets per endpoint

pub const PRICING_MAX_TOKENS: u64 = 150;
pub const WEAPON_MAX_TOKENS: u64 = 300;
