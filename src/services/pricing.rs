use tracing::info;

use crate::constants::{MAX_COINS, MIN_COINS, MIN_PRICE, PRICING_MAX_TOKENS};
use crate::error::{AppError, Result};
use crate::models::pricing::{CoinAmount, CoinPurchaseRequest, PriceQuote};
use crate::models::prompt::GenerationPrompt;
use crate::services::generation::{generate_with_fallback, ClampRule, TextGenerator};

pub const INVALID_COINS: &str = "Invalid coin amount. Must be between 50 and 50,000 coins.";

/// Highest charge the model may quote: every coin at the undiscounted rate.
const MAX_PRICE: f64 = MAX_COINS as f64 / 100.0;

pub const PRICE_RULES: [ClampRule; 1] = [ClampRule::required("price", MIN_PRICE, MAX_PRICE)];

/// (minimum coins, discount) in ascending order.
pub const DISCOUNT_TIERS: [(u32, f64); 6] = [
    (500, 0.05),
    (1_000, 0.10),
    (2_500, 0.15),
    (5_000, 0.20),
    (10_000, 0.25),
    (25_000, 0.30),
];

pub fn validate_coins(req: &CoinPurchaseRequest) -> Result<CoinAmount> {
    req.coins
        .as_ref()
        .and_then(serde_json::Value::as_f64)
        .filter(|c| (MIN_COINS as f64..=MAX_COINS as f64).contains(c))
        .map(CoinAmount::new)
        .ok_or_else(|| AppError::InvalidInput(INVALID_COINS.into()))
}

pub fn tiered_discount(coins: f64) -> f64 {
    DISCOUNT_TIERS
        .iter()
        .rev()
        .find(|(threshold, _)| coins >= *threshold as f64)
        .map(|(_, discount)| *discount)
        .unwrap_or(0.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn fallback_price(coins: f64) -> f64 {
    let base = coins / 100.0;
    round2(base * (1.0 - tiered_discount(coins))).max(MIN_PRICE)
}

pub fn fallback_quote(coins: CoinAmount) -> PriceQuote {
    PriceQuote {
        price: fallback_price(coins.get()),
        reasoning: "Calculated with standard volume discount".into(),
    }
}

pub fn pricing_prompt(coins: CoinAmount) -> GenerationPrompt {
    let tiers = DISCOUNT_TIERS
        .iter()
        .map(|(threshold, discount)| {
            format!("  - {threshold}+ coins: {:.0}% discount", discount * 100.0)
        })
        .collect::<Vec<_>>()
        .join("\n");

    GenerationPrompt {
        system: "You are a game monetization AI.".into(),
        user: format!(
            "Determine the fair USD price for {coins} coins in a game.

Pricing guidelines:
- Base rate: $1.00 per 100 coins
- Volume discounts:
{tiers}
- Minimum price: ${MIN_PRICE:.2}
- Round to nearest $0.01

Respond with ONLY a JSON object in this exact format:
{{\"price\": X.XX, \"reasoning\": \"brief explanation\"}}"
        ),
        max_tokens: PRICING_MAX_TOKENS,
        temperature: 0.0,
    }
}

/// Asks the model for a price, falling back to the tier table. The quote is
/// rounded to whole cents so the echoed price is the charged price.
pub async fn quote_coins(generator: &dyn TextGenerator, coins: CoinAmount) -> Result<PriceQuote> {
    let mut quote: PriceQuote = generate_with_fallback(
        generator,
        &pricing_prompt(coins),
        &PRICE_RULES,
        || fallback_quote(coins),
    )
    .await?;
    quote.price = round2(quote.price).max(MIN_PRICE);
    info!(coins = coins.get(), price = quote.price, "coins priced");
    Ok(quote)
}
